//! Serialization checks for the public result types (requires `--features serde`).

#![cfg(feature = "serde")]

use pagebox_core::{AnchorToken, BBox, DetectionCandidate, DetectionSource, FrameKind};

#[test]
fn candidate_round_trips_through_json() {
    let candidate = DetectionCandidate {
        bbox: BBox::new(48.0, 48.0, 352.0, 252.0),
        source: DetectionSource::Vector,
        score: 61_776.0,
    };
    let json = serde_json::to_string(&candidate).unwrap();
    assert!(json.contains("\"vector\""));
    let back: DetectionCandidate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, candidate);
}

#[test]
fn anchor_token_serializes_fields() {
    let token = AnchorToken {
        text: "(12a)".into(),
        bbox: BBox::new(500.0, 100.0, 530.0, 112.0),
        engine: "tesseract".into(),
        confidence: 91.5,
    };
    let value = serde_json::to_value(&token).unwrap();
    assert_eq!(value["text"], "(12a)");
    assert_eq!(value["engine"], "tesseract");
    assert_eq!(value["bbox"]["x1"], 530.0);
}

#[test]
fn frame_kind_uses_lowercase_names() {
    let kind: FrameKind = serde_json::from_str("\"figure\"").unwrap();
    assert_eq!(kind, FrameKind::Figure);
}

//! ROI refinement through a canned structure engine.

mod common;

use common::{CannedStructure, FailingRenderer, InkRenderer};
use pagebox::{BBox, DetectError, PageContext, RegionConversionBridge, RegionOptions};
use serde_json::json;

fn page() -> PageContext {
    PageContext::from_parts(0, 612.0, 792.0, Vec::new())
}

#[test]
fn tiny_roi_is_empty_without_rendering() {
    let engine = CannedStructure::new(json!({"tables": []}));
    let bridge = RegionConversionBridge::new(&engine, RegionOptions::default());
    let renderer = InkRenderer::new(Vec::new());

    let out = bridge.refine_roi(&page(), &renderer, &BBox::new(0.0, 0.0, 1.0, 1.0), Some(200));

    assert!(out.is_empty());
    assert_eq!(renderer.calls.get(), 0);
    assert_eq!(engine.seen.get(), None);
}

#[test]
fn cell_envelope_maps_back_to_page() {
    // At 72 dpi the 200x100pt ROI becomes a 200x100 image and page.
    let engine = CannedStructure::new(json!({
        "tables": [{
            "table_cells": [
                {"bbox": {"l": 10.0, "t": 90.0, "r": 80.0, "b": 60.0}},
                {"bbox": {"l": 80.0, "t": 60.0, "r": 150.0, "b": 40.0}}
            ]
        }]
    }));
    let bridge = RegionConversionBridge::new(&engine, RegionOptions::default());
    let roi = BBox::new(100.0, 200.0, 300.0, 300.0);

    let out = bridge
        .try_refine_roi(&page(), &InkRenderer::new(Vec::new()), &roi, Some(72))
        .unwrap();

    assert_eq!(engine.seen.get(), Some((200, 100)));
    assert_eq!(out.len(), 1);
    assert!(out[0].approx_eq(&BBox::new(110.0, 210.0, 250.0, 260.0), 1e-9));
}

#[test]
fn envelope_reaching_image_edge_snaps_to_roi() {
    let engine = CannedStructure::new(json!({
        "tables": [{
            "cells": [{"bbox": {"l": 20.0, "t": 80.0, "r": 200.0, "b": 0.0}}]
        }]
    }));
    let bridge = RegionConversionBridge::new(&engine, RegionOptions::default());
    let roi = BBox::new(100.0, 200.0, 300.0, 300.0);

    let out = bridge.refine_roi(&page(), &InkRenderer::new(Vec::new()), &roi, Some(72));

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].x1, roi.x1);
    assert_eq!(out[0].bottom, roi.bottom);
    assert!((out[0].x0 - 120.0).abs() < 1e-9);
    assert!((out[0].top - 220.0).abs() < 1e-9);
}

#[test]
fn no_tables_or_small_result_is_empty() {
    let roi = BBox::new(100.0, 200.0, 300.0, 300.0);
    let renderer = InkRenderer::new(Vec::new());

    let none = CannedStructure::new(json!({"tables": []}));
    let bridge = RegionConversionBridge::new(&none, RegionOptions::default());
    assert!(bridge.refine_roi(&page(), &renderer, &roi, Some(72)).is_empty());

    let sliver = CannedStructure::new(json!({
        "tables": [{"table_cells": [{"bbox": [10, 50, 14, 40]}]}]
    }));
    let bridge = RegionConversionBridge::new(&sliver, RegionOptions::default());
    assert!(bridge.refine_roi(&page(), &renderer, &roi, Some(72)).is_empty());
}

#[test]
fn render_failure_is_reported_by_try_variant() {
    let engine = CannedStructure::new(json!({"tables": []}));
    let bridge = RegionConversionBridge::new(&engine, RegionOptions::default());
    let roi = BBox::new(100.0, 200.0, 300.0, 300.0);
    let renderer = FailingRenderer::default();

    assert!(bridge.refine_roi(&page(), &renderer, &roi, None).is_empty());
    let err = bridge.try_refine_roi(&page(), &renderer, &roi, None).unwrap_err();
    assert!(matches!(err, DetectError::Render(_)));
    assert_eq!(engine.seen.get(), None);
}

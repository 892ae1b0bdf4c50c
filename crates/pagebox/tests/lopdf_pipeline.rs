//! Full pipeline from PDF bytes: parse, acquire, detect.

mod common;

use common::{FailingRenderer, InkRenderer};
use lopdf::{Object, Stream, dictionary};
use pagebox::{
    AcquireOptions, BBox, BottomLeftBox, DetectionSource, FrameBoxDetector, FrameKind,
    LopdfDocument, PageContext, RasterTightener, to_bottom_left, to_top_left,
};

fn single_page_pdf(content: &[u8]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content_id),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn coordinates_round_trip_through_engine_space() {
    let b = BBox::new(50.0, 50.0, 350.0, 250.0);
    let engine = to_bottom_left(b, 792.0);
    assert_eq!(engine, BottomLeftBox::new(50.0, 742.0, 350.0, 542.0));
    assert_eq!(to_top_left(engine, 792.0), b);
}

#[test]
fn table_frame_found_from_pdf_bytes() {
    let bytes = single_page_pdf(b"1 w 50 542 300 200 re S\n0 0 1 rg 60 727 90 10 re f");
    let doc = LopdfDocument::open(&bytes).unwrap();
    let page = doc.page(0).unwrap();
    let ctx = PageContext::acquire(&page, &AcquireOptions::default()).unwrap();

    assert_eq!((ctx.width(), ctx.height()), (612.0, 792.0));
    assert!(ctx.warnings().is_empty());

    let caption = BBox::new(60.0, 55.0, 150.0, 65.0);
    let found = FrameBoxDetector::default().detect(
        &ctx,
        &FailingRenderer::default(),
        None,
        Some(&caption),
        FrameKind::Table,
    );

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, DetectionSource::Vector);
    assert!(found[0].bbox.approx_eq(&BBox::new(48.0, 48.0, 352.0, 252.0), 1e-6));
}

#[test]
fn detected_box_can_be_tightened() {
    let bytes = single_page_pdf(b"");
    let doc = LopdfDocument::open(&bytes).unwrap();
    let ctx = PageContext::acquire(&doc.page(0).unwrap(), &AcquireOptions { gutter_x: Some(300.0) })
        .unwrap();
    assert_eq!(ctx.gutter_x(), 300.0);

    let renderer = InkRenderer::new(vec![BBox::new(340.0, 600.0, 520.0, 612.0)]);
    let coarse = BBox::new(320.0, 590.0, 560.0, 630.0);
    let tight = RasterTightener::default().tighten(&ctx, &renderer, &coarse);

    assert_eq!(tight.x1, coarse.x1);
    assert!(tight.height() < coarse.height());
    assert!((tight.x0 - 340.0).abs() <= 1.0);
}

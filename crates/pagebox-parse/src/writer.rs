//! Synthetic single-page documents.
//!
//! Region refinement hands a re-rendered region to the structure engine as
//! a one-page PDF whose page size equals the raster's pixel size, so one
//! pixel maps to one point.

use lopdf::{Object, Stream, dictionary};

use crate::error::BackendError;

/// Write a one-page PDF whose only content is an 8-bit RGB image covering
/// the whole page.
///
/// `rgb` must hold exactly `width * height * 3` samples, row-major, top row
/// first.
pub fn write_image_document(width: u32, height: u32, rgb: &[u8]) -> Result<Vec<u8>, BackendError> {
    if width == 0 || height == 0 {
        return Err(BackendError::Write(format!(
            "cannot write an empty {width}x{height} image page"
        )));
    }
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(BackendError::Write(format!(
            "expected {expected} RGB samples for {width}x{height}, got {}",
            rgb.len()
        )));
    }

    let mut doc = lopdf::Document::with_version("1.5");

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        rgb.to_vec(),
    );
    let image_id = doc.add_object(Object::Stream(image_stream));

    let content = format!("q {width} 0 0 {height} 0 0 cm /Im0 Do Q");
    let content_id = doc.add_object(Object::Stream(Stream::new(
        lopdf::Dictionary::new(),
        content.into_bytes(),
    )));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), i64::from(width).into(), i64::from(height).into()],
        "Contents" => content_id,
        "Resources" => Object::Dictionary(dictionary! {
            "XObject" => Object::Dictionary(dictionary! {
                "Im0" => image_id,
            }),
        }),
    });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1i64,
    });
    if let Ok(dict) = doc.get_object_mut(page_id).and_then(|o| o.as_dict_mut()) {
        dict.set("Parent", Object::Reference(pages_id));
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| BackendError::Write(format!("failed to serialize document: {e}")))?;
    Ok(buf)
}

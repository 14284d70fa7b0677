//! Bake a page's `/Rotate` into its content.
//!
//! Overlay coordinates are measured on the page as displayed. A template
//! page that is stored in portrait with `/Rotate 90` would put every field
//! in the wrong place, so such templates are rewritten once: the content
//! gets a transformation matrix, the MediaBox is swapped to the displayed
//! size and the rotation is reset to 0.

use crate::error::{FormFillError, Result};
use crate::page;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use tracing::debug;

/// `cm` matrix mapping stored coordinates (origin at the MediaBox
/// corner) to displayed ones.
fn rotation_matrix(angle: i64, width: f32, height: f32) -> [f32; 6] {
    match angle {
        90 => [0.0, -1.0, 1.0, 0.0, 0.0, width],
        180 => [-1.0, 0.0, 0.0, -1.0, width, height],
        270 => [0.0, 1.0, -1.0, 0.0, height, 0.0],
        _ => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    }
}

fn cm(matrix: [f32; 6]) -> Operation {
    Operation::new("cm", matrix.iter().map(|v| Object::Real(*v)).collect())
}

/// Rewrite every rotated page so that `/Rotate` is 0 and the content shows
/// the same way it did before.
pub fn normalize_rotation(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes).map_err(|e| FormFillError::ParseError(e.to_string()))?;
    let page_ids: Vec<_> = doc.get_pages().values().copied().collect();
    let mut rotated = 0usize;

    for page_id in page_ids {
        let angle = page::rotation(&doc, page_id);
        if angle == 0 {
            continue;
        }
        let [llx, lly, urx, ury] = page::media_box(&doc, page_id)?;
        let (width, height) = (urx - llx, ury - lly);

        let prefix = Content {
            operations: vec![
                Operation::new("q", vec![]),
                cm(rotation_matrix(angle, width, height)),
                cm([1.0, 0.0, 0.0, 1.0, -llx, -lly]),
            ],
        };
        let suffix = Content {
            operations: vec![Operation::new("Q", vec![])],
        };
        let prefix_id = doc.add_object(Stream::new(Dictionary::new(), encode(&prefix)?));
        let suffix_id = doc.add_object(Stream::new(Dictionary::new(), encode(&suffix)?));

        page::materialize_inherited(&mut doc, page_id)?;
        let mut contents = vec![Object::Reference(prefix_id)];
        contents.extend(page::content_refs(&doc, doc.get_dictionary(page_id).map_err(op_err)?));
        contents.push(Object::Reference(suffix_id));

        let (new_width, new_height) = if angle == 180 { (width, height) } else { (height, width) };
        let page_dict = page::page_dict_mut(&mut doc, page_id)?;
        page_dict.set("Contents", contents);
        page_dict.set(
            "MediaBox",
            vec![0.into(), 0.into(), Object::Real(new_width), Object::Real(new_height)],
        );
        page_dict.remove(b"CropBox");
        page_dict.set("Rotate", 0);
        rotated += 1;
    }

    debug!(rotated, "Normalized page rotation");

    doc.compress();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| FormFillError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

fn encode(content: &Content) -> Result<Vec<u8>> {
    content
        .encode()
        .map_err(|e| FormFillError::OperationError(format!("Cannot encode content: {}", e)))
}

fn op_err(e: lopdf::Error) -> FormFillError {
    FormFillError::OperationError(e.to_string())
}

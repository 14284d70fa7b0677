//! Page dictionary helpers shared by assembly, merging and template tools.

use crate::error::{FormFillError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Attributes a page may inherit from its page tree ancestors.
pub const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

const MAX_TREE_DEPTH: usize = 32;

/// Follow one level of indirection.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

pub fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(n) => Some(*n),
        _ => None,
    }
}

/// Value of `key` on the page or the nearest ancestor that defines it,
/// with a top-level reference resolved.
pub fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value).clone());
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Copy every inherited attribute onto the page itself so the page no
/// longer depends on its parent node.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let values: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter_map(|key| inherited(doc, page_id, key).map(|value| (*key, value)))
        .collect();

    let page = page_dict_mut(doc, page_id)?;
    for (key, value) in values {
        page.set(key, value);
    }
    Ok(())
}

pub fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_dictionary_mut(page_id)
        .map_err(|e| FormFillError::OperationError(format!("Page {:?} is not a dictionary: {}", page_id, e)))
}

/// `[llx, lly, urx, ury]` of the page's MediaBox.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4]> {
    let value = inherited(doc, page_id, b"MediaBox")
        .ok_or_else(|| FormFillError::ParseError("Page has no MediaBox".into()))?;
    let array = value
        .as_array()
        .map_err(|_| FormFillError::ParseError("MediaBox is not an array".into()))?;

    if array.len() != 4 {
        return Err(FormFillError::ParseError("MediaBox must have 4 elements".into()));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = number(resolve(doc, obj))
            .ok_or_else(|| FormFillError::ParseError(format!("MediaBox element {} is not a number", i)))?;
    }
    Ok(result)
}

/// Page rotation normalized to 0, 90, 180 or 270.
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited(doc, page_id, b"Rotate")
        .and_then(|value| value.as_i64().ok())
        .map(|angle| angle.rem_euclid(360))
        .unwrap_or(0)
}

/// Content stream references of a page in drawing order.
pub fn content_refs(doc: &Document, page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

pub fn first_page(doc: &Document) -> Result<ObjectId> {
    doc.get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| FormFillError::ParseError("Document has no pages".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{single_page_pdf, TestPage};

    #[test]
    fn test_media_box_is_inherited_from_parent() {
        let bytes = single_page_pdf(&TestPage {
            inherit_media_box: true,
            ..TestPage::default()
        });
        let doc = Document::load_mem(&bytes).unwrap();
        let page = first_page(&doc).unwrap();
        assert_eq!(media_box(&doc, page).unwrap(), [0.0, 0.0, 612.0, 792.0]);
    }

    #[test]
    fn test_rotation_is_normalized() {
        let bytes = single_page_pdf(&TestPage {
            rotate: Some(-90),
            ..TestPage::default()
        });
        let doc = Document::load_mem(&bytes).unwrap();
        let page = first_page(&doc).unwrap();
        assert_eq!(rotation(&doc, page), 270);
    }

    #[test]
    fn test_materialize_copies_parent_attributes() {
        let bytes = single_page_pdf(&TestPage {
            inherit_media_box: true,
            ..TestPage::default()
        });
        let mut doc = Document::load_mem(&bytes).unwrap();
        let page = first_page(&doc).unwrap();
        materialize_inherited(&mut doc, page).unwrap();
        assert!(doc.get_dictionary(page).unwrap().has(b"MediaBox"));
    }
}

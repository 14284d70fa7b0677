//! Concatenates filled pages into the final per-row document.

use crate::error::{FormFillError, Result};
use crate::page;
use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;
use tracing::debug;

/// Merge PDFs into one, keeping document order and page order.
///
/// Every page gets its inherited attributes copied onto itself and is
/// hung directly under the first document's page tree root, so pages keep
/// their size and resources no matter which tree they came from.
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>> {
    let mut documents = documents.into_iter();
    let first = documents
        .next()
        .ok_or_else(|| FormFillError::OperationError("No documents to merge".into()))?;
    let rest: Vec<Vec<u8>> = documents.collect();

    if rest.is_empty() {
        return Ok(first);
    }

    let mut dest = load(&first, 0)?;
    let pages_id = pages_root(&dest)?;
    let mut page_refs = flattened_pages(&mut dest)?;

    for (i, bytes) in rest.iter().enumerate() {
        let mut source = load(bytes, i + 1)?;
        let source_pages = flattened_pages(&mut source)?;

        // Shift source IDs past everything already in the destination.
        let id_offset = dest.max_id;
        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects.insert(new_id, remap_object_refs(object, id_offset));
        }
        page_refs.extend(source_pages.iter().map(|id| (id.0 + id_offset, id.1)));
        dest.max_id = (source.max_id + id_offset).max(dest.max_id);
    }

    update_page_tree(&mut dest, pages_id, &page_refs)?;
    debug!(documents = rest.len() + 1, pages = page_refs.len(), "Merged documents");

    // Catalogs and page tree nodes of the sources are unreachable now.
    dest.prune_objects();
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| FormFillError::OperationError(format!("Failed to save merged PDF: {}", e)))?;
    Ok(buffer)
}

/// Read and merge PDF files in the given order.
pub fn merge_sequence(paths: &[PathBuf]) -> Result<Vec<u8>> {
    let documents = paths
        .iter()
        .map(std::fs::read)
        .collect::<std::io::Result<Vec<_>>>()?;
    merge_documents(documents)
}

fn load(bytes: &[u8], index: usize) -> Result<Document> {
    Document::load_mem(bytes)
        .map_err(|e| FormFillError::ParseError(format!("Failed to load document {}: {}", index, e)))
}

/// Page IDs in order, each made independent of its ancestors.
fn flattened_pages(doc: &mut Document) -> Result<Vec<ObjectId>> {
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in &pages {
        page::materialize_inherited(doc, *page_id)?;
    }
    Ok(pages)
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| FormFillError::OperationError("No Root in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| FormFillError::OperationError("No Pages in catalog".into()))
}

/// Recursively shift object references by `offset`.
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(arr.into_iter().map(|o| remap_object_refs(o, offset)).collect()),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

fn update_page_tree(doc: &mut Document, pages_id: ObjectId, page_refs: &[ObjectId]) -> Result<()> {
    for page_id in page_refs {
        page::page_dict_mut(doc, *page_id)?.set("Parent", Object::Reference(pages_id));
    }

    let pages_dict = doc
        .get_dictionary_mut(pages_id)
        .map_err(|_| FormFillError::OperationError("Invalid pages dictionary".into()))?;
    pages_dict.set(
        "Kids",
        page_refs.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
    );
    pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    Ok(())
}

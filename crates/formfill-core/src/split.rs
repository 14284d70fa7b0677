//! Installing an uploaded contract: page 1 becomes the fillable template,
//! page 2 the terms page appended to every document.

use crate::error::{FormFillError, Result};
use lopdf::Document;
use tracing::debug;

const FIRST_PAGE: u32 = 1;
const TERMS_PAGE: u32 = 2;

/// Split a full contract PDF into the page-1 template and the terms page.
/// Pages after the terms page are dropped.
pub fn split_contract_template(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let doc = Document::load_mem(bytes).map_err(|e| FormFillError::ParseError(e.to_string()))?;
    let page_count = doc.get_pages().len() as u32;
    if page_count < TERMS_PAGE {
        return Err(FormFillError::Template(format!(
            "Contract PDF needs at least 2 pages, found {}",
            page_count
        )));
    }
    debug!(page_count, "Splitting contract template");

    let first = single_page(doc.clone(), FIRST_PAGE, page_count)?;
    let terms = single_page(doc, TERMS_PAGE, page_count)?;
    Ok((first, terms))
}

/// Reduce `doc` to one page and serialize it.
fn single_page(mut doc: Document, keep: u32, page_count: u32) -> Result<Vec<u8>> {
    let others: Vec<u32> = (1..=page_count).filter(|page| *page != keep).collect();
    doc.delete_pages(&others);
    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| FormFillError::OperationError(e.to_string()))?;
    Ok(buffer)
}

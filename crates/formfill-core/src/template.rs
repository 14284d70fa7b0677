//! Form templates: the blank VV and OL PDFs the overlays are drawn onto.

use crate::config::TemplatePaths;
use crate::error::{FormFillError, Result};
use crate::page;
use lopdf::{Document, ObjectId};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Size of a page in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub fn of_page(doc: &Document, page_id: ObjectId) -> Result<Self> {
        let [llx, lly, urx, ury] = page::media_box(doc, page_id)?;
        Ok(Self {
            width: (urx - llx).abs(),
            height: (ury - lly).abs(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Contract,
    ContractTerms,
    ObjectList,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Contract => "contract",
            TemplateKind::ContractTerms => "contract terms",
            TemplateKind::ObjectList => "object list",
        };
        f.write_str(name)
    }
}

/// A parsed template kept as bytes; every fill starts from a fresh copy.
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Vec<u8>,
    page_count: usize,
    geometry: PageGeometry,
}

impl Template {
    pub fn load(kind: TemplateKind, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            FormFillError::Template(format!("Cannot read {} template {}: {}", kind, path.display(), e))
        })?;
        debug!(%kind, path = %path.display(), size = bytes.len(), "Read template");
        Self::from_bytes(kind, bytes)
    }

    pub fn from_bytes(kind: TemplateKind, bytes: Vec<u8>) -> Result<Self> {
        let doc = Document::load_mem(&bytes)
            .map_err(|e| FormFillError::Template(format!("{} template is not a readable PDF: {}", kind, e)))?;

        let pages = doc.get_pages();
        let first = pages
            .values()
            .next()
            .copied()
            .ok_or_else(|| FormFillError::Template(format!("{} template has no pages", kind)))?;

        let geometry = PageGeometry::of_page(&doc, first)
            .map_err(|e| FormFillError::Template(format!("{} template: {}", kind, e)))?;

        Ok(Self {
            bytes,
            page_count: pages.len(),
            geometry,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Geometry of the first page.
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// A fresh, independent parse of the template.
    pub fn document(&self) -> Result<Document> {
        Document::load_mem(&self.bytes).map_err(|e| FormFillError::ParseError(e.to_string()))
    }
}

/// Every template one batch needs.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub contract: Template,
    /// Optional second contract page appended unchanged after page 1.
    pub contract_terms: Option<Template>,
    pub object_list: Template,
}

impl TemplateSet {
    pub fn load(paths: &TemplatePaths) -> Result<Self> {
        let contract = Template::load(TemplateKind::Contract, &paths.contract)?;
        let contract_terms = paths
            .contract_terms
            .as_deref()
            .map(|path| Template::load(TemplateKind::ContractTerms, path))
            .transpose()?;
        let object_list = Template::load(TemplateKind::ObjectList, &paths.object_list)?;

        info!(
            contract_pages = contract.page_count(),
            terms = contract_terms.is_some(),
            object_list_pages = object_list.page_count(),
            "Templates loaded"
        );

        Ok(Self {
            contract,
            contract_terms,
            object_list,
        })
    }
}

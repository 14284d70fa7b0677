//! Stamps rendered overlays onto template pages.

use crate::error::{FormFillError, Result};
use crate::overlay::OverlayOp;
use crate::page;
use crate::render::render_ops;
use crate::template::Template;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// Draw `ops` on the first page of `template` and return a one-page PDF.
///
/// The template content is wrapped in `q`/`Q` so graphics state it leaves
/// behind cannot leak into the overlay. With no ops the template page is
/// returned unchanged.
pub fn assemble(ops: &[OverlayOp], template: &Template) -> Result<Vec<u8>> {
    if ops.is_empty() && template.page_count() == 1 {
        return Ok(template.bytes().to_vec());
    }

    let mut doc = template.document()?;
    keep_first_page(&mut doc);

    if !ops.is_empty() {
        stamp_first_page(&mut doc, ops)?;
    }

    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| FormFillError::OperationError(format!("Failed to save filled page: {}", e)))?;
    Ok(buffer)
}

fn keep_first_page(doc: &mut Document) {
    let page_count = doc.get_pages().len() as u32;
    for page_num in (2..=page_count).rev() {
        doc.delete_pages(&[page_num]);
    }
}

fn stamp_first_page(doc: &mut Document, ops: &[OverlayOp]) -> Result<()> {
    let page_id = page::first_page(doc)?;
    let rendered = render_ops(ops)?;
    debug!(
        ops = ops.len(),
        fonts = rendered.fonts.len(),
        overflowed = rendered.overflowed,
        "Rendered overlay"
    );

    page::materialize_inherited(doc, page_id)?;

    let font_ids: Vec<(&str, ObjectId)> = rendered
        .fonts
        .iter()
        .map(|font| {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            (font.resource_name(), id)
        })
        .collect();

    let (mut resources, existing) = {
        let page_dict = doc
            .get_dictionary(page_id)
            .map_err(|e| FormFillError::OperationError(e.to_string()))?;
        (
            resolved_dict(doc, page_dict.get(b"Resources").ok()),
            page::content_refs(doc, page_dict),
        )
    };
    let mut fonts = resolved_dict(doc, resources.get(b"Font").ok());
    for (name, id) in font_ids {
        fonts.set(name, id);
    }
    resources.set("Font", fonts);

    let mut contents = vec![Object::Reference(add_content(doc, "q")?)];
    contents.extend(existing);
    contents.push(Object::Reference(add_content(doc, "Q")?));
    contents.push(Object::Reference(
        doc.add_object(Stream::new(Dictionary::new(), rendered.content)),
    ));

    let page_dict = page::page_dict_mut(doc, page_id)?;
    page_dict.set("Resources", resources);
    page_dict.set("Contents", contents);
    Ok(())
}

/// An owned copy of a (possibly indirect) dictionary, empty when absent.
fn resolved_dict(doc: &Document, obj: Option<&Object>) -> Dictionary {
    obj.map(|obj| page::resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_default()
}

fn add_content(doc: &mut Document, operator: &str) -> Result<ObjectId> {
    let content = Content {
        operations: vec![Operation::new(operator, vec![])],
    }
    .encode()
    .map_err(|e| FormFillError::OperationError(e.to_string()))?;
    Ok(doc.add_object(Stream::new(Dictionary::new(), content)))
}

/// A run of consecutive items and where it starts in the full list.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<'a, T> {
    pub offset: usize,
    pub items: &'a [T],
}

/// Split `items` into runs of at most `size` (at least 1) items.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<Chunk<'_, T>> {
    let size = size.max(1);
    items
        .chunks(size)
        .enumerate()
        .map(|(i, items)| Chunk {
            offset: i * size,
            items,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::StandardFont;
    use crate::overlay::{Align, Label};
    use crate::template::TemplateKind;
    use crate::testing::{page_texts, pdf_with_pages, single_page_pdf, TestPage};
    use pretty_assertions::assert_eq;

    fn label(text: &str, font: StandardFont) -> OverlayOp {
        OverlayOp::Label(Label {
            text: text.to_string(),
            x: 100.0,
            y: 100.0,
            font,
            font_size: 9.0,
            align: Align::Left,
        })
    }

    fn template(page: TestPage) -> Template {
        Template::from_bytes(TemplateKind::Contract, single_page_pdf(&page)).unwrap()
    }

    #[test]
    fn test_no_ops_returns_template_unchanged() {
        let template = template(TestPage::default());
        let out = assemble(&[], &template).unwrap();
        assert_eq!(out, template.bytes());
    }

    #[test]
    fn test_overlay_follows_template_content() {
        let template = template(TestPage::default());
        let out = assemble(&[label("X", StandardFont::Helvetica)], &template).unwrap();
        assert_eq!(page_texts(&out), vec![vec!["Template".to_string(), "X".to_string()]]);
    }

    #[test]
    fn test_fonts_are_added_next_to_existing_ones() {
        let template = template(TestPage::default());
        let ops = [
            label("X", StandardFont::Helvetica),
            label("31", StandardFont::HelveticaBold),
        ];
        let out = assemble(&ops, &template).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let page_id = page::first_page(&doc).unwrap();
        let resources = page::inherited(&doc, page_id, b"Resources").unwrap();
        let fonts = resolved_dict(&doc, resources.as_dict().unwrap().get(b"Font").ok());
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(b"FfHelv"));
        assert!(fonts.has(b"FfHelvB"));

        let bold = page::resolve(&doc, fonts.get(b"FfHelvB").unwrap()).as_dict().unwrap();
        assert_eq!(bold.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
    }

    #[test]
    fn test_inherited_page_attributes_survive() {
        let template = template(TestPage {
            inherit_media_box: true,
            ..TestPage::default()
        });
        let out = assemble(&[label("X", StandardFont::Helvetica)], &template).unwrap();
        let doc = Document::load_mem(&out).unwrap();
        let page_id = page::first_page(&doc).unwrap();
        assert_eq!(page::media_box(&doc, page_id).unwrap(), [0.0, 0.0, 612.0, 792.0]);
        let fonts = page::inherited(&doc, page_id, b"Resources").unwrap();
        assert!(resolved_dict(&doc, fonts.as_dict().unwrap().get(b"Font").ok()).has(b"F1"));
    }

    #[test]
    fn test_only_first_template_page_is_used() {
        let bytes = pdf_with_pages(&[
            TestPage {
                text: "One".to_string(),
                ..TestPage::default()
            },
            TestPage {
                text: "Two".to_string(),
                ..TestPage::default()
            },
        ]);
        let template = Template::from_bytes(TemplateKind::ObjectList, bytes).unwrap();
        let out = assemble(&[label("X", StandardFont::Helvetica)], &template).unwrap();
        assert_eq!(page_texts(&out), vec![vec!["One".to_string(), "X".to_string()]]);

        let blank = assemble(&[], &template).unwrap();
        assert_eq!(page_texts(&blank), vec![vec!["One".to_string()]]);
    }

    #[test]
    fn test_chunk_offsets() {
        let items: Vec<u32> = (1..=14).collect();
        let chunks = chunk(&items, 12);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[0].items.len(), 12);
        assert_eq!(chunks[1].offset, 12);
        assert_eq!(chunks[1].items, &[13, 14]);
    }

    #[test]
    fn test_chunk_of_nothing_is_empty() {
        let items: Vec<u32> = Vec::new();
        assert!(chunk(&items, 12).is_empty());
        assert_eq!(chunk(&[1, 2], 0).len(), 2);
    }
}

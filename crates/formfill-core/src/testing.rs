//! Small generated PDFs for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

#[derive(Debug, Clone)]
pub struct TestPage {
    pub width: i64,
    pub height: i64,
    pub rotate: Option<i64>,
    /// Put MediaBox and Resources on the Pages node instead of the page.
    pub inherit_media_box: bool,
    pub text: String,
}

impl Default for TestPage {
    fn default() -> Self {
        Self {
            width: 612,
            height: 792,
            rotate: None,
            inherit_media_box: false,
            text: "Template".to_string(),
        }
    }
}

pub fn single_page_pdf(page: &TestPage) -> Vec<u8> {
    pdf_with_pages(std::slice::from_ref(page))
}

pub fn pdf_with_pages(pages: &[TestPage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });
    let resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };

    let mut pages_dict = Dictionary::new();
    let mut page_ids = Vec::new();
    for setup in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(setup.text.clone().into_bytes(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let media_box: Object = vec![0.into(), 0.into(), setup.width.into(), setup.height.into()].into();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if setup.inherit_media_box {
            pages_dict.set("MediaBox", media_box);
            pages_dict.set("Resources", resources.clone());
        } else {
            page.set("MediaBox", media_box);
            page.set("Resources", resources.clone());
        }
        if let Some(angle) = setup.rotate {
            page.set("Rotate", angle);
        }
        page_ids.push(doc.add_object(page));
    }

    pages_dict.set("Type", "Pages");
    pages_dict.set("Count", page_ids.len() as i64);
    pages_dict.set(
        "Kids",
        page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Strings shown with `Tj` on each page, in page order.
pub fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).unwrap();
            Content::decode(&content)
                .unwrap()
                .operations
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(raw, _)) => Some(decode_win_ansi(raw)),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn decode_win_ansi(raw: &[u8]) -> String {
    raw.iter()
        .map(|b| match b {
            0x80 => '€',
            _ => *b as char,
        })
        .collect()
}

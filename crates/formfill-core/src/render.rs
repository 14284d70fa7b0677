//! Renders overlay ops into a PDF content stream.

use crate::error::{FormFillError, Result};
use crate::fit::fit;
use crate::metrics::{encode_win_ansi, StandardFont, TextMeasure};
use crate::overlay::{Align, OverlayOp};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::BTreeSet;
use tracing::warn;

/// An encoded content stream plus the font resources it refers to.
#[derive(Debug, Clone, Default)]
pub struct RenderedOverlay {
    pub content: Vec<u8>,
    pub fonts: BTreeSet<StandardFont>,
    /// Fitted fields that did not fit their box even at the minimum size.
    pub overflowed: usize,
}

pub fn render_ops(ops: &[OverlayOp]) -> Result<RenderedOverlay> {
    let mut rendered = RenderedOverlay::default();
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("g", vec![0.into()]),
    ];

    for op in ops {
        match op {
            OverlayOp::Fit(instruction) => {
                let Some(outcome) = fit(&instruction.text, &instruction.params(), &instruction.font) else {
                    continue;
                };
                if outcome.is_overflow() {
                    warn!(
                        text = %instruction.text,
                        box_width = instruction.box_width,
                        "Text does not fit its box at the minimum size"
                    );
                    rendered.overflowed += 1;
                }
                let plan = outcome.into_plan();
                for line in plan.place(instruction.x, instruction.y) {
                    show_text(&mut operations, instruction.font, plan.font_size as f32, line.x, line.y, &line.text);
                }
                rendered.fonts.insert(instruction.font);
            }
            OverlayOp::Label(label) => {
                let x = match label.align {
                    Align::Left => label.x,
                    Align::Right => label.x - label.font.string_width(&label.text, label.font_size),
                };
                show_text(&mut operations, label.font, label.font_size, x, label.y, &label.text);
                rendered.fonts.insert(label.font);
            }
        }
    }

    operations.push(Operation::new("Q", vec![]));
    rendered.content = Content { operations }
        .encode()
        .map_err(|e| FormFillError::OperationError(format!("Cannot encode overlay: {}", e)))?;
    Ok(rendered)
}

fn show_text(operations: &mut Vec<Operation>, font: StandardFont, size: f32, x: f32, y: f32, text: &str) {
    operations.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.resource_name().into(), Object::Real(size)]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]);
}

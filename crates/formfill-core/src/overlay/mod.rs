//! Overlay instructions for the contract (VV) and object-list (OL) forms.
//!
//! Builders turn a prepared row into a flat list of [`OverlayOp`]s in page
//! points. Nothing here touches PDF objects; see [`crate::render`] for that.

pub mod annex;
pub mod contract;
pub mod layout;

pub use annex::{AnnexOverlay, AnnexPage};
pub use contract::ContractOverlay;
pub use layout::{AnnexLayout, ContractLayout, MarkSlots, Point, Slot};

use crate::fit::FitParams;
use crate::metrics::StandardFont;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

pub fn mm(value: f32) -> f32 {
    value * MM
}

/// Font sizes and line budget for fitted fields on one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font_size: u16,
    pub min_font_size: u16,
    pub max_lines: usize,
}

/// Text fitted into a box whose left edge is `x` and whose lines are
/// centred on the baseline `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub box_width: f32,
    pub max_lines: usize,
    pub font_size: u16,
    pub min_font_size: u16,
    pub font: StandardFont,
}

impl DrawInstruction {
    pub fn params(&self) -> FitParams {
        FitParams {
            box_width: self.box_width,
            max_lines: self.max_lines,
            start_font_size: self.font_size,
            min_font_size: self.min_font_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the right edge of the text.
    Right,
}

/// Text drawn as-is, without fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: StandardFont,
    pub font_size: f32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayOp {
    Fit(DrawInstruction),
    Label(Label),
}

impl OverlayOp {
    pub fn text(&self) -> &str {
        match self {
            OverlayOp::Fit(instruction) => &instruction.text,
            OverlayOp::Label(label) => &label.text,
        }
    }
}

/// Collects ops in drawing order.
#[derive(Debug, Default)]
pub(crate) struct OpSink {
    ops: Vec<OverlayOp>,
}

impl OpSink {
    /// Fitted text in `slot`; blank text is skipped.
    pub(crate) fn fit(&mut self, text: &str, slot: Slot, style: TextStyle) {
        if text.trim().is_empty() {
            return;
        }
        self.ops.push(OverlayOp::Fit(DrawInstruction {
            text: text.to_string(),
            x: mm(slot.x),
            y: mm(slot.y),
            box_width: mm(slot.box_width),
            max_lines: style.max_lines,
            font_size: style.font_size,
            min_font_size: style.min_font_size,
            font: StandardFont::Helvetica,
        }));
    }

    /// Plain label at a millimetre position.
    pub(crate) fn label(&mut self, text: String, at: Point, font_size: f32) {
        self.ops.push(OverlayOp::Label(Label {
            text,
            x: mm(at.x),
            y: mm(at.y),
            font: StandardFont::Helvetica,
            font_size,
            align: Align::Left,
        }));
    }

    pub(crate) fn push(&mut self, op: OverlayOp) {
        self.ops.push(op);
    }

    pub(crate) fn finish(self) -> Vec<OverlayOp> {
        self.ops
    }
}

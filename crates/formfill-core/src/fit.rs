//! Text fitting for fixed-width form boxes.
//!
//! Given a string and a box, pick the largest font size (stepping down one
//! point at a time) at which the text wraps into at most `max_lines` lines.
//! Words break at spaces and after hyphens; a word wider than the box is
//! split between characters. Plans with more than one line are set one
//! point smaller than the size they were packed at, which keeps two-line
//! fields visually compact.
//!
//! When no size fits, the text is split per character at the minimum size
//! and cut to `max_lines`. That plan may overflow the box and is returned as
//! [`FitOutcome::Overflow`] so callers can tell it apart.

use crate::metrics::TextMeasure;

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

/// Box and font-size constraints for one fitted field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub box_width: f32,
    pub max_lines: usize,
    pub start_font_size: u16,
    pub min_font_size: u16,
}

/// Lines and the size they are set at.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub lines: Vec<String>,
    pub font_size: u16,
}

/// A line of a plan positioned on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl RenderPlan {
    pub fn line_height(&self) -> f32 {
        self.font_size as f32 * LINE_SPACING
    }

    /// Position the lines as a block vertically centred on `y_base`.
    pub fn place(&self, x: f32, y_base: f32) -> Vec<PlacedLine> {
        let line_height = self.line_height();
        let total_height = self.lines.len() as f32 * line_height;
        let start_y = y_base + (total_height - line_height) / 2.0;

        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| PlacedLine {
                text: line.clone(),
                x,
                y: start_y - i as f32 * line_height,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    /// Every line fits the box and the line budget.
    Fitted(RenderPlan),
    /// Best-effort plan at the minimum size; lines may exceed the box.
    Overflow(RenderPlan),
}

impl FitOutcome {
    pub fn plan(&self) -> &RenderPlan {
        match self {
            FitOutcome::Fitted(plan) | FitOutcome::Overflow(plan) => plan,
        }
    }

    pub fn into_plan(self) -> RenderPlan {
        match self {
            FitOutcome::Fitted(plan) | FitOutcome::Overflow(plan) => plan,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, FitOutcome::Overflow(_))
    }
}

/// Fit `text` into the box described by `params`.
///
/// Returns `None` for text without any visible token.
pub fn fit<M: TextMeasure + ?Sized>(text: &str, params: &FitParams, font: &M) -> Option<FitOutcome> {
    if text.trim().is_empty() {
        return None;
    }

    let tokens = tokenize(text);
    for size in (params.min_font_size..=params.start_font_size).rev() {
        if let Some(plan) = attempt_with_tokens(&tokens, size, params, font) {
            return Some(FitOutcome::Fitted(plan));
        }
    }

    let min = params.min_font_size;
    let mut lines = break_chars(text, min as f32, params.box_width, font);
    lines.truncate(params.max_lines);
    Some(FitOutcome::Overflow(RenderPlan {
        lines,
        font_size: min,
    }))
}

/// Try a single candidate size. `None` when the size is rejected.
pub fn attempt<M: TextMeasure + ?Sized>(
    text: &str,
    size: u16,
    params: &FitParams,
    font: &M,
) -> Option<RenderPlan> {
    attempt_with_tokens(&tokenize(text), size, params, font)
}

fn attempt_with_tokens<M: TextMeasure + ?Sized>(
    tokens: &[&str],
    size: u16,
    params: &FitParams,
    font: &M,
) -> Option<RenderPlan> {
    let lines = pack(tokens, size as f32, params.box_width, font);

    let effective = if lines.len() > 1 {
        size.checked_sub(1).filter(|s| *s >= params.min_font_size)?
    } else {
        size
    };

    let fits = lines.len() <= params.max_lines
        && lines
            .iter()
            .all(|line| font.string_width(line, effective as f32) <= params.box_width);

    fits.then_some(RenderPlan {
        lines,
        font_size: effective,
    })
}

/// Split on spaces, then after every hyphen. The hyphen stays on the
/// fragment before it.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(' ')
        .flat_map(|word| word.split_inclusive('-'))
        .collect()
}

fn pack<M: TextMeasure + ?Sized>(tokens: &[&str], size: f32, box_width: f32, font: &M) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in tokens {
        let sep = if current.is_empty() || current.ends_with('-') {
            ""
        } else {
            " "
        };
        let candidate = format!("{current}{sep}{token}");

        if font.string_width(&candidate, size) <= box_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current = (*token).to_string();

        if font.string_width(&current, size) > box_width {
            let mut parts = break_chars(&current, size, box_width, font);
            current = parts.pop().unwrap_or_default();
            lines.extend(parts);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Greedy per-character split. A character that is wider than the box on
/// its own still gets a fragment of its own.
fn break_chars<M: TextMeasure + ?Sized>(
    word: &str,
    size: f32,
    box_width: f32,
    font: &M,
) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if current.is_empty() || font.string_width(&candidate, size) <= box_width {
            current = candidate;
        } else {
            parts.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

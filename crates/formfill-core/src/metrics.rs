//! Glyph metrics for the standard PDF fonts used on the forms.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for the
//! WinAnsi code points we can encounter in German addresses.

use serde::{Deserialize, Serialize};

/// Anything that can measure a string at a given font size.
pub trait TextMeasure {
    /// Width of `text` in points when set at `size` points.
    fn string_width(&self, text: &str, size: f32) -> f32;
}

/// The standard-14 fonts the overlays are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the overlay content stream refers to.
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "FfHelv",
            StandardFont::HelveticaBold => "FfHelvB",
        }
    }

    fn glyph_width(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            let idx = (code - 32) as usize;
            return match self {
                StandardFont::Helvetica => HELVETICA_ASCII[idx],
                StandardFont::HelveticaBold => HELVETICA_BOLD_ASCII[idx],
            };
        }
        let bold = matches!(self, StandardFont::HelveticaBold);
        match ch {
            '\u{a0}' => 278,
            'Ä' => if bold { 722 } else { 667 },
            'Ö' => 778,
            'Ü' => 722,
            'ä' => 556,
            'ö' | 'ü' => if bold { 611 } else { 556 },
            'ß' => 611,
            'é' | 'è' | 'ê' | 'á' | 'à' | 'â' => 556,
            'É' | 'È' => 667,
            'ç' => if bold { 556 } else { 500 },
            'ñ' => if bold { 611 } else { 556 },
            '€' | '§' => 556,
            '°' => 400,
            '´' => 333,
            '·' => 278,
            '×' => 584,
            '–' => 556,
            '—' => 1000,
            '‘' | '’' | '‚' => if bold { 278 } else { 222 },
            '“' | '”' | '„' => if bold { 500 } else { 333 },
            _ => FALLBACK_WIDTH,
        }
    }
}

impl TextMeasure for StandardFont {
    fn string_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.glyph_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

const FALLBACK_WIDTH: u16 = 556;

/// Helvetica, code points 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold, code points 32..=126.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Encode text for a simple font using WinAnsiEncoding.
///
/// Characters without a WinAnsi code point become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            match ch {
                _ if code < 0x80 => code as u8,
                _ if (0xA0..=0xFF).contains(&code) => code as u8,
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                _ => b'?',
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_width_matches_afm() {
        // Digits are 556 units in both weights.
        let w = StandardFont::Helvetica.string_width("10", 10.0);
        assert!((w - 11.12).abs() < 1e-4);
        let b = StandardFont::HelveticaBold.string_width("10", 10.0);
        assert!((b - w).abs() < 1e-4);
    }

    #[test]
    fn test_width_scales_linearly_with_size() {
        let font = StandardFont::Helvetica;
        let small = font.string_width("Hauptstraße", 6.0);
        let large = font.string_width("Hauptstraße", 12.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_empty_string_has_zero_width() {
        assert_eq!(StandardFont::Helvetica.string_width("", 8.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider_for_lowercase() {
        let regular = StandardFont::Helvetica.string_width("bodo", 9.0);
        let bold = StandardFont::HelveticaBold.string_width("bodo", 9.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_encode_win_ansi_umlauts_and_euro() {
        assert_eq!(encode_win_ansi("Ä€"), vec![0xC4, 0x80]);
        assert_eq!(encode_win_ansi("ß"), vec![0xDF]);
        assert_eq!(encode_win_ansi("a\u{4e2d}"), vec![b'a', b'?']);
    }
}

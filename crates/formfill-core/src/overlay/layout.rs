//! Field coordinates of the form templates, in millimetres from the
//! bottom-left page corner.
//!
//! The defaults match the current VV and OL templates. Both layouts can be
//! overridden from the configuration file when a template is revised.

use serde::{Deserialize, Serialize};

/// A fitted-text box: left edge, baseline and width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub box_width: f32,
}

const fn slot(x: f32, y: f32, box_width: f32) -> Slot {
    Slot { x, y, box_width }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

const fn point(x: f32, y: f32) -> Point {
    Point { x, y }
}

/// The three alternative checkbox positions of a salutation row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkSlots {
    pub company: Point,
    pub male: Point,
    pub female: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractLayout {
    pub mark_font_size: f32,
    pub fee_slots: [Slot; 2],
    pub multi_object_mark: Point,
    pub agent_marks: MarkSlots,
    pub partner_marks: MarkSlots,

    pub object_street: Slot,
    pub object_number: Slot,
    pub object_postal_code: Slot,
    pub object_city: Slot,
    pub unit_count: Point,
    pub agreement_date: Slot,

    pub agent_company: Slot,
    pub agent_name: Slot,
    pub agent_first_name: Slot,
    pub agent_street: Slot,
    pub agent_number: Slot,
    pub agent_postal_code: Slot,
    pub agent_city: Slot,

    pub partner_company: Slot,
    pub partner_name: Slot,
    pub partner_first_name: Slot,
    pub partner_street: Slot,
    pub partner_number: Slot,
    /// Number box used when the partner address is taken from the object.
    pub partner_fallback_number: Slot,
    pub partner_postal_code: Slot,
    pub partner_city: Slot,
    pub partner_fallback_postal_code: Slot,
    pub partner_fallback_city: Slot,
}

impl Default for ContractLayout {
    fn default() -> Self {
        Self {
            mark_font_size: 9.0,
            fee_slots: [slot(36.0, 95.5, 50.0), slot(93.5, 95.5, 50.0)],
            multi_object_mark: point(71.0, 201.0),
            agent_marks: MarkSlots {
                company: point(141.5, 238.0),
                male: point(115.0, 238.0),
                female: point(128.5, 238.0),
            },
            partner_marks: MarkSlots {
                company: point(57.5, 83.5),
                male: point(31.0, 83.5),
                female: point(44.5, 83.5),
            },

            object_street: slot(38.0, 210.0, 50.0),
            object_number: slot(94.0, 210.0, 45.0),
            object_postal_code: slot(38.0, 205.5, 45.0),
            object_city: slot(58.0, 205.5, 45.0),
            unit_count: point(55.0, 201.0),
            agreement_date: slot(65.0, 167.0, 45.0),

            agent_company: slot(122.0, 228.5, 70.0),
            agent_name: slot(122.0, 223.5, 70.0),
            agent_first_name: slot(127.0, 218.5, 65.0),
            agent_street: slot(122.0, 213.5, 50.0),
            agent_number: slot(178.0, 213.5, 45.0),
            agent_postal_code: slot(122.0, 208.5, 45.0),
            agent_city: slot(142.0, 208.5, 50.0),

            partner_company: slot(38.0, 75.5, 70.0),
            partner_name: slot(38.0, 70.5, 70.0),
            partner_first_name: slot(42.0, 66.5, 65.0),
            partner_street: slot(38.0, 62.5, 50.0),
            partner_number: slot(94.0, 62.5, 20.0),
            partner_fallback_number: slot(93.0, 62.5, 12.0),
            partner_postal_code: slot(38.0, 58.0, 45.0),
            partner_city: slot(58.0, 58.0, 50.0),
            partner_fallback_postal_code: slot(38.0, 58.0, 70.0),
            partner_fallback_city: slot(58.0, 58.0, 70.0),
        }
    }
}

/// Table geometry of the object-list annex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnexLayout {
    pub first_row_y: f32,
    pub row_height: f32,
    /// Rows may not start below this baseline.
    pub bottom_margin: f32,
    pub default_box_width: f32,

    pub line_number_x: f32,
    /// Two-digit line numbers move left to stay aligned.
    pub line_number_x_wide: f32,
    pub address_x: f32,
    pub postal_code_x: f32,
    pub city_x: f32,
    pub city_box_width: f32,
    /// Unit column x for values below 10, below 100 and above.
    pub units_x: [f32; 3],
    pub commercial_units_x: f32,
    pub price_x: [f32; 3],

    pub total_right_inset: f32,
    pub total_top_inset: f32,
    pub total_font_size: f32,
}

impl Default for AnnexLayout {
    fn default() -> Self {
        Self {
            first_row_y: 117.0,
            row_height: 6.5,
            bottom_margin: 25.0,
            default_box_width: 45.0,

            line_number_x: 9.5,
            line_number_x_wide: 8.5,
            address_x: 15.0,
            postal_code_x: 68.0,
            city_x: 82.0,
            city_box_width: 21.0,
            units_x: [186.8, 186.3, 185.7],
            commercial_units_x: 198.0,
            price_x: [228.0, 253.0, 276.0],

            total_right_inset: 19.0,
            total_top_inset: 53.5,
            total_font_size: 9.0,
        }
    }
}

impl AnnexLayout {
    /// Number of table rows that fit on one annex page.
    pub fn rows_per_page(&self) -> usize {
        if self.row_height <= 0.0 || self.first_row_y < self.bottom_margin {
            return 0;
        }
        ((self.first_row_y - self.bottom_margin) / self.row_height).floor() as usize + 1
    }

    pub fn row_y(&self, index: usize) -> f32 {
        self.first_row_y - index as f32 * self.row_height
    }

    pub fn line_number_slot_x(&self, lfd_nr: usize) -> f32 {
        if lfd_nr < 10 {
            self.line_number_x
        } else {
            self.line_number_x_wide
        }
    }

    pub fn units_slot_x(&self, units: u64) -> f32 {
        match units {
            0..=9 => self.units_x[0],
            10..=99 => self.units_x[1],
            _ => self.units_x[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_annex_holds_fifteen_rows() {
        let layout = AnnexLayout::default();
        assert_eq!(layout.rows_per_page(), 15);
        assert!(layout.row_y(14) >= layout.bottom_margin);
        assert!(layout.row_y(15) < layout.bottom_margin);
    }

    #[test]
    fn test_columns_shift_for_wide_numbers() {
        let layout = AnnexLayout::default();
        assert_eq!(layout.line_number_slot_x(9), 9.5);
        assert_eq!(layout.line_number_slot_x(10), 8.5);
        assert_eq!(layout.units_slot_x(9), 186.8);
        assert_eq!(layout.units_slot_x(42), 186.3);
        assert_eq!(layout.units_slot_x(120), 185.7);
    }

    #[test]
    fn test_partial_layout_override_keeps_defaults() {
        let layout: ContractLayout =
            toml::from_str("agreement_date = { x = 60.0, y = 160.0, box_width = 40.0 }").unwrap();
        assert_eq!(layout.agreement_date.x, 60.0);
        assert_eq!(layout.object_city, ContractLayout::default().object_city);
    }
}

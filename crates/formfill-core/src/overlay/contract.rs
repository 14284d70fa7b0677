//! Instructions for page 1 of the management contract (VV).

use super::layout::{ContractLayout, MarkSlots, Point};
use super::{mm, Align, Label, OpSink, OverlayOp, TextStyle};
use crate::address::{split_street_and_number, split_street_and_number_lexicographic};
use crate::calendar::AgreementDate;
use crate::metrics::StandardFont;
use crate::pipeline::NormalizedRow;
use crate::units::parse_unit_total;
use chrono::NaiveDate;
use shared_types::columns;

const MARK: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Salutation {
    Male,
    Female,
}

impl Salutation {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "h" | "herr" => Some(Salutation::Male),
            "f" | "frau" => Some(Salutation::Female),
            _ => None,
        }
    }
}

/// Builds the overlay for one row of the contract form.
#[derive(Debug, Clone)]
pub struct ContractOverlay<'a> {
    layout: &'a ContractLayout,
    style: TextStyle,
    fees: [&'a str; 2],
    today: NaiveDate,
}

impl<'a> ContractOverlay<'a> {
    pub fn new(layout: &'a ContractLayout, style: TextStyle, fees: [&'a str; 2], today: NaiveDate) -> Self {
        Self {
            layout,
            style,
            fees,
            today,
        }
    }

    pub fn build(&self, row: &NormalizedRow) -> Vec<OverlayOp> {
        let layout = self.layout;
        let mut sink = OpSink::default();

        for (fee, slot) in self.fees.iter().zip(layout.fee_slots) {
            sink.fit(fee, slot, self.style);
        }

        let multi_object = row.is_multi_object();
        if multi_object {
            self.mark(&mut sink, layout.multi_object_mark);
        }

        let agent_company = !row.is_empty(columns::AGENT_COMPANY);
        if let Some(at) = select_mark(
            &layout.agent_marks,
            agent_company,
            row.text(columns::AGENT_SALUTATION),
        ) {
            self.mark(&mut sink, at);
        }

        // The partner row always carries a mark; without a salutation the
        // partner is treated as a company.
        let partner_mark = select_mark(
            &layout.partner_marks,
            !row.is_empty(columns::PARTNER_COMPANY),
            row.text(columns::PARTNER_SALUTATION),
        )
        .unwrap_or(layout.partner_marks.company);
        self.mark(&mut sink, partner_mark);

        self.object_fields(&mut sink, row, multi_object);
        self.agent_fields(&mut sink, row);
        self.partner_fields(&mut sink, row);

        sink.finish()
    }

    fn object_fields(&self, sink: &mut OpSink, row: &NormalizedRow, multi_object: bool) {
        let layout = self.layout;
        let style = self.style;

        if !multi_object {
            let first = row.object_addresses().into_iter().next();
            if let Some((street, number)) = first.as_deref().and_then(split_street_and_number) {
                sink.fit(&street, layout.object_street, style);
                sink.fit(&number, layout.object_number, style);
            }
            sink.fit(row.text(columns::OBJECT_POSTAL_CODE), layout.object_postal_code, style);
            sink.fit(row.text(columns::OBJECT_CITY), layout.object_city, style);
        }

        if let Some(total) = parse_unit_total(row.text(columns::UNIT_COUNT)) {
            sink.label(total.to_string(), layout.unit_count, style.font_size as f32);
        }

        let date = AgreementDate::from_today(self.today);
        sink.fit(&date.to_string(), layout.agreement_date, style);
    }

    fn agent_fields(&self, sink: &mut OpSink, row: &NormalizedRow) {
        let layout = self.layout;
        let style = self.style;

        sink.fit(row.text(columns::AGENT_COMPANY), layout.agent_company, style);
        sink.fit(row.text(columns::AGENT_NAME), layout.agent_name, style);
        sink.fit(row.text(columns::AGENT_FIRST_NAME), layout.agent_first_name, style);
        if let Some((street, number)) = split_street_and_number(row.text(columns::AGENT_STREET)) {
            sink.fit(&street, layout.agent_street, style);
            sink.fit(&number, layout.agent_number, style);
        }
        sink.fit(row.text(columns::AGENT_POSTAL_CODE), layout.agent_postal_code, style);
        sink.fit(row.text(columns::AGENT_CITY), layout.agent_city, style);
    }

    fn partner_fields(&self, sink: &mut OpSink, row: &NormalizedRow) {
        let layout = self.layout;
        let style = self.style;

        if row.is_weg() {
            sink.fit(&row.weg_name(), layout.partner_company, style);
        } else {
            sink.fit(row.text(columns::PARTNER_COMPANY), layout.partner_company, style);
        }
        sink.fit(row.text(columns::PARTNER_NAME), layout.partner_name, style);
        sink.fit(row.text(columns::PARTNER_FIRST_NAME), layout.partner_first_name, style);

        let partner_street = row.text(columns::PARTNER_STREET);
        if !partner_street.is_empty() {
            if let Some((street, number)) = split_street_and_number(partner_street) {
                sink.fit(&street, layout.partner_street, style);
                sink.fit(&number, layout.partner_number, style);
            }
        } else if let Some((street, number)) =
            split_street_and_number_lexicographic(row.text(columns::OBJECT_STREET))
        {
            sink.fit(&street, layout.partner_street, style);
            sink.fit(&number, layout.partner_fallback_number, style);
        }

        if row.is_empty(columns::PARTNER_POSTAL_CODE) {
            sink.fit(
                row.text(columns::OBJECT_POSTAL_CODE),
                layout.partner_fallback_postal_code,
                style,
            );
        } else {
            sink.fit(row.text(columns::PARTNER_POSTAL_CODE), layout.partner_postal_code, style);
        }

        if row.is_empty(columns::PARTNER_CITY) {
            sink.fit(row.text(columns::OBJECT_CITY), layout.partner_fallback_city, style);
        } else {
            sink.fit(row.text(columns::PARTNER_CITY), layout.partner_city, style);
        }
    }

    fn mark(&self, sink: &mut OpSink, at: Point) {
        sink.push(OverlayOp::Label(Label {
            text: MARK.to_string(),
            x: mm(at.x),
            y: mm(at.y),
            font: StandardFont::Helvetica,
            font_size: self.layout.mark_font_size,
            align: Align::Left,
        }));
    }
}

/// Company wins over any salutation.
fn select_mark(slots: &MarkSlots, is_company: bool, salutation: &str) -> Option<Point> {
    if is_company {
        return Some(slots.company);
    }
    match Salutation::parse(salutation)? {
        Salutation::Male => Some(slots.male),
        Salutation::Female => Some(slots.female),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prepare;
    use pretty_assertions::assert_eq;
    use shared_types::Row;

    const STYLE: TextStyle = TextStyle {
        font_size: 6,
        min_font_size: 5,
        max_lines: 2,
    };

    fn build(row: Row) -> Vec<OverlayOp> {
        let layout = ContractLayout::default();
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        ContractOverlay::new(&layout, STYLE, ["8.39", "9.99"], today).build(&prepare(&row))
    }

    fn op_at<'a>(ops: &'a [OverlayOp], x_mm: f32, y_mm: f32) -> Vec<&'a OverlayOp> {
        ops.iter()
            .filter(|op| {
                let (x, y) = match op {
                    OverlayOp::Fit(i) => (i.x, i.y),
                    OverlayOp::Label(l) => (l.x, l.y),
                };
                (x - mm(x_mm)).abs() < 1e-3 && (y - mm(y_mm)).abs() < 1e-3
            })
            .collect()
    }

    fn texts_at(ops: &[OverlayOp], x_mm: f32, y_mm: f32) -> Vec<String> {
        op_at(ops, x_mm, y_mm).iter().map(|op| op.text().to_string()).collect()
    }

    fn single_object_row() -> Row {
        Row::new()
            .with(columns::OBJECT_STREET, "Elm St 4")
            .with(columns::OBJECT_POSTAL_CODE, "12345")
            .with(columns::OBJECT_CITY, "Berlin")
            .with(columns::UNIT_COUNT, "8")
            .with(columns::PARTNER_NAME, "Schmidt")
            .with(columns::PARTNER_SALUTATION, "Herr")
    }

    #[test]
    fn test_fees_are_always_drawn() {
        let ops = build(Row::new());
        assert_eq!(texts_at(&ops, 36.0, 95.5), vec!["8.39"]);
        assert_eq!(texts_at(&ops, 93.5, 95.5), vec!["9.99"]);
    }

    #[test]
    fn test_single_object_fields() {
        let ops = build(single_object_row());
        assert_eq!(texts_at(&ops, 38.0, 210.0), vec!["Elm St"]);
        assert_eq!(texts_at(&ops, 94.0, 210.0), vec!["4"]);
        assert_eq!(texts_at(&ops, 38.0, 205.5), vec!["12345"]);
        assert_eq!(texts_at(&ops, 58.0, 205.5), vec!["Berlin"]);
        assert_eq!(texts_at(&ops, 55.0, 201.0), vec!["8"]);
        assert!(texts_at(&ops, 71.0, 201.0).is_empty());
    }

    #[test]
    fn test_agreement_date_is_fitted() {
        let ops = build(single_object_row());
        assert_eq!(texts_at(&ops, 65.0, 167.0), vec!["01.04.2024"]);
    }

    #[test]
    fn test_multi_object_marks_and_skips_object_fields() {
        let row = single_object_row()
            .with(columns::OBJECT_STREET, "Elm St 4, 6")
            .with(columns::UNIT_COUNT, "3,5");
        let ops = build(row);
        assert_eq!(texts_at(&ops, 71.0, 201.0), vec!["X"]);
        assert!(texts_at(&ops, 38.0, 210.0).is_empty());
        assert!(texts_at(&ops, 38.0, 205.5).is_empty());
        assert!(texts_at(&ops, 58.0, 205.5).is_empty());
        assert_eq!(texts_at(&ops, 55.0, 201.0), vec!["8"]);
    }

    #[test]
    fn test_marks_use_nine_point_font() {
        let ops = build(single_object_row());
        let marks: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                OverlayOp::Label(l) if l.text == "X" => Some(l.font_size),
                _ => None,
            })
            .collect();
        assert!(!marks.is_empty());
        assert!(marks.iter().all(|size| *size == 9.0));
    }

    #[test]
    fn test_agent_mark_selection() {
        let company = build(
            Row::new()
                .with(columns::AGENT_COMPANY, "Verwaltung GmbH")
                .with(columns::AGENT_SALUTATION, "Frau"),
        );
        assert_eq!(texts_at(&company, 141.5, 238.0), vec!["X"]);
        assert!(texts_at(&company, 128.5, 238.0).is_empty());

        let female = build(Row::new().with(columns::AGENT_SALUTATION, " f "));
        assert_eq!(texts_at(&female, 128.5, 238.0), vec!["X"]);

        let male = build(Row::new().with(columns::AGENT_SALUTATION, "HERR"));
        assert_eq!(texts_at(&male, 115.0, 238.0), vec!["X"]);

        let none = build(Row::new().with(columns::AGENT_SALUTATION, "Divers"));
        assert!(texts_at(&none, 115.0, 238.0).is_empty());
        assert!(texts_at(&none, 128.5, 238.0).is_empty());
        assert!(texts_at(&none, 141.5, 238.0).is_empty());
    }

    #[test]
    fn test_partner_mark_defaults_to_company() {
        let ops = build(Row::new().with(columns::PARTNER_NAME, "Schmidt"));
        assert_eq!(texts_at(&ops, 57.5, 83.5), vec!["X"]);

        let female = build(
            Row::new()
                .with(columns::PARTNER_NAME, "Schmidt")
                .with(columns::PARTNER_SALUTATION, "F"),
        );
        assert_eq!(texts_at(&female, 44.5, 83.5), vec!["X"]);
        assert!(texts_at(&female, 57.5, 83.5).is_empty());
    }

    #[test]
    fn test_weg_partner_name_and_object_fallbacks() {
        let row = Row::new()
            .with(columns::OBJECT_STREET, "Elm St 6, Elm St 4")
            .with(columns::OBJECT_POSTAL_CODE, "12345")
            .with(columns::OBJECT_CITY, "Berlin");
        let ops = build(row);

        let company = op_at(&ops, 38.0, 75.5);
        assert_eq!(company.len(), 1);
        assert_eq!(company[0].text(), "WEG Elm St 6,4, 12345 Berlin");

        // Partner address falls back to the object with the lowest number.
        assert_eq!(texts_at(&ops, 38.0, 62.5), vec!["Elm St"]);
        assert_eq!(texts_at(&ops, 93.0, 62.5), vec!["4"]);

        let postal = op_at(&ops, 38.0, 58.0);
        assert_eq!(postal.len(), 1);
        match postal[0] {
            OverlayOp::Fit(i) => {
                assert_eq!(i.text, "12345");
                assert!((i.box_width - mm(70.0)).abs() < 1e-3);
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(texts_at(&ops, 58.0, 58.0), vec!["Berlin"]);
    }

    #[test]
    fn test_partner_own_address_is_used() {
        let row = single_object_row()
            .with(columns::PARTNER_STREET, "Oak Rd 12a")
            .with(columns::PARTNER_POSTAL_CODE, "54321")
            .with(columns::PARTNER_CITY, "Hamburg");
        let ops = build(row);
        assert_eq!(texts_at(&ops, 38.0, 62.5), vec!["Oak Rd"]);
        assert_eq!(texts_at(&ops, 94.0, 62.5), vec!["12a"]);
        assert!(texts_at(&ops, 93.0, 62.5).is_empty());
        assert_eq!(texts_at(&ops, 38.0, 58.0), vec!["54321"]);
        assert_eq!(texts_at(&ops, 58.0, 58.0), vec!["Hamburg"]);
        assert_eq!(texts_at(&ops, 38.0, 70.5), vec!["Schmidt"]);
    }

    #[test]
    fn test_agent_address_split() {
        let row = Row::new()
            .with(columns::AGENT_STREET, "Ring 7/1")
            .with(columns::AGENT_POSTAL_CODE, "10115")
            .with(columns::AGENT_CITY, "Berlin");
        let ops = build(row);
        assert_eq!(texts_at(&ops, 122.0, 213.5), vec!["Ring"]);
        assert_eq!(texts_at(&ops, 178.0, 213.5), vec!["7/1"]);
        assert_eq!(texts_at(&ops, 122.0, 208.5), vec!["10115"]);
        assert_eq!(texts_at(&ops, 142.0, 208.5), vec!["Berlin"]);
    }

    #[test]
    fn test_invalid_unit_count_draws_nothing() {
        let ops = build(single_object_row().with(columns::UNIT_COUNT, "viele"));
        assert!(texts_at(&ops, 55.0, 201.0).is_empty());
    }
}

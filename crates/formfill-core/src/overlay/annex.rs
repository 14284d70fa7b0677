//! Instructions for one page of the object-list annex (OL).

use super::layout::{AnnexLayout, Slot};
use super::{mm, Align, Label, OpSink, OverlayOp, TextStyle};
use crate::metrics::StandardFont;
use crate::template::PageGeometry;

const COMMERCIAL_UNITS: &str = "0";
const PRICE_PLACEHOLDER: &str = "0.00 €";

/// The slice of a row's objects that lands on one annex page.
#[derive(Debug, Clone, Copy)]
pub struct AnnexPage<'a> {
    /// Zero-based position of the first object in the full list.
    pub offset: usize,
    pub objects: &'a [String],
    /// Unit counts aligned with `objects`; missing entries count as 0.
    pub units: &'a [u64],
    pub postal_code: &'a str,
    pub city: &'a str,
    /// Units over every object of the row, not just this page.
    pub unit_total: u64,
}

#[derive(Debug, Clone)]
pub struct AnnexOverlay<'a> {
    layout: &'a AnnexLayout,
    style: TextStyle,
}

impl<'a> AnnexOverlay<'a> {
    pub fn new(layout: &'a AnnexLayout, style: TextStyle) -> Self {
        Self { layout, style }
    }

    pub fn build(&self, page: &AnnexPage<'_>, geometry: PageGeometry) -> Vec<OverlayOp> {
        let layout = self.layout;
        let style = self.style;
        let mut sink = OpSink::default();

        for (i, address) in page.objects.iter().enumerate() {
            let lfd_nr = page.offset + i + 1;
            let units = page.units.get(i).copied().unwrap_or(0);
            let y = layout.row_y(i);
            let column = |x: f32, box_width: f32| Slot { x, y, box_width };
            let wide = layout.default_box_width;

            sink.fit(&lfd_nr.to_string(), column(layout.line_number_slot_x(lfd_nr), wide), style);
            sink.fit(address, column(layout.address_x, wide), style);
            sink.fit(page.postal_code, column(layout.postal_code_x, wide), style);
            sink.fit(page.city, column(layout.city_x, layout.city_box_width), style);
            sink.fit(&units.to_string(), column(layout.units_slot_x(units), wide), style);
            sink.fit(COMMERCIAL_UNITS, column(layout.commercial_units_x, wide), style);
            for x in layout.price_x {
                sink.fit(PRICE_PLACEHOLDER, column(x, wide), style);
            }
        }

        sink.push(OverlayOp::Label(Label {
            text: page.unit_total.to_string(),
            x: geometry.width - mm(layout.total_right_inset),
            y: geometry.height - mm(layout.total_top_inset),
            font: StandardFont::HelveticaBold,
            font_size: layout.total_font_size,
            align: Align::Right,
        }));

        sink.finish()
    }
}

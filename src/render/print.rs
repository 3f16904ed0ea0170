//! Print document: one `.print-page` per selected page with page-break CSS
//! sized to the configured paper.

use tracing::info;

use super::{barcode_markup, cell_style, px, ColorMode};
use crate::error::{BarcodeGridError, Result};
use crate::layout::{GridLayout, PageLayout, PageSelection};
use crate::types::GridState;

/// What to print and how.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions<'a> {
    /// Pages to keep; `None` prints every page.
    pub selection: Option<&'a PageSelection>,
    pub color_mode: ColorMode,
}

/// Build the standalone HTML document handed to the print dialog.
///
/// Fails when there is nothing to print.
pub fn print_document(
    state: &GridState,
    layout: &GridLayout,
    options: &PrintOptions<'_>,
) -> Result<String> {
    if state.data.is_empty() {
        return Err(BarcodeGridError::Export("no barcodes to print".into()));
    }

    let mut out = String::with_capacity(4096 + state.data.len() * 512);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Barcodes</title>\n<style>\n");
    out.push_str(&print_css(layout));
    out.push_str("</style>\n</head>\n<body>\n<div class=\"print-root\">\n");

    let mut printed = 0usize;
    for page in layout.selected_pages(options.selection) {
        page_markup(&mut out, state, layout, page, options.color_mode);
        printed += 1;
    }

    out.push_str("</div>\n</body>\n</html>\n");
    info!(
        pages = printed,
        total_pages = layout.total_pages,
        mode = options.color_mode.as_str(),
        "print document built"
    );
    Ok(out)
}

/// Page size, page breaks and the flex rows for print and screen.
fn print_css(layout: &GridLayout) -> String {
    let m = &layout.metrics;
    let (w, h, pad) = (m.page_width_mm, m.page_height_mm, m.margin_mm);
    format!(
        "@media print {{
  @page {{ size: {w}mm {h}mm; margin: 0; }}
  .print-page {{ page-break-after: always; break-after: page; width: {w}mm !important; height: {h}mm !important; padding: {pad}mm !important; margin: 0 !important; box-sizing: border-box !important; overflow: hidden !important; display: flex !important; flex-direction: column !important; justify-content: flex-start !important; }}
  .print-page:last-child {{ page-break-after: auto; }}
  .print-row {{ display: flex !important; width: 100% !important; }}
  .print-cell {{ min-width: 0 !important; box-sizing: border-box; }}
}}
@media screen {{
  .print-page {{ width: {w}mm; min-height: {h}mm; padding: {pad}mm; margin-bottom: 20mm; background: white; box-shadow: 0 0 10px rgba(0,0,0,0.1); display: flex; flex-direction: column; box-sizing: border-box; }}
  .print-row {{ display: flex; width: 100%; }}
  .print-cell {{ min-width: 0; box-sizing: border-box; }}
}}
.barcode {{ display: block; width: 100%; }}
.barcode-text {{ text-align: center; font-weight: 500; }}
"
    )
}

fn page_markup(
    out: &mut String,
    state: &GridState,
    layout: &GridLayout,
    page: &PageLayout,
    mode: ColorMode,
) {
    let settings = &state.config.global_settings;
    out.push_str(&format!(
        "<div class=\"print-page\" data-page=\"{}\">\n",
        page.number
    ));
    for line in &page.lines {
        out.push_str(&format!(
            "<div class=\"print-line\" data-line=\"{}\" style=\"margin-bottom:{}\"><div class=\"print-row\">",
            line.line,
            px(line.spacing_after)
        ));
        for cell in &line.cells {
            let colors = mode.apply(&cell.colors);
            let item = cell.item_index.and_then(|i| state.data.get(i));
            let class = if item.is_some() {
                "print-cell"
            } else {
                "print-cell print-cell-empty"
            };
            out.push_str(&format!(
                "<div class=\"{class}\" style=\"{}\">",
                cell_style(layout, cell, &colors, settings)
            ));
            if let Some(item) = item {
                barcode_markup(
                    out,
                    item,
                    &colors,
                    settings,
                    layout.metrics.barcode_height_px,
                );
            }
            out.push_str("</div>");
        }
        out.push_str("</div></div>\n");
    }
    out.push_str("</div>\n");
}

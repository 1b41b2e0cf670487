//! Acquisition display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{Acquisition, Money};

#[derive(Tabled)]
struct AcquisitionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Memo")]
    memo: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit price")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format ledger lines as a table followed by the grand total
pub fn format_acquisition_list(lines: &[&Acquisition], settings: &Settings) -> String {
    if lines.is_empty() {
        return "No acquisitions found.".to_string();
    }

    let symbol = &settings.currency_symbol;
    let rows = lines
        .iter()
        .map(|line| AcquisitionRow {
            date: line.date.format(&settings.date_format).to_string(),
            product: line.product.clone(),
            provider: line.provider.name.clone(),
            memo: line.memo.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.format_with_symbol(symbol),
            total: line.total().format_with_symbol(symbol),
        })
        .collect();

    let total: Money = lines.iter().map(|line| line.total()).sum();
    format!(
        "{}\n\n{} line(s), total {}",
        super::render(rows, 4),
        lines.len(),
        total.format_with_symbol(symbol)
    )
}

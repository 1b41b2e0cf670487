//! CSV export of acquisitions

use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

#[derive(Serialize)]
struct AcquisitionRecord<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Provider")]
    provider: &'a str,
    #[serde(rename = "Street")]
    street: &'a str,
    #[serde(rename = "Neighborhood")]
    neighborhood: &'a str,
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "Product")]
    product: &'a str,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Unit Price")]
    unit_price: String,
    #[serde(rename = "Total")]
    total: String,
    #[serde(rename = "Memo")]
    memo: &'a str,
}

/// Export every acquisition, in ledger order, as CSV with a header row
///
/// Amounts are written as plain decimals without a currency symbol.
pub fn export_acquisitions_csv<W: Write>(ledger: &Ledger, writer: W) -> LedgerResult<()> {
    let export_err = |e: csv::Error| LedgerError::Export(e.to_string());
    let mut csv_writer = csv::Writer::from_writer(writer);

    for line in ledger.acquisitions().iter() {
        let address = &line.provider.address;
        csv_writer
            .serialize(AcquisitionRecord {
                date: line.date.to_string(),
                provider: &line.provider.name,
                street: &address.street,
                neighborhood: &address.neighborhood,
                city: &address.city,
                product: &line.product,
                quantity: line.quantity,
                unit_price: line.unit_price.format_with_symbol(""),
                total: line.total().format_with_symbol(""),
                memo: &line.memo,
            })
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))
}

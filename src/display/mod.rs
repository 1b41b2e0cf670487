//! Display formatting for terminal output
//!
//! Lists are rendered as tables with `tabled`; detail views are plain
//! aligned text.

pub mod acquisition;
pub mod offer;
pub mod provider;
pub mod territory;

pub use acquisition::format_acquisition_list;
pub use offer::format_offer_list;
pub use provider::{format_provider_details, format_provider_list};
pub use territory::format_territories;

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Render rows with the shared table style, right-aligning the columns
/// from `numeric_from` on
fn render<T: Tabled>(rows: Vec<T>, numeric_from: usize) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(numeric_from..), Alignment::right());
    table.to_string()
}

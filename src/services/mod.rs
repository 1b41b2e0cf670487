//! Service layer
//!
//! Services validate input, apply the change to the ledger, persist the
//! result and write the matching audit entries.

pub mod acquisition;
pub mod offer;
pub mod provider;
pub mod territory;

pub use acquisition::AcquisitionService;
pub use offer::OfferService;
pub use provider::{ProviderSelector, ProviderService, ProviderSummary};
pub use territory::TerritoryService;

use crate::audit::AuditEntry;
use crate::ledger::CascadeReport;

/// Append what a cascade carried along to an entry's change summary
fn with_cascade(entry: AuditEntry, report: &CascadeReport) -> AuditEntry {
    let carried = report.offers_moved + report.acquisitions_moved + report.acquisitions_merged;
    if carried == 0 && report.providers_moved <= 1 {
        return entry;
    }

    let note = format!(
        "moved {} provider(s), {} offer(s), {} acquisition(s); merged {} acquisition(s)",
        report.providers_moved, report.offers_moved, report.acquisitions_moved, report.acquisitions_merged
    );
    let summary = match &entry.diff_summary {
        Some(diff) => format!("{}; {}", diff, note),
        None => note,
    };
    entry.with_summary(summary)
}

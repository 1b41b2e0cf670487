//! Serializable form of the ledger
//!
//! Records are stored as flat, key-ordered lists. Loading replays them through
//! strict inserts, so a file with duplicate keys or records pointing at a
//! missing provider is rejected rather than silently repaired.

use serde::{Deserialize, Serialize};

use super::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Acquisition, Offer, Provider};

/// Current on-disk schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Every record in the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub providers: Vec<Provider>,

    #[serde(default)]
    pub offers: Vec<Offer>,

    #[serde(default)]
    pub acquisitions: Vec<Acquisition>,
}

impl LedgerSnapshot {
    pub fn record_count(&self) -> usize {
        self.providers.len() + self.offers.len() + self.acquisitions.len()
    }
}

impl Ledger {
    /// Copy every record out, in key order
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            providers: self.providers.iter().cloned().collect(),
            offers: self.offers.iter().cloned().collect(),
            acquisitions: self.acquisitions.iter().cloned().collect(),
        }
    }

    /// Rebuild a ledger from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> LedgerResult<Self> {
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "ledger schema version {} is newer than supported version {}",
                snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }

        let mut ledger = Ledger::new();
        for provider in snapshot.providers {
            ledger.add_provider(provider)?;
        }
        for offer in snapshot.offers {
            ledger.add_offer(offer)?;
        }
        for line in snapshot.acquisitions {
            ledger.require_provider(&line.provider)?;
            ledger.acquisitions.insert(line)?;
        }
        Ok(ledger)
    }
}

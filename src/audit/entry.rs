//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::diff_summary;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A record was folded into another with the same key
    Merge,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Merge => write!(f, "MERGE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Provider,
    Offer,
    Acquisition,
    /// A city, neighborhood or street renamed across providers
    Territory,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Provider => write!(f, "Provider"),
            EntityType::Offer => write!(f, "Offer"),
            EntityType::Acquisition => write!(f, "Acquisition"),
            EntityType::Territory => write!(f, "Territory"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Display form of the entity key at the time of the operation
    pub entity_id: String,

    /// The entity before the operation (updates, deletes, merges)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// The entity after the operation (creates, updates, merges)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id.into())
        }
    }

    /// An update; the diff summary is computed from the two states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::with_states(Operation::Update, entity_type, entity_id.into(), before, after)
    }

    /// A merge: `before` is the occupant as it was, `after` the combined record
    pub fn merge<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::with_states(Operation::Merge, entity_type, entity_id.into(), before, after)
    }

    pub fn delete<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Attach a free-form summary, replacing any computed diff
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.diff_summary = Some(summary.into());
        self
    }

    fn with_states<T: Serialize>(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => diff_summary(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::new(operation, entity_type, entity_id)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

//! Point-in-time view of a group as handed over by the storage layer.
//!
//! The storage layer returns expenses with the payer and participants
//! embedded as full member records. Only their ids matter to the
//! computation; names and descriptions pass through for presentation.

use crate::core::expense::{Expense, ExpenseId};
use crate::core::member::Member;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An expense exactly as stored: payer and participants are full records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub payer: Member,
    pub participants: Vec<Member>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&ExpenseRecord> for Expense {
    fn from(record: &ExpenseRecord) -> Self {
        let expense = Expense::new(
            record.id.clone(),
            record.payer.id.clone(),
            record.amount,
            record.participants.iter().map(|m| m.id.clone()),
        )
        .with_description(record.description.clone());
        match record.created_at {
            Some(at) => expense.with_created_at(at),
            None => expense,
        }
    }
}

/// Members and expenses of one group at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl GroupSnapshot {
    pub fn new(members: Vec<Member>, expenses: Vec<ExpenseRecord>) -> Self {
        Self {
            name: None,
            members,
            expenses,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The expenses reduced to the shape the aggregator consumes.
    pub fn expenses(&self) -> Vec<Expense> {
        self.expenses.iter().map(Expense::from).collect()
    }
}

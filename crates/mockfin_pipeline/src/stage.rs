//! Pipeline stages and their reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use mockfin_store::codec::render_value;
use mockfin_store::SaveError;

/// Generation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Tradable assets
    Assets,
    /// Daily prices per asset
    Prices,
    /// Users and lifecycles
    Users,
    /// Trading activity
    Transactions,
    /// Net positions
    Holdings,
}

impl Stage {
    /// All stages in dependency order.
    pub const ALL: [Stage; 5] = [
        Stage::Assets,
        Stage::Prices,
        Stage::Users,
        Stage::Transactions,
        Stage::Holdings,
    ];

    /// Get the stage name for display
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Prices => "prices",
            Self::Users => "users",
            Self::Transactions => "transactions",
            Self::Holdings => "holdings",
        }
    }

    /// Output file name
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Assets => "assets.csv",
            Self::Prices => "prices.csv",
            Self::Users => "users.csv",
            Self::Transactions => "transactions.csv",
            Self::Holdings => "holdings.csv",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one completed stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    /// Stage
    pub stage: Stage,
    /// Rows saved
    pub rows: u64,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
    /// Non-fatal save errors, rendered
    pub warnings: Vec<String>,
}

impl StageReport {
    /// Builds a report, rendering each save error with its row.
    pub fn new(stage: Stage, rows: u64, elapsed_ms: u64, errors: &[SaveError]) -> Self {
        Self {
            stage,
            rows,
            elapsed_ms,
            warnings: errors.iter().map(describe_save_error).collect(),
        }
    }
}

fn describe_save_error(error: &SaveError) -> String {
    let fields: Vec<String> = error.row.iter().map(render_value).collect();
    format!("{} [row: {}]", error.message, fields.join(","))
}

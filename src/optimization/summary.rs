use crate::core::balance::Balances;
use crate::core::settlement::Settlement;
use serde::{Deserialize, Serialize};

/// Audit figures for a settlement plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    /// Members that had a balance entry.
    pub member_count: usize,
    /// Number of transfers in the plan.
    pub transfer_count: usize,
    /// Sum of positive balances: what actually needs to change hands.
    pub net_imbalance: f64,
    /// Sum of the whole-unit amounts people are asked to pay.
    pub total_transferred: u64,
    /// Sum of the exact amounts the planner moved.
    pub exact_transferred: f64,
    /// Largest single whole-unit transfer.
    pub largest_transfer: u64,
}

impl SettlementSummary {
    /// Summarize a plan produced from `balances`.
    pub fn from_plan(balances: &Balances, settlements: &[Settlement]) -> Self {
        SettlementSummary {
            member_count: balances.len(),
            transfer_count: settlements.len(),
            net_imbalance: balances.net_imbalance(),
            total_transferred: settlements.iter().map(|s| s.amount).sum(),
            exact_transferred: settlements.iter().map(|s| s.exact_amount).sum(),
            largest_transfer: settlements.iter().map(|s| s.amount).max().unwrap_or(0),
        }
    }

    /// Extra money requested because every transfer is rounded up.
    ///
    /// Always in `[0, transfer_count)`.
    pub fn rounding_bias(&self) -> f64 {
        self.total_transferred as f64 - self.exact_transferred
    }
}

impl std::fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Summary ===")?;
        writeln!(f, "Members:          {}", self.member_count)?;
        writeln!(f, "Transfers:        {}", self.transfer_count)?;
        writeln!(f, "Net imbalance:    {:.2}", self.net_imbalance)?;
        writeln!(f, "Total to pay:     {}", self.total_transferred)?;
        writeln!(f, "Rounding bias:    {:.2}", self.rounding_bias())?;
        writeln!(f, "Largest transfer: {}", self.largest_transfer)?;
        Ok(())
    }
}

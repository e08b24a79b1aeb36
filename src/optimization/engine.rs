use crate::core::balance::Balances;
use crate::core::error::SettleError;
use crate::core::expense::Expense;
use crate::core::member::{Member, MemberId};
use crate::core::settlement::Settlement;
use crate::core::snapshot::GroupSnapshot;
use crate::optimization::aggregator::compute_balances;
use crate::optimization::planner::{PlannerConfig, SettlementPlanner};
use crate::optimization::summary::SettlementSummary;
use serde::Serialize;
use std::collections::HashMap;

/// Everything one settlement run produces.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    #[serde(skip)]
    members: Vec<Member>,
    balances: Balances,
    settlements: Vec<Settlement>,
    summary: SettlementSummary,
}

impl SettlementReport {
    /// Members the report was computed for, in input order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Net balance per member, before any transfer.
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Transfers in the order they were planned.
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn summary(&self) -> &SettlementSummary {
        &self.summary
    }

    /// True when nobody needs to pay anybody.
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Runs the full pipeline: expenses → balances → transfer plan → summary.
///
/// The engine holds only configuration. Each call works on the snapshot it
/// is given, so one engine can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    planner: SettlementPlanner,
}

impl SettlementEngine {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            planner: SettlementPlanner::new(config),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.planner.config()
    }

    pub fn settle(&self, members: &[Member], expenses: &[Expense]) -> Result<SettlementReport, SettleError> {
        let balances = compute_balances(members, expenses)?;
        let settlements = self.planner.plan(&balances, members)?;
        let summary = SettlementSummary::from_plan(&balances, &settlements);
        Ok(SettlementReport {
            members: members.to_vec(),
            balances,
            settlements,
            summary,
        })
    }

    pub fn settle_snapshot(&self, snapshot: &GroupSnapshot) -> Result<SettlementReport, SettleError> {
        self.settle(&snapshot.members, &snapshot.expenses())
    }
}

impl std::fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: HashMap<&MemberId, &str> = self
            .members
            .iter()
            .map(|m| (&m.id, m.name.as_str()))
            .collect();

        writeln!(f, "=== Balances ===")?;
        for (member, amount) in self.balances.iter() {
            let name = names.get(member).copied().unwrap_or(member.as_str());
            writeln!(f, "  {:<20} {:>12.2}", name, amount)?;
        }

        writeln!(f, "\n=== Settlements ===")?;
        if self.settlements.is_empty() {
            writeln!(f, "  Nothing to settle.")?;
        }
        for settlement in &self.settlements {
            writeln!(f, "  {}", settlement)?;
        }

        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

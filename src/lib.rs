//! # settle-up
//!
//! Group expense balancing and debt simplification.
//!
//! Given the members of a group and the expenses they shared, this crate
//! computes each member's net balance and a short, deterministic list of
//! payments that brings every balance back to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: members, expenses, balances, settlements, snapshots
//! - **optimization** — Balance aggregation, greedy settlement planning, summaries
//! - **simulation** — Random group generation for tests and benchmarks
//!
//! Everything is a pure function of the snapshot passed in; nothing is
//! cached or shared between calls.

pub mod core;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{Balances, DEFAULT_EPSILON};
    pub use crate::core::error::SettleError;
    pub use crate::core::expense::{Expense, ExpenseId};
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::settlement::Settlement;
    pub use crate::core::snapshot::GroupSnapshot;
    pub use crate::optimization::aggregator::compute_balances;
    pub use crate::optimization::engine::{SettlementEngine, SettlementReport};
    pub use crate::optimization::planner::{plan_settlements, PlannerConfig, SettlementPlanner};
    pub use crate::optimization::summary::SettlementSummary;
}

//! Domain types: members, expenses, balances, settlements and errors.

pub mod balance;
pub mod error;
pub mod expense;
pub mod member;
pub mod settlement;
pub mod snapshot;

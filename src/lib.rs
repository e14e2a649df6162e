//! # group-settlement
//!
//! Debt-settlement engine for groups that share expenses.
//!
//! Given a group's expense records, this engine computes each member's net
//! balance and a short list of payments that clears every balance.
//!
//! ## Architecture
//!
//! - **core**: Money rules, participants, expense records, the balance ledger
//! - **settlement**: Greedy debtor/creditor solver and the group calculator
//! - **simulation**: Random expense histories for stress testing

pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::expense::{ExpenseRecord, Share};
    pub use crate::core::ledger::{Balances, ExpenseLedger, LedgerError};
    pub use crate::core::money::InputError;
    pub use crate::core::participant::Participant;
    pub use crate::settlement::calculator::{
        ExpenseEntry, GroupSettlementCalculator, RejectedExpense, SettlementResult,
        SettlementSummary,
    };
    pub use crate::settlement::solver::{SettlementSolver, Transaction};
}

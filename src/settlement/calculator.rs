use crate::core::expense::ExpenseRecord;
use crate::core::ledger::{Balances, ExpenseLedger, LedgerError};
use crate::core::money::{within, InputError, BALANCE_CHECK_TOLERANCE};
use crate::settlement::solver::{SettlementSolver, Transaction};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Aggregate figures for a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementSummary {
    /// Sum of the magnitudes of all negative balances.
    pub total_debt: Decimal,
    /// Sum of all positive balances.
    pub total_credit: Decimal,
    pub is_balanced: bool,
    /// Everyone with a recorded balance, zero balances included.
    pub participant_count: usize,
}

impl SettlementSummary {
    fn from_balances(balances: &Balances) -> Self {
        let mut total_debt = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for (_, amount) in balances.iter() {
            if amount.is_sign_negative() {
                total_debt = total_debt.saturating_add(amount.abs());
            } else {
                total_credit = total_credit.saturating_add(*amount);
            }
        }
        Self {
            total_debt,
            total_credit,
            is_balanced: within(total_debt, total_credit, BALANCE_CHECK_TOLERANCE),
            participant_count: balances.len(),
        }
    }
}

/// An expense record the ledger refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedExpense {
    /// Position of the record in the input.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(serialize_with = "serialize_error")]
    pub error: LedgerError,
}

fn serialize_error<S: Serializer>(error: &LedgerError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of settling one group.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementResult {
    pub transactions: Vec<Transaction>,
    /// Rounded balances in first-seen order.
    pub balances: Balances,
    pub summary: SettlementSummary,
    /// Records left out of the computation. Empty for a complete result.
    pub rejected: Vec<RejectedExpense>,
}

impl SettlementResult {
    /// True when every input record was applied.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Balances after every transaction has been paid.
    pub fn residual_balances(&self) -> Balances {
        let mut residual = self.balances.clone();
        for tx in &self.transactions {
            residual.apply_transaction(tx);
        }
        residual
    }
}

/// One input item for [`GroupSettlementCalculator::calculate_entries`].
#[derive(Debug, Clone)]
pub enum ExpenseEntry<'a> {
    Record(&'a ExpenseRecord),
    /// Input that never became a record, such as an amount that did not parse.
    Unreadable {
        reference: Option<String>,
        error: InputError,
    },
}

/// Settles a group's whole expense history.
///
/// Each call builds its own [`ExpenseLedger`], so concurrent calls for
/// different groups never share state.
///
/// # Examples
///
/// ```
/// use group_settlement::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let group = [Participant::new("Alice"), Participant::new("Bob"), Participant::new("Carol")];
/// let records = vec![ExpenseRecord::split_equally("Alice", dec!(30), &group)];
///
/// let result = GroupSettlementCalculator::calculate(&records);
/// assert_eq!(result.transactions.len(), 2);
/// assert!(result.summary.is_balanced);
/// assert!(result.is_complete());
/// ```
pub struct GroupSettlementCalculator;

impl GroupSettlementCalculator {
    /// Apply every record in order, then compute the payment plan.
    ///
    /// A record that fails validation is skipped and reported in
    /// [`SettlementResult::rejected`]; the remaining records are still
    /// settled.
    pub fn calculate(records: &[ExpenseRecord]) -> SettlementResult {
        Self::calculate_entries(records.iter().map(ExpenseEntry::Record))
    }

    /// Like [`calculate`](Self::calculate), but the input may also hold
    /// entries that failed before reaching the ledger.
    ///
    /// Unreadable entries are reported in [`SettlementResult::rejected`] at
    /// their position in the input, next to records the ledger refused.
    pub fn calculate_entries<'a, I>(entries: I) -> SettlementResult
    where
        I: IntoIterator<Item = ExpenseEntry<'a>>,
    {
        let mut ledger = ExpenseLedger::new();
        let mut rejected = Vec::new();
        let mut seen = 0;

        for (index, entry) in entries.into_iter().enumerate() {
            seen += 1;
            let outcome = match entry {
                ExpenseEntry::Record(record) => ledger
                    .add_record(record)
                    .map_err(|error| (record.reference.clone(), error)),
                ExpenseEntry::Unreadable { reference, error } => {
                    Err((reference, LedgerError::Input(error)))
                }
            };
            if let Err((reference, error)) = outcome {
                warn!(
                    "skipping expense #{} ({}): {}",
                    index,
                    reference.as_deref().unwrap_or("no reference"),
                    error
                );
                rejected.push(RejectedExpense {
                    index,
                    reference,
                    error,
                });
            }
        }

        let balances = ledger.get_balances();
        let transactions = SettlementSolver::solve(&balances);
        let summary = SettlementSummary::from_balances(&balances);

        if !summary.is_balanced {
            warn!(
                "group is unbalanced: debt {} vs credit {}",
                summary.total_debt, summary.total_credit
            );
        }
        debug!(
            "settled {} of {} expenses across {} participants",
            seen - rejected.len(),
            seen,
            summary.participant_count
        );

        SettlementResult {
            transactions,
            balances,
            summary,
            rejected,
        }
    }
}

impl fmt::Display for SettlementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement ===")?;
        writeln!(f, "Participants:   {}", self.summary.participant_count)?;
        writeln!(f, "Total Debt:     {:.2}", self.summary.total_debt)?;
        writeln!(f, "Total Credit:   {:.2}", self.summary.total_credit)?;
        writeln!(f, "Balanced:       {}", self.summary.is_balanced)?;

        writeln!(f, "\n--- Balances ---")?;
        for (participant, amount) in self.balances.iter() {
            writeln!(f, "  {:<20} {:>12.2}", participant, amount)?;
        }

        writeln!(f, "\n--- Transactions ({}) ---", self.transactions.len())?;
        if self.transactions.is_empty() {
            writeln!(f, "  Everyone is settled up.")?;
        }
        for tx in &self.transactions {
            writeln!(f, "  {}", tx)?;
        }

        if !self.rejected.is_empty() {
            writeln!(f, "\n--- Rejected Expenses ({}) ---", self.rejected.len())?;
            for r in &self.rejected {
                match &r.reference {
                    Some(reference) => writeln!(f, "  #{} [{}]: {}", r.index, reference, r.error)?,
                    None => writeln!(f, "  #{}: {}", r.index, r.error)?,
                }
            }
        }
        Ok(())
    }
}

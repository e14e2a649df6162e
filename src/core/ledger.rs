use crate::core::expense::{ExpenseRecord, Share};
use crate::core::money::{ensure_non_negative, round_cents, InputError, SHARE_SUM_TOLERANCE};
use crate::core::participant::Participant;
use crate::settlement::solver::Transaction;
use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when an expense cannot be applied to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("shares add up to {shares_total}, expected {expected}")]
    ShareMismatch {
        shares_total: Decimal,
        expected: Decimal,
    },
}

/// Net balance per participant, in the order participants were first seen.
///
/// Positive means the participant is owed money, negative means they owe.
/// Iteration order is part of the contract: the settlement solver uses it
/// to break ties between equally short payment plans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(IndexMap<Participant, Decimal>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of a participant; zero if they are unknown.
    pub fn get(&self, participant: &Participant) -> Decimal {
        self.0.get(participant).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Decimal)> {
        self.0.iter()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero for a consistent group.
    pub fn total(&self) -> Decimal {
        self.0.values().sum()
    }

    /// Record a payment: the payer moves up by its amount, the payee down.
    pub fn apply_transaction(&mut self, tx: &Transaction) {
        *self.0.entry(tx.from.clone()).or_insert(Decimal::ZERO) += tx.amount;
        *self.0.entry(tx.to.clone()).or_insert(Decimal::ZERO) -= tx.amount;
    }
}

impl FromIterator<(Participant, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (Participant, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Running balances for one settlement computation.
///
/// A ledger is built fresh for each group and thrown away afterwards; it is
/// never shared between concurrent computations.
///
/// # Examples
///
/// ```
/// use group_settlement::core::expense::Share;
/// use group_settlement::core::ledger::ExpenseLedger;
/// use group_settlement::core::participant::Participant;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = ExpenseLedger::new();
/// ledger
///     .add_expense(
///         &Participant::new("Alice"),
///         dec!(30),
///         &[
///             Share::new("Alice", dec!(10)),
///             Share::new("Bob", dec!(10)),
///             Share::new("Carol", dec!(10)),
///         ],
///     )
///     .unwrap();
///
/// let balances = ledger.get_balances();
/// assert_eq!(balances.get(&Participant::new("Alice")), dec!(20));
/// assert_eq!(balances.get(&Participant::new("Bob")), dec!(-10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    balances: IndexMap<Participant, Decimal>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one expense.
    ///
    /// Every share is debited (the payer's own share included) and the payer
    /// is credited with the full total. The ledger is left untouched if any
    /// amount is negative, the shares miss the total by more than
    /// [`SHARE_SUM_TOLERANCE`], or a balance would overflow.
    pub fn add_expense(
        &mut self,
        payer: &Participant,
        total_amount: Decimal,
        shares: &[Share],
    ) -> Result<(), LedgerError> {
        ensure_non_negative(total_amount)?;
        for share in shares {
            ensure_non_negative(share.amount)?;
        }

        let shares_total = shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount))
            .ok_or(InputError::Overflow)?;
        if (shares_total - total_amount).abs() > SHARE_SUM_TOLERANCE {
            return Err(LedgerError::ShareMismatch {
                shares_total,
                expected: total_amount,
            });
        }

        // Work out every new balance before touching the ledger.
        let mut updated: IndexMap<Participant, Decimal> =
            IndexMap::with_capacity(shares.len() + 1);
        for share in shares {
            let next = self
                .pending_balance(&updated, &share.participant)
                .checked_sub(share.amount)
                .ok_or(InputError::Overflow)?;
            updated.insert(share.participant.clone(), next);
        }
        let next = self
            .pending_balance(&updated, payer)
            .checked_add(total_amount)
            .ok_or(InputError::Overflow)?;
        updated.insert(payer.clone(), next);

        // Existing keys keep their slot; new ones append in first-seen order.
        self.balances.extend(updated);

        debug!(
            "expense of {} paid by {} split {} ways",
            total_amount,
            payer,
            shares.len()
        );
        Ok(())
    }

    fn pending_balance(
        &self,
        updated: &IndexMap<Participant, Decimal>,
        participant: &Participant,
    ) -> Decimal {
        updated
            .get(participant)
            .or_else(|| self.balances.get(participant))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Apply an [`ExpenseRecord`].
    pub fn add_record(&mut self, record: &ExpenseRecord) -> Result<(), LedgerError> {
        self.add_expense(&record.payer, record.total_amount, &record.shares)
    }

    /// All tracked balances, rounded to cents, in first-seen order.
    pub fn get_balances(&self) -> Balances {
        self.balances
            .iter()
            .map(|(p, amount)| (p.clone(), round_cents(*amount)))
            .collect()
    }

    /// Rounded balance of one participant; zero if unknown.
    pub fn balance(&self, participant: &Participant) -> Decimal {
        self.balances
            .get(participant)
            .map(|amount| round_cents(*amount))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn participant_count(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Forget every balance.
    pub fn reset(&mut self) {
        self.balances.clear();
    }
}

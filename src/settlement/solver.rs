use crate::core::ledger::Balances;
use crate::core::money::{format_usd, round_cents, SETTLED_EPSILON};
use crate::core::participant::Participant;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One payment needed to settle the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Participant,
    pub to: Participant,
    /// Always positive, in whole cents.
    pub amount: Decimal,
    pub description: String,
}

impl Transaction {
    pub fn new(from: Participant, to: Participant, amount: Decimal) -> Self {
        let description = format!("{} pays {} to {}", from, format_usd(amount), to);
        Self {
            from,
            to,
            amount,
            description,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// A debtor or creditor still waiting to be matched.
#[derive(Debug, Clone)]
struct OpenPosition {
    participant: Participant,
    remaining: Decimal,
}

/// Turns net balances into a short list of payments.
///
/// # Algorithm
///
/// 1. Round every balance to cents and split participants into debtors
///    (below `-ε`) and creditors (above `+ε`), keeping the balances'
///    iteration order. Nothing is sorted by size.
/// 2. Walk both lists with two pointers. Each step pays
///    `min(debt, credit)` from the current debtor to the current creditor
///    and advances whichever side is now settled.
/// 3. Stop when either list is exhausted.
///
/// Every step settles at least one side, so at most
/// `debtors + creditors - 1` payments are produced. The input is trusted to
/// sum to zero; if it does not, the surplus on one side is left unpaid.
pub struct SettlementSolver;

impl SettlementSolver {
    /// Compute the payment plan for a set of balances.
    pub fn solve(balances: &Balances) -> Vec<Transaction> {
        let (mut debtors, mut creditors) = Self::open_positions(balances);
        let mut transactions = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));

        let mut i = 0;
        let mut j = 0;
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = round_cents(debtor.remaining.min(creditor.remaining));
            transactions.push(Transaction::new(
                debtor.participant.clone(),
                creditor.participant.clone(),
                amount,
            ));

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < SETTLED_EPSILON {
                i += 1;
            }
            if creditor.remaining < SETTLED_EPSILON {
                j += 1;
            }
        }

        debug!(
            "settled {} debtors and {} creditors with {} transactions",
            debtors.len(),
            creditors.len(),
            transactions.len()
        );
        transactions
    }

    /// Number of participants that would have to pay and to be paid.
    pub fn counterparty_counts(balances: &Balances) -> (usize, usize) {
        let (debtors, creditors) = Self::open_positions(balances);
        (debtors.len(), creditors.len())
    }

    fn open_positions(balances: &Balances) -> (Vec<OpenPosition>, Vec<OpenPosition>) {
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for (participant, amount) in balances.iter() {
            let amount = round_cents(*amount);
            if amount < -SETTLED_EPSILON {
                debtors.push(OpenPosition {
                    participant: participant.clone(),
                    remaining: -amount,
                });
            } else if amount > SETTLED_EPSILON {
                creditors.push(OpenPosition {
                    participant: participant.clone(),
                    remaining: amount,
                });
            }
        }
        (debtors, creditors)
    }
}

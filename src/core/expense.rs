use crate::core::participant::Participant;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The portion of an expense one participant is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant: Participant,
    pub amount: Decimal,
}

impl Share {
    pub fn new(participant: impl Into<Participant>, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// One shared bill.
///
/// `payer` fronted `total_amount`; `shares` states how much each
/// participant (possibly including the payer) is responsible for.
/// Records are plain data and are not validated on construction: the
/// ledger checks them when they are added.
///
/// # Examples
///
/// ```
/// use group_settlement::core::expense::{ExpenseRecord, Share};
/// use rust_decimal_macros::dec;
///
/// let dinner = ExpenseRecord::new(
///     "Alice",
///     dec!(30),
///     vec![
///         Share::new("Alice", dec!(10)),
///         Share::new("Bob", dec!(10)),
///         Share::new("Carol", dec!(10)),
///     ],
/// );
///
/// assert_eq!(dinner.shares_total(), dec!(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub payer: Participant,
    pub total_amount: Decimal,
    pub shares: Vec<Share>,
    /// Caller-side id or memo, echoed back when the record is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ExpenseRecord {
    pub fn new(payer: impl Into<Participant>, total_amount: Decimal, shares: Vec<Share>) -> Self {
        Self {
            payer: payer.into(),
            total_amount,
            shares,
            reference: None,
        }
    }

    /// Build a record whose total is divided as evenly as cents allow.
    ///
    /// Leftover cents go one each to the first participants, so the
    /// shares always add up to exactly `total_amount`.
    pub fn split_equally(
        payer: impl Into<Participant>,
        total_amount: Decimal,
        participants: &[Participant],
    ) -> Self {
        let mut shares: Vec<Share> = Vec::with_capacity(participants.len());
        if !participants.is_empty() {
            let count = Decimal::from(participants.len());
            let base = (total_amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
            let mut remainder = total_amount - base * count;

            for participant in participants {
                let mut amount = base;
                if remainder >= dec!(0.01) {
                    amount += dec!(0.01);
                    remainder -= dec!(0.01);
                }
                shares.push(Share::new(participant.clone(), amount));
            }
            // Sub-cent dust, if the total itself had more than two decimals.
            if let Some(first) = shares.first_mut() {
                first.amount += remainder;
            }
        }
        Self::new(payer, total_amount, shares)
    }

    /// Attach a reference string.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sum of all share amounts.
    pub fn shares_total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|n| Participant::new(*n)).collect()
    }

    #[test]
    fn test_split_equally_even() {
        let record = ExpenseRecord::split_equally("Alice", dec!(30), &people(&["Alice", "Bob", "Carol"]));
        assert_eq!(record.shares.len(), 3);
        assert!(record.shares.iter().all(|s| s.amount == dec!(10)));
        assert_eq!(record.shares_total(), dec!(30));
    }

    #[test]
    fn test_split_equally_distributes_leftover_cents() {
        let record = ExpenseRecord::split_equally("Alice", dec!(100), &people(&["A", "B", "C"]));
        let amounts: Vec<Decimal> = record.shares.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(record.shares_total(), dec!(100));
    }

    #[test]
    fn test_split_equally_sub_cent_total() {
        let record = ExpenseRecord::split_equally("A", dec!(10.005), &people(&["A", "B"]));
        assert_eq!(record.shares_total(), dec!(10.005));
    }

    #[test]
    fn test_split_equally_nobody() {
        let record = ExpenseRecord::split_equally("A", dec!(10), &[]);
        assert!(record.shares.is_empty());
        assert_eq!(record.shares_total(), Decimal::ZERO);
    }

    #[test]
    fn test_reference() {
        let record = ExpenseRecord::new("A", dec!(1), vec![]).with_reference("exp-42");
        assert_eq!(record.reference.as_deref(), Some("exp-42"));
    }
}

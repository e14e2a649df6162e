//! Random expense histories for stress tests and benchmarks.

use crate::core::expense::ExpenseRecord;
use crate::core::participant::Participant;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Shape of a generated group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub participant_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Smallest expense total.
    pub min_amount: Decimal,
    /// Largest expense total.
    pub max_amount: Decimal,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 20,
            min_amount: Decimal::from(5),
            max_amount: Decimal::from(500),
        }
    }
}

/// Generate a random expense history using the thread-local RNG.
pub fn generate_random_group(config: &GroupConfig) -> Vec<ExpenseRecord> {
    generate_random_group_with(config, &mut rand::thread_rng())
}

/// Generate a random expense history from the given RNG.
///
/// Every record is valid: totals are whole cents and shares are an even
/// split over a random non-empty subset of the group.
pub fn generate_random_group_with<R: Rng>(
    config: &GroupConfig,
    rng: &mut R,
) -> Vec<ExpenseRecord> {
    if config.participant_count == 0 {
        return Vec::new();
    }

    let members: Vec<Participant> = (0..config.participant_count)
        .map(|i| Participant::new(format!("member-{:03}", i)))
        .collect();

    let min_cents = to_cents(config.min_amount).max(1);
    let max_cents = to_cents(config.max_amount).max(min_cents);

    (0..config.expense_count)
        .map(|n| {
            let payer = members[rng.gen_range(0..members.len())].clone();
            let group_size = rng.gen_range(1..=members.len());
            let sharers: Vec<Participant> = members
                .choose_multiple(&mut *rng, group_size)
                .cloned()
                .collect();
            let total = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);

            ExpenseRecord::split_equally(payer, total, &sharers)
                .with_reference(format!("expense-{:04}", n))
        })
        .collect()
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(0)
}

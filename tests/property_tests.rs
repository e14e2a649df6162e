use group_settlement::core::expense::{ExpenseRecord, Share};
use group_settlement::core::ledger::{Balances, ExpenseLedger};
use group_settlement::core::participant::Participant;
use group_settlement::settlement::calculator::GroupSettlementCalculator;
use group_settlement::settlement::solver::SettlementSolver;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const NAMES: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

/// Pick a participant from a small pool so balances overlap.
fn arb_participant() -> impl Strategy<Value = Participant> {
    prop::sample::select(NAMES.to_vec()).prop_map(Participant::new)
}

/// A whole-cent amount between $0.01 and $10,000.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A valid expense: an even split over a non-empty subset of the pool.
fn arb_expense() -> impl Strategy<Value = ExpenseRecord> {
    (
        arb_participant(),
        arb_amount(),
        prop::sample::subsequence(NAMES.to_vec(), 1..=NAMES.len()),
    )
        .prop_map(|(payer, total, sharers)| {
            let sharers: Vec<Participant> = sharers.into_iter().map(Participant::new).collect();
            ExpenseRecord::split_equally(payer, total, &sharers)
        })
}

/// An expense with arbitrary share amounts that may not match the total.
fn arb_unchecked_expense() -> impl Strategy<Value = ExpenseRecord> {
    (
        arb_participant(),
        arb_amount(),
        prop::collection::vec((arb_participant(), arb_amount()), 1..5),
    )
        .prop_map(|(payer, total, shares)| {
            let shares = shares.into_iter().map(|(p, a)| Share::new(p, a)).collect();
            ExpenseRecord::new(payer, total, shares)
        })
}

fn arb_history() -> impl Strategy<Value = Vec<ExpenseRecord>> {
    prop::collection::vec(arb_expense(), 0..40)
}

fn ledger_for(records: &[ExpenseRecord]) -> ExpenseLedger {
    let mut ledger = ExpenseLedger::new();
    for record in records {
        ledger.add_record(record).unwrap();
    }
    ledger
}

proptest! {
    // Every expense credits and debits the same total, so balances sum to zero.
    #[test]
    fn balances_sum_to_zero(records in arb_history()) {
        let balances = ledger_for(&records).get_balances();
        prop_assert!(
            balances.total().abs() < dec!(0.000001),
            "balances must sum to zero, got {}",
            balances.total()
        );
    }

    // Paying every transaction leaves nobody owing anything.
    #[test]
    fn settlement_discharges_balances(records in arb_history()) {
        let balances = ledger_for(&records).get_balances();
        let mut residual = balances.clone();
        for tx in SettlementSolver::solve(&balances) {
            residual.apply_transaction(&tx);
        }
        for (participant, amount) in residual.iter() {
            prop_assert!(
                amount.abs() < dec!(0.000000001),
                "{} still has {} after settlement",
                participant,
                amount
            );
        }
    }

    // Greedy matching needs at most debtors + creditors - 1 payments.
    #[test]
    fn transaction_count_is_bounded(records in arb_history()) {
        let balances = ledger_for(&records).get_balances();
        let (debtors, creditors) = SettlementSolver::counterparty_counts(&balances);
        let transactions = SettlementSolver::solve(&balances);
        prop_assert!(transactions.len() <= (debtors + creditors).saturating_sub(1));
    }

    // No zero, negative or self payments, and every amount is whole cents.
    #[test]
    fn no_degenerate_transactions(records in arb_history()) {
        let result = GroupSettlementCalculator::calculate(&records);
        for tx in &result.transactions {
            prop_assert!(tx.amount > Decimal::ZERO, "non-positive payment: {}", tx);
            prop_assert_ne!(&tx.from, &tx.to);
            prop_assert_eq!(tx.amount, tx.amount.round_dp(2));
        }
    }

    // Same balances, same plan.
    #[test]
    fn solver_is_deterministic(records in arb_history()) {
        let balances = ledger_for(&records).get_balances();
        prop_assert_eq!(SettlementSolver::solve(&balances), SettlementSolver::solve(&balances));
    }

    // A rejected expense never changes the ledger.
    #[test]
    fn rejected_expense_leaves_ledger_unchanged(
        records in arb_history(),
        candidate in arb_unchecked_expense(),
    ) {
        let mut ledger = ledger_for(&records);
        let before = ledger.get_balances();
        if ledger.add_record(&candidate).is_err() {
            prop_assert_eq!(ledger.get_balances(), before);
        }
    }

    // The summary totals agree for any valid history.
    #[test]
    fn valid_history_is_balanced(records in arb_history()) {
        let result = GroupSettlementCalculator::calculate(&records);
        prop_assert!(result.is_complete());
        prop_assert!(result.summary.is_balanced);
        prop_assert_eq!(result.summary.total_debt, result.summary.total_credit);
    }

    // The solver never pays more than the smaller side of the book.
    #[test]
    fn unbalanced_input_settles_the_smaller_side(
        debts in prop::collection::vec(arb_amount(), 1..6),
        credits in prop::collection::vec(arb_amount(), 1..6),
    ) {
        let balances: Balances = debts
            .iter()
            .enumerate()
            .map(|(i, d)| (Participant::new(format!("debtor-{i}")), -*d))
            .chain(
                credits
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (Participant::new(format!("creditor-{i}")), *c)),
            )
            .collect();
        let paid: Decimal = SettlementSolver::solve(&balances).iter().map(|t| t.amount).sum();
        let total_debt: Decimal = debts.iter().sum();
        let total_credit: Decimal = credits.iter().sum();
        prop_assert_eq!(paid, total_debt.min(total_credit));
    }
}

//! Settling a group trip.
//!
//! Four friends share a cabin, groceries and a few extras. One receipt was
//! entered wrong and gets reported instead of breaking the settlement.

use group_settlement::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    env_logger::init();

    let alice = Participant::new("alice.eth");
    let bob = Participant::new("bob");
    let carol = Participant::new("0x71C7656EC7ab88b098defB751B7401B5f6d8976F");
    let dave = Participant::new("dave");
    let everyone = [alice.clone(), bob.clone(), carol.clone(), dave.clone()];

    let records = vec![
        ExpenseRecord::split_equally(alice.clone(), dec!(640), &everyone).with_reference("cabin"),
        ExpenseRecord::split_equally(bob.clone(), dec!(187.45), &everyone).with_reference("groceries"),
        ExpenseRecord::split_equally(carol.clone(), dec!(90), &[carol.clone(), dave.clone()])
            .with_reference("kayak rental"),
        ExpenseRecord::new(
            dave.clone(),
            dec!(60),
            vec![Share::new(alice.clone(), dec!(30)), Share::new(bob.clone(), dec!(20))],
        )
        .with_reference("fuel (mistyped)"),
    ];

    let result = GroupSettlementCalculator::calculate(&records);
    println!("{}", result);

    if !result.is_complete() {
        println!("Fix the rejected receipts and run again for a complete settlement.");
    }
}

//! Basic balance and settlement example.
//!
//! Records a weekend's worth of shared expenses and prints who should pay
//! whom to square up.

use rust_decimal_macros::dec;
use settle_up::core::expense::Expense;
use settle_up::core::member::{Member, MemberId};
use settle_up::optimization::engine::SettlementEngine;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  settle-up: Basic Settlement Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let members = vec![
        Member::new("m-alice", "Alice"),
        Member::new("m-bob", "Bob"),
        Member::new("m-carol", "Carol"),
        Member::new("m-dave", "Dave"),
    ];
    let everyone: Vec<MemberId> = members.iter().map(|m| m.id.clone()).collect();

    let expenses = vec![
        Expense::new("e1", MemberId::new("m-alice"), dec!(48_000), everyone.clone())
            .with_description("Cabin"),
        Expense::new("e2", MemberId::new("m-bob"), dec!(9_600), everyone.clone())
            .with_description("Groceries"),
        Expense::new(
            "e3",
            MemberId::new("m-carol"),
            dec!(3_250),
            vec![MemberId::new("m-carol"), MemberId::new("m-dave")],
        )
        .with_description("Ski rental"),
        Expense::new("e4", MemberId::new("m-dave"), dec!(1_000), everyone)
            .with_description("Firewood"),
    ];

    println!("━━━ Expenses ━━━\n");
    for expense in &expenses {
        println!(
            "  {:<12} {:>8}  paid by {}, shared by {}",
            expense.description(),
            expense.amount(),
            expense.payer(),
            expense.participants().len()
        );
    }
    println!();

    match SettlementEngine::default().settle(&members, &expenses) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("Cannot settle: {}", e),
    }
}

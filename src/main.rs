//! settle-up CLI
//!
//! Compute balances and settlement plans for a group snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Plan settlements for a group exported as JSON
//! settle-up settle --input group.json
//!
//! # Output as JSON
//! settle-up settle --input group.json --format json
//!
//! # Show net balances only
//! settle-up balances --input group.json
//!
//! # Generate a random group for testing
//! settle-up generate --members 8 --expenses 40 --seed 1
//! ```

use log::{debug, info};
use settle_up::core::member::MemberId;
use settle_up::core::snapshot::GroupSnapshot;
use settle_up::optimization::aggregator::compute_balances;
use settle_up::optimization::engine::SettlementEngine;
use settle_up::optimization::planner::PlannerConfig;
use settle_up::simulation::generator::{generate_random_group, GroupConfig};
use std::collections::HashSet;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settle-up — group expense balancing and settlement planning

USAGE:
    settle-up <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the transfers that settle them
    balances    Compute net balances only
    generate    Generate a random group snapshot (for testing)
    help        Show this message

OPTIONS (settle, balances):
    --input <FILE>      Path to JSON group snapshot
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (settle):
    --epsilon <X>       Balances below X count as settled (default: 0.01)

OPTIONS (generate):
    --members <N>       Number of members (default: 6)
    --expenses <N>      Number of expenses (default: 20)
    --seed <N>          Seed for a reproducible group
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    settle-up settle --input group.json
    settle-up settle --input group.json --format json
    settle-up balances --input group.json
    settle-up generate --members 8 --expenses 40 --output group.json"#
    );
}

/// JSON output schema for one transfer.
#[derive(serde::Serialize)]
struct SettlementOutput {
    from: String,
    to: String,
    amount: u64,
}

#[derive(serde::Serialize)]
struct SettleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    settlements: Vec<SettlementOutput>,
    total_transferred: u64,
    rounding_bias: f64,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    member: String,
    name: String,
    balance: f64,
    status: String,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn load_snapshot(path: &str) -> GroupSnapshot {
    GroupSnapshot::from_file(path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "members": [{{ "id": "m1", "name": "Alice" }}, {{ "id": "m2", "name": "Bob" }}],
  "expenses": [
    {{ "id": "e1", "description": "Dinner", "amount": 300,
      "payer": {{ "id": "m1", "name": "Alice" }},
      "participants": [{{ "id": "m1", "name": "Alice" }}, {{ "id": "m2", "name": "Bob" }}] }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("cannot encode output: {}", e)))
}

/// Options shared by `settle` and `balances`.
struct InputOptions {
    input: String,
    format: String,
    epsilon: Option<f64>,
}

fn parse_input_options(args: &[String], allow_epsilon: bool) -> InputOptions {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut epsilon = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--input requires a file path")),
                );
            }
            "--format" => {
                i += 1;
                format = args
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
                if format != "text" && format != "json" {
                    fail(format!("unknown format '{}'", format));
                }
            }
            "--epsilon" if allow_epsilon => {
                i += 1;
                epsilon = Some(
                    args.get(i)
                        .and_then(|s| s.parse::<f64>().ok())
                        .filter(|e| *e > 0.0)
                        .unwrap_or_else(|| fail("--epsilon requires a positive number")),
                );
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    InputOptions {
        input: input_path.unwrap_or_else(|| fail("--input <FILE> is required")),
        format,
        epsilon,
    }
}

fn cmd_settle(args: &[String]) {
    let options = parse_input_options(args, true);
    let snapshot = load_snapshot(&options.input);

    let engine = SettlementEngine::new(PlannerConfig {
        epsilon: options.epsilon.unwrap_or(PlannerConfig::default().epsilon),
    });
    info!(
        "settling {} members / {} expenses (epsilon {})",
        snapshot.members.len(),
        snapshot.expenses.len(),
        engine.config().epsilon
    );

    let report = engine
        .settle_snapshot(&snapshot)
        .unwrap_or_else(|e| fail(e));

    if options.format == "json" {
        let output = SettleOutput {
            group: snapshot.name.clone(),
            settlements: report
                .settlements()
                .iter()
                .map(|s| SettlementOutput {
                    from: s.from.name.clone(),
                    to: s.to.name.clone(),
                    amount: s.amount,
                })
                .collect(),
            total_transferred: report.summary().total_transferred,
            rounding_bias: report.summary().rounding_bias(),
        };
        println!("{}", to_json(&output));
    } else {
        if let Some(name) = &snapshot.name {
            println!("Group: {}\n", name);
        }
        println!("{}", report);
    }
}

fn cmd_balances(args: &[String]) {
    let options = parse_input_options(args, false);
    let snapshot = load_snapshot(&options.input);
    let balances =
        compute_balances(&snapshot.members, &snapshot.expenses()).unwrap_or_else(|e| fail(e));
    let epsilon = PlannerConfig::default().epsilon;
    let creditors: HashSet<&MemberId> = balances.creditors(epsilon).into_iter().map(|(id, _)| id).collect();
    let debtors: HashSet<&MemberId> = balances.debtors(epsilon).into_iter().map(|(id, _)| id).collect();

    let rows: Vec<BalanceOutput> = snapshot
        .members
        .iter()
        .map(|member| {
            let balance = balances.get(&member.id);
            let status = if creditors.contains(&member.id) {
                "CREDITOR"
            } else if debtors.contains(&member.id) {
                "DEBTOR"
            } else {
                "SETTLED"
            };
            BalanceOutput {
                member: member.id.to_string(),
                name: member.name.clone(),
                balance,
                status: status.to_string(),
            }
        })
        .collect();

    if options.format == "json" {
        println!("{}", to_json(&rows));
    } else {
        for row in &rows {
            println!("  {:<20} {:>12.2}  [{}]", row.name, row.balance, row.status);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--members requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--expenses requires a number"));
            }
            "--seed" => {
                i += 1;
                config.seed = Some(
                    args.get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| fail("--seed requires a number")),
                );
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    debug!("generating group with {:?}", config);
    let snapshot = generate_random_group(&config);
    let json = to_json(&snapshot);

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("cannot write to '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses across {} members → {}",
            snapshot.expenses.len(),
            snapshot.members.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "balances" => cmd_balances(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

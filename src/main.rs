//! group-settlement CLI
//!
//! Settle a group's shared expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle expenses from a JSON file
//! group-settlement settle --input expenses.json
//!
//! # Output as JSON
//! group-settlement settle --input expenses.json --format json
//!
//! # Generate a random expense history for testing
//! group-settlement generate --participants 8 --expenses 40
//! ```

use group_settlement::core::expense::{ExpenseRecord, Share};
use group_settlement::core::money::{self, InputError};
use group_settlement::core::participant::Participant;
use group_settlement::settlement::calculator::{
    ExpenseEntry, GroupSettlementCalculator, SettlementResult,
};
use group_settlement::simulation::random_group::{generate_random_group, GroupConfig};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"group-settlement: settle shared group expenses with as few payments as possible

USAGE:
    group-settlement <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the payment plan for an expense file
    generate    Generate a random expense file (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>        Path to JSON expenses file
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --participants <N>    Number of group members (default: 6)
    --expenses <N>        Number of expenses (default: 20)
    --output <FILE>       Write to file instead of stdout

Set RUST_LOG=debug for a trace of every applied expense.

EXAMPLES:
    group-settlement settle --input trip.json
    group-settlement settle --input trip.json --format json
    group-settlement generate --participants 10 --expenses 50 --output trip.json"#
    );
}

/// Amounts may be given as decimal strings or JSON numbers.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
enum AmountInput {
    Text(String),
    Number(f64),
}

impl AmountInput {
    fn to_decimal(&self) -> Result<Decimal, InputError> {
        match self {
            AmountInput::Text(s) => money::parse_amount(s),
            AmountInput::Number(n) => money::from_f64(*n),
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ShareInput {
    participant: String,
    amount: AmountInput,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    payer: String,
    total: AmountInput,
    shares: Vec<ShareInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpensesFile {
    expenses: Vec<ExpenseInput>,
}

/// A record, or the reference and error of an expense whose amounts did not parse.
type ParsedExpense = Result<ExpenseRecord, (Option<String>, InputError)>;

fn to_record(input: ExpenseInput) -> ParsedExpense {
    let ExpenseInput {
        payer,
        total,
        shares,
        reference,
    } = input;

    let amounts = total.to_decimal().and_then(|total| {
        shares
            .into_iter()
            .map(|s| {
                s.amount
                    .to_decimal()
                    .map(|amount| Share::new(Participant::new(s.participant), amount))
            })
            .collect::<Result<Vec<Share>, InputError>>()
            .map(|shares| (total, shares))
    });

    match amounts {
        Ok((total, shares)) => {
            let record = ExpenseRecord::new(Participant::new(payer), total, shares);
            Ok(match reference {
                Some(reference) => record.with_reference(reference),
                None => record,
            })
        }
        Err(error) => Err((reference, error)),
    }
}

fn parse_expenses(content: &str) -> Result<Vec<ParsedExpense>, serde_json::Error> {
    let file: ExpensesFile = serde_json::from_str(content)?;
    Ok(file.expenses.into_iter().map(to_record).collect())
}

/// Settle parsed input; expenses with bad amounts are rejected, not fatal.
fn settle_parsed(parsed: &[ParsedExpense]) -> SettlementResult {
    GroupSettlementCalculator::calculate_entries(parsed.iter().map(|item| match item {
        Ok(record) => ExpenseEntry::Record(record),
        Err((reference, error)) => ExpenseEntry::Unreadable {
            reference: reference.clone(),
            error: error.clone(),
        },
    }))
}

fn load_expenses(path: &str) -> Vec<ParsedExpense> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    parse_expenses(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "expenses": [
    {{ "payer": "Alice", "total": "30.00", "shares": [
        {{ "participant": "Alice", "amount": "10.00" }},
        {{ "participant": "Bob", "amount": "10.00" }},
        {{ "participant": "Carol", "amount": "10.00" }}
    ] }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let parsed = load_expenses(&path);
    let result = settle_parsed(&parsed);

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                eprintln!("Error serializing result: {}", e);
                process::exit(1);
            });
            println!("{}", json);
        }
        "text" => print!("{}", result),
        other => {
            eprintln!("Unknown format '{}': expected 'text' or 'json'", other);
            process::exit(1);
        }
    }

    if !result.is_complete() {
        eprintln!(
            "warning: {} of {} expenses were rejected; balances are partial",
            result.rejected.len(),
            parsed.len()
        );
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let records = generate_random_group(&config);

    let output = ExpensesFile {
        expenses: records
            .iter()
            .map(|r| ExpenseInput {
                payer: r.payer.to_string(),
                total: AmountInput::Text(r.total_amount.to_string()),
                shares: r
                    .shares
                    .iter()
                    .map(|s| ShareInput {
                        participant: s.participant.to_string(),
                        amount: AmountInput::Text(s.amount.to_string()),
                    })
                    .collect(),
                reference: r.reference.clone(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing expenses: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            records.len(),
            config.participant_count,
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
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

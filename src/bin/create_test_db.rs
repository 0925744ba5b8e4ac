use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::{Date, Month};

use spendlog::{Budget, Period, Transaction, create_transaction, initialize_db, upsert_budget};

/// A utility for creating a demo database for the spendlog server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_YEAR: i32 = 2023;

/// The recurring expenses of every month: day of month, amount, description and category.
const MONTHLY_EXPENSES: [(u8, f64, &str, &str); 9] = [
    (1, 1450.0, "Rent", "housing"),
    (3, 112.40, "Weekly groceries", "groceries"),
    (10, 98.75, "Weekly groceries", "groceries"),
    (12, 64.0, "Bus pass", "transportation"),
    (15, 135.20, "Power and internet", "utilities"),
    (17, 104.10, "Weekly groceries", "groceries"),
    (20, 38.50, "Dinner with friends", "dining"),
    (24, 91.30, "Weekly groceries", "groceries"),
    (27, 15.99, "Streaming subscription", "entertainment"),
];

/// One-off expenses: month (1-12), day, amount, description and category.
const ONE_OFF_EXPENSES: [(u8, u8, f64, &str, &str); 8] = [
    (2, 14, 120.0, "Valentine's dinner", "dining"),
    (3, 8, 85.0, "GP visit", "healthcare"),
    (4, 22, 249.99, "Running shoes", "shopping"),
    (6, 5, 640.0, "Flights to the coast", "travel"),
    (6, 7, 310.0, "Hotel", "travel"),
    (8, 30, 480.0, "Evening course", "education"),
    (11, 24, 399.0, "New headphones", "shopping"),
    (12, 18, 260.0, "Christmas presents", "other"),
];

/// Budgets for every month of the demo year: category and amount.
const MONTHLY_BUDGETS: [(&str, f64); 5] = [
    ("housing", 1450.0),
    ("groceries", 400.0),
    ("dining", 80.0),
    ("entertainment", 30.0),
    ("shopping", 150.0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let transaction = SqlTransaction::new_unchecked(&conn, TransactionBehavior::Immediate)?;

    println!("Creating demo transactions...");
    let mut transaction_count = 0;

    for month in 1..=12u8 {
        for (day, amount, description, category) in MONTHLY_EXPENSES {
            let date = Date::from_calendar_date(DEMO_YEAR, Month::try_from(month)?, day)?;
            // Vary the amounts a little so the charts have some shape.
            let amount = (amount * (1.0 + f64::from(month % 4) * 0.05) * 100.0).round() / 100.0;
            create_transaction(
                Transaction::build(amount, date, description).category(category),
                &transaction,
            )?;
            transaction_count += 1;
        }
    }

    for (month, day, amount, description, category) in ONE_OFF_EXPENSES {
        let date = Date::from_calendar_date(DEMO_YEAR, Month::try_from(month)?, day)?;
        create_transaction(
            Transaction::build(amount, date, description).category(category),
            &transaction,
        )?;
        transaction_count += 1;
    }

    println!("Creating demo budgets...");
    let mut budget_count = 0;

    for month in 0..12u8 {
        let period = Period::new(DEMO_YEAR, month)?;

        for (category, amount) in MONTHLY_BUDGETS {
            upsert_budget(Budget::build(category, amount, period), &transaction)?;
            budget_count += 1;
        }
    }

    transaction.commit()?;

    println!("Created {transaction_count} transactions and {budget_count} budgets.");
    println!("Success!");

    Ok(())
}

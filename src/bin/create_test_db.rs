use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::macros::date;

use expense_tracker::{
    Category, NewTransaction, PasswordHash, TransactionType, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_USERNAME: &str = "demo";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "test";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {DEMO_EMAIL} with the password \"{DEMO_PASSWORD}\"...");

    let password_hash = PasswordHash::from_raw_password(DEMO_PASSWORD, PasswordHash::DEFAULT_COST)?;
    let user = create_user(
        DEMO_USERNAME,
        EmailAddress::from_str(DEMO_EMAIL)?,
        password_hash,
        &conn,
    )?;

    println!("Creating sample transactions...");

    let samples = [
        ("Salary", 4200.0, TransactionType::Income, Category::Salary, date!(2025 - 10 - 01)),
        ("Rent", 1600.0, TransactionType::Expense, Category::Rent, date!(2025 - 10 - 02)),
        ("Supermarket", 142.35, TransactionType::Expense, Category::Groceries, date!(2025 - 10 - 04)),
        ("Dinner out", 58.0, TransactionType::Expense, Category::Food, date!(2025 - 10 - 10)),
        ("Power bill", 121.9, TransactionType::Expense, Category::Utilities, date!(2025 - 10 - 15)),
        ("Logo design", 350.0, TransactionType::Income, Category::Freelance, date!(2025 - 10 - 20)),
    ];

    for (title, amount, transaction_type, category, date) in samples {
        create_transaction(
            NewTransaction {
                title: title.to_owned(),
                amount,
                transaction_type,
                category,
                date,
                note: None,
                user_id: user.id,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

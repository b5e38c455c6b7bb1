use std::fmt;

use chrono::{DateTime, Utc};
use lingo_core::model::{Account, AccountId};
use lingo_core::password;
use storage::Storage;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    admin_user: String,
    admin_password: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("LINGO_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut admin_user = std::env::var("LINGO_ADMIN_USER").unwrap_or_else(|_| "admin".into());
        let mut admin_password =
            std::env::var("LINGO_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".into());
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--admin-user" => {
                    admin_user = require_value(&mut args, "--admin-user")?;
                }
                "--admin-password" => {
                    admin_password = require_value(&mut args, "--admin-password")?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            admin_user,
            admin_password,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --admin-user <name>       Administrative username (default: admin)");
    eprintln!("  --admin-password <pw>     Administrative password (default: admin)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LINGO_DB_URL, LINGO_ADMIN_USER, LINGO_ADMIN_PASSWORD");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let mut accounts = storage.load_accounts().await?;
    if accounts.iter().any(|a| a.username() == args.admin_user) {
        println!(
            "Account '{}' already present in {}; nothing to do",
            args.admin_user, args.db_url
        );
        return Ok(());
    }

    let admin = Account::new(
        AccountId::generate(),
        args.admin_user.clone(),
        password::hash(&args.admin_password)?,
        Some("Administrator".into()),
        None,
        now,
    )?;
    accounts.push(admin);
    storage.save_accounts(&accounts).await?;

    println!(
        "Seeded administrative account '{}' into {}",
        args.admin_user, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pwd_hygiene::{CredentialService, PolicyResult, ReportRecord, SqliteStore, Submission};
use secrecy::SecretString;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for a submission declined because the password is reused.
const EXIT_REUSED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "pwd-hygiene", version, about = "Password policy, reuse and strength reporting")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Credential database (defaults to $PWD_HYGIENE_DB_PATH or ./password_security.db)"
    )]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a password read from stdin without storing it
    Check,
    /// Store a password read from stdin unless it is already in use
    Submit {
        #[arg(long)]
        username: String,
    },
    /// Aggregate a strength report over the stored credentials
    Report {
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Print all reports, oldest first
    History {
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// List stored usernames
    Users,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_service(db: Option<PathBuf>) -> Result<CredentialService<SqliteStore>> {
    let path = db.unwrap_or_else(pwd_hygiene::get_db_path);
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open credential store {}", path.display()))?;
    Ok(CredentialService::new(store))
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check => {
            let password = read_password()?;
            print_policy(&pwd_hygiene::evaluate_policy(&password));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Submit { username } => {
            let service = open_service(cli.db)?;
            let password = read_password()?;
            let outcome = service.submit(&username, &password)?;
            print_policy(outcome.policy());

            let code = match outcome {
                Submission::Accepted { .. } => {
                    println!("Password is unique.");
                    println!("User added successfully.");
                    ExitCode::SUCCESS
                }
                Submission::Reused { .. } => {
                    println!("Password is reused! Consider choosing a different one.");
                    ExitCode::from(EXIT_REUSED)
                }
            };

            println!();
            println!("Existing Users:");
            for name in service.usernames()? {
                println!("- {}", name);
            }
            Ok(code)
        }
        Commands::Report { json } => {
            let service = open_service(cli.db)?;
            let report = service.aggregate_report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_reports(std::slice::from_ref(&report));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::History { json } => {
            let service = open_service(cli.db)?;
            let history = service.history()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No reports yet.");
            } else {
                print_reports(&history);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Users => {
            let service = open_service(cli.db)?;
            for name in service.usernames()? {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Reads the password from the first line of stdin.
fn read_password() -> Result<SecretString> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    line.clear();
    Ok(SecretString::new(password.into()))
}

fn print_policy(policy: &PolicyResult) {
    println!("Password Strength: {}", policy.tier);
    if !policy.violations.is_empty() {
        println!("Policy Violations:");
        for violation in &policy.violations {
            println!("- {}", violation);
        }
    }
}

fn print_reports(reports: &[ReportRecord]) {
    println!(
        "{:<32} {:>6} {:>9} {:>7} {:>11}",
        "report_time", "weak", "moderate", "strong", "violations"
    );
    for r in reports {
        println!(
            "{:<32} {:>6} {:>9} {:>7} {:>11}",
            r.report_time.to_rfc3339(),
            r.weak_count,
            r.moderate_count,
            r.strong_count,
            r.total_violations
        );
    }
}

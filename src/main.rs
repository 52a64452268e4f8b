use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credhash::{
    CredentialHasher, CredentialRecord, DEFAULT_ITERATIONS, HashParams, PasswordPolicy,
    PolicyViolation, SecurityLogger,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
mod prompt;

#[derive(Debug, clap::Args)]
struct PolicyArgs {
    /// Allowed special symbols (default: @$!%*#?&)
    #[arg(long, env = "CREDHASH_SYMBOLS")]
    symbols: Option<String>,

    /// Minimum password length (default: 8)
    #[arg(long = "min-length", env = "CREDHASH_MIN_LENGTH")]
    min_length: Option<usize>,
}

impl PolicyArgs {
    fn to_policy(&self) -> Result<PasswordPolicy> {
        let mut policy = PasswordPolicy::default();
        if let Some(symbols) = &self.symbols {
            policy = policy.with_symbols(symbols)?;
        }
        if let Some(min_length) = self.min_length {
            policy = policy.with_min_length(min_length)?;
        }
        Ok(policy)
    }
}

#[derive(Debug, Parser)]
#[command(name = "credhash")]
#[command(
    version,
    about = "Salted PBKDF2 credential hashing with password policy checks."
)]
struct Cli {
    /// Directory for daily security-YYYY-MM-DD.log files
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "CREDHASH_LOG_DIR",
        default_value = "logs"
    )]
    log_dir: PathBuf,

    /// PBKDF2 iterations for new records
    #[arg(long, global = true, env = "CREDHASH_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a new password into an iterations:salt:key record
    Hash {
        /// Do not check the password against the policy
        #[arg(long, default_value_t = false)]
        skip_policy: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Checks a password against a stored record
    #[command(arg_required_else_help = true)]
    Verify { record: String },

    /// Checks a password against the strength policy
    Check {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Shows the parameters of a stored record
    #[command(arg_required_else_help = true)]
    Inspect {
        record: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    strong: bool,
    violations: &'a [PolicyViolation],
}

#[derive(Debug, Serialize)]
struct InspectReport {
    iterations: u32,
    salt_len: usize,
    key_len: usize,
    needs_rehash: bool,
}

fn init_tracing() {
    // security events already go to the log file
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,security=off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Cli::parse();
    let logger = SecurityLogger::init(&args.log_dir);
    let hasher = CredentialHasher::new(
        HashParams::with_iterations(args.iterations).context("invalid --iterations")?,
    );

    match args.command {
        Commands::Hash {
            skip_policy,
            policy,
        } => {
            let policy = policy.to_policy()?;
            let password = prompt::read_new_password_with_confirmation()?;

            if !skip_policy {
                let violations = policy.violations(&password);
                if !violations.is_empty() {
                    logger.warn(&format!(
                        "Weak password rejected ({} rules unmet)",
                        violations.len()
                    ));
                    eprintln!("{}", policy.requirement_message());
                    return Ok(ExitCode::FAILURE);
                }
            }

            let stored = match hasher.hash(&password) {
                Ok(stored) => stored,
                Err(e) => {
                    logger.error("Credential hashing failed", &e);
                    return Err(e.into());
                }
            };
            logger.info(&format!(
                "Credential record created ({} iterations)",
                hasher.params().iterations()
            ));
            println!("{stored}");
        }

        Commands::Verify { record } => {
            let password = prompt::read_password()?;
            match hasher.verify(&password, &record) {
                Ok(true) => {
                    logger.info("Credential verification succeeded");
                    if hasher.needs_rehash(&record)? {
                        logger.info("Credential record uses outdated parameters");
                    }
                    println!("password matches");
                }
                Ok(false) => {
                    logger.warn("Credential verification failed: password mismatch");
                    println!("password does not match");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => {
                    logger.error("Credential verification aborted", &e);
                    return Err(e.into());
                }
            }
        }

        Commands::Check { policy, json } => {
            let policy = policy.to_policy()?;
            let password = prompt::read_password()?;
            let violations = policy.violations(&password);
            let strong = violations.is_empty();

            if json {
                let report = CheckReport {
                    strong,
                    violations: &violations,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if strong {
                println!("password meets the policy");
            } else {
                for v in &violations {
                    println!("- {v}");
                }
                println!("{}", policy.requirement_message());
            }

            if !strong {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Inspect { record, json } => {
            let parsed = CredentialRecord::parse(&record).context("unable to parse record")?;
            let report = InspectReport {
                iterations: parsed.iterations(),
                salt_len: parsed.salt().len(),
                key_len: parsed.key().len(),
                needs_rehash: hasher.record_needs_rehash(&parsed),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Iterations:   {}", report.iterations);
                println!("Salt:         {} bytes", report.salt_len);
                println!("Derived key:  {} bytes", report.key_len);
                println!("Needs rehash: {}", report.needs_rehash);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

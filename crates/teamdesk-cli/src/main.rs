mod client;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use client::AdminClient;

#[derive(Parser)]
#[command(name = "teamdesk")]
#[command(version, about = "TeamDesk onboarding admin tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Onboarding server URL
    #[arg(long, env = "TEAMDESK_SERVER_URL", default_value = "http://localhost:3001")]
    server_url: String,

    /// Admin bearer token (from `teamdesk login`)
    #[arg(long, env = "TEAMDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scope {
    Pending,
    Verified,
}

impl Scope {
    fn as_str(&self) -> &'static str {
        match self {
            Scope::Pending => "pending",
            Scope::Verified => "verified",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check server and storage health
    Health,

    /// Log in and print a bearer token
    Login {
        #[arg(short, long, default_value = "admin")]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Show the token holder
    Me,

    /// Flattened spreadsheet rows
    Entries {
        #[arg(short, long, value_enum, default_value = "pending")]
        scope: Scope,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Review list
    Submissions {
        #[arg(short, long, value_enum, default_value = "pending")]
        scope: Scope,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Approve a pending submission
    Verify {
        id: i64,

        #[arg(short, long)]
        reviewer: String,
    },

    /// Reject and delete a pending submission
    Reject {
        id: i64,

        #[arg(short, long)]
        reviewer: String,
    },

    /// Download a spreadsheet export
    Export {
        #[arg(short, long, value_enum, default_value = "pending")]
        scope: Scope,

        #[arg(short, long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        /// Output file (default: the server's file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the stored hash of a password (offline)
    HashPassword { password: String },
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn default_export_name(scope: Scope, format: ExportFormat) -> String {
    let stem = match scope {
        Scope::Pending => "employee_data",
        Scope::Verified => "verified_employee_data",
    };
    format!("{}.{}", stem, format.as_str())
}

fn text(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

/// One line per submission.
fn summary_lines(response: &Value) -> Vec<String> {
    response
        .get("rows")
        .and_then(|r| r.as_array())
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let mut line = format!(
                        "#{:<5} {:<28} {:<30} {:<16} {}",
                        row["id"].to_string(),
                        text(&row["fullName"]),
                        text(&row["email"]),
                        text(&row["department"]),
                        text(&row["createdAt"]),
                    );
                    if let Some(by) = row["verifiedBy"].as_str() {
                        line.push_str(&format!("  verified by {}", by));
                    }
                    line
                })
                .collect()
        })
        .unwrap_or_default()
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = AdminClient::new(&cli.server_url, cli.token);

    match cli.command {
        Commands::Health => print_json(&client.health().await?)?,
        Commands::Login { username, password } => {
            let result = client.login(&username, &password).await?;
            let token = result
                .get("token")
                .and_then(|t| t.as_str())
                .context("Login response has no token")?;
            println!("{}", token);
            eprintln!(
                "Token valid for {}s. export TEAMDESK_TOKEN=<token> to reuse it.",
                result["expiresInSeconds"]
            );
        }
        Commands::Me => print_json(&client.me().await?)?,
        Commands::Entries { scope, json } => {
            let result = client.entries(scope.as_str()).await?;
            if json {
                print_json(&result)?;
            } else {
                println!("{} {} row(s)", result["totalRows"], scope.as_str());
                if let Some(rows) = result["rows"].as_array() {
                    for row in rows {
                        println!(
                            "  {:<28} {:<20} {}",
                            text(&row["Full Name"]),
                            text(&row["Education Level"]),
                            text(&row["Company"]),
                        );
                    }
                }
            }
        }
        Commands::Submissions { scope, json } => {
            let result = client.submissions(scope.as_str()).await?;
            if json {
                print_json(&result)?;
            } else {
                println!("{} {} submission(s)", result["totalRows"], scope.as_str());
                for line in summary_lines(&result) {
                    println!("{}", line);
                }
            }
        }
        Commands::Verify { id, reviewer } => {
            let result = client.verify(id, &reviewer).await?;
            println!("{}", text(&result["message"]));
        }
        Commands::Reject { id, reviewer } => {
            let result = client.reject(id, &reviewer).await?;
            println!("{}", text(&result["message"]));
        }
        Commands::Export {
            scope,
            format,
            output,
        } => {
            let bytes = client.export(scope.as_str(), format.as_str()).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(default_export_name(scope, format)));
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        Commands::HashPassword { password } => println!("{}", hash_password(&password)),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

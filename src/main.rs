//! rights-engine - inspect a rights catalog and evaluate accesses over a snapshot
//!
//! Every subcommand prints JSON on stdout; logs go to stderr.

#![allow(missing_docs)]

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use perimeter_rights::core::models::{PerimeterId, ProfileId, RoleId, Timestamp};
use perimeter_rights::utils::logging::init_tracing;
use perimeter_rights::{AccessStore, Config, RightsEngine, Snapshot};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rights-engine", version, about = "Perimeter rights resolution engine")]
struct Cli {
    /// Engine configuration file (YAML); environment variables are used otherwise
    #[arg(long, env = "RIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Rights catalog overriding the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON snapshot of perimeters, roles, profiles and accesses
    #[arg(long, env = "RIGHTS_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the catalog and summarize it
    CheckCatalog,
    /// Strict ancestors of a perimeter, nearest first
    Ancestors {
        #[arg(long)]
        perimeter: PerimeterId,
    },
    /// Strict descendants of a perimeter
    Descendants {
        #[arg(long)]
        perimeter: PerimeterId,
    },
    /// Effective rights of a profile on a perimeter
    EffectiveRights {
        #[arg(long)]
        profile: ProfileId,
        #[arg(long)]
        perimeter: PerimeterId,
        /// RFC 3339 evaluation instant, now by default
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Whether a requester may grant a role on a perimeter
    CanGrant {
        #[arg(long)]
        requester: ProfileId,
        #[arg(long)]
        role: RoleId,
        #[arg(long)]
        perimeter: PerimeterId,
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Recompute the allowed-user counters of every perimeter
    Counters {
        #[arg(long)]
        at: Option<Timestamp>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::from_env().context("loading config from environment")?,
    };
    if let Some(path) = cli.catalog {
        config.engine.catalog.path = Some(path);
    }
    init_tracing(config.logging())?;

    let engine = RightsEngine::new(config)
        .await
        .context("loading rights catalog")?;

    let snapshot = match (&cli.command, cli.snapshot) {
        (Command::CheckCatalog, _) => None,
        (_, Some(path)) => Some(
            engine
                .load_snapshot(&path)
                .await
                .with_context(|| format!("loading snapshot {}", path.display()))?,
        ),
        (_, None) => bail!("--snapshot is required for this command"),
    };

    let output = evaluate(&engine, snapshot.as_ref(), cli.command)?;
    Ok(serde_json::to_string_pretty(&output)?)
}

fn evaluate(
    engine: &RightsEngine,
    snapshot: Option<&Snapshot>,
    command: Command,
) -> anyhow::Result<Value> {
    let now = chrono::Utc::now();
    let loaded = || snapshot.ok_or_else(|| anyhow!("no snapshot loaded"));

    let value = match command {
        Command::CheckCatalog => {
            let catalog = engine.catalog();
            json!({
                "rights": catalog.len(),
                "global_rights": catalog.rights().filter(|r| r.is_global).count(),
                "delegation_rules": catalog.delegation_rules(),
            })
        }
        Command::Ancestors { perimeter } => {
            serde_json::to_value(loaded()?.hierarchy.ancestors(perimeter)?)?
        }
        Command::Descendants { perimeter } => {
            serde_json::to_value(loaded()?.hierarchy.descendants(perimeter)?)?
        }
        Command::EffectiveRights {
            profile,
            perimeter,
            at,
        } => {
            let rights = engine
                .resolver(loaded()?)
                .effective_rights(profile, perimeter, at.unwrap_or(now))?;
            json!({ "profile": profile, "perimeter": perimeter, "rights": rights })
        }
        Command::CanGrant {
            requester,
            role,
            perimeter,
            at,
        } => {
            let snapshot = loaded()?;
            let role = snapshot.store.roles().get(role)?;
            let check = engine.validator(snapshot).explain_grant(
                requester,
                role,
                perimeter,
                at.unwrap_or(now),
            )?;
            serde_json::to_value(check)?
        }
        Command::Counters { at } => {
            let snapshot = loaded()?;
            let at = at.unwrap_or(now);
            let accesses = snapshot.store.valid_accesses(at);
            serde_json::to_value(snapshot.hierarchy.count_allowed_users(&accesses, at)?)?
        }
    };
    Ok(value)
}

use std::io::{self, Read, Write};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use fitplan::client::{PlanClient, PlanResponse};
use fitplan::codec::{decode_saved_plan, OutputFormat};
use fitplan::plan::Plan;
use fitplan::profile::ProfileInput;

#[derive(Parser)]
#[command(name = "fitplan-cli")]
#[command(about = "Request a fitness plan from a fitplan server")]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "http://localhost:3000")]
    server: String,

    /// Profile JSON file (use "-" for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Re-render a saved plan (JSON, or MessagePack with a .msgpack/.mpk
    /// extension) instead of requesting a new one
    #[arg(long, conflicts_with = "input")]
    plan: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "90")]
    timeout: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let plan = match &cli.plan {
        Some(path) => {
            let data = std::fs::read(path).map_err(|e| anyhow!("Failed to read plan file {path}: {e}"))?;
            decode_saved_plan(path, &data).map_err(|e| anyhow!("Failed to decode plan file {path}: {e}"))?
        }
        None => request_plan(&cli)?,
    };

    let bytes = cli.format.encode_plan(&plan)?;
    io::stdout()
        .write_all(&bytes)
        .map_err(|e| anyhow!("Failed to write output: {e}"))?;

    Ok(())
}

fn request_plan(cli: &Cli) -> Result<Plan> {
    let input_json = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {e}"))?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .map_err(|e| anyhow!("Failed to read input file {}: {e}", cli.input))?
    };

    let profile: ProfileInput = serde_json::from_str(&input_json)
        .map_err(|e| anyhow!("Failed to parse profile JSON: {e}"))?;
    if let Err(errors) = profile.validate() {
        for e in &errors {
            eprintln!("invalid profile: {e}");
        }
        bail!("profile has {} problem(s)", errors.len());
    }

    eprintln!("Requesting plan for {} from {}...", profile.name, cli.server);
    let client = PlanClient::new(cli.server.clone(), Duration::from_secs(cli.timeout));

    match client.generate(&profile)? {
        PlanResponse::Plan(plan) => Ok(plan),
        PlanResponse::Rejected { error, raw } => {
            if let Some(raw) = raw {
                eprintln!("--- model output ---\n{raw}\n---");
            }
            bail!("{error}");
        }
    }
}

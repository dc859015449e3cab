//! `ranker` CLI — encode space availability and rank space combinations.
//!
//! ## Usage
//!
//! ```sh
//! # Show per-date hour bitmasks for every space (stdin → stdout)
//! ranker encode < spaces.json
//!
//! # Rank every combination against an 8-hour target
//! ranker rank -i spaces.json --target 8
//!
//! # Custom weights (deviation, spaces, cancellable), top 5 only
//! ranker rank -i spaces.json --target 8 --weights 0.2,0.1,0.7 --top 5
//!
//! # Entropy-derived weights with TOPSIS, as JSON
//! ranker rank -i spaces.json --target 102 --entropy --method topsis --json
//!
//! # Parameters from a TOML file (flags override file values)
//! ranker rank -i spaces.json --config ranker.toml
//!
//! # Print the entropy weights only
//! ranker weights -i spaces.json --target 102
//!
//! # Same, with target, day width and space limit from a config file
//! ranker weights -i spaces.json --config ranker.toml
//! ```
//!
//! Set `RUST_LOG=debug` to trace each pipeline stage on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use space_ranker::{encode_spaces, RankerConfig, RankingMethod, Space, Weights};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ranker",
    version,
    about = "Rank combinations of bookable spaces by availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode each space's free intervals into per-date hour bitmasks
    Encode {
        /// Input spaces JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Bits per day
        #[arg(long, default_value_t = space_ranker::encoder::HOURS_PER_DAY)]
        width: u8,
    },
    /// Rank every non-empty combination of spaces
    Rank {
        /// Input spaces JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,
        /// Target total free hours
        #[arg(short, long)]
        target: Option<f64>,
        /// Bits per day
        #[arg(long)]
        width: Option<u8>,
        /// Comma-separated weights: deviation,spaces,cancellable
        #[arg(short, long)]
        weights: Option<String>,
        /// Derive the weights from the data with the entropy method
        #[arg(long)]
        entropy: bool,
        /// Ranking method: heuristic or topsis
        #[arg(short, long)]
        method: Option<RankingMethod>,
        /// Only print the best N combinations
        #[arg(long)]
        top: Option<usize>,
        /// Emit the full ranking as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print entropy-method weights for the given target
    Weights {
        /// Input spaces JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,
        /// Target total free hours
        #[arg(short, long)]
        target: Option<f64>,
        /// Bits per day
        #[arg(long)]
        width: Option<u8>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            width,
        } => {
            let spaces = read_spaces(input.as_deref())?;
            let encoded = encode_spaces(&spaces, width).context("Failed to encode spaces")?;
            let pretty = serde_json::to_string_pretty(&encoded)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Rank {
            input,
            output,
            config,
            target,
            width,
            weights,
            entropy,
            method,
            top,
            json,
        } => {
            let mut cfg = build_config(config.as_deref(), target, width)?;
            if let Some(raw) = weights.as_deref() {
                cfg.weights = parse_weights(raw)?;
            }
            if entropy {
                cfg.entropy_weights = true;
            }
            if let Some(method) = method {
                cfg.method = method;
            }

            let spaces = read_spaces(input.as_deref())?;
            let mut ranking = space_ranker::run(&spaces, &cfg).context("Failed to rank spaces")?;
            if let Some(n) = top {
                ranking.combinations.truncate(n);
            }

            let rendered = if json {
                serde_json::to_string_pretty(&ranking)?
            } else {
                ranking
                    .combinations
                    .iter()
                    .map(|s| format!("{}\t{:.3}\n", s.key(), s.score))
                    .collect()
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Weights {
            input,
            config,
            target,
            width,
        } => {
            let cfg = build_config(config.as_deref(), target, width)?;
            let spaces = read_spaces(input.as_deref())?;
            let weights =
                space_ranker::tune(&spaces, &cfg).context("Failed to compute entropy weights")?;
            println!("deviation:    {:.5}", weights.deviation);
            println!("spaces:       {:.5}", weights.spaces);
            println!("cancellable:  {:.5}", weights.cancellable);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable. Defaults to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Parse `--weights 0.1,0.3,0.6` into deviation, spaces, cancellable.
fn parse_weights(raw: &str) -> Result<Weights> {
    let parts = raw
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid weight: '{}'", p.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    match parts.as_slice() {
        [deviation, spaces, cancellable] => Ok(Weights::new(*deviation, *spaces, *cancellable)),
        _ => anyhow::bail!(
            "Expected 3 comma-separated weights (deviation,spaces,cancellable), got {}",
            parts.len()
        ),
    }
}

/// Config file (or defaults) with the shared command-line overrides applied.
fn build_config(path: Option<&str>, target: Option<f64>, width: Option<u8>) -> Result<RankerConfig> {
    let mut cfg = match path {
        Some(path) => load_config(path)?,
        None => RankerConfig::default(),
    };
    if let Some(target) = target {
        cfg.target_hours = target;
    }
    if let Some(width) = width {
        cfg.day_width = width;
    }
    Ok(cfg)
}

fn load_config(path: &str) -> Result<RankerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    RankerConfig::from_toml_str(&raw).with_context(|| format!("Invalid config file: {}", path))
}

fn read_spaces(path: Option<&str>) -> Result<Vec<Space>> {
    let json = read_input(path)?;
    let spaces = space_ranker::input::parse_spaces(&json).context("Failed to parse spaces JSON")?;
    debug!(source = path.unwrap_or("<stdin>"), spaces = spaces.len(), "loaded spaces");
    Ok(spaces)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

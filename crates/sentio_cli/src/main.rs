use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentio_limbic::{
    AxisOutputs, EmotionalManager, Expression, ManagerConfig, Personality, TickUpdate,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod report;

use report::TickReport;

/// Expression codes cycled by `demo`.
const DEMO_SEQUENCE: [i32; 9] = [0, 1, 2, 3, 4, 5, 6, 1, 0];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Application config (TOML); missing file means defaults
    #[arg(short, long, env = "SENTIO_CONFIG", default_value = "sentio.toml")]
    config: PathBuf,

    /// Directory with the `{axis}_{personality}` controller documents
    #[arg(long)]
    controllers: Option<PathBuf>,

    /// Personality profile: shy or intense
    #[arg(short, long)]
    personality: Option<Personality>,

    /// Print one JSON object per tick instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cycle through all expressions on a timer
    Demo {
        /// Stop after this many ticks (default: run until Ctrl-C)
        #[arg(long)]
        ticks: Option<u64>,

        /// Milliseconds between ticks
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
    /// Read `label [measured_speed]` lines from stdin
    Replay,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = ManagerConfig::load_or_default(&args.config);
    if let Some(dir) = &args.controllers {
        config.controllers_dir = dir.clone();
    }
    if let Some(personality) = args.personality {
        config.personality = personality;
    }

    info!(
        "Loading {} controllers from {}",
        config.personality,
        config.controllers_dir.display()
    );
    let mut manager = EmotionalManager::from_config(&config).with_context(|| {
        format!(
            "Failed to build the emotional manager from {}",
            config.controllers_dir.display()
        )
    })?;

    match args.command {
        Command::Demo { ticks, interval_ms } => {
            run_demo(&mut manager, ticks, Duration::from_millis(interval_ms), args.json).await
        }
        Command::Replay => run_replay(&mut manager, args.json).await,
    }
}

fn emit(tick: u64, manager: &EmotionalManager, outputs: &AxisOutputs, json: bool) -> Result<()> {
    let report = TickReport::new(tick, manager, outputs);
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}

async fn run_demo(
    manager: &mut EmotionalManager,
    ticks: Option<u64>,
    period: Duration,
    json: bool,
) -> Result<()> {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    let mut tick = 0u64;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        if ticks.is_some_and(|limit| tick >= limit) {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                let code = DEMO_SEQUENCE[(tick % DEMO_SEQUENCE.len() as u64) as usize];
                let outputs = manager.compute(TickUpdate::code(code));
                tick += 1;
                emit(tick, manager, &outputs, json)?;
            }
            _ = &mut ctrl_c => {
                info!("Interrupted after {} ticks", tick);
                break;
            }
        }
    }
    Ok(())
}

/// Parse `label [measured_speed]`. Labels are expression names or raw codes.
fn parse_line(line: &str) -> Result<(i32, Option<f64>)> {
    let mut parts = line.split_whitespace();
    let label = parts.next().context("empty line")?;
    let code = match label.parse::<Expression>() {
        Ok(e) => e.code(),
        Err(e) => label.parse::<i32>().map_err(|_| anyhow::anyhow!(e))?,
    };
    let speed = parts
        .next()
        .map(|s| s.parse::<f64>())
        .transpose()
        .with_context(|| format!("invalid measured speed in `{line}`"))?;
    Ok((code, speed))
}

async fn run_replay(manager: &mut EmotionalManager, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut previous: Option<i32> = None;
    let mut tick = 0u64;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (code, measured_speed) = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping `{}`: {:#}", line, e);
                continue;
            }
        };
        if previous == Some(code) {
            continue;
        }
        previous = Some(code);

        let update = TickUpdate {
            expression: Some(code),
            measured_speed,
        };
        let outputs = manager.compute(update);
        tick += 1;
        emit(tick, manager, &outputs, json)?;
    }
    info!("Replayed {} ticks", tick);
    Ok(())
}

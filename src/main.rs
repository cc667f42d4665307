use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::io;
use std::time::Duration;

use intersection_sim::display::{ConsoleRenderer, LogRenderer};
use intersection_sim::input;
use intersection_sim::simulation::{PhaseTiming, Renderer, SimConfig, Supervisor};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Four-way intersection simulation with per-quadrant worker threads")]
struct Cli {
    /// Starting quadrant (1-4); prompted for when omitted
    #[arg(long)]
    start: Option<u32>,

    /// Initial vehicle counts for the four quadrants, e.g. 5,5,5,5
    #[arg(long, value_delimiter = ',')]
    counts: Option<Vec<u32>>,

    /// Total run duration in seconds (10-1000); prompted for when omitted
    #[arg(long)]
    duration: Option<u32>,

    /// Log each phase instead of drawing the intersection
    #[arg(long)]
    headless: bool,

    /// Length of the green phase in seconds
    #[arg(long, default_value = "10")]
    green: u64,

    /// Length of the yellow phase in seconds
    #[arg(long, default_value = "3")]
    yellow: u64,
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();

    let start = match cli.start {
        Some(start) => start,
        None => input::prompt_start(&mut reader, &mut writer)
            .context("Failed to read starting quadrant")?,
    };
    let counts = match &cli.counts {
        Some(counts) => <[u32; 4]>::try_from(counts.as_slice())
            .context("Expected exactly four vehicle counts")?,
        None => input::prompt_counts(&mut reader, &mut writer)
            .context("Failed to read vehicle counts")?,
    };
    let duration = match cli.duration {
        Some(duration) => duration,
        None => input::prompt_duration(&mut reader, &mut writer)
            .context("Failed to read run duration")?,
    };

    let timing = PhaseTiming {
        green: Duration::from_secs(cli.green),
        yellow: Duration::from_secs(cli.yellow),
        ..PhaseTiming::default()
    };
    let config = SimConfig::new(start, counts, duration)?.with_timing(timing)?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn,intersection_sim=info"))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let renderer: Box<dyn Renderer> = if cli.headless {
        Box::new(LogRenderer)
    } else {
        Box::new(ConsoleRenderer::stdout())
    };

    let report = Supervisor::new(config).run(renderer)?;
    println!("{}", report.completion_message());
    Ok(())
}

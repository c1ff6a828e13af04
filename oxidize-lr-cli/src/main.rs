use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::fs;
use std::io::{stdout, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use oxidize_lr::prelude::*;

/// Print the learning-rate table produced by a JSON schedule profile.
#[derive(Debug, Parser)]
#[command(name = "oxidize-lr", version, about)]
struct Args {
    /// JSON profile (see `ProfileConfig`)
    #[arg(short, long)]
    config: PathBuf,

    /// Number of steps to simulate
    #[arg(short, long, default_value_t = 100)]
    steps: usize,

    /// Print every k-th step
    #[arg(short, long, default_value_t = 1)]
    every: usize,

    /// Base learning rate of the simulated optimizer
    #[arg(short, long, default_value_t = 1.0)]
    base_lr: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    ensure!(args.every > 0, "--every must be at least 1");

    let json = fs::read_to_string(&args.config)
        .with_context(|| format!("reading profile {}", args.config.display()))?;
    let profile = ProfileConfig::from_json(&json)?;
    let schedule = profile.build()?;
    info!(config = %args.config.display(), steps = args.steps, "loaded profile");

    let mut optimizer = LrGroups::from_lrs(&[args.base_lr]);
    let mut scheduler = LrScheduler::new(schedule, &mut optimizer);

    let mut out = stdout();
    execute!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(format!("{:>8}  {:>12}  {:>14}\n", "step", "multiplier", "lr")),
        ResetColor
    )?;

    for step in 0..=args.steps {
        if step % args.every == 0 || step == args.steps {
            let lr = optimizer.lrs()[0];
            writeln!(out, "{:>8}  {:>12.6}  {:>14.8e}", step, scheduler.multiplier(), lr)?;
        }
        if step < args.steps {
            scheduler.step(&mut optimizer);
        }
    }
    out.flush()?;

    Ok(())
}

use boommenu::config::{self, MenuConfig};
use boommenu::{Bounds, ClusterManager, Point, Timeline, TransformUpdate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "boomctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Menu description to load instead of the user config
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the resolved layout as JSON
    Layout,
    /// Print sampled animation frames as JSON
    Frames {
        /// Sampling interval in milliseconds
        #[arg(short = 'i', long, default_value_t = 16)]
        interval_ms: u64,
        /// Play the exit animation after the entrance
        #[arg(short = 'd', long)]
        dismiss: bool,
    },
    /// Write the bundled config to the user config path
    Init,
}

#[derive(Serialize)]
struct LayoutReport {
    bounds: Bounds,
    items: Vec<ItemReport>,
}

#[derive(Serialize)]
struct ItemReport {
    index: usize,
    width: u32,
    height: u32,
    start: Point,
    end: Point,
    start_scale: f64,
    delay_ms: u128,
}

#[derive(Serialize)]
struct Frame {
    t_ms: u128,
    updates: Vec<TransformUpdate>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Layout => {
            let (mut manager, menu) = load(cli.config)?;
            let bounds = build(&mut manager, &menu)?;
            print_json(&layout_report(&manager, bounds))
        }
        Commands::Frames {
            interval_ms,
            dismiss,
        } => {
            if interval_ms == 0 {
                anyhow::bail!("--interval-ms must be positive");
            }
            let (mut manager, menu) = load(cli.config)?;
            build(&mut manager, &menu)?;
            print_json(&frames(
                &mut manager,
                Duration::from_millis(interval_ms),
                dismiss,
            )?)
        }
    }
}

fn load(path: Option<PathBuf>) -> anyhow::Result<(ClusterManager, MenuConfig)> {
    let menu = match path {
        Some(path) => config::load_config_from(&path)?,
        None => config::load_or_default()?,
    };
    log::debug!("loaded {} items", menu.items.len());
    Ok((menu.manager()?, menu))
}

fn build(manager: &mut ClusterManager, menu: &MenuConfig) -> anyhow::Result<Bounds> {
    let mut views = menu.views();
    let bounds = manager.build(menu.preview.anchor, menu.preview.board, &mut views)?;
    Ok(bounds)
}

fn layout_report(manager: &ClusterManager, bounds: Bounds) -> LayoutReport {
    let items = manager
        .items()
        .iter()
        .zip(manager.delays())
        .map(|(item, delay)| ItemReport {
            index: item.index,
            width: item.width,
            height: item.height,
            start: item.start,
            end: item.end,
            start_scale: item.animation.start_scale,
            delay_ms: (*delay + item.anim_start_delay).as_millis(),
        })
        .collect();
    LayoutReport { bounds, items }
}

fn frames(
    manager: &mut ClusterManager,
    interval: Duration,
    dismiss: bool,
) -> anyhow::Result<Vec<Frame>> {
    manager.start()?;
    let mut frames = sample(manager, interval);
    if dismiss {
        manager.dismiss(false)?;
        frames.extend(sample(manager, interval));
    }
    Ok(frames)
}

/// Samples the current timeline from zero through its end.
fn sample(manager: &mut ClusterManager, interval: Duration) -> Vec<Frame> {
    let end = manager.timeline().map(Timeline::end).unwrap_or_default();
    let mut frames = Vec::new();
    let mut t = Duration::ZERO;
    loop {
        let at = t.min(end);
        frames.push(Frame {
            t_ms: at.as_millis(),
            updates: manager.advance(at),
        });
        if at >= end {
            break frames;
        }
        t += interval;
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use plotters::prelude::*;
use tracing_subscriber::EnvFilter;

use skyjobot::{BatchSummary, ScoringMode, SimulationConfig, run_batch};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Run many Skyjo games and report per-seat win rates and scores."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 1000)]
    games: usize,

    /// Players per game (2-8)
    #[arg(short = 'p', long = "players", default_value_t = 6)]
    players: usize,

    /// Base RNG seed (per-game seeds are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Draw a fresh random base seed instead of --seed
    #[arg(long = "random-seed", action = ArgAction::SetTrue)]
    random_seed: bool,

    /// Worker threads (defaults to one per core)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Accumulate scores over rounds until someone reaches the score limit
    #[arg(long = "cumulative", action = ArgAction::SetTrue)]
    cumulative: bool,

    /// Print the full summary as JSON instead of a table
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Output chart file (png)
    #[arg(short = 'o', long = "out", default_value = "winrates.png")]
    out: PathBuf,

    /// Output file for the per-player score histograms (png)
    #[arg(long = "hist-out", default_value = "score_histograms.png")]
    hist_out: PathBuf,

    /// Score range covered by one histogram bar
    #[arg(long = "bin-width", default_value_t = 5)]
    bin_width: i32,

    /// Show a textual summary only (no chart)
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.games == 0 {
        return Err("games must be positive".into());
    }
    if args.bin_width <= 0 {
        return Err("bin-width must be positive".into());
    }
    if args.threads == Some(0) {
        return Err("threads must be positive".into());
    }

    let mut config = SimulationConfig::new(args.games, args.players);
    if !args.random_seed {
        config = config.with_seed(args.seed);
    }
    if args.cumulative {
        config = config.with_scoring(ScoringMode::Cumulative);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let started = Instant::now();
    let summary = run_batch(&config)?;
    let elapsed = started.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!(
            "\n{} game(s) in {:.3} s",
            summary.games_completed,
            elapsed.as_secs_f64()
        );
    }

    if !args.no_chart && summary.games_completed > 0 {
        render_charts(&args.out, &summary)?;
        render_histograms(&args.hist_out, &summary, args.bin_width)?;
        if !args.json {
            println!("Chart written to {}", args.out.display());
            println!("Score histograms written to {}", args.hist_out.display());
        }
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "Results over {}/{} completed games:",
        summary.games_completed, summary.games_requested
    );
    for (name, scores) in &summary.all_scores {
        let wins = summary.win_counts.get(name).copied().unwrap_or(0);
        let average = summary.average_scores.get(name).copied().unwrap_or(0.0);
        let min = scores.iter().min().copied().unwrap_or(0);
        let max = scores.iter().max().copied().unwrap_or(0);
        println!(
            "  {name:<10}  wins {wins:>6} ({:>6.2}%)   avg {average:>6.2}   min {min:>4}   max {max:>4}",
            summary.win_rate(name) * 100.0
        );
    }
    if !summary.failures.is_empty() {
        println!(
            "\nNote: {} game(s) aborted.",
            summary.failures.len()
        );
        for failure in &summary.failures {
            println!(
                "  game {} (seed {:#x}): {}",
                failure.game_index, failure.seed, failure.error
            );
        }
    }
}

/// Two side-by-side bar charts: wins and average score per player.
fn render_charts(out: &Path, summary: &BatchSummary) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = summary.all_scores.keys().cloned().collect();
    let wins: Vec<f64> = labels
        .iter()
        .map(|name| summary.win_counts.get(name).copied().unwrap_or(0) as f64)
        .collect();
    let averages: Vec<f64> = labels
        .iter()
        .map(|name| summary.average_scores.get(name).copied().unwrap_or(0.0))
        .collect();

    let root = BitMapBackend::new(out, (1400, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;
    let (left, right) = root.split_horizontally(700);

    draw_bars(
        &left,
        &format!("Wins over {} games", summary.games_completed),
        "Wins",
        &labels,
        &wins,
        BLUE,
    )?;
    draw_bars(&right, "Average score", "Score", &labels, &averages, GREEN)?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}

/// One score-distribution histogram per player, three panels per row.
fn render_histograms(
    out: &Path,
    summary: &BatchSummary,
    bin_width: i32,
) -> Result<(), Box<dyn Error>> {
    let names: Vec<&String> = summary.all_scores.keys().collect();
    let cols = names.len().clamp(1, 3);
    let rows = names.len().div_ceil(cols);

    let size = (500 * cols as u32, 400 * rows as u32);
    let root = BitMapBackend::new(out, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;
    let panels = root.split_evenly((rows, cols));

    for (panel, name) in panels.iter().zip(names) {
        let bins = summary.score_histogram(name, bin_width);
        let max_count = bins.iter().map(|(_, count)| *count as u32).max().unwrap_or(1);

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("{name} over {} games", summary.games_completed),
                ("sans-serif", 20).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..bins.len() as u32).into_segmented(), 0u32..max_count + 1)
            .map_err(|e| format!("{e}"))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Frequency")
            .x_desc("Score")
            .x_label_formatter(&|segment| match segment {
                SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => bins
                    .get(*idx as usize)
                    .map(|(start, _)| start.to_string())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(|e| format!("{e}"))?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(RED.mix(0.5).filled())
                    .margin(1)
                    .data(
                        bins.iter()
                            .enumerate()
                            .map(|(idx, (_, count))| (idx as u32, *count as u32)),
                    ),
            )
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}

fn draw_bars(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let max_value = values.iter().cloned().fold(0.0_f64, f64::max).max(1.0) * 1.1;
    let min_value = values.iter().cloned().fold(0.0_f64, f64::min);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 26).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), min_value..max_value)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_desc("Player")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    for (i, value) in values.iter().enumerate() {
        let rect = Rectangle::new([(i, 0.0), (i + 1, *value)], color.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| format!("{e}"))?;
    }
    Ok(())
}

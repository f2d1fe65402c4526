//! Heads-up preflop solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve -- [OPTIONS]
//!
//! Options:
//!   --iterations <N>   Training iterations per spot (default: 500000)
//!   --stacks <LIST>    Comma-separated stack depths in bb (default: 100)
//!   --max-raises <N>   Raise cap (default: 4)
//!   --equity <M>       OOP equity realization in (0,1] (default: 0.7)
//!   --seed <N>         RNG seed (optional; spots offset it)
//!   --output <PREFIX>  JSON output prefix (default: ranges)
//!
//! Each stack depth is an independent spot with its own solver; spots run
//! in parallel and never share a node table.

use std::env;
use std::process;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;

use preflop_solver::{PreflopAction, PreflopSolver, Range, SolverConfig};

struct Options {
    iterations: u64,
    stacks: Vec<f64>,
    max_raises: u8,
    equity: f64,
    seed: Option<u64>,
    output: String,
}

fn parse_options() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options {
        iterations: 500_000,
        stacks: vec![100.0],
        max_raises: 4,
        equity: 0.7,
        seed: None,
        output: "ranges".to_string(),
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .ok_or_else(|| format!("{} needs a value", flag))?;
        match flag {
            "--iterations" | "-i" => {
                options.iterations = value.parse().map_err(|_| format!("bad count {}", value))?;
            }
            "--stacks" => {
                options.stacks = value
                    .split(',')
                    .map(|s| s.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| format!("bad stack list {}", value))?;
            }
            "--max-raises" => {
                options.max_raises = value.parse().map_err(|_| format!("bad cap {}", value))?;
            }
            "--equity" => {
                options.equity = value.parse().map_err(|_| format!("bad equity {}", value))?;
            }
            "--seed" | "-s" => {
                options.seed = Some(value.parse().map_err(|_| format!("bad seed {}", value))?);
            }
            "--output" | "-o" => {
                options.output = value.clone();
            }
            other => return Err(format!("unknown option {}", other)),
        }
        i += 1;
    }
    Ok(options)
}

struct SpotResult {
    stack: f64,
    nodes: usize,
    elapsed: f64,
    sb_range: Range,
    bb_range: Range,
}

fn solve_spot(options: &Options, index: usize, bar: ProgressBar) -> Result<SpotResult, String> {
    let stack = options.stacks[index];
    let mut config = SolverConfig::default()
        .with_stacks(stack, stack)
        .with_max_raises(options.max_raises)
        .with_equity_multiplier(options.equity);
    if let Some(seed) = options.seed {
        config = config.with_seed(seed + index as u64);
    }

    let mut solver = PreflopSolver::new(config).map_err(|e| e.to_string())?;

    let interval = (options.iterations / 100).max(1);
    solver.train_with_callback(options.iterations, interval, |stats| {
        bar.set_position(stats.iterations);
    });
    bar.finish_with_message(format!("{}bb done", stack));

    let stats = solver.stats().clone();
    Ok(SpotResult {
        stack,
        nodes: stats.nodes,
        elapsed: stats.elapsed_seconds,
        sb_range: solver.range(0),
        bb_range: solver.range(1),
    })
}

fn main() {
    let options = match parse_options() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(2);
        }
    };

    println!(
        "Solving {} spot(s), {} iterations each",
        options.stacks.len(),
        options.iterations
    );

    let progress = MultiProgress::new();
    let style = ProgressStyle::with_template("{msg:>8} [{bar:40}] {pos}/{len}")
        .expect("valid progress template")
        .progress_chars("=>-");

    let bars: Vec<ProgressBar> = options
        .stacks
        .iter()
        .map(|stack| {
            let bar = progress.add(ProgressBar::new(options.iterations));
            bar.set_style(style.clone());
            bar.set_message(format!("{}bb", stack));
            bar
        })
        .collect();

    let results: Vec<Result<SpotResult, String>> = (0..options.stacks.len())
        .into_par_iter()
        .map(|index| solve_spot(&options, index, bars[index].clone()))
        .collect();

    for result in results {
        let spot = match result {
            Ok(spot) => spot,
            Err(message) => {
                eprintln!("error: {}", message);
                process::exit(1);
            }
        };

        println!(
            "\n=== {}bb: {} info sets in {:.1}s ===",
            spot.stack, spot.nodes, spot.elapsed
        );
        // The opener's chart for its smallest raise; fall back to the shove
        // for stacks too shallow to raise.
        let open = PreflopAction::Raise(200);
        let chart = if spot.sb_range.get("AA", &open).is_some() {
            spot.sb_range.chart(&open)
        } else {
            spot.sb_range.chart(&PreflopAction::AllIn)
        };
        println!("{}", chart);

        for (range, tag) in [(&spot.sb_range, "sb"), (&spot.bb_range, "bb")] {
            let path = format!("{}_{}bb_{}.json", options.output, spot.stack, tag);
            if let Err(error) = range.save_json(&path) {
                eprintln!("error: writing {}: {}", path, error);
                process::exit(1);
            }
            println!("wrote {}", path);
        }
    }
}

//! Run classifier CLI - Classify a directory of RLE snapshots.

use std::fs;
use std::io;
use std::path::PathBuf;

use conway_classifier::{
    analysis::RunClassifier,
    schema::ClassifierConfig,
    source::load_run_directory,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <data-dir> <generations> [options]", program);
    eprintln!();
    eprintln!("Classify a Game of Life run from per-generation RLE snapshots.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  data-dir     Directory of <stem>_<i>.rle snapshot files");
    eprintln!("  generations  Requested generation count (board holds generations + 1)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>  JSON classifier configuration");
    eprintln!("  --threads <n>    Worker thread cap for the board fill");
    eprintln!("  --print <generation>    Dump one generation's board to stdout");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let data_dir = PathBuf::from(&args[1]);
    let generations: usize = args[2].parse().unwrap_or_else(|_| {
        eprintln!("Error: generations must be a non-negative integer");
        std::process::exit(1);
    });

    let mut config_path: Option<PathBuf> = None;
    let mut max_threads: Option<usize> = None;
    let mut print_gen: Option<usize> = None;
    let mut i = 3;
    while i < args.len() {
        let next_arg = |i: usize, flag: &str| -> String {
            args.get(i).cloned().unwrap_or_else(|| {
                eprintln!("Error: {flag} requires a value");
                std::process::exit(1);
            })
        };
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(next_arg(i, "--config")));
            }
            "--threads" => {
                i += 1;
                max_threads = Some(next_arg(i, "--threads").parse().unwrap_or_else(|_| {
                    eprintln!("Error: --threads requires a positive integer");
                    std::process::exit(1);
                }));
            }
            "--print" => {
                i += 1;
                print_gen = Some(next_arg(i, "--print").parse().unwrap_or_else(|_| {
                    eprintln!("Error: --print requires a generation index");
                    std::process::exit(1);
                }));
            }
            other => {
                eprintln!("Error: unknown option {other}");
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Load configuration
    let mut config = match &config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => ClassifierConfig::default(),
    };
    config.generations = generations;
    if let Some(threads) = max_threads {
        config.max_threads = threads;
    }

    let sources = load_run_directory(&data_dir, config.generations).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", data_dir.display(), e);
        std::process::exit(1);
    });

    let run = RunClassifier::new(&sources, &config).unwrap_or_else(|e| {
        eprintln!("Error classifying run: {}", e);
        std::process::exit(1);
    });

    println!("Conway Run Classifier");
    println!("=====================");
    println!("Run: {}", data_dir.display());
    println!(
        "Sources: {} of {} requested",
        sources.len(),
        config.generations + 1
    );
    println!();
    println!("Classification: {}", run.classification());

    if !run.rule().is_empty() {
        println!("Rule: {}", run.rule());
    }

    if run.generation_count() > 0 {
        let (x, y) = run.origin();
        let (width, height) = run.dimensions();
        println!("Board: {}x{} at ({}, {})", width, height, x, y);
        println!("Generations: {}", run.generation_count());
        println!();
        println!("Window averages:");
        println!(
            "  Alive cell ratio:  {:.6}",
            run.alive_cell_ratio(None).unwrap_or(0.0)
        );
        println!(
            "  Percent change:    {:.6}",
            run.percent_change(None).unwrap_or(0.0)
        );
        println!(
            "  Active cell ratio: {:.6}",
            run.active_cell_ratio(None).unwrap_or(0.0)
        );
        println!(
            "  Expansion rate:    x {:.4}, y {:.4}, area {:.4}",
            run.expansion_rate_x(None).unwrap_or(0.0),
            run.expansion_rate_y(None).unwrap_or(0.0),
            run.expansion_rate_area(None).unwrap_or(0.0)
        );
    }

    if let Some(generation) = print_gen {
        println!();
        let mut stdout = io::stdout().lock();
        run.print_game_board(generation, &mut stdout, '1', '0')
            .unwrap_or_else(|e| {
                eprintln!("Error printing generation {}: {}", generation, e);
                std::process::exit(1);
            });
    }
}

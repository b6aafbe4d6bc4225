//! Toroid Life CLI - Run a simulation from JSON configuration or benchmark
//! the stepping engine.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::io;

use toroid_life::{
    bench::run_benchmark,
    compute::{Executor, Grid},
    render::{ConsoleRenderer, NullRenderer, Renderer},
    schema::{RenderMode, SimulationConfig},
};

const BENCH_ROWS: usize = 100;
const BENCH_COLS: usize = 100;
const BENCH_ITERATIONS: u64 = 100_000;
const BENCH_THREADS: usize = 3;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(program_name(&args));
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example_config(),
        "--bench" => run_bench(&args[2..]),
        path => run_config(path),
    }
}

/// argv[0], which the OS is allowed to leave out.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("toroid-life", String::as_str)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json>", program);
    eprintln!("       {} --bench [rows cols threads iterations]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Run a toroidal Game of Life from a JSON configuration,");
    eprintln!("or measure stepping throughput with rendering disabled.");
}

fn parse_or_exit<T: std::str::FromStr>(args: &[String], i: usize, default: T, name: &str) -> T {
    match args.get(i) {
        None => default,
        Some(s) => s.parse().unwrap_or_else(|_| {
            eprintln!("Invalid {}: {}", name, s);
            std::process::exit(1);
        }),
    }
}

fn run_bench(args: &[String]) {
    let rows = parse_or_exit(args, 0, BENCH_ROWS, "rows");
    let cols = parse_or_exit(args, 1, BENCH_COLS, "cols");
    let threads = parse_or_exit(args, 2, BENCH_THREADS, "threads");
    let iterations = parse_or_exit(args, 3, BENCH_ITERATIONS, "iterations");

    let config = SimulationConfig {
        rows,
        cols,
        threads,
        ..Default::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid benchmark parameters: {}", e);
        std::process::exit(1);
    }
    if iterations == 0 {
        eprintln!("Invalid iterations: must be positive");
        std::process::exit(1);
    }

    log::info!("benchmarking {rows}x{cols} grid on {threads} thread(s) for {iterations} iterations");
    let report = run_benchmark(rows, cols, threads, iterations);
    println!("{}", report);
}

fn run_config(path: &str) {
    let config = SimulationConfig::from_json_file(path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", path, e);
        std::process::exit(1);
    });

    let mut grid = Grid::new(config.rows, config.cols);
    config.seed.apply(&mut grid);
    log::info!(
        "starting {}x{} grid with {} live cells on {} thread(s)",
        config.rows,
        config.cols,
        grid.population(),
        config.threads
    );

    match config.render {
        RenderMode::Console => {
            let mut renderer = ConsoleRenderer::new(io::stdout().lock(), config.rows, config.cols);
            renderer.render(&grid);
            simulate(&config, grid, renderer);
        }
        RenderMode::None => simulate(&config, grid, NullRenderer),
    }
}

fn simulate<R: Renderer>(config: &SimulationConfig, grid: Grid, renderer: R) {
    let mut executor = Executor::new(config.threads, grid, renderer);
    match config.generations {
        Some(n) => executor.run(n),
        None => loop {
            executor.step();
        },
    }

    println!();
    println!("Generations: {}", executor.generation());
    println!("Population: {}", executor.grid().population());
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_argv0() {
        assert_eq!(program_name(&[]), "toroid-life");
    }

    #[test]
    fn test_program_name_from_argv0() {
        let args = vec!["./life".to_string(), "--bench".to_string()];
        assert_eq!(program_name(&args), "./life");
    }
}

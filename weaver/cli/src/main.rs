use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use colored::Colorize;
use discocube::Order;
use log::LevelFilter;
use structopt::StructOpt;

mod cache;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "weaver",
    about = "Weaves Hamiltonian cycles on discocube graphs."
)]
struct Args {
    /// The order to solve: an uncentered octahedral number (32, 80, 160, 280, ...)
    order: u32,

    /// If given, also solve every admissible order between ORDER and this one
    /// (inclusive)
    end: Option<u32>,

    /// Rebuild graphs from scratch and leave the blob cache untouched
    #[structopt(long)]
    no_cache: bool,

    /// Directory holding cached graph blobs, named by order
    #[structopt(long, default_value = "graphs", parse(from_os_str))]
    cache_dir: PathBuf,

    /// Print debug logs (-vv for trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Only print warnings
    #[structopt(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::from_args();
    let level = match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialise logging")?;

    match args.end {
        None => solve_one(Order::new(args.order)?, &args),
        Some(end) => {
            let mut solved_any = false;
            for order in Order::admissible(args.order, end) {
                solve_one(order, &args)?;
                solved_any = true;
            }
            anyhow::ensure!(
                solved_any,
                "no admissible orders in {}..={}",
                args.order,
                end
            );
            Ok(())
        }
    }
}

fn solve_one(order: Order, args: &Args) -> anyhow::Result<()> {
    let graph = cache::load_or_build(order, &args.cache_dir, args.no_cache)?;
    graph.validate()?;

    let start = Instant::now();
    let cycle = weaver::solve(&graph)?;
    let secs = start.elapsed().as_secs_f64();

    let certificate = weaver::verify::certify(cycle.nodes(), &graph);
    log::debug!(
        "axis counts {:?}, {} non-turns",
        weaver::verify::axis_counts(cycle.nodes(), &graph),
        weaver::verify::nonturn_count(cycle.nodes(), &graph),
    );
    println!(
        "⭕️ {:>7} | ⏱️ {:.7} | 🩺 {}/{}: {}",
        order,
        secs,
        cycle.len(),
        order,
        certificate.to_string().green(),
    );
    Ok(())
}

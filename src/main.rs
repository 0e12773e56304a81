use clap::Parser;
use tracing::{debug, Level};

use fibmemo::demo::{self, DemoConfig, DEFAULT_NESTED};
use fibmemo::Nested;

/// Times three ways of computing Fibonacci numbers and sums a nested list.
#[derive(Parser, Debug)]
#[command(name = "fibmemo", version)]
struct Args {
    /// Index for the iterative and memoized variants
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    n: i64,

    /// Index for the plain recursive variant
    #[arg(long, default_value_t = 13, allow_negative_numbers = true)]
    n_plain: i64,

    /// Nested list to sum, e.g. "[1, [2, 3]]"
    #[arg(long, default_value = DEFAULT_NESTED)]
    nested: Nested,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), demo::Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    debug!(?args, "starting");

    let config = DemoConfig {
        n: args.n,
        n_plain: args.n_plain,
        nested: args.nested,
    };
    let report = demo::run(&config)?;

    println!("sum of all numbers in {} = {}", report.nested, report.nested_sum);
    Ok(())
}

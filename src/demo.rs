//! The demonstration run: time each Fibonacci variant, cross-check them, and sum a nested list.

use std::fmt;

use num_bigint::BigUint;
use thiserror::Error;
use tracing::info;

use crate::fib::{fib_iter, fib_rec_cached, fib_rec_plain, FibCache, FibError};
use crate::nested::Nested;
use crate::timing::try_time_call;

/// The list summed when nothing else is given.
pub const DEFAULT_NESTED: &str = "[1, [2, 3], [4, [5, 6]], [-1, -5], 0]";

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fib(#[from] FibError),
}

/// Inputs of a demonstration run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Index for the iterative and memoized variants.
    pub n: i64,
    /// Index for the plain recursive variant, small enough to finish in comparable time.
    pub n_plain: i64,
    pub nested: Nested,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            n: 50,
            n_plain: 13,
            nested: crate::nested![1, [2, 3], [4, [5, 6]], [-1, -5], 0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub n: i64,
    pub value: BigUint,
    /// Seconds.
    pub elapsed: f64,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fib({}) = {}, computed in {:.6} seconds",
            self.n, self.value, self.elapsed
        )
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub iterative: Measurement,
    pub plain: Measurement,
    pub cached: Measurement,
    pub nested: Nested,
    pub nested_sum: i64,
}

fn measure<F>(func: F, n: i64) -> Result<Measurement, FibError>
where
    F: FnOnce(i64) -> Result<BigUint, FibError>,
{
    let (value, elapsed) = try_time_call(func, n)?;
    Ok(Measurement { n, value, elapsed })
}

/// Runs the demonstration with a fresh cache.
///
/// # Panics
///
/// If the iterative and memoized variants disagree, which would be a bug.
pub fn run(config: &DemoConfig) -> Result<Report, Error> {
    let mut cache = FibCache::new();
    run_with_cache(config, &mut cache)
}

/// Runs the demonstration, clearing `cache` before the memoized variant is timed.
pub fn run_with_cache(config: &DemoConfig, cache: &mut FibCache) -> Result<Report, Error> {
    let iterative = measure(fib_iter, config.n)?;
    info!("iterative {}", iterative);

    let plain = measure(fib_rec_plain, config.n_plain)?;
    info!("plain recursive {}", plain);

    // Start cold, so the timing covers the whole computation.
    cache.clear();
    let cached = measure(|n| fib_rec_cached(cache, n), config.n)?;
    info!("memoized recursive {}", cached);

    assert_eq!(
        iterative.value, cached.value,
        "iterative and memoized fib({}) disagree",
        config.n
    );

    Ok(Report {
        iterative,
        plain,
        cached,
        nested_sum: config.nested.sum(),
        nested: config.nested.clone(),
    })
}

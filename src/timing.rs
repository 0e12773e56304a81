//! Single-shot wall-clock measurements.

use std::time::Instant;

use tracing::trace;

/// Calls `func(arg)` once and returns its result with the elapsed time in seconds.
///
/// The clock is [`Instant`], which is monotonic. A panic in `func` propagates to the caller.
pub fn time_call<F, A, R>(func: F, arg: A) -> (R, f64)
where
    F: FnOnce(A) -> R,
{
    let start = Instant::now();
    let result = func(arg);
    let elapsed = start.elapsed().as_secs_f64();
    trace!(elapsed, "timed call");
    (result, elapsed)
}

/// Like [`time_call`] for a fallible `func`: its error is returned as is, without a measurement.
pub fn try_time_call<F, A, T, E>(func: F, arg: A) -> Result<(T, f64), E>
where
    F: FnOnce(A) -> Result<T, E>,
{
    let (result, elapsed) = time_call(func, arg);
    Ok((result?, elapsed))
}

//! Fibonacci numbers, 0-indexed: `fib(0) = 0`, `fib(1) = 1`.
//!
//! All three variants take the index as `i64` and validate it before doing any work, so a
//! negative index never reaches the recursion or the cache. Results are [`BigUint`], so every
//! `n >= 0` has a value.

use std::mem;

use crate::memoize;

use num_bigint::BigUint;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Rejected Fibonacci indices.
pub enum FibError {
    /// Fibonacci numbers are only defined for `n >= 0`
    #[error("n must be >= 0, got {0}")]
    NegativeIndex(i64),
}

fn checked_index(n: i64) -> Result<u64, FibError> {
    if n < 0 {
        return Err(FibError::NegativeIndex(n));
    }
    Ok(n as u64)
}

/// Iterative Fibonacci: linear time, constant space, no recursion.
pub fn fib_iter(n: i64) -> Result<BigUint, FibError> {
    let n = checked_index(n)?;
    let (mut a, mut b) = (BigUint::from(0u32), BigUint::from(1u32));
    for _ in 0..n {
        let next = &a + &b;
        a = mem::replace(&mut b, next);
    }
    Ok(a)
}

/// Naive recursive Fibonacci. The call tree grows like φⁿ; keep `n` small.
pub fn fib_rec_plain(n: i64) -> Result<BigUint, FibError> {
    let n = checked_index(n)?;
    Ok(plain(n))
}

fn plain(n: u64) -> BigUint {
    if n < 2 {
        return BigUint::from(n);
    }
    plain(n - 1) + plain(n - 2)
}

#[memoize(Store: pub FibCache, CustomHasher: FxHashMap, HasherInit: FxHashMap::default())]
fn fib_memo(n: u64) -> BigUint {
    if n < 2 {
        return BigUint::from(n);
    }
    fib_memo(n - 1) + fib_memo(n - 2)
}

/// Recursive Fibonacci memoized in `cache`.
///
/// Each distinct index is computed at most once per cache: later calls, including the recursive
/// ones, read the stored value. The index is validated first; a rejected index leaves the cache
/// untouched.
pub fn fib_rec_cached(cache: &mut FibCache, n: i64) -> Result<BigUint, FibError> {
    let n = checked_index(n)?;
    let before = cache.len();
    let value = cache.fib_memo(n);
    debug!(n, cached = cache.len(), added = cache.len() - before, "memoized fibonacci");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(digits: &str) -> BigUint {
        digits.parse().unwrap()
    }

    #[test]
    fn known_values() {
        assert_eq!(fib_iter(0), Ok(BigUint::from(0u32)));
        assert_eq!(fib_iter(1), Ok(BigUint::from(1u32)));
        assert_eq!(fib_iter(2), Ok(BigUint::from(1u32)));
        assert_eq!(fib_iter(10), Ok(BigUint::from(55u32)));
        assert_eq!(fib_iter(50), Ok(BigUint::from(12_586_269_025u64)));
        assert_eq!(fib_iter(100), Ok(big("354224848179261915075")));
    }

    #[test]
    fn variants_agree() {
        let mut cache = FibCache::new();
        for n in 0..=20 {
            let expected = fib_iter(n).unwrap();
            assert_eq!(fib_rec_plain(n).unwrap(), expected, "plain fib({})", n);
            assert_eq!(fib_rec_cached(&mut cache, n).unwrap(), expected, "cached fib({})", n);
        }
        for n in 21..=200 {
            assert_eq!(fib_rec_cached(&mut cache, n), fib_iter(n), "cached fib({})", n);
        }
    }

    #[test]
    fn negative_index_is_rejected() {
        let mut cache = FibCache::new();
        for n in [-1, -2, -50, i64::MIN] {
            assert_eq!(fib_iter(n), Err(FibError::NegativeIndex(n)));
            assert_eq!(fib_rec_plain(n), Err(FibError::NegativeIndex(n)));
            assert_eq!(fib_rec_cached(&mut cache, n), Err(FibError::NegativeIndex(n)));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn large_indices() {
        // Past the range of u128.
        assert_eq!(fib_iter(187), Ok(big("538522340430300790495419781092981030533")));

        let mut cache = FibCache::new();
        let expected = big("222232244629420445529739893461909967206666939096499764990979600");
        assert_eq!(fib_iter(300), Ok(expected.clone()));
        assert_eq!(fib_rec_cached(&mut cache, 300), Ok(expected));
        assert_eq!(cache.len(), 301);
    }

    #[test]
    fn repeated_call_does_not_grow_cache() {
        let mut cache = FibCache::new();
        cache.clear();
        let first = fib_rec_cached(&mut cache, 20).unwrap();
        let size = cache.len();
        // fib(0) through fib(20)
        assert_eq!(size, 21);

        let second = fib_rec_cached(&mut cache, 20).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), size);

        // Smaller indices are already stored.
        assert_eq!(fib_rec_cached(&mut cache, 7), Ok(BigUint::from(13u32)));
        assert_eq!(cache.len(), size);
    }

    #[test]
    fn clear_keeps_results() {
        let mut cache = FibCache::default();
        let warm = fib_rec_cached(&mut cache, 30).unwrap();
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(fib_rec_cached(&mut cache, 30).unwrap(), warm);
        assert_eq!(warm, BigUint::from(832_040u32));
    }

    #[test]
    fn caches_are_independent() {
        let mut a = FibCache::new();
        let mut b = FibCache::new();
        fib_rec_cached(&mut a, 10).unwrap();
        assert_eq!(a.len(), 11);
        assert!(b.is_empty());
        assert_eq!(fib_rec_cached(&mut b, 3), Ok(BigUint::from(2u32)));
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn error_message() {
        assert_eq!(FibError::NegativeIndex(-3).to_string(), "n must be >= 0, got -3");
    }
}

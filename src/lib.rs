//! Three ways to compute Fibonacci numbers, a single-shot timing wrapper, and a deep sum over
//! nested lists of numbers.
//!
//! ```
//! use fibmemo::{fib_iter, fib_rec_cached, fib_rec_plain, FibCache};
//! use num_bigint::BigUint;
//!
//! let mut cache = FibCache::new();
//! let expected = BigUint::from(55u32);
//! assert_eq!(fib_iter(10).unwrap(), expected);
//! assert_eq!(fib_rec_plain(10).unwrap(), expected);
//! assert_eq!(fib_rec_cached(&mut cache, 10).unwrap(), expected);
//! assert!(fib_iter(-1).is_err());
//! ```
//!
//! The memoized variant keeps its results in a [`FibCache`] owned by the caller. The store type
//! is generated by the [`memoize`] attribute, which can be used on other functions as well:
//!
//! ```
//! use fibmemo::memoize;
//!
//! #[memoize(Store: pub Squares)]
//! fn square(x: u64) -> u64 {
//!     x * x
//! }
//!
//! let mut squares = Squares::new();
//! assert_eq!(squares.square(12), 144);
//! assert_eq!(squares.len(), 1);
//! squares.clear();
//! assert!(squares.is_empty());
//! ```

pub mod demo;
pub mod fib;
pub mod nested;
pub mod timing;

pub use fibmemo_inner::memoize;

pub use fib::{fib_iter, fib_rec_cached, fib_rec_plain, FibCache, FibError};
pub use nested::{sum_nested, Nested, ParseNestedError, MAX_DEPTH};
pub use timing::{time_call, try_time_call};

//! Repeatable lazy sequences.
//!
//! This module provides a sequence pipeline that separates *description*
//! from *consumption*:
//!
//! - [`Sequence`]: a lazy pipeline that re-runs from the start on every
//!   consumption
//! - [`Step`]: the continue/stop decision driving early-exit reduction
//! - [`Nest`]: nested elements understood by `flatten`
//! - [`PairLike`] / [`Truthy`]: element capabilities behind `to_map` and
//!   `compact`
//!
//! # Repeatability
//!
//! A `Sequence` holds a factory, not an iterator. Consuming it opens a
//! fresh cursor, so the same value can be handed around and consumed as
//! often as needed — there is no "spent" state to guard against. The price
//! is symmetric: work is re-done per consumption, and side effects in
//! callbacks re-fire per consumption.
//!
//! # Examples
//!
//! ## Building and consuming
//!
//! ```rust
//! use reseq::sequence::Sequence;
//!
//! let evens = Sequence::range(..).filter(|n| n % 2 == 0);
//!
//! assert_eq!(evens.take(3).to_vec(), vec![0, 2, 4]);
//! assert_eq!(evens.first(), Some(0));
//! assert_eq!(evens.take(3).to_vec(), vec![0, 2, 4]); // replays
//! ```
//!
//! ## Early-exit reduction
//!
//! ```rust
//! use reseq::sequence::{Sequence, Step};
//!
//! let sum_until_100 = Sequence::range(1..).reduce(0, |sum, n| {
//!     let next = sum + n;
//!     if next > 100 { Step::Done(sum) } else { Step::Continue(next) }
//! });
//! assert_eq!(sum_until_100, 91); // 1 + 2 + … + 13
//! ```
//!
//! ## Flattening nested data
//!
//! ```rust
//! use reseq::sequence::{Nest, Sequence};
//!
//! let nested: Sequence<Nest<i32>> = Sequence::from_values(vec![
//!     Nest::text("One"),
//!     Nest::list(vec![Nest::text("Two"), Nest::text("Three")]),
//! ]);
//!
//! assert_eq!(nested.flatten().count(), 3);
//! assert_eq!(nested.flatten_text().join(""), "OneTwoThree");
//! ```

mod convert;
mod core;
mod nest;
mod step;

pub use convert::PairLike;
pub use convert::Truthy;
pub use nest::Nest;
pub use step::Step;

pub use self::core::Sequence;

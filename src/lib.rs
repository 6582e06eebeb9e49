//! # reseq
//!
//! Repeatable lazy sequences for Rust: compose a pipeline of transformations
//! once, then consume it any number of times with identical results.
//!
//! ## Overview
//!
//! Ordinary iterators are exhausted after a single pass. A [`Sequence`] is an
//! immutable *description* of a pipeline instead: every traversal re-derives
//! fresh iteration state from the source, so the same value can be reduced,
//! collected, and inspected repeatedly — including pipelines over infinite
//! sources, bounded only by downstream limiting operators such as `take`.
//!
//! - **Sequences**: 20+ lazy combinators (`map`, `filter`, `chunk`,
//!   `interleave`, `flatten`, `cycle`, …) and terminal consumers
//!   (`reduce`, `to_vec`, `to_map`, …), all repeatable.
//! - **Infinite sources**: `range`, `repeat`, `iterate`, `cycle` — safe to
//!   build eagerly, consumed lazily.
//! - **Early termination**: [`Step`] lets `reduce`/`fold` stop mid-stream
//!   without touching the rest of the source.
//! - **Staged vectors**: [`StagedVector`] is an alternate laziness strategy —
//!   eager segment storage with deferred transform application, so a bounded
//!   `take` never touches unconsumed segments.
//!
//! ## Feature Flags
//!
//! - `sequence`: the repeatable lazy [`Sequence`] engine (default)
//! - `vector`: the segment-based [`StagedVector`] engine (default)
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use reseq::prelude::*;
//!
//! let evens = Sequence::range(..)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * n)
//!     .take(4);
//!
//! // The pipeline is a value: consume it as often as you like.
//! assert_eq!(evens.to_vec(), vec![0, 4, 16, 36]);
//! assert_eq!(evens.to_vec(), vec![0, 4, 16, 36]);
//! ```
//!
//! [`Sequence`]: sequence::Sequence
//! [`Step`]: sequence::Step
//! [`StagedVector`]: vector::StagedVector

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use reseq::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "sequence")]
    pub use crate::sequence::*;

    #[cfg(feature = "vector")]
    pub use crate::vector::*;
}

#[cfg(feature = "sequence")]
pub mod sequence;

#[cfg(feature = "vector")]
pub mod vector;

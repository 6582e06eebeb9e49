//! Eager storage with deferred, early-exiting transforms.
//!
//! This module provides [`StagedVector`], a companion to
//! [`Sequence`](crate::sequence::Sequence) for pipelines that start from
//! concrete data and want bounded reads without paying for the whole
//! collection:
//!
//! - Elements live in plain owned segments; `concat`, `append`, and
//!   `prepend` extend the structure instead of copying storage.
//! - `map` and `filter` are staged: they attach pending work to the
//!   segments that exist now and run during reads, not up front.
//! - Bounded reads exit early: `take(n)` and `get(index)` touch only as
//!   many raw elements as the answer needs.
//!
//! Where `Sequence` is immutable and hands back a new pipeline from every
//! combinator, `StagedVector` deliberately mutates in place and returns
//! `&mut Self` — all holders of the vector observe the staged work. Use it
//! when the pipeline has a single owner and the data is already in memory.
//!
//! # Examples
//!
//! ```rust
//! use reseq::vector::StagedVector;
//!
//! let mut report = StagedVector::of(1..=100);
//! report.filter(|n| n % 3 == 0).map(|n| n * n);
//!
//! // Only enough elements to fill the page are ever processed.
//! let page = report.take(5);
//! assert_eq!(page.to_vec(), vec![9, 36, 81, 144, 225]);
//! ```

mod staged;

pub use staged::StagedVector;

//! Early termination for `reduce` and `fold`.
//!
//! This module provides the [`Step`] type, the accumulator state returned by
//! the step function of [`Sequence::reduce`] and [`Sequence::fold`]. A step
//! function answers "keep folding with this accumulator" (`Continue`) or
//! "stop immediately, this is the final result" (`Done`). Because the signal
//! is a dedicated sum type rather than a sentinel value, it can never collide
//! with a user accumulator, and it never escapes the reduce/fold call that
//! interprets it.
//!
//! Stopping early is what makes reductions over infinite sequences possible:
//!
//! ```rust
//! use reseq::sequence::{Sequence, Step};
//!
//! // Sum the naturals until the running total exceeds 5.
//! let total = Sequence::range(..).fold(|accumulator, n| {
//!     if accumulator > 5 {
//!         Step::Done(accumulator)
//!     } else {
//!         Step::Continue(accumulator + n)
//!     }
//! });
//!
//! assert_eq!(total, Some(6));
//! ```
//!
//! [`Sequence::reduce`]: super::Sequence::reduce
//! [`Sequence::fold`]: super::Sequence::fold

/// The state of a reduction after one application of the step function.
///
/// `Step<A>` is interpreted by the driver loop inside `reduce`/`fold`:
/// `Continue` feeds the accumulator into the next application, `Done` ends
/// the traversal at once — no further elements are pulled from the source.
///
/// # Examples
///
/// ```rust
/// use reseq::sequence::{Sequence, Step};
///
/// // Without early termination the product of an infinite range would
/// // never return; `Done` bounds the work.
/// let product = Sequence::range_by(1.., 1)
///     .fold(|accumulator, n| {
///         if n > 5 {
///             Step::Done(accumulator)
///         } else {
///             Step::Continue(accumulator * n)
///         }
///     });
///
/// assert_eq!(product, Some(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<A> {
    /// Keep reducing with this accumulator.
    Continue(A),
    /// Stop reducing; this is the final result.
    Done(A),
}

impl<A> Step<A> {
    /// Returns `true` if this step ends the reduction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Step;
    ///
    /// assert!(Step::Done(1).is_done());
    /// assert!(!Step::Continue(1).is_done());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Extracts the accumulator, discarding the continue/done distinction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Step;
    ///
    /// assert_eq!(Step::Continue(3).into_inner(), 3);
    /// assert_eq!(Step::Done(7).into_inner(), 7);
    /// ```
    #[inline]
    pub fn into_inner(self) -> A {
        match self {
            Self::Continue(accumulator) | Self::Done(accumulator) => accumulator,
        }
    }

    /// Applies a function to the accumulator, preserving the state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Step;
    ///
    /// assert_eq!(Step::Continue(3).map(|n| n * 2), Step::Continue(6));
    /// assert_eq!(Step::Done(3).map(|n| n * 2), Step::Done(6));
    /// ```
    #[inline]
    pub fn map<B, F>(self, function: F) -> Step<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Continue(accumulator) => Step::Continue(function(accumulator)),
            Self::Done(accumulator) => Step::Done(function(accumulator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_is_done() {
        assert!(Step::Done(0).is_done());
        assert!(!Step::Continue(0).is_done());
    }

    #[rstest]
    fn test_into_inner_ignores_state() {
        assert_eq!(Step::Continue("a").into_inner(), "a");
        assert_eq!(Step::Done("b").into_inner(), "b");
    }

    #[rstest]
    fn test_map_preserves_state() {
        assert_eq!(Step::Continue(2).map(|n| n + 1), Step::Continue(3));
        assert_eq!(Step::Done(2).map(|n| n + 1), Step::Done(3));
    }
}

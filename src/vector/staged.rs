//! The staged vector: eager storage, deferred transforms.
//!
//! [`StagedVector`] keeps its elements in plain owned segments and keeps
//! `map`/`filter` as *pending work* attached to those segments. The pending
//! work only runs inside a read — and a bounded read such as
//! [`take`](StagedVector::take) runs it for exactly as many elements as the
//! answer needs, then stops.
//!
//! # Examples
//!
//! ```rust
//! use reseq::vector::StagedVector;
//!
//! let mut numbers = StagedVector::of(1..=4);
//! numbers
//!     .filter(|n| n % 2 == 0)
//!     .concat(vec![5, 6, 7, 8])
//!     .filter(|n| n % 2 == 0);
//!
//! // Pending filters run only while collecting three results;
//! // 7 and 8 are never touched.
//! assert_eq!(numbers.take(3).to_vec(), vec![2, 4, 6]);
//! ```

use std::fmt;
use std::rc::Rc;

use static_assertions::assert_not_impl_any;

/// One staged transform: rewrite the element or remove it.
type Transform<T> = Box<dyn Fn(T) -> Slot<T>>;

/// The outcome of pushing an element through one transform.
///
/// A separate sum type, so no user value can be mistaken for "removed".
enum Slot<T> {
    Value(T),
    Removed,
}

// =============================================================================
// StagedVector Definition
// =============================================================================

/// An eager vector with deferred, per-segment transforms.
///
/// Storage is a list of *segments* (plain `Vec`s, structurally extended at
/// either end), and each segment carries its own list of pending
/// transforms. `map` and `filter` do no element work up front: they append
/// one compiled transform to every segment that currently exists. Segments
/// added afterwards start with an empty list, so new elements never see
/// transforms that predate them.
///
/// Reads apply the pending work on the fly to clones of the raw elements;
/// the raw storage itself is never rewritten. A bounded read stops early:
/// `take(n)` touches exactly as many raw elements as it takes to accept `n`
/// results.
///
/// Unlike [`Sequence`](crate::sequence::Sequence), which is immutable and
/// re-consumable, `StagedVector` is a *shared mutable* pipeline: `map`,
/// `filter`, `concat`, `append`, and `prepend` mutate the receiver in place
/// and return `&mut Self` for chaining. Every holder of the vector observes
/// the staged work. `take`, `get`, and `to_vec` are non-mutating reads.
///
/// `StagedVector` is a single-threaded type; it is neither `Send` nor
/// `Sync`.
///
/// # Examples
///
/// ```rust
/// use reseq::vector::StagedVector;
///
/// let mut squares = StagedVector::of(1..=5);
/// squares.map(|n| n * n).filter(|n| *n > 5);
///
/// assert_eq!(squares.to_vec(), vec![9, 16, 25]);
/// assert_eq!(squares.get(0), Some(9));
/// ```
pub struct StagedVector<T: 'static> {
    segments: Vec<Vec<T>>,
    transforms: Vec<Vec<Transform<T>>>,
}

impl<T: Clone + 'static> StagedVector<T> {
    /// Creates an empty staged vector with no segments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let empty: StagedVector<i32> = StagedVector::new();
    /// assert_eq!(empty.segment_count(), 0);
    /// assert!(empty.to_vec().is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            transforms: Vec::new(),
        }
    }

    /// Creates a staged vector holding the given elements as one segment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let numbers = StagedVector::of(1..=3);
    /// assert_eq!(numbers.to_vec(), vec![1, 2, 3]);
    /// assert_eq!(numbers.segment_count(), 1);
    /// ```
    pub fn of<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            segments: vec![elements.into_iter().collect()],
            transforms: vec![Vec::new()],
        }
    }

    /// Stages a transform over every element currently stored.
    ///
    /// No element work happens now; the function runs during reads. The
    /// transform is attached to every existing segment — elements added
    /// later are not affected. Transforms are type-preserving by
    /// construction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(1..=3);
    /// numbers.map(|n| n * 10);
    /// assert_eq!(numbers.to_vec(), vec![10, 20, 30]);
    /// ```
    pub fn map<F>(&mut self, function: F) -> &mut Self
    where
        F: Fn(T) -> T + 'static,
    {
        let function = Rc::new(function);
        for stages in &mut self.transforms {
            let function = Rc::clone(&function);
            stages.push(Box::new(move |element| Slot::Value(function(element))));
        }
        self
    }

    /// Stages a removal of the elements failing a predicate.
    ///
    /// Like [`map`](Self::map), the predicate is attached to every existing
    /// segment and runs during reads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(1..=6);
    /// numbers.filter(|n| n % 2 == 0);
    /// assert_eq!(numbers.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        for stages in &mut self.transforms {
            let predicate = Rc::clone(&predicate);
            stages.push(Box::new(move |element| {
                if predicate(&element) {
                    Slot::Value(element)
                } else {
                    Slot::Removed
                }
            }));
        }
        self
    }

    /// Adds elements at the end as a new segment.
    ///
    /// Structural extension only: existing storage is not copied, and the
    /// new segment starts with no pending transforms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(vec![1, 2]);
    /// numbers.concat(vec![3, 4]);
    /// assert_eq!(numbers.to_vec(), vec![1, 2, 3, 4]);
    /// assert_eq!(numbers.segment_count(), 2);
    /// ```
    pub fn concat(&mut self, elements: Vec<T>) -> &mut Self {
        self.segments.push(elements);
        self.transforms.push(Vec::new());
        self
    }

    /// Adds one element at the end.
    ///
    /// Earlier staged transforms do not apply to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut evens = StagedVector::of(1..=4);
    /// evens.filter(|n| n % 2 == 0).append(5);
    /// assert_eq!(evens.to_vec(), vec![2, 4, 5]);
    /// ```
    pub fn append(&mut self, value: T) -> &mut Self {
        self.concat(vec![value])
    }

    /// Adds one element at the front.
    ///
    /// Earlier staged transforms do not apply to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(vec![1, 2]);
    /// numbers.map(|n| n * 10).prepend(0);
    /// assert_eq!(numbers.to_vec(), vec![0, 10, 20]);
    /// ```
    pub fn prepend(&mut self, value: T) -> &mut Self {
        self.segments.insert(0, vec![value]);
        self.transforms.insert(0, Vec::new());
        self
    }

    /// Collects at most `count` accepted elements into a fresh vector.
    ///
    /// Walks segments in order, pushing a clone of each raw element through
    /// its segment's pending transforms, and stops the moment `count`
    /// results are accepted — later elements and segments are never
    /// touched. The result is a single-segment vector with no pending
    /// transforms; the receiver is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(1..=8);
    /// numbers.filter(|n| n % 2 == 0);
    ///
    /// assert_eq!(numbers.take(2).to_vec(), vec![2, 4]);
    /// assert_eq!(numbers.to_vec(), vec![2, 4, 6, 8]); // unchanged
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        let mut accepted = Vec::new();
        if count > 0 {
            'walk: for (segment, stages) in self.segments.iter().zip(&self.transforms) {
                for element in segment {
                    if let Slot::Value(value) = Self::apply(stages, element.clone()) {
                        accepted.push(value);
                        if accepted.len() == count {
                            break 'walk;
                        }
                    }
                }
            }
        }
        Self {
            segments: vec![accepted],
            transforms: vec![Vec::new()],
        }
    }

    /// Returns the accepted element at a position, if any.
    ///
    /// With no pending transforms anywhere this is a cumulative
    /// segment-length walk over the raw storage. Otherwise the element is
    /// found through a bounded [`take`](Self::take). Out of range is
    /// `None`, never an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(vec![0, 1, 2]);
    /// numbers.concat(vec![3, 4]);
    ///
    /// assert_eq!(numbers.get(2), Some(2));
    /// assert_eq!(numbers.get(3), Some(3));
    /// assert_eq!(numbers.get(9), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if self.transforms.iter().all(Vec::is_empty) {
            let mut offset = 0;
            for segment in &self.segments {
                if index < offset + segment.len() {
                    return Some(segment[index - offset].clone());
                }
                offset += segment.len();
            }
            None
        } else {
            let taken = self.take(index.saturating_add(1));
            taken
                .segments
                .first()
                .and_then(|accepted| accepted.get(index).cloned())
        }
    }

    /// Applies all pending transforms and collects every accepted element.
    ///
    /// The receiver is left unchanged; the pending work re-runs on the next
    /// read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(1..=4);
    /// numbers.map(|n| n + 10);
    /// assert_eq!(numbers.to_vec(), vec![11, 12, 13, 14]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut collected = Vec::new();
        for (segment, stages) in self.segments.iter().zip(&self.transforms) {
            for element in segment {
                if let Slot::Value(value) = Self::apply(stages, element.clone()) {
                    collected.push(value);
                }
            }
        }
        collected
    }

    /// Returns the number of storage segments.
    ///
    /// Extending operations add segments instead of copying storage, so
    /// this exposes the structural shape for inspection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::vector::StagedVector;
    ///
    /// let mut numbers = StagedVector::of(vec![1]);
    /// numbers.concat(vec![2]).prepend(0);
    /// assert_eq!(numbers.segment_count(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Pushes one raw element through a segment's transform list.
    fn apply(stages: &[Transform<T>], element: T) -> Slot<T> {
        let mut current = element;
        for stage in stages {
            match stage(current) {
                Slot::Value(next) => current = next,
                Slot::Removed => return Slot::Removed,
            }
        }
        Slot::Value(current)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: Clone + 'static> Default for StagedVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> From<Vec<T>> for StagedVector<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::of(elements)
    }
}

impl<T: Clone + 'static> FromIterator<T> for StagedVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(elements: I) -> Self {
        Self::of(elements)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for StagedVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StagedVector")
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

// Boxed transforms keep this single-threaded by construction.
assert_not_impl_any!(StagedVector<i32>: Send, Sync);

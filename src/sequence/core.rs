//! The repeatable sequence type and its combinator pipeline.
//!
//! [`Sequence`] is an immutable description of a traversal: it holds a
//! factory that opens a brand-new cursor each time the sequence is consumed.
//! Combinators never run anything — they wrap the parent factory in a new
//! one — and terminal consumers drive exactly one fresh cursor. Because the
//! description is all that is shared, a sequence can be consumed any number
//! of times and always replays from the start.
//!
//! # Examples
//!
//! ```rust
//! use reseq::sequence::Sequence;
//!
//! let evens = Sequence::range(..)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * n)
//!     .take(4);
//!
//! assert_eq!(evens.to_vec(), vec![0, 4, 16, 36]);
//! assert_eq!(evens.to_vec(), vec![0, 4, 16, 36]); // replays, same result
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fmt::Display;
use std::hash::Hash;
use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

use static_assertions::assert_not_impl_any;

use super::convert::{PairLike, Truthy};
use super::nest::{self, Nest};
use super::step::Step;

/// A single traversal's cursor.
type Cursor<T> = Box<dyn Iterator<Item = T>>;

/// The shared factory behind a sequence; each call opens a fresh cursor.
type Factory<T> = Rc<dyn Fn() -> Cursor<T>>;

// =============================================================================
// Sequence Definition
// =============================================================================

/// A lazy sequence that can be consumed any number of times.
///
/// A `Sequence<T>` wraps a *factory*: a function that produces a fresh
/// iterator over the same logical elements on every call. All per-traversal
/// state — counters, seen-sets, lookahead buffers — lives inside the cursor a
/// single consumption drives, so no consumption can observe another.
/// Combinators stack further factories on top of the parent's and stay lazy;
/// terminal consumers open one cursor and drain as little of it as their
/// answer requires.
///
/// Cloning a sequence is a cheap pointer copy: both handles share one factory
/// ([`same`](Self::same) tells them apart from coincidentally equal
/// pipelines). User callbacks given to combinators are owned by the pipeline
/// and re-run on every traversal, once per element pulled.
///
/// `Sequence` is a single-threaded type; it is neither `Send` nor `Sync`.
///
/// # Examples
///
/// Side effects in callbacks re-execute per traversal, and laziness keeps
/// the work proportional to what was actually pulled:
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use reseq::sequence::Sequence;
///
/// let calls = Rc::new(Cell::new(0));
/// let observed = Rc::clone(&calls);
///
/// let squares = Sequence::range(1..)
///     .map(move |n| {
///         observed.set(observed.get() + 1);
///         n * n
///     })
///     .take(3);
///
/// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
/// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
///
/// // Three elements pulled per traversal, two traversals.
/// assert_eq!(calls.get(), 6);
/// ```
pub struct Sequence<T: 'static> {
    factory: Factory<T>,
}

impl<T: 'static> Sequence<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a sequence from a cursor factory.
    ///
    /// The factory is invoked once per consumption and must return an
    /// iterator that starts from the beginning. Any state the traversal
    /// needs should be created inside the factory body so that consumptions
    /// stay independent.
    ///
    /// # Arguments
    ///
    /// * `factory` - A function producing a fresh iterator per call
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let countdown = Sequence::new(|| (1..=3).rev());
    /// assert_eq!(countdown.to_vec(), vec![3, 2, 1]);
    /// assert_eq!(countdown.to_vec(), vec![3, 2, 1]);
    /// ```
    pub fn new<I, F>(factory: F) -> Self
    where
        I: Iterator<Item = T> + 'static,
        F: Fn() -> I + 'static,
    {
        Self {
            factory: Rc::new(move || Box::new(factory()) as Cursor<T>),
        }
    }

    /// Creates a sequence with no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert!(Sequence::<i32>::empty().is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new(std::iter::empty)
    }

    /// Creates a sequence over any re-iterable value.
    ///
    /// The iterable is cloned for every traversal, which is what makes the
    /// result re-consumable. Ranges, collections, and other sequences all
    /// qualify. Note that a half-consumed iterator clones into the same
    /// half-consumed state and will only ever replay what it still holds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let doubled = Sequence::of(1..=3).map(|n| n * 2);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn of<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        Self::new(move || iterable.clone().into_iter())
    }

    /// Creates a one-element sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::singleton(7).to_vec(), vec![7]);
    /// ```
    pub fn singleton(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || std::iter::once(value.clone()))
    }

    /// Creates a sequence over owned values.
    ///
    /// The values are stored once behind a shared pointer; traversals clone
    /// individual elements as they are pulled, never the whole collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let letters = Sequence::from_values(vec!["a", "b", "c"]);
    /// assert_eq!(letters.to_vec(), vec!["a", "b", "c"]);
    /// assert_eq!(letters.count(), 3);
    /// ```
    pub fn from_values(values: Vec<T>) -> Self
    where
        T: Clone,
    {
        let values = Rc::new(values);
        Self::new(move || {
            let values = Rc::clone(&values);
            let length = values.len();
            (0..length).map(move |index| values[index].clone())
        })
    }

    /// Creates an infinite sequence repeating one value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::repeat(1).take(5).to_vec(), vec![1, 1, 1, 1, 1]);
    /// ```
    pub fn repeat(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || std::iter::repeat(value.clone()))
    }

    /// Creates a sequence repeating one value a fixed number of times.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::repeat_n("x", 3).join(""), "xxx");
    /// ```
    pub fn repeat_n(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::new(move || std::iter::repeat_n(value.clone(), count))
    }

    /// Creates an infinite sequence of repeated applications of a function.
    ///
    /// The first element is `function(&seed)`; the seed itself is never
    /// yielded. Every traversal restarts from a fresh copy of the seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let successors = Sequence::iterate(5, |n| n + 1);
    /// assert_eq!(successors.take(5).to_vec(), vec![6, 7, 8, 9, 10]);
    /// assert_eq!(successors.take(2).to_vec(), vec![6, 7]);
    /// ```
    pub fn iterate<F>(seed: T, function: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> T + 'static,
    {
        let function = Rc::new(function);
        Self::new(move || {
            let function = Rc::clone(&function);
            let mut state = seed.clone();
            std::iter::from_fn(move || {
                state = function(&state);
                Some(state.clone())
            })
        })
    }

    /// Opens a fresh cursor over the elements.
    ///
    /// Every call restarts from the beginning; drive the returned iterator
    /// directly when the consuming loop wants manual control.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let naturals = Sequence::range(..);
    /// let mut cursor = naturals.iter();
    /// assert_eq!(cursor.next(), Some(0));
    /// assert_eq!(cursor.next(), Some(1));
    ///
    /// // A second cursor is unaffected by the first.
    /// assert_eq!(naturals.iter().next(), Some(0));
    /// ```
    #[must_use]
    pub fn iter(&self) -> Box<dyn Iterator<Item = T>> {
        (self.factory)()
    }

    /// Returns `true` when both handles share one factory.
    ///
    /// This is identity, not element equality: two pipelines built the same
    /// way are distinct sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let source = Sequence::range(0..3);
    /// let alias = source.clone();
    /// assert!(source.same(&alias));
    /// assert!(!source.same(&Sequence::range(0..3)));
    /// ```
    #[inline]
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.factory, &other.factory)
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Transforms every element with a function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let squares = Sequence::range(1..=3).map(|n| n * n);
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// ```
    #[must_use]
    pub fn map<R, F>(&self, function: F) -> Sequence<R>
    where
        R: 'static,
        F: Fn(T) -> R + 'static,
    {
        let parent = self.clone();
        let function = Rc::new(function);
        Sequence::new(move || {
            let function = Rc::clone(&function);
            parent.iter().map(move |element| function(element))
        })
    }

    /// Transforms every element with a function that also receives the
    /// element's position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let labeled = Sequence::from_values(vec!["a", "b"])
    ///     .map_indexed(|index, element| format!("{index}:{element}"));
    /// assert_eq!(labeled.to_vec(), vec!["0:a", "1:b"]);
    /// ```
    #[must_use]
    pub fn map_indexed<R, F>(&self, function: F) -> Sequence<R>
    where
        R: 'static,
        F: Fn(usize, T) -> R + 'static,
    {
        let parent = self.clone();
        let function = Rc::new(function);
        Sequence::new(move || {
            let function = Rc::clone(&function);
            parent
                .iter()
                .enumerate()
                .map(move |(index, element)| function(index, element))
        })
    }

    /// Keeps the elements that satisfy a predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let evens = Sequence::range(0..8).filter(|n| n % 2 == 0);
    /// assert_eq!(evens.to_vec(), vec![0, 2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let parent = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move || {
            let predicate = Rc::clone(&predicate);
            parent.iter().filter(move |element| predicate(element))
        })
    }

    /// Discards the elements that satisfy a predicate.
    ///
    /// The complement of [`filter`](Self::filter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let odds = Sequence::range(0..8).remove(|n| n % 2 == 0);
    /// assert_eq!(odds.to_vec(), vec![1, 3, 5, 7]);
    /// ```
    #[must_use]
    pub fn remove<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let parent = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move || {
            let predicate = Rc::clone(&predicate);
            parent.iter().filter(move |element| !predicate(element))
        })
    }

    /// Keeps at most the first `count` elements.
    ///
    /// Never pulls past the boundary, so taking from an infinite sequence
    /// is fine.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(..).take(5).to_vec(), vec![0, 1, 2, 3, 4]);
    /// assert!(Sequence::range(..).take(0).is_empty());
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        let parent = self.clone();
        Self::new(move || parent.iter().take(count))
    }

    /// Keeps elements while a predicate holds, then stops.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let below = Sequence::range(..).take_while(|n| *n < 4);
    /// assert_eq!(below.to_vec(), vec![0, 1, 2, 3]);
    /// ```
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let parent = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move || {
            let predicate = Rc::clone(&predicate);
            parent.iter().take_while(move |element| predicate(element))
        })
    }

    /// Keeps at most the last `count` elements.
    ///
    /// Each traversal makes two passes: one to measure, one to replay the
    /// tail. Never returns if the sequence is infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..10).take_last(3).to_vec(), vec![7, 8, 9]);
    /// assert_eq!(Sequence::range(0..2).take_last(5).to_vec(), vec![0, 1]);
    /// ```
    #[must_use]
    pub fn take_last(&self, count: usize) -> Self {
        let parent = self.clone();
        Self::new(move || {
            let total = parent.iter().count();
            let skipped = total.saturating_sub(count);
            parent.iter().skip(skipped)
        })
    }

    /// Keeps the elements at positions `0, stride, 2 * stride, …`.
    ///
    /// A stride of zero degenerates to the first element alone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..10).take_nth(3).to_vec(), vec![0, 3, 6, 9]);
    /// assert_eq!(Sequence::range(0..10).take_nth(0).to_vec(), vec![0]);
    /// ```
    #[must_use]
    pub fn take_nth(&self, stride: usize) -> Self {
        let parent = self.clone();
        Self::new(move || {
            let mut cursor = parent.iter();
            let mut started = false;
            std::iter::from_fn(move || {
                if started {
                    cursor.nth(stride.checked_sub(1)?)
                } else {
                    started = true;
                    cursor.next()
                }
            })
        })
    }

    /// Discards the first `count` elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..5).drop(2).to_vec(), vec![2, 3, 4]);
    /// assert!(Sequence::range(0..2).drop(9).is_empty());
    /// ```
    #[must_use]
    pub fn drop(&self, count: usize) -> Self {
        let parent = self.clone();
        Self::new(move || parent.iter().skip(count))
    }

    /// Discards the first element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..4).rest().to_vec(), vec![1, 2, 3]);
    /// ```
    #[inline]
    #[must_use]
    pub fn rest(&self) -> Self {
        self.drop(1)
    }

    /// Discards elements while a predicate holds, then keeps the rest.
    ///
    /// The leading scan is lazy and re-runs on every traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let tail = Sequence::range(0..8).drop_while(|n| *n < 5);
    /// assert_eq!(tail.to_vec(), vec![5, 6, 7]);
    /// ```
    #[must_use]
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let parent = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move || {
            let predicate = Rc::clone(&predicate);
            parent.iter().skip_while(move |element| predicate(element))
        })
    }

    /// Keeps the first occurrence of each element, in encounter order.
    ///
    /// Each traversal builds a fresh seen-set, so memory grows with the
    /// number of distinct elements; never finishes on an infinite sequence
    /// with infinitely many distinct elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let unique = Sequence::from_values(vec![1, 2, 1, 3, 2]).distinct();
    /// assert_eq!(unique.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn distinct(&self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let parent = self.clone();
        Self::new(move || {
            let mut seen = HashSet::new();
            parent.iter().filter(move |element| seen.insert(element.clone()))
        })
    }

    /// Collapses runs of consecutive equal elements to one occurrence.
    ///
    /// Only adjacent duplicates collapse; a value may reappear later.
    /// Needs one element of memory, so it is safe on infinite sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let collapsed = Sequence::from_values(vec![1, 1, 2, 2, 1]).dedupe();
    /// assert_eq!(collapsed.to_vec(), vec![1, 2, 1]);
    /// ```
    #[must_use]
    pub fn dedupe(&self) -> Self
    where
        T: PartialEq + Clone,
    {
        let parent = self.clone();
        Self::new(move || {
            let mut previous: Option<T> = None;
            parent.iter().filter(move |element| {
                let changed = previous.as_ref() != Some(element);
                if changed {
                    previous = Some(element.clone());
                }
                changed
            })
        })
    }

    /// Groups elements into runs of `size`, one group per pull.
    ///
    /// The trailing group may be shorter; an empty trailing group is never
    /// emitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let grouped = Sequence::range(0..7).chunk(3);
    /// assert_eq!(grouped.to_vec(), vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    /// ```
    #[must_use]
    pub fn chunk(&self, size: usize) -> Sequence<Vec<T>> {
        self.chunk_step(size, 1)
    }

    /// Groups elements into runs of `size`, discarding `step - 1` elements
    /// between consecutive groups.
    ///
    /// `chunk_step(size, 1)` is plain [`chunk`](Self::chunk). A larger step
    /// samples the source: fill a group, skip the gap, fill the next. The
    /// trailing group may be shorter; a `size` of zero yields nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let strided = Sequence::range(0..10).chunk_step(2, 3);
    /// assert_eq!(strided.to_vec(), vec![vec![0, 1], vec![4, 5], vec![8, 9]]);
    /// ```
    #[must_use]
    pub fn chunk_step(&self, size: usize, step: usize) -> Sequence<Vec<T>> {
        let parent = self.clone();
        Sequence::new(move || {
            let mut cursor = parent.iter();
            let mut finished = false;
            std::iter::from_fn(move || {
                if finished || size == 0 {
                    return None;
                }
                let mut group = Vec::new();
                while group.len() < size {
                    match cursor.next() {
                        Some(element) => group.push(element),
                        None => {
                            finished = true;
                            break;
                        }
                    }
                }
                if !finished {
                    for _ in 0..step.saturating_sub(1) {
                        if cursor.next().is_none() {
                            finished = true;
                            break;
                        }
                    }
                }
                if group.is_empty() { None } else { Some(group) }
            })
        })
    }

    /// Maps every element to an iterable and concatenates the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let expanded = Sequence::range(1..4).mapcat(|n| vec![n; n as usize]);
    /// assert_eq!(expanded.to_vec(), vec![1, 2, 2, 3, 3, 3]);
    /// ```
    #[must_use]
    pub fn mapcat<R, I, F>(&self, function: F) -> Sequence<R>
    where
        R: 'static,
        I: IntoIterator<Item = R> + 'static,
        I::IntoIter: 'static,
        F: Fn(T) -> I + 'static,
    {
        let parent = self.clone();
        let function = Rc::new(function);
        Sequence::new(move || {
            let function = Rc::clone(&function);
            parent.iter().flat_map(move |element| function(element))
        })
    }

    /// Appends another iterable after this sequence.
    ///
    /// The other iterable is cloned per traversal, so the result stays
    /// re-consumable. Another `Sequence` works as the argument.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let joined = Sequence::range(0..2).concat(vec![5, 6]);
    /// assert_eq!(joined.to_vec(), vec![0, 1, 5, 6]);
    /// ```
    #[must_use]
    pub fn concat<I>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        let parent = self.clone();
        Self::new(move || parent.iter().chain(other.clone()))
    }

    /// Alternates elements of this sequence with another iterable.
    ///
    /// Elements are pulled in strict pairs; the result ends as soon as
    /// either side runs out, even when the other member of the pair was
    /// already pulled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let woven = Sequence::range_by(0..5, 2).interleave(vec![1, 3]);
    /// assert_eq!(woven.to_vec(), vec![0, 1, 2, 3]);
    /// ```
    #[must_use]
    pub fn interleave<I>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        let parent = self.clone();
        Self::new(move || {
            let mut left = parent.iter();
            let mut right = other.clone().into_iter();
            let mut pending: Option<T> = None;
            std::iter::from_fn(move || {
                if let Some(element) = pending.take() {
                    return Some(element);
                }
                let first = left.next()?;
                let second = right.next()?;
                pending = Some(second);
                Some(first)
            })
        })
    }

    /// Inserts a separator between consecutive elements.
    ///
    /// Never leading, never trailing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let listed = Sequence::from_values(vec!["a", "b", "c"]).interpose(", ");
    /// assert_eq!(listed.join(""), "a, b, c");
    /// ```
    #[must_use]
    pub fn interpose(&self, separator: T) -> Self
    where
        T: Clone,
    {
        let parent = self.clone();
        Self::new(move || {
            let separator = separator.clone();
            let mut cursor = parent.iter().peekable();
            let mut emit_separator = false;
            std::iter::from_fn(move || {
                if emit_separator {
                    emit_separator = false;
                    Some(separator.clone())
                } else {
                    let element = cursor.next()?;
                    emit_separator = cursor.peek().is_some();
                    Some(element)
                }
            })
        })
    }

    /// Repeats the whole sequence endlessly.
    ///
    /// Each lap opens a fresh traversal of the parent. An empty parent
    /// produces an empty cycle rather than spinning forever.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let looped = Sequence::from_values(vec![1, 2]).cycle();
    /// assert_eq!(looped.take(5).to_vec(), vec![1, 2, 1, 2, 1]);
    /// ```
    #[must_use]
    pub fn cycle(&self) -> Self {
        let parent = self.clone();
        Self::new(move || {
            let parent = parent.clone();
            let mut cursor = parent.iter();
            let mut yielded_any = false;
            std::iter::from_fn(move || match cursor.next() {
                Some(element) => {
                    yielded_any = true;
                    Some(element)
                }
                None => {
                    if !yielded_any {
                        return None;
                    }
                    cursor = parent.iter();
                    cursor.next()
                }
            })
        })
    }

    /// Adds one element in front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(1..3).prepend(0).to_vec(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn prepend(&self, value: T) -> Self
    where
        T: Clone,
    {
        let parent = self.clone();
        Self::new(move || std::iter::once(value.clone()).chain(parent.iter()))
    }

    /// Adds one element at the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..2).append(9).to_vec(), vec![0, 1, 9]);
    /// ```
    #[must_use]
    pub fn append(&self, value: T) -> Self
    where
        T: Clone,
    {
        let parent = self.clone();
        Self::new(move || parent.iter().chain(std::iter::once(value.clone())))
    }

    /// Substitutes elements found in a mapping, passing the rest through.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use reseq::sequence::Sequence;
    ///
    /// let mapping = HashMap::from([(2, 20), (4, 40)]);
    /// let swapped = Sequence::from_values(vec![1, 2, 3, 4]).replace(mapping);
    /// assert_eq!(swapped.to_vec(), vec![1, 20, 3, 40]);
    /// ```
    #[must_use]
    pub fn replace(&self, mapping: HashMap<T, T>) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let parent = self.clone();
        let mapping = Rc::new(mapping);
        Self::new(move || {
            let mapping = Rc::clone(&mapping);
            parent
                .iter()
                .map(move |element| mapping.get(&element).cloned().unwrap_or(element))
        })
    }

    /// Discards falsy elements.
    ///
    /// What counts as falsy is the element type's [`Truthy`] implementation:
    /// zero, empty text, `false`, `NaN`, and `None` go; everything else
    /// stays.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let kept = Sequence::from_values(vec![0, 1, 0, 2, 3]).compact();
    /// assert_eq!(kept.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn compact(&self) -> Self
    where
        T: Truthy,
    {
        self.filter(|element| element.is_truthy())
    }

    /// Discards the last element, keeping everything before it.
    ///
    /// Uses one element of lookahead, so the sequence is not materialized.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..5).but_last().to_vec(), vec![0, 1, 2, 3]);
    /// assert!(Sequence::singleton(1).but_last().is_empty());
    /// ```
    #[must_use]
    pub fn but_last(&self) -> Self {
        let parent = self.clone();
        Self::new(move || {
            let mut cursor = parent.iter().peekable();
            std::iter::from_fn(move || {
                let element = cursor.next()?;
                if cursor.peek().is_some() {
                    Some(element)
                } else {
                    None
                }
            })
        })
    }

    /// Keeps the elements whose positions fall inside a range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..10).slice(2..5).to_vec(), vec![2, 3, 4]);
    /// assert_eq!(Sequence::range(0..10).slice(7..).to_vec(), vec![7, 8, 9]);
    /// ```
    #[must_use]
    pub fn slice<R>(&self, positions: R) -> Self
    where
        R: RangeBounds<usize>,
    {
        let start = match positions.start_bound() {
            Bound::Included(&position) => position,
            Bound::Excluded(&position) => position.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match positions.end_bound() {
            Bound::Included(&position) => Some(position.saturating_add(1)),
            Bound::Excluded(&position) => Some(position),
            Bound::Unbounded => None,
        };
        let parent = self.clone();
        Self::new(move || {
            let count = end.map_or(usize::MAX, |limit| limit.saturating_sub(start));
            parent.iter().skip(start).take(count)
        })
    }

    /// Replaces a window of elements with the contents of an iterable.
    ///
    /// Yields the first `start` elements, then the replacement, then the
    /// parent's elements from position `start + remove_count` on. A source
    /// shorter than `start` simply runs out earlier; the replacement is
    /// still emitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let patched = Sequence::range(0..6).splice(2, 2, vec![20, 30]);
    /// assert_eq!(patched.to_vec(), vec![0, 1, 20, 30, 4, 5]);
    /// ```
    #[must_use]
    pub fn splice<I>(&self, start: usize, remove_count: usize, replacement: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        let parent = self.clone();
        Self::new(move || {
            parent
                .iter()
                .take(start)
                .chain(replacement.clone())
                .chain(parent.iter().skip(start.saturating_add(remove_count)))
        })
    }

    /// Splits into the first `index` elements and everything after.
    ///
    /// Both halves are independent sequences over the same parent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let (head, tail) = Sequence::range(0..6).split_at(2);
    /// assert_eq!(head.to_vec(), vec![0, 1]);
    /// assert_eq!(tail.to_vec(), vec![2, 3, 4, 5]);
    /// ```
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        (self.take(index), self.drop(index))
    }

    /// Splits at the first element that fails a predicate.
    ///
    /// The first half is [`take_while`](Self::take_while), the second
    /// [`drop_while`](Self::drop_while), over one shared predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let (small, large) = Sequence::range(0..6).split_with(|n| *n < 3);
    /// assert_eq!(small.to_vec(), vec![0, 1, 2]);
    /// assert_eq!(large.to_vec(), vec![3, 4, 5]);
    /// ```
    #[must_use]
    pub fn split_with<P>(&self, predicate: P) -> (Self, Self)
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        let leading = Rc::clone(&predicate);
        (
            self.take_while(move |element| leading(element)),
            self.drop_while(move |element| predicate(element)),
        )
    }

    /// Splits into the elements that satisfy a predicate and those that
    /// do not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let (evens, odds) = Sequence::range(0..6).partition(|n| n % 2 == 0);
    /// assert_eq!(evens.to_vec(), vec![0, 2, 4]);
    /// assert_eq!(odds.to_vec(), vec![1, 3, 5]);
    /// ```
    #[must_use]
    pub fn partition<P>(&self, predicate: P) -> (Self, Self)
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        let matching = Rc::clone(&predicate);
        (
            self.filter(move |element| matching(element)),
            self.remove(move |element| predicate(element)),
        )
    }

    /// Splits into maximal runs of elements sharing a key.
    ///
    /// Each run is itself a lazy sequence; the remainder after a run is
    /// re-derived from the current remainder, so every element belongs to
    /// exactly one run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let runs: Vec<Vec<i32>> = Sequence::from_values(vec![1, 1, 2, 2, 2, 3])
    ///     .partition_by(|n| *n)
    ///     .iter()
    ///     .map(|run| run.to_vec())
    ///     .collect();
    /// assert_eq!(runs, vec![vec![1, 1], vec![2, 2, 2], vec![3]]);
    /// ```
    #[must_use]
    pub fn partition_by<K, F>(&self, key: F) -> Sequence<Self>
    where
        K: PartialEq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let key = Rc::new(key);
        let parent = self.clone();
        Sequence::new(move || {
            let key = Rc::clone(&key);
            let mut remainder = parent.clone();
            std::iter::from_fn(move || {
                let head = remainder.first()?;
                let current = Rc::new(key(&head));

                let group_key = Rc::clone(&current);
                let group_fn = Rc::clone(&key);
                let group =
                    remainder.take_while(move |element| group_fn(element) == *group_key);

                let advance_fn = Rc::clone(&key);
                remainder = remainder
                    .drop_while(move |element| advance_fn(element) == *current);

                Some(group)
            })
        })
    }

    // =========================================================================
    // Terminal Consumers
    // =========================================================================

    /// Reduces the elements into an accumulator, with early exit.
    ///
    /// The function returns [`Step::Continue`] to keep going or
    /// [`Step::Done`] to stop without pulling further elements. The initial
    /// accumulator is explicit, so reducing to a "falsy" value like `0`
    /// needs no special casing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::{Sequence, Step};
    ///
    /// let total = Sequence::range(1..=4).reduce(0, |sum, n| Step::Continue(sum + n));
    /// assert_eq!(total, 10);
    ///
    /// let capped = Sequence::range(1..).reduce(0, |sum, n| {
    ///     let next = sum + n;
    ///     if next >= 10 { Step::Done(next) } else { Step::Continue(next) }
    /// });
    /// assert_eq!(capped, 10);
    /// ```
    pub fn reduce<B, F>(&self, initial: B, mut function: F) -> B
    where
        F: FnMut(B, T) -> Step<B>,
    {
        let mut accumulator = initial;
        for element in self.iter() {
            match function(accumulator, element) {
                Step::Continue(next) => accumulator = next,
                Step::Done(next) => return next,
            }
        }
        accumulator
    }

    /// Reduces the elements using the first element as the seed.
    ///
    /// Returns `None` on an empty sequence. Like [`reduce`](Self::reduce),
    /// the function can stop early with [`Step::Done`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::{Sequence, Step};
    ///
    /// let largest = Sequence::from_values(vec![3, 9, 4])
    ///     .fold(|best, n| Step::Continue(if n > best { n } else { best }));
    /// assert_eq!(largest, Some(9));
    ///
    /// let nothing = Sequence::<i32>::empty().fold(|a, b| Step::Continue(a + b));
    /// assert_eq!(nothing, None);
    /// ```
    pub fn fold<F>(&self, mut function: F) -> Option<T>
    where
        F: FnMut(T, T) -> Step<T>,
    {
        let mut cursor = self.iter();
        let mut accumulator = cursor.next()?;
        for element in cursor {
            match function(accumulator, element) {
                Step::Continue(next) => accumulator = next,
                Step::Done(next) => return Some(next),
            }
        }
        Some(accumulator)
    }

    /// Returns the first element, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(..).first(), Some(0));
    /// assert_eq!(Sequence::<i32>::empty().first(), None);
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    /// Returns the second element, if any.
    #[inline]
    #[must_use]
    pub fn second(&self) -> Option<T> {
        self.nth(1)
    }

    /// Returns the element at a position, if any.
    ///
    /// Out of range is the ordinary "no value" outcome, not an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(..).nth(10), Some(10));
    /// assert_eq!(Sequence::range(0..3).nth(9), None);
    /// ```
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<T> {
        self.iter().nth(index)
    }

    /// Collects the elements into a vector.
    ///
    /// Never returns if the sequence is infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..3).to_vec(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Collects the elements into a hash set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let set = Sequence::from_values(vec![1, 2, 2, 3]).to_set();
    /// assert_eq!(set.len(), 3);
    /// ```
    #[must_use]
    pub fn to_set(&self) -> HashSet<T>
    where
        T: Eq + Hash,
    {
        self.iter().collect()
    }

    /// Renders the elements into one string, separated by `separator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(1..=3).join("-"), "1-2-3");
    /// assert_eq!(Sequence::<i32>::empty().join("-"), "");
    /// ```
    #[must_use]
    pub fn join(&self, separator: &str) -> String
    where
        T: Display,
    {
        let mut output = String::new();
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                output.push_str(separator);
            }
            output.push_str(&element.to_string());
        }
        output
    }

    /// Collects key/value elements into a hash map.
    ///
    /// Elements are split with [`PairLike`], so both `(key, value)` tuples
    /// and `[key, value]` arrays work. A later pair wins over an earlier
    /// one with the same key. An empty sequence gives an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let map = Sequence::from_values(vec![("a", 1), ("b", 2)]).to_map();
    /// assert_eq!(map.get("a"), Some(&1));
    /// ```
    #[must_use]
    pub fn to_map(&self) -> HashMap<T::Key, T::Value>
    where
        T: PairLike,
        T::Key: Eq + Hash,
    {
        self.iter().map(PairLike::into_pair).collect()
    }

    /// Collects a flat sequence into a hash map by pairing consecutive
    /// elements as key, value, key, value, …
    ///
    /// A trailing element with no partner is discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let map = Sequence::from_values(vec![1, 10, 2, 20, 3]).to_map_chunked();
    /// assert_eq!(map.get(&1), Some(&10));
    /// assert_eq!(map.len(), 2);
    /// ```
    #[must_use]
    pub fn to_map_chunked(&self) -> HashMap<T, T>
    where
        T: Eq + Hash,
    {
        let mut map = HashMap::new();
        let mut cursor = self.iter();
        while let Some(key) = cursor.next() {
            match cursor.next() {
                Some(value) => {
                    map.insert(key, value);
                }
                None => break,
            }
        }
        map
    }

    /// Collects key/value elements into an ordered, string-keyed map.
    ///
    /// Keys are rendered with `Display`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let object = Sequence::from_values(vec![(1, "one"), (2, "two")]).to_object();
    /// assert_eq!(object.get("1"), Some(&"one"));
    /// ```
    #[must_use]
    pub fn to_object(&self) -> BTreeMap<String, T::Value>
    where
        T: PairLike,
        T::Key: Display,
    {
        self.iter()
            .map(|element| {
                let (key, value) = element.into_pair();
                (key.to_string(), value)
            })
            .collect()
    }

    /// Collects a flat sequence into an ordered, string-keyed map by
    /// pairing consecutive elements.
    ///
    /// A trailing element with no partner is discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let object = Sequence::from_values(vec!["a", "1", "b", "2"]).to_object_chunked();
    /// assert_eq!(object.get("a"), Some(&"1"));
    /// ```
    #[must_use]
    pub fn to_object_chunked(&self) -> BTreeMap<String, T>
    where
        T: Display,
    {
        let mut map = BTreeMap::new();
        let mut cursor = self.iter();
        while let Some(key) = cursor.next() {
            match cursor.next() {
                Some(value) => {
                    map.insert(key.to_string(), value);
                }
                None => break,
            }
        }
        map
    }

    /// Groups all elements by a key, eagerly.
    ///
    /// The whole source is consumed; never returns on an infinite sequence.
    /// Each group preserves encounter order and is handed back as a
    /// re-consumable sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let groups = Sequence::range(0..6).group_by(|n| n % 2);
    /// assert_eq!(groups[&0].to_vec(), vec![0, 2, 4]);
    /// assert_eq!(groups[&1].to_vec(), vec![1, 3, 5]);
    /// ```
    #[must_use]
    pub fn group_by<K, F>(&self, key: F) -> HashMap<K, Self>
    where
        T: Clone,
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let mut buckets: HashMap<K, Vec<T>> = HashMap::new();
        for element in self.iter() {
            buckets.entry(key(&element)).or_default().push(element);
        }
        buckets
            .into_iter()
            .map(|(group, elements)| (group, Self::from_values(elements)))
            .collect()
    }

    /// Returns `true` when the sequence has no elements.
    ///
    /// Pulls at most one element, so it is safe on infinite sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert!(Sequence::<i32>::empty().is_empty());
    /// assert!(!Sequence::range(..).is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Counts the elements.
    ///
    /// Full pass; never returns if the sequence is infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(0..5).filter(|n| n % 2 == 0).count(), 3);
    /// ```
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` when every element satisfies the predicate.
    ///
    /// Stops at the first failure; vacuously `true` on an empty sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert!(Sequence::range(0..5).all(|n| *n < 5));
    /// assert!(!Sequence::range(0..5).all(|n| *n < 3));
    /// ```
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(|element| predicate(&element))
    }

    /// Returns `true` when some element satisfies the predicate.
    ///
    /// Stops at the first hit, which makes it usable on infinite sequences
    /// that do contain one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert!(Sequence::range(..).any(|n| *n > 3));
    /// assert!(!Sequence::range(0..3).any(|n| *n > 9));
    /// ```
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(|element| predicate(&element))
    }

    /// Returns `true` when no element satisfies the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert!(Sequence::range(0..5).none(|n| *n > 9));
    /// ```
    pub fn none<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any(predicate)
    }

    /// Returns the first element satisfying the predicate, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(..).find(|n| *n > 2), Some(3));
    /// assert_eq!(Sequence::range(0..3).find(|n| *n > 9), None);
    /// ```
    pub fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|element| predicate(element))
    }

    /// Runs a function over every element, for its side effects.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let mut log = Vec::new();
    /// Sequence::range(0..3).for_each(|n| log.push(n));
    /// assert_eq!(log, vec![0, 1, 2]);
    /// ```
    pub fn for_each<F>(&self, function: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(function);
    }
}

// =============================================================================
// Element-Specific Constructors and Combinators
// =============================================================================

impl Sequence<char> {
    /// Creates a sequence over the characters of a string.
    ///
    /// The characters are snapshotted once at construction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let letters = Sequence::chars("abc");
    /// assert_eq!(letters.to_vec(), vec!['a', 'b', 'c']);
    /// assert_eq!(letters.count(), 3);
    /// ```
    #[must_use]
    pub fn chars(text: &str) -> Self {
        let characters: Rc<Vec<char>> = Rc::new(text.chars().collect());
        Self::new(move || {
            let characters = Rc::clone(&characters);
            let length = characters.len();
            (0..length).map(move |index| characters[index])
        })
    }
}

impl Sequence<i64> {
    /// Creates an arithmetic progression with step `1`.
    ///
    /// `range(..)` starts at zero and never ends; `range(a..b)` is the
    /// usual half-open window; inclusive bounds work too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range(..).take(5).to_vec(), vec![0, 1, 2, 3, 4]);
    /// assert_eq!(Sequence::range(3..7).to_vec(), vec![3, 4, 5, 6]);
    /// assert_eq!(Sequence::range(1..=3).to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn range<R>(bounds: R) -> Self
    where
        R: RangeBounds<i64>,
    {
        Self::range_by(bounds, 1)
    }

    /// Creates an arithmetic progression with an explicit step.
    ///
    /// The cursor yields while it lies below the end bound (at it, for an
    /// inclusive bound) and advances by `step` after each element. A step
    /// of zero repeats the start forever; a negative step walks away from
    /// any upper bound and is only useful with an unbounded range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// assert_eq!(Sequence::range_by(0..10, 3).to_vec(), vec![0, 3, 6, 9]);
    /// assert_eq!(Sequence::range_by(0.., -1).take(3).to_vec(), vec![0, -1, -2]);
    /// ```
    #[must_use]
    pub fn range_by<R>(bounds: R, step: i64) -> Self
    where
        R: RangeBounds<i64>,
    {
        let start = match bounds.start_bound() {
            Bound::Included(&value) => Some(value),
            Bound::Excluded(&value) => value.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let end = match bounds.end_bound() {
            Bound::Included(&value) => Bound::Included(value),
            Bound::Excluded(&value) => Bound::Excluded(value),
            Bound::Unbounded => Bound::Unbounded,
        };
        Self::new(move || {
            let mut current = start;
            std::iter::from_fn(move || {
                let value = current?;
                let within = match end {
                    Bound::Included(limit) => value <= limit,
                    Bound::Excluded(limit) => value < limit,
                    Bound::Unbounded => true,
                };
                if !within {
                    return None;
                }
                current = value.checked_add(step);
                Some(value)
            })
        })
    }
}

impl<K: Clone + 'static, V: Clone + 'static> Sequence<(K, V)> {
    /// Creates a sequence over a map's entries.
    ///
    /// The entries are snapshotted once at construction; later changes to
    /// the source are not reflected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use reseq::sequence::Sequence;
    ///
    /// let mut scores = BTreeMap::new();
    /// scores.insert("alice".to_string(), 10);
    ///
    /// let entries = Sequence::from_entries(scores.clone());
    /// scores.insert("bob".to_string(), 20);
    ///
    /// assert_eq!(entries.count(), 1);
    /// ```
    pub fn from_entries<M>(entries: M) -> Self
    where
        M: IntoIterator<Item = (K, V)>,
    {
        Self::from_values(entries.into_iter().collect())
    }
}

impl<T: 'static> Sequence<Option<T>> {
    /// Discards absent values and unwraps the rest.
    ///
    /// Unlike [`compact`](Sequence::compact), present-but-falsy values such
    /// as `Some(0)` survive: only `None` goes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Sequence;
    ///
    /// let values = Sequence::from_values(vec![Some(1), None, Some(0)]).compact_void();
    /// assert_eq!(values.to_vec(), vec![1, 0]);
    /// ```
    #[must_use]
    pub fn compact_void(&self) -> Sequence<T> {
        let parent = self.clone();
        Sequence::new(move || parent.iter().flatten())
    }
}

impl<T: 'static> Sequence<Nest<T>> {
    /// Flattens nested values depth-first, keeping text whole.
    ///
    /// Every [`Nest::List`] is expanded in place; atoms and text pass
    /// through as leaves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::{Nest, Sequence};
    ///
    /// let nested: Sequence<Nest<i32>> = Sequence::from_values(vec![
    ///     Nest::atom(1),
    ///     Nest::list(vec![Nest::atom(2), Nest::list(vec![Nest::atom(3)])]),
    /// ]);
    ///
    /// let flat: Vec<i32> = nested
    ///     .flatten()
    ///     .iter()
    ///     .filter_map(|leaf| leaf.as_atom().copied())
    ///     .collect();
    /// assert_eq!(flat, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn flatten(&self) -> Self {
        let parent = self.clone();
        Self::new(move || nest::expand(parent.iter(), false))
    }

    /// Flattens nested values depth-first, splitting text into characters.
    ///
    /// Multi-character [`Nest::Text`] values expand into single-character
    /// text leaves; everything else behaves as in
    /// [`flatten`](Self::flatten).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::{Nest, Sequence};
    ///
    /// let nested: Sequence<Nest<i32>> = Sequence::from_values(vec![
    ///     Nest::text("One"),
    ///     Nest::list(vec![Nest::text("Two"), Nest::text("Three")]),
    /// ]);
    ///
    /// assert_eq!(nested.flatten_text().join(""), "OneTwoThree");
    /// ```
    #[must_use]
    pub fn flatten_text(&self) -> Self {
        let parent = self.clone();
        Self::new(move || nest::expand(parent.iter(), true))
    }
}

// =============================================================================
// Macros
// =============================================================================

/// Creates a [`Sequence`](crate::sequence::Sequence) from listed elements.
///
/// # Examples
///
/// ```rust
/// use reseq::sequence::Sequence;
///
/// let values = reseq::sequence![1, 2, 3];
/// assert_eq!(values.to_vec(), vec![1, 2, 3]);
///
/// let nothing: Sequence<i32> = reseq::sequence![];
/// assert!(nothing.is_empty());
/// ```
#[macro_export]
macro_rules! sequence {
    () => {
        $crate::sequence::Sequence::empty()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::sequence::Sequence::from_values(::std::vec![$($element),+])
    };
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: 'static> Clone for Sequence<T> {
    /// Shares the factory; no elements are copied.
    fn clone(&self) -> Self {
        Self {
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<T: 'static> fmt::Debug for Sequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl<T: 'static> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: 'static> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = Box<dyn Iterator<Item = T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: 'static> IntoIterator for &Sequence<T> {
    type Item = T;
    type IntoIter = Box<dyn Iterator<Item = T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        Self::from_values(iterable.into_iter().collect())
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Sequence<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T: Clone + 'static, const N: usize> From<[T; N]> for Sequence<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_values(Vec::from(values))
    }
}

// Rc-backed, so single-threaded by construction.
assert_not_impl_any!(Sequence<i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_of_replays_from_the_start() {
        let values = Sequence::of(vec![1, 2, 3]);
        assert_eq!(values.to_vec(), vec![1, 2, 3]);
        assert_eq!(values.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_clone_shares_identity() {
        let source = Sequence::range(0..3);
        let alias = source.clone();
        assert!(source.same(&alias));
        assert!(!source.same(&Sequence::range(0..3)));
        assert_eq!(alias.to_vec(), source.to_vec());
    }

    #[rstest]
    fn test_empty_and_default_have_no_elements() {
        assert!(Sequence::<i32>::empty().is_empty());
        assert!(Sequence::<i32>::default().is_empty());
        assert_eq!(Sequence::<i32>::empty().to_vec(), Vec::<i32>::new());
    }

    #[rstest]
    fn test_iterate_excludes_the_seed() {
        let successors = Sequence::iterate(5, |n| n + 1);
        assert_eq!(successors.take(5).to_vec(), vec![6, 7, 8, 9, 10]);
        assert_eq!(successors.take(5).to_vec(), vec![6, 7, 8, 9, 10]);
    }

    #[rstest]
    #[case(Sequence::range(0..5), vec![0, 1, 2, 3, 4])]
    #[case(Sequence::range(1..=3), vec![1, 2, 3])]
    #[case(Sequence::range_by(0..10, 3), vec![0, 3, 6, 9])]
    #[case(Sequence::range_by(1..=10, 3), vec![1, 4, 7, 10])]
    #[case(Sequence::range(3..3), vec![])]
    fn test_range_bounds(#[case] progression: Sequence<i64>, #[case] expected: Vec<i64>) {
        assert_eq!(progression.to_vec(), expected);
    }

    #[rstest]
    fn test_range_zero_step_repeats_start() {
        assert_eq!(Sequence::range_by(4..9, 0).take(3).to_vec(), vec![4, 4, 4]);
    }

    #[rstest]
    fn test_range_negative_step_descends_unbounded() {
        assert_eq!(Sequence::range_by(0.., -2).take(3).to_vec(), vec![0, -2, -4]);
    }

    #[rstest]
    fn test_map_callback_runs_once_per_element_per_traversal() {
        let calls = Rc::new(Cell::new(0));
        let observed = Rc::clone(&calls);
        let doubled = Sequence::range(0..3).map(move |n| {
            observed.set(observed.get() + 1);
            n * 2
        });

        assert_eq!(doubled.to_vec(), vec![0, 2, 4]);
        assert_eq!(calls.get(), 3);
        assert_eq!(doubled.to_vec(), vec![0, 2, 4]);
        assert_eq!(calls.get(), 6);
    }

    #[rstest]
    fn test_filter_then_take_pulls_the_minimum() {
        let pulls = Rc::new(Cell::new(0));
        let observed = Rc::clone(&pulls);
        let evens = Sequence::range(..)
            .map(move |n| {
                observed.set(observed.get() + 1);
                n
            })
            .filter(|n| n % 2 == 0)
            .take(2);

        assert_eq!(evens.to_vec(), vec![0, 2]);
        // 0 kept, 1 rejected, 2 kept; nothing pulled past the boundary.
        assert_eq!(pulls.get(), 3);
    }

    #[rstest]
    fn test_map_indexed_provides_positions() {
        let labeled = Sequence::from_values(vec!["a", "b", "c"])
            .map_indexed(|index, element| (index, element));
        assert_eq!(labeled.to_vec(), vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(2, vec![0, 1])]
    #[case(9, vec![0, 1, 2, 3])]
    fn test_take_boundaries(#[case] count: usize, #[case] expected: Vec<i64>) {
        assert_eq!(Sequence::range(0..4).take(count).to_vec(), expected);
    }

    #[rstest]
    fn test_take_nth_zero_degenerates_to_first() {
        assert_eq!(Sequence::range(0..10).take_nth(0).to_vec(), vec![0]);
        assert_eq!(Sequence::range(0..10).take_nth(1).count(), 10);
    }

    #[rstest]
    fn test_take_last_replays_per_traversal() {
        let tail = Sequence::range(0..10).take_last(3);
        assert_eq!(tail.to_vec(), vec![7, 8, 9]);
        assert_eq!(tail.to_vec(), vec![7, 8, 9]);
    }

    #[rstest]
    fn test_chunk_keeps_shorter_trailing_group() {
        let grouped = Sequence::range(0..7).chunk(3);
        assert_eq!(grouped.to_vec(), vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);

        let exact = Sequence::range(0..6).chunk(3);
        assert_eq!(exact.to_vec(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[rstest]
    fn test_chunk_step_discards_the_gap() {
        let strided = Sequence::range(0..10).chunk_step(2, 3);
        assert_eq!(strided.to_vec(), vec![vec![0, 1], vec![4, 5], vec![8, 9]]);
    }

    #[rstest]
    fn test_chunk_zero_size_is_empty() {
        assert!(Sequence::range(0..5).chunk(0).is_empty());
    }

    #[rstest]
    fn test_interleave_stops_at_the_shorter_side() {
        let woven = Sequence::range_by(0..5, 2).interleave(vec![1, 3]);
        assert_eq!(woven.to_vec(), vec![0, 1, 2, 3]);

        let reversed = Sequence::of(vec![1, 3]).interleave(Sequence::range_by(0..5, 2));
        assert_eq!(reversed.to_vec(), vec![1, 0, 3, 2]);
    }

    #[rstest]
    fn test_cycle_restarts_fresh_traversals() {
        let looped = Sequence::from_values(vec![1, 2]).cycle();
        assert_eq!(looped.take(5).to_vec(), vec![1, 2, 1, 2, 1]);
    }

    #[rstest]
    fn test_cycle_of_empty_is_empty() {
        assert!(Sequence::<i32>::empty().cycle().is_empty());
    }

    #[rstest]
    fn test_interpose_separates_consecutive_elements() {
        let separated = Sequence::from_values(vec![1, 1, 1]).interpose(2);
        assert_eq!(separated.to_vec(), vec![1, 2, 1, 2, 1]);
        assert!(Sequence::<i32>::empty().interpose(9).is_empty());
        assert_eq!(Sequence::singleton(1).interpose(9).to_vec(), vec![1]);
    }

    #[rstest]
    fn test_distinct_keeps_first_occurrences() {
        let unique = Sequence::from_values(vec![3, 1, 3, 2, 1]).distinct();
        assert_eq!(unique.to_vec(), vec![3, 1, 2]);
        assert_eq!(unique.to_vec(), vec![3, 1, 2]);
    }

    #[rstest]
    fn test_dedupe_collapses_adjacent_runs_only() {
        let collapsed = Sequence::from_values(vec![1, 1, 2, 2, 2, 1]).dedupe();
        assert_eq!(collapsed.to_vec(), vec![1, 2, 1]);
    }

    #[rstest]
    fn test_splice_with_short_source_still_emits_replacement() {
        let patched = Sequence::range(0..3).splice(5, 1, vec![9]);
        assert_eq!(patched.to_vec(), vec![0, 1, 2, 9]);
    }

    #[rstest]
    fn test_slice_windows() {
        assert_eq!(Sequence::range(0..10).slice(2..5).to_vec(), vec![2, 3, 4]);
        assert_eq!(Sequence::range(0..10).slice(..3).to_vec(), vec![0, 1, 2]);
        assert_eq!(Sequence::range(0..10).slice(8..).to_vec(), vec![8, 9]);
        assert!(Sequence::range(0..10).slice(5..5).is_empty());
    }

    #[rstest]
    fn test_split_with_shares_one_predicate() {
        let (small, large) = Sequence::range(0..6).split_with(|n| *n < 3);
        assert_eq!(small.to_vec(), vec![0, 1, 2]);
        assert_eq!(large.to_vec(), vec![3, 4, 5]);
    }

    #[rstest]
    fn test_partition_by_groups_maximal_runs() {
        let runs: Vec<Vec<i32>> = Sequence::from_values(vec![1, 1, 2, 2, 2, 3])
            .partition_by(|n| *n)
            .iter()
            .map(|run| run.to_vec())
            .collect();
        assert_eq!(runs, vec![vec![1, 1], vec![2, 2, 2], vec![3]]);
    }

    #[rstest]
    fn test_partition_by_handles_recurring_keys() {
        let runs: Vec<Vec<i32>> = Sequence::from_values(vec![1, 2, 1])
            .partition_by(|n| *n)
            .iter()
            .map(|run| run.to_vec())
            .collect();
        assert_eq!(runs, vec![vec![1], vec![2], vec![1]]);
    }

    #[rstest]
    fn test_partition_by_is_repeatable() {
        let runs = Sequence::from_values(vec![1, 1, 2]).partition_by(|n| *n);
        assert_eq!(runs.count(), 2);
        assert_eq!(runs.count(), 2);
    }

    #[rstest]
    fn test_reduce_short_circuits_on_done() {
        let pulls = Rc::new(Cell::new(0));
        let observed = Rc::clone(&pulls);
        let capped = Sequence::range(1..)
            .map(move |n| {
                observed.set(observed.get() + 1);
                n
            })
            .reduce(0, |sum, n| {
                let next = sum + n;
                if next >= 6 {
                    Step::Done(next)
                } else {
                    Step::Continue(next)
                }
            });

        assert_eq!(capped, 6);
        assert_eq!(pulls.get(), 3);
    }

    #[rstest]
    fn test_fold_seeds_from_the_first_element() {
        let concatenated = Sequence::from_values(vec!["a".to_string(), "b".to_string()])
            .fold(|left, right| Step::Continue(left + &right));
        assert_eq!(concatenated, Some("ab".to_string()));
        assert_eq!(Sequence::<i32>::empty().fold(|a, b| Step::Continue(a + b)), None);
    }

    #[rstest]
    fn test_to_map_chunked_discards_the_trailing_key() {
        let map = Sequence::from_values(vec![1, 10, 2, 20, 3]).to_map_chunked();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.get(&2), Some(&20));
    }

    #[rstest]
    fn test_to_map_later_pairs_win() {
        let map = Sequence::from_values(vec![("a", 1), ("a", 2)]).to_map();
        assert_eq!(map.get("a"), Some(&2));
    }

    #[rstest]
    fn test_to_object_renders_keys() {
        let object = Sequence::from_values(vec![(1, "one"), (10, "ten")]).to_object();
        assert_eq!(object.get("1"), Some(&"one"));
        assert_eq!(object.get("10"), Some(&"ten"));
    }

    #[rstest]
    fn test_group_by_consumes_everything() {
        let groups = Sequence::range(0..6).group_by(|n| n % 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[&0].to_vec(), vec![0, 3]);
        assert_eq!(groups[&1].to_vec(), vec![1, 4]);
        assert_eq!(groups[&2].to_vec(), vec![2, 5]);
    }

    #[rstest]
    fn test_flatten_keeps_text_whole() {
        let nested: Sequence<Nest<i32>> = Sequence::from_values(vec![
            Nest::text("One"),
            Nest::list(vec![Nest::text("Two"), Nest::text("Three")]),
        ]);
        let words: Vec<String> =
            nested.flatten().iter().map(|leaf| leaf.to_string()).collect();
        assert_eq!(words, vec!["One", "Two", "Three"]);
    }

    #[rstest]
    fn test_flatten_text_splits_into_characters() {
        let nested: Sequence<Nest<i32>> = Sequence::from_values(vec![
            Nest::text("One"),
            Nest::list(vec![Nest::text("Two"), Nest::text("Three")]),
        ]);
        assert_eq!(nested.flatten_text().join(""), "OneTwoThree");
        assert_eq!(nested.flatten_text().count(), 11);
    }

    #[rstest]
    fn test_compact_void_keeps_present_falsy_values() {
        let values = Sequence::from_values(vec![Some(1), None, Some(0), None]).compact_void();
        assert_eq!(values.to_vec(), vec![1, 0]);
    }

    #[rstest]
    fn test_but_last_drops_exactly_one() {
        assert_eq!(Sequence::range(0..5).but_last().to_vec(), vec![0, 1, 2, 3]);
        assert!(Sequence::singleton(1).but_last().is_empty());
        assert!(Sequence::<i32>::empty().but_last().is_empty());
    }

    #[rstest]
    fn test_replace_passes_unmatched_through() {
        let mapping = HashMap::from([(2, 20)]);
        let swapped = Sequence::from_values(vec![1, 2, 3]).replace(mapping);
        assert_eq!(swapped.to_vec(), vec![1, 20, 3]);
    }

    #[rstest]
    fn test_join_renders_with_separator() {
        assert_eq!(Sequence::range(1..=3).join("-"), "1-2-3");
        assert_eq!(Sequence::<i32>::empty().join("-"), "");
    }

    #[rstest]
    fn test_sequence_macro_builds_from_elements() {
        let values = crate::sequence![1, 2, 3];
        assert_eq!(values.to_vec(), vec![1, 2, 3]);

        let nothing: Sequence<i32> = crate::sequence![];
        assert!(nothing.is_empty());
    }

    #[rstest]
    fn test_from_entries_snapshots_at_construction() {
        let mut source = BTreeMap::new();
        source.insert("a", 1);
        let entries = Sequence::from_entries(source.clone());
        source.insert("b", 2);
        assert_eq!(entries.to_vec(), vec![("a", 1)]);
    }

    #[rstest]
    fn test_chars_snapshots_the_text() {
        let letters = Sequence::chars("ab");
        assert_eq!(letters.to_vec(), vec!['a', 'b']);
        assert_eq!(letters.to_vec(), vec!['a', 'b']);
    }

    #[rstest]
    fn test_into_iterator_on_references() {
        let values = Sequence::range(0..3);
        let mut collected = Vec::new();
        for value in &values {
            collected.push(value);
        }
        assert_eq!(collected, vec![0, 1, 2]);
        assert_eq!(values.count(), 3);
    }

    #[rstest]
    fn test_from_array_and_from_iterator() {
        let from_array = Sequence::from([1, 2, 3]);
        assert_eq!(from_array.to_vec(), vec![1, 2, 3]);

        let collected: Sequence<i32> = (0..4).collect();
        assert_eq!(collected.to_vec(), vec![0, 1, 2, 3]);
    }
}

//! Nested values and the expansion rules behind `flatten`.
//!
//! A dynamically typed sequence library decides "should this element be
//! spread into its parts?" by sniffing the runtime shape of each value. This
//! module replaces that check with the closed sum type [`Nest`]: an element
//! is an atomic value, a piece of text, or a list of further nested values,
//! and [`Nest::is_expandable`] is the single classification rule consulted
//! once per visited value during flattening.
//!
//! Text is deliberately special-cased. By default text is atomic — flattening
//! `["One", ["Two", "Three"]]` keeps whole words. When text expansion is
//! requested, a string is only expanded while it has more than one character;
//! a single-character string is a leaf, which is what stops `"O"` from
//! expanding into `"O"` forever.
//!
//! # Examples
//!
//! ```rust
//! use reseq::sequence::{Nest, Sequence};
//!
//! let nested: Sequence<Nest<String>> = Sequence::from_values(vec![
//!     Nest::text("One"),
//!     Nest::list(vec![Nest::text("Two"), Nest::text("Three")]),
//! ]);
//!
//! let words: Vec<String> = nested
//!     .flatten()
//!     .iter()
//!     .map(|leaf| leaf.to_string())
//!     .collect();
//! assert_eq!(words, vec!["One", "Two", "Three"]);
//!
//! // With text expansion the same pipeline yields characters.
//! assert_eq!(nested.flatten_text().join(""), "OneTwoThree");
//! ```

use std::fmt;

use smallvec::SmallVec;

// =============================================================================
// Nest Definition
// =============================================================================

/// A possibly nested value: an atom, a piece of text, or a list of nests.
///
/// `Nest<T>` is the element type understood by [`Sequence::flatten`] and
/// [`Sequence::flatten_text`]. It makes the "iterable vs. atomic" decision a
/// property of the type rather than of runtime shape: absence (`null`,
/// `undefined`) is simply not representable.
///
/// # Examples
///
/// ```rust
/// use reseq::sequence::Nest;
///
/// let tree: Nest<i32> = Nest::list(vec![
///     Nest::atom(1),
///     Nest::list(vec![Nest::atom(2), Nest::atom(3)]),
/// ]);
///
/// assert!(tree.is_expandable(false));
/// assert!(!Nest::atom(1).is_expandable(false));
/// ```
///
/// [`Sequence::flatten`]: super::Sequence::flatten
/// [`Sequence::flatten_text`]: super::Sequence::flatten_text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nest<T> {
    /// An atomic element; never expanded.
    Atom(T),
    /// A piece of text; atomic unless text expansion is requested and the
    /// text is longer than one character.
    Text(String),
    /// A list of further nested values; always expanded.
    List(Vec<Nest<T>>),
}

impl<T> Nest<T> {
    /// Wraps an atomic element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Nest;
    ///
    /// let atom: Nest<i32> = Nest::atom(42);
    /// assert_eq!(atom, Nest::Atom(42));
    /// ```
    #[inline]
    pub const fn atom(value: T) -> Self {
        Self::Atom(value)
    }

    /// Wraps a piece of text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Nest;
    ///
    /// let text: Nest<i32> = Nest::text("word");
    /// assert_eq!(text, Nest::Text("word".to_string()));
    /// ```
    #[inline]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Wraps a list of nested values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Nest;
    ///
    /// let list = Nest::list(vec![Nest::atom(1), Nest::atom(2)]);
    /// assert!(list.is_expandable(false));
    /// ```
    #[inline]
    pub const fn list(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    /// Decides whether this value should be spread into its parts.
    ///
    /// This is the classification rule `flatten` consults once per visited
    /// value:
    ///
    /// - a [`Nest::List`] is always expandable;
    /// - a [`Nest::Text`] is expandable only when `expand_text` is set *and*
    ///   the text has more than one character (the length rule that keeps a
    ///   single-character string from expanding into itself forever);
    /// - a [`Nest::Atom`] is never expandable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Nest;
    ///
    /// let word: Nest<i32> = Nest::text("ab");
    /// let letter: Nest<i32> = Nest::text("a");
    ///
    /// assert!(!word.is_expandable(false));
    /// assert!(word.is_expandable(true));
    /// assert!(!letter.is_expandable(true));
    /// ```
    #[must_use]
    pub fn is_expandable(&self, expand_text: bool) -> bool {
        match self {
            Self::Atom(_) => false,
            Self::Text(text) => expand_text && text.chars().count() > 1,
            Self::List(_) => true,
        }
    }

    /// Returns a reference to the atomic element, if this is an atom.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reseq::sequence::Nest;
    ///
    /// assert_eq!(Nest::atom(7).as_atom(), Some(&7));
    /// assert_eq!(Nest::<i32>::text("x").as_atom(), None);
    /// ```
    #[must_use]
    pub const fn as_atom(&self) -> Option<&T> {
        match self {
            Self::Atom(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Nest<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(value) => value.fmt(formatter),
            Self::Text(text) => formatter.write_str(text),
            Self::List(items) => {
                for item in items {
                    item.fmt(formatter)?;
                }
                Ok(())
            }
        }
    }
}

impl<T> From<&str> for Nest<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T> From<String> for Nest<T> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T> From<Vec<Nest<T>>> for Nest<T> {
    fn from(items: Vec<Nest<T>>) -> Self {
        Self::List(items)
    }
}

// =============================================================================
// Expansion Cursor
// =============================================================================

/// One suspended position inside the depth-first walk.
enum Frame<T> {
    /// A value waiting to be classified.
    Visit(Nest<T>),
    /// A partially consumed list.
    List(std::vec::IntoIter<Nest<T>>),
    /// A partially consumed piece of text under expansion.
    Chars(std::vec::IntoIter<char>),
}

/// Drives a depth-first, left-to-right expansion of `source`.
///
/// The walk keeps an explicit frame stack instead of recursing, so nesting
/// depth is bounded by memory rather than by the call stack. Each yielded
/// value is a leaf under the `expand_text` classification rule.
pub(crate) fn expand<T: 'static>(
    source: Box<dyn Iterator<Item = Nest<T>>>,
    expand_text: bool,
) -> impl Iterator<Item = Nest<T>> {
    let mut source = source;
    let mut stack: SmallVec<[Frame<T>; 8]> = SmallVec::new();

    std::iter::from_fn(move || {
        loop {
            match stack.pop() {
                None => {
                    let element = source.next()?;
                    stack.push(Frame::Visit(element));
                }
                Some(Frame::Visit(value)) => {
                    if value.is_expandable(expand_text) {
                        match value {
                            Nest::List(items) => {
                                let mut items = items.into_iter();
                                if let Some(first) = items.next() {
                                    stack.push(Frame::List(items));
                                    stack.push(Frame::Visit(first));
                                }
                            }
                            Nest::Text(text) => {
                                let mut chars =
                                    text.chars().collect::<Vec<char>>().into_iter();
                                if let Some(first) = chars.next() {
                                    stack.push(Frame::Chars(chars));
                                    stack.push(Frame::Visit(Nest::Text(first.to_string())));
                                }
                            }
                            Nest::Atom(_) => unreachable!(),
                        }
                    } else {
                        return Some(value);
                    }
                }
                Some(Frame::List(mut items)) => {
                    if let Some(next) = items.next() {
                        stack.push(Frame::List(items));
                        stack.push(Frame::Visit(next));
                    }
                }
                Some(Frame::Chars(mut chars)) => {
                    if let Some(next) = chars.next() {
                        stack.push(Frame::Chars(chars));
                        stack.push(Frame::Visit(Nest::Text(next.to_string())));
                    }
                }
            }
        }
    })
}

//! Element conversions used by map building and truthiness filtering.
//!
//! Two small traits give static types to conventions a dynamically typed
//! sequence library leaves implicit:
//!
//! - [`PairLike`] describes elements that carry a key and a value, so
//!   [`Sequence::to_map`] can accept both `(key, value)` tuples and
//!   two-element arrays;
//! - [`Truthy`] describes elements with a notion of "keep or discard", so
//!   [`Sequence::compact`] can drop zeros, empty strings, `false`, `NaN`,
//!   and absent values without a caller-supplied predicate.
//!
//! # Examples
//!
//! ```rust
//! use reseq::sequence::{Sequence, Truthy};
//!
//! let kept = Sequence::from_values(vec![0, 1, 0, 2, 3]).compact().to_vec();
//! assert_eq!(kept, vec![1, 2, 3]);
//!
//! assert!(!"".is_truthy());
//! assert!("0".is_truthy());
//! ```
//!
//! [`Sequence::to_map`]: super::Sequence::to_map
//! [`Sequence::compact`]: super::Sequence::compact

// =============================================================================
// PairLike
// =============================================================================

/// An element that can be split into a key and a value.
///
/// Implemented for `(K, V)` tuples and for `[T; 2]` arrays, the two shapes
/// entry sequences usually come in.
///
/// # Examples
///
/// ```rust
/// use reseq::sequence::PairLike;
///
/// assert_eq!(("a", 1).into_pair(), ("a", 1));
/// assert_eq!([1, 2].into_pair(), (1, 2));
/// ```
pub trait PairLike {
    /// The key half of the element.
    type Key;
    /// The value half of the element.
    type Value;

    /// Splits the element into `(key, value)`.
    fn into_pair(self) -> (Self::Key, Self::Value);
}

impl<K, V> PairLike for (K, V) {
    type Key = K;
    type Value = V;

    #[inline]
    fn into_pair(self) -> (K, V) {
        self
    }
}

impl<T> PairLike for [T; 2] {
    type Key = T;
    type Value = T;

    #[inline]
    fn into_pair(self) -> (T, T) {
        let [key, value] = self;
        (key, value)
    }
}

// =============================================================================
// Truthy
// =============================================================================

/// An element with a notion of "significant" versus "discardable".
///
/// The implementations mirror the usual scripting-language truth table:
/// `false`, numeric zero, `NaN`, empty text, the unit value, and `None` are
/// falsy; everything else — including non-empty text such as `"0"` — is
/// truthy. `Option<T>` composes: `Some(value)` defers to `value`.
///
/// # Examples
///
/// ```rust
/// use reseq::sequence::Truthy;
///
/// assert!(1.is_truthy());
/// assert!(!0.is_truthy());
/// assert!(!f64::NAN.is_truthy());
/// assert!("word".is_truthy());
/// assert!(!None::<i32>.is_truthy());
/// assert!(!Some(0).is_truthy());
/// ```
pub trait Truthy {
    /// Returns `true` when the element is significant enough to keep.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    #[inline]
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for () {
    #[inline]
    fn is_truthy(&self) -> bool {
        false
    }
}

impl Truthy for char {
    #[inline]
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for str {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    #[inline]
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

macro_rules! impl_truthy_for_integers {
    ($($integer:ty),* $(,)?) => {
        $(
            impl Truthy for $integer {
                #[inline]
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_truthy_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_truthy_for_floats {
    ($($float:ty),* $(,)?) => {
        $(
            impl Truthy for $float {
                #[inline]
                fn is_truthy(&self) -> bool {
                    *self != 0.0 && !self.is_nan()
                }
            }
        )*
    };
}

impl_truthy_for_floats!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(("a", 1), ("a", 1))]
    fn test_tuple_into_pair(#[case] input: (&str, i32), #[case] expected: (&str, i32)) {
        assert_eq!(input.into_pair(), expected);
    }

    #[rstest]
    fn test_array_into_pair() {
        assert_eq!([10, 20].into_pair(), (10, 20));
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_bool_truthiness(#[case] input: bool, #[case] expected: bool) {
        assert_eq!(input.is_truthy(), expected);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(-1, true)]
    fn test_integer_truthiness(#[case] input: i64, #[case] expected: bool) {
        assert_eq!(input.is_truthy(), expected);
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(-0.0, false)]
    #[case(f64::NAN, false)]
    #[case(0.5, true)]
    fn test_float_truthiness(#[case] input: f64, #[case] expected: bool) {
        assert_eq!(input.is_truthy(), expected);
    }

    #[rstest]
    #[case("", false)]
    #[case("0", true)]
    #[case("word", true)]
    fn test_text_truthiness(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(input.is_truthy(), expected);
        assert_eq!(input.to_string().is_truthy(), expected);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(0), false)]
    #[case(Some(7), true)]
    fn test_option_composes(#[case] input: Option<i32>, #[case] expected: bool) {
        assert_eq!(input.is_truthy(), expected);
    }

    #[rstest]
    fn test_unit_is_falsy() {
        assert!(!().is_truthy());
    }
}

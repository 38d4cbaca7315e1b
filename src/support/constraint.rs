//! Numeric constraints checked once at construction.
//!
//! A [`Constrained<T, C>`] carries a value that is known to satisfy the
//! marker constraint `C`. The engine uses it where a scalar crosses a
//! validation boundary:
//!
//! - [`NonNegative`]: minimum approach temperatures and allocated utility duties.
//! - [`StrictlyPositive`]: internal stream duties and exchanger end
//!   temperature differences.
//!
//! Custom invariants can be expressed by implementing [`Constraint<T>`] for
//! another zero-sized marker type.

mod non_negative;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;

/// A trait for enforcing numeric invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
}

/// A value that satisfied constraint `C` when it was built.
///
/// # Example
///
/// ```
/// use twine_pinch::support::constraint::{Constrained, NonNegative};
///
/// let dt_min = Constrained::<f64, NonNegative>::new(10.0).unwrap();
/// assert_eq!(dt_min.into_inner(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// A trait for integer types that have a constant representing 0.
pub trait Zero {
    /// The constant representing 0 for the implementing type.
    const ZERO: Self;
}

/// A trait for integer types that reserve a value as "infinitely expensive".
///
/// The sentinel is the largest representable value, so the ordinary
/// comparison operators already sort it after every finite cost.
pub trait Infinity: Sized + PartialEq {
    /// The sentinel standing for an unusable, infinitely expensive value.
    const INFINITY: Self;

    /// Returns `true` if `self` is the infinity sentinel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use circuit_core::num::constants::Infinity;
    ///
    /// assert!(i64::INFINITY.is_infinite());
    /// assert!(!42i64.is_infinite());
    /// ```
    #[inline(always)]
    fn is_infinite(&self) -> bool {
        *self == Self::INFINITY
    }

    /// Returns `true` if `self` is any value other than the sentinel.
    #[inline(always)]
    fn is_finite(&self) -> bool {
        !self.is_infinite()
    }
}

macro_rules! impl_cost_constants_for {
    ($($t:ty),* $(,)?) => {
        $(
            impl Zero for $t {
                const ZERO: Self = 0;
            }

            impl Infinity for $t {
                const INFINITY: Self = <$t>::MAX;
            }
        )*
    };
}

impl_cost_constants_for!(i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinity_is_type_maximum() {
        assert_eq!(i8::INFINITY, i8::MAX);
        assert_eq!(i32::INFINITY, i32::MAX);
        assert_eq!(i64::INFINITY, i64::MAX);
        assert_eq!(isize::INFINITY, isize::MAX);
    }

    #[test]
    fn test_infinity_orders_after_finite_values() {
        assert!(i64::INFINITY > 1_000_000_000);
        assert!(0i32.is_finite());
        assert!(!i32::INFINITY.is_finite());
    }

    #[test]
    fn test_zero_constant() {
        assert_eq!(i16::ZERO, 0);
        assert_eq!(i64::ZERO, 0);
    }
}

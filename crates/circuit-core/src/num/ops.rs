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

//! By-value saturating arithmetic.
//!
//! These mirror the inherent `saturating_add`/`saturating_sub` on the
//! primitive integers, but are reachable through a trait bound so generic
//! solver code can use them. Saturating at `MAX` is what keeps the
//! `Infinity` sentinel absorbing: `INFINITY + x == INFINITY` for `x >= 0`.

use core::ops::{Add, Sub};

/// Saturating addition by value.
///
/// # Examples
///
/// ```rust
/// # use circuit_core::num::ops::SaturatingAddVal;
///
/// assert_eq!(120i8.saturating_add_val(10), 127);
/// assert_eq!(3i64.saturating_add_val(4), 7);
/// ```
pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    /// Performs saturating addition by value.
    fn saturating_add_val(self, v: Self) -> Self;
}

/// Saturating subtraction by value.
///
/// # Examples
///
/// ```rust
/// # use circuit_core::num::ops::SaturatingSubVal;
///
/// assert_eq!((-120i8).saturating_sub_val(20), -128);
/// assert_eq!(10i64.saturating_sub_val(4), 6);
/// ```
pub trait SaturatingSubVal: Sized + Sub<Self, Output = Self> {
    /// Performs saturating subtraction by value.
    fn saturating_sub_val(self, v: Self) -> Self;
}

macro_rules! impl_saturating_for {
    ($($t:ty),* $(,)?) => {
        $(
            impl SaturatingAddVal for $t {
                #[inline(always)]
                fn saturating_add_val(self, v: Self) -> Self {
                    <$t>::saturating_add(self, v)
                }
            }

            impl SaturatingSubVal for $t {
                #[inline(always)]
                fn saturating_sub_val(self, v: Self) -> Self {
                    <$t>::saturating_sub(self, v)
                }
            }
        )*
    };
}

impl_saturating_for!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

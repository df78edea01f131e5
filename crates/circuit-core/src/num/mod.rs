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

//! # Solver Numerics
//!
//! Costs, bounds and reductions are exact integers. Forbidden cells of a
//! cost matrix are represented in-band by `T::INFINITY` (the type's maximum)
//! instead of wrapping every cell in an `Option`, so a row of the matrix
//! stays a plain slice of machine words. All accumulation goes through the
//! saturating by-value operations so that adding anything to infinity stays
//! infinite.
//!
//! `SolverNumeric` collects every bound the solver needs into a single
//! trait alias that is blanket-implemented for the signed primitive
//! integers.

pub mod constants;
pub mod ops;

use constants::{Infinity, Zero};
use num_traits::{FromPrimitive, PrimInt, Signed};
use ops::{SaturatingAddVal, SaturatingSubVal};
use std::hash::Hash;

/// A trait alias for the integer types the solver can work with.
///
/// These are the signed primitive integers `i16`, `i32`, `i64` and `isize`.
/// Signedness is required so that reduced costs can be checked against zero
/// and loaders can detect negative input before it reaches the search.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + Zero
    + Infinity
    + SaturatingAddVal
    + SaturatingSubVal
    + Hash
    + Send
    + Sync
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + Zero
        + Infinity
        + SaturatingAddVal
        + SaturatingSubVal
        + Hash
        + Send
        + Sync
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate<T: SolverNumeric>(values: &[T]) -> T {
        values
            .iter()
            .fold(T::ZERO, |acc, &v| acc.saturating_add_val(v))
    }

    #[test]
    fn test_accumulation_is_exact_below_infinity() {
        assert_eq!(accumulate(&[3i64, 4, 5]), 12);
        assert_eq!(accumulate(&[3i32, 4, 5]), 12);
    }

    #[test]
    fn test_accumulation_saturates_at_infinity() {
        let total = accumulate(&[i64::INFINITY, 7]);
        assert!(total.is_infinite());
        assert_eq!(total, i64::MAX);
    }
}

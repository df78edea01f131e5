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

//! Instance loader for directed TSP cost matrices.
//!
//! The text format is a node count `n` followed by `n * n` costs in
//! row-major order, all separated by arbitrary whitespace. Lines may carry
//! comments introduced by `#`. A missing edge is written as `inf`, `INF` or
//! `-`, and `forbid_at_least` additionally maps every cost at or above a
//! threshold to a missing edge, for formats that spell infinity as a large
//! number such as `9999`. Diagonal entries must be present but are ignored.
//!
//! Malformed input is rejected before any search state is built: the
//! dimension must lie in `1..=MAX_NODES` and off-diagonal costs must be
//! non-negative and no larger than `max_edge_cost()`. A literal equal to the
//! type's maximum is rejected like any other oversized cost; it only counts
//! as a missing edge when `forbid_at_least` covers it.

use crate::{
    index::NodeIndex,
    matrix::{DistanceMatrix, DistanceMatrixBuilder, MAX_NODES, max_edge_cost},
};
use circuit_core::num::SolverNumeric;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the matrix loading process.
#[derive(Debug, thiserror::Error)]
pub enum MatrixLoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input stream ended before all `n * n` costs were read.
    #[error("Unexpected end of file while parsing instance")]
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseTokenError),
    /// The node count lies outside `1..=MAX_NODES`.
    #[error("Number of nodes must be between 1 and {MAX_NODES}, got {0}")]
    InvalidDimension(i64),
    /// An off-diagonal cost is negative.
    #[error("Negative cost {value} at row {row}, column {column}")]
    NegativeCost {
        row: usize,
        column: usize,
        value: String,
    },
    /// An off-diagonal cost is large enough that a tour through it could
    /// reach the infinity sentinel.
    #[error("Cost {value} at row {row}, column {column} exceeds the largest supported edge cost {limit}")]
    CostTooLarge {
        row: usize,
        column: usize,
        value: String,
        limit: String,
    },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse token '{token}' as type {type_name}")]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

/// A configurable loader for cost matrix instances.
///
/// ```raw
/// n
/// d_0_0     ... d_0_(n-1)
/// ...
/// d_(n-1)_0 ... d_(n-1)_(n-1)
/// ```
///
/// # Configuration
/// * `forbid_at_least`: Any cost $\ge$ this value is treated as a missing edge.
///
/// # Examples
///
/// ```rust
/// # use circuit_model::loading::MatrixLoader;
/// # use circuit_model::index::NodeIndex;
///
/// let input = "3\n0 4 9999\n# middle row\n1 0 2\n- 5 0\n";
/// let matrix = MatrixLoader::<i64>::new()
///     .forbid_at_least(9999)
///     .from_str(input)
///     .unwrap();
/// assert_eq!(matrix.num_nodes(), 3);
/// assert!(!matrix.has_edge(NodeIndex::new(0), NodeIndex::new(2)));
/// assert!(!matrix.has_edge(NodeIndex::new(2), NodeIndex::new(0)));
/// assert_eq!(matrix.distance(NodeIndex::new(1), NodeIndex::new(2)), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLoader<T> {
    forbid_at_least: Option<T>,
}

impl<T> Default for MatrixLoader<T> {
    fn default() -> Self {
        Self {
            forbid_at_least: None,
        }
    }
}

impl<T> MatrixLoader<T>
where
    T: SolverNumeric + FromStr,
{
    /// Creates a new `MatrixLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a threshold value. Any cost read from the input that is greater
    /// than or equal to `v` is treated as a missing edge.
    #[inline]
    pub fn forbid_at_least(mut self, v: T) -> Self {
        self.forbid_at_least = Some(v);
        self
    }

    /// Loads a matrix from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(
        &self,
        rdr: R,
    ) -> Result<DistanceMatrix<T>, MatrixLoaderError> {
        let mut sc = Scanner::new(rdr);

        let token = sc.next_token()?;
        let n_val: i64 = token.parse().map_err(|_| ParseTokenError {
            token: token.to_owned(),
            type_name: "usize",
        })?;
        let n = usize::try_from(n_val)
            .ok()
            .filter(|n| (1..=MAX_NODES).contains(n))
            .ok_or(MatrixLoaderError::InvalidDimension(n_val))?;

        let mut builder = DistanceMatrixBuilder::new(n);
        for i in 0..n {
            for j in 0..n {
                let cost: Cost<T> = sc.next_token()?.parse()?;
                if i == j {
                    continue;
                }

                let value = match cost {
                    Cost::Missing => continue,
                    Cost::Finite(v) => v,
                };
                if value < T::ZERO {
                    return Err(MatrixLoaderError::NegativeCost {
                        row: i,
                        column: j,
                        value: value.to_string(),
                    });
                }
                if self.forbid_at_least.is_some_and(|limit| value >= limit) {
                    continue;
                }
                let limit = max_edge_cost::<T>();
                if value > limit {
                    return Err(MatrixLoaderError::CostTooLarge {
                        row: i,
                        column: j,
                        value: value.to_string(),
                        limit: limit.to_string(),
                    });
                }
                builder.set_distance(NodeIndex::new(i), NodeIndex::new(j), value);
            }
        }

        Ok(builder.build())
    }

    /// Loads a matrix from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<DistanceMatrix<T>, MatrixLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a matrix from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<DistanceMatrix<T>, MatrixLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a matrix from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<DistanceMatrix<T>, MatrixLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// A single matrix entry as written in the input.
enum Cost<T> {
    Finite(T),
    Missing,
}

impl<T> FromStr for Cost<T>
where
    T: FromStr,
{
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inf" | "INF" | "-" => Ok(Cost::Missing),
            _ => s.parse::<T>().map(Cost::Finite).map_err(|_| ParseTokenError {
                token: s.to_owned(),
                type_name: std::any::type_name::<T>(),
            }),
        }
    }
}

/// A helper to read whitespace-delimited tokens from a generic reader.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, MatrixLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the next token, skipping whitespace and `#` comments.
    fn next_token(&mut self) -> Result<&str, MatrixLoaderError> {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(MatrixLoaderError::UnexpectedEof);
            }

            let line = &self.buf[self.pos..];
            let line = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };

            let Some(offset) = line.find(|c: char| !c.is_whitespace()) else {
                self.pos = self.buf.len();
                continue;
            };
            let rest = &line[offset..];
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let start = self.pos + offset;
            self.pos = start + len;

            return Ok(&self.buf[start..self.pos]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC_INSTANCE: &str = r#"
        4            # nodes
        0  10 15 20  # row 0
        5  0  9  10
        6  13 0  12
        8  8  9  0
    "#;

    fn ni(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_loads_classic_instance() {
        let matrix = MatrixLoader::<i64>::new()
            .from_str(CLASSIC_INSTANCE)
            .expect("Failed to load");
        assert_eq!(matrix.num_nodes(), 4);
        assert_eq!(matrix.distance(ni(0), ni(3)), 20);
        assert_eq!(matrix.distance(ni(3), ni(1)), 8);
        assert!(!matrix.has_edge(ni(2), ni(2)));
    }

    #[test]
    fn test_missing_edge_tokens() {
        let matrix = MatrixLoader::<i32>::new()
            .from_str("3  - inf 1  INF - 2  3 4 -")
            .expect("Failed to load");
        assert!(!matrix.has_edge(ni(0), ni(1)));
        assert!(!matrix.has_edge(ni(1), ni(0)));
        assert!(matrix.has_edge(ni(0), ni(2)));
        assert_eq!(matrix.distance(ni(2), ni(1)), 4);
    }

    #[test]
    fn test_forbid_at_least_threshold() {
        let matrix = MatrixLoader::<i64>::new()
            .forbid_at_least(9999)
            .from_str("2 0 9999 12000 0")
            .expect("Failed to load");
        assert!(!matrix.has_edge(ni(0), ni(1)));
        assert!(!matrix.has_edge(ni(1), ni(0)));

        let matrix = MatrixLoader::<i64>::new()
            .forbid_at_least(9999)
            .from_str("2 0 9998 1 0")
            .expect("Failed to load");
        assert_eq!(matrix.distance(ni(0), ni(1)), 9998);
    }

    #[test]
    fn test_diagonal_is_ignored_even_when_negative() {
        let matrix = MatrixLoader::<i64>::new()
            .from_str("2 -5 1 1 -7")
            .expect("Failed to load");
        assert_eq!(matrix.distance(ni(0), ni(1)), 1);
    }

    #[test]
    fn test_negative_cost_reports_position() {
        let res = MatrixLoader::<i64>::new().from_str("2 0 3 -4 0");
        match res {
            Err(MatrixLoaderError::NegativeCost { row, column, value }) => {
                assert_eq!((row, column), (1, 0));
                assert_eq!(value, "-4");
            }
            other => panic!("Expected NegativeCost, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_cost_that_would_saturate_a_tour() {
        let res = MatrixLoader::<i64>::new()
            .from_str("2\n0 4611686018427387904\n4611686018427387904 0\n");
        match res {
            Err(MatrixLoaderError::CostTooLarge { row, column, value, limit }) => {
                assert_eq!((row, column), (0, 1));
                assert_eq!(value, "4611686018427387904");
                assert_eq!(limit, max_edge_cost::<i64>().to_string());
            }
            other => panic!("Expected CostTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_type_maximum_is_not_a_missing_edge() {
        let res = MatrixLoader::<i64>::new().from_str("2 0 1 9223372036854775807 0");
        assert!(matches!(
            res,
            Err(MatrixLoaderError::CostTooLarge { row: 1, column: 0, .. })
        ));

        let matrix = MatrixLoader::<i64>::new()
            .forbid_at_least(9999)
            .from_str("2 0 1 9223372036854775807 0")
            .expect("Failed to load");
        assert!(!matrix.has_edge(ni(1), ni(0)));
    }

    #[test]
    fn test_accepts_largest_edge_cost() {
        let limit = max_edge_cost::<i64>();
        let matrix = MatrixLoader::<i64>::new()
            .from_str(&format!("2 0 {limit} {limit} 0"))
            .expect("Failed to load");
        assert_eq!(matrix.distance(ni(0), ni(1)), limit);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        for input in ["0", "-3", "51"] {
            let res = MatrixLoader::<i64>::new().from_str(input);
            assert!(
                matches!(res, Err(MatrixLoaderError::InvalidDimension(_))),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_unexpected_eof() {
        let res = MatrixLoader::<i64>::new().from_str("3 0 1 2 3 0 # truncated");
        assert!(matches!(res, Err(MatrixLoaderError::UnexpectedEof)));
        let res = MatrixLoader::<i64>::new().from_str("");
        assert!(matches!(res, Err(MatrixLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res = MatrixLoader::<i64>::new().from_str("2 0 garbage");
        match res {
            Err(MatrixLoaderError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("i64"));
            }
            other => panic!("Expected Parse error with context, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_glued_to_token() {
        let matrix = MatrixLoader::<i64>::new()
            .from_str("2#two nodes\n0 7#first\n3 0")
            .expect("Failed to load");
        assert_eq!(matrix.distance(ni(0), ni(1)), 7);
        assert_eq!(matrix.distance(ni(1), ni(0)), 3);
    }

    #[test]
    fn test_single_node_instance() {
        let matrix = MatrixLoader::<i64>::new()
            .from_str("1\n0\n")
            .expect("Failed to load");
        assert_eq!(matrix.num_nodes(), 1);
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Degree ranges for vertices of a near-triangulation.
//!
//! A [`Degree`] is a closed integer interval `[lower, upper]` of possible
//! vertex degrees. Minimal counterexamples have minimum degree 5, so the
//! interval floor is [`MIN_DEGREE`]; [`MAX_DEGREE`] stands in for infinity
//! (real degrees never get near it).
//!
//! String forms: `"7"` is the fixed degree 7, `"7+"` is `[7, MAX_DEGREE]`,
//! `"7-"` is `[MIN_DEGREE, 7]`.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Smallest degree a vertex of a minimal counterexample can have.
pub const MIN_DEGREE: usize = 5;

/// Stand-in for an unbounded upper degree.
pub const MAX_DEGREE: usize = 1000;

/// A possibly-open interval of vertex degrees.
///
/// Value type: cheap to copy, all operations pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Degree {
    lower: usize,
    upper: usize,
}

impl Degree {
    /// Create a degree range `[lower, upper]`.
    pub fn new(lower: usize, upper: usize) -> Self {
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Create a fixed degree `[deg, deg]`.
    pub fn exact(deg: usize) -> Self {
        Self {
            lower: deg,
            upper: deg,
        }
    }

    pub fn lower(&self) -> usize {
        self.lower
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    /// A degree is fixed when the interval is a single value.
    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }

    /// Interval inclusion: does `self` cover every degree `other` allows?
    pub fn includes(&self, other: Degree) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Do the two ranges share no degree at all?
    pub fn disjoint(a: Degree, b: Degree) -> bool {
        a.upper < b.lower || b.upper < a.lower
    }
}

impl fmt::Display for Degree {
    /// Render the degree in the `.rule`/`.wheel` file syntax.
    ///
    /// Only the three representable shapes occur in practice; an interval
    /// that is neither fixed nor anchored at `MIN_DEGREE`/`MAX_DEGREE` is a
    /// programmer error.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.lower)
        } else if self.upper == MAX_DEGREE {
            write!(f, "{}+", self.lower)
        } else if self.lower == MIN_DEGREE {
            write!(f, "{}-", self.upper)
        } else {
            unreachable!("degree range [{}, {}] has no string form", self.lower, self.upper)
        }
    }
}

impl FromStr for Degree {
    type Err = Error;

    /// Parse `"k"`, `"k+"` or `"k-"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidDegree {
            input: s.to_string(),
        };
        let digits = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        if digits == 0 {
            return Err(invalid());
        }
        let deg: usize = s[..digits].parse().map_err(|_| invalid())?;
        match &s[digits..] {
            "" => Ok(Degree::exact(deg)),
            "+" => Ok(Degree::new(deg, MAX_DEGREE)),
            "-" => Ok(Degree::new(MIN_DEGREE, deg)),
            _ => Err(invalid()),
        }
    }
}

/// Split `degree` into the branching pieces `lo, lo+1, …, max_degree-1`
/// followed by the open tail `[max_degree, upper]`, truncated to `upper`.
///
/// For `max_degree = 8`: `5+` becomes `5, 6, 7, 8+` and `6-` becomes `5, 6`.
pub fn divide_degree(degree: Degree, max_degree: usize) -> Vec<Degree> {
    assert!(degree.lower() <= max_degree);
    let mut pieces = Vec::new();
    let mut deg = degree.lower();
    while deg < degree.upper() && deg < max_degree {
        pieces.push(Degree::exact(deg));
        deg += 1;
    }
    pieces.push(Degree::new(deg, degree.upper()));
    pieces
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Turns sets of codepoints into maximal runs of consecutive values.

use std::fmt;
use std::ops::RangeInclusive;

use crate::codepoints::{Codepoint, CodepointSet, MAX_CODEPOINT};

/// A maximal run of consecutive codepoints.
///
/// `Span(lo, hi)` always has `lo < hi`. A run of length one is a `Single`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodepointRange {
    Single(Codepoint),
    Span(Codepoint, Codepoint),
}

impl CodepointRange {
    pub fn new(lo: Codepoint, hi: Codepoint) -> Self {
        debug_assert!(lo <= hi);
        if lo == hi { Self::Single(lo) } else { Self::Span(lo, hi) }
    }

    pub fn lo(&self) -> Codepoint {
        match *self {
            Self::Single(cp) => cp,
            Self::Span(lo, _) => lo,
        }
    }

    pub fn hi(&self) -> Codepoint {
        match *self {
            Self::Single(cp) => cp,
            Self::Span(_, hi) => hi,
        }
    }

    /// Number of codepoints covered.
    pub fn width(&self) -> u32 {
        self.hi() - self.lo() + 1
    }

    pub fn contains(&self, cp: Codepoint) -> bool {
        self.lo() <= cp && cp <= self.hi()
    }

    pub fn codepoints(&self) -> RangeInclusive<Codepoint> {
        self.lo()..=self.hi()
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Single(cp) => write!(f, "U+{cp:04X}"),
            Self::Span(lo, hi) => write!(f, "U+{lo:04X}..U+{hi:04X}"),
        }
    }
}

/// Compresses a set into its ordered sequence of maximal runs.
pub fn compress(set: &CodepointSet) -> Vec<CodepointRange> {
    group_runs(set.iter())
}

/// Like [`compress`], but for a plain list of codepoints in any order.
///
/// # Panics
///
/// Panics if a value lies outside the codepoint domain.
pub fn compress_values(values: &[Codepoint]) -> Vec<CodepointRange> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if let Some(&last) = sorted.last() {
        assert!(last <= MAX_CODEPOINT, "codepoint {last:#x} out of range");
    }
    group_runs(sorted.into_iter())
}

// Within a run `value - index` stays constant, so a run ends
// exactly where the next value is not the previous one plus one.
fn group_runs(sorted: impl Iterator<Item = Codepoint>) -> Vec<CodepointRange> {
    let mut runs = Vec::new();
    let mut current: Option<(Codepoint, Codepoint)> = None;

    for cp in sorted {
        current = match current {
            Some((lo, hi)) if hi + 1 == cp => Some((lo, cp)),
            Some((lo, hi)) => {
                runs.push(CodepointRange::new(lo, hi));
                Some((cp, cp))
            }
            None => Some((cp, cp)),
        };
    }
    if let Some((lo, hi)) = current {
        runs.push(CodepointRange::new(lo, hi));
    }

    runs
}

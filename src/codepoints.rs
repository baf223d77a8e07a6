// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Sets of Unicode codepoints and the handful of fixed sets the tables need.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, RangeInclusive, Sub, SubAssign};

use crate::apperr;

pub type Codepoint = u32;

/// The largest valid Unicode scalar value (and surrogate, we don't care).
pub const MAX_CODEPOINT: Codepoint = 0x10FFFF;

const WORDS: usize = (MAX_CODEPOINT as usize + 1) / 64;

/// A set of codepoints in `0..=MAX_CODEPOINT`, stored as a flat bitmap.
///
/// Iteration is always ascending, which is what makes everything built on top
/// of it deterministic regardless of the order in which codepoints were inserted.
#[derive(Clone, PartialEq, Eq)]
pub struct CodepointSet {
    bits: Box<[u64]>,
}

impl Default for CodepointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CodepointSet {
    pub fn new() -> Self {
        Self { bits: vec![0; WORDS].into_boxed_slice() }
    }

    /// Every codepoint in the domain.
    pub fn full() -> Self {
        Self { bits: vec![u64::MAX; WORDS].into_boxed_slice() }
    }

    pub fn from_range(range: RangeInclusive<Codepoint>) -> Self {
        let mut set = Self::new();
        set.insert_range(range);
        set
    }

    /// # Panics
    ///
    /// Panics if `cp` lies outside the codepoint domain.
    pub fn insert(&mut self, cp: Codepoint) -> bool {
        assert!(cp <= MAX_CODEPOINT, "codepoint {cp:#x} out of range");
        let (word, mask) = Self::locate(cp);
        let had = self.bits[word] & mask != 0;
        self.bits[word] |= mask;
        !had
    }

    pub fn insert_range(&mut self, range: RangeInclusive<Codepoint>) {
        for cp in range {
            self.insert(cp);
        }
    }

    pub fn remove(&mut self, cp: Codepoint) -> bool {
        if cp > MAX_CODEPOINT {
            return false;
        }
        let (word, mask) = Self::locate(cp);
        let had = self.bits[word] & mask != 0;
        self.bits[word] &= !mask;
        had
    }

    pub fn contains(&self, cp: Codepoint) -> bool {
        if cp > MAX_CODEPOINT {
            return false;
        }
        let (word, mask) = Self::locate(cp);
        self.bits[word] & mask != 0
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// The smallest member, if any.
    pub fn first(&self) -> Option<Codepoint> {
        self.iter().next()
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.bits.iter().zip(other.bits.iter()).all(|(a, b)| a & b == 0)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { bits: &self.bits, word: 0, current: self.bits[0] }
    }

    fn locate(cp: Codepoint) -> (usize, u64) {
        ((cp / 64) as usize, 1 << (cp % 64))
    }
}

pub struct Iter<'a> {
    bits: &'a [u64],
    word: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = Codepoint;

    fn next(&mut self) -> Option<Codepoint> {
        while self.current == 0 {
            self.word += 1;
            if self.word >= self.bits.len() {
                return None;
            }
            self.current = self.bits[self.word];
        }
        let bit = self.current.trailing_zeros();
        self.current &= self.current - 1;
        Some(self.word as Codepoint * 64 + bit)
    }
}

impl<'a> IntoIterator for &'a CodepointSet {
    type Item = Codepoint;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<Codepoint> for CodepointSet {
    fn from_iter<I: IntoIterator<Item = Codepoint>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Codepoint> for CodepointSet {
    fn extend<I: IntoIterator<Item = Codepoint>>(&mut self, iter: I) {
        for cp in iter {
            self.insert(cp);
        }
    }
}

impl BitOrAssign<&CodepointSet> for CodepointSet {
    fn bitor_assign(&mut self, rhs: &CodepointSet) {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits.iter()) {
            *a |= b;
        }
    }
}

impl SubAssign<&CodepointSet> for CodepointSet {
    fn sub_assign(&mut self, rhs: &CodepointSet) {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits.iter()) {
            *a &= !b;
        }
    }
}

impl BitOr for &CodepointSet {
    type Output = CodepointSet;

    fn bitor(self, rhs: &CodepointSet) -> CodepointSet {
        let mut out = self.clone();
        out |= rhs;
        out
    }
}

impl Sub for &CodepointSet {
    type Output = CodepointSet;

    fn sub(self, rhs: &CodepointSet) -> CodepointSet {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl fmt::Debug for CodepointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|cp| format!("U+{cp:04X}"))).finish()
    }
}

/// Parses the first column of most UCD files: either `00AD` or `0300..036F`.
pub fn parse_range_spec(spec: &str) -> apperr::Result<RangeInclusive<Codepoint>> {
    let spec = spec.trim();
    let parse = |s: &str| {
        Codepoint::from_str_radix(s.trim(), 16)
            .ok()
            .filter(|&cp| cp <= MAX_CODEPOINT)
            .ok_or_else(|| apperr::Error::InvalidRangeSpec(spec.to_string()))
    };

    let range = match spec.split_once("..") {
        Some((lo, hi)) => parse(lo)?..=parse(hi)?,
        None => {
            let cp = parse(spec)?;
            cp..=cp
        }
    };
    if range.start() > range.end() {
        return Err(apperr::Error::InvalidRangeSpec(spec.to_string()));
    }
    Ok(range)
}

/// The 66 noncharacters: U+FDD0..U+FDEF plus the last two codepoints of every plane.
pub fn noncharacters() -> CodepointSet {
    let mut set = CodepointSet::from_range(0xFDD0..=0xFDEF);
    for plane in 0..=0x10 {
        set.insert((plane << 16) | 0xFFFE);
        set.insert((plane << 16) | 0xFFFF);
    }
    set
}

/// U+1F3FB..U+1F3FF, the Fitzpatrick modifiers.
pub fn emoji_skin_tone_modifiers() -> CodepointSet {
    CodepointSet::from_range(0x1F3FB..=0x1F3FF)
}

/// The 26 regional indicator symbols.
pub fn flag_codepoints() -> CodepointSet {
    CodepointSet::from_range(0x1F1E6..=0x1F1E6 + 25)
}

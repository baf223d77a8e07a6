// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dense ordinals for a subset of codepoints, e.g. combining marks.
//!
//! Ordinal 0 is reserved as the "none" sentinel and maps to codepoint 0.
//! The reverse direction is emitted as a `switch` over compressed runs where
//! every run computes its ordinal from the codepoint, instead of one clause per member.

use crate::apperr;
use crate::codepoints::{Codepoint, CodepointSet};
use crate::emit::{Backend, Signature, SwitchWriter};
use crate::ranges::{self, CodepointRange};

pub const VS15: Codepoint = 0xFE0E;
pub const VS16: Codepoint = 0xFE0F;

/// A run of codepoints whose ordinals are consecutive as well, starting at `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedRun {
    pub range: CodepointRange,
    pub base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseIndex {
    forward: Vec<Codepoint>,
    // Sorted by codepoint.
    reverse: Vec<(Codepoint, u32)>,
}

impl DenseIndex {
    /// Ordinals follow ascending codepoint order.
    ///
    /// Codepoint 0 is the sentinel and never receives an ordinal of its own.
    pub fn build(members: &CodepointSet) -> Self {
        let members: Vec<_> = members.iter().filter(|&cp| cp != 0).collect();
        Self::from_ordered(&members)
    }

    /// Ordinals follow the given order, starting at 1.
    ///
    /// # Panics
    ///
    /// Panics if the list contains 0 or duplicates.
    pub fn from_ordered(members: &[Codepoint]) -> Self {
        let mut forward = Vec::with_capacity(members.len() + 1);
        forward.push(0);
        forward.extend_from_slice(members);

        let mut reverse: Vec<_> =
            members.iter().enumerate().map(|(i, &cp)| (cp, i as u32 + 1)).collect();
        reverse.sort_unstable();
        assert!(reverse.first().is_none_or(|&(cp, _)| cp != 0), "codepoint 0 is reserved");
        assert!(reverse.windows(2).all(|w| w[0].0 != w[1].0), "duplicate codepoint in index");

        Self { forward, reverse }
    }

    /// Number of ordinals, including the sentinel.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.len() == 1
    }

    pub fn forward_array(&self) -> &[Codepoint] {
        &self.forward
    }

    /// The codepoint at `ordinal`, or 0 past the end.
    pub fn forward(&self, ordinal: u32) -> Codepoint {
        self.forward.get(ordinal as usize).copied().unwrap_or(0)
    }

    /// The ordinal of `cp`, or 0 if it's not a member.
    pub fn reverse(&self, cp: Codepoint) -> u32 {
        match self.reverse.binary_search_by_key(&cp, |&(c, _)| c) {
            Ok(idx) => self.reverse[idx].1,
            Err(_) => 0,
        }
    }

    /// Like [`DenseIndex::reverse`], but a missing member is an error.
    pub fn ordinal_of(&self, cp: Codepoint) -> apperr::Result<u32> {
        match self.reverse(cp) {
            0 => Err(apperr::Error::MissingMark(cp)),
            ordinal => Ok(ordinal),
        }
    }

    pub fn runs(&self) -> Vec<IndexedRun> {
        let mut runs = Vec::new();

        for range in ranges::compress_values(&self.forward[1..]) {
            // Ascending members give consecutive ordinals for the whole run.
            // An explicitly ordered list may not, so split wherever the ordinal jumps.
            let mut lo = range.lo();
            let mut base = self.reverse(lo);
            for cp in range.lo() + 1..=range.hi() {
                let ordinal = self.reverse(cp);
                if ordinal != base + (cp - lo) {
                    runs.push(IndexedRun { range: CodepointRange::new(lo, cp - 1), base });
                    lo = cp;
                    base = ordinal;
                }
            }
            runs.push(IndexedRun { range: CodepointRange::new(lo, range.hi()), base });
        }

        runs
    }

    /// `ordinal -> codepoint` as an array lookup.
    pub fn emit_forward(&self, backend: &dyn Backend, sig: Signature<'_>) -> String {
        let mut buf = String::new();
        backend.write_forward_lookup(&mut buf, &sig, &self.forward);
        buf
    }

    /// `codepoint -> ordinal` as a switch, 0 for non-members.
    pub fn emit_reverse(&self, backend: &dyn Backend, sig: Signature<'_>) -> String {
        let mut w = SwitchWriter::new(backend, sig, &[]);
        w.offset_clauses(&self.runs());
        w.finish(&0)
    }
}

/// The payload for the `KNOWN_MARKS` anchors: the ordinals of both variation selectors.
pub fn known_marks(index: &DenseIndex) -> apperr::Result<String> {
    let vs15 = index.ordinal_of(VS15)?;
    let vs16 = index.ordinal_of(VS16)?;
    Ok(format!("static const combining_type VS15 = {vs15}, VS16 = {vs16};"))
}

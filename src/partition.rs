// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resolves overlapping property sets into one exclusive classification.
//!
//! Layers are processed in the order the caller lists them and the first layer
//! to mention a codepoint owns it. Later layers only ever see what is left over.
//! Nothing here checks for totality: either the last layer is a catch-all,
//! or the emitted function ends in a default branch.

use crate::codepoints::{Codepoint, CodepointSet, MAX_CODEPOINT};
use crate::ranges::{self, CodepointRange};

/// A named, prioritized set paired with the value it classifies to.
#[derive(Debug, Clone)]
pub struct Layer<'a, O> {
    pub label: &'a str,
    pub set: &'a CodepointSet,
    pub outcome: O,
}

impl<'a, O> Layer<'a, O> {
    pub fn new(label: &'a str, set: &'a CodepointSet, outcome: O) -> Self {
        Self { label, set, outcome }
    }
}

/// What remains of a [`Layer`] after every earlier layer took its share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a, O> {
    pub label: &'a str,
    pub ranges: Vec<CodepointRange>,
    /// Number of codepoints covered by `ranges`.
    pub count: usize,
    pub outcome: O,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<'a, O> {
    pub layers: Vec<Resolved<'a, O>>,
}

pub fn partition<'a, O: Clone>(layers: &[Layer<'a, O>]) -> Partition<'a, O> {
    let mut claimed = CodepointSet::new();
    let mut resolved = Vec::with_capacity(layers.len());

    for layer in layers {
        let residual = layer.set - &claimed;
        claimed |= &residual;

        let count = residual.len();
        tracing::debug!(
            label = layer.label,
            requested = layer.set.len(),
            claimed = count,
            "resolved layer"
        );

        resolved.push(Resolved {
            label: layer.label,
            ranges: ranges::compress(&residual),
            count,
            outcome: layer.outcome.clone(),
        });
    }

    Partition { layers: resolved }
}

impl<O> Partition<'_, O> {
    /// The outcome of the layer owning `cp`, if any layer does.
    pub fn lookup(&self, cp: Codepoint) -> Option<&O> {
        self.layers.iter().find(|layer| contains(&layer.ranges, cp)).map(|layer| &layer.outcome)
    }

    /// Like [`Partition::lookup`] but total, falling back to `default`.
    pub fn classify<'b>(&'b self, cp: Codepoint, default: &'b O) -> &'b O {
        self.lookup(cp).unwrap_or(default)
    }

    pub fn codepoint_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.count).sum()
    }

    /// Whether the layers cover the whole codepoint space without a default.
    pub fn is_exhaustive(&self) -> bool {
        self.codepoint_count() == MAX_CODEPOINT as usize + 1
    }
}

fn contains(ranges: &[CodepointRange], cp: Codepoint) -> bool {
    let idx = ranges.partition_point(|r| r.hi() < cp);
    ranges.get(idx).is_some_and(|r| r.contains(cp))
}

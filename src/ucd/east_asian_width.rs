// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::RangeInclusive;

use super::data_lines;
use crate::apperr;
use crate::codepoints::{Codepoint, CodepointSet, parse_range_spec};

const FILE: &str = "EastAsianWidth.txt";

/// Unlisted codepoints in these blocks default to `W`.
/// See UAX #11, "Unassigned and Private-Use Characters".
const DEFAULT_WIDE: [RangeInclusive<Codepoint>; 5] = [
    0x3400..=0x4DBF,
    0x4E00..=0x9FFF,
    0xF900..=0xFAFF,
    0x20000..=0x2FFFD,
    0x30000..=0x3FFFD,
];

#[derive(Debug, Clone, Default)]
pub struct EastAsianWidth {
    pub ambiguous: CodepointSet,
    pub doublewidth: CodepointSet,
}

pub fn parse_east_asian_width(text: &str) -> apperr::Result<EastAsianWidth> {
    let mut eaw = EastAsianWidth::default();
    let mut seen = CodepointSet::new();

    for (line, raw) in data_lines(text) {
        let parsed = raw.split_once(';').and_then(|(spec, rest)| Some((spec, rest.split_whitespace().next()?)));
        let Some((spec, width)) = parsed else {
            return Err(apperr::Error::parse(FILE, line, format!("expected `range;width`: {raw:?}")));
        };
        let range = parse_range_spec(spec).map_err(|err| apperr::Error::parse(FILE, line, err.to_string()))?;

        match width {
            "A" => eaw.ambiguous.insert_range(range.clone()),
            "W" | "F" => eaw.doublewidth.insert_range(range.clone()),
            _ => continue,
        }
        seen.insert_range(range);
    }

    for block in DEFAULT_WIDE {
        let mut unseen = CodepointSet::from_range(block);
        unseen -= &seen;
        eaw.doublewidth |= &unseen;
    }

    Ok(eaw)
}

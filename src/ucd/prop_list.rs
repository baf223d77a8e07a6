// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use super::data_lines;
use crate::apperr;
use crate::codepoints::{CodepointSet, parse_range_spec};

const FILE: &str = "PropList.txt";

/// `0009..000D    ; White_Space # Cc   [5] <control-0009>..<control-000D>`
pub fn parse_prop_list(text: &str) -> apperr::Result<BTreeMap<String, CodepointSet>> {
    let mut properties: BTreeMap<String, CodepointSet> = BTreeMap::new();

    for (line, raw) in data_lines(text) {
        let name = raw.split_once(';').and_then(|(spec, rest)| {
            let name = rest.split('#').next()?.split_whitespace().next()?;
            Some((spec, name))
        });
        let Some((spec, name)) = name else {
            return Err(apperr::Error::parse(FILE, line, format!("expected `range ; property`: {raw:?}")));
        };
        let range = parse_range_spec(spec).map_err(|err| apperr::Error::parse(FILE, line, err.to_string()))?;
        properties.entry(name.to_string()).or_default().insert_range(range);
    }

    Ok(properties)
}

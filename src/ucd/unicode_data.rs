// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use super::{data_lines, initial_marks, parse_hex};
use crate::apperr;
use crate::codepoints::{Codepoint, CodepointSet};
use crate::names::NameTable;

const FILE: &str = "UnicodeData.txt";

#[derive(Debug, Clone, Default)]
pub struct UnicodeData {
    pub categories: BTreeMap<String, CodepointSet>,
    /// `M*`, `Cf`, skin tone modifiers and regional indicators.
    pub marks: CodepointSet,
    /// `S*`.
    pub symbols: CodepointSet,
    /// Every codepoint without an entry.
    pub not_assigned: CodepointSet,
    pub names: NameTable,
}

pub fn parse_unicode_data(text: &str) -> apperr::Result<UnicodeData> {
    let mut data = UnicodeData {
        marks: initial_marks(),
        // The whole domain, U+10FFFF included: it has no entry, so it's unassigned
        // and reports -4 like every other noncharacter without one.
        not_assigned: CodepointSet::full(),
        ..Default::default()
    };
    // The start of a `<..., First>` / `<..., Last>` pair.
    let mut first: Option<Codepoint> = None;

    for (line, raw) in data_lines(text) {
        let fields: Vec<&str> = raw.split(';').map(str::trim).collect();
        if fields.len() < 11 {
            return Err(apperr::Error::parse(FILE, line, format!("expected at least 11 fields: {raw:?}")));
        }

        let cp = parse_hex(FILE, line, fields[0])?;
        let desc = fields[1];
        let category = fields[2];

        let name = match desc {
            "" | "<control>" => fields[10],
            _ => desc,
        };
        // `<CJK Ideograph, First>` and friends are range markers, not names.
        if !name.is_empty() && !name.starts_with('<') {
            data.names.add_name(cp, name);
        }

        let range = match first.take() {
            Some(start) => {
                if !desc.ends_with(", Last>") || start > cp {
                    return Err(apperr::Error::parse(FILE, line, format!("unterminated range from {start:04X}")));
                }
                start..=cp
            }
            None if desc.ends_with(", First>") => {
                first = Some(cp);
                continue;
            }
            None => cp..=cp,
        };

        data.categories.entry(category.to_string()).or_default().insert_range(range.clone());
        if category.starts_with('M') || category == "Cf" {
            data.marks.insert_range(range.clone());
        } else if category.starts_with('S') {
            data.symbols.insert_range(range.clone());
        }
        for cp in range {
            data.not_assigned.remove(cp);
        }
    }

    if let Some(start) = first {
        return Err(apperr::Error::parse(FILE, 0, format!("range from {start:04X} never ends")));
    }

    Ok(data)
}

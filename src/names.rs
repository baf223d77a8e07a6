// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Codepoint names and the search words pointing at them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::apperr;
use crate::codepoints::Codepoint;

/// Named codepoints must be addressable with 16 bits by the consumer.
const MAX_NAMES: usize = 0xFFFF;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<Codepoint, String>,
    words: BTreeMap<String, BTreeSet<Codepoint>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, cp: Codepoint) -> Option<&str> {
        self.names.get(&cp).map(String::as_str)
    }

    pub fn word(&self, word: &str) -> Option<&BTreeSet<Codepoint>> {
        self.words.get(word)
    }

    /// Records `name` for `cp` and makes each of its words searchable.
    pub fn add_name(&mut self, cp: Codepoint, name: &str) {
        self.names.insert(cp, name.to_string());
        for word in name.to_lowercase().split_whitespace() {
            self.add_word(word, cp);
        }
    }

    /// Like [`NameTable::add_name`], but an existing name wins.
    pub fn add_name_if_missing(&mut self, cp: Codepoint, name: &str) {
        if !self.names.contains_key(&cp) {
            self.add_name(cp, name);
        }
    }

    /// Controls and single letters are not worth searching for.
    pub fn add_word(&mut self, word: &str, cp: Codepoint) {
        if cp <= 32 || cp == 127 || (128..=159).contains(&cp) {
            return;
        }
        if word.chars().count() > 1 {
            self.words.entry(word.to_lowercase()).or_default().insert(cp);
        }
    }

    /// Merges the codepoints of `from` into `to`.
    fn alias(&mut self, to: &str, from: &str) {
        let from = self.words.get(from).cloned().unwrap_or_default();
        if !from.is_empty() {
            self.words.entry(to.to_string()).or_default().extend(from);
        }
    }

    /// HTML5 named character references (`&copy;`, `&rarr;`, ...) for single codepoints.
    pub fn add_html_entities(&mut self) {
        for entity in entities::ENTITIES.iter() {
            let mut chars = entity.characters.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else { continue };
            let word = entity.entity.trim_start_matches('&').trim_end_matches(';');
            self.add_word(word, ch as Codepoint);
        }
    }

    /// Common spellings people search for that the UCD doesn't use.
    pub fn add_synonyms(&mut self) {
        self.add_word("nnbsp", 0x202F);
        self.alias("bee", "honeybee");
        self.alias("lambda", "lamda");
        self.alias("lamda", "lambda");
        self.alias("diamond", "gem");
    }

    /// The `names.txt` export.
    ///
    /// The first line holds the number of names and the number of words.
    /// Every following line is a codepoint followed by the words of its name,
    /// and, after a tab, any other words that find it.
    pub fn render(&self) -> apperr::Result<String> {
        if self.names.len() > MAX_NAMES {
            return Err(apperr::Error::TooManyNames(self.names.len()));
        }

        let mut aliases: BTreeMap<Codepoint, BTreeSet<&str>> = BTreeMap::new();
        for (word, codepoints) in &self.words {
            for &cp in codepoints {
                aliases.entry(cp).or_default().insert(word.as_str());
            }
        }

        let mut buf = String::new();
        _ = writeln!(buf, "{} {}", self.names.len(), self.words.len());
        for (&cp, name) in &self.names {
            let name = name.to_lowercase();
            let words: Vec<&str> = name.split_whitespace().collect();
            _ = write!(buf, "{cp}");
            for word in &words {
                _ = write!(buf, " {word}");
            }

            let extra: Vec<&str> = aliases
                .get(&cp)
                .into_iter()
                .flatten()
                .copied()
                .filter(|alias| !words.contains(alias))
                .collect();
            if !extra.is_empty() {
                _ = write!(buf, "\t{}", extra.join(" "));
            }
            buf.push('\n');
        }

        Ok(buf)
    }
}

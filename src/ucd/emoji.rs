// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{data_lines, parse_hex};
use crate::apperr;
use crate::codepoints::{CodepointSet, parse_range_spec};

const FILE: &str = "emoji-sequences.txt";

#[derive(Debug, Clone, Default)]
pub struct EmojiSets {
    pub all: CodepointSet,
    pub presentation_bases: CodepointSet,
    /// Text presentation by default, i.e. one cell.
    pub narrow: CodepointSet,
    /// Emoji presentation by default, i.e. two cells.
    pub wide: CodepointSet,
}

impl EmojiSets {
    fn add(&mut self, chars: &CodepointSet, wide: bool) {
        self.all |= chars;
        self.presentation_bases |= chars;
        if wide {
            self.wide |= chars;
        } else {
            self.narrow |= chars;
        }
    }
}

/// `1F1E6 1F1E8 ; RGI_Emoji_Flag_Sequence ; flag: Ascension Island # E2.0 [1] (🇦🇨)`
pub fn parse_emoji_sequences(text: &str) -> apperr::Result<EmojiSets> {
    let mut sets = EmojiSets::default();

    for (line, raw) in data_lines(text) {
        let mut fields = raw.split(';').map(str::trim);
        let (Some(data), Some(kind)) = (fields.next(), fields.next()) else {
            continue;
        };
        let seq: Vec<&str> = data.split_whitespace().collect();
        let Some(&head) = seq.first() else {
            return Err(apperr::Error::parse(FILE, line, "empty sequence"));
        };
        let expect_len = |n: usize| {
            if seq.len() == n {
                Ok(())
            } else {
                Err(apperr::Error::parse(FILE, line, format!("{kind} expects {n} codepoints: {data:?}")))
            }
        };

        match kind {
            "Basic_Emoji" => {
                let range = parse_range_spec(head).map_err(|err| apperr::Error::parse(FILE, line, err.to_string()))?;
                // A trailing FE0F means the base defaults to text presentation.
                sets.add(&CodepointSet::from_range(range), seq.len() < 2);
            }
            "Emoji_Keycap_Sequence" => {
                expect_len(3)?;
                let base = parse_hex(FILE, line, head)?;
                sets.add(&CodepointSet::from_range(base..=base), false);
            }
            "RGI_Emoji_Flag_Sequence" => {
                expect_len(2)?;
                let left = parse_hex(FILE, line, seq[0])?;
                let right = parse_hex(FILE, line, seq[1])?;
                sets.add(&[left, right].into_iter().collect(), true);
            }
            "RGI_Emoji_Tag_Sequence" => {
                let base = parse_hex(FILE, line, head)?;
                sets.add(&CodepointSet::from_range(base..=base), true);
            }
            "RGI_Emoji_Modifier_Sequence" => {
                expect_len(2)?;
                let base = parse_hex(FILE, line, head)?;
                sets.add(&CodepointSet::from_range(base..=base), true);
            }
            _ => {}
        }
    }

    Ok(sets)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_emoji_sequences() {
        let sets = parse_emoji_sequences(super::super::test::EMOJI_SEQUENCES).unwrap();

        assert!(sets.wide.contains(0x231A) && sets.wide.contains(0x231B));
        assert!(sets.narrow.contains(0x2194));
        assert!(sets.narrow.contains(0x23));
        assert!(!sets.all.contains(0x20E3));
        assert!(sets.wide.contains(0x1F1E6) && sets.wide.contains(0x1F1E8));
        assert!(sets.wide.contains(0x1F3F4));
        assert!(!sets.all.contains(0xE0067));
        assert!(sets.wide.contains(0x261D));
        assert!(!sets.all.contains(0x1F3FB));

        assert_eq!(sets.all.len(), 8);
        assert_eq!(sets.all, sets.presentation_bases);
        assert!(sets.narrow.is_disjoint(&sets.wide));
    }

    #[test]
    fn test_unknown_types_are_ignored() {
        let sets = parse_emoji_sequences("1F468 200D 1F469; RGI_Emoji_ZWJ_Sequence; couple\nno type here\n").unwrap();
        assert!(sets.all.is_empty());
    }

    #[test]
    fn test_malformed_sequence() {
        let err = parse_emoji_sequences("\n0023 FE0F; Emoji_Keycap_Sequence; keycap\n").unwrap_err();
        assert!(matches!(err, apperr::Error::Parse { line: 2, .. }));
    }
}

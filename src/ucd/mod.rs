// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsers for the Unicode Character Database text files.
//!
//! They all produce plain [`CodepointSet`]s which are then bundled into one
//! [`UnicodeProperties`] value. Nothing downstream ever looks at the raw files.

mod east_asian_width;
mod emoji;
mod prop_list;
mod unicode_data;
mod version;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use east_asian_width::{EastAsianWidth, parse_east_asian_width};
pub use emoji::{EmojiSets, parse_emoji_sequences};
pub use prop_list::parse_prop_list;
pub use unicode_data::{UnicodeData, parse_unicode_data};
pub use version::{UnicodeVersion, parse_version};

use crate::apperr;
use crate::codepoints::{self, Codepoint, CodepointSet};
use crate::names::NameTable;

macro_rules! static_regex {
    ($re:literal $(,)?) => {{
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new($re).unwrap())
    }};
}
pub(crate) use static_regex;

/// The non-comment, non-empty lines of a UCD file, trimmed, with 1-based line numbers.
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub(crate) fn parse_hex(file: &str, line: usize, s: &str) -> apperr::Result<Codepoint> {
    codepoints::parse_range_spec(s)
        .ok()
        .filter(|r| r.start() == r.end())
        .map(|r| *r.start())
        .ok_or_else(|| apperr::Error::parse(file, line, format!("invalid codepoint {s:?}")))
}

/// The contents of the UCD files the generator reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sources<'a> {
    pub readme: &'a str,
    pub unicode_data: &'a str,
    pub prop_list: &'a str,
    pub east_asian_width: &'a str,
    pub emoji_sequences: &'a str,
    /// Optional `code category name` list of extra glyph names.
    pub nerd_fonts: Option<&'a str>,
}

/// Everything the tables are computed from.
#[derive(Debug, Clone)]
pub struct UnicodeProperties {
    pub version: UnicodeVersion,
    /// General category (`Lu`, `Mn`, ...) to its members.
    pub categories: BTreeMap<String, CodepointSet>,
    /// `PropList.txt` property to its members.
    pub properties: BTreeMap<String, CodepointSet>,
    /// Combining, default ignorable and modifier codepoints.
    pub marks: CodepointSet,
    pub symbols: CodepointSet,
    pub not_assigned: CodepointSet,
    pub emoji: EmojiSets,
    pub east_asian: EastAsianWidth,
    pub names: NameTable,
}

impl UnicodeProperties {
    pub fn parse(sources: &Sources<'_>) -> apperr::Result<Self> {
        let version = parse_version(sources.readme)?;
        let UnicodeData { categories, mut marks, symbols, not_assigned, mut names } =
            parse_unicode_data(sources.unicode_data)?;
        let properties = parse_prop_list(sources.prop_list)?;
        let emoji = parse_emoji_sequences(sources.emoji_sequences)?;
        let east_asian = parse_east_asian_width(sources.east_asian_width)?;

        // See https://www.unicode.org/faq/unsup_char.html#3
        if let Some(ignorable) = properties.get("Other_Default_Ignorable_Code_Point") {
            marks |= ignorable;
        }

        if let Some(text) = sources.nerd_fonts {
            parse_nerd_fonts(text, &mut names)?;
        }
        names.add_html_entities();
        names.add_synonyms();

        tracing::info!(
            %version,
            categories = categories.len(),
            marks = marks.len(),
            emoji = emoji.all.len(),
            names = names.len(),
            "parsed unicode character database"
        );

        Ok(Self { version, categories, properties, marks, symbols, not_assigned, emoji, east_asian, names })
    }

    /// Reads the UCD files from `dir` and parses them.
    pub fn load(dir: &Path, nerd_fonts: Option<&Path>) -> apperr::Result<Self> {
        let readme = read(&dir.join("ReadMe.txt"))?;
        let unicode_data = read(&dir.join("UnicodeData.txt"))?;
        let prop_list = read(&dir.join("PropList.txt"))?;
        let east_asian_width = read(&dir.join("EastAsianWidth.txt"))?;
        let emoji_sequences = read(&dir.join("emoji-sequences.txt"))?;
        let nerd_fonts = nerd_fonts.map(read).transpose()?;

        Self::parse(&Sources {
            readme: &readme,
            unicode_data: &unicode_data,
            prop_list: &prop_list,
            east_asian_width: &east_asian_width,
            emoji_sequences: &emoji_sequences,
            nerd_fonts: nerd_fonts.as_deref(),
        })
    }

    /// A category's members, or an empty set if the UCD doesn't list it.
    pub fn category(&self, name: &str) -> CodepointSet {
        self.categories.get(name).cloned().unwrap_or_default()
    }

    pub fn property(&self, name: &str) -> CodepointSet {
        self.properties.get(name).cloned().unwrap_or_default()
    }

    /// The union of every category whose name passes `filter`.
    pub fn categories_where(&self, filter: impl Fn(&str) -> bool) -> CodepointSet {
        let mut set = CodepointSet::new();
        for (_, members) in self.categories.iter().filter(|(name, _)| filter(name)) {
            set |= members;
        }
        set
    }
}

pub fn read(path: &Path) -> apperr::Result<String> {
    fs::read_to_string(path).map_err(|err| apperr::Error::io(path, err))
}

fn parse_nerd_fonts(text: &str, names: &mut NameTable) -> apperr::Result<()> {
    const FILE: &str = "nerd-fonts-glyphs.txt";
    for (line, raw) in data_lines(text) {
        let mut parts = raw.splitn(3, ' ');
        let (Some(code), Some(_category), name) = (parts.next(), parts.next(), parts.next()) else {
            return Err(apperr::Error::parse(FILE, line, format!("expected `code category name`: {raw:?}")));
        };
        let cp = parse_hex(FILE, line, code)?;
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            names.add_name_if_missing(cp, &name.to_uppercase());
        }
    }
    Ok(())
}

/// The row/column diacritics in ordinal order: the first field of every line.
///
/// Every codepoint gets its own ordinal, so repeats and U+0000 are rejected.
pub fn parse_diacritics(text: &str) -> apperr::Result<Vec<Codepoint>> {
    const FILE: &str = "rowcolumn-diacritics.txt";
    let mut seen = CodepointSet::new();
    let mut codes = Vec::new();
    for (line, raw) in data_lines(text) {
        let code = raw.split(';').next().unwrap_or_default();
        let cp = parse_hex(FILE, line, code)?;
        if cp == 0 {
            return Err(apperr::Error::parse(FILE, line, "U+0000 can't be a diacritic"));
        }
        if !seen.insert(cp) {
            return Err(apperr::Error::parse(FILE, line, format!("duplicate diacritic U+{cp:04X}")));
        }
        codes.push(cp);
    }
    Ok(codes)
}

/// Skin tone modifiers and regional indicators count as marks from the start.
/// See https://github.com/harfbuzz/harfbuzz/issues/169
pub(crate) fn initial_marks() -> CodepointSet {
    &codepoints::emoji_skin_tone_modifiers() | &codepoints::flag_codepoints()
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub const README: &str = "# Unicode Character Database\n\
                              # Date: 2024-08-06\n\
                              Version 16.0.0 of the Unicode Standard.\n";

    pub const UNICODE_DATA: &str = "\
0000;<control>;Cc;0;BN;;;;;N;NULL;;;;
0009;<control>;Cc;0;S;;;;;N;CHARACTER TABULATION;;;;
0020;SPACE;Zs;0;WS;;;;;N;;;;;
0021;EXCLAMATION MARK;Po;0;ON;;;;;N;;;;;
0024;DOLLAR SIGN;Sc;0;ET;;;;;N;;;;;
0030;DIGIT ZERO;Nd;0;EN;;;;0;N;;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
00AD;SOFT HYPHEN;Cf;0;BN;;;;;N;;;;;
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
0302;COMBINING CIRCUMFLEX ACCENT;Mn;230;NSM;;;;;N;NON-SPACING CIRCUMFLEX;;;;
231A;WATCH;So;0;ON;;;;;N;;;;;
3400;<CJK Ideograph Extension A, First>;Lo;0;L;;;;;N;;;;;
4DBF;<CJK Ideograph Extension A, Last>;Lo;0;L;;;;;N;;;;;
D800;<Non Private Use High Surrogate, First>;Cs;0;L;;;;;N;;;;;
DB7F;<Non Private Use High Surrogate, Last>;Cs;0;L;;;;;N;;;;;
E000;<Private Use, First>;Co;0;L;;;;;N;;;;;
F8FF;<Private Use, Last>;Co;0;L;;;;;N;;;;;
FE0E;VARIATION SELECTOR-15;Mn;0;NSM;;;;;N;;;;;
FE0F;VARIATION SELECTOR-16;Mn;0;NSM;;;;;N;;;;;
1F1E6;REGIONAL INDICATOR SYMBOL LETTER A;So;0;L;;;;;N;;;;;
1F1E7;REGIONAL INDICATOR SYMBOL LETTER B;So;0;L;;;;;N;;;;;
1F41D;HONEYBEE;So;0;ON;;;;;N;;;;;
";

    pub const PROP_LIST: &str = "\
# PropList-16.0.0.txt
0009..000D    ; White_Space # Cc   [5] <control-0009>..<control-000D>
0020          ; White_Space # Zs       SPACE
034F          ; Other_Default_Ignorable_Code_Point # Mn       COMBINING GRAPHEME JOINER
";

    pub const EAST_ASIAN_WIDTH: &str = "\
0020;Na          # Zs         SPACE
00A1;A           # Po         INVERTED EXCLAMATION MARK
231A..231B;W     # So     [2] WATCH..HOURGLASS
3400..4DBF;W     # Lo  [6592] CJK UNIFIED IDEOGRAPH-3400..CJK UNIFIED IDEOGRAPH-4DBF
FE0E;A           # Mn         VARIATION SELECTOR-15
";

    pub const EMOJI_SEQUENCES: &str = "\
231A..231B    ; Basic_Emoji                  ; watch..hourglass done # E0.6   [2] (⌚..⌛)
2194 FE0F     ; Basic_Emoji                  ; left-right arrow # E0.6   [1] (↔️)
0023 FE0F 20E3; Emoji_Keycap_Sequence        ; keycap: # # E0.6   [1] (#️⃣)
1F1E6 1F1E8   ; RGI_Emoji_Flag_Sequence      ; flag: Ascension Island # E2.0   [1] (🇦🇨)
1F3F4 E0067 E0062 E0065 E006E E0067 E007F; RGI_Emoji_Tag_Sequence; flag: England # E5.0   [1] (🏴󠁧󠁢󠁥󠁮󠁧󠁿)
261D 1F3FB    ; RGI_Emoji_Modifier_Sequence  ; index pointing up: light skin tone # E1.0   [1] (☝🏻)
";

    pub fn sources() -> Sources<'static> {
        Sources {
            readme: README,
            unicode_data: UNICODE_DATA,
            prop_list: PROP_LIST,
            east_asian_width: EAST_ASIAN_WIDTH,
            emoji_sequences: EMOJI_SEQUENCES,
            nerd_fonts: Some("# nerd fonts\ne5fa nf-custom folder_open\n0041 x something else\n"),
        }
    }

    #[test]
    fn test_parse_assembles_properties() {
        let props = UnicodeProperties::parse(&sources()).unwrap();
        assert_eq!(props.version.to_string(), "16.0.0");

        // Marks: Mn, Cf, Other_Default_Ignorable_Code_Point, flags and skin tones.
        for cp in [0x300, 0x302, 0xAD, 0x34F, 0xFE0E, 0x1F1E6, 0x1F1FF, 0x1F3FB] {
            assert!(props.marks.contains(cp), "U+{cp:04X}");
        }
        assert!(!props.marks.contains(0x41));

        assert!(props.category("Co").contains(0xF000));
        assert!(props.category("Zz").is_empty());
        assert_eq!(props.categories_where(|c| c.starts_with('L')).len(), 1 + 0x4DBF - 0x3400 + 1);
        assert!(props.property("White_Space").contains(0x20));

        // Existing UCD names win over the glyph list.
        assert_eq!(props.names.name(0x41), Some("LATIN CAPITAL LETTER A"));
        assert_eq!(props.names.name(0xE5FA), Some("FOLDER_OPEN"));
        assert!(props.names.word("bee").is_some_and(|w| w.contains(&0x1F41D)));
    }

    #[test]
    fn test_diacritics_keep_file_order() {
        let text = "# header\n0305;\n030D;\n0304;\n";
        assert_eq!(parse_diacritics(text).unwrap(), vec![0x305, 0x30D, 0x304]);
        assert!(parse_diacritics("zz;\n").is_err());
    }

    #[test]
    fn test_diacritics_reject_repeats_and_nul() {
        let err = parse_diacritics("0305;\n030D;\n0305;\n").unwrap_err();
        assert!(matches!(err, apperr::Error::Parse { line: 3, .. }));
        let err = parse_diacritics("# header\n0000;\n").unwrap_err();
        assert!(matches!(err, apperr::Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_nerd_fonts_malformed_line() {
        let mut names = NameTable::new();
        let err = parse_nerd_fonts("e5fa\n", &mut names).unwrap_err();
        assert!(matches!(err, apperr::Error::Parse { line: 1, .. }));
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The classification functions derived from a parsed UCD.
//!
//! This is where the properties get turned into concrete sets and layers.
//! Rendering them into files is left to [`crate::artifacts`].

use std::fmt::{Display, Write as _};

use crate::codepoints::{self, Codepoint, CodepointSet};
use crate::emit::{self, Backend, Guard, RangePolicy, Signature};
use crate::mark_index::DenseIndex;
use crate::partition::{self, Layer, Partition};
use crate::ranges::{self, CodepointRange};
use crate::ucd::UnicodeProperties;

/// Printable ASCII, handled before the `switch` where the answer is known.
const ASCII_PRINTABLE: Guard = Guard::Within(0x20, 0x7e);

/// A `bool` membership function.
#[derive(Debug, Clone)]
pub struct SetTest {
    pub label: &'static str,
    pub c: String,
    pub go: String,
    pub set: CodepointSet,
    /// Returns `false` early for codepoints it matches.
    pub guard: Option<Guard>,
}

impl SetTest {
    fn new(label: &'static str, c_name: &str, go_name: &str, set: CodepointSet) -> Self {
        Self {
            label,
            c: format!("bool\n{c_name}(char_type code)"),
            go: format!("{go_name}(code rune) bool"),
            set,
            guard: None,
        }
    }

    fn static_inline(mut self) -> Self {
        self.c.insert_str(0, "static inline ");
        self
    }

    fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn signature(&self) -> Signature<'_> {
        Signature { c: &self.c, go: &self.go, subject: "code", c_type: "bool", go_type: "bool" }
    }

    pub fn emit(&self, backend: &dyn Backend) -> String {
        let guards: Vec<(Guard, &dyn Display)> =
            self.guard.iter().map(|&g| (g, &false as &dyn Display)).collect();
        emit::emit_set_test(backend, self.signature(), self.label, &self.set, &guards)
    }
}

/// The tests of `unicode-data.c`, in output order.
pub fn category_tests(props: &UnicodeProperties) -> Vec<SetTest> {
    let mut combining =
        SetTest::new("Combining and default ignored characters", "is_combining_char", "IsCombiningChar", props.marks.clone());
    if let Some(least) = props.marks.first() {
        combining = combining.with_guard(Guard::Below(least));
    }

    let mut ignored = &props.category("Cc") | &props.category("Cs");
    ignored |= &codepoints::noncharacters();

    let mut non_rendered = &props.category("Cc") | &props.category("Cs");
    non_rendered |= &props.category("Cf");
    non_rendered |= &props.property("Other_Default_Ignorable_Code_Point");
    non_rendered.insert_range(0xFE00..=0xFE0F);

    vec![
        combining,
        SetTest::new("Control characters and non-characters", "is_ignored_char", "IsIgnoredChar", ignored)
            .with_guard(ASCII_PRINTABLE),
        SetTest::new(
            "Other_Default_Ignorable_Code_Point and soft hyphen",
            "is_non_rendered_char",
            "IsNonRenderedChar",
            non_rendered,
        )
        .with_guard(ASCII_PRINTABLE),
        SetTest::new(
            "L and N categories",
            "is_word_char",
            "IsWordChar",
            props.categories_where(|c| c.starts_with(['L', 'N'])),
        ),
        SetTest::new("C and Z categories", "is_CZ_category", "IsCZCategory", cz_categories(props)),
        SetTest::new(
            "P category (punctuation)",
            "is_P_category",
            "IsPCategory",
            props.categories_where(|c| c.starts_with('P')),
        ),
    ]
}

/// The tests of `emoji.h`.
pub fn emoji_tests(props: &UnicodeProperties) -> Vec<SetTest> {
    vec![
        SetTest::new("Emoji", "is_emoji", "IsEmoji", props.emoji.all.clone()).static_inline(),
        SetTest::new("Symbols", "is_symbol", "IsSymbol", props.symbols.clone()).static_inline(),
    ]
}

pub fn presentation_base_test(props: &UnicodeProperties) -> SetTest {
    let mut test = SetTest::new(
        "Emoji presentation bases",
        "is_emoji_presentation_base",
        "IsEmojiPresentationBase",
        props.emoji.presentation_bases.clone(),
    );
    test.c = "static inline bool\nis_emoji_presentation_base(uint32_t code)".to_string();
    test
}

fn cz_categories(props: &UnicodeProperties) -> CodepointSet {
    props.categories_where(|c| c.starts_with(['C', 'Z']))
}

pub const WIDTH_DEFAULT: i32 = 1;

pub const WIDTH_SIG: Signature<'static> = Signature {
    c: "static inline int\nwcwidth_std(int32_t code)",
    go: "Runewidth(code rune) int",
    subject: "code",
    c_type: "int",
    go_type: "int",
};

/// The layers of the display width function.
///
/// Negative widths are markers the terminal resolves at runtime:
/// -1 non-printing, -2 ambiguous, -3 private use, -4 unassigned.
#[derive(Debug, Clone)]
pub struct WidthTable {
    layers: Vec<(&'static str, CodepointSet, i32)>,
}

impl WidthTable {
    pub fn new(props: &UnicodeProperties) -> Self {
        let mut marks = props.marks.clone();
        marks.insert(0);

        let mut non_printing = &props.category("Cc") | &props.category("Cf");
        non_printing |= &props.category("Cs");

        let layers = vec![
            ("Flags", codepoints::flag_codepoints(), 2),
            ("Marks", marks, 0),
            ("Non-printing characters", non_printing, -1),
            ("Private use", props.category("Co"), -3),
            ("Text Presentation", props.emoji.narrow.clone(), 1),
            ("East Asian ambiguous width", props.east_asian.ambiguous.clone(), -2),
            ("East Asian double width", props.east_asian.doublewidth.clone(), 2),
            ("Emoji Presentation", props.emoji.wide.clone(), 2),
            ("Not assigned in the unicode character database", props.not_assigned.clone(), -4),
        ];
        Self { layers }
    }

    pub fn partition(&self) -> Partition<'_, i32> {
        let layers: Vec<_> =
            self.layers.iter().map(|(label, set, width)| Layer::new(*label, set, *width)).collect();
        partition::partition(&layers)
    }

    /// The ASCII fast path only pays off where ranges are cheap to test.
    pub fn emit(&self, backend: &dyn Backend) -> String {
        let guards: Vec<(Guard, &dyn Display)> = match backend.policy() {
            RangePolicy::Native => vec![(ASCII_PRINTABLE, &WIDTH_DEFAULT as &dyn Display)],
            RangePolicy::Expand => Vec::new(),
        };
        emit::emit_partition(backend, WIDTH_SIG, &guards, &self.partition(), &WIDTH_DEFAULT)
    }
}

pub const CODEPOINT_FOR_MARK: Signature<'static> = Signature {
    c: "char_type\ncodepoint_for_mark(combining_type m)",
    go: "CodepointForMark(m uint16) rune",
    subject: "m",
    c_type: "char_type",
    go_type: "rune",
};

pub const MARK_FOR_CODEPOINT: Signature<'static> = Signature {
    c: "combining_type\nmark_for_codepoint(char_type c)",
    go: "MarkForCodepoint(c rune) uint16",
    subject: "c",
    c_type: "combining_type",
    go_type: "uint16",
};

pub fn mark_index(props: &UnicodeProperties) -> DenseIndex {
    DenseIndex::build(&props.marks)
}

pub const DIACRITIC_TO_NUM: Signature<'static> = Signature {
    c: "int\ndiacritic_to_num(char_type code)",
    go: "DiacriticToNum(code rune) int",
    subject: "code",
    c_type: "int",
    go_type: "int",
};

/// Row/column diacritics are numbered in file order, starting at 1.
pub fn diacritic_index(diacritics: &[Codepoint]) -> DenseIndex {
    DenseIndex::from_ordered(diacritics)
}

/// A Go regexp character class body matching the C and Z categories except `\n` and `\r`.
pub fn url_delimiters(props: &UnicodeProperties) -> String {
    let mut chars = cz_categories(props);
    chars.remove('\n' as Codepoint);
    chars.remove('\r' as Codepoint);

    let mut buf = String::new();
    for run in ranges::compress(&chars) {
        match run {
            CodepointRange::Single(cp) => write_regex_char(&mut buf, cp),
            CodepointRange::Span(lo, hi) => {
                write_regex_char(&mut buf, lo);
                buf.push('-');
                write_regex_char(&mut buf, hi);
            }
        }
    }
    buf
}

fn write_regex_char(buf: &mut String, cp: Codepoint) {
    if cp < 0x100 {
        _ = write!(buf, "\\x{cp:02x}");
    } else {
        _ = write!(buf, "\\x{{{cp:x}}}");
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Renders every generated file in memory, then writes them all at once.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use indoc::writedoc;

use crate::apperr;
use crate::codepoints::Codepoint;
use crate::emit::{Backend, C, Go};
use crate::mark_index;
use crate::patch::{self, KNOWN_MARKS_END, KNOWN_MARKS_START};
use crate::tables::{self, SetTest, WidthTable};
use crate::ucd::{UnicodeProperties, UnicodeVersion};

pub const UNICODE_DATA_C: &str = "kitty/unicode-data.c";
pub const UNICODE_DATA_H: &str = "kitty/unicode-data.h";
pub const WCWIDTH_STD_H: &str = "kitty/wcwidth-std.h";
pub const EMOJI_H: &str = "kitty/emoji.h";
pub const WCSWIDTH_GO: &str = "tools/wcswidth/std.go";
pub const UNICODE_DATA_GO: &str = "tools/unicode/data.go";
pub const URL_REGEX_GO: &str = "kittens/hints/url_regex.go";
pub const NAMES_TXT: &str = "tools/unicode_names/names.txt";
pub const DIACRITICS_C: &str = "kitty/rowcolumn-diacritics.c";
pub const DIACRITICS_GO: &str = "tools/utils/images/rowcolumn_diacritics.go";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Relative to the output root.
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug, Default, Clone)]
pub struct Artifacts {
    items: Vec<Artifact>,
}

impl Artifacts {
    pub fn push(&mut self, path: &str, text: String) {
        tracing::info!(path, bytes = text.len(), "rendered");
        self.items.push(Artifact { path: path.into(), text });
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.items.iter().find(|a| a.path == Path::new(path)).map(|a| a.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn write_all(&self, root: &Path) -> apperr::Result<()> {
        for artifact in &self.items {
            let path = root.join(&artifact.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| apperr::Error::io(parent, err))?;
            }
            fs::write(&path, &artifact.text).map_err(|err| apperr::Error::io(&path, err))?;
            tracing::debug!(path = %path.display(), "wrote");
        }
        Ok(())
    }
}

pub struct Inputs<'a> {
    pub props: &'a UnicodeProperties,
    /// The current contents of `kitty/unicode-data.h`, which gets its known marks patched.
    pub unicode_data_h: &'a str,
    /// The row/column diacritics in numbering order, if they should be generated.
    pub diacritics: Option<&'a [Codepoint]>,
}

pub fn render(inputs: &Inputs<'_>) -> apperr::Result<Artifacts> {
    let props = inputs.props;
    let version = props.version;
    let mut out = Artifacts::default();

    let category_tests = tables::category_tests(props);
    let emoji_tests = tables::emoji_tests(props);
    let presentation_base = tables::presentation_base_test(props);
    let width = WidthTable::new(props);
    let marks = tables::mark_index(props);

    // Run a quick sanity check to ensure that the mark map round-trips.
    for cp in &props.marks {
        if cp != 0 {
            assert_eq!(marks.forward(marks.reverse(cp)), cp, "mark map sanity check failed for U+{cp:04X}");
        }
    }

    let mut buf = c_prologue(version, false);
    buf.push_str("#include \"unicode-data.h\"\n\n");
    write_set_tests(&mut buf, &C, &category_tests);
    buf.push_str(&marks.emit_forward(&C, tables::CODEPOINT_FOR_MARK));
    buf.push('\n');
    buf.push_str(&marks.emit_reverse(&C, tables::MARK_FOR_CODEPOINT));
    c_epilogue(&mut buf);
    out.push(UNICODE_DATA_C, buf);

    let payload = mark_index::known_marks(&marks)?;
    let patched = patch::replace_between_anchors(inputs.unicode_data_h, KNOWN_MARKS_START, KNOWN_MARKS_END, &payload)?;
    out.push(UNICODE_DATA_H, patched);

    let mut buf = c_prologue(version, true);
    buf.push_str(&width.emit(&C));
    buf.push('\n');
    write_set_tests(&mut buf, &C, std::slice::from_ref(&presentation_base));
    _ = writedoc!(
        buf,
        "
        #define UNICODE_MAJOR_VERSION {}
        #define UNICODE_MINOR_VERSION {}
        #define UNICODE_PATCH_VERSION {}
        ",
        version.major,
        version.minor,
        version.patch,
    );
    c_epilogue(&mut buf);
    out.push(WCWIDTH_STD_H, buf);

    let mut buf = c_prologue(version, true);
    write_set_tests(&mut buf, &C, &emoji_tests);
    c_epilogue(&mut buf);
    out.push(EMOJI_H, buf);

    let mut buf = go_prologue(version, "wcswidth");
    buf.push_str(&width.emit(&Go));
    buf.push('\n');
    buf.push_str(&presentation_base.emit(&Go));
    buf.push('\n');
    _ = writeln!(
        buf,
        "var UnicodeDatabaseVersion = [3]int{{{}, {}, {}}}",
        version.major, version.minor, version.patch
    );
    out.push(WCSWIDTH_GO, buf);

    let mut buf = go_prologue(version, "unicode");
    write_set_tests(&mut buf, &Go, &category_tests);
    write_set_tests(&mut buf, &Go, &emoji_tests);
    buf.push_str(&marks.emit_forward(&Go, tables::CODEPOINT_FOR_MARK));
    buf.push('\n');
    buf.push_str(&marks.emit_reverse(&Go, tables::MARK_FOR_CODEPOINT));
    out.push(UNICODE_DATA_GO, buf);

    let mut buf = go_prologue(version, "hints");
    _ = writeln!(buf, "const URL_DELIMITERS = `{}`", tables::url_delimiters(props));
    out.push(URL_REGEX_GO, buf);

    out.push(NAMES_TXT, props.names.render()?);

    if let Some(diacritics) = inputs.diacritics {
        let index = tables::diacritic_index(diacritics);

        let mut buf = c_prologue(version, false);
        buf.push_str("#include \"unicode-data.h\"\n\n");
        buf.push_str(&index.emit_reverse(&C, tables::DIACRITIC_TO_NUM));
        c_epilogue(&mut buf);
        out.push(DIACRITICS_C, buf);

        let mut buf = go_prologue(version, "images");
        _ = write!(buf, "var NumberToDiacritic = [{}]rune{{", diacritics.len());
        for chunk in diacritics.chunks(16) {
            buf.push_str("\n\t");
            for (i, cp) in chunk.iter().enumerate() {
                if i != 0 {
                    buf.push(' ');
                }
                _ = write!(buf, "{cp:#x},");
            }
        }
        buf.push_str("\n}\n");
        out.push(DIACRITICS_GO, buf);
    }

    Ok(out)
}

fn write_set_tests(buf: &mut String, backend: &dyn Backend, tests: &[SetTest]) {
    for test in tests {
        buf.push_str(&test.emit(backend));
        buf.push('\n');
    }
}

fn generated_by(buf: &mut String, version: UnicodeVersion) {
    _ = writedoc!(
        buf,
        "
        // Unicode data, built from the Unicode Standard {}
        // Code generated by ucd-casegen, DO NOT EDIT.

        ",
        version,
    );
}

fn c_prologue(version: UnicodeVersion, header: bool) -> String {
    let mut buf = String::new();
    generated_by(&mut buf, version);
    if header {
        buf.push_str("#pragma once\n");
    }
    buf.push_str("#include \"data-types.h\"\n\nSTART_ALLOW_CASE_RANGE\n\n");
    buf
}

fn c_epilogue(buf: &mut String) {
    buf.push_str("\nEND_ALLOW_CASE_RANGE\n");
}

fn go_prologue(version: UnicodeVersion, package: &str) -> String {
    let mut buf = String::new();
    generated_by(&mut buf, version);
    _ = writeln!(buf, "package {package}\n");
    buf
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Splices generated text into hand-maintained files between `// START_x` and `// END_x` lines.
//!
//! Everything outside the anchors is left alone. If the anchors can't be found,
//! nothing is patched at all.

use regex::{NoExpand, Regex};

use crate::apperr;

pub const KNOWN_MARKS_START: &str = "START_KNOWN_MARKS";
pub const KNOWN_MARKS_END: &str = "END_KNOWN_MARKS";

pub fn replace_between_anchors(
    text: &str,
    start: &'static str,
    end: &'static str,
    payload: &str,
) -> apperr::Result<String> {
    let re = Regex::new(&format!(
        r"(?ms)^// {}.+?^// {}",
        regex::escape(start),
        regex::escape(end)
    ))?;
    if !re.is_match(text) {
        return Err(apperr::Error::MissingAnchors { start, end });
    }

    let replacement = format!("// {start}\n{payload}\n// {end}");
    Ok(re.replace_all(text, NoExpand(&replacement)).into_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    const HEADER: &str = "#pragma once\n\
                          // START_KNOWN_MARKS\n\
                          static const combining_type VS15 = 1365, VS16 = 1366;\n\
                          // END_KNOWN_MARKS\n\
                          \n\
                          bool is_word_char(char_type ch);\n";

    #[test]
    fn test_replaces_only_between_anchors() {
        let patched = replace_between_anchors(
            HEADER,
            KNOWN_MARKS_START,
            KNOWN_MARKS_END,
            "static const combining_type VS15 = 7, VS16 = 8;",
        )
        .unwrap();
        assert_eq!(
            patched,
            "#pragma once\n\
             // START_KNOWN_MARKS\n\
             static const combining_type VS15 = 7, VS16 = 8;\n\
             // END_KNOWN_MARKS\n\
             \n\
             bool is_word_char(char_type ch);\n"
        );
    }

    #[test]
    fn test_patching_twice_is_stable() {
        let payload = "static const combining_type VS15 = 7, VS16 = 8;";
        let once =
            replace_between_anchors(HEADER, KNOWN_MARKS_START, KNOWN_MARKS_END, payload).unwrap();
        let twice =
            replace_between_anchors(&once, KNOWN_MARKS_START, KNOWN_MARKS_END, payload).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_anchor_fails() {
        for text in [
            "#pragma once\n",
            "// START_KNOWN_MARKS\nfoo\n",
            "foo\n// END_KNOWN_MARKS\n",
            // Anchors must start a line.
            "x // START_KNOWN_MARKS\nfoo\n// END_KNOWN_MARKS\n",
        ] {
            let err =
                replace_between_anchors(text, KNOWN_MARKS_START, KNOWN_MARKS_END, "x").unwrap_err();
            assert!(matches!(err, apperr::Error::MissingAnchors { .. }), "{text:?}");
        }
    }
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use super::{data_lines, static_regex};
use crate::apperr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnicodeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for UnicodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Finds the first `Version X.Y.Z` in `ReadMe.txt`.
pub fn parse_version(readme: &str) -> apperr::Result<UnicodeVersion> {
    let re = static_regex!(r"Version\s+(\d+)\.(\d+)\.(\d+)");
    for (_, line) in data_lines(readme) {
        let Some(caps) = re.captures(line) else { continue };
        let num = |i: usize| caps[i].parse::<u32>().map_err(|_| apperr::Error::MissingVersion);
        return Ok(UnicodeVersion { major: num(1)?, minor: num(2)?, patch: num(3)? });
    }
    Err(apperr::Error::MissingVersion)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_version() {
        let v = parse_version("# comment Version 1.2.3\n\nThis is Version 16.0.0 of the UCD\nVersion 17.0.0\n")
            .unwrap();
        assert_eq!(v, UnicodeVersion { major: 16, minor: 0, patch: 0 });
        assert_eq!(v.to_string(), "16.0.0");
    }

    #[test]
    fn test_missing_version() {
        assert!(matches!(parse_version("Version 16.0\n"), Err(apperr::Error::MissingVersion)));
        assert!(matches!(parse_version(""), Err(apperr::Error::MissingVersion)));
    }
}

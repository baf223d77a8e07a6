// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;
use std::{io, result};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{file}:{line}: {message}")]
    Parse { file: String, line: usize, message: String },

    #[error("invalid codepoint range {0:?}")]
    InvalidRangeSpec(String),

    #[error("could not find the Unicode version in ReadMe.txt")]
    MissingVersion,

    #[error("anchors {start:?} and {end:?} not found, refusing to patch")]
    MissingAnchors { start: &'static str, end: &'static str },

    #[error("U+{0:04X} is not part of the mark index")]
    MissingMark(u32),

    #[error("too many named codepoints: {0}")]
    TooManyNames(usize),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse { file: file.to_string(), line, message: message.into() }
    }
}

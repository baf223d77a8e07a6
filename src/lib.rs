// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compiles classified Unicode codepoint sets into exclusive, total `switch` logic
//! for C and Go, along with the dense mark index and the auxiliary tables built from the UCD.

pub mod apperr;
pub mod artifacts;
pub mod codepoints;
pub mod emit;
pub mod mark_index;
pub mod names;
pub mod partition;
pub mod patch;
pub mod ranges;
pub mod tables;
pub mod ucd;

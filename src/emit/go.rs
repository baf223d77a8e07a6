// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Display, Write as _};

use super::{Backend, Guard, RangePolicy, Signature};
use crate::codepoints::Codepoint;

/// Go, whose `switch` has no range labels. Output is already `gofmt` clean.
pub struct Go;

impl Backend for Go {
    fn policy(&self) -> RangePolicy {
        RangePolicy::Expand
    }

    fn label_separator(&self) -> &'static str {
        ", "
    }

    fn case_indent(&self) -> &'static str {
        "\t"
    }

    fn body_indent(&self) -> &'static str {
        "\t\t"
    }

    fn function_open(&self, buf: &mut String, sig: &Signature<'_>) {
        _ = writeln!(buf, "func {} {{", sig.go);
    }

    fn guard(&self, buf: &mut String, subject: &str, guard: Guard, value: &dyn Display) {
        match guard {
            Guard::Below(cp) => {
                _ = writeln!(buf, "\tif {subject} < {cp:#x} {{");
            }
            Guard::Within(lo, hi) => {
                _ = writeln!(buf, "\tif {lo:#x} <= {subject} && {subject} <= {hi:#x} {{");
            }
        }
        _ = writeln!(buf, "\t\treturn {value}\n\t}}");
    }

    fn switch_open(&self, buf: &mut String, subject: &str) {
        _ = writeln!(buf, "\tswitch {subject} {{");
    }

    // A switch whose every clause returns is a terminating statement,
    // so unlike C there's no trailing return.
    fn switch_close(&self, buf: &mut String, default: &dyn Display) {
        _ = writeln!(buf, "\tdefault:\n\t\treturn {default}\n\t}}\n}}");
    }

    fn return_stmt(&self, expr: &dyn Display) -> String {
        format!("return {expr}")
    }

    fn return_type<'s>(&self, sig: &Signature<'s>) -> &'s str {
        sig.go_type
    }

    fn cast(&self, ty: &str, expr: &dyn Display) -> String {
        format!("{ty}({expr})")
    }

    fn write_forward_lookup(&self, buf: &mut String, sig: &Signature<'_>, values: &[Codepoint]) {
        let name = sig.go.split('(').next().unwrap_or_default();
        let mut chars = name.chars();
        let table = match chars.next() {
            Some(first) => format!("{}{}Map", first.to_ascii_lowercase(), chars.as_str()),
            None => "lookupMap".to_string(),
        };

        _ = write!(buf, "var {table} = [{}]rune{{", values.len());
        for (i, v) in values.iter().enumerate() {
            if i % 16 == 0 {
                buf.push_str("\n\t");
            } else {
                buf.push(' ');
            }
            _ = write!(buf, "{v},");
        }
        buf.push_str("\n}\n\n");
        _ = writeln!(buf, "func {} {{", sig.go);
        _ = writeln!(buf, "\tif int({0}) < len({table}) {{\n\t\treturn {table}[{0}]\n\t}}", sig.subject);
        buf.push_str("\treturn 0\n}\n");
    }
}

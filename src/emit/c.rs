// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Display, Write as _};

use super::{Backend, Guard, RangePolicy, Signature};
use crate::codepoints::Codepoint;

/// C with the GNU `case lo ... hi:` extension.
///
/// The generated files wrap everything in `START_ALLOW_CASE_RANGE`,
/// which silences the pedantic warnings for it.
pub struct C;

impl Backend for C {
    fn policy(&self) -> RangePolicy {
        RangePolicy::Native
    }

    fn label_separator(&self) -> &'static str {
        ": case "
    }

    fn case_indent(&self) -> &'static str {
        "\t\t"
    }

    fn body_indent(&self) -> &'static str {
        "\t\t\t"
    }

    fn function_open(&self, buf: &mut String, sig: &Signature<'_>) {
        _ = writeln!(buf, "{} {{", sig.c);
    }

    fn guard(&self, buf: &mut String, subject: &str, guard: Guard, value: &dyn Display) {
        match guard {
            Guard::Below(cp) => {
                _ = writeln!(buf, "\tif (LIKELY({subject} < {cp:#x})) return {value};");
            }
            Guard::Within(lo, hi) => {
                _ = writeln!(
                    buf,
                    "\tif (LIKELY({lo:#x} <= {subject} && {subject} <= {hi:#x})) return {value};"
                );
            }
        }
    }

    fn switch_open(&self, buf: &mut String, subject: &str) {
        _ = writeln!(buf, "\tswitch({subject}) {{");
    }

    fn switch_close(&self, buf: &mut String, default: &dyn Display) {
        _ = writeln!(buf, "\t\tdefault:\n\t\t\treturn {default};\n\t}}\n\treturn {default};\n}}");
    }

    fn return_stmt(&self, expr: &dyn Display) -> String {
        format!("return {expr};")
    }

    fn return_type<'s>(&self, sig: &Signature<'s>) -> &'s str {
        sig.c_type
    }

    fn cast(&self, ty: &str, expr: &dyn Display) -> String {
        format!("({ty})({expr})")
    }

    fn write_forward_lookup(&self, buf: &mut String, sig: &Signature<'_>, values: &[Codepoint]) {
        _ = writeln!(buf, "{} {{", sig.c);
        _ = write!(buf, "\tstatic {} map[{}] = {{ ", sig.c_type, values.len());
        for (i, v) in values.iter().enumerate() {
            if i != 0 {
                buf.push_str(", ");
            }
            _ = write!(buf, "{v}");
        }
        buf.push_str(" }; // {{{ mapping }}}\n");
        _ = writeln!(buf, "\tif ({0} < arraysz(map)) return map[{0}];", sig.subject);
        buf.push_str("\treturn 0;\n}\n");
    }
}

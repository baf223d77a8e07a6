// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Renders partitions as `switch` statements for the supported target languages.
//!
//! Both targets share everything except how a run of codepoints becomes case labels:
//! C has the `case lo ... hi:` extension, while Go has to list every single value.

mod c;
mod go;

use std::fmt::{Display, Write as _};

pub use c::C;
pub use go::Go;

use crate::codepoints::{Codepoint, CodepointSet};
use crate::mark_index::IndexedRun;
use crate::partition::{Layer, Partition, Resolved, partition};
use crate::ranges::CodepointRange;

/// How a backend turns a [`CodepointRange::Span`] into case labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// One inclusive range label per run.
    Native,
    /// One label per codepoint in the run, all in the same clause.
    Expand,
}

/// Early returns placed before the `switch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Below(Codepoint),
    Within(Codepoint, Codepoint),
}

/// The same function spelled for each target.
///
/// `c` and `go` are everything between the function keyword (if any) and the opening brace.
/// `c_type` and `go_type` are the return types, used for conversions in computed returns.
#[derive(Debug, Clone, Copy)]
pub struct Signature<'a> {
    pub c: &'a str,
    pub go: &'a str,
    pub subject: &'a str,
    pub c_type: &'a str,
    pub go_type: &'a str,
}

pub trait Backend {
    fn policy(&self) -> RangePolicy;

    /// Separates the values of an expanded run.
    fn label_separator(&self) -> &'static str;
    fn case_indent(&self) -> &'static str;
    fn body_indent(&self) -> &'static str;

    fn function_open(&self, buf: &mut String, sig: &Signature<'_>);
    fn guard(&self, buf: &mut String, subject: &str, guard: Guard, value: &dyn Display);
    fn switch_open(&self, buf: &mut String, subject: &str);
    /// Closes the switch and the function. `default` is the value of the fallback clause.
    fn switch_close(&self, buf: &mut String, default: &dyn Display);
    fn return_stmt(&self, expr: &dyn Display) -> String;
    fn return_type<'s>(&self, sig: &Signature<'s>) -> &'s str;
    fn cast(&self, ty: &str, expr: &dyn Display) -> String;

    /// A complete function returning `values[m]`, or 0 if `m` is out of bounds.
    fn write_forward_lookup(&self, buf: &mut String, sig: &Signature<'_>, values: &[Codepoint]);

    fn write_case(&self, buf: &mut String, run: CodepointRange) {
        buf.push_str(self.case_indent());
        buf.push_str("case ");
        match (run, self.policy()) {
            (CodepointRange::Single(cp), _) => {
                _ = write!(buf, "{cp:#x}");
            }
            (CodepointRange::Span(lo, hi), RangePolicy::Native) => {
                _ = write!(buf, "{lo:#x} ... {hi:#x}");
            }
            (CodepointRange::Span(lo, hi), RangePolicy::Expand) => {
                for cp in lo..=hi {
                    if cp != lo {
                        buf.push_str(self.label_separator());
                    }
                    _ = write!(buf, "{cp:#x}");
                }
            }
        }
        buf.push_str(":\n");
    }
}

/// Writes one function body clause by clause.
pub struct SwitchWriter<'a> {
    backend: &'a dyn Backend,
    sig: Signature<'a>,
    buf: String,
}

impl<'a> SwitchWriter<'a> {
    pub fn new(backend: &'a dyn Backend, sig: Signature<'a>, guards: &[(Guard, &dyn Display)]) -> Self {
        let mut buf = String::new();
        backend.function_open(&mut buf, &sig);
        for &(guard, value) in guards {
            backend.guard(&mut buf, sig.subject, guard, value);
        }
        backend.switch_open(&mut buf, sig.subject);
        Self { backend, sig, buf }
    }

    pub fn comment(&mut self, text: &str) {
        _ = writeln!(self.buf, "{}// {text}", self.backend.case_indent());
    }

    /// Every run in `ranges` returns `outcome`.
    pub fn clauses(&mut self, ranges: &[CodepointRange], outcome: &dyn Display) {
        let ret = self.backend.return_stmt(outcome);
        for &run in ranges {
            self.backend.write_case(&mut self.buf, run);
            _ = writeln!(self.buf, "{}{ret}", self.backend.body_indent());
        }
    }

    /// A resolved layer, folded into a `{{{ }}}` block headed by its label.
    pub fn group<O: Display>(&mut self, layer: &Resolved<'_, O>) {
        self.comment(&format!("{} ({} codepoints) {{{{{{", layer.label, layer.count));
        self.clauses(&layer.ranges, &layer.outcome);
        self.comment("}}}");
        self.buf.push('\n');
    }

    /// Runs that return `base + (subject - lo)` instead of a constant.
    pub fn offset_clauses(&mut self, runs: &[IndexedRun]) {
        let subject = self.sig.subject;
        let ty = self.backend.return_type(&self.sig);
        for run in runs {
            let expr = match run.range {
                CodepointRange::Single(_) => run.base.to_string(),
                CodepointRange::Span(lo, _) => {
                    self.backend.cast(ty, &format_args!("{} + ({subject} - {lo:#x})", run.base))
                }
            };
            self.backend.write_case(&mut self.buf, run.range);
            _ = writeln!(self.buf, "{}{}", self.backend.body_indent(), self.backend.return_stmt(&expr));
        }
    }

    pub fn finish(mut self, default: &dyn Display) -> String {
        self.backend.switch_close(&mut self.buf, default);
        self.buf
    }
}

/// Renders a whole partition as a total function, `default` covering the rest.
pub fn emit_partition<O: Display>(
    backend: &dyn Backend,
    sig: Signature<'_>,
    guards: &[(Guard, &dyn Display)],
    partition: &Partition<'_, O>,
    default: &O,
) -> String {
    let mut w = SwitchWriter::new(backend, sig, guards);
    for layer in &partition.layers {
        w.group(layer);
    }
    w.finish(default)
}

/// Renders a membership test for `set`.
pub fn emit_set_test(
    backend: &dyn Backend,
    sig: Signature<'_>,
    label: &str,
    set: &CodepointSet,
    guards: &[(Guard, &dyn Display)],
) -> String {
    let p = partition(&[Layer::new(label, set, true)]);
    emit_partition(backend, sig, guards, &p, &false)
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::codepoints::MAX_CODEPOINT;

    pub const WIDTH_SIG: Signature<'static> = Signature {
        c: "static inline int\nwidth(int32_t code)",
        go: "Width(code rune) int",
        subject: "code",
        c_type: "int",
        go_type: "int",
    };

    /// Reads a generated switch back into `codepoint -> returned text`, for either target.
    /// Clauses that compute their result are evaluated for `+ (subject - lo)` shapes.
    pub fn interpret(src: &str) -> (HashMap<Codepoint, String>, String) {
        let mut map = HashMap::new();
        let mut default = String::new();
        let mut pending: Vec<(Codepoint, Codepoint)> = Vec::new();
        let mut lines = src.lines().map(str::trim);

        while let Some(line) = lines.next() {
            if line == "default:" {
                default = ret_value(lines.next().unwrap()).to_string();
                continue;
            }
            let Some(labels) = line.strip_prefix("case ") else { continue };
            let labels = labels.strip_suffix(':').unwrap();
            pending.clear();
            for label in labels.split(", ") {
                let (lo, hi) = match label.split_once(" ... ") {
                    Some((lo, hi)) => (hex(lo), hex(hi)),
                    None => (hex(label), hex(label)),
                };
                pending.push((lo, hi));
            }
            let value = ret_value(lines.next().unwrap()).to_string();
            for &(lo, hi) in &pending {
                for cp in lo..=hi {
                    let prev = map.insert(cp, evaluate(&value, cp));
                    assert!(prev.is_none(), "U+{cp:04X} matched by two clauses");
                }
            }
        }

        (map, default)
    }

    fn hex(s: &str) -> Codepoint {
        Codepoint::from_str_radix(s.trim_start_matches("0x"), 16).unwrap()
    }

    fn ret_value(line: &str) -> &str {
        line.strip_prefix("return ").unwrap().trim_end_matches(';')
    }

    // Handles `b`, `b + (x - 0xlo)`, `T(b + (x - 0xlo))` and `(T)(b + (x - 0xlo))`.
    fn evaluate(value: &str, cp: Codepoint) -> String {
        let Some(plus) = value.find(" + (") else { return value.to_string() };
        let base: u32 = value[..plus].rsplit('(').next().unwrap().parse().unwrap();
        let lo = &value[value.find("- ").unwrap() + 2..];
        let lo = hex(lo.split(')').next().unwrap());
        (base + cp - lo).to_string()
    }

    #[test]
    fn test_native_and_expanded_case_labels() {
        let mut c = String::new();
        C.write_case(&mut c, CodepointRange::Span(0x300, 0x302));
        C.write_case(&mut c, CodepointRange::Single(0xAD));
        assert_eq!(c, "\t\tcase 0x300 ... 0x302:\n\t\tcase 0xad:\n");

        let mut go = String::new();
        Go.write_case(&mut go, CodepointRange::Span(0x300, 0x302));
        Go.write_case(&mut go, CodepointRange::Single(0xAD));
        assert_eq!(go, "\tcase 0x300, 0x301, 0x302:\n\tcase 0xad:\n");
    }

    #[test]
    fn test_emit_partition_c() {
        let a: CodepointSet = [10, 11, 12, 50].into_iter().collect();
        let b: CodepointSet = [11, 12, 13].into_iter().collect();
        let p = partition(&[Layer::new("A", &a, 2), Layer::new("B", &b, 0)]);
        let src = emit_partition(&C, WIDTH_SIG, &[], &p, &1);
        assert_eq!(
            src,
            indoc::indoc! {"
                static inline int
                width(int32_t code) {
                \tswitch(code) {
                \t\t// A (4 codepoints) {{{
                \t\tcase 0xa ... 0xc:
                \t\t\treturn 2;
                \t\tcase 0x32:
                \t\t\treturn 2;
                \t\t// }}}

                \t\t// B (1 codepoints) {{{
                \t\tcase 0xd:
                \t\t\treturn 0;
                \t\t// }}}

                \t\tdefault:
                \t\t\treturn 1;
                \t}
                \treturn 1;
                }
            "}
        );
    }

    #[test]
    fn test_emit_partition_go() {
        let a: CodepointSet = [10, 11, 12, 50].into_iter().collect();
        let p = partition(&[Layer::new("A", &a, 2)]);
        let guard = (Guard::Within(0x20, 0x7e), &1 as &dyn Display);
        let src = emit_partition(&Go, WIDTH_SIG, &[guard], &p, &1);
        assert_eq!(
            src,
            indoc::indoc! {"
                func Width(code rune) int {
                \tif 0x20 <= code && code <= 0x7e {
                \t\treturn 1
                \t}
                \tswitch code {
                \t// A (4 codepoints) {{{
                \tcase 0xa, 0xb, 0xc:
                \t\treturn 2
                \tcase 0x32:
                \t\treturn 2
                \t// }}}

                \tdefault:
                \t\treturn 1
                \t}
                }
            "}
        );
    }

    #[test]
    fn test_emit_set_test_with_guard() {
        let set = CodepointSet::from_range(0x300..=0x36F);
        let sig = Signature {
            c: "bool\nis_mark(char_type code)",
            go: "IsMark(code rune) bool",
            subject: "code",
            c_type: "bool",
            go_type: "bool",
        };
        let guard = (Guard::Below(0x300), &false as &dyn Display);
        let src = emit_set_test(&C, sig, "Marks", &set, &[guard]);
        assert!(src.starts_with("bool\nis_mark(char_type code) {\n\tif (LIKELY(code < 0x300)) return false;\n"));
        assert!(src.contains("\t\tcase 0x300 ... 0x36f:\n\t\t\treturn true;\n"));
        assert!(src.ends_with("\t\tdefault:\n\t\t\treturn false;\n\t}\n\treturn false;\n}\n"));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let forward: CodepointSet = (0..5000).filter(|cp| cp % 7 != 0).collect();
        let backward: CodepointSet = (0..5000).rev().filter(|cp| cp % 7 != 0).collect();
        let other: CodepointSet = (4000..6000).collect();
        let render = |s: &CodepointSet| {
            let p = partition(&[Layer::new("x", s, 3), Layer::new("y", &other, 4)]);
            (emit_partition(&C, WIDTH_SIG, &[], &p, &0), emit_partition(&Go, WIDTH_SIG, &[], &p, &0))
        };
        assert_eq!(render(&forward), render(&backward));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_backends_agree(
            layers in prop::collection::vec(prop::collection::vec(0u32..400, 0..80), 1..5),
        ) {
            let sets: Vec<CodepointSet> = layers.iter().map(|l| l.iter().copied().collect()).collect();
            let input: Vec<_> = sets.iter().enumerate().map(|(i, s)| Layer::new("l", s, i as i32)).collect();
            let p = partition(&input);

            let (native, native_default) = interpret(&emit_partition(&C, WIDTH_SIG, &[], &p, &-1));
            let (expanded, expanded_default) = interpret(&emit_partition(&Go, WIDTH_SIG, &[], &p, &-1));
            prop_assert_eq!(&native, &expanded);
            prop_assert_eq!(&native_default, "-1");
            prop_assert_eq!(&expanded_default, "-1");

            for cp in (0..420).chain([MAX_CODEPOINT]) {
                let via_switch = native.get(&cp).cloned().unwrap_or_else(|| native_default.clone());
                prop_assert_eq!(via_switch, p.classify(cp, &-1).to_string());
            }
        }
    }
}

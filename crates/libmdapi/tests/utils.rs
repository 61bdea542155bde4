// Dead code detection breaks here, because the integration test crates all use a disjoint set of
// the pub items.
#![allow(dead_code)]

use libmdapi::{Document, Extractor};
use pretty_assertions::assert_eq;
use serde_json::Value;

/// Path every test page is extracted under.
pub const SOURCE: &str = "doc/api/fs.md";

/// Strip the common indentation of an indented raw string, keeping blank lines.
pub fn dedent(s: &str) -> String {
    let lines: Vec<&str> = s.lines().map(str::trim_end).collect();
    let indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let body = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n", body.trim_matches('\n'))
}

/// Extract a page with the default configuration.
pub fn extract(source: &str) -> Document {
    extract_with(Extractor::new(), source)
}

/// Extract a page with a custom extractor.
pub fn extract_with(extractor: Extractor, source: &str) -> Document {
    extractor.extract(&dedent(source), SOURCE).unwrap()
}

/// Section records of a page as one JSON array.
pub fn sections(source: &str) -> Value {
    serde_json::to_value(&extract(source).sections).unwrap()
}

/// Assert the value at a JSON pointer into the section records.
pub fn check_pointer(source: &str, pointer: &str, expected: Value) {
    let sections = sections(source);
    assert_eq!(
        sections.pointer(pointer),
        Some(&expected),
        "pointer {pointer} in {sections:#}"
    );
}

/// Assert that nothing exists at a JSON pointer into the section records.
pub fn check_absent(source: &str, pointer: &str) {
    let sections = sections(source);
    assert_eq!(
        sections.pointer(pointer),
        None,
        "pointer {pointer} in {sections:#}"
    );
}

#[macro_export]
macro_rules! gen_tests {
    ($prefix:ident, {
        $(pointer {
            $name:ident: {
                input: $input:expr,
                pointer: $pointer:expr,
                expected: $expected:expr
            }
        })*
        $(absent {
            $absent_name:ident: {
                input: $absent_input:expr,
                pointer: $absent_pointer:expr
            }
        })*
    }) => {
        mod $prefix {
            use super::*;

            $(
                #[test]
                fn $name() {
                    check_pointer($input, $pointer, $expected);
                }
            )*

            $(
                #[test]
                fn $absent_name() {
                    check_absent($absent_input, $absent_pointer);
                }
            )*
        }
    };
}

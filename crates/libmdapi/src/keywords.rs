//! Lead-in phrases and builtin type links used while reading parameter lists.

use std::collections::BTreeMap;

/// Phrases that open a typed list entry.
pub const TYPED_LIST_STARTERS: &[&str] = &["Returns:", "Type:", "Extends:", "Default:"];

/// Whether `text` opens with one of the [`TYPED_LIST_STARTERS`], ignoring case.
pub fn starts_typed_list(text: &str) -> bool {
    let text = text.trim_start();
    TYPED_LIST_STARTERS.iter().any(|starter| {
        text.get(..starter.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(starter))
    })
}

/// MDN base for JavaScript builtins.
const JS_DOC: &str = "https://developer.mozilla.org/en-US/docs/Web/JavaScript";

/// JavaScript primitive types.
const JS_PRIMITIVES: &[&str] = &["boolean", "null", "number", "string", "symbol", "undefined"];

/// JavaScript global objects.
const JS_GLOBALS: &[&str] = &[
    "AggregateError",
    "Array",
    "ArrayBuffer",
    "BigInt",
    "BigInt64Array",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "EvalError",
    "Float32Array",
    "Float64Array",
    "Function",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Map",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "Set",
    "SharedArrayBuffer",
    "SyntaxError",
    "TypeError",
    "TypedArray",
    "URIError",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WeakMap",
    "WeakSet",
];

/// Type name to documentation URL map covering JavaScript builtins.
pub fn builtin_types() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for name in JS_PRIMITIVES {
        map.insert(
            (*name).to_string(),
            format!("{JS_DOC}/Data_structures#{name}_type"),
        );
    }
    for name in JS_GLOBALS {
        map.insert(
            (*name).to_string(),
            format!("{JS_DOC}/Reference/Global_Objects/{name}"),
        );
    }
    map.insert(
        "integer".into(),
        format!("{JS_DOC}/Data_structures#number_type"),
    );
    map.insert("any".into(), format!("{JS_DOC}/Data_structures#data_types"));
    map.insert("this".into(), format!("{JS_DOC}/Reference/Operators/this"));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starters_match_case_insensitively() {
        assert!(starts_typed_list("Returns: {Buffer}"));
        assert!(starts_typed_list("  type: {string}"));
        assert!(!starts_typed_list("Return value is ignored"));
        assert!(!starts_typed_list("Re"));
    }

    #[test]
    fn builtins_cover_primitives_and_globals() {
        let map = builtin_types();
        assert!(map["string"].ends_with("#string_type"));
        assert!(map["Promise"].ends_with("Global_Objects/Promise"));
        assert!(map.contains_key("integer"));
    }
}

//! Heading classification and slug generation.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Semantic kind of a documentation heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingKind {
    /// A page-level module heading.
    Module,
    /// A class declaration.
    Class,
    /// A constructor.
    Ctor,
    /// A method or free function.
    Method,
    /// An emitted event.
    Event,
    /// A property or module-level global.
    Property,
    /// Free-form prose with no API shape.
    Misc,
}

impl HeadingKind {
    /// Label used for the `type` field of output records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Ctor => "ctor",
            Self::Method => "method",
            Self::Event => "event",
            Self::Property => "property",
            Self::Misc => "misc",
        }
    }

    /// Whether the heading describes something callable.
    pub fn is_callable(self) -> bool {
        matches!(self, Self::Ctor | Self::Method)
    }

    /// Whether the kind is a formal API element, as opposed to prose or a page.
    pub fn is_api(self) -> bool {
        !matches!(self, Self::Module | Self::Misc)
    }
}

/// Metadata computed for a heading node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingData {
    /// Heading level.
    pub depth: u8,
    /// Extracted name (e.g. `readFile` for `` `fs.readFile(path)` ``).
    pub name: String,
    /// Full heading text with inline code ticks preserved.
    pub text: String,
    /// URL fragment identifying the heading within its page.
    pub slug: String,
    /// Classified kind.
    #[serde(rename = "type")]
    pub kind: HeadingKind,
}

/// Leading identifier followed by `.member` or `[member]` segments.
const QUALIFIED: &str = r"[A-Za-z_$][\w$]*(?:\.[\w$]+|\[[\w$.]+\])*";

/// `Event: 'name'` headings.
static EVENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^event:\s+`?['"]?([^'"`]+)['"]?`?$"#).unwrap());

/// `Class: Name` headings, with an optional `extends` clause.
static CLASS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^class:\s+`?([\w$.]+)(?:\s+extends\s+`?([\w$.]+)`?)?`?$").unwrap()
});

/// `class Name` declarations.
static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^`?class\s+([A-Z][\w$.]*)(?:\s+extends\s+([\w$.]+))?`?$").unwrap()
});

/// Constructor headings.
static CTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:constructor:\s+)?`?new\s+({QUALIFIED})\s*\(.*\)`?$"
    ))
    .unwrap()
});

/// Call signatures, including static and class method labels.
static METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:static|class)\s+method:\s+)?`?({QUALIFIED})\s*\(.*\)(?:\s*:\s*[^`]+)?`?$"
    ))
    .unwrap()
});

/// Qualified member names.
static PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:class property:\s+)?`[A-Za-z_$][\w$]*((?:\.[\w$]+|\[[\w$.]+\])+)`$")
        .unwrap()
});

/// Bare inline-code identifiers.
static GLOBAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`([A-Za-z_$][\w$]*)`$").unwrap());

/// Classify heading text into a kind and extract its display name.
///
/// The first level heading of a page is always a module. Anything without a recognizable API
/// shape is `Misc`, named after its text.
pub fn classify(text: &str, depth: u8) -> (HeadingKind, String) {
    let text = text.trim();
    if depth <= 1 {
        return (HeadingKind::Module, strip_ticks(text));
    }
    if let Some(caps) = EVENT.captures(text) {
        return (HeadingKind::Event, caps[1].trim().to_string());
    }
    if let Some((name, _)) = class_parts(text) {
        return (HeadingKind::Class, name);
    }
    if let Some(caps) = CTOR.captures(text) {
        return (HeadingKind::Ctor, last_segment(&caps[1]));
    }
    if let Some(caps) = METHOD.captures(text) {
        return (HeadingKind::Method, last_segment(&caps[1]));
    }
    if let Some(caps) = PROPERTY.captures(text) {
        return (HeadingKind::Property, last_segment(&caps[1]));
    }
    if let Some(caps) = GLOBAL.captures(text) {
        return (HeadingKind::Property, caps[1].to_string());
    }
    (HeadingKind::Misc, strip_ticks(text))
}

/// Class name and optional superclass of a class heading.
pub fn class_parts(text: &str) -> Option<(String, Option<String>)> {
    let text = text.trim();
    let caps = CLASS_LABEL
        .captures(text)
        .or_else(|| CLASS_DECL.captures(text))?;
    Some((
        caps[1].to_string(),
        caps.get(2).map(|m| m.as_str().to_string()),
    ))
}

/// The callee expression of a callable heading, e.g. `fs.readFile` or `new Foo`.
pub fn callee(text: &str) -> Option<String> {
    let text = strip_label(text.trim()).trim_matches('`');
    let open = text.find('(')?;
    let callee = text[..open].trim();
    (!callee.is_empty()).then(|| callee.to_string())
}

/// Whether a property name is unqualified, i.e. a module-level global rather than a member.
pub fn is_global_name(text: &str) -> bool {
    GLOBAL.is_match(text.trim())
}

/// Drop `Static method:`-style labels from heading text.
pub(crate) fn strip_label(text: &str) -> &str {
    match text.split_once(':') {
        Some((label, rest))
            if !label.contains('`')
                && !label.contains('(')
                && label.chars().all(|c| c.is_alphabetic() || c == ' ') =>
        {
            rest.trim_start()
        }
        _ => text,
    }
}

/// Last `.` or `[...]` segment of a qualified name.
fn last_segment(qualified: &str) -> String {
    let trimmed = qualified.trim_end_matches(']');
    trimmed
        .rsplit(['.', '['])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

/// Remove inline code ticks.
fn strip_ticks(text: &str) -> String {
    text.replace('`', "")
}

/// Generates unique URL fragments for the headings of one page.
///
/// Repeated slugs receive a numeric suffix in document order (`foo`, `foo-1`, `foo-2`).
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    /// Occurrence count per base slug.
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Create a slugger with no recorded slugs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next unique slug for `text`.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

/// Lowercase, drop punctuation and join words with hyphens.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('-');
        }
    }
    out
}

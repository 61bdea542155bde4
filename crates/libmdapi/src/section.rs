//! Output records built from the entry forest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    entry::HeadingEntry,
    heading::{HeadingKind, is_global_name},
    hierarchy::HierarchizedEntry,
    node::{LinkStyle, ProseNode, stringify},
    queries::{TypedListConfidence, stability_of, typed_list_confidence},
    signature::{ParamDoc, display_name, parse_list, parse_signature},
};

/// Keys that describe a section itself and are never promoted into an ancestor.
pub const RESERVED_KEYS: &[&str] = &[
    "type",
    "@name",
    "@see",
    "@module",
    "text",
    "description",
    "miscs",
    "source",
];

/// Buckets every module record carries, even when empty.
const MODULE_BUCKETS: &[&str] = &["classes", "events", "globals", "methods", "properties"];

/// Discriminant of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    /// An API page.
    Module,
    /// A prose page with no API surface.
    Text,
    /// A class.
    Class,
    /// A constructor.
    Ctor,
    /// A method or function.
    Method,
    /// An event.
    Event,
    /// A property or global.
    Property,
    /// Free-form prose folded into its nearest formal ancestor.
    Misc,
}

impl SectionKind {
    /// The `type` value written to the record.
    pub fn label(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Text => "text",
            Self::Class => "class",
            Self::Ctor => "ctor",
            Self::Method => "method",
            Self::Event => "event",
            Self::Property => "property",
            Self::Misc => "misc",
        }
    }

    /// Parse a `type` value.
    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "module" => Self::Module,
            "text" => Self::Text,
            "class" => Self::Class,
            "ctor" => Self::Ctor,
            "method" => Self::Method,
            "event" => Self::Event,
            "property" => Self::Property,
            "misc" => Self::Misc,
            _ => return None,
        })
    }

    /// Record kind for a classified heading.
    fn from_heading(kind: HeadingKind) -> Self {
        match kind {
            HeadingKind::Module => Self::Module,
            HeadingKind::Class => Self::Class,
            HeadingKind::Ctor => Self::Ctor,
            HeadingKind::Method => Self::Method,
            HeadingKind::Event => Self::Event,
            HeadingKind::Property => Self::Property,
            HeadingKind::Misc => Self::Misc,
        }
    }
}

/// A JSON object record with a `type` discriminant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(Map<String, Value>);

impl Section {
    /// Create a record holding only its `type`.
    pub fn new(kind: SectionKind) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(kind.label().into()));
        Self(map)
    }

    /// The record's kind, if its `type` is one this crate produces.
    pub fn kind(&self) -> Option<SectionKind> {
        self.0
            .get("type")
            .and_then(Value::as_str)
            .and_then(SectionKind::from_label)
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// All fields.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Append `child` to the array under `bucket`, creating it when absent.
    pub fn push_child(&mut self, bucket: &str, child: Self) {
        match self
            .0
            .entry(bucket)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(child.into_value()),
            _ => debug!(bucket, "bucket key holds a scalar; child dropped"),
        }
    }

    /// The underlying JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Fold the fields of a misc `section` into its formal `parent`.
///
/// Reserved keys are skipped. An array on the parent receives the child's value (element-wise
/// when that value is itself an array); any other existing parent value is left alone; absent
/// keys are copied. Does nothing unless `section` is misc and `parent` is not.
pub fn promote_misc_children(section: &Section, parent: &mut Section) {
    if section.kind() != Some(SectionKind::Misc) || parent.kind() == Some(SectionKind::Misc) {
        return;
    }
    for (key, value) in section.fields() {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        match parent.0.get_mut(key) {
            Some(Value::Array(existing)) => match value {
                Value::Array(items) => existing.extend(items.iter().cloned()),
                other => existing.push(other.clone()),
            },
            Some(_) => {}
            None => {
                parent.0.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Builds section records from hierarchized entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBuilder {
    /// Namespace for `@module` values.
    prefix: String,
    /// Base URL for `@see` permalinks.
    base_url: String,
    /// Only accept strongly typed lists as parameter documentation.
    strict_lists: bool,
}

impl SectionBuilder {
    /// Create a builder for the given `@module` prefix and permalink base.
    pub fn new(prefix: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            base_url: base_url.into(),
            strict_lists: false,
        }
    }

    /// Require strongly typed lists before reading a list as parameter documentation.
    pub fn with_strict_lists(mut self, strict: bool) -> Self {
        self.strict_lists = strict;
        self
    }

    /// Build every root of a forest.
    pub fn build_document(
        &self,
        forest: &[HierarchizedEntry],
        all_entries: &[HeadingEntry],
    ) -> Vec<Section> {
        forest
            .iter()
            .map(|root| self.build(root, all_entries))
            .collect()
    }

    /// Build one record, recursing into the entry's children.
    ///
    /// `all_entries` is the full flat entry list of the page, consulted to decide whether a page
    /// heading describes an API module or plain prose.
    pub fn build(&self, node: &HierarchizedEntry, all_entries: &[HeadingEntry]) -> Section {
        let entry = &node.entry;
        let heading_kind = entry.kind();
        let (name, text, slug) = match entry.data() {
            Some(data) => (data.name.as_str(), data.text.as_str(), data.slug.as_str()),
            None => ("", "", ""),
        };

        let kind = match heading_kind {
            HeadingKind::Module if !page_has_api(&entry.api, all_entries) => SectionKind::Text,
            other => SectionKind::from_heading(other),
        };
        let mut section = Section::new(kind);
        section.insert("@name", name);

        if kind == SectionKind::Text {
            section.insert("source", entry.api_doc_source.as_str());
            return section;
        }

        section.insert("text", text);
        if kind == SectionKind::Module {
            section.insert("@module", format!("{}:{}", self.prefix, entry.api));
            section.insert("@see", self.permalink(&entry.api, None));
            section.insert("source", entry.api_doc_source.as_str());
            for bucket in MODULE_BUCKETS {
                section.insert(*bucket, Value::Array(Vec::new()));
            }
        } else if kind != SectionKind::Misc {
            section.insert("@see", self.permalink(&entry.api, Some(slug)));
        }

        self.add_content(&mut section, heading_kind, text, name, entry);
        add_provenance(&mut section, entry);

        for child in &node.hierarchy_children {
            let built = self.build(child, all_entries);
            let bucket = bucket_for(child.entry.kind(), &child_text(child), kind);
            promote_misc_children(&built, &mut section);
            section.push_child(bucket, built);
        }
        section
    }

    /// `{base}/{api}.html`, with `#slug` for anything below the page heading.
    fn permalink(&self, api: &str, slug: Option<&str>) -> String {
        let base = self.base_url.trim_end_matches('/');
        match slug {
            Some(slug) if !slug.is_empty() => format!("{base}/{api}.html#{slug}"),
            _ => format!("{base}/{api}.html"),
        }
    }

    /// Split content into parameter docs and prose, then record signature and description.
    fn add_content(
        &self,
        section: &mut Section,
        kind: HeadingKind,
        text: &str,
        name: &str,
        entry: &HeadingEntry,
    ) {
        let nodes: Vec<&ProseNode> = entry
            .content_nodes()
            .iter()
            .filter(|node| !matches!(node, ProseNode::Html(_)) && stability_of(node).is_none())
            .collect();

        let threshold = if self.strict_lists {
            TypedListConfidence::Strong
        } else {
            TypedListConfidence::Loose
        };
        let (docs, mut prose) = match nodes.split_first() {
            Some((first, rest))
                if kind.is_api() && typed_list_confidence(first) >= threshold =>
            {
                (parse_list(first), rest.to_vec())
            }
            _ => (Vec::new(), nodes.clone()),
        };

        let mut consumed = false;
        let mut lead = None;
        match kind {
            HeadingKind::Property => {
                if let Some(doc) = docs.first() {
                    lead = add_property_doc(section, doc);
                    consumed = true;
                }
            }
            HeadingKind::Class | HeadingKind::Ctor | HeadingKind::Method | HeadingKind::Event => {
                if let Some(signature) = parse_signature(kind, text, &docs) {
                    let shown = display_name(kind, text, name);
                    section.insert("signature", signature.display(kind, &shown));
                    if !signature.params.is_empty() {
                        insert_json(section, "params", &signature.params);
                    }
                    if let Some(ret) = &signature.return_ {
                        insert_json(section, "return", ret);
                    }
                    if let Some(extends) = &signature.extends {
                        insert_json(section, "extends", extends);
                    }
                    if kind.is_callable() {
                        let overloads = signature.overloads();
                        if overloads.len() > 1 {
                            insert_json(section, "overloads", &overloads);
                        }
                    }
                    consumed = true;
                } else {
                    debug!(heading = text, "no recognizable signature");
                }
            }
            HeadingKind::Module | HeadingKind::Misc => {}
        }

        if !consumed && !docs.is_empty() {
            // Put the list back so its prose is not lost.
            if let Some(first) = nodes.first() {
                prose.insert(0, *first);
            }
        }
        let prose = stringify(
            &prose.into_iter().cloned().collect::<Vec<_>>(),
            LinkStyle::Markdown,
        );
        let description = lead
            .into_iter()
            .chain(Some(prose))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if !description.is_empty() {
            section.insert("description", description);
        }
    }
}

/// Whether any entry of the page is a formal API element.
fn page_has_api(api: &str, all_entries: &[HeadingEntry]) -> bool {
    all_entries
        .iter()
        .any(|entry| entry.api == api && entry.kind().is_api())
}

/// Bucket a child record is filed under.
fn bucket_for(kind: HeadingKind, text: &str, parent: SectionKind) -> &'static str {
    match kind {
        HeadingKind::Class => "classes",
        HeadingKind::Ctor => "ctors",
        HeadingKind::Method => "methods",
        HeadingKind::Event => "events",
        HeadingKind::Property if parent == SectionKind::Module && is_global_name(text) => "globals",
        HeadingKind::Property => "properties",
        HeadingKind::Misc => "miscs",
        HeadingKind::Module => "modules",
    }
}

/// Plain heading text of a child entry.
fn child_text(child: &HierarchizedEntry) -> String {
    child
        .entry
        .data()
        .map(|data| data.text.clone())
        .unwrap_or_default()
}

/// Record a property's type and default; returns the documented description.
fn add_property_doc(section: &mut Section, doc: &ParamDoc) -> Option<String> {
    if let Some(type_) = &doc.type_ {
        section.insert("dataType", type_.as_str());
    }
    if let Some(default) = &doc.default {
        section.insert("default", default.as_str());
    }
    doc.description.clone()
}

/// Stability, change history, tags and remaining metadata.
fn add_provenance(section: &mut Section, entry: &HeadingEntry) {
    if let Some(stability) = &entry.stability {
        insert_json(section, "stability", stability);
    }
    if !entry.changes.is_empty() {
        section.insert("changes", Value::Array(entry.changes.clone()));
    }
    if !entry.tags.is_empty() {
        insert_json(section, "tags", &entry.tags);
    }
    if !entry.metadata.is_empty() {
        section.insert("meta", Value::Object(entry.metadata.clone()));
    }
}

/// Serialize `value` into a field, logging values that cannot be represented.
fn insert_json<T: Serialize + ?Sized>(section: &mut Section, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(value) => {
            section.insert(key, value);
        }
        Err(err) => debug!(key, error = %err, "field has no JSON form"),
    }
}

//! Extraction pipeline and its configuration.

use std::{collections::BTreeMap, mem};

use serde::Serialize;
use tracing::debug;

use crate::{
    entry::{HeadingEntry, api_from_source, group_entries},
    error::Result,
    heading::Slugger,
    hierarchy::{HierarchizedEntry, build_hierarchy},
    highlight::highlight_json,
    keywords::builtin_types,
    node::ProseNode,
    parse::{ParsedDocument, parse_markdown},
    queries::{
        LinkDefinitions, add_stability_metadata, apply_yaml, link_type_references,
        resolve_link_references, set_heading_metadata, update_markdown_links,
    },
    section::{Section, SectionBuilder},
};

/// Default namespace for `@module` values.
pub const DEFAULT_PREFIX: &str = "node";

/// Default base for `@see` permalinks.
pub const DEFAULT_BASE_URL: &str = "https://nodejs.org/docs/latest/api";

/// Extractor turns one markdown reference page into structured API records.
///
/// Extraction runs in fixed stages: link references are resolved against the page's own
/// definitions, `.md` links are pointed at the published `.html` pages, `{Type}` mentions are
/// linked, the page is split into one entry per heading, each entry is annotated with heading
/// metadata, stability and YAML metadata, and finally the entries are nested and built into
/// section records.
///
/// The extractor holds configuration only and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    /// Namespace for `@module` values.
    prefix: String,

    /// Base URL for `@see` permalinks.
    base_url: String,

    /// Type name to documentation URL map used to link `{Type}` mentions.
    types: BTreeMap<String, String>,

    /// Whether only strongly typed lists count as parameter documentation.
    strict_lists: bool,

    /// Whether JSON output is syntax highlighted.
    highlight: bool,

    /// Whether JSON output is emitted on a single line.
    compact: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of extracting one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Page identifier derived from the source path.
    pub api: String,
    /// Annotated entry forest.
    pub entries: Vec<HierarchizedEntry>,
    /// One record per root of the forest.
    pub sections: Vec<Section>,
}

impl Extractor {
    /// Creates an extractor with the `node` prefix, the Node.js permalink base, the builtin
    /// JavaScript type map and loose list detection.
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            types: builtin_types(),
            strict_lists: false,
            highlight: false,
            compact: false,
        }
    }

    /// Sets the namespace used in `@module` values.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the base URL for `@see` permalinks.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the type map entirely.
    pub fn with_type_map(mut self, types: BTreeMap<String, String>) -> Self {
        self.types = types;
        self
    }

    /// Adds entries to the type map, overriding builtins of the same name.
    pub fn with_extra_types(mut self, types: impl IntoIterator<Item = (String, String)>) -> Self {
        self.types.extend(types);
        self
    }

    /// Only accept lists with a lead-in phrase or type link as parameter documentation.
    pub fn with_strict_lists(mut self, strict: bool) -> Self {
        self.strict_lists = strict;
        self
    }

    /// Enables or disables syntax highlighting of JSON output.
    pub fn with_highlighting(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Enables or disables single-line JSON output.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// The type map in effect.
    pub fn types(&self) -> &BTreeMap<String, String> {
        &self.types
    }

    /// Extracts a page from markdown source.
    ///
    /// `api_doc_source` is the page's path, used for the page identifier, `source` fields and
    /// permalinks.
    pub fn extract(&self, source: &str, api_doc_source: &str) -> Result<Document> {
        let ParsedDocument { root, definitions } = parse_markdown(source);
        self.extract_tree(root, &definitions, api_doc_source)
    }

    /// Extracts a page from an already parsed tree.
    pub fn extract_tree(
        &self,
        mut root: ProseNode,
        definitions: &LinkDefinitions,
        api_doc_source: &str,
    ) -> Result<Document> {
        let resolved = resolve_link_references(&mut root, definitions);
        let rewritten = update_markdown_links(&mut root);
        let typed = link_type_references(&mut root, &self.types);
        debug!(
            source = api_doc_source,
            definitions = definitions.len(),
            resolved,
            rewritten,
            typed,
            "rewrote links"
        );

        let mut entries = group_entries(root, api_doc_source)?;
        let mut slugger = Slugger::new();
        for entry in &mut entries {
            set_heading_metadata(&mut entry.heading, &mut slugger)?;
            annotate(entry)?;
        }
        debug!(source = api_doc_source, entries = entries.len(), "annotated entries");

        let all_entries = entries.clone();
        let forest = build_hierarchy(entries);
        let sections = SectionBuilder::new(&self.prefix, &self.base_url)
            .with_strict_lists(self.strict_lists)
            .build_document(&forest, &all_entries);

        Ok(Document {
            api: api_from_source(api_doc_source),
            entries: forest,
            sections,
        })
    }

    /// Extracts a page and returns its section records as JSON.
    pub fn to_json(&self, source: &str, api_doc_source: &str) -> Result<String> {
        let document = self.extract(source, api_doc_source)?;
        self.finish(&document.sections)
    }

    /// Extracts a page and returns its annotated entry forest as JSON.
    pub fn entries_json(&self, source: &str, api_doc_source: &str) -> Result<String> {
        let document = self.extract(source, api_doc_source)?;
        self.finish(&document.entries)
    }

    /// Serialize and optionally highlight.
    fn finish<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        if self.highlight {
            highlight_json(&json)
        } else {
            Ok(json)
        }
    }
}

/// Apply the stability and metadata annotations found in an entry's own content.
fn annotate(entry: &mut HeadingEntry) -> Result<()> {
    let content = mem::replace(&mut entry.content, ProseNode::root(Vec::new()));
    for node in content.children() {
        match node {
            ProseNode::Html(_) => {
                apply_yaml(node, entry)?;
            }
            ProseNode::Blockquote(_) => {
                add_stability_metadata(node, entry);
            }
            _ => {}
        }
    }
    entry.content = content;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let extractor = Extractor::default();
        assert_eq!(extractor.prefix, "node");
        assert_eq!(extractor.base_url, DEFAULT_BASE_URL);
        assert!(extractor.types().contains_key("Promise"));
        assert!(!extractor.strict_lists);
    }

    #[test]
    fn extra_types_override_builtins() {
        let extractor = Extractor::new().with_extra_types([
            ("Buffer".to_string(), "buffer.html#class-buffer".to_string()),
            ("string".to_string(), "#str".to_string()),
        ]);
        assert_eq!(extractor.types()["Buffer"], "buffer.html#class-buffer");
        assert_eq!(extractor.types()["string"], "#str");

        let replaced = Extractor::new().with_type_map(BTreeMap::new());
        assert!(replaced.types().is_empty());
    }

    #[test]
    fn annotations_keep_content_in_place() {
        let document = Extractor::new()
            .extract(
                "# Path\n\n> Stability: 2 - Stable\n\n<!-- YAML\nadded: v0.1.16\n-->\n\nText.\n",
                "doc/api/path.md",
            )
            .unwrap();
        let entry = &document.entries[0].entry;
        assert_eq!(entry.stability.as_ref().map(|s| s.index.as_str()), Some("2"));
        assert_eq!(entry.metadata["added"], "v0.1.16");
        assert_eq!(entry.content_nodes().len(), 3);
    }

    #[test]
    fn compact_output_is_one_line() {
        let json = Extractor::new()
            .with_compact(true)
            .to_json("# Path\n\nText.\n", "doc/api/path.md")
            .unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("[{"));
    }
}

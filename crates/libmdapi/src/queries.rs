//! Stand-alone predicates and mutators over prose trees.
//!
//! Each query touches only the node it is handed (and, for splicing queries, that node's child
//! vector). Document anomalies never fail a query; only handing a query the wrong kind of node
//! does.

use std::{
    collections::{BTreeMap, HashMap},
    mem,
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    entry::{HeadingEntry, Stability},
    error::{ApiDocError, Result},
    heading::{HeadingData, Slugger, classify},
    keywords::starts_typed_list,
    node::{Link, LinkStyle, ProseNode, stringify},
};

/// How confidently a list reads as a typed parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypedListConfidence {
    /// Not a typed list.
    None = 0,
    /// Opens with a bare inline-code identifier.
    Loose = 1,
    /// Opens with a lead-in phrase such as `Returns:` or with a `<Type>` link.
    Strong = 2,
}

/// Parameter name in inline code, optionally rest or member qualified.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\.\.\.)?[A-Za-z_$][\w$]*(?:\.[\w$]+|\[[\w$.'\x22]+\])*$").unwrap());
/// Text of a linked type, `<Type>`.
static TYPE_LINK_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[^<>]+>$").unwrap());
/// Stability index and its description.
static STABILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^Stability:\s*([0-5](?:\.[0-9])?)\s*(?:-\s*)?(.*)$").unwrap());
/// `<!-- YAML ... -->` metadata comment.
static YAML_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^<!--\s*YAML\b(.*?)-->\s*$").unwrap());
/// `<!-- key=value -->` metadata comment.
static KEY_VALUE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<!--\s*([\w-]+)\s*=\s*(.*?)\s*-->\s*$").unwrap());
/// Absolute URL scheme.
static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());
/// Relative link to a `.md` page.
static MARKDOWN_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^#?]+)\.md(#.*)?$").unwrap());
/// `{Type}` token in prose.
static TYPE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}()\s][^{}()]*?)\}").unwrap());

/// Rate how strongly `list` reads as a typed list.
///
/// Looks at the first node of the first item's first paragraph. Anything that is not a list is
/// `None`.
pub fn typed_list_confidence(list: &ProseNode) -> TypedListConfidence {
    let ProseNode::List(list) = list else {
        return TypedListConfidence::None;
    };
    let lead = list
        .children
        .first()
        .and_then(|item| item.children().first())
        .map(|block| match block {
            ProseNode::Paragraph(p) => p.children.first(),
            other => Some(other),
        });
    let Some(Some(lead)) = lead else {
        return TypedListConfidence::None;
    };

    if let ProseNode::Link(link) = lead {
        let text = stringify(&link.children, LinkStyle::TextOnly);
        if TYPE_LINK_TEXT.is_match(&text) {
            return TypedListConfidence::Strong;
        }
    }
    match lead.first_leaf() {
        Some(ProseNode::Text(text)) if starts_typed_list(&text.value) => TypedListConfidence::Strong,
        Some(ProseNode::InlineCode(code)) if IDENTIFIER.is_match(code.value.trim()) => {
            TypedListConfidence::Loose
        }
        _ => TypedListConfidence::None,
    }
}

/// A list that opens with a lead-in phrase or a type link.
pub fn is_strongly_typed_list(list: &ProseNode) -> bool {
    typed_list_confidence(list) == TypedListConfidence::Strong
}

/// A list with any typed-list signal at all.
pub fn is_loosely_typed_list(list: &ProseNode) -> bool {
    typed_list_confidence(list) >= TypedListConfidence::Loose
}

/// Read a `Stability: <index> - <description>` annotation from a blockquote.
///
/// Returns `None` for anything else, including blockquotes that carry ordinary prose.
pub fn stability_of(node: &ProseNode) -> Option<Stability> {
    let ProseNode::Blockquote(quote) = node else {
        return None;
    };
    let first = quote
        .children
        .iter()
        .find(|child| matches!(child, ProseNode::Paragraph(_)))?;
    let text = stringify(first.children(), LinkStyle::Markdown);
    let caps = STABILITY.captures(text.trim())?;
    Some(Stability {
        index: caps[1].to_string(),
        description: caps[2].trim().to_string(),
    })
}

/// Attach the stability annotation carried by `node` to `entry`.
///
/// The first annotation found for an entry wins. Returns whether anything was attached.
pub fn add_stability_metadata(node: &ProseNode, entry: &mut HeadingEntry) -> bool {
    if entry.stability.is_some() {
        return false;
    }
    match stability_of(node) {
        Some(stability) => {
            entry.stability = Some(stability);
            true
        }
        None => false,
    }
}

/// Apply a metadata comment to `entry`.
///
/// `<!-- YAML ... -->` blocks are parsed as YAML: `changes` and `tags` accumulate, every other
/// key lands in the entry's metadata. Single-line `<!-- key=value -->` comments set one metadata
/// property. Malformed YAML is logged and skipped. Returns whether the node was a metadata
/// comment.
pub fn apply_yaml(node: &ProseNode, entry: &mut HeadingEntry) -> Result<bool> {
    let ProseNode::Html(html) = node else {
        return Err(ApiDocError::UnexpectedNode {
            expected: "html",
            found: node.kind(),
        });
    };
    let value = html.value.trim();

    if let Some(caps) = YAML_BLOCK.captures(value) {
        let mapping = match serde_yaml::from_str::<serde_yaml::Value>(&caps[1]) {
            Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
            Ok(serde_yaml::Value::Null) => serde_yaml::Mapping::new(),
            Ok(_) => {
                warn!(source = %entry.api_doc_source, "YAML metadata is not a mapping");
                return Ok(false);
            }
            Err(err) => {
                warn!(source = %entry.api_doc_source, error = %err, "skipping malformed YAML metadata");
                return Ok(false);
            }
        };
        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                continue;
            };
            let value = match serde_json::to_value(&value) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "skipping YAML value that has no JSON form");
                    continue;
                }
            };
            apply_property(entry, key, value);
        }
        entry.yaml_position = html.position;
        return Ok(true);
    }

    if let Some(caps) = KEY_VALUE_COMMENT.captures(value) {
        entry
            .metadata
            .insert(caps[1].to_string(), Value::String(caps[2].to_string()));
        entry.yaml_position = html.position;
        return Ok(true);
    }
    Ok(false)
}

/// Route one metadata property onto the entry.
fn apply_property(entry: &mut HeadingEntry, key: &str, value: Value) {
    match (key, value) {
        ("changes", Value::Array(changes)) => entry.changes.extend(changes),
        ("changes", change @ Value::Object(_)) => entry.changes.push(change),
        ("tags", Value::Array(tags)) => entry.tags.extend(
            tags.into_iter()
                .filter_map(|tag| tag.as_str().map(ToOwned::to_owned)),
        ),
        ("tags", Value::String(tag)) => entry.tags.push(tag),
        (key, value) => {
            entry.metadata.insert(key.to_string(), value);
        }
    }
}

/// Compute `{depth, name, text, slug, type}` for a heading node.
pub fn heading_metadata(node: &ProseNode, slugger: &mut Slugger) -> Result<HeadingData> {
    let ProseNode::Heading(heading) = node else {
        return Err(ApiDocError::UnexpectedNode {
            expected: "heading",
            found: node.kind(),
        });
    };
    let text = stringify(&heading.children, LinkStyle::TextOnly);
    let (kind, name) = classify(&text, heading.depth);
    let slug = slugger.slug(&text);
    Ok(HeadingData {
        depth: heading.depth,
        name,
        text,
        slug,
        kind,
    })
}

/// Compute heading metadata and attach it to the node.
pub fn set_heading_metadata(node: &mut ProseNode, slugger: &mut Slugger) -> Result<()> {
    let data = heading_metadata(node, slugger)?;
    if let ProseNode::Heading(heading) = node {
        heading.data = Some(data);
    }
    Ok(())
}

/// Map a relative `.md` link target to its published `.html` page, keeping any fragment.
///
/// Returns `None` for targets that need no rewriting, including absolute URLs.
pub fn rewrite_markdown_link(url: &str) -> Option<String> {
    if SCHEME.is_match(url) {
        return None;
    }
    let caps = MARKDOWN_URL.captures(url)?;
    let fragment = caps.get(2).map_or("", |m| m.as_str());
    Some(format!("{}.html{fragment}", &caps[1]))
}

/// Rewrite every markdown link target in the tree. Returns the number of links changed.
pub fn update_markdown_links(node: &mut ProseNode) -> usize {
    let mut changed = 0;
    if let ProseNode::Link(link) = node
        && let Some(url) = rewrite_markdown_link(&link.url)
    {
        link.url = url;
        changed += 1;
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            changed += update_markdown_links(child);
        }
    }
    changed
}

/// A link definition (`[id]: url "title"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Target URL.
    pub url: String,
    /// Optional title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The link definitions of one document, keyed by normalized label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDefinitions {
    /// Definitions by normalized label.
    by_label: HashMap<String, Definition>,
}

impl LinkDefinitions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Earlier definitions of the same label win.
    pub fn insert(&mut self, label: &str, url: impl Into<String>, title: Option<String>) {
        self.by_label
            .entry(normalize_label(label))
            .or_insert_with(|| Definition {
                url: url.into(),
                title,
            });
    }

    /// Look up a label, ignoring case and whitespace differences.
    pub fn get(&self, label: &str) -> Option<&Definition> {
        self.by_label.get(&normalize_label(label))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    /// Whether there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Case-fold a label and collapse internal whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Replace the `linkReference` at `parent.children[index]` with a resolved `link`.
///
/// Returns `Ok(false)` and leaves the reference in place when no definition matches.
pub fn resolve_link_reference(
    parent: &mut ProseNode,
    index: usize,
    definitions: &LinkDefinitions,
) -> Result<bool> {
    let found = parent.kind();
    let children = parent.children_mut().ok_or(ApiDocError::UnexpectedNode {
        expected: "parent",
        found,
    })?;
    let len = children.len();
    let slot = children
        .get_mut(index)
        .ok_or(ApiDocError::ChildOutOfBounds { index, len })?;
    let ProseNode::LinkReference(reference) = slot else {
        return Err(ApiDocError::UnexpectedNode {
            expected: "linkReference",
            found: slot.kind(),
        });
    };
    let Some(definition) = definitions.get(&reference.identifier) else {
        debug!(identifier = %reference.identifier, "unresolved link reference");
        return Ok(false);
    };
    let link = Link {
        url: definition.url.clone(),
        title: definition.title.clone(),
        children: mem::take(&mut reference.children),
        position: reference.position,
    };
    *slot = ProseNode::Link(link);
    Ok(true)
}

/// Resolve every link reference in the tree. Returns the number resolved.
pub fn resolve_link_references(node: &mut ProseNode, definitions: &LinkDefinitions) -> usize {
    let mut resolved = 0;
    let len = node.children().len();
    for index in 0..len {
        let is_reference = matches!(node.children()[index], ProseNode::LinkReference(_));
        if is_reference {
            resolved += usize::from(matches!(
                resolve_link_reference(node, index, definitions),
                Ok(true)
            ));
        }
        if let Some(children) = node.children_mut() {
            resolved += resolve_link_references(&mut children[index], definitions);
        }
    }
    resolved
}

/// Turn `{Type}` tokens in text into links to the type's documentation.
///
/// Union tokens such as `{string|Buffer}` link each known member. A token with no known member
/// is left as written. Headings, code and existing links are not descended into. Returns the
/// number of links inserted.
pub fn link_type_references(node: &mut ProseNode, types: &BTreeMap<String, String>) -> usize {
    if matches!(
        node,
        ProseNode::Heading(_) | ProseNode::Link(_) | ProseNode::LinkReference(_)
    ) {
        return 0;
    }
    let Some(children) = node.children_mut() else {
        return 0;
    };
    let mut inserted = 0;
    let mut spliced = Vec::with_capacity(children.len());
    for mut child in children.drain(..) {
        match child {
            ProseNode::Text(text) => {
                let (nodes, count) = split_type_tokens(&text.value, types);
                inserted += count;
                if count == 0 {
                    spliced.push(ProseNode::Text(text));
                } else {
                    spliced.extend(nodes);
                }
            }
            _ => {
                inserted += link_type_references(&mut child, types);
                spliced.push(child);
            }
        }
    }
    *children = spliced;
    inserted
}

/// Split one text value around its type tokens.
fn split_type_tokens(value: &str, types: &BTreeMap<String, String>) -> (Vec<ProseNode>, usize) {
    let mut nodes = Vec::new();
    let mut count = 0;
    let mut pending = String::new();
    let mut last = 0;

    for caps in TYPE_TOKEN.captures_iter(value) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let members: Vec<&str> = caps[1].split('|').map(str::trim).collect();
        if !members.iter().any(|member| type_url(member, types).is_some()) {
            continue;
        }
        pending.push_str(&value[last..whole.start()]);
        last = whole.end();
        if !pending.is_empty() {
            nodes.push(ProseNode::text(mem::take(&mut pending)));
        }
        for (idx, member) in members.iter().enumerate() {
            if idx > 0 {
                nodes.push(ProseNode::text(" | "));
            }
            let label = format!("<{member}>");
            match type_url(member, types) {
                Some(url) => {
                    nodes.push(ProseNode::link(url, vec![ProseNode::text(label)]));
                    count += 1;
                }
                None => nodes.push(ProseNode::text(label)),
            }
        }
    }
    pending.push_str(&value[last..]);
    if !pending.is_empty() {
        nodes.push(ProseNode::text(pending));
    }
    (nodes, count)
}

/// Documentation URL for a type expression, looking through `[]` and generic suffixes.
fn type_url<'a>(member: &str, types: &'a BTreeMap<String, String>) -> Option<&'a str> {
    let base = member.trim_end_matches("[]");
    let base = base.split_once('<').map_or(base, |(head, _)| head);
    types.get(base).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        heading::HeadingKind,
        node::{Literal, Position},
    };

    fn list_with(children: Vec<ProseNode>) -> ProseNode {
        ProseNode::list(vec![ProseNode::list_item(vec![ProseNode::paragraph(
            children,
        )])])
    }

    fn entry() -> HeadingEntry {
        HeadingEntry::new(
            ProseNode::heading(2, vec![ProseNode::text("x")]),
            "doc/api/fs.md",
        )
    }

    #[test]
    fn typed_list_confidence_levels() {
        let returns = list_with(vec![ProseNode::text("Returns: {Promise}")]);
        assert_eq!(typed_list_confidence(&returns), TypedListConfidence::Strong);

        let linked = list_with(vec![
            ProseNode::link("#integer", vec![ProseNode::text("<integer>")]),
            ProseNode::text(" The size."),
        ]);
        assert_eq!(typed_list_confidence(&linked), TypedListConfidence::Strong);

        let param = list_with(vec![
            ProseNode::inline_code("path"),
            ProseNode::text(" {string}"),
        ]);
        assert_eq!(typed_list_confidence(&param), TypedListConfidence::Loose);
        assert!(is_loosely_typed_list(&param));
        assert!(!is_strongly_typed_list(&param));

        let prose = list_with(vec![ProseNode::text("Make sure to close the file.")]);
        assert_eq!(typed_list_confidence(&prose), TypedListConfidence::None);

        let code_expr = list_with(vec![ProseNode::inline_code("a + b")]);
        assert_eq!(typed_list_confidence(&code_expr), TypedListConfidence::None);

        assert_eq!(
            typed_list_confidence(&ProseNode::paragraph(vec![])),
            TypedListConfidence::None
        );
        assert_eq!(
            typed_list_confidence(&ProseNode::list(vec![])),
            TypedListConfidence::None
        );
    }

    #[test]
    fn stability_with_decimal_index() {
        let quote = ProseNode::blockquote(vec![ProseNode::paragraph(vec![ProseNode::text(
            "Stability: 1.0 - Frozen",
        )])]);
        assert_eq!(
            stability_of(&quote),
            Some(Stability {
                index: "1.0".into(),
                description: "Frozen".into()
            })
        );
    }

    #[test]
    fn stability_requires_the_prefix() {
        let quote = ProseNode::blockquote(vec![ProseNode::paragraph(vec![ProseNode::text(
            "Note: this is stable",
        )])]);
        assert_eq!(stability_of(&quote), None);
        assert_eq!(
            stability_of(&ProseNode::paragraph(vec![ProseNode::text(
                "Stability: 2 - Stable"
            )])),
            None
        );

        let mut entry = entry();
        assert!(!add_stability_metadata(&quote, &mut entry));
        assert_eq!(entry.stability, None);
    }

    #[test]
    fn first_stability_annotation_wins() {
        let mut entry = entry();
        let first = ProseNode::blockquote(vec![ProseNode::paragraph(vec![ProseNode::text(
            "Stability: 2 - Stable",
        )])]);
        let second = ProseNode::blockquote(vec![ProseNode::paragraph(vec![ProseNode::text(
            "Stability: 0 - Deprecated",
        )])]);
        assert!(add_stability_metadata(&first, &mut entry));
        assert!(!add_stability_metadata(&second, &mut entry));
        assert_eq!(entry.stability.unwrap().index, "2");
    }

    #[test]
    fn yaml_block_applies_properties() {
        let mut entry = entry();
        let node = ProseNode::Html(Literal {
            value: "<!-- YAML\nadded: v0.1.29\nchanges:\n  - version: v7.0.0\n    description: The callback is required.\ntags: [io]\n-->".into(),
            position: Some(Position::new(3, 9)),
        });
        assert!(apply_yaml(&node, &mut entry).unwrap());
        assert_eq!(entry.metadata["added"], Value::String("v0.1.29".into()));
        assert_eq!(entry.changes.len(), 1);
        assert_eq!(entry.changes[0]["version"], "v7.0.0");
        assert_eq!(entry.tags, vec!["io".to_string()]);
        assert_eq!(entry.yaml_position, Some(Position::new(3, 9)));
    }

    #[test]
    fn key_value_comment_applies_one_property() {
        let mut entry = entry();
        let node = ProseNode::html("<!-- source_link=lib/fs.js -->");
        assert!(apply_yaml(&node, &mut entry).unwrap());
        assert_eq!(entry.metadata["source_link"], "lib/fs.js");
    }

    #[test]
    fn malformed_yaml_is_skipped() {
        let mut entry = entry();
        let node = ProseNode::html("<!-- YAML\nadded: [unclosed\n-->");
        assert!(!apply_yaml(&node, &mut entry).unwrap());
        assert!(entry.metadata.is_empty());
        assert!(!apply_yaml(&ProseNode::html("<div></div>"), &mut entry).unwrap());
    }

    #[test]
    fn yaml_on_wrong_node_is_an_error() {
        let mut entry = entry();
        assert!(matches!(
            apply_yaml(&ProseNode::text("added: v1"), &mut entry),
            Err(ApiDocError::UnexpectedNode {
                expected: "html",
                ..
            })
        ));
    }

    #[test]
    fn heading_metadata_is_attached() {
        let mut slugger = Slugger::new();
        let mut node = ProseNode::heading(
            3,
            vec![ProseNode::inline_code("fs.readFile(path[, options], callback)")],
        );
        set_heading_metadata(&mut node, &mut slugger).unwrap();
        let ProseNode::Heading(heading) = &node else {
            panic!("expected heading");
        };
        let data = heading.data.as_ref().unwrap();
        assert_eq!(data.depth, 3);
        assert_eq!(data.name, "readFile");
        assert_eq!(data.text, "`fs.readFile(path[, options], callback)`");
        assert_eq!(data.slug, "fsreadfilepath-options-callback");
        assert_eq!(data.kind, HeadingKind::Method);

        assert!(heading_metadata(&ProseNode::text("x"), &mut slugger).is_err());
    }

    #[test]
    fn markdown_links_become_html() {
        assert_eq!(
            rewrite_markdown_link("foo.md#bar").as_deref(),
            Some("foo.html#bar")
        );
        assert_eq!(rewrite_markdown_link("fs.md").as_deref(), Some("fs.html"));
        assert_eq!(
            rewrite_markdown_link("../api/fs.md#fs_stat").as_deref(),
            Some("../api/fs.html#fs_stat")
        );
        assert_eq!(rewrite_markdown_link("https://example.com/a.md"), None);
        assert_eq!(rewrite_markdown_link("#local"), None);
        assert_eq!(rewrite_markdown_link("notes.txt"), None);

        let mut tree = ProseNode::paragraph(vec![
            ProseNode::link("foo.md#bar", vec![ProseNode::text("foo")]),
            ProseNode::link("https://nodejs.org", vec![]),
        ]);
        assert_eq!(update_markdown_links(&mut tree), 1);
        let ProseNode::Link(link) = &tree.children()[0] else {
            panic!("expected link");
        };
        assert_eq!(link.url, "foo.html#bar");
    }

    fn reference(identifier: &str) -> ProseNode {
        ProseNode::LinkReference(crate::node::LinkReference {
            identifier: identifier.into(),
            children: vec![ProseNode::text("the docs")],
            position: None,
        })
    }

    #[test]
    fn link_reference_is_replaced_in_place() {
        let mut definitions = LinkDefinitions::new();
        definitions.insert("Docs", "https://nodejs.org/api/", None);
        let mut paragraph = ProseNode::paragraph(vec![
            ProseNode::text("see "),
            reference("docs"),
            ProseNode::text("."),
        ]);
        assert!(resolve_link_reference(&mut paragraph, 1, &definitions).unwrap());
        assert_eq!(paragraph.children().len(), 3);
        assert_eq!(
            paragraph.children()[1],
            ProseNode::link("https://nodejs.org/api/", vec![ProseNode::text("the docs")])
        );
    }

    #[test]
    fn link_reference_contract() {
        let definitions = LinkDefinitions::new();
        let mut paragraph = ProseNode::paragraph(vec![ProseNode::text("x"), reference("nope")]);
        assert!(matches!(
            resolve_link_reference(&mut paragraph, 0, &definitions),
            Err(ApiDocError::UnexpectedNode {
                expected: "linkReference",
                found: "text"
            })
        ));
        assert!(matches!(
            resolve_link_reference(&mut paragraph, 5, &definitions),
            Err(ApiDocError::ChildOutOfBounds { index: 5, len: 2 })
        ));
        assert!(!resolve_link_reference(&mut paragraph, 1, &definitions).unwrap());
        assert!(matches!(paragraph.children()[1], ProseNode::LinkReference(_)));
    }

    #[test]
    fn definition_labels_are_normalized() {
        let mut definitions = LinkDefinitions::new();
        assert!(definitions.is_empty());
        definitions.insert("File  System", "fs.html", Some("fs".into()));
        definitions.insert("file system", "other.html", None);
        assert_eq!(definitions.len(), 1);
        assert!(!definitions.is_empty());
        let definition = definitions.get("FILE\nsystem").unwrap();
        assert_eq!(definition.url, "fs.html");
        assert_eq!(definition.title.as_deref(), Some("fs"));
    }

    #[test]
    fn nested_references_resolve() {
        let mut definitions = LinkDefinitions::new();
        definitions.insert("a", "a.html", None);
        let mut root = ProseNode::root(vec![ProseNode::list(vec![ProseNode::list_item(vec![
            ProseNode::paragraph(vec![reference("A"), reference("missing")]),
        ])])]);
        assert_eq!(resolve_link_references(&mut root, &definitions), 1);
    }

    #[test]
    fn type_tokens_split_text() {
        let mut types = BTreeMap::new();
        types.insert("string".to_string(), "#string".to_string());
        types.insert("Buffer".to_string(), "buffer.html#class-buffer".to_string());
        let mut paragraph =
            ProseNode::paragraph(vec![ProseNode::text("data {string|Buffer} or {Mystery} x")]);
        assert_eq!(link_type_references(&mut paragraph, &types), 2);
        assert_eq!(
            paragraph.children(),
            &[
                ProseNode::text("data "),
                ProseNode::link("#string", vec![ProseNode::text("<string>")]),
                ProseNode::text(" | "),
                ProseNode::link("buffer.html#class-buffer", vec![ProseNode::text("<Buffer>")]),
                ProseNode::text(" or {Mystery} x"),
            ]
        );
    }

    #[test]
    fn unknown_type_tokens_stay_text() {
        let types = BTreeMap::new();
        let mut paragraph = ProseNode::paragraph(vec![ProseNode::text("a {Thing} b")]);
        assert_eq!(link_type_references(&mut paragraph, &types), 0);
        assert_eq!(paragraph.children(), &[ProseNode::text("a {Thing} b")]);
    }

    #[test]
    fn array_types_link_to_element_type() {
        let mut types = BTreeMap::new();
        types.insert("string".to_string(), "#string".to_string());
        let mut paragraph = ProseNode::paragraph(vec![ProseNode::text("{string[]}")]);
        assert_eq!(link_type_references(&mut paragraph, &types), 1);
        assert_eq!(
            paragraph.children(),
            &[ProseNode::link("#string", vec![ProseNode::text("<string[]>")])]
        );
    }
}

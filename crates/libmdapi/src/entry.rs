//! Per-heading outline units and the splitter that produces them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{ApiDocError, Result},
    heading::{HeadingData, HeadingKind},
    node::{Parent, Position, ProseNode},
};

/// A stability annotation such as `Stability: 1 - Experimental`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stability {
    /// Stability index as written, e.g. `1` or `1.1`.
    pub index: String,
    /// Free-text rationale following the index.
    pub description: String,
}

/// One heading and the content that follows it up to the next heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// The heading node. Always a [`ProseNode::Heading`].
    pub heading: ProseNode,
    /// Root node holding the non-heading siblings that follow the heading.
    pub content: ProseNode,
    /// Stability annotation found in the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<Stability>,
    /// Logical page identifier, e.g. `fs`.
    pub api: String,
    /// Path of the markdown source.
    pub api_doc_source: String,
    /// Change history records from YAML metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<Value>,
    /// Free-form tags from YAML metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Position of the last metadata block applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaml_position: Option<Position>,
    /// Remaining metadata properties (`added`, `deprecated`, `source_link`, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl HeadingEntry {
    /// Create an entry for `heading` with empty content.
    pub fn new(heading: ProseNode, api_doc_source: &str) -> Self {
        Self {
            heading,
            content: ProseNode::root(Vec::new()),
            stability: None,
            api: api_from_source(api_doc_source),
            api_doc_source: api_doc_source.to_string(),
            changes: Vec::new(),
            tags: Vec::new(),
            yaml_position: None,
            metadata: Map::new(),
        }
    }

    /// Heading level, 0 when the heading slot holds something else.
    pub fn depth(&self) -> u8 {
        match &self.heading {
            ProseNode::Heading(h) => h.depth,
            _ => 0,
        }
    }

    /// Metadata attached to the heading, if computed.
    pub fn data(&self) -> Option<&HeadingData> {
        match &self.heading {
            ProseNode::Heading(h) => h.data.as_ref(),
            _ => None,
        }
    }

    /// Classified kind; `Misc` until heading metadata is attached.
    pub fn kind(&self) -> HeadingKind {
        self.data().map_or(HeadingKind::Misc, |data| data.kind)
    }

    /// Content nodes following the heading.
    pub fn content_nodes(&self) -> &[ProseNode] {
        self.content.children()
    }
}

/// Derive the page identifier from a source path: `doc/api/fs.md` becomes `fs`.
pub fn api_from_source(api_doc_source: &str) -> String {
    Path::new(api_doc_source)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Split a document root into one entry per heading.
///
/// Content before the first heading has no owner and is dropped.
pub fn group_entries(root: ProseNode, api_doc_source: &str) -> Result<Vec<HeadingEntry>> {
    let children = match root {
        ProseNode::Root(Parent { children, .. }) => children,
        other => {
            return Err(ApiDocError::UnexpectedNode {
                expected: "root",
                found: other.kind(),
            });
        }
    };

    let mut entries: Vec<HeadingEntry> = Vec::new();
    let mut preamble = 0usize;
    for node in children {
        if node.is_heading() {
            entries.push(HeadingEntry::new(node, api_doc_source));
            continue;
        }
        match entries.last_mut().and_then(|entry| entry.content.children_mut()) {
            Some(content) => content.push(node),
            None => preamble += 1,
        }
    }
    if preamble > 0 {
        debug!(
            source = api_doc_source,
            nodes = preamble,
            "dropping content before the first heading"
        );
    }
    Ok(entries)
}

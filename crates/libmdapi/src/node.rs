//! The prose tree: a closed set of markdown node kinds with exclusive child ownership.

use serde::{Deserialize, Serialize};

use crate::heading::HeadingData;

/// Source span of a node, in 1-based lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// First line covered by the node.
    pub start_line: usize,
    /// Last line covered by the node.
    pub end_line: usize,
}

impl Position {
    /// Create a span covering `start_line..=end_line`.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

/// A node that only owns children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    /// Ordered child nodes.
    pub children: Vec<ProseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A leaf carrying a text payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    /// Text payload.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Nesting level, 1 being the outermost.
    pub depth: u8,
    /// Inline content of the heading.
    pub children: Vec<ProseNode>,
    /// Metadata attached by [`crate::queries::set_heading_metadata`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HeadingData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// An ordered or bulleted list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Whether the list is numbered.
    pub ordered: bool,
    /// `listItem` children.
    pub children: Vec<ProseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A fenced or indented code block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Code {
    /// Info-string language, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Code text.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A resolved inline link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Link target.
    pub url: String,
    /// Optional title attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Link text.
    pub children: Vec<ProseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A reference-style link (`[text][id]`) awaiting resolution against the document's definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkReference {
    /// Definition identifier, as written.
    pub identifier: String,
    /// Link text.
    pub children: Vec<ProseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Source span.
    pub position: Option<Position>,
}

/// A node in a parsed markdown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProseNode {
    /// Document root.
    Root(Parent),
    /// Section heading.
    Heading(Heading),
    /// Paragraph.
    Paragraph(Parent),
    /// List.
    List(List),
    /// List item.
    ListItem(Parent),
    /// Plain text.
    Text(Literal),
    /// Inline code span.
    InlineCode(Literal),
    /// Code block.
    Code(Code),
    /// Inline link.
    Link(Link),
    /// Reference-style link.
    LinkReference(LinkReference),
    /// Blockquote.
    Blockquote(Parent),
    /// Raw HTML, including comments.
    Html(Literal),
    /// Emphasis.
    Emphasis(Parent),
    /// Strong emphasis.
    Strong(Parent),
    /// Hard line break.
    Break(Parent),
    /// Horizontal rule.
    ThematicBreak(Parent),
}

impl ProseNode {
    /// Create a root node holding `children`.
    pub fn root(children: Vec<Self>) -> Self {
        Self::Root(Parent {
            children,
            position: None,
        })
    }

    /// Create a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Literal {
            value: value.into(),
            position: None,
        })
    }

    /// Create an inline code leaf.
    pub fn inline_code(value: impl Into<String>) -> Self {
        Self::InlineCode(Literal {
            value: value.into(),
            position: None,
        })
    }

    /// Create a paragraph.
    pub fn paragraph(children: Vec<Self>) -> Self {
        Self::Paragraph(Parent {
            children,
            position: None,
        })
    }

    /// Create a heading without metadata.
    pub fn heading(depth: u8, children: Vec<Self>) -> Self {
        Self::Heading(Heading {
            depth,
            children,
            data: None,
            position: None,
        })
    }

    /// Create an unordered list.
    pub fn list(children: Vec<Self>) -> Self {
        Self::List(List {
            ordered: false,
            children,
            position: None,
        })
    }

    /// Create a list item.
    pub fn list_item(children: Vec<Self>) -> Self {
        Self::ListItem(Parent {
            children,
            position: None,
        })
    }

    /// Create a blockquote.
    pub fn blockquote(children: Vec<Self>) -> Self {
        Self::Blockquote(Parent {
            children,
            position: None,
        })
    }

    /// Create an inline link.
    pub fn link(url: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Link(Link {
            url: url.into(),
            title: None,
            children,
            position: None,
        })
    }

    /// Create a raw HTML node.
    pub fn html(value: impl Into<String>) -> Self {
        Self::Html(Literal {
            value: value.into(),
            position: None,
        })
    }

    /// The node kind tag, as it appears in serialized output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Root(_) => "root",
            Self::Heading(_) => "heading",
            Self::Paragraph(_) => "paragraph",
            Self::List(_) => "list",
            Self::ListItem(_) => "listItem",
            Self::Text(_) => "text",
            Self::InlineCode(_) => "inlineCode",
            Self::Code(_) => "code",
            Self::Link(_) => "link",
            Self::LinkReference(_) => "linkReference",
            Self::Blockquote(_) => "blockquote",
            Self::Html(_) => "html",
            Self::Emphasis(_) => "emphasis",
            Self::Strong(_) => "strong",
            Self::Break(_) => "break",
            Self::ThematicBreak(_) => "thematicBreak",
        }
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Root(p)
            | Self::Paragraph(p)
            | Self::ListItem(p)
            | Self::Blockquote(p)
            | Self::Emphasis(p)
            | Self::Strong(p)
            | Self::Break(p)
            | Self::ThematicBreak(p) => &p.children,
            Self::Heading(h) => &h.children,
            Self::List(l) => &l.children,
            Self::Link(l) => &l.children,
            Self::LinkReference(l) => &l.children,
            Self::Text(_) | Self::InlineCode(_) | Self::Code(_) | Self::Html(_) => &[],
        }
    }

    /// Mutable child vector, or `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Root(p)
            | Self::Paragraph(p)
            | Self::ListItem(p)
            | Self::Blockquote(p)
            | Self::Emphasis(p)
            | Self::Strong(p)
            | Self::Break(p)
            | Self::ThematicBreak(p) => Some(&mut p.children),
            Self::Heading(h) => Some(&mut h.children),
            Self::List(l) => Some(&mut l.children),
            Self::Link(l) => Some(&mut l.children),
            Self::LinkReference(l) => Some(&mut l.children),
            Self::Text(_) | Self::InlineCode(_) | Self::Code(_) | Self::Html(_) => None,
        }
    }

    /// Source span of the node.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Root(p)
            | Self::Paragraph(p)
            | Self::ListItem(p)
            | Self::Blockquote(p)
            | Self::Emphasis(p)
            | Self::Strong(p)
            | Self::Break(p)
            | Self::ThematicBreak(p) => p.position,
            Self::Heading(h) => h.position,
            Self::List(l) => l.position,
            Self::Link(l) => l.position,
            Self::LinkReference(l) => l.position,
            Self::Text(l) | Self::InlineCode(l) | Self::Html(l) => l.position,
            Self::Code(c) => c.position,
        }
    }

    /// Text payload of a leaf.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text(l) | Self::InlineCode(l) | Self::Html(l) => Some(&l.value),
            Self::Code(c) => Some(&c.value),
            _ => None,
        }
    }

    /// Whether this is a heading node.
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// First leaf reached by always descending into the first child.
    pub fn first_leaf(&self) -> Option<&Self> {
        match self.children().first() {
            Some(child) => child.first_leaf(),
            None if self.value().is_some() => Some(self),
            None => None,
        }
    }
}

/// How links are written when flattening nodes to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Keep only the link text.
    TextOnly,
    /// Emit `[text](url)`.
    Markdown,
}

/// Flatten inline nodes into a markdown-flavoured string.
///
/// Inline code keeps its backticks, since the heading classifier relies on them. Block
/// children are separated by blank lines.
pub fn stringify(nodes: &[ProseNode], links: LinkStyle) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, links);
    }
    out.trim().to_string()
}

/// Append one node to `out`.
fn write_node(out: &mut String, node: &ProseNode, links: LinkStyle) {
    match node {
        ProseNode::Text(l) => out.push_str(&l.value),
        ProseNode::InlineCode(l) => {
            out.push('`');
            out.push_str(&l.value);
            out.push('`');
        }
        ProseNode::Html(_) => {}
        ProseNode::Break(_) => out.push('\n'),
        ProseNode::Emphasis(p) => wrap(out, &p.children, "_", links),
        ProseNode::Strong(p) => wrap(out, &p.children, "**", links),
        ProseNode::Link(link) => {
            let text = stringify(&link.children, links);
            match links {
                LinkStyle::TextOnly => out.push_str(&text),
                LinkStyle::Markdown => {
                    out.push('[');
                    out.push_str(&text);
                    out.push_str("](");
                    out.push_str(&link.url);
                    out.push(')');
                }
            }
        }
        ProseNode::LinkReference(link) => {
            let text = stringify(&link.children, links);
            match links {
                LinkStyle::TextOnly => out.push_str(&text),
                LinkStyle::Markdown => {
                    out.push('[');
                    out.push_str(&text);
                    out.push_str("][");
                    out.push_str(&link.identifier);
                    out.push(']');
                }
            }
        }
        ProseNode::Code(code) => {
            block_gap(out);
            out.push_str("```");
            out.push_str(code.lang.as_deref().unwrap_or_default());
            out.push('\n');
            out.push_str(&code.value);
            if !code.value.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```");
        }
        ProseNode::List(list) => {
            block_gap(out);
            for (idx, item) in list.children.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                }
                out.push_str("* ");
                out.push_str(&stringify(item.children(), links));
            }
        }
        ProseNode::Blockquote(p) => {
            block_gap(out);
            out.push_str("> ");
            out.push_str(&stringify(&p.children, links));
        }
        ProseNode::ThematicBreak(_) => {
            block_gap(out);
            out.push_str("---");
        }
        ProseNode::Paragraph(p) | ProseNode::ListItem(p) | ProseNode::Root(p) => {
            block_gap(out);
            for child in &p.children {
                write_node(out, child, links);
            }
        }
        ProseNode::Heading(h) => {
            block_gap(out);
            for child in &h.children {
                write_node(out, child, links);
            }
        }
    }
}

/// Surround inline children with a delimiter.
fn wrap(out: &mut String, children: &[ProseNode], delim: &str, links: LinkStyle) {
    out.push_str(delim);
    for child in children {
        write_node(out, child, links);
    }
    out.push_str(delim);
}

/// Separate a block from preceding output with a blank line.
fn block_gap(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
    }
}

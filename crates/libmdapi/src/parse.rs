//! Markdown adapter: turns source text into a [`ProseNode`] tree.
//!
//! Reference-style links are kept as `linkReference` nodes so that resolution happens against
//! the document's own definitions, which are returned alongside the tree.

use std::{iter, mem, ops::Range};

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::{
    node::{
        Code, Heading, Link, LinkReference, LinkStyle, List, Literal, Parent, Position, ProseNode,
        stringify,
    },
    queries::LinkDefinitions,
};

/// A parsed document: the prose tree and its link definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// `root` node of the document.
    pub root: ProseNode,
    /// Link definitions declared anywhere in the document.
    pub definitions: LinkDefinitions,
}

/// Parse CommonMark source.
pub fn parse_markdown(source: &str) -> ParsedDocument {
    let parser = Parser::new_ext(source, Options::empty());

    let mut definitions = LinkDefinitions::new();
    for (label, def) in parser.reference_definitions().iter() {
        definitions.insert(
            label,
            def.dest.to_string(),
            def.title.as_ref().map(|title| title.to_string()),
        );
    }

    let lines = LineIndex::new(source);
    let mut stack = vec![Frame::new(FrameKind::Root, 0..source.len())];

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => stack.push(Frame::new(frame_kind(tag), range)),
            Event::End(_) => {
                let Some(frame) = stack.pop() else { continue };
                let Some(parent) = stack.last_mut() else { continue };
                frame.close(&lines, &mut parent.children);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    push_text(&mut frame.children, &text);
                }
            }
            Event::SoftBreak => {
                if let Some(frame) = stack.last_mut() {
                    push_text(&mut frame.children, "\n");
                }
            }
            Event::Code(code) => push_leaf(
                &mut stack,
                ProseNode::InlineCode(literal(&code, &lines, range)),
            ),
            Event::Html(html) | Event::InlineHtml(html) => {
                let Some(frame) = stack.last_mut() else { continue };
                // Block HTML arrives one line at a time.
                if matches!(frame.kind, FrameKind::Html) {
                    push_text(&mut frame.children, &html);
                } else {
                    frame
                        .children
                        .push(ProseNode::Html(literal(&html, &lines, range)));
                }
            }
            Event::HardBreak => push_leaf(
                &mut stack,
                ProseNode::Break(Parent {
                    children: Vec::new(),
                    position: Some(lines.position(&range)),
                }),
            ),
            Event::Rule => push_leaf(
                &mut stack,
                ProseNode::ThematicBreak(Parent {
                    children: Vec::new(),
                    position: Some(lines.position(&range)),
                }),
            ),
            _ => {}
        }
    }

    let root = match stack.into_iter().next() {
        Some(frame) => ProseNode::Root(Parent {
            children: frame.children,
            position: Some(lines.position(&frame.range)),
        }),
        None => ProseNode::root(Vec::new()),
    };
    ParsedDocument { root, definitions }
}

/// What an open tag will become once closed.
#[derive(Debug)]
enum FrameKind {
    /// The document itself.
    Root,
    /// Paragraph.
    Paragraph,
    /// Heading of the given depth.
    Heading(u8),
    /// Block quote.
    Blockquote,
    /// Code block with an optional info-string language.
    Code(Option<String>),
    /// Raw HTML block.
    Html,
    /// List; `true` when ordered.
    List(bool),
    /// List item.
    Item,
    /// Emphasis.
    Emphasis,
    /// Strong emphasis.
    Strong,
    /// Inline or autolink with a literal destination.
    Link {
        /// Destination.
        url: String,
        /// Optional title.
        title: Option<String>,
    },
    /// Reference-style link, holding the definition label.
    Reference(String),
    /// Tags with no prose counterpart; their children are spliced into the parent.
    Transparent,
}

/// An open tag and the children collected so far.
#[derive(Debug)]
struct Frame {
    /// Node to build on close.
    kind: FrameKind,
    /// Children closed so far.
    children: Vec<ProseNode>,
    /// Source span of the tag.
    range: Range<usize>,
}

impl Frame {
    /// Open a frame with no children.
    fn new(kind: FrameKind, range: Range<usize>) -> Self {
        Self {
            kind,
            children: Vec::new(),
            range,
        }
    }

    /// Build the finished node and append it to `siblings`.
    fn close(self, lines: &LineIndex, siblings: &mut Vec<ProseNode>) {
        let position = Some(lines.position(&self.range));
        let children = self.children;
        let parent = |children| Parent { children, position };
        let node = match self.kind {
            FrameKind::Transparent => {
                siblings.extend(children);
                return;
            }
            FrameKind::Root => ProseNode::Root(parent(children)),
            FrameKind::Paragraph => ProseNode::Paragraph(parent(children)),
            FrameKind::Heading(depth) => ProseNode::Heading(Heading {
                depth,
                children,
                data: None,
                position,
            }),
            FrameKind::Blockquote => ProseNode::Blockquote(parent(children)),
            FrameKind::Code(lang) => ProseNode::Code(Code {
                lang,
                value: concat_values(&children).trim_end_matches('\n').to_string(),
                position,
            }),
            FrameKind::Html => ProseNode::Html(Literal {
                value: concat_values(&children).trim_end().to_string(),
                position,
            }),
            FrameKind::List(ordered) => ProseNode::List(List {
                ordered,
                children,
                position,
            }),
            FrameKind::Item => ProseNode::ListItem(parent(wrap_inline_runs(children))),
            FrameKind::Emphasis => ProseNode::Emphasis(parent(children)),
            FrameKind::Strong => ProseNode::Strong(parent(children)),
            FrameKind::Link { url, title } => ProseNode::Link(Link {
                url,
                title,
                children,
                position,
            }),
            FrameKind::Reference(identifier) => {
                let identifier = if identifier.is_empty() {
                    stringify(&children, LinkStyle::TextOnly)
                } else {
                    identifier
                };
                ProseNode::LinkReference(LinkReference {
                    identifier,
                    children,
                    position,
                })
            }
        };
        siblings.push(node);
    }
}

/// Map a start tag to the frame it opens.
fn frame_kind(tag: Tag<'_>) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Heading(level as u8),
        Tag::BlockQuote(_) => FrameKind::Blockquote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
            let lang = info.split_whitespace().next().map(ToOwned::to_owned);
            FrameKind::Code(lang)
        }
        Tag::CodeBlock(CodeBlockKind::Indented) => FrameKind::Code(None),
        Tag::HtmlBlock => FrameKind::Html,
        Tag::List(start) => FrameKind::List(start.is_some()),
        Tag::Item => FrameKind::Item,
        Tag::Emphasis => FrameKind::Emphasis,
        Tag::Strong => FrameKind::Strong,
        Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        } => match link_type {
            LinkType::Reference | LinkType::Collapsed | LinkType::Shortcut => {
                FrameKind::Reference(id.to_string())
            }
            _ => FrameKind::Link {
                url: dest_url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
            },
        },
        _ => FrameKind::Transparent,
    }
}

/// Append text, merging with a preceding text node.
fn push_text(children: &mut Vec<ProseNode>, text: &str) {
    if let Some(ProseNode::Text(last)) = children.last_mut() {
        last.value.push_str(text);
    } else {
        children.push(ProseNode::text(text));
    }
}

/// Append a leaf to the innermost open frame.
fn push_leaf(stack: &mut [Frame], node: ProseNode) {
    if let Some(frame) = stack.last_mut() {
        frame.children.push(node);
    }
}

/// Literal node with its source position.
fn literal(value: &str, lines: &LineIndex, range: Range<usize>) -> Literal {
    Literal {
        value: value.to_string(),
        position: Some(lines.position(&range)),
    }
}

/// Concatenated values of literal children.
fn concat_values(children: &[ProseNode]) -> String {
    children.iter().filter_map(ProseNode::value).collect()
}

/// Tight list items hold inline content directly; give each run of it a paragraph so that
/// items always contain blocks.
fn wrap_inline_runs(children: Vec<ProseNode>) -> Vec<ProseNode> {
    let mut blocks = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    for child in children {
        if is_inline(&child) {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            blocks.push(ProseNode::paragraph(mem::take(&mut run)));
        }
        blocks.push(child);
    }
    if !run.is_empty() {
        blocks.push(ProseNode::paragraph(run));
    }
    blocks
}

/// Phrasing content, as opposed to blocks.
fn is_inline(node: &ProseNode) -> bool {
    matches!(
        node,
        ProseNode::Text(_)
            | ProseNode::InlineCode(_)
            | ProseNode::Link(_)
            | ProseNode::LinkReference(_)
            | ProseNode::Emphasis(_)
            | ProseNode::Strong(_)
            | ProseNode::Break(_)
    )
}

/// Byte offset to line number lookup.
struct LineIndex {
    /// Byte offset of each line start.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `source`.
    fn new(source: &str) -> Self {
        let starts = iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line holding `offset`.
    fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).max(1)
    }

    /// Line span covered by a byte range.
    fn position(&self, range: &Range<usize>) -> Position {
        let end = range.end.saturating_sub(1).max(range.start);
        Position::new(self.line(range.start), self.line(end))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(nodes: &[ProseNode]) -> Vec<&'static str> {
        nodes.iter().map(ProseNode::kind).collect()
    }

    #[test]
    fn block_structure() {
        let doc = parse_markdown(
            "# File system\n\nIntro text.\n\n## `fs.stat(path)`\n\n* `path` {string}\n\n> Stability: 2 - Stable\n",
        );
        assert_eq!(
            kinds(doc.root.children()),
            vec!["heading", "paragraph", "heading", "list", "blockquote"]
        );
        let ProseNode::Heading(heading) = &doc.root.children()[2] else {
            panic!("expected heading");
        };
        assert_eq!(heading.depth, 2);
        assert_eq!(heading.children, vec![ProseNode::InlineCode(Literal {
            value: "fs.stat(path)".into(),
            position: heading.children[0].position(),
        })]);
        assert_eq!(heading.position.map(|p| p.start_line), Some(5));
    }

    #[test]
    fn tight_items_hold_paragraphs() {
        let doc = parse_markdown("* `path` {string}\n* `mode` {integer}\n");
        let list = &doc.root.children()[0];
        let item = &list.children()[0];
        assert_eq!(kinds(item.children()), vec!["paragraph"]);
        assert_eq!(
            kinds(item.children()[0].children()),
            vec!["inlineCode", "text"]
        );
        assert_eq!(item.children()[0].children()[1].value(), Some(" {string}"));
    }

    #[test]
    fn yaml_comment_is_one_html_node() {
        let doc = parse_markdown("## `fs.stat()`\n<!-- YAML\nadded: v0.0.2\n-->\n\nText.\n");
        let html = &doc.root.children()[1];
        assert_eq!(html.kind(), "html");
        assert_eq!(html.value(), Some("<!-- YAML\nadded: v0.0.2\n-->"));
    }

    #[test]
    fn reference_links_stay_unresolved() {
        let doc = parse_markdown(
            "See [the docs][Docs] and [inline](fs.md).\n\n[Docs]: https://nodejs.org/ \"Node\"\n",
        );
        let paragraph = &doc.root.children()[0];
        assert_eq!(
            kinds(paragraph.children()),
            vec!["text", "linkReference", "text", "link", "text"]
        );
        let ProseNode::LinkReference(reference) = &paragraph.children()[1] else {
            panic!("expected reference");
        };
        assert_eq!(reference.identifier, "Docs");
        let def = doc.definitions.get("docs").unwrap();
        assert_eq!(def.url, "https://nodejs.org/");
        assert_eq!(def.title.as_deref(), Some("Node"));
    }

    #[test]
    fn code_blocks_keep_language() {
        let doc = parse_markdown("```js\nconst fs = require('fs');\n```\n");
        assert_eq!(
            doc.root.children()[0],
            ProseNode::Code(Code {
                lang: Some("js".into()),
                value: "const fs = require('fs');".into(),
                position: Some(Position::new(1, 3)),
            })
        );
    }

    #[test]
    fn soft_breaks_join_text() {
        let doc = parse_markdown("one\ntwo\n");
        assert_eq!(doc.root.children()[0].children(), &[ProseNode::Text(Literal {
            value: "one\ntwo".into(),
            position: doc.root.children()[0].children()[0].position(),
        })]);
    }
}

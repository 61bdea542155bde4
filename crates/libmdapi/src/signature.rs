//! Call signatures recovered from heading text and parameter lists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    heading::{HeadingKind, callee, class_parts},
    node::{LinkStyle, ProseNode, stringify},
    params::ParameterTree,
};

/// A type mentioned by a signature, such as a return value or superclass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type expression, e.g. `string|Buffer`. Absent when only prose was documented.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Accompanying prose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TypeRef {
    /// Create a bare type reference.
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: Some(type_.into()),
            description: None,
        }
    }
}

/// One documented list entry describing a parameter, option, return value or superclass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    /// Raw text of the entry, whitespace collapsed.
    #[serde(rename = "textRaw")]
    pub text_raw: String,
    /// Parameter name, or `return`/`extends` for lead-in entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Documented type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Documented default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether the prose marks the entry optional.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Remaining description text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested entries, e.g. the fields of an `options` object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Self>,
}

/// A declared parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Whether callers may omit the parameter.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Default value, without the `=`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Documented type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Documented description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documented nested options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParamDoc>,
}

impl Param {
    /// Create a mandatory parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the parameter renders with a `?` marker.
    ///
    /// Optional parameters and parameters with a default are displayed the same way: either
    /// makes the parameter positionally skippable.
    pub fn is_skippable(&self) -> bool {
        self.optional || self.default.is_some()
    }
}

/// Declared parameter structure, kept to enumerate overloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Start of an optional group.
    Open,
    /// End of an optional group.
    Close,
    /// Index into `Signature::params`.
    Param(usize),
}

/// The parsed shape of a callable or class heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Declared parameters in order.
    pub params: Vec<Param>,
    /// Return value.
    #[serde(default, rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_: Option<TypeRef>,
    /// Superclass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<TypeRef>,
    /// Group structure of `params`.
    #[serde(skip)]
    tokens: Vec<Token>,
}

/// Parenthesized parameter list with an optional trailing return type.
static PARAM_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*)\)\s*(?::\s*([^`]+?))?`?;?$").unwrap());
/// `Returns:` lead-in.
static RETURN_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^returns?\b\s*:?\s*").unwrap());
/// `Extends:` lead-in.
static EXTENDS_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^extends\b\s*:?\s*").unwrap());
/// `Type:` lead-in.
static TYPE_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^type\s*:\s*").unwrap());
/// Parameter name at the start of a list item.
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^['`"]?([^'`": {<]+)['`"]?\s*:?\s*"#).unwrap());
/// Leading `{Type}`.
static BRACED_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{([^}]+)\}\s*").unwrap());
/// Leading `<Type>` links, possibly a union.
static LINKED_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(<[^>]+>(?:\s*\|\s*<[^>]+>)*)\s*").unwrap());
/// Separator between type and description.
static LEADING_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s*").unwrap());
/// Trailing `**Default:**` clause.
static DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\s*\*\*Default:\*\*\s*(.+)$").unwrap());
/// Marks a documented parameter optional: a leading `Optional` or a parenthesized `(optional)`.
static OPTIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*optional\b|\(\s*optional\s*\)").unwrap());
/// HTML comments.
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
/// Whitespace runs.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse a `listItem` into a parameter doc. Nested lists become `options`.
pub fn parse_list_item(item: &ProseNode) -> ParamDoc {
    let (own, nested): (Vec<&ProseNode>, Vec<&ProseNode>) = item
        .children()
        .iter()
        .partition(|child| !matches!(child, ProseNode::List(_)));
    let own: Vec<ProseNode> = own.into_iter().cloned().collect();
    let raw = stringify(&own, LinkStyle::TextOnly);
    let raw = COMMENT.replace_all(&raw, "");
    let text_raw = WHITESPACE.replace_all(raw.trim(), " ").into_owned();

    let mut doc = ParamDoc {
        text_raw: text_raw.clone(),
        ..ParamDoc::default()
    };
    let mut text = text_raw.as_str();

    if let Some(m) = RETURN_LEAD.find(text) {
        doc.name = Some("return".into());
        text = &text[m.end()..];
    } else if let Some(m) = EXTENDS_LEAD.find(text) {
        doc.name = Some("extends".into());
        text = &text[m.end()..];
    } else if let Some(m) = TYPE_LEAD.find(text) {
        text = &text[m.end()..];
    } else if let Some(caps) = NAME.captures(text) {
        doc.name = Some(caps[1].trim().to_string());
        text = &text[caps.get(0).map_or(0, |m| m.end())..];
    }

    if let Some(caps) = BRACED_TYPE.captures(text) {
        doc.type_ = Some(caps[1].trim().to_string());
        text = &text[caps.get(0).map_or(0, |m| m.end())..];
    } else if let Some(caps) = LINKED_TYPE.captures(text) {
        doc.type_ = Some(caps[1].replace(['<', '>', ' '], ""));
        text = &text[caps.get(0).map_or(0, |m| m.end())..];
    }

    let mut text = LEADING_HYPHEN.replace(text, "").into_owned();
    if let Some(caps) = DEFAULT.captures(&text) {
        let value = caps[1].trim().trim_end_matches('.').trim_matches('`');
        doc.default = Some(value.to_string());
        let start = caps.get(0).map_or(text.len(), |m| m.start());
        text.truncate(start);
    }
    doc.optional = OPTIONAL.is_match(&text);
    let text = text.trim();
    if !text.is_empty() {
        doc.description = Some(text.to_string());
    }

    doc.options = nested
        .into_iter()
        .flat_map(|list| list.children().iter().map(parse_list_item))
        .collect();
    doc
}

/// Parse every item of a list into parameter docs.
pub fn parse_list(list: &ProseNode) -> Vec<ParamDoc> {
    list.children().iter().map(parse_list_item).collect()
}

/// Locate the documentation for the declared parameter at `index`.
///
/// Tries the entry at the same position, then any entry with the same name, then nested options
/// (for headings that document several overloads in one list).
fn find_doc<'a>(name: &str, index: usize, docs: &'a [ParamDoc]) -> Option<&'a ParamDoc> {
    if let Some(doc) = docs.get(index)
        && doc.name.as_deref() == Some(name)
    {
        return Some(doc);
    }
    docs.iter()
        .find(|doc| doc.name.as_deref() == Some(name))
        .or_else(|| {
            docs.iter()
                .flat_map(|doc| doc.options.iter())
                .find(|option| option.name.as_deref() == Some(name))
        })
}

/// Split the argument list on top-level commas.
///
/// Commas inside parentheses, braces or quotes belong to default values. Angle brackets do not
/// nest: in `a = n < 3` the `<` is a comparison.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, c) in args.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(' | '{') => depth += 1,
            (None, ')' | '}') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&args[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}

/// Tokenize one comma-separated argument, pushing group markers and the parameter.
fn push_argument(raw: &str, depth: &mut usize, tokens: &mut Vec<Token>, params: &mut Vec<Param>) {
    let raw = raw.trim();
    let lead = raw.len() - raw.trim_start_matches(['[', ']', ' ']).len();
    for c in raw[..lead].chars() {
        push_bracket(c, depth, tokens);
    }
    let rest = &raw[lead..];
    let core_len = rest.trim_end_matches(['[', ']', ' ']).len();
    let (core, trail) = rest.split_at(core_len);

    let core = core.trim();
    if !core.is_empty() {
        let (name, default) = match core.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (core, None),
        };
        let (name, marked) = match name.strip_suffix('?') {
            Some(stripped) => (stripped.trim(), true),
            None => (name, false),
        };
        let mut param = Param::new(name);
        param.optional = marked || *depth > 0;
        param.default = default;
        tokens.push(Token::Param(params.len()));
        params.push(param);
    }

    for c in trail.chars() {
        push_bracket(c, depth, tokens);
    }
}

/// Give each top-level skippable parameter a group of its own, so callers may leave it out.
///
/// Parameters already inside a bracket group keep that group.
fn group_skippable(tokens: &[Token], params: &[Param]) -> Vec<Token> {
    let mut grouped = Vec::with_capacity(tokens.len());
    let mut depth = 0usize;
    for &token in tokens {
        match token {
            Token::Open => depth += 1,
            Token::Close => depth = depth.saturating_sub(1),
            Token::Param(idx)
                if depth == 0 && params.get(idx).is_some_and(Param::is_skippable) =>
            {
                grouped.extend([Token::Open, token, Token::Close]);
                continue;
            }
            Token::Param(_) => {}
        }
        grouped.push(token);
    }
    grouped
}

/// Track an optional-group bracket. Unbalanced closing brackets are ignored.
fn push_bracket(c: char, depth: &mut usize, tokens: &mut Vec<Token>) {
    match c {
        '[' => {
            *depth += 1;
            tokens.push(Token::Open);
        }
        ']' if *depth > 0 => {
            *depth -= 1;
            tokens.push(Token::Close);
        }
        _ => {}
    }
}

/// Parse the signature of a heading.
///
/// `docs` is the heading's parameter list, if it has one. Returns `None` when neither the
/// heading text nor the list yields any signature information; that is an ordinary outcome for
/// prose headings.
pub fn parse_signature(kind: HeadingKind, text: &str, docs: &[ParamDoc]) -> Option<Signature> {
    let mut signature = Signature::default();
    let mut docs: Vec<ParamDoc> = docs.to_vec();

    if let Some(idx) = docs
        .iter()
        .position(|doc| doc.name.as_deref() == Some("return"))
    {
        let doc = docs.remove(idx);
        if doc.type_.is_some() || doc.description.is_some() {
            signature.return_ = Some(TypeRef {
                type_: doc.type_,
                description: doc.description,
            });
        }
    }
    if let Some(idx) = docs
        .iter()
        .position(|doc| doc.name.as_deref() == Some("extends"))
    {
        let doc = docs.remove(idx);
        if let Some(type_) = doc.type_ {
            signature.extends = Some(TypeRef::new(type_));
        }
    }

    match kind {
        HeadingKind::Class => {
            if let Some((_, Some(parent))) = class_parts(text) {
                signature.extends = Some(TypeRef::new(parent));
            }
        }
        HeadingKind::Ctor | HeadingKind::Method => {
            let caps = PARAM_LIST.captures(text.trim())?;
            if let Some(declared) = caps.get(2) {
                let ret = signature.return_.get_or_insert_with(TypeRef::default);
                if ret.type_.is_none() {
                    ret.type_ = Some(declared.as_str().trim().to_string());
                }
            }
            let mut depth = 0;
            for raw in split_args(&caps[1]) {
                push_argument(raw, &mut depth, &mut signature.tokens, &mut signature.params);
            }
            for (idx, param) in signature.params.iter_mut().enumerate() {
                if let Some(doc) = find_doc(&param.name, idx, &docs) {
                    param.type_.clone_from(&doc.type_);
                    param.description.clone_from(&doc.description);
                    param.options.clone_from(&doc.options);
                    param.optional |= doc.optional;
                    if param.default.is_none() {
                        param.default.clone_from(&doc.default);
                    }
                }
            }
            signature.tokens = group_skippable(&signature.tokens, &signature.params);
        }
        HeadingKind::Event => {
            signature.params = docs
                .iter()
                .filter_map(|doc| {
                    let name = doc.name.clone()?;
                    Some(Param {
                        type_: doc.type_.clone(),
                        description: doc.description.clone(),
                        options: doc.options.clone(),
                        optional: doc.optional,
                        default: doc.default.clone(),
                        ..Param::new(name)
                    })
                })
                .collect();
            signature.tokens = (0..signature.params.len()).map(Token::Param).collect();
        }
        HeadingKind::Module | HeadingKind::Property | HeadingKind::Misc => return None,
    }

    let empty = signature.params.is_empty()
        && signature.return_.is_none()
        && signature.extends.is_none();
    if empty && !kind.is_callable() && kind != HeadingKind::Class {
        return None;
    }
    Some(signature)
}

impl Signature {
    /// Build the parameter tree for this signature's optional groups.
    pub fn parameter_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        let mut tokens = self.tokens.iter();
        fill(&mut tree, &mut tokens, &self.params);
        tree
    }

    /// Every call shape the signature admits, as parameter name lists.
    pub fn overloads(&self) -> Vec<Vec<String>> {
        self.parameter_tree().coalesce()
    }

    /// Render the signature for display.
    ///
    /// `class Foo extends Bar` for classes, `new Foo(a, b?)` for constructors and
    /// `name(a, b?): Type` for everything else.
    pub fn display(&self, kind: HeadingKind, name: &str) -> String {
        if kind == HeadingKind::Class {
            return match self.extends.as_ref().and_then(|parent| parent.type_.as_deref()) {
                Some(parent) => format!("class {name} extends {parent}"),
                None => format!("class {name}"),
            };
        }
        let prefix = if kind == HeadingKind::Ctor && !name.starts_with("new ") {
            "new "
        } else {
            ""
        };
        let params = self
            .params
            .iter()
            .map(|param| {
                if param.is_skippable() {
                    format!("{}?", param.name)
                } else {
                    param.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self
            .return_
            .as_ref()
            .and_then(|ret| ret.type_.as_deref())
            .map(|type_| format!(": {type_}"))
            .unwrap_or_default();
        format!("{prefix}{name}({params}){ret}")
    }
}

/// Add parameters to `tree` until the current group closes.
fn fill<'a>(
    tree: &mut ParameterTree,
    tokens: &mut impl Iterator<Item = &'a Token>,
    params: &[Param],
) {
    while let Some(token) = tokens.next() {
        match token {
            Token::Open => fill(tree.add_child(), tokens, params),
            Token::Close => return,
            Token::Param(idx) => {
                if let Some(param) = params.get(*idx) {
                    tree.add_parameter(param.name.clone());
                }
            }
        }
    }
}

/// The name a callable heading is displayed under: its callee expression when one is present.
pub fn display_name(kind: HeadingKind, text: &str, name: &str) -> String {
    if kind.is_callable()
        && let Some(callee) = callee(text)
    {
        return callee;
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(children: Vec<ProseNode>) -> ProseNode {
        ProseNode::list_item(vec![ProseNode::paragraph(children)])
    }

    #[test]
    fn optional_default_and_plain_params() {
        let sig = parse_signature(HeadingKind::Method, "fn(a?, b=1, c)", &[]).unwrap();
        assert_eq!(
            sig.params,
            vec![
                Param {
                    optional: true,
                    ..Param::new("a")
                },
                Param {
                    default: Some("1".into()),
                    ..Param::new("b")
                },
                Param::new("c"),
            ]
        );
        assert_eq!(sig.display(HeadingKind::Method, "fn"), "fn(a?, b?, c)");
    }

    #[test]
    fn class_extends_round_trips() {
        let text = "class Foo extends Bar";
        let (kind, name) = crate::heading::classify(text, 2);
        assert_eq!(kind, HeadingKind::Class);
        let sig = parse_signature(kind, text, &[]).unwrap();
        assert_eq!(sig.extends, Some(TypeRef::new("Bar")));
        assert_eq!(sig.display(kind, &name), text);
    }

    #[test]
    fn bracket_groups_mark_optional_and_shape_overloads() {
        let text = "`fs.open(path[, flags[, mode]], callback)`";
        let sig = parse_signature(HeadingKind::Method, text, &[]).unwrap();
        let optional: Vec<bool> = sig.params.iter().map(|p| p.optional).collect();
        assert_eq!(optional, vec![false, true, true, false]);
        assert_eq!(
            sig.overloads(),
            vec![
                vec!["path".to_string(), "callback".into()],
                vec!["path".to_string(), "flags".into(), "callback".into()],
                vec![
                    "path".to_string(),
                    "flags".into(),
                    "mode".into(),
                    "callback".into()
                ],
            ]
        );
        assert_eq!(
            sig.display(HeadingKind::Method, "fs.open"),
            "fs.open(path, flags?, mode?, callback)"
        );
    }

    #[test]
    fn trailing_return_type() {
        let sig = parse_signature(HeadingKind::Method, "`buf.toJSON(): Object`", &[]).unwrap();
        assert_eq!(sig.return_, Some(TypeRef::new("Object")));
        assert!(sig.params.is_empty());
        assert_eq!(sig.display(HeadingKind::Method, "buf.toJSON"), "buf.toJSON(): Object");
    }

    #[test]
    fn documented_list_supplies_types_return_and_defaults() {
        let docs = vec![
            parse_list_item(&item(vec![
                ProseNode::inline_code("path"),
                ProseNode::text(" {string} File to read."),
            ])),
            parse_list_item(&item(vec![
                ProseNode::inline_code("encoding"),
                ProseNode::text(" {string} Optional encoding. "),
                ProseNode::Strong(crate::node::Parent {
                    children: vec![ProseNode::text("Default:")],
                    position: None,
                }),
                ProseNode::text(" "),
                ProseNode::inline_code("'utf8'"),
            ])),
            parse_list_item(&item(vec![ProseNode::text("Returns: {Buffer}")])),
        ];
        let sig = parse_signature(
            HeadingKind::Method,
            "`fs.readFileSync(path, encoding)`",
            &docs,
        )
        .unwrap();
        assert_eq!(sig.params[0].type_.as_deref(), Some("string"));
        assert_eq!(sig.params[0].description.as_deref(), Some("File to read."));
        assert!(sig.params[1].optional);
        assert_eq!(sig.params[1].default.as_deref(), Some("'utf8'"));
        assert_eq!(sig.return_, Some(TypeRef::new("Buffer")));
        assert_eq!(
            sig.display(HeadingKind::Method, "fs.readFileSync"),
            "fs.readFileSync(path, encoding?): Buffer"
        );
    }

    #[test]
    fn linked_types_are_recognized() {
        let doc = parse_list_item(&item(vec![
            ProseNode::inline_code("data"),
            ProseNode::text(" "),
            ProseNode::link("#string", vec![ProseNode::text("<string>")]),
            ProseNode::text(" | "),
            ProseNode::link("#buffer", vec![ProseNode::text("<Buffer>")]),
            ProseNode::text(" Payload"),
        ]));
        assert_eq!(doc.name.as_deref(), Some("data"));
        assert_eq!(doc.type_.as_deref(), Some("string|Buffer"));
        assert_eq!(doc.description.as_deref(), Some("Payload"));
    }

    #[test]
    fn nested_lists_become_options_and_are_found_by_name() {
        let options = ProseNode::list(vec![item(vec![
            ProseNode::inline_code("flag"),
            ProseNode::text(" {string}"),
        ])]);
        let list_item = ProseNode::list_item(vec![
            ProseNode::paragraph(vec![
                ProseNode::inline_code("options"),
                ProseNode::text(" {Object}"),
            ]),
            options,
        ]);
        let docs = vec![parse_list_item(&list_item)];
        assert_eq!(docs[0].options.len(), 1);
        let sig = parse_signature(HeadingKind::Method, "`open(flag)`", &docs).unwrap();
        assert_eq!(sig.params[0].type_.as_deref(), Some("string"));
    }

    #[test]
    fn constructors_display_with_new() {
        let sig =
            parse_signature(HeadingKind::Ctor, "`new Console(stdout[, stderr])`", &[]).unwrap();
        assert_eq!(
            sig.display(HeadingKind::Ctor, "Console"),
            "new Console(stdout, stderr?)"
        );
        assert_eq!(
            sig.display(HeadingKind::Ctor, "new Console"),
            "new Console(stdout, stderr?)"
        );
    }

    #[test]
    fn unrecognized_shapes_have_no_signature() {
        assert_eq!(
            parse_signature(HeadingKind::Method, "no parens here", &[]),
            None
        );
        assert_eq!(parse_signature(HeadingKind::Misc, "whatever()", &[]), None);
        assert_eq!(parse_signature(HeadingKind::Event, "Event: 'x'", &[]), None);
    }

    #[test]
    fn unbalanced_brackets_do_not_panic() {
        let sig = parse_signature(HeadingKind::Method, "f(a]], [b)", &[]).unwrap();
        assert_eq!(sig.params.len(), 2);
        assert!(!sig.params[0].optional);
        assert!(sig.params[1].optional);
        assert_eq!(sig.overloads().len(), 2);
    }

    #[test]
    fn default_values_may_contain_commas() {
        let sig = parse_signature(HeadingKind::Method, "f(a = { x: 1, y: 2 }, b)", &[]).unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].default.as_deref(), Some("{ x: 1, y: 2 }"));
    }

    #[test]
    fn documented_defaults_make_params_skippable() {
        let docs = vec![
            parse_list_item(&item(vec![
                ProseNode::inline_code("a"),
                ProseNode::text(" {string}"),
            ])),
            parse_list_item(&item(vec![
                ProseNode::inline_code("b"),
                ProseNode::text(" {integer} "),
                ProseNode::Strong(crate::node::Parent {
                    children: vec![ProseNode::text("Default:")],
                    position: None,
                }),
                ProseNode::text(" "),
                ProseNode::inline_code("1"),
            ])),
        ];
        let sig = parse_signature(HeadingKind::Method, "`f(a, b)`", &docs).unwrap();
        assert_eq!(sig.display(HeadingKind::Method, "f"), "f(a, b?)");
        assert_eq!(
            sig.overloads(),
            vec![vec!["a".to_string()], vec!["a".to_string(), "b".into()]]
        );

        let tree = sig.parameter_tree();
        assert_eq!(tree.parameters().collect::<Vec<_>>(), ["a"]);
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.children()[0].parameters().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn bracketed_params_are_not_grouped_twice() {
        let docs = vec![parse_list_item(&item(vec![
            ProseNode::inline_code("b"),
            ProseNode::text(" {integer} Optional count."),
        ]))];
        let sig = parse_signature(HeadingKind::Method, "`f(a[, b])`", &docs).unwrap();
        let tree = sig.parameter_tree();
        assert_eq!(tree.children().len(), 1);
        assert!(tree.children()[0].children().is_empty());
        assert_eq!(sig.overloads().len(), 2);
    }

    #[test]
    fn untyped_returns_keep_their_description() {
        let docs = vec![parse_list_item(&item(vec![ProseNode::text(
            "Returns: a fresh copy of the buffer",
        )]))];
        let sig = parse_signature(HeadingKind::Method, "`buf.copy()`", &docs).unwrap();
        assert_eq!(
            sig.return_,
            Some(TypeRef {
                type_: None,
                description: Some("a fresh copy of the buffer".into()),
            })
        );
        assert_eq!(sig.display(HeadingKind::Method, "buf.copy"), "buf.copy()");

        let sig = parse_signature(HeadingKind::Method, "`buf.copy(): Buffer`", &docs).unwrap();
        assert_eq!(
            sig.return_,
            Some(TypeRef {
                type_: Some("Buffer".into()),
                description: Some("a fresh copy of the buffer".into()),
            })
        );
    }

    #[test]
    fn comparisons_in_defaults_do_not_nest() {
        let sig = parse_signature(HeadingKind::Method, "f(a = n < 3, b)", &[]).unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].default.as_deref(), Some("n < 3"));
        assert_eq!(sig.params[1], Param::new("b"));
    }

    #[test]
    fn optional_marker_must_lead_or_be_parenthesized() {
        let optional = |text: &str| {
            parse_list_item(&item(vec![
                ProseNode::inline_code("x"),
                ProseNode::text(format!(" {{Object}} {text}")),
            ]))
            .optional
        };
        assert!(optional("Optional settings."));
        assert!(optional("Settings (optional)."));
        assert!(!optional("A non-optional handle."));
        assert!(!optional("Holds the optional fields of options."));
    }

    #[test]
    fn event_params_come_from_the_list() {
        let docs = vec![parse_list_item(&item(vec![
            ProseNode::inline_code("code"),
            ProseNode::text(" {integer}"),
        ]))];
        let sig = parse_signature(HeadingKind::Event, "Event: `'exit'`", &docs).unwrap();
        assert_eq!(sig.params[0].name, "code");
        assert_eq!(sig.display(HeadingKind::Event, "exit"), "exit(code)");
    }
}

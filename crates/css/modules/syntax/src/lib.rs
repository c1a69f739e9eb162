//! CSS Syntax Module Level 3 — Parsing and tokenization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Builds a lightweight, mutable tree of style rules, at-rules and declarations on top of
//! `cssparser`. Every editable text field remembers where it came from in the source so the
//! serializer can splice edits back in without disturbing the surrounding formatting.

mod serialize;
mod walk;

use core::ops::Range;

use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use cssparser::Token;
use log::trace;

pub use walk::Visitor;

/// Byte range into the stylesheet source.
pub type Span = Range<usize>;

/// Identity of a node within one parsed stylesheet.
///
/// Ids are assigned in document order and are unique per stylesheet. A node that replaces
/// another one during a pass keeps the id of the node it replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Identity of this declaration.
    pub id: NodeId,
    /// Property name exactly as written (custom properties are case-sensitive).
    pub property: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
    /// Where `property` and `value` were read from, if the node came from a parse.
    spans: Option<DeclarationSpans>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct DeclarationSpans {
    property: Span,
    value: Span,
}

impl Declaration {
    /// Create a declaration that is not tied to any source text.
    pub fn new(id: NodeId, property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            property: property.into(),
            value: value.into(),
            important: false,
            spans: None,
        }
    }

    /// Source range of the property name.
    pub fn property_span(&self) -> Option<Span> {
        self.spans.as_ref().map(|spans| spans.property.clone())
    }

    /// Source range of the value (excluding `!important`).
    pub fn value_span(&self) -> Option<Span> {
        self.spans.as_ref().map(|spans| spans.value.clone())
    }
}

/// An at-rule such as `@property --x { ... }` or `@container card (min-width: 1px) { ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Identity of this at-rule.
    pub id: NodeId,
    /// Lowercased at-keyword without the `@`.
    pub name: String,
    /// Raw prelude text, trimmed.
    pub params: String,
    /// Block contents, or `None` for statement at-rules like `@import ...;`.
    pub children: Option<Vec<Node>>,
    /// Where `params` was read from, if the node came from a parse.
    params_span: Option<Span>,
}

impl AtRule {
    /// Create an at-rule that is not tied to any source text.
    pub fn new(id: NodeId, name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            params: params.into(),
            children: None,
            params_span: None,
        }
    }

    /// Source range of the params.
    pub fn params_span(&self) -> Option<Span> {
        self.params_span.clone()
    }
}

/// A single style rule with a raw prelude and its block contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Identity of this rule.
    pub id: NodeId,
    /// Raw prelude text (typically the selector list).
    pub prelude: String,
    /// Declarations and nested rules within the rule block, in source order.
    pub children: Vec<Node>,
}

/// Any node of the stylesheet tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Declaration(Declaration),
    AtRule(AtRule),
    Style(StyleRule),
}

impl Node {
    /// Identity of the node regardless of its kind.
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Declaration(decl) => decl.id,
            Self::AtRule(rule) => rule.id,
            Self::Style(rule) => rule.id,
        }
    }
}

/// A parsed stylesheet: the source it was parsed from plus its top-level rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level rules in source order.
    pub rules: Vec<Node>,
    /// Text the spans of every parsed node point into.
    source: String,
}

impl Stylesheet {
    /// The text this stylesheet was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Total number of nodes, nested ones included.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Declaration(_) => 1,
                    Node::AtRule(rule) => 1 + rule.children.as_deref().map_or(0, count),
                    Node::Style(rule) => 1 + count(&rule.children),
                })
                .sum()
        }
        count(&self.rules)
    }
}

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (&str, bool) {
    if let Some(pos) = value.rfind("!important")
        && value.get(pos..).is_some_and(|tail| tail.trim_end() == "!important")
        && let Some(prefix) = value.get(..pos)
    {
        return (prefix.trim_end(), true);
    }
    (value, false)
}

/// Length in bytes of the identifier at the start of `text`, honouring backslash escapes.
fn ident_prefix_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    while let Some((index, character)) = chars.next() {
        if character == '\\' {
            if chars.next().is_none() {
                return text.len();
            }
            continue;
        }
        if !(character.is_ascii_alphanumeric()
            || character == '-'
            || character == '_'
            || !character.is_ascii())
        {
            return index;
        }
    }
    text.len()
}

/// Trim `raw` (which starts at byte `offset` of the source) and return the trimmed text together
/// with its source span.
fn trimmed_with_span(raw: &str, offset: usize) -> (&str, Span) {
    let lead = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    let start = offset + lead;
    (trimmed, start..start + trimmed.len())
}

/// Prelude of an at-rule, carried from `parse_prelude` to block parsing.
struct AtRulePrelude {
    id: NodeId,
    name: String,
    params: String,
    params_span: Span,
}

/// Builds `Node`s for every rule, at-rule and declaration, handing out ids in document order.
#[derive(Default)]
struct TreeBuilder {
    next_id: u32,
}

impl TreeBuilder {
    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Parse the contents of a `{}` block into nodes.
    fn parse_body(&mut self, block: &mut Parser<'_, '_>) -> Vec<Node> {
        let mut out: Vec<Node> = Vec::new();
        for node in CssRuleBodyParser::new(block, self).flatten() {
            out.push(node);
        }
        out
    }
}

impl<'i> CssDeclarationParser<'i> for TreeBuilder {
    type Declaration = Node;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        let custom = name.starts_with("--");
        // Consume until end of the declaration item.
        loop {
            let opens_block = match input.next_including_whitespace_and_comments() {
                Ok(token) => matches!(token, Token::CurlyBracketBlock),
                Err(_) => break,
            };
            if opens_block && !custom {
                // Looks like a nested style rule (`a:hover { ... }`), let the rule parser have it.
                return Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid));
            }
        }
        let raw_value = input.slice_from(start);
        let (value_text, value_span) = trimmed_with_span(raw_value, start.byte_index());
        let (value, important) = split_important_tail(value_text);
        let value_span = value_span.start..value_span.start + value.len();

        let property_start = declaration_start.position();
        let raw_head = input.slice(property_start..start);
        let property = raw_head
            .get(..ident_prefix_len(raw_head))
            .unwrap_or(raw_head)
            .to_owned();
        let property_span =
            property_start.byte_index()..property_start.byte_index() + property.len();

        let id = self.allocate();
        trace!(target: "css_syntax", "declaration {id:?} `{property}` at {property_span:?}");
        Ok(Node::Declaration(Declaration {
            id,
            property,
            value: value.to_owned(),
            important,
            spans: Some(DeclarationSpans {
                property: property_span,
                value: value_span,
            }),
        }))
    }
}

impl<'i> CssAtRuleParser<'i> for TreeBuilder {
    type Prelude = AtRulePrelude;
    type AtRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let id = self.allocate();
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let (params, params_span) = trimmed_with_span(input.slice_from(start), start.byte_index());
        Ok(AtRulePrelude {
            id,
            name: name.to_ascii_lowercase(),
            params: params.to_owned(),
            params_span,
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(Node::AtRule(AtRule {
            id: prelude.id,
            name: prelude.name,
            params: prelude.params,
            children: None,
            params_span: Some(prelude.params_span),
        }))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let children = self.parse_body(input);
        Ok(Node::AtRule(AtRule {
            id: prelude.id,
            name: prelude.name,
            params: prelude.params,
            children: Some(children),
            params_span: Some(prelude.params_span),
        }))
    }
}

impl<'i> CssQualifiedRuleParser<'i> for TreeBuilder {
    type Prelude = (NodeId, String); // id and raw selector/prelude
    type QualifiedRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let id = self.allocate();
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok((id, input.slice_from(start.position()).trim().to_owned()))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let (id, prelude_text) = prelude;
        let children = self.parse_body(input);
        Ok(Node::Style(StyleRule {
            id,
            prelude: prelude_text,
            children,
        }))
    }
}

impl<'i> CssRuleBodyItemParser<'i, Node, ()> for TreeBuilder {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Parse a full stylesheet into a `Stylesheet` using cssparser.
///
/// Parsing is tolerant: rules and declarations that fail to parse are dropped from the tree
/// (but remain untouched in the serialized output, since serialization works from the source).
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut builder = TreeBuilder::default();
    let mut sheet = Stylesheet {
        rules: Vec::new(),
        source: css.to_owned(),
    };
    for rule in StyleSheetParser::new(&mut parser, &mut builder).flatten() {
        sheet.rules.push(rule);
    }
    sheet
}

//! Locating custom property identifiers.
//!
//! An identifier is `--` followed by one or more of `[A-Za-z0-9_-]`. Values and at-rule
//! params are scanned once, left to right, and every such run is reported, wherever it sits
//! in the text. The scanner only keeps enough state to tell whether a match is the first
//! argument of a `var(` call. Each `var(` re-arms that state, so fallback chains of any depth
//! are labelled without matching parentheses up front. Selectors are never scanned, which is
//! what keeps `.block--modifier` out.

use core::ops::Range;

/// Where an identifier was found. Decides which field of a node it lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntacticPosition {
    /// The declared property, e.g. `--brand: red`.
    PropertyName,
    /// First argument of `var()`, e.g. `var(--brand, red)`.
    ValueVarReference,
    /// Anywhere else in a value, e.g. `transition: --brand 0.3s`.
    ValueBareUsage,
    /// Prelude of `@property` or `@container`.
    AtRuleParam,
}

/// A custom property identifier found in a piece of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier<'text> {
    /// Name without the leading `--`.
    pub name: &'text str,
    /// Byte range of `--name` within the scanned text. A suffix goes in at `span.end`.
    pub span: Range<usize>,
    pub position: SyntacticPosition,
}

const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

/// End of the run of name bytes starting at `from`.
fn name_end(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.iter().position(|&byte| !is_name_byte(byte)))
        .map_or(bytes.len(), |offset| from + offset)
}

/// Whether the `(` at `index` opens a `var()` call.
fn opens_var(bytes: &[u8], index: usize) -> bool {
    let Some(head_start) = index.checked_sub(3) else {
        return false;
    };
    let is_var = bytes
        .get(head_start..index)
        .is_some_and(|head| head.eq_ignore_ascii_case(b"var"));
    let at_boundary = head_start == 0
        || bytes
            .get(head_start - 1)
            .is_some_and(|&byte| !is_name_byte(byte) && byte.is_ascii());
    is_var && at_boundary
}

/// Find every custom property identifier in a declaration value, in source order.
///
/// A match directly after `var(` (whitespace allowed) is a
/// [`SyntacticPosition::ValueVarReference`]; every other one is a
/// [`SyntacticPosition::ValueBareUsage`]. The name always ends with the last name byte, so
/// `var(--a b)` yields `a` and whatever follows it stays where it was. Nothing is skipped:
/// strings, comments and `url()` contents are scanned like the rest of the value.
pub fn scan_value(text: &str) -> Vec<Identifier<'_>> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut awaiting_var_name = false;
    let mut index = 0;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'(' => {
                awaiting_var_name = opens_var(bytes, index);
                index += 1;
            }
            b'-' if bytes.get(index + 1) == Some(&b'-') => {
                let end = name_end(bytes, index + 2);
                let is_var_reference = awaiting_var_name;
                awaiting_var_name = false;
                if let Some(name) = text.get(index + 2..end).filter(|name| !name.is_empty()) {
                    found.push(Identifier {
                        name,
                        span: index..end,
                        position: if is_var_reference {
                            SyntacticPosition::ValueVarReference
                        } else {
                            SyntacticPosition::ValueBareUsage
                        },
                    });
                }
                index = end;
            }
            _ if byte.is_ascii_whitespace() => index += 1,
            _ => {
                awaiting_var_name = false;
                index += 1;
            }
        }
    }
    found
}

/// The identifier a declared property introduces, if it is a custom property.
///
/// The whole property name is the identifier; there is at most one per declaration.
pub fn scan_property(property: &str) -> Option<Identifier<'_>> {
    let name = property.strip_prefix("--")?;
    if name.is_empty() {
        return None;
    }
    Some(Identifier {
        name,
        span: 0..property.len(),
        position: SyntacticPosition::PropertyName,
    })
}

/// Identifiers in the params of an at-rule named `at_keyword` (lowercase, without `@`).
///
/// `@property` names its subject with a single leading `--token`. `@container` may carry a
/// container name and `style()` queries, so its params are scanned like a value. Other
/// at-rules never hold custom property identifiers here.
pub fn scan_at_rule_params<'text>(at_keyword: &str, params: &'text str) -> Vec<Identifier<'text>> {
    match at_keyword {
        "property" => {
            if !params.starts_with("--") {
                return Vec::new();
            }
            let end = name_end(params.as_bytes(), 2);
            params
                .get(2..end)
                .filter(|name| !name.is_empty())
                .map(|name| Identifier {
                    name,
                    span: 0..end,
                    position: SyntacticPosition::AtRuleParam,
                })
                .into_iter()
                .collect()
        }
        "container" => scan_value(params)
            .into_iter()
            .map(|identifier| Identifier {
                position: SyntacticPosition::AtRuleParam,
                ..identifier
            })
            .collect(),
        _ => Vec::new(),
    }
}

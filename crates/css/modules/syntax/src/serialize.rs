//! Stylesheet serialization.
//!
//! The tree does not own formatting. Output is the original source with every edited field
//! spliced back in at the span it was parsed from, so whitespace, comments and anything the
//! parser skipped come out exactly as they went in.

use log::debug;

use crate::{Node, Span, Stylesheet};

/// Replacement text for one span of the source.
struct Edit<'tree> {
    span: Span,
    text: &'tree str,
}

/// Queue an edit when `current` no longer matches the source text under `span`.
fn push_if_changed<'tree>(
    source: &str,
    span: Option<Span>,
    current: &'tree str,
    edits: &mut Vec<Edit<'tree>>,
) {
    let Some(span) = span else {
        return;
    };
    match source.get(span.clone()) {
        Some(original) if original == current => {}
        Some(_) => edits.push(Edit {
            span,
            text: current,
        }),
        None => debug!(target: "css_syntax", "span {span:?} is outside the source, edit dropped"),
    }
}

fn collect_edits<'tree>(nodes: &'tree [Node], source: &str, edits: &mut Vec<Edit<'tree>>) {
    for node in nodes {
        match node {
            Node::Declaration(decl) => {
                push_if_changed(source, decl.property_span(), &decl.property, edits);
                push_if_changed(source, decl.value_span(), &decl.value, edits);
            }
            Node::AtRule(rule) => {
                push_if_changed(source, rule.params_span(), &rule.params, edits);
                if let Some(children) = rule.children.as_deref() {
                    collect_edits(children, source, edits);
                }
            }
            Node::Style(rule) => collect_edits(&rule.children, source, edits),
        }
    }
}

impl Stylesheet {
    /// Serialize the (possibly edited) tree back to CSS text.
    pub fn to_css(&self) -> String {
        let source = self.source();
        let mut edits: Vec<Edit> = Vec::new();
        collect_edits(&self.rules, source, &mut edits);
        edits.sort_by_key(|edit| edit.span.start);

        let mut out = String::with_capacity(source.len() + edits.len() * 8);
        let mut cursor = 0;
        for edit in edits {
            if edit.span.start < cursor {
                continue;
            }
            out.push_str(source.get(cursor..edit.span.start).unwrap_or_default());
            out.push_str(edit.text);
            cursor = edit.span.end;
        }
        out.push_str(source.get(cursor..).unwrap_or_default());
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{Node, parse_stylesheet};

    #[test]
    fn untouched_sheet_round_trips() {
        let css = "/* head */\na{ --test: 123; }\n@property --x { inherits: false }\n@bogus";
        assert_eq!(parse_stylesheet(css).to_css(), css);
    }

    #[test]
    fn edited_fields_are_spliced_in_place() {
        let mut sheet = parse_stylesheet("a{ --test: 123 !important; } @property --x {}");
        if let Node::Style(rule) = &mut sheet.rules[0]
            && let Node::Declaration(decl) = &mut rule.children[0]
        {
            decl.property.push_str("-hash");
            decl.value = "456".to_owned();
        }
        if let Node::AtRule(rule) = &mut sheet.rules[1] {
            rule.params.push_str("-hash");
        }
        assert_eq!(
            sheet.to_css(),
            "a{ --test-hash: 456 !important; } @property --x-hash {}"
        );
    }
}

//! Document-order traversal with in-place node replacement.

use crate::{AtRule, Declaration, Node, Stylesheet};

/// Callbacks invoked for every declaration and at-rule of a stylesheet.
///
/// Returning `Some` replaces the visited node in the tree; returning `None` leaves it alone.
pub trait Visitor {
    fn declaration(&mut self, _decl: &Declaration) -> Option<Declaration> {
        None
    }

    fn at_rule(&mut self, _rule: &AtRule) -> Option<AtRule> {
        None
    }
}

impl Stylesheet {
    /// Visit every declaration and at-rule in document order.
    ///
    /// An at-rule is visited before its children; the children walked are those of the
    /// replacement when the visitor replaced the at-rule. Each node is handed to the visitor
    /// exactly once per walk.
    pub fn walk_mut<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        walk_nodes(&mut self.rules, visitor);
    }
}

fn walk_nodes<V: Visitor + ?Sized>(nodes: &mut [Node], visitor: &mut V) {
    for node in nodes.iter_mut() {
        match node {
            Node::Declaration(decl) => {
                if let Some(replacement) = visitor.declaration(decl) {
                    *decl = replacement;
                }
            }
            Node::AtRule(rule) => {
                if let Some(replacement) = visitor.at_rule(rule) {
                    *rule = replacement;
                }
                if let Some(children) = rule.children.as_mut() {
                    walk_nodes(children, visitor);
                }
            }
            Node::Style(rule) => walk_nodes(&mut rule.children, visitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_stylesheet;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl Visitor for Recorder {
        fn declaration(&mut self, decl: &Declaration) -> Option<Declaration> {
            self.seen.push(decl.property.clone());
            None
        }

        fn at_rule(&mut self, rule: &AtRule) -> Option<AtRule> {
            self.seen.push(format!("@{}", rule.name));
            None
        }
    }

    #[test]
    fn visits_in_document_order() {
        let mut sheet = parse_stylesheet(
            "a { --one: 1; } @media print { b { --two: 2; } } c { --three: 3; }",
        );
        let mut recorder = Recorder::default();
        sheet.walk_mut(&mut recorder);
        assert_eq!(recorder.seen, ["--one", "@media", "--two", "--three"]);
    }

    struct Uppercase;

    impl Visitor for Uppercase {
        fn declaration(&mut self, decl: &Declaration) -> Option<Declaration> {
            let mut replacement = decl.clone();
            replacement.value = decl.value.to_uppercase();
            Some(replacement)
        }
    }

    #[test]
    fn replacements_land_in_the_tree() {
        let mut sheet = parse_stylesheet("a { color: red; }");
        sheet.walk_mut(&mut Uppercase);
        assert_eq!(sheet.to_css(), "a { color: RED; }");
    }
}

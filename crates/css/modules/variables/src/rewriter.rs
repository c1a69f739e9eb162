//! Node rewriting.

use std::collections::HashSet;

use css_syntax::{AtRule, Declaration, NodeId};
use log::trace;

use crate::filter::PrefixFilter;
use crate::matcher::{self, Identifier};

/// Resolved configuration for one pass over a stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewritePolicy {
    /// Suffix to append, already length-capped. `None` turns the pass into a no-op.
    suffix: Option<String>,
    filter: PrefixFilter,
}

impl RewritePolicy {
    pub fn new(suffix: Option<String>, filter: PrefixFilter) -> Self {
        Self { suffix, filter }
    }

    /// A policy that leaves every node untouched.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.suffix.is_some()
    }

    /// Insert the suffix after every identifier the filter accepts.
    ///
    /// Identifiers must be in source order with non-overlapping spans. Returns `None` when no
    /// identifier qualified, leaving `text` as it was.
    fn apply(&self, text: &str, identifiers: &[Identifier<'_>]) -> Option<String> {
        let suffix = self.suffix.as_deref()?;
        let mut out = String::with_capacity(text.len() + identifiers.len() * suffix.len());
        let mut cursor = 0;
        let mut changed = false;
        for identifier in identifiers {
            if !self.filter.should_rewrite(identifier.name) {
                trace!(target: "css_variables", "--{} filtered out", identifier.name);
                continue;
            }
            out.push_str(text.get(cursor..identifier.span.end)?);
            out.push_str(suffix);
            cursor = identifier.span.end;
            changed = true;
        }
        if !changed {
            return None;
        }
        out.push_str(text.get(cursor..)?);
        Some(out)
    }
}

/// Outcome of rewriting one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rewritten<T> {
    /// Nothing qualified, was already processed, or the policy is disabled.
    Unchanged,
    /// Replacement for the node; it carries the same id as the original.
    Replaced(T),
}

impl<T> Rewritten<T> {
    pub fn into_replacement(self) -> Option<T> {
        match self {
            Self::Unchanged => None,
            Self::Replaced(node) => Some(node),
        }
    }
}

/// Renames custom properties node by node.
///
/// A rewriter lives for one pass. It remembers the ids of the nodes it produced and treats
/// them as final, so handing it the same node again (or its replacement) never adds a second
/// suffix.
#[derive(Debug)]
pub struct Rewriter {
    policy: RewritePolicy,
    processed: HashSet<NodeId>,
}

impl Rewriter {
    pub fn new(policy: RewritePolicy) -> Self {
        Self {
            policy,
            processed: HashSet::new(),
        }
    }

    pub fn policy(&self) -> &RewritePolicy {
        &self.policy
    }

    /// Whether `id` names a node this rewriter already produced.
    pub fn is_processed(&self, id: NodeId) -> bool {
        self.processed.contains(&id)
    }

    /// Number of nodes replaced so far.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    fn should_scan(&self, id: NodeId) -> bool {
        if self.processed.contains(&id) {
            trace!(target: "css_variables", "{id:?} already processed");
            return false;
        }
        self.policy.is_enabled()
    }

    /// Rename the custom property a declaration defines and every one its value mentions.
    pub fn rewrite_declaration(&mut self, decl: &Declaration) -> Rewritten<Declaration> {
        if !self.should_scan(decl.id) {
            return Rewritten::Unchanged;
        }
        let property_hits: Vec<Identifier<'_>> =
            matcher::scan_property(&decl.property).into_iter().collect();
        let value_hits = matcher::scan_value(&decl.value);
        if property_hits.is_empty() && value_hits.is_empty() {
            return Rewritten::Unchanged;
        }

        let property = self.policy.apply(&decl.property, &property_hits);
        let value = self.policy.apply(&decl.value, &value_hits);
        if property.is_none() && value.is_none() {
            return Rewritten::Unchanged;
        }

        let mut replacement = decl.clone();
        if let Some(property) = property {
            replacement.property = property;
        }
        if let Some(value) = value {
            replacement.value = value;
        }
        trace!(
            target: "css_variables",
            "{:?}: `{}: {}` -> `{}: {}`",
            decl.id,
            decl.property,
            decl.value,
            replacement.property,
            replacement.value
        );
        self.processed.insert(replacement.id);
        Rewritten::Replaced(replacement)
    }

    /// Rename custom properties in the params of `@property` and `@container` rules.
    ///
    /// Children are not touched; they are separate nodes.
    pub fn rewrite_at_rule(&mut self, rule: &AtRule) -> Rewritten<AtRule> {
        if !self.should_scan(rule.id) {
            return Rewritten::Unchanged;
        }
        let hits = matcher::scan_at_rule_params(&rule.name, &rule.params);
        let Some(params) = self.policy.apply(&rule.params, &hits) else {
            return Rewritten::Unchanged;
        };

        let mut replacement = rule.clone();
        trace!(
            target: "css_variables",
            "{:?}: `@{} {}` -> `@{} {}`",
            rule.id,
            rule.name,
            rule.params,
            rule.name,
            params
        );
        replacement.params = params;
        self.processed.insert(replacement.id);
        Rewritten::Replaced(replacement)
    }
}

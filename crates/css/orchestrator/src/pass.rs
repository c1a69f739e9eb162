//! One renaming pass over a stylesheet tree.

use css_syntax::{AtRule, Declaration, Stylesheet, Visitor};
use css_variables::{RewritePolicy, Rewriter};
use log::debug;

/// Counts gathered while running a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Declarations and at-rules handed to the rewriter.
    pub visited: usize,
    /// Nodes replaced by a renamed copy.
    pub replaced: usize,
}

/// Walks a stylesheet and replaces every declaration or at-rule that mentions a qualifying
/// custom property.
///
/// The pass owns its `Rewriter`, so running it again over the same tree only visits nodes; it
/// never renames them twice.
#[derive(Debug)]
pub struct VarHashPass {
    rewriter: Rewriter,
    report: PassReport,
}

impl VarHashPass {
    pub fn new(policy: RewritePolicy) -> Self {
        Self {
            rewriter: Rewriter::new(policy),
            report: PassReport::default(),
        }
    }

    /// Rename custom properties throughout `sheet`, in document order.
    pub fn run(&mut self, sheet: &mut Stylesheet) -> PassReport {
        self.report = PassReport::default();
        if !self.rewriter.policy().is_enabled() {
            debug!(target: "css_orchestrator", "no hash configured, leaving stylesheet untouched");
            return self.report;
        }
        sheet.walk_mut(self);
        self.report
    }
}

impl Visitor for VarHashPass {
    fn declaration(&mut self, decl: &Declaration) -> Option<Declaration> {
        self.report.visited += 1;
        let replacement = self.rewriter.rewrite_declaration(decl).into_replacement();
        self.report.replaced += usize::from(replacement.is_some());
        replacement
    }

    fn at_rule(&mut self, rule: &AtRule) -> Option<AtRule> {
        self.report.visited += 1;
        let replacement = self.rewriter.rewrite_at_rule(rule).into_replacement();
        self.report.replaced += usize::from(replacement.is_some());
        replacement
    }
}

//! Entry points for renaming custom properties in CSS text.
//!
//! Ties the pieces together: [`Options`] resolve into a policy, the stylesheet is parsed by
//! `css_syntax`, a [`VarHashPass`] walks it, and the edited tree is printed back with the
//! original formatting intact.

use css_syntax::parse_stylesheet;
use log::info;

mod options;
mod pass;

pub use options::Options;
pub use pass::{PassReport, VarHashPass};

/// Rename every qualifying custom property in `css` and return the new stylesheet text.
///
/// Without a hash the input comes back unchanged.
pub fn hash_css(css: &str, options: &Options) -> String {
    let policy = options.policy();
    if !policy.is_enabled() {
        return css.to_owned();
    }
    let mut sheet = parse_stylesheet(css);
    let report = VarHashPass::new(policy).run(&mut sheet);
    info!(
        target: "css_orchestrator",
        "renamed custom properties in {} of {} nodes",
        report.replaced,
        report.visited
    );
    sheet.to_css()
}

//! CSS Custom Properties for Cascading Variables Module Level 1 — custom property renaming.
//! Spec: <https://www.w3.org/TR/css-variables-1/>
//!
//! Appends a suffix to every qualifying custom property name, wherever the name shows up:
//! as a declared property, inside `var()` references and their fallback chains, as a bare
//! identifier in a value (`transition: --thumb 0.3s`, `container-name: --card`) and inside
//! `@property` / `@container` preludes.
//!
//! The pieces, leaf first:
//! - [`compose_suffix`] turns the configured delimiter, hash and length cap into the suffix.
//! - [`PrefixFilter`] decides per identifier whether it is renamed.
//! - [`matcher`] finds custom property identifiers in property names, values and at-rule params.
//! - [`Rewriter`] runs the three over single nodes and produces replacement nodes, at most once
//!   per node.

#![forbid(unsafe_code)]

mod filter;
pub mod matcher;
mod rewriter;
mod suffix;

pub use filter::PrefixFilter;
pub use matcher::{Identifier, SyntacticPosition};
pub use rewriter::{RewritePolicy, Rewriter, Rewritten};
pub use suffix::{DEFAULT_DELIMITER, compose_suffix};

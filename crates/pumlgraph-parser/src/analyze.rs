//! Semantic analysis of a parsed document.
//!
//! Three passes run in order over the whole tree, each reporting through the
//! [`DiagnosticContext`] without stopping at the first problem:
//!
//! 1. [`names`]: registers every map and rectangle in the flat id/name
//!    namespace and records its qualified paths and parent.
//! 2. [`links`]: resolves both endpoints of every link.
//! 3. [`classify`]: retags nodes as root, group, program system or external
//!    system, and folds map properties.
//!
//! [`extract`] then walks the finished tree and produces the [`Graph`].

mod classify;
mod extract;
mod links;
mod names;

use log::debug;
use pumlgraph_core::semantic::Graph;

use crate::{error::DiagnosticContext, tree::Node};

pub use names::SymbolTable;

/// Run the three semantic passes over `tree`.
pub fn analyze(tree: &mut Node, ctx: &DiagnosticContext<'_>) -> SymbolTable {
    let symbols = names::collect(tree, ctx);
    debug!(objects = symbols.len(); "Collected object names");

    let unresolved = links::resolve(tree, &symbols, ctx);
    debug!(unresolved = unresolved; "Resolved links");

    classify::classify(tree, ctx);
    debug!(severity:% = ctx.max_severity(); "Classified nodes");

    symbols
}

/// Produce the output graph from an analyzed tree.
pub fn extract(tree: &Node) -> Graph {
    extract::extract(tree)
}

//! Link endpoint resolution.

use crate::{
    analyze::SymbolTable,
    error::{Diagnostic, DiagnosticContext, ErrorCode},
    escape,
    tree::{Node, NodeBody},
    visit::{VisitorMut, walk_children_mut},
};

struct LinkResolver<'a> {
    symbols: &'a SymbolTable,
    ctx: &'a DiagnosticContext<'a>,
    unresolved: usize,
}

impl LinkResolver<'_> {
    fn lookup(&mut self, node: &Node, reference: &str) -> Option<usize> {
        let found = self.symbols.num_id(reference);
        if found.is_none() {
            self.unresolved += 1;
            self.ctx.report(
                Diagnostic::error(format!(
                    "An unresolved object reference: '{}', {}",
                    escape::encode_str(reference),
                    node.source_ref.brief()
                ))
                .with_code(ErrorCode::E204)
                .with_source_ref(node.source_ref.clone()),
            );
        }
        found
    }
}

impl VisitorMut for LinkResolver<'_> {
    fn visit_node(&mut self, node: &mut Node) {
        walk_children_mut(self, node);
    }

    fn visit_link(&mut self, node: &mut Node) {
        let NodeBody::Link(link) = &node.body else {
            return;
        };
        let (id1, id2) = (link.id1.clone(), link.id2.clone());

        let num_id1 = self.lookup(node, &id1);
        let num_id2 = self.lookup(node, &id2);

        if let NodeBody::Link(link) = &mut node.body {
            link.num_id1 = num_id1;
            link.num_id2 = num_id2;
        }
    }
}

/// Resolve both endpoints of every link. Returns the number of unresolved
/// endpoints.
pub(super) fn resolve(tree: &mut Node, symbols: &SymbolTable, ctx: &DiagnosticContext<'_>) -> usize {
    let mut resolver = LinkResolver {
        symbols,
        ctx,
        unresolved: 0,
    };
    tree.accept_mut(&mut resolver);
    resolver.unresolved
}

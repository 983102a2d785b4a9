//! Object registration in the flat id/name namespace.

use std::collections::HashMap;

use crate::{
    error::{Diagnostic, DiagnosticContext, ErrorCode},
    escape,
    source::SourceRef,
    tree::{Node, Registration},
    visit::{VisitorMut, walk_children_mut},
};

#[derive(Debug, Clone)]
struct Entry {
    num_id: usize,
    source_ref: SourceRef,
}

/// Registered objects by id and by name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    ids: HashMap<String, Entry>,
    names: HashMap<String, Entry>,
}

impl SymbolTable {
    /// Numeric id of the object with textual id `id`.
    pub fn num_id(&self, id: &str) -> Option<usize> {
        self.ids.get(id).map(|entry| entry.num_id)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// An enclosing rectangle during the traversal.
#[derive(Debug)]
struct Ancestor {
    id: String,
    name: String,
    num_id: Option<usize>,
}

/// A clash between the object being registered and an earlier one.
struct Conflict {
    code: ErrorCode,
    what: &'static str,
    value: String,
    original: Entry,
}

struct NameCollector<'c> {
    ctx: &'c DiagnosticContext<'c>,
    symbols: SymbolTable,
    ancestors: Vec<Ancestor>,
}

impl NameCollector<'_> {
    fn conflicts(&self, id: &str, name: &str) -> Vec<Conflict> {
        let mut checks = vec![
            (
                self.symbols.ids.get(id),
                ErrorCode::E200,
                "An object's ID duplicates another object's ID. ID",
                id,
            ),
            (
                self.symbols.names.get(id),
                ErrorCode::E201,
                "An object's ID duplicates another object's name. ID/name",
                id,
            ),
        ];
        if name != id {
            checks.push((
                self.symbols.ids.get(name),
                ErrorCode::E202,
                "An object's name duplicates another object's ID. Name/ID",
                name,
            ));
            checks.push((
                self.symbols.names.get(name),
                ErrorCode::E203,
                "An object's name duplicates another object's name. name",
                name,
            ));
        }

        // one conflict per earlier object
        let mut conflicts: Vec<Conflict> = Vec::new();
        for (entry, code, what, value) in checks {
            let Some(entry) = entry else { continue };
            if conflicts.iter().any(|c| c.original.num_id == entry.num_id) {
                continue;
            }
            conflicts.push(Conflict {
                code,
                what,
                value: value.to_string(),
                original: entry.clone(),
            });
        }
        conflicts
    }

    /// Register a map or rectangle. Returns its numeric id, or `None` if it
    /// clashes with an earlier object.
    fn register(&mut self, node: &mut Node) -> Option<usize> {
        let source_ref = node.source_ref.clone();
        let (id, name) = {
            let header = node.header()?;
            (header.id.clone(), header.name.clone())
        };

        let conflicts = self.conflicts(&id, &name);
        for conflict in &conflicts {
            self.ctx.report(
                Diagnostic::error(format!(
                    "{}='{}', {}",
                    conflict.what,
                    escape::encode_str(&conflict.value),
                    source_ref.brief()
                ))
                .with_code(conflict.code)
                .with_source_ref(source_ref.clone()),
            );
            self.ctx.report(
                Diagnostic::note(format!(
                    "The object mentioned above: {}",
                    conflict.original.source_ref.brief()
                ))
                .with_code(ErrorCode::E290)
                .with_source_ref(conflict.original.source_ref.clone()),
            );
        }
        if !conflicts.is_empty() {
            return None;
        }

        let num_id = self.symbols.ids.len();
        let entry = Entry {
            num_id,
            source_ref,
        };
        self.symbols.ids.insert(id, entry.clone());
        self.symbols.names.insert(name, entry);

        let parent = self.ancestors.last();
        let registration = Registration {
            num_id,
            id_path: self.ancestors.iter().map(|a| a.id.clone()).collect(),
            name_path: self.ancestors.iter().map(|a| a.name.clone()).collect(),
            num_parent_id: parent.and_then(|a| a.num_id),
            parent_id: parent.map(|a| a.id.clone()),
        };
        if let Some(header) = node.header_mut() {
            header.registration = Some(registration);
        }
        Some(num_id)
    }
}

impl VisitorMut for NameCollector<'_> {
    fn visit_node(&mut self, node: &mut Node) {
        walk_children_mut(self, node);
    }

    fn visit_map(&mut self, node: &mut Node) {
        self.register(node);
    }

    fn visit_rectangle(&mut self, node: &mut Node) {
        let num_id = self.register(node);
        let Some(header) = node.header() else {
            return;
        };
        self.ancestors.push(Ancestor {
            id: header.id.clone(),
            name: header.name.clone(),
            num_id,
        });
        walk_children_mut(self, node);
        self.ancestors.pop();
    }
}

/// Register every object of `tree`, pre-order.
pub(super) fn collect(tree: &mut Node, ctx: &DiagnosticContext<'_>) -> SymbolTable {
    let mut collector = NameCollector {
        ctx,
        symbols: SymbolTable::default(),
        ancestors: Vec::new(),
    };
    tree.accept_mut(&mut collector);
    collector.symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze::tests::parse_tree, error::MemorySink, tree::Header};

    fn registration(node: &Node) -> Option<&Registration> {
        node.header().and_then(|h: &Header| h.registration.as_ref())
    }

    #[test]
    fn test_sequential_ids_and_paths() {
        let mut tree = parse_tree(
            "@startuml\n\
             rectangle \"Outer\" as o {\n\
               vm \"Inner\" as i {\n\
                 map \"Leaf\" as l {\n}\n\
               }\n\
             }\n\
             map m {\n}\n\
             @enduml",
        );
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let symbols = collect(&mut tree, &ctx);

        assert!(sink.is_empty());
        assert_eq!(symbols.len(), 4);
        assert_eq!(symbols.num_id("o"), Some(0));
        assert_eq!(symbols.num_id("i"), Some(1));
        assert_eq!(symbols.num_id("l"), Some(2));
        assert_eq!(symbols.num_id("m"), Some(3));
        assert_eq!(symbols.num_id("Outer"), None);

        let outer = &tree.children()[0];
        let inner = &outer.children()[0];
        let leaf = registration(&inner.children()[0]).unwrap();
        assert_eq!(leaf.id_path, ["o", "i"]);
        assert_eq!(leaf.name_path, ["Outer", "Inner"]);
        assert_eq!(leaf.num_parent_id, Some(1));
        assert_eq!(leaf.parent_id.as_deref(), Some("i"));

        let root_level = registration(&tree.children()[1]).unwrap();
        assert!(root_level.id_path.is_empty());
        assert_eq!(root_level.num_parent_id, None);
        assert_eq!(root_level.parent_id, None);
        assert!(registration(outer).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_duplicate_id_reports_once_per_original() {
        let mut tree = parse_tree("@startuml\nmap x {\n}\nmap x {\n}\n@enduml");
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        collect(&mut tree, &ctx);

        assert_eq!(
            sink.lines(),
            [
                "Error: An object's ID duplicates another object's ID. ID='x', file t.puml, line 4, col 1",
                "Note: The object mentioned above: file t.puml, line 2, col 1",
            ]
        );
        assert!(registration(&tree.children()[1]).is_none());
    }

    #[test]
    fn test_id_and_name_cross_collisions() {
        let mut tree = parse_tree(
            "@startuml\n\
             map \"A\" as a {\n}\n\
             map \"a\" as b {\n}\n\
             map \"c\" as A {\n}\n\
             @enduml",
        );
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let symbols = collect(&mut tree, &ctx);

        let codes: Vec<_> = sink.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(
            codes,
            [
                Some(ErrorCode::E202),
                Some(ErrorCode::E290),
                Some(ErrorCode::E201),
                Some(ErrorCode::E290),
            ]
        );
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_children_of_rejected_rectangle_are_registered() {
        let mut tree = parse_tree(
            "@startuml\n\
             map g {\n}\n\
             group g {\n\
               map inner {\n}\n\
             }\n\
             @enduml",
        );
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let symbols = collect(&mut tree, &ctx);

        assert_eq!(sink.len(), 2);
        assert_eq!(symbols.num_id("inner"), Some(1));

        let inner = registration(&tree.children()[1].children()[0]).unwrap();
        assert_eq!(inner.id_path, ["g"]);
        assert_eq!(inner.num_parent_id, None);
    }
}

//! Node classification and property folding.

use indexmap::{IndexMap, map::Entry};

use crate::{
    error::{Diagnostic, DiagnosticContext, ErrorCode},
    escape,
    tree::{Node, NodeBody, NodeKind},
    visit::{VisitorMut, walk_children_mut},
};

struct Classifier<'a> {
    ctx: &'a DiagnosticContext<'a>,
    /// Objects entered so far.
    objects: usize,
}

impl Classifier<'_> {
    fn fold(&self, properties: &[Node]) -> IndexMap<String, String> {
        let mut folded = IndexMap::new();
        for property in properties {
            let NodeBody::Property(def) = &property.body else {
                continue;
            };
            match folded.entry(def.key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(def.value.clone());
                }
                Entry::Occupied(_) => self.ctx.report(
                    Diagnostic::error(format!(
                        "A duplicate property found in a map object, id='{}', {}",
                        escape::encode_str(&def.key),
                        property.source_ref.brief()
                    ))
                    .with_code(ErrorCode::E205)
                    .with_source_ref(property.source_ref.clone()),
                ),
            }
        }
        folded
    }
}

impl VisitorMut for Classifier<'_> {
    fn visit_node(&mut self, node: &mut Node) {
        walk_children_mut(self, node);
    }

    fn visit_document(&mut self, node: &mut Node) {
        self.objects = 0;
        walk_children_mut(self, node);
        node.kind = NodeKind::Root;
    }

    // Groups and external systems fall back here, so a second run
    // reclassifies them from scratch.
    fn visit_rectangle(&mut self, node: &mut Node) {
        self.objects += 1;
        let before = self.objects;
        walk_children_mut(self, node);
        node.kind = if self.objects != before {
            NodeKind::Group
        } else {
            NodeKind::ExtProgramSystem
        };
    }

    fn visit_map(&mut self, node: &mut Node) {
        self.objects += 1;
        if let NodeBody::Map(map) = &mut node.body {
            map.folded = self.fold(&map.properties);
        }
        node.kind = NodeKind::ProgramSystem;
    }

    fn visit_program_system(&mut self, node: &mut Node) {
        self.visit_map(node);
    }
}

/// Retag the document as root, rectangles as groups or external systems and
/// maps as program systems.
pub(super) fn classify(tree: &mut Node, ctx: &DiagnosticContext<'_>) {
    let mut classifier = Classifier { ctx, objects: 0 };
    tree.accept_mut(&mut classifier);
}

//! Output extraction from a classified tree.

use pumlgraph_core::semantic::{Graph, LinkRecord, ObjectPlacement, ObjectRecord};

use crate::{
    tree::{Node, NodeBody},
    visit::{Visitor, walk_children},
};

#[derive(Default)]
struct Extractor {
    objects: Vec<ObjectRecord>,
    links: Vec<LinkRecord>,
}

/// Placement of a registered object, `None` for one rejected by the name pass.
fn placement(node: &Node) -> Option<ObjectPlacement> {
    let header = node.header()?;
    let registration = header.registration.as_ref()?;
    Some(ObjectPlacement {
        num_id: registration.num_id,
        id: header.id.clone(),
        name: header.name.clone(),
        id_path: registration.id_path.clone(),
        name_path: registration.name_path.clone(),
        num_parent_id: registration.num_parent_id,
        parent_id: registration.parent_id.clone(),
        src_ref: node.source_ref.to_string(),
    })
}

impl Visitor for Extractor {
    fn visit_node(&mut self, node: &Node) {
        walk_children(self, node);
    }

    fn visit_group(&mut self, node: &Node) {
        if let (Some(placement), NodeBody::Rectangle(rect)) = (placement(node), &node.body) {
            self.objects.push(ObjectRecord::group(placement, rect.group_type));
        }
        walk_children(self, node);
    }

    fn visit_ext_program_system(&mut self, node: &Node) {
        if let (Some(placement), NodeBody::Rectangle(rect)) = (placement(node), &node.body) {
            self.objects.push(ObjectRecord::external_system(placement, rect.group_type));
        }
    }

    fn visit_program_system(&mut self, node: &Node) {
        if let (Some(placement), NodeBody::Map(map)) = (placement(node), &node.body) {
            self.objects.push(ObjectRecord::program_system(placement, map.folded.clone()));
        }
    }

    fn visit_link(&mut self, node: &Node) {
        if let NodeBody::Link(link) = &node.body {
            self.links.push(LinkRecord::new(
                (link.id1.clone(), link.num_id1),
                (link.id2.clone(), link.num_id2),
                link.direction,
                link.info.clone(),
                node.source_ref.to_string(),
            ));
        }
    }
}

/// Collect object records in pre-order and link records in source order.
pub(super) fn extract(tree: &Node) -> Graph {
    let mut extractor = Extractor::default();
    tree.accept(&mut extractor);
    Graph::new(extractor.objects, extractor.links)
}

#[cfg(test)]
mod tests {
    use pumlgraph_core::semantic::{GroupType, LinkDirection, ObjectKind};

    use super::*;
    use crate::{
        analyze::{analyze, tests::parse_tree},
        error::{DiagnosticContext, MemorySink},
    };

    fn graph(text: &str) -> Graph {
        let mut tree = parse_tree(text);
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        analyze(&mut tree, &ctx);
        assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.lines());
        extract(&tree)
    }

    #[test]
    fn test_objects_in_preorder() {
        let graph = graph(
            "@startuml\n\
             computer \"Host\" as h {\n\
             map \"Api\" as api {\n\
             Info => Serves requests\n\
             Stack => rust\n\
             }\n\
             vm guest {\n\
             }\n\
             }\n\
             @enduml",
        );
        let objects = graph.objects();
        assert_eq!(objects.len(), 3);

        assert_eq!(objects[0].kind(), ObjectKind::Group);
        assert_eq!(objects[0].group_type(), Some(GroupType::Computer));
        assert_eq!(objects[0].description(), "Host");
        assert_eq!(objects[0].num_parent_id(), -1);
        assert_eq!(objects[0].src_ref(), "File t.puml, line 2, column 1");

        assert_eq!(objects[1].kind(), ObjectKind::ProgramSystem);
        assert_eq!(objects[1].qid(), "h:api");
        assert_eq!(objects[1].qname(), "Host→Api");
        assert_eq!(objects[1].num_parent_id(), 0);
        assert_eq!(objects[1].parent_id(), Some("h"));
        assert_eq!(objects[1].description(), "Serves requests");
        assert_eq!(objects[1].stack(), Some("rust"));
        assert_eq!(objects[1].team(), Some(""));

        assert_eq!(objects[2].kind(), ObjectKind::ExtProgramSystem);
        assert_eq!(objects[2].group_type(), Some(GroupType::Vm));
        assert_eq!(objects[2].num_id(), 2);
    }

    #[test]
    fn test_links_keep_source_order() {
        let graph = graph(
            "@startuml\n\
             map a {\n}\n\
             map b {\n}\n\
             b <- a : pull\n\
             a - b\n\
             @enduml",
        );
        let links = graph.links();
        assert_eq!(links.len(), 2);
        assert_eq!((links[0].id1(), links[0].id2()), ("b", "a"));
        assert_eq!((links[0].num_id1(), links[0].num_id2()), (1, 0));
        assert_eq!(links[0].direction(), LinkDirection::BACKWARD);
        assert_eq!(links[0].info(), Some("pull"));
        assert_eq!(links[1].direction(), LinkDirection::PLAIN);
        assert_eq!(links[1].info(), None);
        assert_eq!(links[1].src_ref(), "File t.puml, line 7, column 1");
    }
}

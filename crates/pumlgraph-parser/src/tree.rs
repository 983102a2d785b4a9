//! The attributed tree built by the parser and annotated by the semantic
//! passes.
//!
//! Every node has a [`NodeKind`], which the passes may reclassify, and a
//! [`NodeBody`] with the fields of the grammar production that built it.

use std::fmt;

use indexmap::IndexMap;
use pumlgraph_core::semantic::{GroupType, LinkDirection};

use crate::source::SourceRef;

/// Dispatch tag of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document as parsed.
    Puml,
    /// The document after classification.
    Root,
    /// A `map`, or a `service` with a property body.
    Map,
    /// A map after classification.
    ProgramSystem,
    /// A rectangle-family definition.
    Rectangle,
    /// A rectangle with at least one nested object.
    Group,
    /// A rectangle without nested objects.
    ExtProgramSystem,
    Property,
    Link,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Puml => "puml",
            NodeKind::Root => "root",
            NodeKind::Map => "map",
            NodeKind::ProgramSystem => "program_system",
            NodeKind::Rectangle => "rectangle",
            NodeKind::Group => "group",
            NodeKind::ExtProgramSystem => "ext_program_system",
            NodeKind::Property => "property",
            NodeKind::Link => "link",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an object assigned by the name pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub num_id: usize,
    /// Ancestor ids, root first, excluding the object itself.
    pub id_path: Vec<String>,
    /// Ancestor names, root first, excluding the object itself.
    pub name_path: Vec<String>,
    pub num_parent_id: Option<usize>,
    pub parent_id: Option<String>,
}

/// Id and display name shared by maps and rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: String,
    pub name: String,
    /// `None` until registered, or if registration failed.
    pub registration: Option<Registration>,
}

impl Header {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            registration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDef {
    pub header: Header,
    /// [`NodeKind::Property`] nodes in source order.
    pub properties: Vec<Node>,
    /// Property values by key, first occurrence wins. Filled by classification.
    pub folded: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectangleDef {
    pub header: Header,
    pub group_type: GroupType,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDef {
    pub id1: String,
    pub id2: String,
    /// Resolved by the link pass; `None` if unresolved.
    pub num_id1: Option<usize>,
    pub num_id2: Option<usize>,
    pub direction: LinkDirection,
    pub info: Option<String>,
}

/// Fields of a node, one variant per grammar production.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Document(Vec<Node>),
    Map(MapDef),
    Rectangle(RectangleDef),
    Property(PropertyDef),
    Link(LinkDef),
}

/// A node of the attributed tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub source_ref: SourceRef,
    pub body: NodeBody,
}

impl Node {
    pub fn document(source_ref: SourceRef, children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Puml,
            source_ref,
            body: NodeBody::Document(children),
        }
    }

    pub fn map(source_ref: SourceRef, header: Header, properties: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Map,
            source_ref,
            body: NodeBody::Map(MapDef {
                header,
                properties,
                folded: IndexMap::new(),
            }),
        }
    }

    pub fn rectangle(
        source_ref: SourceRef,
        header: Header,
        group_type: GroupType,
        children: Vec<Node>,
    ) -> Self {
        Self {
            kind: NodeKind::Rectangle,
            source_ref,
            body: NodeBody::Rectangle(RectangleDef {
                header,
                group_type,
                children,
            }),
        }
    }

    pub fn property(source_ref: SourceRef, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Property,
            source_ref,
            body: NodeBody::Property(PropertyDef {
                key: key.into(),
                value: value.into(),
            }),
        }
    }

    pub fn link(
        source_ref: SourceRef,
        id1: impl Into<String>,
        id2: impl Into<String>,
        direction: LinkDirection,
        info: Option<String>,
    ) -> Self {
        Self {
            kind: NodeKind::Link,
            source_ref,
            body: NodeBody::Link(LinkDef {
                id1: id1.into(),
                id2: id2.into(),
                num_id1: None,
                num_id2: None,
                direction,
                info,
            }),
        }
    }

    /// Child nodes in order: document definitions, map properties or
    /// rectangle contents.
    pub fn children(&self) -> &[Node] {
        match &self.body {
            NodeBody::Document(children) => children,
            NodeBody::Map(map) => &map.properties,
            NodeBody::Rectangle(rect) => &rect.children,
            NodeBody::Property(_) | NodeBody::Link(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match &mut self.body {
            NodeBody::Document(children) => children,
            NodeBody::Map(map) => &mut map.properties,
            NodeBody::Rectangle(rect) => &mut rect.children,
            NodeBody::Property(_) | NodeBody::Link(_) => &mut [],
        }
    }

    /// The id/name header of a map or rectangle.
    pub fn header(&self) -> Option<&Header> {
        match &self.body {
            NodeBody::Map(map) => Some(&map.header),
            NodeBody::Rectangle(rect) => Some(&rect.header),
            _ => None,
        }
    }

    pub fn header_mut(&mut self) -> Option<&mut Header> {
        match &mut self.body {
            NodeBody::Map(map) => Some(&mut map.header),
            NodeBody::Rectangle(rect) => Some(&mut rect.header),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> SourceRef {
        SourceRef::new(Some("t.puml"), Some(1), Some(1))
    }

    #[test]
    fn test_children_by_body() {
        let map = Node::map(
            here(),
            Header::new("m", "M"),
            vec![Node::property(here(), "k", "v")],
        );
        let rect = Node::rectangle(here(), Header::new("r", "R"), GroupType::Vm, vec![map]);
        let link = Node::link(here(), "m", "r", LinkDirection::PLAIN, None);
        let doc = Node::document(here(), vec![rect, link]);

        assert_eq!(doc.children().len(), 2);
        assert_eq!(doc.children()[0].children()[0].children().len(), 1);
        assert!(doc.children()[1].children().is_empty());
        assert_eq!(doc.count(), 5);
    }

    #[test]
    fn test_header_access() {
        let mut rect = Node::rectangle(here(), Header::new("r", "R"), GroupType::Group, vec![]);
        assert_eq!(rect.header().map(|h| h.id.as_str()), Some("r"));

        if let Some(header) = rect.header_mut() {
            header.name = "Renamed".to_string();
        }
        assert_eq!(rect.header().map(|h| h.name.as_str()), Some("Renamed"));

        let prop = Node::property(here(), "k", "v");
        assert!(prop.header().is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::ExtProgramSystem.to_string(), "ext_program_system");
        assert_eq!(NodeKind::Puml.as_str(), "puml");
    }
}

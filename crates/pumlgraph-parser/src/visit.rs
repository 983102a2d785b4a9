//! Kind-based dispatch over the attributed tree.
//!
//! [`Node::accept`] calls the most specific visitor method for the node's
//! current [`NodeKind`]. Every specific method falls back to a less
//! specific one by default, ending at the required `visit_node`:
//!
//! ```text
//! visit_program_system     -> visit_map       -> visit_object -> visit_node
//! visit_group              -> visit_rectangle -> visit_object -> visit_node
//! visit_ext_program_system -> visit_rectangle -> visit_object -> visit_node
//! visit_puml, visit_root   -> visit_document                  -> visit_node
//! visit_property, visit_link                                  -> visit_node
//! ```
//!
//! A pass overrides only the methods for the roles it cares about.

use crate::tree::{Node, NodeKind};

/// Read-only tree visitor.
pub trait Visitor {
    /// Generic fallback for every node.
    fn visit_node(&mut self, node: &Node);

    fn visit_document(&mut self, node: &Node) {
        self.visit_node(node)
    }

    fn visit_puml(&mut self, node: &Node) {
        self.visit_document(node)
    }

    fn visit_root(&mut self, node: &Node) {
        self.visit_document(node)
    }

    /// Any map or rectangle.
    fn visit_object(&mut self, node: &Node) {
        self.visit_node(node)
    }

    fn visit_map(&mut self, node: &Node) {
        self.visit_object(node)
    }

    fn visit_program_system(&mut self, node: &Node) {
        self.visit_map(node)
    }

    fn visit_rectangle(&mut self, node: &Node) {
        self.visit_object(node)
    }

    fn visit_group(&mut self, node: &Node) {
        self.visit_rectangle(node)
    }

    fn visit_ext_program_system(&mut self, node: &Node) {
        self.visit_rectangle(node)
    }

    fn visit_property(&mut self, node: &Node) {
        self.visit_node(node)
    }

    fn visit_link(&mut self, node: &Node) {
        self.visit_node(node)
    }
}

/// Tree visitor that may annotate or reclassify nodes.
pub trait VisitorMut {
    /// Generic fallback for every node.
    fn visit_node(&mut self, node: &mut Node);

    fn visit_document(&mut self, node: &mut Node) {
        self.visit_node(node)
    }

    fn visit_puml(&mut self, node: &mut Node) {
        self.visit_document(node)
    }

    fn visit_root(&mut self, node: &mut Node) {
        self.visit_document(node)
    }

    /// Any map or rectangle.
    fn visit_object(&mut self, node: &mut Node) {
        self.visit_node(node)
    }

    fn visit_map(&mut self, node: &mut Node) {
        self.visit_object(node)
    }

    fn visit_program_system(&mut self, node: &mut Node) {
        self.visit_map(node)
    }

    fn visit_rectangle(&mut self, node: &mut Node) {
        self.visit_object(node)
    }

    fn visit_group(&mut self, node: &mut Node) {
        self.visit_rectangle(node)
    }

    fn visit_ext_program_system(&mut self, node: &mut Node) {
        self.visit_rectangle(node)
    }

    fn visit_property(&mut self, node: &mut Node) {
        self.visit_node(node)
    }

    fn visit_link(&mut self, node: &mut Node) {
        self.visit_node(node)
    }
}

impl Node {
    /// Dispatch `visitor` on this node.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self.kind {
            NodeKind::Puml => visitor.visit_puml(self),
            NodeKind::Root => visitor.visit_root(self),
            NodeKind::Map => visitor.visit_map(self),
            NodeKind::ProgramSystem => visitor.visit_program_system(self),
            NodeKind::Rectangle => visitor.visit_rectangle(self),
            NodeKind::Group => visitor.visit_group(self),
            NodeKind::ExtProgramSystem => visitor.visit_ext_program_system(self),
            NodeKind::Property => visitor.visit_property(self),
            NodeKind::Link => visitor.visit_link(self),
        }
    }

    /// Dispatch a mutating `visitor` on this node.
    pub fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        match self.kind {
            NodeKind::Puml => visitor.visit_puml(self),
            NodeKind::Root => visitor.visit_root(self),
            NodeKind::Map => visitor.visit_map(self),
            NodeKind::ProgramSystem => visitor.visit_program_system(self),
            NodeKind::Rectangle => visitor.visit_rectangle(self),
            NodeKind::Group => visitor.visit_group(self),
            NodeKind::ExtProgramSystem => visitor.visit_ext_program_system(self),
            NodeKind::Property => visitor.visit_property(self),
            NodeKind::Link => visitor.visit_link(self),
        }
    }
}

/// Visit the children of `node` in order.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) {
    for child in node.children() {
        child.accept(visitor);
    }
}

/// Visit the children of `node` in order, mutably.
pub fn walk_children_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Node) {
    for child in node.children_mut() {
        child.accept_mut(visitor);
    }
}

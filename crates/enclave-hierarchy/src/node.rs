use std::collections::BTreeSet;

use enclave_names::TypeName;

use crate::descriptor::ClassDescriptor;

/// One entry of the hierarchy graph.
///
/// A `Real` node carries full type metadata; a `Ghost` is a placeholder for a
/// name referenced as a supertype before its own descriptor arrives, and is
/// promoted in place once it does. Ghost parents are empty by construction:
/// nothing is known about a ghost beyond the children that pointed at it.
///
/// Edges are stored by name in `BTreeSet`s. The hierarchy map exclusively
/// owns every node; names are the only handle that ever crosses the API
/// boundary, so traversal order (and with it the first-reported verification
/// violation and the ambiguity candidate order) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Real {
        descriptor: ClassDescriptor,
        parents: BTreeSet<TypeName>,
        children: BTreeSet<TypeName>,
    },
    Ghost {
        name: TypeName,
        children: BTreeSet<TypeName>,
    },
}

impl Node {
    pub(crate) fn real(descriptor: ClassDescriptor) -> Self {
        Node::Real {
            descriptor,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
        }
    }

    pub(crate) fn ghost(name: TypeName) -> Self {
        Node::Ghost {
            name,
            children: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &TypeName {
        match self {
            Node::Real { descriptor, .. } => &descriptor.name,
            Node::Ghost { name, .. } => name,
        }
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, Node::Ghost { .. })
    }

    /// The descriptor of a real node. A ghost may never be queried for its
    /// descriptor.
    pub fn descriptor(&self) -> Option<&ClassDescriptor> {
        match self {
            Node::Real { descriptor, .. } => Some(descriptor),
            Node::Ghost { .. } => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.descriptor().is_some_and(|d| d.is_interface)
    }

    pub fn is_final(&self) -> bool {
        self.descriptor().is_some_and(|d| d.is_final)
    }

    pub fn children(&self) -> &BTreeSet<TypeName> {
        match self {
            Node::Real { children, .. } => children,
            Node::Ghost { children, .. } => children,
        }
    }

    pub fn parents(&self) -> &BTreeSet<TypeName> {
        static EMPTY: BTreeSet<TypeName> = BTreeSet::new();
        match self {
            Node::Real { parents, .. } => parents,
            // Ghost parents are empty by construction.
            Node::Ghost { .. } => &EMPTY,
        }
    }

    pub(crate) fn add_child(&mut self, child: TypeName) {
        match self {
            Node::Real { children, .. } => children.insert(child),
            Node::Ghost { children, .. } => children.insert(child),
        };
    }

    pub(crate) fn add_parent(&mut self, parent: TypeName) {
        match self {
            Node::Real { parents, .. } => {
                parents.insert(parent);
            }
            Node::Ghost { name, .. } => {
                unreachable!("ghost {name} may not grow parent edges")
            }
        }
    }

    /// Take the child set out of a node, used when promoting a ghost: the
    /// replacing real node inherits every child edge the ghost held. The
    /// children's own parent edges are by name and stay valid as-is.
    pub(crate) fn take_children(&mut self) -> BTreeSet<TypeName> {
        match self {
            Node::Real { children, .. } => std::mem::take(children),
            Node::Ghost { children, .. } => std::mem::take(children),
        }
    }
}

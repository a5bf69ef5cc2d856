use std::collections::{BTreeSet, HashMap};
use std::ops::Deref;

use enclave_names::{well_known, TypeName};
use thiserror::Error;

use crate::descriptor::ClassDescriptor;
use crate::node::Node;
use crate::verify::{verify, VerificationResult};

/// Which of the two fixed hierarchy shapes was selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single root node for the universal base type; used while examining
    /// the input program in its original namespace.
    PreRename,
    /// The nine-node shadow backbone; used for the rewritten program.
    PostRename,
}

/// Structural-input errors raised during [`Hierarchy::add`].
///
/// All of these are fatal to the current build: the hierarchy must not be
/// used further once `add` has failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("class {0} was added twice")]
    DuplicateClass(TypeName),
    #[error("class {0} subclasses the universal base type directly; post-rename classes must descend from the shadow backbone")]
    IllegalObjectSubclass(TypeName),
    #[error("descriptor for {0} names no supertype")]
    MissingSupertypes(TypeName),
    #[error("descriptor for {0} names both a superclass and interfaces")]
    ConflictingSupertypes(TypeName),
    #[error("descriptor for {name} (pre_rename = {pre_rename}) does not belong to the {shape:?} hierarchy")]
    NamespaceMismatch {
        name: TypeName,
        pre_rename: bool,
        shape: Shape,
    },
}

/// An incrementally-built, multi-rooted class/interface graph keyed by
/// fully-qualified type name.
///
/// Descriptors may be added in any order: a supertype referenced before its
/// own descriptor arrives is held as a ghost node and promoted later. The
/// intended lifecycle is build once ([`add`](Self::add) repeatedly), verify
/// once ([`verified`](Self::verified)), then query any number of times,
/// sequentially.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    shape: Shape,
    root: TypeName,
    nodes: HashMap<TypeName, Node>,
}

impl Hierarchy {
    /// The pre-rename shape: just the universal base type.
    pub fn pre_rename() -> Self {
        let root = well_known::object().clone();
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node::real(ClassDescriptor {
                name: root.clone(),
                superclass: None,
                interfaces: Vec::new(),
                is_interface: false,
                is_final: false,
                is_pre_rename: true,
            }),
        );
        tracing::debug!(shape = ?Shape::PreRename, "built hierarchy backbone");
        Self {
            shape: Shape::PreRename,
            root,
            nodes,
        }
    }

    /// The post-rename shape: the shadow backbone present in every rewritten
    /// program regardless of its content.
    ///
    /// Wiring: universal root -> root interface -> shadow base class; the
    /// shadow Comparable/Serializable interfaces under the root interface;
    /// shadow Enum under the shadow base class and both interfaces; the
    /// shadow Throwable/Exception/RuntimeException chain under the shadow
    /// base class.
    pub fn post_rename() -> Self {
        let root = well_known::object().clone();
        let mut this = Self {
            shape: Shape::PostRename,
            root: root.clone(),
            nodes: HashMap::new(),
        };

        this.insert_builtin(root.clone(), false, &[]);
        this.insert_builtin(well_known::root_interface().clone(), true, &[&root]);
        this.insert_builtin(
            well_known::shadow_object().clone(),
            false,
            &[well_known::root_interface()],
        );
        this.insert_builtin(
            well_known::shadow_comparable().clone(),
            true,
            &[well_known::root_interface()],
        );
        this.insert_builtin(
            well_known::shadow_serializable().clone(),
            true,
            &[well_known::root_interface()],
        );
        this.insert_builtin(
            well_known::shadow_enum().clone(),
            false,
            &[
                well_known::shadow_object(),
                well_known::shadow_comparable(),
                well_known::shadow_serializable(),
            ],
        );
        this.insert_builtin(
            well_known::shadow_throwable().clone(),
            false,
            &[well_known::shadow_object()],
        );
        this.insert_builtin(
            well_known::shadow_exception().clone(),
            false,
            &[well_known::shadow_throwable()],
        );
        this.insert_builtin(
            well_known::shadow_runtime_exception().clone(),
            false,
            &[well_known::shadow_exception()],
        );

        tracing::debug!(shape = ?Shape::PostRename, nodes = this.nodes.len(), "built hierarchy backbone");
        this
    }

    // Backbone nodes bypass `add`: their edges are fixed and deliberately
    // include shapes `add` would reject, like the root interface sitting
    // directly under the universal base type.
    fn insert_builtin(&mut self, name: TypeName, is_interface: bool, parents: &[&TypeName]) {
        let (interfaces, concrete): (Vec<&TypeName>, Vec<&TypeName>) = parents
            .iter()
            .copied()
            .partition(|&parent| self.is_interface(parent));
        let descriptor = ClassDescriptor {
            name: name.clone(),
            superclass: concrete.first().map(|parent| (*parent).clone()),
            interfaces: interfaces.iter().map(|parent| (*parent).clone()).collect(),
            is_interface,
            is_final: false,
            is_pre_rename: false,
        };
        self.nodes.insert(name.clone(), Node::real(descriptor));
        for parent in parents {
            self.wire_edge(parent, &name);
        }
    }

    fn wire_edge(&mut self, parent: &TypeName, child: &TypeName) {
        self.nodes
            .get_mut(parent)
            .unwrap_or_else(|| panic!("edge references unregistered node {parent}"))
            .add_child(child.clone());
        self.nodes
            .get_mut(child)
            .unwrap_or_else(|| panic!("edge references unregistered node {child}"))
            .add_parent(parent.clone());
    }

    /// Insert `descriptor` as a real node.
    ///
    /// Supertypes not yet seen are registered as ghosts; a ghost already
    /// registered under `descriptor.name` is promoted, inheriting every child
    /// edge it held. Re-adding one of the pre-populated shadow backbone types
    /// (Enum, Comparable, Serializable, Throwable, Exception,
    /// RuntimeException) is a no-op.
    pub fn add(&mut self, descriptor: ClassDescriptor) -> crate::Result<()> {
        if descriptor.is_pre_rename != (self.shape == Shape::PreRename) {
            return Err(HierarchyError::NamespaceMismatch {
                name: descriptor.name,
                pre_rename: descriptor.is_pre_rename,
                shape: self.shape,
            });
        }

        if self.shape == Shape::PostRename && well_known::is_readd_tolerated(&descriptor.name) {
            tracing::debug!(name = %descriptor.name, "ignoring re-add of backbone type");
            return Ok(());
        }

        let has_superclass = descriptor.superclass.is_some();
        let has_interfaces = !descriptor.interfaces.is_empty();
        match (has_superclass, has_interfaces) {
            (false, false) => return Err(HierarchyError::MissingSupertypes(descriptor.name)),
            (true, true) => return Err(HierarchyError::ConflictingSupertypes(descriptor.name)),
            _ => {}
        }

        if self.shape == Shape::PostRename
            && descriptor
                .named_supertypes()
                .any(|super_name| super_name == well_known::object())
        {
            return Err(HierarchyError::IllegalObjectSubclass(descriptor.name));
        }

        match self.nodes.get_mut(&descriptor.name) {
            Some(existing) if existing.is_ghost() => {
                // Promotion: the real node inherits the ghost's child edges.
                // The children's parent edges are by name and stay valid.
                let inherited = existing.take_children();
                tracing::debug!(
                    name = %descriptor.name,
                    inherited_children = inherited.len(),
                    "promoting ghost to real node"
                );
                *existing = Node::real(descriptor.clone());
                for child in inherited {
                    existing.add_child(child);
                }
            }
            Some(_) => return Err(HierarchyError::DuplicateClass(descriptor.name)),
            None => {
                self.nodes
                    .insert(descriptor.name.clone(), Node::real(descriptor.clone()));
            }
        }

        for super_name in descriptor.named_supertypes() {
            if !self.nodes.contains_key(super_name) {
                tracing::trace!(name = %super_name, "registering ghost for forward reference");
                self.nodes
                    .insert(super_name.clone(), Node::ghost(super_name.clone()));
            }
            self.wire_edge(super_name, &descriptor.name);
        }

        Ok(())
    }

    /// Add every descriptor in `descriptors`, stopping at the first error.
    pub fn add_all<I>(&mut self, descriptors: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = ClassDescriptor>,
    {
        for descriptor in descriptors {
            self.add(descriptor)?;
        }
        Ok(())
    }

    /// Check the structural invariants and seal the hierarchy for querying.
    ///
    /// Only a verified hierarchy may be queried; the returned wrapper is the
    /// proof. The error value is never [`VerificationResult::Success`].
    pub fn verified(self) -> std::result::Result<VerifiedHierarchy, VerificationResult> {
        match verify(&self) {
            VerificationResult::Success => Ok(VerifiedHierarchy(self)),
            failure => Err(failure),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn root(&self) -> &TypeName {
        &self.root
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, name: &TypeName) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn descriptor(&self, name: &TypeName) -> Option<&ClassDescriptor> {
        self.nodes.get(name).and_then(Node::descriptor)
    }

    pub fn is_interface(&self, name: &TypeName) -> bool {
        self.nodes.get(name).is_some_and(Node::is_interface)
    }

    pub fn parents_of(&self, name: &TypeName) -> Option<&BTreeSet<TypeName>> {
        self.nodes.get(name).map(Node::parents)
    }

    pub fn children_of(&self, name: &TypeName) -> Option<&BTreeSet<TypeName>> {
        self.nodes.get(name).map(Node::children)
    }

    /// All registered names, ghosts included, in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &TypeName> {
        self.nodes.keys()
    }
}

/// A hierarchy that has passed verification and is sealed against mutation.
///
/// Queries ([`crate::AncestorQuery`], [`crate::unify`]) accept only this
/// wrapper, which makes "only a verified hierarchy may be queried" a
/// compile-time property rather than a usage convention.
#[derive(Debug, Clone)]
pub struct VerifiedHierarchy(Hierarchy);

impl VerifiedHierarchy {
    pub fn into_inner(self) -> Hierarchy {
        self.0
    }
}

impl Deref for VerifiedHierarchy {
    type Target = Hierarchy;

    fn deref(&self) -> &Hierarchy {
        &self.0
    }
}

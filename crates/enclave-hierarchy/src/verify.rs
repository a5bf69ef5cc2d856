use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use enclave_names::TypeName;

use crate::hierarchy::Hierarchy;

/// Outcome of [`verify`]. Surfaced to diagnostics as the rejection reason for
/// a malformed input program, so it serializes.
///
/// Violations are reported as values, not errors: whether a failed
/// verification aborts the whole rewrite is the caller's call (it should).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationResult {
    Success,
    /// A supertype was referenced but its descriptor never arrived.
    FoundGhost(TypeName),
    /// A final class has subclasses.
    FoundFinalSuperclass(TypeName),
    /// An interface has a concrete superclass other than the universal root.
    FoundInterfaceWithConcreteSuper(TypeName),
    /// A class has more than one non-interface supertype.
    FoundMultipleConcreteSupers(TypeName),
    /// This many nodes are not reachable from the root.
    FoundUnreachable(usize),
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::Success => f.write_str("hierarchy verified"),
            VerificationResult::FoundGhost(name) => {
                write!(f, "supertype {name} was referenced but never defined")
            }
            VerificationResult::FoundFinalSuperclass(name) => {
                write!(f, "final class {name} has subclasses")
            }
            VerificationResult::FoundInterfaceWithConcreteSuper(name) => {
                write!(f, "interface {name} has a concrete superclass")
            }
            VerificationResult::FoundMultipleConcreteSupers(name) => {
                write!(f, "class {name} has multiple concrete supertypes")
            }
            VerificationResult::FoundUnreachable(count) => {
                write!(f, "{count} nodes are unreachable from the root")
            }
        }
    }
}

/// Validate the global structural invariants of a completed hierarchy,
/// reporting the first violation found in traversal order.
///
/// Breadth-first from the root, descending child edges in deterministic
/// order. Per node: it is not a ghost; a final class has no children; no
/// interface child hangs under a concrete class other than the universal
/// root; at most one parent is non-interface. Afterwards, every node must
/// have been reached. Nodes trapped in a supertype cycle are never reachable
/// from the root, so cyclic input surfaces as [`FoundUnreachable`]
/// (see DESIGN.md on cycle safety).
///
/// [`FoundUnreachable`]: VerificationResult::FoundUnreachable
pub fn verify(hierarchy: &Hierarchy) -> VerificationResult {
    let root = hierarchy.root();
    let mut queue = VecDeque::from([root.clone()]);
    let mut visited: HashSet<TypeName> = HashSet::from([root.clone()]);

    while let Some(name) = queue.pop_front() {
        let node = hierarchy
            .node(&name)
            .unwrap_or_else(|| panic!("edge references unregistered node {name}"));

        if node.is_ghost() {
            return VerificationResult::FoundGhost(name);
        }

        if node.is_final() && !node.children().is_empty() {
            return VerificationResult::FoundFinalSuperclass(name);
        }

        for child in node.children() {
            if hierarchy.is_interface(child) && !node.is_interface() && name != *root {
                return VerificationResult::FoundInterfaceWithConcreteSuper(child.clone());
            }
        }

        let concrete_parents = node
            .parents()
            .iter()
            .filter(|&parent| !hierarchy.is_interface(parent))
            .count();
        if concrete_parents > 1 {
            return VerificationResult::FoundMultipleConcreteSupers(name);
        }

        for child in node.children() {
            if visited.insert(child.clone()) {
                queue.push_back(child.clone());
            }
        }
    }

    if visited.len() < hierarchy.node_count() {
        // Ghosts have no parents, so a surviving ghost and everything beneath
        // it sits outside the reachable region; name the ghost rather than
        // reporting a bare count when one is to blame.
        let mut unvisited: Vec<&TypeName> = hierarchy
            .names()
            .filter(|name| !visited.contains(name.as_str()))
            .collect();
        unvisited.sort();
        for &name in &unvisited {
            if hierarchy.node(name).is_some_and(|node| node.is_ghost()) {
                return VerificationResult::FoundGhost(name.clone());
            }
        }
        let count = hierarchy.node_count() - visited.len();
        tracing::debug!(count, "verification found unreachable nodes");
        return VerificationResult::FoundUnreachable(count);
    }

    VerificationResult::Success
}

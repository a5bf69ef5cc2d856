use std::collections::{HashSet, VecDeque};

use enclave_names::TypeName;
use thiserror::Error;

use crate::hierarchy::VerifiedHierarchy;

/// A tightest-common-ancestor query failed to produce a unique answer.
///
/// Ambiguity is a valid query outcome, not a malfunction: independent
/// interface lattices can leave two types with several equally-specific
/// common supertypes. The resolver never picks one arbitrarily — callers
/// needing a single verifiable supertype must fall back explicitly
/// (typically to the universal base type).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AncestorError {
    #[error("no unique tightest common ancestor; candidates: {candidates:?}")]
    Ambiguous { candidates: Vec<TypeName> },
}

/// Reusable scratch state for tightest-common-ancestor searches.
///
/// The two mark colors decorate nodes for the duration of one search only:
/// they are cleared before every search and on every exit path, so a query's
/// answer is independent of whatever ran before it. One query at a time per
/// instance; concurrent searches need separate instances (and separate
/// hierarchies are independent anyway).
#[derive(Debug, Default)]
pub struct AncestorQuery {
    marked_a: HashSet<TypeName>,
    marked_b: HashSet<TypeName>,
}

impl AncestorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most specific supertype shared by `a` and `b`.
    ///
    /// Both names must already be present in `hierarchy`; a missing name is a
    /// programmer error (the unification policy exists to guarantee this) and
    /// panics.
    ///
    /// Double-marking search: walk all ancestors of `a` marking color A, all
    /// ancestors of `b` marking color B, then descend from the root through
    /// doubly-marked nodes only. The doubly-marked nodes with no doubly-marked
    /// child are the candidate frontier; a unique candidate is the answer.
    pub fn resolve(
        &mut self,
        hierarchy: &VerifiedHierarchy,
        a: &TypeName,
        b: &TypeName,
    ) -> Result<TypeName, AncestorError> {
        assert!(
            hierarchy.contains(a),
            "type {a} is not present in the hierarchy"
        );
        assert!(
            hierarchy.contains(b),
            "type {b} is not present in the hierarchy"
        );

        self.clear();
        Self::mark_ancestors(hierarchy, a, &mut self.marked_a);
        Self::mark_ancestors(hierarchy, b, &mut self.marked_b);

        let frontier = self.collect_frontier(hierarchy);
        tracing::trace!(%a, %b, ?frontier, "ancestor frontier");
        self.clear();

        match frontier.as_slice() {
            [unique] => Ok(unique.clone()),
            _ => Err(AncestorError::Ambiguous {
                candidates: frontier,
            }),
        }
    }

    fn clear(&mut self) {
        self.marked_a.clear();
        self.marked_b.clear();
    }

    // The walk does not stop early: every ancestor up to the root is marked,
    // and the mark set doubles as the visit guard.
    fn mark_ancestors(
        hierarchy: &VerifiedHierarchy,
        start: &TypeName,
        marks: &mut HashSet<TypeName>,
    ) {
        let mut queue = VecDeque::from([start.clone()]);
        marks.insert(start.clone());
        while let Some(name) = queue.pop_front() {
            let parents = hierarchy
                .parents_of(&name)
                .unwrap_or_else(|| panic!("edge references unregistered node {name}"));
            for parent in parents {
                if marks.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }
    }

    // Descend from the root (always doubly marked, since both ancestor walks
    // terminate there) through doubly-marked children only; a doubly-marked
    // node with no doubly-marked child is locally tightest.
    fn collect_frontier(&self, hierarchy: &VerifiedHierarchy) -> Vec<TypeName> {
        let doubly = |name: &TypeName| self.marked_a.contains(name) && self.marked_b.contains(name);

        let root = hierarchy.root().clone();
        debug_assert!(doubly(&root));

        let mut frontier = Vec::new();
        let mut queue = VecDeque::from([root.clone()]);
        let mut seen: HashSet<TypeName> = HashSet::from([root]);
        while let Some(name) = queue.pop_front() {
            let children = hierarchy
                .children_of(&name)
                .unwrap_or_else(|| panic!("edge references unregistered node {name}"));
            let mut tightest = true;
            for child in children {
                if doubly(child) {
                    tightest = false;
                    if seen.insert(child.clone()) {
                        queue.push_back(child.clone());
                    }
                }
            }
            if tightest {
                frontier.push(name);
            }
        }

        frontier.sort();
        frontier
    }
}

/// One-shot convenience over [`AncestorQuery::resolve`].
pub fn tightest_common_ancestor(
    hierarchy: &VerifiedHierarchy,
    a: &TypeName,
    b: &TypeName,
) -> Result<TypeName, AncestorError> {
    AncestorQuery::new().resolve(hierarchy, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::descriptor::ClassDescriptor;
    use crate::hierarchy::Hierarchy;

    fn pre(name: &str, superclass: &str) -> ClassDescriptor {
        ClassDescriptor::class_extending(name, superclass, true)
    }

    fn iface(name: &str, supers: &[&str]) -> ClassDescriptor {
        ClassDescriptor::interface_extending(
            name,
            supers.iter().map(|s| TypeName::from(*s)).collect(),
            true,
        )
    }

    fn implementing(name: &str, interfaces: &[&str]) -> ClassDescriptor {
        ClassDescriptor::class_implementing(
            name,
            interfaces.iter().map(|s| TypeName::from(*s)).collect(),
            true,
        )
    }

    fn diamond() -> VerifiedHierarchy {
        // Object <- Base <- {Left, Right}; Leaf under Left.
        let mut hierarchy = Hierarchy::pre_rename();
        hierarchy
            .add_all([
                pre("a.Base", "java.lang.Object"),
                pre("a.Left", "a.Base"),
                pre("a.Right", "a.Base"),
                pre("a.Leaf", "a.Left"),
            ])
            .unwrap();
        hierarchy.verified().unwrap()
    }

    #[test]
    fn resolves_through_class_chains() {
        let hierarchy = diamond();
        let mut query = AncestorQuery::new();
        assert_eq!(
            query.resolve(
                &hierarchy,
                &TypeName::from("a.Left"),
                &TypeName::from("a.Right")
            ),
            Ok(TypeName::from("a.Base"))
        );
        assert_eq!(
            query.resolve(
                &hierarchy,
                &TypeName::from("a.Leaf"),
                &TypeName::from("a.Right")
            ),
            Ok(TypeName::from("a.Base"))
        );
    }

    #[test]
    fn ancestor_of_the_other_input_wins() {
        let hierarchy = diamond();
        assert_eq!(
            tightest_common_ancestor(
                &hierarchy,
                &TypeName::from("a.Leaf"),
                &TypeName::from("a.Left")
            ),
            Ok(TypeName::from("a.Left"))
        );
    }

    #[test]
    fn query_is_reflexive() {
        // P3
        let hierarchy = diamond();
        for name in ["java.lang.Object", "a.Base", "a.Leaf"] {
            let name = TypeName::from(name);
            assert_eq!(
                tightest_common_ancestor(&hierarchy, &name, &name),
                Ok(name.clone())
            );
        }
    }

    #[test]
    fn shared_interface_through_disjoint_chains_resolves_to_it() {
        // P9, unambiguous half.
        let mut hierarchy = Hierarchy::pre_rename();
        hierarchy
            .add_all([
                iface("a.IShared", &["java.lang.Object"]),
                implementing("a.One", &["a.IShared"]),
                implementing("a.Two", &["a.IShared"]),
            ])
            .unwrap();
        let hierarchy = hierarchy.verified().unwrap();
        assert_eq!(
            tightest_common_ancestor(
                &hierarchy,
                &TypeName::from("a.One"),
                &TypeName::from("a.Two")
            ),
            Ok(TypeName::from("a.IShared"))
        );
    }

    #[test]
    fn two_unrelated_shared_interfaces_are_ambiguous() {
        // P9, ambiguous half: both classes implement both interfaces and the
        // interfaces are unrelated to each other.
        let mut hierarchy = Hierarchy::pre_rename();
        hierarchy
            .add_all([
                iface("a.IFirst", &["java.lang.Object"]),
                iface("a.ISecond", &["java.lang.Object"]),
                implementing("a.One", &["a.IFirst", "a.ISecond"]),
                implementing("a.Two", &["a.IFirst", "a.ISecond"]),
            ])
            .unwrap();
        let hierarchy = hierarchy.verified().unwrap();
        assert_eq!(
            tightest_common_ancestor(
                &hierarchy,
                &TypeName::from("a.One"),
                &TypeName::from("a.Two")
            ),
            Err(AncestorError::Ambiguous {
                candidates: vec![TypeName::from("a.IFirst"), TypeName::from("a.ISecond")],
            })
        );
    }

    #[test]
    fn repeated_queries_leave_no_residue() {
        // P4: a query's answer is independent of how many unrelated queries
        // preceded it on the same scratch state, ambiguous ones included.
        let mut hierarchy = Hierarchy::pre_rename();
        hierarchy
            .add_all([
                pre("a.Base", "java.lang.Object"),
                pre("a.Left", "a.Base"),
                pre("a.Right", "a.Base"),
                iface("a.IFirst", &["java.lang.Object"]),
                iface("a.ISecond", &["java.lang.Object"]),
                implementing("a.One", &["a.IFirst", "a.ISecond"]),
                implementing("a.Two", &["a.IFirst", "a.ISecond"]),
            ])
            .unwrap();
        let hierarchy = hierarchy.verified().unwrap();

        let mut query = AncestorQuery::new();
        let baseline = query.resolve(
            &hierarchy,
            &TypeName::from("a.Left"),
            &TypeName::from("a.Right"),
        );
        assert_eq!(baseline, Ok(TypeName::from("a.Base")));

        for _ in 0..10 {
            // Unrelated query, then an ambiguous one, then the baseline again.
            let _ = query.resolve(
                &hierarchy,
                &TypeName::from("a.One"),
                &TypeName::from("java.lang.Object"),
            );
            let ambiguous = query.resolve(
                &hierarchy,
                &TypeName::from("a.One"),
                &TypeName::from("a.Two"),
            );
            assert!(ambiguous.is_err());
            assert_eq!(
                query.resolve(
                    &hierarchy,
                    &TypeName::from("a.Left"),
                    &TypeName::from("a.Right"),
                ),
                baseline
            );
        }
    }

    #[test]
    #[should_panic(expected = "not present in the hierarchy")]
    fn missing_name_is_a_programmer_error() {
        let hierarchy = diamond();
        let _ = tightest_common_ancestor(
            &hierarchy,
            &TypeName::from("a.Nowhere"),
            &TypeName::from("a.Base"),
        );
    }
}

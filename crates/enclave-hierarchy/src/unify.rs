//! Namespace unification: common-ancestor answers for raw type names drawn
//! from any of the overlapping name spaces of a rewritten program.
//!
//! A bytecode-rewrite pass hands [`unify`] two names as they appear in the
//! program being re-emitted. Each may be a fixed root type, an
//! exception-wrapper name, a pre- or post-rename ordinary name, or an
//! array-wrapper name. The policy classifies the pair, normalizes it, and
//! either answers by fixed rule or forwards canonical post-rename names to
//! the ancestor resolver. Classification runs as an ordered chain of
//! handlers; each handler is total within its precondition and reports "not
//! applicable" otherwise, so later handlers may assume earlier ones ruled
//! themselves out.

use enclave_names::{
    is_array_wrapper, is_post_rename, to_post_rename, to_pre_rename, unwrap_exception, well_known,
    ArrayElementKind, ArrayWrapper, TypeName,
};
use thiserror::Error;

use crate::hierarchy::{Shape, VerifiedHierarchy};
use crate::resolve::{AncestorError, AncestorQuery};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// The underlying hierarchy query found several equally-specific common
    /// supertypes. The caller owns the fallback policy (abort, or fall back
    /// to the universal base type); the policy never guesses.
    #[error(transparent)]
    Ambiguous(#[from] AncestorError),
}

/// The tightest common ancestor of two raw type names, across name spaces.
///
/// `hierarchy` must be the post-rename hierarchy of the program being
/// rewritten; pre-rename inputs are renamed for the query and the answer is
/// mapped back.
pub fn unify(
    hierarchy: &VerifiedHierarchy,
    a: &TypeName,
    b: &TypeName,
) -> Result<TypeName, UnifyError> {
    assert!(
        hierarchy.shape() == Shape::PostRename,
        "namespace unification requires the post-rename hierarchy"
    );

    if a == b {
        return Ok(a.clone());
    }

    if let Some(root) = unify_roots(a, b) {
        tracing::trace!(%a, %b, %root, "unified by root-type rule");
        return Ok(root);
    }

    let (a, a_was_wrapped) = unwrap_if_exception(a);
    let (b, b_was_wrapped) = unwrap_if_exception(b);
    if a_was_wrapped && b_was_wrapped {
        // Wrappers are a flat re-parenting of the real exception lattice;
        // their own unification bottoms out at the real throwable root.
        return Ok(well_known::throwable().clone());
    }

    if let Some(base) = unify_mixed_rename(&a, &b) {
        tracing::trace!(%a, %b, "unified across rename spaces");
        return Ok(base);
    }

    if let Some(result) = unify_arrays(hierarchy, &a, &b) {
        return result;
    }

    unify_ordinary(hierarchy, &a, &b)
}

/// Fixed rule for the hand-enumerated root types: if either name is a root
/// type the answer is a root type, the most specific involved winning.
fn unify_roots(a: &TypeName, b: &TypeName) -> Option<TypeName> {
    match (well_known::root_precedence(a), well_known::root_precedence(b)) {
        (Some(ra), Some(rb)) => Some(if ra <= rb { a.clone() } else { b.clone() }),
        (Some(_), None) => Some(a.clone()),
        (None, Some(_)) => Some(b.clone()),
        (None, None) => None,
    }
}

fn unwrap_if_exception(name: &TypeName) -> (TypeName, bool) {
    match unwrap_exception(name) {
        Some(unwrapped) => (unwrapped, true),
        None => (name.clone(), false),
    }
}

/// The pre- and post-rename lattices meet only at the very top: a pair with
/// exactly one pre-rename member unifies to the universal base type, without
/// a hierarchy query.
fn unify_mixed_rename(a: &TypeName, b: &TypeName) -> Option<TypeName> {
    if is_post_rename(a) == is_post_rename(b) {
        return None;
    }
    Some(well_known::object().clone())
}

/// Array-wrapper handling. Assumes roots and exception wrappers are already
/// ruled out and equal names already short-circuited.
fn unify_arrays(
    hierarchy: &VerifiedHierarchy,
    a: &TypeName,
    b: &TypeName,
) -> Option<Result<TypeName, UnifyError>> {
    match (is_array_wrapper(a), is_array_wrapper(b)) {
        (false, false) => return None,
        // An array and a non-array share nothing below the universal base
        // type.
        (true, false) | (false, true) => return Some(Ok(well_known::object().clone())),
        (true, true) => {}
    }

    let (Some(parsed_a), Some(parsed_b)) = (ArrayWrapper::parse(a), ArrayWrapper::parse(b)) else {
        unreachable!("array-wrapper names always parse");
    };

    let (
        ArrayWrapper::Object {
            dimension: dim_a,
            kind: kind_a,
            element: elem_a,
        },
        ArrayWrapper::Object {
            dimension: dim_b,
            kind: kind_b,
            element: elem_b,
        },
    ) = (parsed_a, parsed_b)
    else {
        // Primitive arrays are opaque; mixed with any other array they only
        // share the generic array interface.
        return Some(Ok(well_known::array_interface().clone()));
    };

    if dim_a != dim_b || kind_a != kind_b {
        return Some(Ok(well_known::array_interface().clone()));
    }

    // Equal shape: unify element-wise and re-wrap.
    let element = match unify(hierarchy, &elem_a, &elem_b) {
        Ok(element) => element,
        Err(err) => return Some(Err(err)),
    };
    if well_known::is_root_type(&element) || !hierarchy.contains(&element) {
        // Element unification climbed to a root type or out of the
        // hierarchy's domain; no wrapper name is more precise than the
        // generic array interface.
        return Some(Ok(well_known::array_interface().clone()));
    }
    let kind = if hierarchy.is_interface(&element) {
        ArrayElementKind::Interface
    } else {
        ArrayElementKind::Class
    };
    Some(Ok(ArrayWrapper::wrap(dim_a, kind, &element)))
}

/// Ordinary names: rename into the post-rename space as needed, query the
/// resolver, and map the answer back if the query started pre-rename.
fn unify_ordinary(
    hierarchy: &VerifiedHierarchy,
    a: &TypeName,
    b: &TypeName,
) -> Result<TypeName, UnifyError> {
    let started_pre_rename = !is_post_rename(a);
    debug_assert_eq!(
        started_pre_rename,
        !is_post_rename(b),
        "mixed-rename pairs are handled before ordinary unification"
    );

    let query_a = if started_pre_rename {
        to_post_rename(a)
    } else {
        a.clone()
    };
    let query_b = if started_pre_rename {
        to_post_rename(b)
    } else {
        b.clone()
    };

    let ancestor = AncestorQuery::new().resolve(hierarchy, &query_a, &query_b)?;
    tracing::trace!(%a, %b, %ancestor, "unified via hierarchy query");

    if started_pre_rename {
        // The root interface has no pre-rename analogue; `to_pre_rename`
        // maps it to the universal base type.
        Ok(to_pre_rename(&ancestor))
    } else {
        Ok(ancestor)
    }
}

//! The fixed, hand-known root and backbone type names.
//!
//! Four of these ([`object`], [`throwable`], [`shadow_object`],
//! [`root_interface`]) are "root types" for namespace unification: pairs
//! involving them resolve by fixed rule, without a hierarchy query. The rest
//! are the remaining members of the post-rename shadow backbone.

use std::sync::OnceLock;

use crate::TypeName;

macro_rules! well_known_name {
    ($(#[$doc:meta])* $fn_name:ident, $name:expr) => {
        $(#[$doc])*
        pub fn $fn_name() -> &'static TypeName {
            static NAME: OnceLock<TypeName> = OnceLock::new();
            NAME.get_or_init(|| TypeName::from($name))
        }
    };
}

well_known_name!(
    /// The universal base type, root of every hierarchy shape.
    object,
    "java.lang.Object"
);
well_known_name!(
    /// The real (host-side) throwable root. Never a node of the post-rename
    /// hierarchy; exception wrappers unify to it directly.
    throwable,
    "java.lang.Throwable"
);
well_known_name!(
    /// ShadowRoot: the shadow base class every post-rename class descends
    /// from.
    shadow_object,
    "shadow.java.lang.Object"
);
well_known_name!(
    /// ShadowInterfaceRoot: the internal root interface sitting between the
    /// universal base type and the shadow base class.
    root_interface,
    "internal.IObject"
);
well_known_name!(
    /// The generic array interface, the forced unification answer for
    /// mismatched array wrappers.
    array_interface,
    "wrapper.array.IArray"
);
well_known_name!(shadow_comparable, "shadow.java.lang.Comparable");
well_known_name!(shadow_serializable, "shadow.java.io.Serializable");
well_known_name!(shadow_enum, "shadow.java.lang.Enum");
well_known_name!(shadow_throwable, "shadow.java.lang.Throwable");
well_known_name!(shadow_exception, "shadow.java.lang.Exception");
well_known_name!(
    shadow_runtime_exception,
    "shadow.java.lang.RuntimeException"
);

/// Whether `name` is one of the four fixed root types.
pub fn is_root_type(name: &TypeName) -> bool {
    root_precedence(name).is_some()
}

/// Precedence rank of a root type, most specific first (0 = most specific).
///
/// Ordering: root interface, then shadow root, then throwable, then the
/// universal base type.
pub fn root_precedence(name: &TypeName) -> Option<u8> {
    if name == root_interface() {
        Some(0)
    } else if name == shadow_object() {
        Some(1)
    } else if name == throwable() {
        Some(2)
    } else if name == object() {
        Some(3)
    } else {
        None
    }
}

/// The backbone names `add` silently ignores when re-added: the post-rename
/// shape pre-populates them, and rewritten programs legitimately re-declare
/// them when walking their full class set.
pub fn is_readd_tolerated(name: &TypeName) -> bool {
    name == shadow_enum()
        || name == shadow_comparable()
        || name == shadow_serializable()
        || name == shadow_throwable()
        || name == shadow_exception()
        || name == shadow_runtime_exception()
}

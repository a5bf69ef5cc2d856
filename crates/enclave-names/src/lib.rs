//! Naming conventions shared across Enclave crates.
//!
//! This crate is intentionally small. It owns the [`TypeName`] newtype and the
//! fixed string-prefix contracts that distinguish the four overlapping name
//! spaces a rewritten program lives in: pre-rename names, post-rename (shadow)
//! names, exception-wrapper names, and array-wrapper names. The rewrite passes
//! and the hierarchy core both treat these contracts as given; nothing here
//! consults a hierarchy or performs I/O.

#![forbid(unsafe_code)]

mod array_wrapper;
mod type_name;
pub mod well_known;

pub use crate::array_wrapper::{ArrayElementKind, ArrayWrapper};
pub use crate::type_name::TypeName;

/// Prefix marking a name as post-rename (shadow namespace).
pub const RENAME_PREFIX: &str = "shadow.";

/// Prefix marking a synthetic exception-wrapper name. The remainder of the
/// name is the post-rename name of the wrapped exception type.
pub const EXCEPTION_WRAPPER_PREFIX: &str = "wrapper.exception.";

/// Prefix marking a synthetic array-wrapper name. See [`ArrayWrapper`] for the
/// shape of the remainder.
pub const ARRAY_WRAPPER_PREFIX: &str = "wrapper.array.";

/// Whether `name` belongs to the post-rename lexical space.
///
/// The internal root interface is post-rename by definition even though it
/// carries no prefix; it has no pre-rename analogue.
pub fn is_post_rename(name: &TypeName) -> bool {
    name.as_str().starts_with(RENAME_PREFIX) || name == well_known::root_interface()
}

/// Whether `name` is a synthetic exception-wrapper name.
pub fn is_exception_wrapper(name: &TypeName) -> bool {
    name.as_str().starts_with(EXCEPTION_WRAPPER_PREFIX)
}

/// Whether `name` is a synthetic array-wrapper name.
pub fn is_array_wrapper(name: &TypeName) -> bool {
    name.as_str().starts_with(ARRAY_WRAPPER_PREFIX)
}

/// Wrap a post-rename exception type name into its exception-wrapper name.
pub fn wrap_exception(name: &TypeName) -> TypeName {
    TypeName::from(format!("{EXCEPTION_WRAPPER_PREFIX}{name}"))
}

/// Strip the exception-wrapper prefix, recovering the wrapped post-rename
/// name. Returns `None` if `name` is not a wrapper.
pub fn unwrap_exception(name: &TypeName) -> Option<TypeName> {
    name.as_str()
        .strip_prefix(EXCEPTION_WRAPPER_PREFIX)
        .map(TypeName::from)
}

/// Map a name into the post-rename space.
///
/// The universal base type maps to the shadow root; names already in the
/// post-rename space are returned unchanged.
pub fn to_post_rename(name: &TypeName) -> TypeName {
    if name == well_known::object() {
        return well_known::shadow_object().clone();
    }
    if is_post_rename(name) {
        return name.clone();
    }
    TypeName::from(format!("{RENAME_PREFIX}{name}"))
}

/// Map a post-rename name back into the pre-rename space.
///
/// The internal root interface has no pre-rename analogue and maps to the
/// universal base type. Names without the rename prefix are returned
/// unchanged.
pub fn to_pre_rename(name: &TypeName) -> TypeName {
    if name == well_known::root_interface() {
        return well_known::object().clone();
    }
    match name.as_str().strip_prefix(RENAME_PREFIX) {
        Some(rest) => TypeName::from(rest),
        None => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_round_trips_ordinary_names() {
        let pre = TypeName::from("com.example.Token");
        let post = to_post_rename(&pre);
        assert_eq!(post.as_str(), "shadow.com.example.Token");
        assert_eq!(to_pre_rename(&post), pre);
    }

    #[test]
    fn rename_is_idempotent_on_post_rename_names() {
        let post = TypeName::from("shadow.com.example.Token");
        assert_eq!(to_post_rename(&post), post);
    }

    #[test]
    fn object_renames_to_shadow_root() {
        assert_eq!(
            to_post_rename(well_known::object()),
            *well_known::shadow_object()
        );
        assert_eq!(
            to_pre_rename(well_known::shadow_object()),
            *well_known::object()
        );
    }

    #[test]
    fn root_interface_unrenames_to_object() {
        assert_eq!(
            to_pre_rename(well_known::root_interface()),
            *well_known::object()
        );
        assert!(is_post_rename(well_known::root_interface()));
    }

    #[test]
    fn exception_wrapper_round_trip() {
        let shadow = TypeName::from("shadow.java.lang.RuntimeException");
        let wrapped = wrap_exception(&shadow);
        assert!(is_exception_wrapper(&wrapped));
        assert_eq!(unwrap_exception(&wrapped), Some(shadow));
        assert_eq!(unwrap_exception(&TypeName::from("shadow.Foo")), None);
    }
}

use crate::{TypeName, ARRAY_WRAPPER_PREFIX};

/// Whether an object-array wrapper's element type is a class or an interface.
///
/// The distinction is encoded in the wrapper name itself (`$` markers for
/// class elements, `_` markers for interface elements) so the unification
/// policy can compare array shapes without consulting a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayElementKind {
    Class,
    Interface,
}

impl ArrayElementKind {
    fn marker(self) -> char {
        match self {
            ArrayElementKind::Class => '$',
            ArrayElementKind::Interface => '_',
        }
    }
}

/// A decoded array-wrapper name.
///
/// Wrapper names have the shape `wrapper.array.` followed by one of:
/// - `$` repeated `dimension` times, then the element type name (class
///   elements), e.g. `wrapper.array.$$shadow.java.lang.String` for a
///   two-dimensional `String` array;
/// - `_` repeated `dimension` times, then the element type name (interface
///   elements);
/// - an opaque tail with no dimension markers, used for primitive arrays
///   (`wrapper.array.IntArray`) and the generic array interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayWrapper {
    Object {
        dimension: usize,
        kind: ArrayElementKind,
        element: TypeName,
    },
    Opaque,
}

impl ArrayWrapper {
    /// Decode `name`, returning `None` if it is not an array-wrapper name at
    /// all.
    pub fn parse(name: &TypeName) -> Option<ArrayWrapper> {
        let tail = name.as_str().strip_prefix(ARRAY_WRAPPER_PREFIX)?;
        for kind in [ArrayElementKind::Class, ArrayElementKind::Interface] {
            let marker = kind.marker();
            let dimension = tail.chars().take_while(|c| *c == marker).count();
            if dimension > 0 {
                let element = &tail[dimension..];
                if element.is_empty() {
                    // Markers with no element payload decode as opaque.
                    return Some(ArrayWrapper::Opaque);
                }
                return Some(ArrayWrapper::Object {
                    dimension,
                    kind,
                    element: TypeName::from(element),
                });
            }
        }
        Some(ArrayWrapper::Opaque)
    }

    /// Build the wrapper name for a `dimension`-dimensional array of
    /// `element`.
    pub fn wrap(dimension: usize, kind: ArrayElementKind, element: &TypeName) -> TypeName {
        let marker: String = std::iter::repeat(kind.marker()).take(dimension).collect();
        TypeName::from(format!("{ARRAY_WRAPPER_PREFIX}{marker}{element}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_element_arrays() {
        let name = TypeName::from("wrapper.array.$$shadow.java.lang.String");
        assert_eq!(
            ArrayWrapper::parse(&name),
            Some(ArrayWrapper::Object {
                dimension: 2,
                kind: ArrayElementKind::Class,
                element: TypeName::from("shadow.java.lang.String"),
            })
        );
    }

    #[test]
    fn parses_interface_element_arrays() {
        let name = TypeName::from("wrapper.array._shadow.com.example.IToken");
        assert_eq!(
            ArrayWrapper::parse(&name),
            Some(ArrayWrapper::Object {
                dimension: 1,
                kind: ArrayElementKind::Interface,
                element: TypeName::from("shadow.com.example.IToken"),
            })
        );
    }

    #[test]
    fn primitive_arrays_are_opaque() {
        let name = TypeName::from("wrapper.array.IntArray");
        assert_eq!(ArrayWrapper::parse(&name), Some(ArrayWrapper::Opaque));
    }

    #[test]
    fn non_wrappers_do_not_parse() {
        assert_eq!(ArrayWrapper::parse(&TypeName::from("shadow.Foo")), None);
    }

    #[test]
    fn wrap_round_trips() {
        let element = TypeName::from("shadow.com.example.Coin");
        let name = ArrayWrapper::wrap(3, ArrayElementKind::Class, &element);
        assert_eq!(name.as_str(), "wrapper.array.$$$shadow.com.example.Coin");
        assert_eq!(
            ArrayWrapper::parse(&name),
            Some(ArrayWrapper::Object {
                dimension: 3,
                kind: ArrayElementKind::Class,
                element,
            })
        );
    }
}

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully-qualified, dot-separated type name.
///
/// Which lexical space a name belongs to (pre-rename, post-rename, wrapper)
/// is determined by the fixed prefix conventions in this crate, never by a
/// tag carried on the name itself.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display() {
        let name = TypeName::from("java.lang.Object");
        assert_eq!(format!("{name}"), "java.lang.Object");
        assert_eq!(format!("{name:?}"), "TypeName(java.lang.Object)");
    }

    #[test]
    fn lookup_by_str_via_borrow() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TypeName::from("a.B"), 1);
        assert_eq!(map.get("a.B"), Some(&1));
    }
}

use serde::{Deserialize, Serialize};

use enclave_names::{to_post_rename, TypeName};

/// Immutable per-class facts consumed from the class-format parser.
///
/// One descriptor is produced per class or interface of the input program,
/// already decoded from the binary format and using consistent fully-qualified
/// names. Any descriptor other than the universal root names exactly one of a
/// superclass or a non-empty interface list; [`crate::Hierarchy::add`]
/// enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: TypeName,
    pub superclass: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub is_interface: bool,
    pub is_final: bool,
    pub is_pre_rename: bool,
}

impl ClassDescriptor {
    /// A concrete class extending `superclass`.
    pub fn class_extending(
        name: impl Into<TypeName>,
        superclass: impl Into<TypeName>,
        is_pre_rename: bool,
    ) -> Self {
        Self {
            name: name.into(),
            superclass: Some(superclass.into()),
            interfaces: Vec::new(),
            is_interface: false,
            is_final: false,
            is_pre_rename,
        }
    }

    /// A concrete class implementing `interfaces` (and nothing else).
    pub fn class_implementing(
        name: impl Into<TypeName>,
        interfaces: Vec<TypeName>,
        is_pre_rename: bool,
    ) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces,
            is_interface: false,
            is_final: false,
            is_pre_rename,
        }
    }

    /// An interface extending `supers` (its superinterfaces, or the universal
    /// root).
    pub fn interface_extending(
        name: impl Into<TypeName>,
        supers: Vec<TypeName>,
        is_pre_rename: bool,
    ) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: supers,
            is_interface: true,
            is_final: false,
            is_pre_rename,
        }
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// The post-rename counterpart of this descriptor: `name`, `superclass`,
    /// and every interface mapped through the rename convention.
    pub fn renamed(&self) -> ClassDescriptor {
        ClassDescriptor {
            name: to_post_rename(&self.name),
            superclass: self.superclass.as_ref().map(to_post_rename),
            interfaces: self.interfaces.iter().map(to_post_rename).collect(),
            is_interface: self.is_interface,
            is_final: self.is_final,
            is_pre_rename: false,
        }
    }

    /// Every supertype this descriptor names, superclass first.
    pub fn named_supertypes(&self) -> impl Iterator<Item = &TypeName> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renamed_rewrites_every_named_type() {
        let descriptor = ClassDescriptor {
            name: TypeName::from("com.example.Wallet"),
            superclass: Some(TypeName::from("java.lang.Object")),
            interfaces: vec![TypeName::from("com.example.Spendable")],
            is_interface: false,
            is_final: true,
            is_pre_rename: true,
        };

        let renamed = descriptor.renamed();
        assert_eq!(renamed.name.as_str(), "shadow.com.example.Wallet");
        assert_eq!(
            renamed.superclass.as_ref(),
            Some(&TypeName::from("shadow.java.lang.Object"))
        );
        assert_eq!(
            renamed.interfaces,
            vec![TypeName::from("shadow.com.example.Spendable")]
        );
        assert!(renamed.is_final);
        assert!(!renamed.is_pre_rename);
    }

    #[test]
    fn named_supertypes_yields_superclass_first() {
        let descriptor = ClassDescriptor::class_extending("a.B", "a.Base", true);
        let named: Vec<_> = descriptor.named_supertypes().collect();
        assert_eq!(named, vec![&TypeName::from("a.Base")]);
    }

    #[test]
    fn descriptor_serializes() {
        let descriptor = ClassDescriptor::class_extending("a.B", "a.Base", false);
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: ClassDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}

//! YAML serialization support using serde-saphyr.
//!
//! This module provides YAML serialization for API trees and navigation
//! patches. It is only available when the `yaml` feature is enabled.
//!
//! # Example
//!
//! ```rust
//! use apisplit_core::ToYaml;
//! use apisplit_core::tree::ApiRootItem;
//!
//! let root = ApiRootItem::new("petstore.io/v1/Petstore", "Petstore");
//! let yaml = root.to_yaml()?;
//!
//! assert!(yaml.starts_with("uid: petstore.io/v1/Petstore"));
//! # Ok::<(), apisplit_core::YamlError>(())
//! ```

use serde::Serialize;

/// Error type for YAML serialization operations.
pub type YamlError = serde_saphyr::ser_error::Error;

/// Extension trait for serializing types to YAML.
///
/// This trait is implemented for all types that implement [`Serialize`].
pub trait ToYaml: Serialize + Sized {
    /// Serializes this value to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`YamlError`] if serialization fails.
    fn to_yaml(&self) -> Result<String, YamlError> {
        serde_saphyr::to_string(self)
    }
}

impl<T: Serialize + Sized> ToYaml for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::{KeyKind, NavigationItem, NavigationPatch};

    #[test]
    fn should_serialize_navigation_patch_to_yaml() {
        let patch = NavigationPatch::append_child(
            "petstore.yaml",
            KeyKind::TopicUid,
            vec![NavigationItem::new("addPet", "petstore.io/v1/Petstore/addPet")],
            "petstore.yaml",
        );

        let yaml = patch.to_yaml().expect("should serialize to YAML");

        assert!(yaml.starts_with("actionType: AppendChild\nkey: petstore.yaml\nkeyKind: TopicUid\n"));
        let parsed: NavigationPatch = serde_saphyr::from_str(&yaml).expect("should read back");
        assert_eq!(parsed, patch);
    }
}

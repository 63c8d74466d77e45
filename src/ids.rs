use uuid::Uuid;

/// Unique identifier for a scene, stable across reorders.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SceneId(pub Uuid);

impl SceneId {
    /// Create a new random scene id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an element within a template.
///
/// Also the key convention for customization overrides: stable across
/// reorders and inserts, unlike positional `"{kind}_{index}"` keys.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Create a new random element id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(SceneId::new(), SceneId::new());
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ElementId::new();
        let s = serde_json::to_string(&id).unwrap();
        assert!(s.starts_with('"') && s.ends_with('"'));
        let back: ElementId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }
}

//! A2UI Component Registry
//!
//! A surface's component definitions, stored as an insertion-ordered arena
//! keyed by component id.

use indexmap::IndexMap;

use super::message::ComponentDefinition;

/// Stable index of a component inside its surface's registry.
///
/// Semantics:
/// - Indices are assigned on first insertion of an id.
/// - Replacing a definition keeps its index.
/// - Registries never shrink, so an index stays valid for the surface's lifetime.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ComponentIndex(usize);

impl ComponentIndex {
    pub fn raw(self) -> usize {
        self.0
    }
}

/// Registry of component definitions for one surface.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = ComponentRegistry::new();
/// registry.upsert(ComponentDefinition::new("title", ComponentType::Text(text)));
///
/// if let Some((index, definition)) = registry.get_full("title") {
///     println!("{} is a {}", index.raw(), definition.component.kind_name());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentRegistry {
    entries: IndexMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the definition for `definition.id`.
    ///
    /// Nothing from a previous definition with the same id is kept.
    pub fn upsert(&mut self, definition: ComponentDefinition) -> ComponentIndex {
        let (index, _previous) = self
            .entries
            .insert_full(definition.id.clone(), definition);
        ComponentIndex(index)
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.entries.get(id)
    }

    /// Look up a definition together with its arena index
    pub fn get_full(&self, id: &str) -> Option<(ComponentIndex, &ComponentDefinition)> {
        self.entries
            .get_full(id)
            .map(|(index, _, definition)| (ComponentIndex(index), definition))
    }

    pub fn by_index(&self, index: ComponentIndex) -> Option<&ComponentDefinition> {
        self.entries.get_index(index.raw()).map(|(_, definition)| definition)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Component ids in first-inserted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Definitions in first-inserted order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::message::{ButtonComponent, ComponentType, TextComponent, TextUsageHint};
    use crate::a2ui::value::BoundValue;

    fn text(id: &str, literal: &str, hint: Option<TextUsageHint>) -> ComponentDefinition {
        ComponentDefinition::new(
            id,
            ComponentType::Text(TextComponent {
                text: BoundValue::literal(literal),
                usage_hint: hint,
            }),
        )
    }

    #[test]
    fn test_upsert_replaces_whole_definition() {
        let mut registry = ComponentRegistry::new();
        registry.upsert(text("title", "Hello", Some(TextUsageHint::H1)));
        registry.upsert(text("title", "Bye", None));

        assert_eq!(registry.len(), 1);
        let ComponentType::Text(component) = &registry.get("title").unwrap().component else {
            panic!("Expected Text");
        };
        assert_eq!(component.text, BoundValue::literal("Bye"));
        // The usage hint from the first definition must not survive
        assert_eq!(component.usage_hint, None);
    }

    #[test]
    fn test_upsert_can_change_kind() {
        let mut registry = ComponentRegistry::new();
        registry.upsert(text("x", "label", None));
        registry.upsert(ComponentDefinition::new(
            "x",
            ComponentType::Button(ButtonComponent::default()),
        ));

        assert_eq!(registry.get("x").unwrap().component.kind_name(), "Button");
    }

    #[test]
    fn test_indices_are_stable() {
        let mut registry = ComponentRegistry::new();
        let a = registry.upsert(text("a", "A", None));
        let b = registry.upsert(text("b", "B", None));
        let a_again = registry.upsert(text("a", "A2", None));

        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(registry.get_full("b").map(|(index, _)| index), Some(b));
        assert_eq!(registry.by_index(a).map(|d| d.id.as_str()), Some("a"));
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}

use std::collections::HashSet;

use thiserror::Error;

/// Errors raised while building the section registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry has no sections")]
    Empty,
    #[error("entry '{label}' has an empty id")]
    EmptyId { label: String },
    #[error("duplicate section id: {0}")]
    DuplicateId(String),
}

/// A nested entry under a section. Subsections do not nest further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subsection {
    pub id: String,
    pub label: String,
}

/// A top-level entry of the navigation, optionally owning a group of subsections
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub label: String,
    /// Glyph shown before the label in the sidebar
    pub icon: Option<String>,
    pub subsections: Vec<Subsection>,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            subsections: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_subsection(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.subsections.push(Subsection {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    pub fn has_group(&self) -> bool {
        !self.subsections.is_empty()
    }

    /// True if `id` names one of this section's subsections
    pub fn owns(&self, id: &str) -> bool {
        self.subsections.iter().any(|sub| sub.id == id)
    }
}

/// One row of the flattened registry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a> {
    pub id: &'a str,
    pub label: &'a str,
    /// Owning section id, set for subsections only
    pub group: Option<&'a str>,
}

/// Ordered, validated list of document sections. Immutable once built.
#[derive(Clone, Debug)]
pub struct Registry {
    sections: Vec<Section>,
}

impl Registry {
    pub fn new(sections: Vec<Section>) -> Result<Self, RegistryError> {
        if sections.is_empty() {
            return Err(RegistryError::Empty);
        }

        {
            let mut seen = HashSet::new();
            let entries = sections.iter().flat_map(|section| {
                std::iter::once((&section.id, &section.label))
                    .chain(section.subsections.iter().map(|sub| (&sub.id, &sub.label)))
            });
            for (id, label) in entries {
                if id.is_empty() {
                    return Err(RegistryError::EmptyId {
                        label: label.clone(),
                    });
                }
                if !seen.insert(id.as_str()) {
                    return Err(RegistryError::DuplicateId(id.clone()));
                }
            }
        }

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn first_id(&self) -> &str {
        // Non-empty by construction
        &self.sections[0].id
    }

    /// Sections and subsections in document order, each parent before its children
    pub fn flatten(&self) -> impl DoubleEndedIterator<Item = Entry<'_>> + '_ {
        self.sections.iter().flat_map(|section| {
            std::iter::once(Entry {
                id: &section.id,
                label: &section.label,
                group: None,
            })
            .chain(section.subsections.iter().map(move |sub| Entry {
                id: &sub.id,
                label: &sub.label,
                group: Some(section.id.as_str()),
            }))
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.flatten().any(|entry| entry.id == id)
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.flatten()
            .find(|entry| entry.id == id)
            .map(|entry| entry.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Section> {
        vec![
            Section::new("intro", "Introduction"),
            Section::new("structure", "Project Structure"),
            Section::new("redis", "Redis Rate Limiting")
                .with_subsection("redis-overview", "Overview")
                .with_subsection("redis-tips", "Pro Tips"),
        ]
    }

    #[test]
    fn test_flatten_puts_parent_before_children() {
        let registry = Registry::new(sample()).unwrap();
        let ids: Vec<&str> = registry.flatten().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec!["intro", "structure", "redis", "redis-overview", "redis-tips"]
        );

        let groups: Vec<Option<&str>> = registry.flatten().map(|e| e.group).collect();
        assert_eq!(groups, vec![None, None, None, Some("redis"), Some("redis")]);
    }

    #[test]
    fn test_rejects_duplicate_ids_across_levels() {
        let mut sections = sample();
        sections[0] = Section::new("intro", "Introduction").with_subsection("structure", "Again");
        assert_eq!(
            Registry::new(sections).unwrap_err(),
            RegistryError::DuplicateId("structure".to_string())
        );
    }

    #[test]
    fn test_rejects_empty_registry_and_empty_ids() {
        assert_eq!(Registry::new(Vec::new()).unwrap_err(), RegistryError::Empty);

        let sections = vec![Section::new("a", "A").with_subsection("", "Nameless")];
        assert_eq!(
            Registry::new(sections).unwrap_err(),
            RegistryError::EmptyId {
                label: "Nameless".to_string()
            }
        );
    }

    #[test]
    fn test_lookups() {
        let registry = Registry::new(sample()).unwrap();
        assert_eq!(registry.first_id(), "intro");
        assert!(registry.contains("redis-tips"));
        assert!(!registry.contains("missing"));
        assert_eq!(registry.label_of("redis-overview"), Some("Overview"));
        assert!(registry.sections()[2].has_group());
        assert!(registry.sections()[2].owns("redis-tips"));
        assert!(!registry.sections()[0].owns("redis-tips"));
    }
}

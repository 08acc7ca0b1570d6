use std::collections::HashSet;

use strum::IntoEnumIterator;

use crate::types::{AppError, AppResult, BuiltinCategory, Category};

/// Token that selects every registered category
pub const ALL_CATEGORIES: &str = "all";

/// A requested category name after lookup in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    Known(&'a Category),
    Unknown(String),
}

impl Resolved<'_> {
    pub fn name(&self) -> &str {
        match self {
            Resolved::Known(category) => &category.name,
            Resolved::Unknown(name) => name,
        }
    }
}

/// Ordered mapping from category name to file pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// The six categories every project starts with
    pub fn builtin() -> Self {
        Self {
            categories: BuiltinCategory::iter().map(Category::from).collect(),
        }
    }

    /// Registry from explicit entries. Names are compared case-insensitively,
    /// so two entries differing only in case are duplicates.
    pub fn from_entries(entries: Vec<Category>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(AppError::Config("category name is empty".to_string()));
            }
            if entry.name.eq_ignore_ascii_case(ALL_CATEGORIES) {
                return Err(AppError::Config(format!(
                    "'{ALL_CATEGORIES}' is reserved and cannot name a category"
                )));
            }
            if entry.pattern.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "category '{}' has an empty pattern",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.to_ascii_lowercase()) {
                return Err(AppError::Config(format!(
                    "category '{}' is defined more than once",
                    entry.name
                )));
            }
        }
        Ok(Self { categories: entries })
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Map requested names onto registry entries.
    ///
    /// Blank names are ignored. A request with nothing left, or one containing
    /// `all`, selects every category in registry order. Otherwise the requested
    /// order is kept, repeated names collapse onto their first occurrence, and
    /// names missing from the registry come back as [`Resolved::Unknown`].
    /// Matching ignores ASCII case throughout.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Vec<Resolved<'_>> {
        let names: Vec<&str> = requested
            .iter()
            .map(|r| r.as_ref().trim())
            .filter(|name| !name.is_empty())
            .collect();
        let wants_all = names.is_empty()
            || names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(ALL_CATEGORIES));
        if wants_all {
            return self.categories.iter().map(Resolved::Known).collect();
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for name in names {
            if !seen.insert(name.to_ascii_lowercase()) {
                continue;
            }
            match self.get(name) {
                Some(category) => resolved.push(Resolved::Known(category)),
                None => resolved.push(Resolved::Unknown(name.to_string())),
            }
        }
        resolved
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_request_selects_all_in_order() {
        let registry = CategoryRegistry::builtin();
        let resolved = registry.resolve::<&str>(&[]);
        let names: Vec<&str> = resolved.iter().map(|r| r.name()).collect();
        assert_eq!(names, registry.names());
    }

    #[test]
    fn all_token_selects_everything() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.resolve(&["unit", "all"]).len(), 6);
    }

    #[test]
    fn requested_order_is_kept_and_deduplicated() {
        let registry = CategoryRegistry::builtin();
        let resolved = registry.resolve(&["security", "unit", "security"]);
        let names: Vec<&str> = resolved.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["security", "unit"]);
    }

    #[test]
    fn unknown_names_are_reported() {
        let registry = CategoryRegistry::builtin();
        let resolved = registry.resolve(&["unit", "smoke"]);
        assert_eq!(resolved[1], Resolved::Unknown("smoke".to_string()));
    }

    #[test]
    fn blank_request_selects_all() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.resolve(&[""]).len(), 6);
        assert_eq!(registry.resolve(&[" ", ""]).len(), 6);
    }

    #[test]
    fn names_match_regardless_of_case() {
        let registry = CategoryRegistry::builtin();
        let resolved = registry.resolve(&["Unit", "SECURITY", "unit"]);
        let names: Vec<&str> = resolved.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["unit", "security"]);
        assert_eq!(registry.resolve(&["ALL"]).len(), 6);
        assert_eq!(registry.get("Api").map(|c| c.name.as_str()), Some("api"));
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let result = CategoryRegistry::from_entries(vec![
            Category::new("unit", "a/"),
            Category::new("unit", "b/"),
        ]);
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = CategoryRegistry::from_entries(vec![
            Category::new("smoke", "a/"),
            Category::new("Smoke", "b/"),
        ]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn reserved_and_empty_entries_are_rejected() {
        assert!(CategoryRegistry::from_entries(vec![Category::new("all", "a/")]).is_err());
        assert!(CategoryRegistry::from_entries(vec![Category::new("All", "a/")]).is_err());
        assert!(CategoryRegistry::from_entries(vec![Category::new("unit", " ")]).is_err());
        assert!(CategoryRegistry::from_entries(vec![Category::new("", "a/")]).is_err());
    }
}

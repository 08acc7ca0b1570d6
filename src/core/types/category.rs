use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The fixed set of categories every project starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BuiltinCategory {
    Unit,
    Integration,
    Api,
    Database,
    Security,
    Performance,
}

impl BuiltinCategory {
    /// Default file pattern handed to the test tool for this category
    pub fn default_pattern(&self) -> &'static str {
        match self {
            BuiltinCategory::Unit => "tests/unit/",
            BuiltinCategory::Integration => "tests/integration/",
            BuiltinCategory::Api => "tests/api/",
            BuiltinCategory::Database => "tests/database/",
            BuiltinCategory::Security => "tests/security/",
            BuiltinCategory::Performance => "tests/performance/",
        }
    }
}

/// A named group of tests and the pattern that selects its files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub name: String,
    pub pattern: String,
}

impl Category {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

impl From<BuiltinCategory> for Category {
    fn from(builtin: BuiltinCategory) -> Self {
        Category::new(builtin.as_ref(), builtin.default_pattern())
    }
}

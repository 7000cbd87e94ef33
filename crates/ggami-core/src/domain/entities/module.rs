//! Selectable feature modules and the registry that holds them.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

/// File a [`CodeSnippet`] is injected into (legacy mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InjectionTarget {
    #[serde(rename = "main.go")]
    MainGo,
    #[serde(rename = "go.mod")]
    GoMod,
    #[serde(rename = "index.html")]
    IndexHtml,
}

impl InjectionTarget {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::MainGo => "main.go",
            Self::GoMod => "go.mod",
            Self::IndexHtml => "index.html",
        }
    }
}

impl fmt::Display for InjectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Grouping shown in module listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    Feature,
    Ui,
    Utils,
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature => f.write_str("feature"),
            Self::Ui => f.write_str("ui"),
            Self::Utils => f.write_str("utils"),
        }
    }
}

/// A piece of code spliced in front of `marker` inside `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSnippet {
    pub target: InjectionTarget,
    pub marker: String,
    pub content: String,
}

impl CodeSnippet {
    pub fn new(
        target: InjectionTarget,
        marker: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target,
            marker: marker.into(),
            content: content.into(),
        }
    }
}

/// A selectable feature unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ModuleCategory,
    pub dependencies: Vec<String>,
    pub snippets: Vec<CodeSnippet>,
}

impl ModuleDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: ModuleCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            dependencies: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    pub fn snippet(mut self, snippet: CodeSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }
}

/// Read-only, ordered set of known modules.
///
/// Built once at startup and shared (usually behind an `Arc`) by every
/// generation run. Nothing mutates it after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDef>,
}

impl ModuleRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn new(modules: Vec<ModuleDef>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.id.as_str()) {
                return Err(DomainError::DuplicateModule {
                    id: module.id.clone(),
                });
            }
        }
        Ok(Self { modules })
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleDef> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModuleRegistry {
    type Item = &'a ModuleDef;
    type IntoIter = std::slice::Iter<'a, ModuleDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

//! The generation request.
//!
//! [`ProjectConfig`] mirrors the JSON/TOML document accepted from callers,
//! so enum-like values (field types, database type) stay as strings here and
//! are checked by [`DomainValidator`](crate::domain::DomainValidator).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port used when the request does not set one.
pub const DEFAULT_PORT: u16 = 8080;

/// The complete generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub project_name: String,
    pub target_path: PathBuf,
    pub modules: Vec<String>,

    pub db_server: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Selects the model-driven, multi-file backend.
    pub structured: bool,
    pub models: Vec<ModelDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbac: Option<RbacConfig>,
}

impl ProjectConfig {
    pub fn new(project_name: impl Into<String>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            target_path: target_path.into(),
            ..Self::default()
        }
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.models.push(model);
        self
    }

    pub fn structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    pub fn with_db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = Some(db_type.into());
        self
    }

    pub fn with_rbac(mut self, rbac: RbacConfig) -> Self {
        self.rbac = Some(rbac);
        self
    }

    pub fn rbac_enabled(&self) -> bool {
        self.rbac.as_ref().is_some_and(|r| r.enabled)
    }

    pub fn effective_port(&self) -> u16 {
        self.port.filter(|p| *p > 0).unwrap_or(DEFAULT_PORT)
    }
}

/// A data model rendered into a struct, handler and two views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDef {
    /// PascalCase, e.g. `Product`.
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.fields.push(FieldDef::new(name, field_type));
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDef {
    /// PascalCase, e.g. `Title`.
    pub name: String,
    /// One of `string`, `int`, `uint`, `float64`, `bool`, `time.Time`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// ORM tags such as `primaryKey`, `unique`, `not null`, `index`.
    pub tags: Vec<String>,
    pub default_value: String,
    /// Defaults to the snake_case field name.
    pub json_name: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Access-control settings for the structured backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RbacConfig {
    pub enabled: bool,
    pub roles: Vec<String>,
    pub jwt_secret: String,
    pub model_perms: Vec<ModelRbac>,
}

impl RbacConfig {
    pub fn enabled_with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Per-model permission rows, one per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelRbac {
    pub model_name: String,
    pub permissions: Vec<RolePermission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePermission {
    pub role: String,
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

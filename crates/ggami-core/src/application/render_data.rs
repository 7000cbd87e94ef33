//! Values handed to the template renderer.
//!
//! Built fresh from a [`ProjectConfig`] for every render call. Per-model
//! templates get the project-wide data plus a `model` key.

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::{
        DbDriver, DbType, FieldDef, FieldType, ModelDef, ProjectConfig, RbacConfig,
        naming::{lower_first, pluralize, to_snake_case},
    },
    error::{Context, GgamiResult},
};

/// Project-wide data for the legacy single-file templates.
#[derive(Debug, Clone, Serialize)]
pub struct LegacyData {
    pub project_name: String,
    pub db_server: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub port: String,
    pub year: i32,
}

impl LegacyData {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            project_name: config.project_name.clone(),
            db_server: config.db_server.clone(),
            db_user: config.db_user.clone(),
            db_password: config.db_password.clone(),
            db_name: config.db_name.clone(),
            port: config.effective_port().to_string(),
            year: Utc::now().year(),
        }
    }

    pub fn to_value(&self) -> GgamiResult<Value> {
        serde_json::to_value(self).context("serializing project data")
    }
}

/// Project-wide data for the structured templates.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredData {
    pub project_name: String,
    pub db_type: DbType,
    pub db_server: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub port: String,
    pub models: Vec<ModelData>,
    pub driver: DbDriver,
    pub has_rbac: bool,
    pub roles: Vec<String>,
    pub jwt_secret: String,
    /// Go source for the role → model → permission map.
    pub rbac_matrix: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelData {
    /// PascalCase, as given.
    pub name: String,
    pub name_lower: String,
    pub name_snake: String,
    pub name_plural: String,
    /// Output file stem, e.g. `blogpost` for `BlogPost`.
    pub file_stem: String,
    pub fields: Vec<FieldData>,
    /// Some field is a `time.Time`, so the model file imports `time`.
    pub uses_time: bool,
    /// Go name of the primary key field.
    pub primary_key: String,
    /// No field is a key, so the struct embeds `gorm.Model` for one.
    pub embeds_gorm_model: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldData {
    pub name: String,
    pub go_type: String,
    /// ORM tags joined with `;`.
    pub gorm_tag: String,
    pub json_name: String,
    pub input_type: String,
    pub default_value: String,
    pub is_id: bool,
}

impl StructuredData {
    pub fn from_config(config: &ProjectConfig) -> Self {
        // Validation already rejected unknown values; fall back to the default
        // driver for anything left.
        let db_type = config
            .db_type
            .as_deref()
            .and_then(|s| s.parse::<DbType>().ok())
            .unwrap_or_default();

        let rbac = config.rbac.as_ref().filter(|r| r.enabled);

        Self {
            project_name: config.project_name.clone(),
            db_type,
            db_server: config.db_server.clone(),
            db_user: config.db_user.clone(),
            db_password: config.db_password.clone(),
            db_name: config.db_name.clone(),
            port: config.effective_port().to_string(),
            models: config.models.iter().map(ModelData::from_model).collect(),
            driver: db_type.driver(),
            has_rbac: rbac.is_some(),
            roles: rbac.map(|r| r.roles.clone()).unwrap_or_default(),
            jwt_secret: rbac.map(|r| r.jwt_secret.clone()).unwrap_or_default(),
            rbac_matrix: rbac.map(rbac_matrix_source).unwrap_or_default(),
            year: Utc::now().year(),
        }
    }

    pub fn to_value(&self) -> GgamiResult<Value> {
        serde_json::to_value(self).context("serializing project data")
    }

    /// Project data plus `model`, for per-model templates.
    pub fn for_model(&self, model: &ModelData) -> GgamiResult<Value> {
        let mut value = self.to_value()?;
        if let Value::Object(map) = &mut value {
            let model = serde_json::to_value(model)
                .context(format!("serializing model '{}'", model.name))?;
            map.insert("model".into(), model);
        }
        Ok(value)
    }
}

impl ModelData {
    pub fn from_model(model: &ModelDef) -> Self {
        let fields: Vec<FieldData> = model.fields.iter().map(FieldData::from_field).collect();
        let key = fields
            .iter()
            .find(|f| f.is_id)
            .or_else(|| fields.iter().find(|f| f.name == "ID"));

        Self {
            name: model.name.clone(),
            name_lower: lower_first(&model.name),
            name_snake: to_snake_case(&model.name),
            name_plural: pluralize(&model.name),
            file_stem: model.name.to_lowercase(),
            uses_time: fields.iter().any(|f| f.go_type == FieldType::Time.go_type()),
            primary_key: key.map_or_else(|| "ID".to_string(), |f| f.name.clone()),
            embeds_gorm_model: key.is_none(),
            fields,
        }
    }
}

impl FieldData {
    pub fn from_field(field: &FieldDef) -> Self {
        let field_type = field.field_type.parse::<FieldType>().unwrap_or(FieldType::String);
        let json_name = if field.json_name.is_empty() {
            to_snake_case(&field.name)
        } else {
            field.json_name.clone()
        };

        Self {
            name: field.name.clone(),
            go_type: field_type.go_type().to_string(),
            gorm_tag: field.tags.join(";"),
            json_name,
            input_type: field_type.input_type().to_string(),
            default_value: field.default_value.clone(),
            is_id: field.has_tag("primaryKey"),
        }
    }
}

/// Go map literal: one entry per role, each holding that role's permission
/// rows for every model that mentions it.
pub fn rbac_matrix_source(rbac: &RbacConfig) -> String {
    let mut out = String::from("map[string]map[string]Permission{\n");
    for role in &rbac.roles {
        out.push_str(&format!("\t{}: {{\n", go_quote(role)));
        for model in &rbac.model_perms {
            for perm in model.permissions.iter().filter(|p| &p.role == role) {
                out.push_str(&format!(
                    "\t\t{}: {{Create: {}, Read: {}, Update: {}, Delete: {}}},\n",
                    go_quote(&model.model_name),
                    perm.create,
                    perm.read,
                    perm.update,
                    perm.delete
                ));
            }
        }
        out.push_str("\t},\n");
    }
    out.push('}');
    out
}

/// Go interpreted string literal for `s`.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

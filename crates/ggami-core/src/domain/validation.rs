use std::collections::HashSet;

use crate::domain::{
    entities::{ModelDef, ProjectConfig},
    error::ValidationError,
    value_objects::{DbType, FieldType, Language},
};

/// Keywords of the generated backend language; model names become Go
/// identifiers.
const GO_RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Centralized request validation.
///
/// Runs before anything touches the filesystem. Reports the first problem
/// found, in field order.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_config(config: &ProjectConfig, language: &str) -> Result<(), ValidationError> {
        Self::validate_project_name(&config.project_name)?;

        if config.target_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyTargetPath);
        }

        language.parse::<Language>()?;

        if config.structured && !config.models.is_empty() {
            Self::validate_models(&config.models)?;

            if let Some(db_type) = config.db_type.as_deref().filter(|s| !s.is_empty()) {
                db_type.parse::<DbType>()?;
            }
        }

        if let Some(rbac) = config.rbac.as_ref().filter(|r| r.enabled) {
            if rbac.roles.is_empty() {
                return Err(ValidationError::RbacWithoutRoles);
            }
            if let Some(role) = rbac.roles.iter().find(|r| !is_name(r, true)) {
                return Err(ValidationError::InvalidRoleName { role: role.clone() });
            }
        }

        Ok(())
    }

    /// `^[A-Za-z][A-Za-z0-9_-]*$`
    pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        if !is_name(name, true) {
            return Err(ValidationError::InvalidProjectName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn validate_models(models: &[ModelDef]) -> Result<(), ValidationError> {
        let mut names = HashSet::new();

        for model in models {
            if model.name.is_empty() {
                return Err(ValidationError::EmptyModelName);
            }

            if !is_name(&model.name, false) {
                return Err(ValidationError::InvalidModelName {
                    name: model.name.clone(),
                });
            }

            let lower = model.name.to_lowercase();
            if GO_RESERVED_WORDS.contains(&lower.as_str()) {
                return Err(ValidationError::ReservedModelName {
                    name: model.name.clone(),
                });
            }
            if !names.insert(lower) {
                return Err(ValidationError::DuplicateModelName {
                    name: model.name.clone(),
                });
            }

            if model.fields.is_empty() {
                return Err(ValidationError::ModelWithoutFields {
                    model: model.name.clone(),
                });
            }
            for field in &model.fields {
                if field.name.is_empty() {
                    return Err(ValidationError::EmptyFieldName {
                        model: model.name.clone(),
                    });
                }
                if !is_name(&field.name, false) {
                    return Err(ValidationError::InvalidFieldName {
                        model: model.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if field.field_type.parse::<FieldType>().is_err() {
                    return Err(ValidationError::InvalidFieldType {
                        model: model.name.clone(),
                        field: field.name.clone(),
                        field_type: field.field_type.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// ASCII letter, then letters, digits and `_` (plus `-` when `allow_hyphen`).
/// Model and field names are spliced into Go source and output paths.
fn is_name(name: &str, allow_hyphen: bool) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || (allow_hyphen && c == '-'))
}

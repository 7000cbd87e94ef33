// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// A malformed or inconsistent project request.
///
/// Always detected before the pipeline touches the filesystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project name is required")]
    EmptyProjectName,

    #[error(
        "project name '{name}' contains invalid characters \
         (start with a letter, then use letters, digits, hyphens, underscores)"
    )]
    InvalidProjectName { name: String },

    #[error("target path is required")]
    EmptyTargetPath,

    #[error("unsupported language '{language}' (use \"go\" or \"node\")")]
    UnsupportedLanguage { language: String },

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error(
        "model name '{name}' is not a valid identifier \
         (start with a letter, then use letters, digits, underscores)"
    )]
    InvalidModelName { name: String },

    #[error("model name '{name}' is a Go reserved word")]
    ReservedModelName { name: String },

    #[error("duplicate model name '{name}'")]
    DuplicateModelName { name: String },

    #[error("model '{model}' must have at least one field")]
    ModelWithoutFields { model: String },

    #[error("field name cannot be empty in model '{model}'")]
    EmptyFieldName { model: String },

    #[error("field name '{field}' in model '{model}' is not a valid identifier")]
    InvalidFieldName { model: String, field: String },

    #[error("invalid field type '{field_type}' for field '{field}' in model '{model}'")]
    InvalidFieldType {
        model: String,
        field: String,
        field_type: String,
    },

    #[error("unsupported database type '{db_type}'")]
    UnsupportedDatabase { db_type: String },

    #[error("RBAC enabled but no roles defined")]
    RbacWithoutRoles,

    #[error(
        "role name '{role}' contains invalid characters \
         (start with a letter, then use letters, digits, hyphens, underscores)"
    )]
    InvalidRoleName { role: String },
}

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation
    // ========================================================================
    #[error("invalid project configuration: {0}")]
    Validation(#[from] ValidationError),

    // ========================================================================
    // Module resolution
    // ========================================================================
    #[error("unknown module '{id}'")]
    UnknownModule { id: String },

    #[error("module '{module}' requires module '{dependency}' which is not selected")]
    MissingDependency { module: String, dependency: String },

    #[error("circular dependency detected among modules: {}", .unresolved.join(", "))]
    CyclicDependency { unresolved: Vec<String> },

    // ========================================================================
    // Registry integrity
    // ========================================================================
    #[error("module '{id}' is registered more than once")]
    DuplicateModule { id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation(ValidationError::InvalidProjectName { .. })
            | Self::Validation(ValidationError::EmptyProjectName) => vec![
                "Project names start with a letter".into(),
                "Then use letters, digits, '-' or '_' (e.g. my-blog, shop_api)".into(),
            ],
            Self::Validation(ValidationError::UnsupportedLanguage { .. }) => vec![
                "Supported languages:".into(),
                "  • go   - Go + HTMX (legacy and structured modes)".into(),
                "  • node - Node.js + HTMX (legacy mode)".into(),
            ],
            Self::Validation(ValidationError::InvalidFieldType { .. }) => vec![
                "Allowed field types: string, int, uint, float64, bool, time.Time".into(),
            ],
            Self::Validation(ValidationError::UnsupportedDatabase { .. }) => vec![
                "Supported databases: mssql, postgres, mysql, sqlite".into(),
            ],
            Self::Validation(ValidationError::InvalidModelName { .. })
            | Self::Validation(ValidationError::InvalidFieldName { .. }) => vec![
                "Model and field names become Go identifiers and file names".into(),
                "Use PascalCase letters and digits, e.g. BlogPost, CreatedAt".into(),
            ],
            Self::Validation(ValidationError::InvalidRoleName { .. }) => vec![
                "Role names start with a letter".into(),
                "Then use letters, digits, '-' or '_' (e.g. admin, content-editor)".into(),
            ],
            Self::Validation(ValidationError::ReservedModelName { name }) => vec![
                format!("'{name}' cannot be used as a Go identifier"),
                format!("Try a more specific name, e.g. '{name}Item'"),
            ],
            Self::Validation(ValidationError::RbacWithoutRoles) => vec![
                "Define at least one role (e.g. --rbac-role admin)".into(),
                "Or disable access control".into(),
            ],
            Self::UnknownModule { id } => vec![
                format!("No module with id '{id}' exists"),
                "Try: ggami modules".into(),
            ],
            Self::MissingDependency { dependency, .. } => vec![
                "Dependencies are never added automatically".into(),
                format!("Select it explicitly: -m {dependency}"),
            ],
            Self::CyclicDependency { .. } => vec![
                "The module registry contains a dependency cycle".into(),
                "This is a bug in the registry, please report it".into(),
            ],
            _ => vec!["Check the request and try again".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::MissingDependency { .. } => ErrorCategory::Validation,
            Self::UnknownModule { .. } => ErrorCategory::NotFound,
            Self::CyclicDependency { .. } | Self::DuplicateModule { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

//! Value objects for the generation domain.
//!
//! These are small, `Copy` enums parsed from the free-form strings that
//! arrive in a [`ProjectConfig`](super::ProjectConfig). Parsing is
//! case-insensitive and accepts a few common aliases; `Display` always emits
//! the canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;

// ============================================================================
// Language
// ============================================================================

/// Output stack a project is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Node,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::Go, Language::Node];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Node => "node",
        }
    }

    /// Whether the structured (model-driven, multi-file) backend exists for
    /// this language.
    pub const fn supports_structured(self) -> bool {
        matches!(self, Self::Go)
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Self::Go),
            "node" | "nodejs" | "js" => Ok(Self::Node),
            _ => Err(ValidationError::UnsupportedLanguage {
                language: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field types
// ============================================================================

/// Allowed model field types.
///
/// The canonical spelling is the Go type name because the structured backend
/// emits it verbatim into model structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Int,
    Uint,
    Float64,
    Bool,
    Time,
}

impl FieldType {
    pub const ALL: &'static [FieldType] = &[
        FieldType::String,
        FieldType::Int,
        FieldType::Uint,
        FieldType::Float64,
        FieldType::Bool,
        FieldType::Time,
    ];

    /// Go type used in generated model structs.
    pub const fn go_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Time => "time.Time",
        }
    }

    /// HTML `<input type=..>` used in generated forms.
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::String => "text",
            Self::Int | Self::Uint | Self::Float64 => "number",
            Self::Bool => "checkbox",
            Self::Time => "datetime-local",
        }
    }
}

impl FromStr for FieldType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only: these names end up in generated source.
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "uint" => Ok(Self::Uint),
            "float64" => Ok(Self::Float64),
            "bool" => Ok(Self::Bool),
            "time.Time" => Ok(Self::Time),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_type())
    }
}

// ============================================================================
// Database
// ============================================================================

/// Database backends the structured generator knows a driver for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Mssql,
    Postgres,
    Mysql,
    #[default]
    Sqlite,
}

/// Connection details for one database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DbDriver {
    /// ORM driver import path.
    pub import_path: &'static str,
    /// Dialector constructor passed to `gorm.Open`.
    pub dial_func: &'static str,
    /// Go format string for the DSN.
    pub dsn_format: &'static str,
    /// Arguments for `dsn_format`, in order, as generated Go identifiers.
    pub dsn_args: &'static str,
    /// `go.mod` requirement line.
    pub go_mod_require: &'static str,
}

impl DbType {
    pub const ALL: &'static [DbType] = &[
        DbType::Mssql,
        DbType::Postgres,
        DbType::Mysql,
        DbType::Sqlite,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mssql => "mssql",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    pub const fn driver(self) -> DbDriver {
        match self {
            Self::Mssql => DbDriver {
                import_path: "gorm.io/driver/sqlserver",
                dial_func: "sqlserver.Open",
                dsn_format: r#""sqlserver://%s:%s@%s?database=%s""#,
                dsn_args: "dbUser, dbPassword, dbServer, dbName",
                go_mod_require: "gorm.io/driver/sqlserver v1.5.4",
            },
            Self::Postgres => DbDriver {
                import_path: "gorm.io/driver/postgres",
                dial_func: "postgres.Open",
                dsn_format: r#""host=%s user=%s password=%s dbname=%s port=5432 sslmode=disable""#,
                dsn_args: "dbServer, dbUser, dbPassword, dbName",
                go_mod_require: "gorm.io/driver/postgres v1.5.11",
            },
            Self::Mysql => DbDriver {
                import_path: "gorm.io/driver/mysql",
                dial_func: "mysql.Open",
                dsn_format: r#""%s:%s@tcp(%s)/%s?charset=utf8mb4&parseTime=True&loc=Local""#,
                dsn_args: "dbUser, dbPassword, dbServer, dbName",
                go_mod_require: "gorm.io/driver/mysql v1.5.7",
            },
            Self::Sqlite => DbDriver {
                import_path: "gorm.io/driver/sqlite",
                dial_func: "sqlite.Open",
                dsn_format: r#""%s.db""#,
                dsn_args: "dbName",
                go_mod_require: "gorm.io/driver/sqlite v1.5.7",
            },
        }
    }
}

impl FromStr for DbType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(Self::Mssql),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(ValidationError::UnsupportedDatabase {
                db_type: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Template delimiters
// ============================================================================

/// Placeholder syntax for one render call.
///
/// Source files use the standard `{{ }}` / `{% %}` pair. Markup files that
/// are themselves templates for the generated project use [`Delimiters::MARKUP`]
/// so their own `{{ }}` actions pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiters {
    pub variable_start: &'static str,
    pub variable_end: &'static str,
    pub block_start: &'static str,
    pub block_end: &'static str,
    pub comment_start: &'static str,
    pub comment_end: &'static str,
}

impl Delimiters {
    pub const STANDARD: Self = Self {
        variable_start: "{{",
        variable_end: "}}",
        block_start: "{%",
        block_end: "%}",
        comment_start: "{#",
        comment_end: "#}",
    };

    pub const MARKUP: Self = Self {
        variable_start: "<<",
        variable_end: ">>",
        block_start: "<%",
        block_end: "%>",
        comment_start: "<#",
        comment_end: "#>",
    };

    pub fn is_standard(&self) -> bool {
        *self == Self::STANDARD
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::STANDARD
    }
}

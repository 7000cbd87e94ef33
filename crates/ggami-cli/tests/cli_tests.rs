//! Integration tests for the `ggami` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch working directory with an empty config file, so runs never
/// read the developer's own configuration.
struct Sandbox {
    dir: TempDir,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("ggami.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!("ggami");
        cmd.current_dir(self.path())
            .env("GGAMI_CONFIG", &self.config)
            .env_remove("RUST_LOG")
            .env_remove("NO_COLOR");
        cmd
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
    }
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ggami"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("modules"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_is_usage_error() {
    Sandbox::new().cmd().assert().failure().code(2);
}

#[test]
fn new_help_mentions_flags() {
    Sandbox::new()
        .cmd()
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--structured"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--dry-run"));
}

// ── modules ───────────────────────────────────────────────────────────────────

#[test]
fn modules_table_lists_builtins() {
    Sandbox::new()
        .cmd()
        .arg("modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available Modules"))
        .stdout(predicate::str::contains("auth-login"))
        .stdout(predicate::str::contains("ui-hero"));
}

#[test]
fn modules_json_is_parseable() {
    let out = Sandbox::new()
        .cmd()
        .args(["modules", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["auth-login", "ui-hero"]);
    assert_eq!(value[1]["category"], "ui");
}

#[test]
fn modules_csv_has_header() {
    Sandbox::new()
        .cmd()
        .args(["ls", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,name,category,dependencies"));
}

// ── new: legacy ───────────────────────────────────────────────────────────────

#[test]
fn new_go_project_with_modules() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "blog", "-m", "auth-login", "-m", "ui-hero", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'blog' created"))
        .stdout(predicate::str::contains("go run ."));

    assert!(sb.read("blog/go.mod").starts_with("module blog\n"));
    assert!(sb.read("blog/main.go").contains("POST /api/login"));
    let index = sb.read("blog/templates/index.html");
    assert!(index.contains("Build Faster with Ggami"));
    assert!(index.contains("<!-- @INJECT_BODY -->"));
}

#[test]
fn new_node_project_in_parent_path() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "site", "--lang", "node", "--path", "apps", "-m", "ui-hero", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("npm install"));

    assert!(sb.read("apps/site/package.json").contains("\"name\": \"site\""));
    assert!(sb.read("apps/site/views/index.html").contains("Build Faster with Ggami"));
}

#[test]
fn config_defaults_select_language_and_modules() {
    let sb = Sandbox::new();
    fs::write(
        &sb.config,
        "[defaults]\nlanguage = \"node\"\nmodules = [\"ui-hero\"]\n",
    )
    .unwrap();

    sb.cmd().args(["new", "site", "-y"]).assert().success();

    assert!(sb.path().join("site/server.js").is_file());
    assert!(sb.read("site/views/index.html").contains("Build Faster with Ggami"));
}

#[test]
fn environment_overrides_config_file() {
    let sb = Sandbox::new();
    fs::write(&sb.config, "[defaults]\nlanguage = \"node\"\n").unwrap();

    sb.cmd()
        .env("GGAMI__DEFAULTS__LANGUAGE", "go")
        .args(["config", "get", "defaults.language"])
        .assert()
        .success()
        .stdout("go\n");
}

// ── new: structured ───────────────────────────────────────────────────────────

#[test]
fn new_structured_project_from_flags() {
    let sb = Sandbox::new();
    sb.cmd()
        .args([
            "new",
            "shop",
            "--structured",
            "--model",
            "Product:ID:uint:primaryKey,Name:string,Price:float64",
            "--db",
            "postgres",
            "-y",
        ])
        .assert()
        .success();

    for file in [
        "shop/main.go",
        "shop/go.mod",
        "shop/models/product.go",
        "shop/handlers/product.go",
        "shop/handlers/helpers.go",
        "shop/templates/layout.html",
        "shop/templates/product_list.html",
        "shop/templates/product_form.html",
    ] {
        assert!(sb.path().join(file).is_file(), "missing {file}");
    }
    assert!(sb.read("shop/go.mod").contains("gorm.io/driver/postgres"));
    assert!(sb.read("shop/models/product.go").contains("type Product struct {"));
    assert!(!sb.path().join("shop/middleware/auth.go").exists());
}

#[test]
fn new_structured_project_from_spec_file() {
    let sb = Sandbox::new();
    fs::write(
        sb.path().join("shop.toml"),
        r#"
structured = true
dbType = "sqlite"

[[models]]
name = "Post"
fields = [{ name = "Title", type = "string" }]

[rbac]
enabled = true
roles = ["admin", "viewer"]
"#,
    )
    .unwrap();

    sb.cmd()
        .args(["new", "shop", "--spec", "shop.toml", "-y"])
        .assert()
        .success();

    assert!(sb.path().join("shop/middleware/rbac.go").is_file());
    assert!(sb.read("shop/models/user.go").contains("const DefaultRole = \"viewer\""));
    assert!(sb.read("shop/templates/register.html").contains("viewer role"));
    assert!(sb.path().join("shop/templates/forgot_password.html").is_file());
}

// ── new: dry run ──────────────────────────────────────────────────────────────

#[test]
fn dry_run_prints_plan_and_writes_nothing() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "blog", "-m", "ui-hero", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("legacy"))
        .stdout(predicate::str::contains("ValidateConfig"))
        .stdout(predicate::str::contains("Finalize"));

    assert!(!sb.path().join("blog").exists());
}

#[test]
fn dry_run_json_plan() {
    let sb = Sandbox::new();
    let out = sb
        .cmd()
        .args([
            "--output-format",
            "json",
            "new",
            "shop",
            "--structured",
            "--model",
            "Post:Title:string",
            "--dry-run",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(plan["mode"], "structured");
    let steps: Vec<_> = plan["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert!(steps.contains(&"GenerateModels".to_string()));
    assert!(!steps.contains(&"InjectModules".to_string()));
    assert!(!sb.path().join("shop").exists());
}

// ── new: failures ─────────────────────────────────────────────────────────────

#[test]
fn existing_directory_is_refused() {
    let sb = Sandbox::new();
    fs::create_dir(sb.path().join("blog")).unwrap();

    sb.cmd()
        .args(["new", "blog", "-y"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn force_replaces_existing_directory() {
    let sb = Sandbox::new();
    fs::create_dir(sb.path().join("blog")).unwrap();
    fs::write(sb.path().join("blog/stale.txt"), "old").unwrap();

    sb.cmd().args(["new", "blog", "-y", "--force"]).assert().success();

    assert!(sb.path().join("blog/main.go").is_file());
    assert!(!sb.path().join("blog/stale.txt").exists());
}

#[test]
fn unknown_module_is_not_found() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "blog", "-m", "does-not-exist", "-y"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("unknown module 'does-not-exist'"))
        .stderr(predicate::str::contains("ggami modules"));

    assert!(!sb.path().join("blog").exists());
}

#[test]
fn invalid_project_name_is_user_error() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "9lives", "-y"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid characters"));

    assert!(!sb.path().join("9lives").exists());
}

#[test]
fn invalid_field_type_is_user_error() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "shop", "--structured", "--model", "Product:Name:text", "-y"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid field type 'text'"))
        .stderr(predicate::str::contains("float64"));

    assert!(!sb.path().join("shop").exists());
}

#[test]
fn model_name_must_be_identifier() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["new", "shop", "--structured", "--model", "../Escaped:Title:string", "-y"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a valid identifier"));

    assert!(!sb.path().join("shop").exists());
    assert!(!sb.path().join("escaped.go").exists());
}

#[test]
fn malformed_model_flag_is_rejected_by_parser() {
    Sandbox::new()
        .cmd()
        .args(["new", "shop", "--model", "Product"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Name:Field:type"));
}

// ── config / init / completions ───────────────────────────────────────────────

#[test]
fn missing_explicit_config_is_config_error() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["--config", "absent.toml", "modules"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn unknown_config_key_is_user_error() {
    Sandbox::new()
        .cmd()
        .args(["config", "get", "nope.nope"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("defaults.language"));
}

#[test]
fn config_path_reports_explicit_file() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ggami.toml"));
}

#[test]
fn init_writes_loadable_config() {
    let sb = Sandbox::new();
    let target = sb.path().join("conf").join("ggami.toml");

    sb.cmd()
        .arg("--config")
        .arg(&target)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));

    assert!(fs::read_to_string(&target).unwrap().contains("[defaults]"));

    sb.cmd()
        .arg("--config")
        .arg(&target)
        .args(["config", "get", "defaults.port"])
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn init_keeps_existing_file_without_force() {
    let sb = Sandbox::new();
    fs::write(&sb.config, "# mine\n").unwrap();

    sb.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&sb.config).unwrap(), "# mine\n");
}

#[test]
fn completions_for_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ggami"));
}

//! Modules that ship with ggami.
//!
//! [`builtin_registry`] is the registry the CLI loads at startup. The list
//! is compiled in; ordering here is the ordering `ggami modules` shows.
//!
//! Snippets target the markers in the legacy templates. A snippet's first
//! line takes the marker's indentation, so it is written unindented.
//!
//! | marker                 | file                          |
//! |------------------------|-------------------------------|
//! | `// @INJECT_ROUTES`    | `main.go` / `server.js`       |
//! | `// @INJECT_REQUIRES`  | `go.mod`                      |
//! | `<!-- @INJECT_HEAD -->`| `index.html`                  |
//! | `<!-- @INJECT_BODY -->`| `index.html`                  |

use tracing::{debug, instrument};

use ggami_core::domain::{
    CodeSnippet, DomainError, InjectionTarget, ModuleCategory, ModuleDef, ModuleRegistry,
};

pub const ROUTES_MARKER: &str = "// @INJECT_ROUTES";
pub const REQUIRES_MARKER: &str = "// @INJECT_REQUIRES";
pub const HEAD_MARKER: &str = "<!-- @INJECT_HEAD -->";
pub const BODY_MARKER: &str = "<!-- @INJECT_BODY -->";

/// Build the registry of built-in modules.
#[instrument]
pub fn builtin_registry() -> Result<ModuleRegistry, DomainError> {
    let modules = builtin_modules();
    debug!(count = modules.len(), "Loaded built-in modules");
    ModuleRegistry::new(modules)
}

/// The built-in module definitions, in listing order.
pub fn builtin_modules() -> Vec<ModuleDef> {
    vec![auth_login(), ui_hero()]
}

fn auth_login() -> ModuleDef {
    ModuleDef::new("auth-login", "Simple Login Form", ModuleCategory::Feature)
        .description("Username/password login form posting to /api/login with htmx.")
        .snippet(CodeSnippet::new(
            InjectionTarget::IndexHtml,
            BODY_MARKER,
            r##"<section class="mt-8 bg-white p-6 rounded-lg shadow-md max-w-md">
            <h2 class="text-xl font-bold mb-4">Login</h2>
            <form hx-post="/api/login" hx-target="#login-result" hx-swap="innerHTML" class="space-y-4">
                <label class="block">
                    <span class="text-gray-700">Username</span>
                    <input type="text" name="username" class="w-full border rounded p-2" />
                </label>
                <label class="block">
                    <span class="text-gray-700">Password</span>
                    <input type="password" name="password" class="w-full border rounded p-2" />
                </label>
                <button type="submit" class="bg-indigo-600 text-white px-4 py-2 rounded hover:bg-indigo-700">Login</button>
            </form>
            <div id="login-result" class="mt-4"></div>
        </section>"##,
        ))
        .snippet(CodeSnippet::new(
            InjectionTarget::MainGo,
            ROUTES_MARKER,
            r#"mux.HandleFunc("POST /api/login", func(w http.ResponseWriter, r *http.Request) {
		username := r.FormValue("username")
		password := r.FormValue("password")
		// Replace with a real credential check.
		if username == "admin" && password == "admin" {
			fmt.Fprint(w, `<p class="text-green-600">Welcome back, admin.</p>`)
			return
		}
		fmt.Fprint(w, `<p class="text-red-500">Invalid credentials.</p>`)
	})"#,
        ))
}

fn ui_hero() -> ModuleDef {
    ModuleDef::new("ui-hero", "Modern Hero Section", ModuleCategory::Ui)
        .description("Full-width hero banner with a call to action.")
        .snippet(CodeSnippet::new(
            InjectionTarget::IndexHtml,
            BODY_MARKER,
            r##"<section class="bg-gray-900 text-white py-20 px-10 text-center mt-8 rounded-xl">
            <h1 class="text-4xl font-bold mb-4">Build Faster with Ggami</h1>
            <p class="text-xl text-gray-400 mb-8">A server-rendered starting point with nothing to install.</p>
            <a href="#" class="bg-yellow-500 text-black font-bold py-3 px-8 rounded-full hover:bg-yellow-400 transition">Get Started</a>
        </section>"##,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_without_duplicates() {
        let registry = builtin_registry().unwrap();
        let ids: Vec<_> = registry.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["auth-login", "ui-hero"]);
    }

    #[test]
    fn builtin_modules_have_no_dependencies() {
        for module in builtin_modules() {
            assert!(module.dependencies.is_empty(), "{}", module.id);
            assert!(!module.snippets.is_empty(), "{}", module.id);
        }
    }

    #[test]
    fn snippets_use_known_markers() {
        for module in builtin_modules() {
            for snippet in &module.snippets {
                let expected = match snippet.target {
                    InjectionTarget::MainGo => ROUTES_MARKER,
                    InjectionTarget::GoMod => REQUIRES_MARKER,
                    InjectionTarget::IndexHtml => BODY_MARKER,
                };
                assert_eq!(snippet.marker, expected, "{}", module.id);
            }
        }
    }

    #[test]
    fn html_snippets_keep_fragment_links() {
        let modules = builtin_modules();
        let body = |id: &str| {
            modules
                .iter()
                .find(|m| m.id == id)
                .and_then(|m| m.snippets.iter().find(|s| s.target == InjectionTarget::IndexHtml))
                .map(|s| s.content.clone())
                .unwrap()
        };

        let login = body("auth-login");
        assert!(login.contains(r##"hx-target="#login-result""##));
        assert!(login.trim_end().ends_with("</section>"));

        let hero = body("ui-hero");
        assert!(hero.contains(r##"href="#""##));
        assert!(hero.trim_end().ends_with("</section>"));
    }
}

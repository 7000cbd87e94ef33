//! MiniJinja-backed template renderer with the embedded template set.

use minijinja::{AutoEscape, Environment, syntax::SyntaxConfig};
use serde_json::Value;
use tracing::debug;

use ggami_core::{
    application::{ApplicationError, ports::TemplateRenderer, steps::templates},
    domain::Delimiters,
    error::{GgamiError, GgamiResult},
};

macro_rules! embed {
    ($name:expr, $file:literal) => {
        ($name, include_str!(concat!("../../templates/", $file)))
    };
}

/// Every template the generation steps render, keyed by name.
const EMBEDDED: &[(&str, &str)] = &[
    embed!(templates::GO_MAIN, "go/legacy/main.go"),
    embed!(templates::GO_MOD, "go/legacy/go.mod"),
    embed!(templates::GO_INDEX, "go/legacy/index.html"),
    embed!(templates::NODE_PACKAGE, "node/package.json"),
    embed!(templates::NODE_SERVER, "node/server.js"),
    embed!(templates::NODE_INDEX, "node/index.html"),
    embed!(templates::STRUCTURED_GO_MOD, "go/structured/go.mod"),
    embed!(templates::STRUCTURED_MAIN, "go/structured/main.go"),
    embed!(templates::HELPERS, "go/structured/helpers.go"),
    embed!(templates::BASE_HANDLER, "go/structured/base.go"),
    embed!(templates::MODEL, "go/structured/model.go"),
    embed!(templates::HANDLER, "go/structured/handler.go"),
    embed!(templates::USER_MODEL, "go/structured/user_model.go"),
    embed!(templates::MIDDLEWARE_AUTH, "go/structured/middleware_auth.go"),
    embed!(templates::MIDDLEWARE_RBAC, "go/structured/middleware_rbac.go"),
    embed!(templates::AUTH_HANDLER, "go/structured/auth_handler.go"),
    embed!(templates::LAYOUT, "go/structured/layout.html"),
    embed!(templates::DASHBOARD, "go/structured/dashboard.html"),
    embed!(templates::NOT_FOUND, "go/structured/404.html"),
    embed!(templates::LIST, "go/structured/list.html"),
    embed!(templates::FORM, "go/structured/form.html"),
    embed!(templates::LOGIN, "go/structured/login.html"),
    embed!(templates::REGISTER, "go/structured/register.html"),
    embed!(templates::FORGOT_PASSWORD, "go/structured/forgot_password.html"),
];

/// Renders the embedded templates with MiniJinja.
///
/// Holds one environment per built-in delimiter flavour. Output is never
/// HTML-escaped: the results are source files, not pages.
pub struct MiniJinjaRenderer {
    standard: Environment<'static>,
    markup: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> GgamiResult<Self> {
        Ok(Self {
            standard: build_environment(Delimiters::STANDARD)?,
            markup: build_environment(Delimiters::MARKUP)?,
        })
    }

    /// Names of all embedded templates.
    pub fn template_names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }

    fn source(name: &str) -> GgamiResult<&'static str> {
        EMBEDDED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, source)| *source)
            .ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

impl std::fmt::Debug for MiniJinjaRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaRenderer")
            .field("templates", &EMBEDDED.len())
            .finish()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, data: &Value, delimiters: Delimiters) -> GgamiResult<String> {
        let source = Self::source(template)?;
        let fail = |e: minijinja::Error| -> GgamiError {
            ApplicationError::RenderingFailed {
                template: template.to_string(),
                reason: e.to_string(),
            }
            .into()
        };

        debug!(template, standard = delimiters.is_standard(), "Rendering template");

        if delimiters == Delimiters::STANDARD {
            self.standard
                .render_named_str(template, source, data)
                .map_err(fail)
        } else if delimiters == Delimiters::MARKUP {
            self.markup
                .render_named_str(template, source, data)
                .map_err(fail)
        } else {
            build_environment(delimiters)?
                .render_named_str(template, source, data)
                .map_err(fail)
        }
    }
}

fn build_environment(delimiters: Delimiters) -> GgamiResult<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    if !delimiters.is_standard() {
        let syntax = SyntaxConfig::builder()
            .block_delimiters(delimiters.block_start, delimiters.block_end)
            .variable_delimiters(delimiters.variable_start, delimiters.variable_end)
            .comment_delimiters(delimiters.comment_start, delimiters.comment_end)
            .build()
            .map_err(|e| ApplicationError::RenderingFailed {
                template: "<syntax>".into(),
                reason: e.to_string(),
            })?;
        env.set_syntax(syntax);
    }

    Ok(env)
}

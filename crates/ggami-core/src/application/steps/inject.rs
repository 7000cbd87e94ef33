//! Marker-based snippet splicing for legacy projects.

use tracing::debug;

use crate::domain::{CodeSnippet, InjectionTarget, ModuleDef};

/// Insert `content` directly in front of the first occurrence of `marker`.
///
/// The marker is kept, so later snippets aimed at the same marker land after
/// earlier ones. Sources without the marker come back unchanged.
pub fn inject_before_marker(source: &str, marker: &str, content: &str) -> String {
    if marker.is_empty() || !source.contains(marker) {
        return source.to_string();
    }
    source.replacen(marker, &format!("{content}\n{marker}"), 1)
}

/// In-memory copies of the three injectable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionTargets {
    pub main_source: String,
    pub manifest: String,
    pub markup: String,
}

impl InjectionTargets {
    /// Apply every snippet of every module, modules in the given order.
    ///
    /// `accepts` decides which targets exist for the current language;
    /// snippets for other targets are skipped.
    pub fn apply(&mut self, modules: &[ModuleDef], accepts: impl Fn(InjectionTarget) -> bool) {
        for module in modules {
            for snippet in &module.snippets {
                if !accepts(snippet.target) {
                    debug!(
                        module = %module.id,
                        target = %snippet.target,
                        "Snippet target not used by this language, skipping"
                    );
                    continue;
                }
                self.apply_one(snippet);
            }
        }
    }

    fn apply_one(&mut self, snippet: &CodeSnippet) {
        let file = match snippet.target {
            InjectionTarget::MainGo => &mut self.main_source,
            InjectionTarget::GoMod => &mut self.manifest,
            InjectionTarget::IndexHtml => &mut self.markup,
        };
        if !file.contains(&snippet.marker) {
            debug!(marker = %snippet.marker, target = %snippet.target, "Marker not found");
        }
        *file = inject_before_marker(file.as_str(), &snippet.marker, &snippet.content);
    }
}

//! Module dependency resolution.
//!
//! Turns the flat list of module ids a user selected into an execution order
//! in which every module comes after the modules it depends on. Dependencies
//! are never pulled in implicitly: a selected module whose dependency was not
//! also selected is an error.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::{
    entities::{ModuleDef, ModuleRegistry},
    error::DomainError,
};

/// Order `selected` so that dependencies precede dependents (Kahn's algorithm).
///
/// Repeated ids in `selected` count once, at their first position. Among
/// modules that become ready at the same time, selection order wins, so the
/// result is deterministic for a given input.
pub fn resolve<S: AsRef<str>>(
    selected: &[S],
    registry: &ModuleRegistry,
) -> Result<Vec<ModuleDef>, DomainError> {
    // ── 1. Look up every selected id ────────────────────────────────────
    let mut nodes: Vec<&ModuleDef> = Vec::with_capacity(selected.len());
    let mut seen = HashSet::new();
    for id in selected {
        let id = id.as_ref();
        if !seen.insert(id) {
            continue;
        }
        let module = registry
            .get(id)
            .ok_or_else(|| DomainError::UnknownModule { id: id.to_string() })?;
        nodes.push(module);
    }

    // ── 2. Every dependency must itself be selected ─────────────────────
    for module in &nodes {
        if let Some(dep) = module.dependencies.iter().find(|d| !seen.contains(d.as_str())) {
            return Err(DomainError::MissingDependency {
                module: module.id.clone(),
                dependency: dep.clone(),
            });
        }
    }

    // ── 3. In-degree = number of own dependencies ───────────────────────
    let mut in_degree: HashMap<&str, usize> = nodes
        .iter()
        .map(|m| (m.id.as_str(), m.dependencies.len()))
        .collect();

    let mut ready: VecDeque<&ModuleDef> = nodes
        .iter()
        .copied()
        .filter(|m| m.dependencies.is_empty())
        .collect();

    // ── 4. Drain ────────────────────────────────────────────────────────
    let mut ordered = Vec::with_capacity(nodes.len());
    while let Some(module) = ready.pop_front() {
        ordered.push(module.clone());

        for dependent in &nodes {
            let hits = dependent
                .dependencies
                .iter()
                .filter(|d| **d == module.id)
                .count();
            if hits == 0 {
                continue;
            }
            if let Some(degree) = in_degree.get_mut(dependent.id.as_str()) {
                *degree = degree.saturating_sub(hits);
                if *degree == 0 && !ordered.iter().any(|m: &ModuleDef| m.id == dependent.id) {
                    ready.push_back(dependent);
                }
            }
        }
    }

    if ordered.len() < nodes.len() {
        let unresolved = nodes
            .iter()
            .filter(|m| !ordered.iter().any(|o| o.id == m.id))
            .map(|m| m.id.clone())
            .collect();
        return Err(DomainError::CyclicDependency { unresolved });
    }

    Ok(ordered)
}

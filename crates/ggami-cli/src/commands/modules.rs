//! Implementation of the `ggami modules` command.

use ggami_core::application::ModuleInfo;

use crate::{
    cli::{ListFormat, ModulesArgs},
    commands::build_service,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ModulesArgs, output: OutputManager) -> CliResult<()> {
    let service = build_service()?;
    let modules = service.list_modules();

    // `--output-format json` wins over the table default.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Modules:")?;
            for line in table_lines(&modules) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for m in &modules {
                output.data(&m.id)?;
            }
        }
        ListFormat::Json => {
            output.data(&serde_json::to_string_pretty(&modules)?)?;
        }
        ListFormat::Csv => {
            output.data(&csv(&modules))?;
        }
    }

    Ok(())
}

fn table_lines(modules: &[ModuleInfo]) -> Vec<String> {
    let width = modules.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(modules.len() * 2);

    for m in modules {
        lines.push(format!(
            "  {:<width$}  {:<8}  {}",
            m.id,
            m.category.to_string(),
            m.name
        ));
        if !m.description.is_empty() {
            lines.push(format!("  {:<width$}  {:<8}  {}", "", "", m.description));
        }
        if !m.dependencies.is_empty() {
            lines.push(format!(
                "  {:<width$}  {:<8}  requires: {}",
                "",
                "",
                m.dependencies.join(", ")
            ));
        }
    }
    lines
}

fn csv(modules: &[ModuleInfo]) -> String {
    let mut out = String::from("id,name,category,dependencies");
    for m in modules {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{}",
            csv_field(&m.id),
            csv_field(&m.name),
            m.category,
            csv_field(&m.dependencies.join(";"))
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

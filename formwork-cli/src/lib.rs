use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use formwork_loader::{Builder, GraphResolver, GraphToolkit};

/// Interprets a UI document against the recording backend and returns a
/// printable report of the materialized object graph.
pub fn inspect(input: &Path) -> Result<String> {
    let (builder, built) = interpret(input)?;
    let mut report = builder.toolkit().render_tree(built.root);
    if !built.resources.is_empty() {
        report.push_str("resource modules:\n");
        for module in &built.resources {
            report.push_str("  ");
            report.push_str(module);
            report.push('\n');
        }
    }
    Ok(report)
}

/// Interprets a UI document, reporting only success or failure.
pub fn check(input: &Path) -> Result<()> {
    interpret(input).map(|_| ())
}

type GraphBuilder = Builder<GraphToolkit, GraphResolver>;

fn interpret(input: &Path) -> Result<(GraphBuilder, formwork_loader::Built<formwork_loader::ObjectId>)> {
    let xml = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut doc = formwork_uifile::read_str(&xml)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let mut builder = Builder::new(GraphToolkit::new(), GraphResolver::new());
    let built = builder
        .build(&mut doc)
        .with_context(|| format!("failed to interpret {}", input.display()))?;
    Ok((builder, built))
}

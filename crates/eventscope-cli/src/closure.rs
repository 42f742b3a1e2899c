//! Closure inspection commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use eventscope_closure::{ClosureContext, ClosureReport};
use eventscope_schema::{SchemaGraph, SchemaUnit};

#[derive(Args)]
pub struct UnitArgs {
    /// Descriptor set JSON.
    pub descriptor: PathBuf,
    /// Schema unit (file name inside the set). Optional when the set has one file.
    #[arg(short, long)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum SetKind {
    Events,
    Fields,
    Enums,
}

pub fn load_graph(path: &Path) -> Result<SchemaGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read descriptor json: {}", path.display()))?;
    SchemaGraph::from_json(&text)
        .with_context(|| format!("failed to load descriptor set: {}", path.display()))
}

fn select_unit<'g>(graph: &'g SchemaGraph, file: Option<&str>) -> Result<SchemaUnit<'g>> {
    match file {
        Some(name) => Ok(graph.unit(name)?),
        None => graph.sole_unit().ok_or_else(|| {
            anyhow!(
                "descriptor set has {} files; pick one with --file",
                graph.units().count()
            )
        }),
    }
}

pub fn cmd_units(descriptor: &Path) -> Result<()> {
    let graph = load_graph(descriptor)?;
    for unit in graph.units() {
        println!(
            "{}  {} ({} messages, {} enums)",
            unit.name().bold(),
            unit.package().dimmed(),
            unit.messages().count(),
            unit.enums().count()
        );
    }
    Ok(())
}

fn report_for(target: &UnitArgs) -> Result<ClosureReport> {
    let graph = load_graph(&target.descriptor)?;
    let unit = select_unit(&graph, target.file.as_deref())?;
    let ctx = ClosureContext::new(unit);
    ctx.report()
        .with_context(|| format!("cannot compute closures of {}", unit.name()))
}

pub fn cmd_closure(target: &UnitArgs, json: bool) -> Result<()> {
    let report = report_for(target)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({}.{})",
        "Closure of".green().bold(),
        report.unit,
        report.entry_message,
        report.event_union
    );

    println!("{} ({})", "events".cyan().bold(), report.events.len());
    for event in &report.events {
        let mut flags = Vec::new();
        if event.process {
            flags.push("process");
        }
        if event.parent {
            flags.push("parent");
        }
        if flags.is_empty() {
            println!("  {}", event.full_name);
        } else {
            println!("  {} {}", event.full_name, format!("[{}]", flags.join(", ")).dimmed());
        }
    }

    println!("{} ({})", "fields".cyan().bold(), report.fields.len());
    for name in &report.fields {
        println!("  {name}");
    }

    println!("{} ({})", "enums".cyan().bold(), report.enums.len());
    for name in &report.enums {
        println!("  {name}");
    }

    println!(
        "  {} {} artifacts",
        "→".cyan(),
        report.artifact_count()
    );
    Ok(())
}

pub fn cmd_set(target: &UnitArgs, kind: SetKind) -> Result<()> {
    for name in set_names(&report_for(target)?, kind) {
        println!("{name}");
    }
    Ok(())
}

fn set_names(report: &ClosureReport, kind: SetKind) -> Vec<&str> {
    match kind {
        SetKind::Events => report.events.iter().map(|e| e.full_name.as_str()).collect(),
        SetKind::Fields => report.fields.iter().map(String::as_str).collect(),
        SetKind::Enums => report.enums.iter().map(String::as_str).collect(),
    }
}

//! Rendering of plans and outcomes for the terminal

use std::io::Write;

use anyhow::Result;
use cfn_update_core::{ParameterChange, UpdateOutcome, UpdatePlan};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn write_plan(out: &mut impl Write, plan: &UpdatePlan, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, plan)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Stack: {} ({})", plan.stack.stack_name, plan.stack.status)?;
    if plan.is_empty() {
        writeln!(out, "  No parameter changes")?;
        return Ok(());
    }
    for change in &plan.changes {
        if let ParameterChange::Set {
            key,
            previous,
            value,
        } = change
        {
            let previous = previous.as_deref().unwrap_or("<unset>");
            writeln!(out, "  {key}: {previous} -> {value}")?;
        }
    }
    let kept: Vec<&str> = plan
        .changes
        .iter()
        .filter(|c| matches!(c, ParameterChange::Keep { .. }))
        .map(ParameterChange::key)
        .collect();
    if !kept.is_empty() {
        writeln!(out, "  Unchanged: {}", kept.join(", "))?;
    }
    Ok(())
}

pub fn write_outcome(
    out: &mut impl Write,
    outcome: &UpdateOutcome,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, outcome)?;
        writeln!(out)?;
        return Ok(());
    }

    match outcome {
        UpdateOutcome::Unchanged { stack_name } => {
            writeln!(out, "Stack {stack_name} unchanged: no updates to perform")?;
        }
        UpdateOutcome::Updated {
            stack_name,
            final_status,
            outputs,
            ..
        } => {
            writeln!(out, "Stack {stack_name} updated: {final_status}")?;
            if !outputs.is_empty() {
                writeln!(out, "Outputs:")?;
                for (key, value) in outputs {
                    writeln!(out, "  {key} = {value}")?;
                }
            }
        }
    }
    Ok(())
}

//! Count command handler
//!
//! Runs one full recount and prints how each slot was decided.

use super::discover::label;
use super::load_graph;
use anyhow::Result;
use slotsense::{
    find_container_candidates, tally, EngineConfig, EngineContext, MirrorStatus, ObjectGraph,
    SlotDecision, Tally,
};
use std::path::Path;

pub fn handle(snapshot: &Path, config: &EngineConfig) -> Result<()> {
    let graph = load_graph(snapshot)?;
    for line in report(&graph, config) {
        println!("{}", line);
    }
    Ok(())
}

/// Per-slot decisions and summary, or a single line when the inventory is closed
fn report(graph: &dyn ObjectGraph, config: &EngineConfig) -> Vec<String> {
    if !find_container_candidates(graph, &config.discovery).is_open {
        return vec!["Inventory: closed".to_string()];
    }

    let mut ctx = EngineContext::new(config.clone());
    let tally = tally(&mut ctx, graph);

    let mut lines: Vec<String> = tally
        .ui
        .decisions
        .iter()
        .map(|decision| format_decision(graph, decision))
        .collect();
    lines.push(String::new());
    lines.extend(summary(&tally, ctx.mirror.status()));
    lines
}

fn format_decision(graph: &dyn ObjectGraph, decision: &SlotDecision) -> String {
    let index = decision
        .slot_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<28} index={:<4} {:<8} ({})",
        label(graph, decision.slot),
        index,
        if decision.occupied { "occupied" } else { "empty" },
        decision.signal
    )
}

fn summary(tally: &Tally, mirror: &MirrorStatus) -> Vec<String> {
    let mirror = match mirror {
        MirrorStatus::Unresolved => "not consulted".to_string(),
        MirrorStatus::Unavailable => "unavailable".to_string(),
        MirrorStatus::Available {
            type_name,
            accessor,
            instance,
        } => format!("{}.{} = {}", type_name, accessor, instance),
    };
    vec![
        format!(
            "Model count: {}",
            tally.model.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string())
        ),
        format!("UI count:    {}/{}", tally.ui.occupied, tally.ui.total_slots),
        format!("Mirror:      {}", mirror),
        format!("Badge:       {}", tally.state.badge_text()),
    ]
}

//! Probe command handler
//!
//! Prints what the probe cache sees for each runtime type in a snapshot.

use super::load_graph;
use anyhow::{bail, Result};
use slotsense::{ObjectGraph, ProbeCache, ProbeResult};
use std::path::Path;

pub fn handle(snapshot: &Path, type_name: Option<&str>) -> Result<()> {
    let graph = load_graph(snapshot)?;

    let types = match type_name {
        Some(name) => {
            if graph.lookup_type(name).is_none() {
                bail!("Type '{}' not found in {}", name, snapshot.display());
            }
            vec![name.to_string()]
        }
        None => runtime_types(&graph),
    };

    let mut cache = ProbeCache::new();
    for name in &types {
        let probe = cache.probe(&graph, name);
        println!("{}", format_probe(&probe));
    }
    eprintln!("Probed {} type(s)", cache.len());
    Ok(())
}

/// Distinct runtime types of live objects, first-seen order
fn runtime_types(graph: &dyn ObjectGraph) -> Vec<String> {
    let mut seen = Vec::new();
    for id in graph.live_objects() {
        if let Ok(name) = graph.type_name(id) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
    }
    seen
}

fn format_probe(probe: &ProbeResult) -> String {
    let list = |names: &[String]| {
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    };
    format!(
        "{}\n  collections: {}\n  quantities:  {}",
        probe.type_name,
        list(&probe.collection_like),
        list(&probe.quantity_like)
    )
}

//! Discovery command handler

use super::load_graph;
use anyhow::Result;
use slotsense::{
    find_anchor, find_container_candidates, AnchorTarget, Discovery, EngineConfig, MatchTier,
    ObjectGraph, ObjectId,
};
use std::path::Path;

pub fn handle(snapshot: &Path, config: &EngineConfig) -> Result<()> {
    let graph = load_graph(snapshot)?;
    let found = find_container_candidates(&graph, &config.discovery);
    let anchor = found
        .is_open
        .then(|| find_anchor(&graph, &config.discovery, found.container))
        .flatten();

    for line in describe(&graph, &found, anchor.as_ref()) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(graph: &dyn ObjectGraph, found: &Discovery, anchor: Option<&AnchorTarget>) -> Vec<String> {
    if !found.is_open {
        return vec!["Inventory: closed".to_string()];
    }

    let mut lines = vec![format!(
        "Inventory: open ({})",
        match found.tier {
            Some(MatchTier::Slot) => "slot marker",
            Some(MatchTier::Keyword) => "keyword",
            None => "unknown",
        }
    )];
    if let Some(id) = found.container {
        lines.push(format!("Container: {}", label(graph, id)));
    }
    match anchor {
        Some(anchor) => {
            let rect = anchor
                .rect(graph)
                .map(|r| format!(" at ({:.0}, {:.0}) {:.0}x{:.0}", r.x, r.y, r.width, r.height))
                .unwrap_or_default();
            lines.push(format!(
                "Anchor: {} via {:?}{}",
                label(graph, anchor.id),
                anchor.source,
                rect
            ));
        }
        None => lines.push("Anchor: none".to_string()),
    }
    lines
}

/// `#id Type "name"`
pub(crate) fn label(graph: &dyn ObjectGraph, id: ObjectId) -> String {
    let type_name = graph.type_name(id).unwrap_or_else(|_| "?".to_string());
    match graph.object_name(id) {
        Ok(name) if !name.is_empty() => format!("{} {} \"{}\"", id, type_name, name),
        _ => format!("{} {}", id, type_name),
    }
}

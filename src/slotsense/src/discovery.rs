//! Object Discovery
//!
//! Finds the inventory UI in the live graph by type name alone:
//!
//! 1. Strong match: any active object whose type contains the slot marker
//!    (`InventoryUIItem`). The container is its nearest renderable root.
//! 2. Broad match: any active object whose type contains the container
//!    keyword (`Inventory`) and that sits under a renderable root.
//!
//! Tier 1 always wins over tier 2. Within a tier the first object in graph
//! enumeration order wins; hosts do not promise a stable order, so neither
//! do we.

use crate::config::DiscoveryConfig;
use crate::graph::{ObjectGraph, ObjectId};
use crate::presenter::{AnchorSource, AnchorTarget};
use crate::probe::matches_any;

/// Which heuristic tier produced a discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Slot,
    Keyword,
}

/// Result of one discovery pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Discovery {
    pub is_open: bool,
    pub container: Option<ObjectId>,
    pub tier: Option<MatchTier>,
}

impl Discovery {
    pub fn closed() -> Self {
        Self::default()
    }
}

/// Type-name match, case-insensitive
pub fn type_matches(graph: &dyn ObjectGraph, id: ObjectId, keyword: &str) -> bool {
    graph
        .type_name(id)
        .map(|t| matches_any(&t, &[keyword]))
        .unwrap_or(false)
}

/// Decide whether the inventory is open and which object contains it
pub fn find_container_candidates(graph: &dyn ObjectGraph, config: &DiscoveryConfig) -> Discovery {
    let objects = graph.live_objects();

    let strong = objects.iter().copied().find(|&id| {
        type_matches(graph, id, &config.slot_marker) && graph.is_live_and_active(id)
    });
    if let Some(slot) = strong {
        return Discovery {
            is_open: true,
            container: renderable_root(graph, slot, &config.canvas_keyword),
            tier: Some(MatchTier::Slot),
        };
    }

    let broad = objects.iter().copied().find_map(|id| {
        if !graph.is_live_and_active(id) || !type_matches(graph, id, &config.container_keyword) {
            return None;
        }
        renderable_root(graph, id, &config.canvas_keyword)
    });
    match broad {
        Some(root) => Discovery {
            is_open: true,
            container: Some(root),
            tier: Some(MatchTier::Keyword),
        },
        None => Discovery::closed(),
    }
}

/// Nearest enclosing canvas, else the nearest object (self included) with a rectangle
pub fn renderable_root(graph: &dyn ObjectGraph, id: ObjectId, canvas_keyword: &str) -> Option<ObjectId> {
    let mut chain = vec![id];
    chain.extend(graph.ancestors(id));

    chain
        .iter()
        .copied()
        .find(|&node| type_matches(graph, node, canvas_keyword))
        .or_else(|| {
            chain
                .iter()
                .copied()
                .find(|&node| matches!(graph.rect(node), Ok(Some(_))))
        })
}

/// Active slot widgets, in enumeration order
pub fn slot_candidates(graph: &dyn ObjectGraph, config: &DiscoveryConfig) -> Vec<ObjectId> {
    graph
        .live_objects()
        .into_iter()
        .filter(|&id| graph.is_live_and_active(id) && type_matches(graph, id, &config.slot_marker))
        .collect()
}

/// Objects belonging to the overlay itself (by name, on self or an ancestor)
pub fn is_overlay_object(graph: &dyn ObjectGraph, id: ObjectId, marker: &str) -> bool {
    std::iter::once(id)
        .chain(graph.ancestors(id))
        .any(|node| {
            graph
                .object_name(node)
                .map(|n| matches_any(&n, &[marker]))
                .unwrap_or(false)
        })
}

fn names_anchor(graph: &dyn ObjectGraph, id: ObjectId, config: &DiscoveryConfig) -> bool {
    let keywords: Vec<&str> = config.anchor_keywords.iter().map(String::as_str).collect();
    let object_name = graph.object_name(id).unwrap_or_default();
    if matches_any(&object_name, &keywords) {
        return true;
    }
    match graph.visual(id) {
        Ok(Some(visual)) => visual
            .resource
            .as_deref()
            .map(|r| matches_any(r, &keywords))
            .unwrap_or(false),
        _ => false,
    }
}

/// Pick the object the badge should sit next to.
///
/// Prefers an icon image named like a backpack, then a button named like
/// one, then the discovered container.
pub fn find_anchor(
    graph: &dyn ObjectGraph,
    config: &DiscoveryConfig,
    container: Option<ObjectId>,
) -> Option<AnchorTarget> {
    let usable: Vec<ObjectId> = graph
        .live_objects()
        .into_iter()
        .filter(|&id| {
            graph.is_live_and_active(id) && !is_overlay_object(graph, id, &config.overlay_marker)
        })
        .collect();

    let icon = usable
        .iter()
        .copied()
        .find(|&id| matches!(graph.visual(id), Ok(Some(_))) && names_anchor(graph, id, config));
    if let Some(id) = icon {
        return Some(AnchorTarget::new(id, AnchorSource::Icon));
    }

    let keywords: Vec<&str> = config.anchor_keywords.iter().map(String::as_str).collect();
    let button = usable.iter().copied().find(|&id| {
        type_matches(graph, id, "Button")
            && graph
                .object_name(id)
                .map(|n| matches_any(&n, &keywords))
                .unwrap_or(false)
    });
    if let Some(id) = button {
        return Some(AnchorTarget::new(id, AnchorSource::Button));
    }

    container.map(|id| AnchorTarget::new(id, AnchorSource::Container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SnapshotGraph;

    fn config() -> DiscoveryConfig {
        DiscoveryConfig::default()
    }

    #[test]
    fn test_empty_graph_is_closed() {
        let g = SnapshotGraph::new();
        assert_eq!(find_container_candidates(&g, &config()), Discovery::closed());
    }

    #[test]
    fn test_unrelated_objects_are_closed() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").id();
        g.spawn("HealthBar").parent(canvas).id();
        g.spawn("Minimap").parent(canvas).id();
        let found = find_container_candidates(&g, &config());
        assert!(!found.is_open);
        assert_eq!(found.container, None);
    }

    #[test]
    fn test_slot_marker_opens_with_canvas_container() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").rect(0.0, 0.0, 1920.0, 1080.0).id();
        let grid = g.spawn("GridLayout").parent(canvas).rect(10.0, 10.0, 400.0, 400.0).id();
        g.spawn("InventoryUIItem").parent(grid).id();
        let found = find_container_candidates(&g, &config());
        assert!(found.is_open);
        assert_eq!(found.container, Some(canvas));
        assert_eq!(found.tier, Some(MatchTier::Slot));
    }

    #[test]
    fn test_slot_without_canvas_uses_nearest_rect() {
        let mut g = SnapshotGraph::new();
        let panel = g.spawn("Panel").rect(0.0, 0.0, 50.0, 50.0).id();
        g.spawn("InventoryUIItem").parent(panel).id();
        let found = find_container_candidates(&g, &config());
        assert_eq!(found.container, Some(panel));
    }

    #[test]
    fn test_inactive_slots_do_not_open() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").inactive().id();
        g.spawn("InventoryUIItem").parent(canvas).id();
        assert!(!find_container_candidates(&g, &config()).is_open);
    }

    #[test]
    fn test_keyword_tier_needs_renderable_root() {
        let mut g = SnapshotGraph::new();
        g.spawn("PlayerInventory").id();
        assert!(!find_container_candidates(&g, &config()).is_open);

        let canvas = g.spawn("Canvas").id();
        g.spawn("InventoryPanel").parent(canvas).id();
        let found = find_container_candidates(&g, &config());
        assert!(found.is_open);
        assert_eq!(found.container, Some(canvas));
        assert_eq!(found.tier, Some(MatchTier::Keyword));
    }

    #[test]
    fn test_slot_tier_beats_keyword_tier() {
        let mut g = SnapshotGraph::new();
        let first = g.spawn("Canvas").name("first").id();
        g.spawn("InventoryPanel").parent(first).id();
        let second = g.spawn("Canvas").name("second").id();
        g.spawn("inventoryuiitem").parent(second).id();
        let found = find_container_candidates(&g, &config());
        assert_eq!(found.tier, Some(MatchTier::Slot));
        assert_eq!(found.container, Some(second));
    }

    #[test]
    fn test_slot_candidates_filters_inactive() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").id();
        let a = g.spawn("InventoryUIItem").parent(canvas).id();
        g.spawn("InventoryUIItem").parent(canvas).inactive().id();
        let c = g.spawn("InventoryUIItem").parent(canvas).id();
        assert_eq!(slot_candidates(&g, &config()), vec![a, c]);
    }

    #[test]
    fn test_anchor_prefers_backpack_icon() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").id();
        g.spawn("Button").name("BagButton").parent(canvas).id();
        let icon = g
            .spawn("Image")
            .name("Icon")
            .visual("ui_backpack_closed", 1.0)
            .parent(canvas)
            .id();
        let anchor = find_anchor(&g, &config(), Some(canvas)).unwrap();
        assert_eq!(anchor.id, icon);
        assert_eq!(anchor.source, AnchorSource::Icon);
    }

    #[test]
    fn test_anchor_skips_overlay_objects() {
        let mut g = SnapshotGraph::new();
        let overlay = g.spawn("Canvas").name("InventoryCounterCanvas").id();
        g.spawn("Image").name("BagBadge").visual("bag", 1.0).parent(overlay).id();
        let button = g.spawn("UnityButton").name("backpack").id();
        let anchor = find_anchor(&g, &config(), None).unwrap();
        assert_eq!(anchor.id, button);
        assert_eq!(anchor.source, AnchorSource::Button);
    }

    #[test]
    fn test_anchor_falls_back_to_container() {
        let mut g = SnapshotGraph::new();
        let canvas = g.spawn("Canvas").id();
        let anchor = find_anchor(&g, &config(), Some(canvas)).unwrap();
        assert_eq!(anchor.source, AnchorSource::Container);
        assert!(find_anchor(&g, &config(), None).is_none());
    }
}

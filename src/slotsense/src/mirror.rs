//! Authoritative Mirror Resolver
//!
//! Some hosts keep a controller singleton whose item list mirrors the
//! inventory slot by slot. When that list can be found, its answer for a slot
//! position beats every heuristic on the slot widget itself.
//!
//! Location happens once: the controller type is looked up in the type
//! catalog, its singleton is read through a static accessor, and the items
//! attribute is checked. A failed location is remembered and never retried.

use crate::config::MirrorConfig;
use crate::graph::{ObjectGraph, ObjectId, Value};
use crate::probe::ProbeCache;
use std::collections::HashMap;

/// Attributes naming the item's kind, checked first
const ITEM_TYPE_ATTRIBUTES: &[&str] = &["type", "itemType", "elementType"];

/// Attributes naming the item itself
const ITEM_NAME_ATTRIBUTES: &[&str] = &["humanFriendlyName", "displayName", "name"];

/// Placeholder the host uses for "no item"
const EMPTY_ITEM_NAME: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorStatus {
    /// Location not attempted yet
    Unresolved,
    /// Location failed; heuristics only
    Unavailable,
    Available {
        type_name: String,
        accessor: String,
        instance: ObjectId,
    },
}

#[derive(Debug)]
pub struct MirrorResolver {
    config: MirrorConfig,
    type_cache: HashMap<String, Option<String>>,
    status: MirrorStatus,
}

impl MirrorResolver {
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            config,
            type_cache: HashMap::new(),
            status: MirrorStatus::Unresolved,
        }
    }

    pub fn status(&self) -> &MirrorStatus {
        &self.status
    }

    /// Type-catalog lookup, memoised per name (misses included)
    pub fn find_type(&mut self, graph: &dyn ObjectGraph, name: &str) -> Option<String> {
        self.type_cache
            .entry(name.to_string())
            .or_insert_with(|| graph.lookup_type(name))
            .clone()
    }

    /// Occupancy of `slot_index` according to the mirror.
    ///
    /// `None` means the mirror cannot answer and the caller should fall back
    /// to heuristics. `Some` is authoritative.
    pub fn resolve(
        &mut self,
        graph: &dyn ObjectGraph,
        probes: &mut ProbeCache,
        slot_index: i64,
    ) -> Option<bool> {
        if !self.config.enabled {
            return None;
        }
        if self.status == MirrorStatus::Unresolved {
            self.status = self.locate(graph, probes);
        }
        let instance = self.live_instance(graph)?;

        let items = match graph.read(instance, &self.config.items_attribute) {
            Ok(Value::List(items)) => items,
            Ok(_) => return None,
            Err(e) => {
                tracing::trace!(error = %e, "mirror items unreadable");
                return None;
            }
        };

        let Ok(position) = usize::try_from(slot_index) else {
            return Some(false);
        };
        let Some(item) = items.get(position) else {
            return Some(false);
        };

        match item.as_ref_id() {
            Some(item_id) => Some(item_is_present(graph, probes, item_id)),
            None => Some(false),
        }
    }

    fn locate(&mut self, graph: &dyn ObjectGraph, probes: &mut ProbeCache) -> MirrorStatus {
        let type_name = self.config.type_name.clone();
        let Some(found) = self.find_type(graph, &type_name) else {
            tracing::debug!(type_name = %type_name, "mirror type not loaded");
            return MirrorStatus::Unavailable;
        };

        let Some((accessor, instance)) = self.read_singleton(graph, &found) else {
            tracing::debug!(type_name = %found, "mirror singleton not found");
            return MirrorStatus::Unavailable;
        };

        if !probes.probe(graph, &found).declares(&self.config.items_attribute) {
            tracing::debug!(
                type_name = %found,
                attribute = %self.config.items_attribute,
                "mirror items attribute not found"
            );
            return MirrorStatus::Unavailable;
        }

        tracing::debug!(type_name = %found, accessor = %accessor, %instance, "mirror located");
        MirrorStatus::Available {
            type_name: found,
            accessor,
            instance,
        }
    }

    fn read_singleton(&self, graph: &dyn ObjectGraph, type_name: &str) -> Option<(String, ObjectId)> {
        self.config.accessors.iter().find_map(|accessor| {
            let id = graph.read_static(type_name, accessor).ok()?.as_ref_id()?;
            graph.is_alive(id).then(|| (accessor.clone(), id))
        })
    }

    /// The cached singleton, re-read through its accessor if the host replaced it
    fn live_instance(&mut self, graph: &dyn ObjectGraph) -> Option<ObjectId> {
        let MirrorStatus::Available {
            type_name,
            accessor,
            instance,
        } = &mut self.status
        else {
            return None;
        };
        if graph.is_alive(*instance) {
            return Some(*instance);
        }
        let fresh = graph.read_static(type_name, accessor).ok()?.as_ref_id()?;
        if !graph.is_alive(fresh) {
            return None;
        }
        *instance = fresh;
        Some(fresh)
    }
}

/// An item is present when its kind (or, failing that, its name) is set to
/// something other than the host's "None" placeholder
fn item_is_present(graph: &dyn ObjectGraph, probes: &mut ProbeCache, item: ObjectId) -> bool {
    let kind = probes.read_first(graph, item, ITEM_TYPE_ATTRIBUTES, |v| Some(v.clone()));
    if let Some(text) = kind.as_ref().and_then(Value::display_text) {
        if is_meaningful(&text) {
            return true;
        }
    }

    let name = probes.read_first(graph, item, ITEM_NAME_ATTRIBUTES, |v| Some(v.clone()));
    matches!(name, Some(Value::Str(ref s)) if is_meaningful(s))
}

fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(EMPTY_ITEM_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SnapshotGraph;

    /// InGameUI singleton with items: [Sword, None-typed, null, named Shield]
    fn mirror_graph() -> (SnapshotGraph, ObjectId) {
        let mut g = SnapshotGraph::new();
        let sword = g.spawn("ItemDef").attr("type", "Sword").id();
        let empty = g.spawn("ItemDef").attr("type", "None").attr("name", "None").id();
        let shield = g.spawn("ItemDef").attr("displayName", "Shield").id();
        let ui = g
            .spawn("InGameUI")
            .attr(
                "items",
                vec![sword.into(), empty.into(), Value::Null, shield.into()],
            )
            .id();
        g.set_static("InGameUI", "realInstance", ui);
        (g, ui)
    }

    #[test]
    fn test_resolves_by_position() {
        let (g, _) = mirror_graph();
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 0), Some(true));
        assert_eq!(mirror.resolve(&g, &mut probes, 1), Some(false));
        assert_eq!(mirror.resolve(&g, &mut probes, 2), Some(false));
        assert_eq!(mirror.resolve(&g, &mut probes, 3), Some(true));
        assert!(matches!(mirror.status(), MirrorStatus::Available { accessor, .. } if accessor == "realInstance"));
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let (g, _) = mirror_graph();
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 4), Some(false));
        assert_eq!(mirror.resolve(&g, &mut probes, -1), Some(false));
    }

    #[test]
    fn test_missing_type_is_cached_negative() {
        let mut g = SnapshotGraph::new();
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 0), None);
        assert_eq!(mirror.status(), &MirrorStatus::Unavailable);

        // Appearing later does not trigger a retry
        let ui = g.spawn("InGameUI").attr("items", Vec::<Value>::new()).id();
        g.set_static("InGameUI", "instance", ui);
        assert_eq!(mirror.resolve(&g, &mut probes, 0), None);
        assert_eq!(mirror.status(), &MirrorStatus::Unavailable);
    }

    #[test]
    fn test_missing_items_attribute_is_unavailable() {
        let mut g = SnapshotGraph::new();
        let ui = g.spawn("InGameUI").attr("other", 1).id();
        g.set_static("InGameUI", "instance", ui);
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 0), None);
        assert_eq!(mirror.status(), &MirrorStatus::Unavailable);
    }

    #[test]
    fn test_unreadable_items_degrades_to_none() {
        let mut g = SnapshotGraph::new();
        let ui = g.spawn("InGameUI").fault("items").id();
        g.set_static("InGameUI", "instance", ui);
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 0), None);
        assert!(matches!(mirror.status(), MirrorStatus::Available { .. }));
    }

    #[test]
    fn test_replaced_singleton_is_followed() {
        let (mut g, old) = mirror_graph();
        let mut probes = ProbeCache::new();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.resolve(&g, &mut probes, 0), Some(true));

        g.remove(old);
        let axe = g.spawn("ItemDef").attr("type", "Axe").id();
        let fresh = g.spawn("InGameUI").attr("items", vec![Value::Null, axe.into()]).id();
        g.set_static("InGameUI", "realInstance", fresh);

        assert_eq!(mirror.resolve(&g, &mut probes, 0), Some(false));
        assert_eq!(mirror.resolve(&g, &mut probes, 1), Some(true));
    }

    #[test]
    fn test_disabled_mirror_never_answers() {
        let (g, _) = mirror_graph();
        let mut probes = ProbeCache::new();
        let config = MirrorConfig {
            enabled: false,
            ..MirrorConfig::default()
        };
        let mut mirror = MirrorResolver::new(config);
        assert_eq!(mirror.resolve(&g, &mut probes, 0), None);
        assert_eq!(mirror.status(), &MirrorStatus::Unresolved);
    }

    #[test]
    fn test_type_lookup_cache() {
        let (g, _) = mirror_graph();
        let mut mirror = MirrorResolver::new(MirrorConfig::default());
        assert_eq!(mirror.find_type(&g, "ItemDef").as_deref(), Some("ItemDef"));
        assert_eq!(mirror.find_type(&g, "Nope"), None);
        assert_eq!(mirror.type_cache.len(), 2);
    }

    #[test]
    fn test_is_meaningful() {
        assert!(is_meaningful("Sword"));
        assert!(!is_meaningful("none"));
        assert!(!is_meaningful("   "));
        assert!(!is_meaningful(""));
    }
}

//! Overlay presenter contract
//!
//! The engine does not draw anything. It reports the inferred inventory state
//! and an anchor to an `OverlayPresenter`, which owns rendering and placement.

use crate::config::BadgeLayout;
use crate::graph::{ObjectGraph, ObjectId, Rect};

/// The engine's single externally visible fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventoryState {
    pub is_open: bool,
    pub count: usize,
    pub total_slots: usize,
}

impl InventoryState {
    /// `"count/total"` when the slot total is known, else just the count
    pub fn badge_text(&self) -> String {
        if self.total_slots > 0 {
            format!("{}/{}", self.count, self.total_slots)
        } else {
            self.count.to_string()
        }
    }
}

/// How an anchor was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSource {
    Icon,
    Button,
    Container,
}

/// Weak reference to the object the badge is placed next to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorTarget {
    pub id: ObjectId,
    pub source: AnchorSource,
}

impl AnchorTarget {
    pub fn new(id: ObjectId, source: AnchorSource) -> Self {
        Self { id, source }
    }

    /// Still alive and active in the host graph
    pub fn is_valid(&self, graph: &dyn ObjectGraph) -> bool {
        graph.is_live_and_active(self.id)
    }

    pub fn rect(&self, graph: &dyn ObjectGraph) -> Option<Rect> {
        graph.rect(self.id).ok().flatten()
    }
}

/// Smallest badge height, in screen units
pub const MIN_BADGE_HEIGHT: f32 = 16.0;

/// Badge rectangle for an anchor on a screen, sized and offset by screen
/// height and kept inside the screen.
pub fn badge_rect(layout: &BadgeLayout, anchor: Rect, screen: Rect) -> Rect {
    let height = (screen.height * layout.badge_height_percent).max(MIN_BADGE_HEIGHT);
    let width = height * layout.badge_width_to_height;

    let (cx, cy) = anchor.center();
    let cx = cx + screen.height * layout.offset_x_percent;
    let cy = cy + screen.height * layout.offset_y_percent;

    let max_x = (screen.x + screen.width - width).max(screen.x);
    let max_y = (screen.y + screen.height - height).max(screen.y);
    Rect {
        x: (cx - width * 0.5).clamp(screen.x, max_x),
        y: (cy - height * 0.5).clamp(screen.y, max_y),
        width,
        height,
    }
}

/// Receiver of overlay updates
pub trait OverlayPresenter {
    /// Show or hide the whole badge
    fn set_visible(&mut self, visible: bool);

    /// Move the badge next to `anchor`; `rect` is the anchor's last known rectangle
    fn place(&mut self, anchor: &AnchorTarget, rect: Option<Rect>);

    /// New state to display; only called when it changed
    fn render(&mut self, state: &InventoryState);
}

/// One recorded presenter call
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Visible(bool),
    Placed(AnchorTarget, Option<Rect>),
    Rendered(InventoryState),
}

/// Presenter that records every call, for hosts without a renderer and for tests
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
    pub visible: bool,
    pub text: Option<String>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renders(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresenterEvent::Rendered(_)))
            .count()
    }

    pub fn last_state(&self) -> Option<InventoryState> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Rendered(s) => Some(*s),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl OverlayPresenter for RecordingPresenter {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.events.push(PresenterEvent::Visible(visible));
    }

    fn place(&mut self, anchor: &AnchorTarget, rect: Option<Rect>) {
        self.events.push(PresenterEvent::Placed(*anchor, rect));
    }

    fn render(&mut self, state: &InventoryState) {
        self.text = Some(state.badge_text());
        self.events.push(PresenterEvent::Rendered(*state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SnapshotGraph;

    #[test]
    fn test_badge_text() {
        let with_total = InventoryState {
            is_open: true,
            count: 4,
            total_slots: 20,
        };
        assert_eq!(with_total.badge_text(), "4/20");

        let bare = InventoryState {
            is_open: true,
            count: 3,
            total_slots: 0,
        };
        assert_eq!(bare.badge_text(), "3");
    }

    #[test]
    fn test_anchor_validity_follows_graph() {
        let mut g = SnapshotGraph::new();
        let id = g.spawn("Image").rect(1.0, 2.0, 3.0, 4.0).id();
        let anchor = AnchorTarget::new(id, AnchorSource::Icon);
        assert!(anchor.is_valid(&g));
        assert_eq!(anchor.rect(&g).map(|r| r.width), Some(3.0));

        g.set_active(id, false);
        assert!(!anchor.is_valid(&g));
        g.remove(id);
        assert!(!anchor.is_valid(&g));
        assert_eq!(anchor.rect(&g), None);
    }

    #[test]
    fn test_badge_rect_scales_with_screen_height() {
        let screen = Rect {
            x: 0.0,
            y: 0.0,
            width: 1920.0,
            height: 1000.0,
        };
        let anchor = Rect {
            x: 100.0,
            y: 100.0,
            width: 40.0,
            height: 40.0,
        };
        let badge = badge_rect(&BadgeLayout::default(), anchor, screen);
        assert!((badge.height - 35.0).abs() < 1e-3);
        assert!((badge.width - 56.0).abs() < 1e-3);
        // center (120,120) + offset (18,14)
        assert!((badge.x - (138.0 - 28.0)).abs() < 1e-3);
        assert!((badge.y - (134.0 - 17.5)).abs() < 1e-3);
    }

    #[test]
    fn test_badge_rect_stays_on_screen() {
        let screen = Rect {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
        };
        let corner = Rect {
            x: 195.0,
            y: 95.0,
            width: 10.0,
            height: 10.0,
        };
        let badge = badge_rect(&BadgeLayout::default(), corner, screen);
        assert_eq!(badge.height, MIN_BADGE_HEIGHT);
        assert!(badge.x + badge.width <= 200.0 + 1e-3);
        assert!(badge.y + badge.height <= 100.0 + 1e-3);
    }

    #[test]
    fn test_recording_presenter() {
        let mut p = RecordingPresenter::new();
        p.set_visible(true);
        p.render(&InventoryState {
            is_open: true,
            count: 1,
            total_slots: 2,
        });
        assert!(p.visible);
        assert_eq!(p.text.as_deref(), Some("1/2"));
        assert_eq!(p.renders(), 1);
        assert_eq!(p.last_state().map(|s| s.count), Some(1));
    }
}

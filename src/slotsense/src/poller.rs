//! State machine and poller
//!
//! Two fixed-interval timers drive the engine from the host's tick:
//!
//! - detect: open/closed transitions and anchor tracking
//! - refresh: full recount while open, notifying the presenter on change
//!
//! The host calls [`Poller::tick`] with the elapsed time; nothing here blocks
//! or spawns.

use crate::config::PollingConfig;
use crate::context::EngineContext;
use crate::discovery::{find_anchor, find_container_candidates, Discovery};
use crate::graph::{ObjectGraph, Rect};
use crate::presenter::{AnchorTarget, InventoryState, OverlayPresenter};
use crate::resolver::{tally, Tally};
use std::time::Duration;

/// Periodic timer advanced by elapsed time.
///
/// Fires at most once per `advance`; time owed beyond one interval is dropped.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    remaining: Duration,
}

impl IntervalTimer {
    pub fn new(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            interval,
            remaining: initial_delay,
        }
    }

    /// Time until the next firing
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if elapsed < self.remaining {
            self.remaining -= elapsed;
            return false;
        }
        let overshoot = elapsed - self.remaining;
        self.remaining = if overshoot < self.interval {
            self.interval - overshoot
        } else {
            self.interval
        };
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Closed,
    Open,
}

#[derive(Debug)]
pub struct Poller {
    detect: IntervalTimer,
    refresh: IntervalTimer,
    state: PollState,
    last_emitted: Option<InventoryState>,
    anchor: Option<AnchorTarget>,
    placed: Option<(AnchorTarget, Option<Rect>)>,
}

impl Poller {
    pub fn new(config: &PollingConfig) -> Self {
        Self {
            detect: IntervalTimer::new(config.initial_delay(), config.detect_interval()),
            refresh: IntervalTimer::new(config.initial_delay(), config.refresh_interval()),
            state: PollState::Closed,
            last_emitted: None,
            anchor: None,
            placed: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn anchor(&self) -> Option<AnchorTarget> {
        self.anchor
    }

    /// Last state handed to the presenter since the inventory opened
    pub fn last_emitted(&self) -> Option<InventoryState> {
        self.last_emitted
    }

    /// Advance both timers and run whichever fire, detect first
    pub fn tick(
        &mut self,
        ctx: &mut EngineContext,
        graph: &dyn ObjectGraph,
        presenter: &mut dyn OverlayPresenter,
        elapsed: Duration,
    ) {
        if self.detect.advance(elapsed) {
            self.detect_now(ctx, graph, presenter);
        }
        if self.refresh.advance(elapsed) {
            self.refresh_now(ctx, graph, presenter);
        }
    }

    /// One detection pass: state transition plus anchor tracking
    pub fn detect_now(
        &mut self,
        ctx: &mut EngineContext,
        graph: &dyn ObjectGraph,
        presenter: &mut dyn OverlayPresenter,
    ) -> Discovery {
        let found = find_container_candidates(graph, &ctx.config.discovery);

        if !found.is_open {
            if self.state == PollState::Open {
                self.state = PollState::Closed;
                self.anchor = None;
                self.placed = None;
                presenter.set_visible(false);
                tracing::debug!("inventory closed");
            }
            return found;
        }

        if self.state == PollState::Closed {
            self.state = PollState::Open;
            // Forces the next refresh to render
            self.last_emitted = None;
            presenter.set_visible(true);
            tracing::debug!(tier = ?found.tier, container = ?found.container, "inventory opened");
        }

        if !self.anchor.is_some_and(|a| a.is_valid(graph)) {
            self.anchor = find_anchor(graph, &ctx.config.discovery, found.container);
            if let Some(anchor) = self.anchor {
                tracing::debug!(id = %anchor.id, source = ?anchor.source, "anchor resolved");
            }
        }

        if let Some(anchor) = self.anchor {
            let placement = (anchor, anchor.rect(graph));
            if self.placed != Some(placement) {
                presenter.place(&anchor, placement.1);
                self.placed = Some(placement);
            }
        }

        found
    }

    /// One recount; renders only when the state differs from the last one emitted.
    /// Does nothing while closed.
    pub fn refresh_now(
        &mut self,
        ctx: &mut EngineContext,
        graph: &dyn ObjectGraph,
        presenter: &mut dyn OverlayPresenter,
    ) -> Option<Tally> {
        if self.state != PollState::Open {
            return None;
        }

        let tally = tally(ctx, graph);
        if self.last_emitted != Some(tally.state) {
            tracing::debug!(
                count = tally.state.count,
                total = tally.state.total_slots,
                model = ?tally.model,
                ui = tally.ui.occupied,
                "count updated"
            );
            presenter.render(&tally.state);
            self.last_emitted = Some(tally.state);
        }
        Some(tally)
    }
}

use crate::input::{Intent, LifecycleAction};
use crate::network::{Completion, Request, Response};
use crate::scheduler::Scheduler;
use log::{debug, error, info, warn};
use shared::{GameSnapshot, Lifecycle};
use std::time::{Duration, Instant};

/// The last confirmed snapshot plus the flags that only exist on this side of the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientViewState {
    pub snapshot: GameSnapshot,
    pub overlay_visible: bool,
    pub pause_menu_visible: bool,
}

impl ClientViewState {
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        let lifecycle = snapshot.lifecycle;
        Self {
            snapshot,
            overlay_visible: matches!(lifecycle, Lifecycle::Idle | Lifecycle::GameOver),
            pause_menu_visible: lifecycle == Lifecycle::Paused,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.snapshot.lifecycle
    }
}

impl Default for ClientViewState {
    fn default() -> Self {
        Self::from_snapshot(GameSnapshot::default())
    }
}

/// Holds the view state. Written only by [`ClientGame::apply`].
#[derive(Debug, Default)]
pub struct StateStore {
    view: ClientViewState,
    best_high_score: u32,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &ClientViewState {
        &self.view
    }

    /// Best high score seen this session. Display only.
    pub fn best_high_score(&self) -> u32 {
        self.best_high_score
    }

    pub(crate) fn replace(&mut self, snapshot: GameSnapshot) {
        self.best_high_score = self.best_high_score.max(snapshot.high_score);
        self.view = ClientViewState::from_snapshot(snapshot);
    }

    pub(crate) fn record_high_score(&mut self, high_score: u32) {
        self.best_high_score = self.best_high_score.max(high_score);
    }

    /// Drops back to an idle view on the same grid without asking the server.
    pub(crate) fn reset_to_idle(&mut self) {
        let current = &self.view.snapshot;
        let idle = GameSnapshot::idle(
            current.grid_width,
            current.grid_height,
            current.cell_size,
            self.best_high_score.max(current.high_score),
        );
        self.view = ClientViewState::from_snapshot(idle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Replaced { from: Lifecycle, to: Lifecycle },
    HighScore(u32),
    Failed,
}

/// Client-side synchronization state machine.
///
/// Turns accepted intents into requests, and folds completed requests back into
/// the store while keeping the tick loop in step with the server's lifecycle.
pub struct ClientGame {
    store: StateStore,
    scheduler: Scheduler,
    lifecycle_pending: Option<Request>,
}

impl ClientGame {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            store: StateStore::new(),
            scheduler: Scheduler::new(tick_interval),
            lifecycle_pending: None,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn state(&self) -> &ClientViewState {
        self.store.current()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.store.current().lifecycle()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn lifecycle_pending(&self) -> bool {
        self.lifecycle_pending.is_some()
    }

    /// Requests issued once when the client comes up.
    pub fn startup_requests(&self) -> [Request; 2] {
        [Request::HighScore, Request::Sync]
    }

    /// Turns an intent that already passed input gating into a request.
    pub fn submit(&mut self, intent: Intent) -> Option<Request> {
        let request = match intent {
            Intent::Direction(direction) => Request::SetDirection(direction),
            Intent::Lifecycle(LifecycleAction::Start) => Request::Start,
            Intent::Lifecycle(LifecycleAction::TogglePause)
            | Intent::Lifecycle(LifecycleAction::Resume) => Request::TogglePause,
            Intent::Lifecycle(LifecycleAction::Restart) => Request::Restart,
            Intent::Lifecycle(LifecycleAction::MainMenu) => {
                self.return_to_main_menu();
                return None;
            }
        };

        if request.is_lifecycle() {
            if let Some(pending) = self.lifecycle_pending {
                debug!(
                    "Dropping {} while {} is in flight",
                    request.name(),
                    pending.name()
                );
                return None;
            }
            if request == Request::Restart {
                self.scheduler.stop();
            }
            self.lifecycle_pending = Some(request);
        }

        Some(request)
    }

    pub fn poll_tick(&mut self, now: Instant) -> Option<Request> {
        self.scheduler.poll(now).then_some(Request::Tick)
    }

    pub fn apply(&mut self, completion: Completion, now: Instant) -> Applied {
        let Completion { request, result } = completion;

        if request == Request::Tick {
            self.scheduler.tick_finished();
        }
        if request.is_lifecycle() {
            self.lifecycle_pending = None;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                if e.is_rejection() {
                    warn!("{}", e);
                } else {
                    error!("{}", e);
                }
                // Restart stopped the loop on submit; put it back in step with the unchanged store.
                if request == Request::Restart {
                    self.follow_lifecycle(now);
                }
                return Applied::Failed;
            }
        };

        let snapshot = match response {
            Response::HighScore(high_score) => {
                self.store.record_high_score(high_score);
                return Applied::HighScore(high_score);
            }
            Response::Snapshot(snapshot) => snapshot,
        };

        let from = self.lifecycle();
        self.store.replace(snapshot);
        let to = self.lifecycle();

        if from != to {
            info!("Lifecycle {} -> {} ({})", from, to, request.name());
        }

        match request {
            Request::Tick => {
                if to == Lifecycle::GameOver && self.scheduler.stop() {
                    info!("Game over, final score {}", self.state().snapshot.score);
                }
            }
            Request::Start | Request::Restart | Request::TogglePause | Request::Sync => {
                self.follow_lifecycle(now);
            }
            Request::SetDirection(_) | Request::HighScore => {}
        }

        Applied::Replaced { from, to }
    }

    fn follow_lifecycle(&mut self, now: Instant) {
        if self.lifecycle() == Lifecycle::Playing {
            self.scheduler.start(now);
        } else {
            self.scheduler.stop();
        }
    }

    fn return_to_main_menu(&mut self) {
        self.scheduler.stop();
        self.store.reset_to_idle();
        info!("Returned to main menu");
    }
}

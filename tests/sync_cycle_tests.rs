//! End-to-end sync cycles against a scripted in-memory server
//!
//! Each cycle runs the same path as the frame loop: key or button, then gating,
//! then `ClientGame::submit`, then `execute` on the transport, then `ClientGame::apply`.

use async_trait::async_trait;
use client::error::ClientError;
use client::game::{Applied, ClientGame};
use client::input::{InputController, Intent, KeyInput};
use client::network::{execute, Request, Transport};
use client::presenter::{content_size, present, ButtonId};
use shared::{Cell, Direction, GameSnapshot, Lifecycle};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(150);

/// Answers like the game server would, but ticks return scripted snapshots.
struct ScriptedServer {
    state: Mutex<GameSnapshot>,
    ticks: Mutex<VecDeque<Result<GameSnapshot, ClientError>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedServer {
    fn new(lifecycle: Lifecycle) -> Self {
        Self {
            state: Mutex::new(snapshot(lifecycle, Direction::Right, 0)),
            ticks: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn script_tick(&self, result: Result<GameSnapshot, ClientError>) {
        self.ticks.lock().unwrap().push_back(result);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn update(&self, f: impl FnOnce(&mut GameSnapshot)) -> GameSnapshot {
        let mut state = self.state.lock().unwrap();
        f(&mut state);
        state.clone()
    }
}

#[async_trait]
impl Transport for ScriptedServer {
    async fn start(&self) -> Result<GameSnapshot, ClientError> {
        self.record("start");
        Ok(self.update(|s| {
            *s = snapshot(Lifecycle::Playing, Direction::Right, 0);
        }))
    }

    async fn restart(&self) -> Result<GameSnapshot, ClientError> {
        self.record("restart");
        Ok(self.update(|s| {
            *s = snapshot(Lifecycle::Playing, Direction::Right, 0);
        }))
    }

    async fn toggle_pause(&self) -> Result<GameSnapshot, ClientError> {
        self.record("toggle_pause");
        Ok(self.update(|s| {
            s.lifecycle = match s.lifecycle {
                Lifecycle::Playing => Lifecycle::Paused,
                Lifecycle::Paused => Lifecycle::Playing,
                other => other,
            };
        }))
    }

    async fn set_direction(&self, direction: Direction) -> Result<GameSnapshot, ClientError> {
        self.record("set_direction");
        Ok(self.update(|s| s.direction = direction))
    }

    async fn tick(&self) -> Result<GameSnapshot, ClientError> {
        self.record("tick");
        match self.ticks.lock().unwrap().pop_front() {
            Some(Ok(next)) => Ok(self.update(|s| *s = next)),
            Some(Err(e)) => Err(e),
            None => Ok(self.state.lock().unwrap().clone()),
        }
    }

    async fn fetch_state(&self) -> Result<GameSnapshot, ClientError> {
        self.record("fetch_state");
        Ok(self.state.lock().unwrap().clone())
    }

    async fn high_score(&self) -> Result<u32, ClientError> {
        self.record("high_score");
        Ok(self.state.lock().unwrap().high_score)
    }
}

fn snapshot(lifecycle: Lifecycle, direction: Direction, score: u32) -> GameSnapshot {
    GameSnapshot {
        snake_body: vec![Cell(10, 10), Cell(9, 10), Cell(8, 10)],
        food_position: Some(Cell(15, 15)),
        direction,
        score,
        high_score: 100,
        lifecycle,
        grid_width: 20,
        grid_height: 20,
        cell_size: 20,
    }
}

/// Runs one request through the transport and folds the result back in.
fn round_trip(
    game: &mut ClientGame,
    server: &ScriptedServer,
    request: Request,
    now: Instant,
) -> Applied {
    let completion = tokio_test::block_on(execute(server, request));
    game.apply(completion, now)
}

/// A key press through the whole pipeline. Returns `None` when nothing was sent.
fn press(
    game: &mut ClientGame,
    server: &ScriptedServer,
    key: KeyInput,
    now: Instant,
) -> Option<Applied> {
    let controller = InputController::new();
    let intent = controller.on_key(key, game.lifecycle())?;
    let request = game.submit(intent)?;
    Some(round_trip(game, server, request, now))
}

fn click(
    game: &mut ClientGame,
    server: &ScriptedServer,
    button: ButtonId,
    now: Instant,
) -> Option<Applied> {
    let controller = InputController::new();
    let intent = controller.on_button(button, game.lifecycle())?;
    let request = game.submit(intent)?;
    Some(round_trip(game, server, request, now))
}

fn synced_game(server: &ScriptedServer, now: Instant) -> ClientGame {
    let mut game = ClientGame::new(TICK);
    for request in game.startup_requests() {
        round_trip(&mut game, server, request, now);
    }
    game
}

/// INPUT GATING TESTS
mod gating_tests {
    use super::*;

    /// Tests that direction input outside of play never reaches the server
    #[test]
    fn direction_input_outside_play_sends_nothing() {
        let now = Instant::now();
        for lifecycle in [Lifecycle::Idle, Lifecycle::Paused, Lifecycle::GameOver] {
            let server = ScriptedServer::new(lifecycle);
            let mut game = synced_game(&server, now);
            let before = server.calls().len();

            for key in [KeyInput::ArrowUp, KeyInput::A, KeyInput::S, KeyInput::ArrowRight] {
                assert!(press(&mut game, &server, key, now).is_none());
            }
            for direction in [Direction::Up, Direction::Down] {
                assert!(click(&mut game, &server, ButtonId::Pad(direction), now).is_none());
            }

            assert_eq!(server.calls().len(), before, "lifecycle {}", lifecycle);
        }
    }

    /// Tests that ArrowUp while playing changes direction on the server and in the store
    #[test]
    fn arrow_up_while_playing_turns_snake() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = synced_game(&server, now);

        press(&mut game, &server, KeyInput::Space, now).unwrap();
        assert_eq!(game.lifecycle(), Lifecycle::Playing);

        let applied = press(&mut game, &server, KeyInput::ArrowUp, now).unwrap();
        assert!(matches!(applied, Applied::Replaced { .. }));
        assert_eq!(server.calls().last(), Some(&"set_direction"));
        assert_eq!(game.state().snapshot.direction, Direction::Up);
    }

    /// Tests that a second start while the first is in flight is dropped
    #[test]
    fn double_start_sends_once() {
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = ClientGame::new(TICK);
        let controller = InputController::new();

        let intent = controller.on_key(KeyInput::Space, game.lifecycle()).unwrap();
        assert_eq!(game.submit(intent), Some(Request::Start));
        assert_eq!(game.submit(intent), None);
        assert!(server.calls().is_empty());
    }
}

/// TICK LOOP TESTS
mod tick_loop_tests {
    use super::*;

    /// Tests that the first tick goes out one interval after start
    #[test]
    fn start_schedules_ticks() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = synced_game(&server, now);

        press(&mut game, &server, KeyInput::Space, now).unwrap();
        assert!(game.scheduler().is_running());
        assert_eq!(game.poll_tick(now + TICK / 2), None);

        let request = game.poll_tick(now + TICK).unwrap();
        round_trip(&mut game, &server, request, now + TICK);
        assert_eq!(server.calls().last(), Some(&"tick"));
    }

    /// Tests that a game-over tick stops the loop once and raises the overlay
    #[test]
    fn game_over_tick_stops_loop_and_shows_overlay() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = synced_game(&server, now);
        press(&mut game, &server, KeyInput::Space, now).unwrap();
        let cancelled = game.scheduler().cancellations();

        server.script_tick(Ok(snapshot(Lifecycle::GameOver, Direction::Right, 42)));
        let request = game.poll_tick(now + TICK).unwrap();
        round_trip(&mut game, &server, request, now + TICK);

        assert_eq!(game.lifecycle(), Lifecycle::GameOver);
        assert!(!game.scheduler().is_running());
        assert_eq!(game.scheduler().cancellations(), cancelled + 1);
        assert_eq!(game.poll_tick(now + TICK * 4), None);

        let ui = present(game.state(), game.store().best_high_score(), content_size((400, 400)));
        let overlay = ui.overlay.unwrap();
        assert_eq!(overlay.title, "Game Over");
        assert!(overlay.message.contains("42"));

        // Space from game over starts a new session.
        press(&mut game, &server, KeyInput::Space, now + TICK * 5).unwrap();
        assert_eq!(server.calls().last(), Some(&"start"));
        assert_eq!(game.lifecycle(), Lifecycle::Playing);
        assert!(game.scheduler().is_running());
    }

    /// Tests that a failed tick leaves the store alone and keeps ticking
    #[test]
    fn failed_tick_keeps_state_and_loop() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = synced_game(&server, now);
        press(&mut game, &server, KeyInput::Space, now).unwrap();
        let before = game.state().clone();

        server.script_tick(Err(ClientError::transport("tick", "connection reset")));
        let request = game.poll_tick(now + TICK).unwrap();
        let applied = round_trip(&mut game, &server, request, now + TICK);

        assert_eq!(applied, Applied::Failed);
        assert_eq!(game.state(), &before);
        assert!(game.scheduler().is_running());
        assert_eq!(game.poll_tick(now + TICK * 2), Some(Request::Tick));
    }

    /// Tests that two playing confirmations leave a single active loop
    #[test]
    fn repeated_playing_sync_keeps_one_loop() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Playing);
        let mut game = synced_game(&server, now);
        let first = game.scheduler().active_handle().unwrap();

        round_trip(&mut game, &server, Request::Sync, now);
        let second = game.scheduler().active_handle().unwrap();

        assert_ne!(first, second);
        assert_eq!(game.scheduler().cancellations(), 1);
        assert_eq!(game.poll_tick(now + TICK), Some(Request::Tick));
        assert_eq!(game.poll_tick(now + TICK), None);
    }
}

/// LIFECYCLE TESTS
mod lifecycle_tests {
    use super::*;

    /// Tests pause, resume and main menu through the pause menu buttons
    #[test]
    fn pause_menu_round_trip() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let mut game = synced_game(&server, now);
        press(&mut game, &server, KeyInput::Space, now).unwrap();

        press(&mut game, &server, KeyInput::Escape, now).unwrap();
        assert_eq!(game.lifecycle(), Lifecycle::Paused);
        assert!(game.state().pause_menu_visible);
        assert!(!game.scheduler().is_running());

        click(&mut game, &server, ButtonId::MenuResume, now).unwrap();
        assert_eq!(game.lifecycle(), Lifecycle::Playing);
        assert!(game.scheduler().is_running());

        press(&mut game, &server, KeyInput::Space, now).unwrap();
        let calls_before = server.calls().len();
        assert!(click(&mut game, &server, ButtonId::MenuMainMenu, now).is_none());
        assert_eq!(server.calls().len(), calls_before);
        assert_eq!(game.lifecycle(), Lifecycle::Idle);
        assert!(game.state().overlay_visible);
        assert_eq!(game.store().best_high_score(), 100);
    }

    /// Tests that restart goes to its own endpoint and resumes ticking
    #[test]
    fn restart_from_game_over() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::GameOver);
        let mut game = synced_game(&server, now);
        assert!(!game.scheduler().is_running());

        click(&mut game, &server, ButtonId::Restart, now).unwrap();
        assert_eq!(server.calls().last(), Some(&"restart"));
        assert_eq!(game.lifecycle(), Lifecycle::Playing);
        assert!(game.scheduler().is_running());
    }

    /// Tests that startup asks for the high score before the session state
    #[test]
    fn startup_loads_high_score_then_state() {
        let now = Instant::now();
        let server = ScriptedServer::new(Lifecycle::Idle);
        let game = synced_game(&server, now);

        assert_eq!(server.calls(), vec!["high_score", "fetch_state"]);
        assert_eq!(game.store().best_high_score(), 100);
        assert_eq!(game.lifecycle(), Lifecycle::Idle);
    }
}

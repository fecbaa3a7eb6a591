use crate::game::ClientGame;
use crate::input::{Intent, InputController};
use crate::network::{Dispatcher, HttpTransport};
use crate::presenter::{content_size, present};
use crate::rendering::Renderer;
use log::info;
use macroquad::prelude::*;
use shared::{DEFAULT_CELL_SIZE, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, TICK_INTERVAL_MS};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: String,
    pub session: Option<String>,
    pub tick_interval: Duration,
    pub request_timeout: Duration,
    pub width: i32,
    pub height: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let content = content_size((
            DEFAULT_GRID_WIDTH * DEFAULT_CELL_SIZE,
            DEFAULT_GRID_HEIGHT * DEFAULT_CELL_SIZE,
        ));
        Self {
            server: "http://127.0.0.1:5000".to_string(),
            session: None,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            request_timeout: Duration::from_millis(2000),
            width: content.x as i32,
            height: content.y as i32,
        }
    }
}

impl ClientConfig {
    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: "Snake".to_string(),
            window_width: self.width,
            window_height: self.height,
            window_resizable: true,
            ..Default::default()
        }
    }
}

/// Owns the frame loop: drains completions, reads input, schedules ticks, draws.
pub struct SnakeClient {
    game: ClientGame,
    input: InputController,
    renderer: Renderer,
    dispatcher: Dispatcher,
    _runtime: Runtime,
}

impl SnakeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("snake-net")
            .enable_all()
            .build()?;

        let transport = {
            let _guard = runtime.enter();
            HttpTransport::new(
                &config.server,
                config.session.as_deref(),
                config.request_timeout,
            )?
        };
        info!("Game server: {}", transport.base_url());

        let dispatcher = Dispatcher::new(runtime.handle().clone(), Arc::new(transport));

        Ok(SnakeClient {
            game: ClientGame::new(config.tick_interval),
            input: InputController::new(),
            renderer: Renderer::new(),
            dispatcher,
            _runtime: runtime,
        })
    }

    pub async fn run(&mut self) {
        simulate_mouse_with_touch(false);

        for request in self.game.startup_requests() {
            self.dispatcher.dispatch(request);
        }

        loop {
            self.frame(Instant::now());
            next_frame().await;
        }
    }

    fn frame(&mut self, now: Instant) {
        for completion in self.dispatcher.drain() {
            self.game.apply(completion, now);
        }

        let screen = vec2(screen_width(), screen_height());
        let ui = present(self.game.state(), self.game.store().best_high_score(), screen);

        let input = self.input.poll_frame();
        for key in input.keys {
            if let Some(intent) = self.input.on_key(key, self.game.lifecycle()) {
                self.submit(intent);
            }
        }
        for point in input.presses {
            let Some(button) = ui.button_at(point) else {
                continue;
            };
            if let Some(intent) = self.input.on_button(button, self.game.lifecycle()) {
                self.submit(intent);
            }
        }

        if let Some(request) = self.game.poll_tick(now) {
            self.dispatcher.dispatch(request);
        }

        let ui = present(self.game.state(), self.game.store().best_high_score(), screen);
        self.renderer.render(self.game.state(), &ui);
    }

    fn submit(&mut self, intent: Intent) {
        if let Some(request) = self.game.submit(intent) {
            self.dispatcher.dispatch(request);
        }
    }
}

//! Overlay, pause menu and button state derived from the lifecycle alone

use crate::game::ClientViewState;
use crate::input::LifecycleAction;
use macroquad::math::{vec2, Rect, Vec2};
use shared::{Direction, Lifecycle};

pub const MARGIN: f32 = 20.0;
pub const HUD_HEIGHT: f32 = 40.0;
pub const PANEL_WIDTH: f32 = 160.0;
const BUTTON_HEIGHT: f32 = 36.0;
const BUTTON_GAP: f32 = 10.0;
const PAD_CELL: f32 = 48.0;
const MENU_BUTTON_WIDTH: f32 = 140.0;
const MENU_BUTTON_HEIGHT: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    PauseResume,
    Restart,
    Pad(Direction),
    MenuResume,
    MenuRestart,
    MenuMainMenu,
}

impl ButtonId {
    pub fn action(&self) -> Option<LifecycleAction> {
        match self {
            ButtonId::Start => Some(LifecycleAction::Start),
            ButtonId::PauseResume => Some(LifecycleAction::TogglePause),
            ButtonId::Restart | ButtonId::MenuRestart => Some(LifecycleAction::Restart),
            ButtonId::MenuResume => Some(LifecycleAction::Resume),
            ButtonId::MenuMainMenu => Some(LifecycleAction::MainMenu),
            ButtonId::Pad(_) => None,
        }
    }
}

/// Whether a lifecycle action is currently offered to the player.
pub fn action_enabled(action: LifecycleAction, lifecycle: Lifecycle) -> bool {
    match action {
        LifecycleAction::Start => lifecycle != Lifecycle::Playing,
        LifecycleAction::TogglePause => {
            matches!(lifecycle, Lifecycle::Playing | Lifecycle::Paused)
        }
        LifecycleAction::Resume | LifecycleAction::MainMenu => lifecycle == Lifecycle::Paused,
        LifecycleAction::Restart => lifecycle != Lifecycle::Idle,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PauseMenu {
    pub score: u32,
    pub high_score: u32,
    pub snake_length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub id: ButtonId,
    pub rect: Rect,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiView {
    pub board: Rect,
    pub score: u32,
    pub best_high_score: u32,
    pub overlay: Option<Overlay>,
    pub pause_menu: Option<PauseMenu>,
    pub buttons: Vec<ButtonView>,
}

impl UiView {
    /// The visible button under `point`, if any. Disabled buttons still hit.
    pub fn button_at(&self, point: Vec2) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|b| b.rect.contains(point))
            .map(|b| b.id)
    }

    pub fn button(&self, id: ButtonId) -> Option<&ButtonView> {
        self.buttons.iter().find(|b| b.id == id)
    }
}

/// Smallest window that fits the HUD, the board and the side panel.
pub fn content_size(canvas: (u32, u32)) -> Vec2 {
    let (canvas_w, canvas_h) = (canvas.0 as f32, canvas.1 as f32);
    let panel_h = 3.0 * (BUTTON_HEIGHT + BUTTON_GAP) + MARGIN + 3.0 * PAD_CELL;
    vec2(
        MARGIN * 3.0 + canvas_w + PANEL_WIDTH,
        HUD_HEIGHT + MARGIN * 2.0 + canvas_h.max(panel_h),
    )
}

/// Places the board inside the screen, centred once the window outgrows the content.
pub fn board_rect(screen: Vec2, canvas: (u32, u32)) -> Rect {
    let content = content_size(canvas);
    let offset = ((screen - content) / 2.0).max(Vec2::ZERO);
    Rect::new(
        offset.x + MARGIN,
        offset.y + MARGIN + HUD_HEIGHT,
        canvas.0 as f32,
        canvas.1 as f32,
    )
}

pub fn present(state: &ClientViewState, best_high_score: u32, screen: Vec2) -> UiView {
    let snapshot = &state.snapshot;
    let lifecycle = snapshot.lifecycle;
    let board = board_rect(screen, snapshot.canvas_size());

    let overlay = state.overlay_visible.then(|| match lifecycle {
        Lifecycle::GameOver => Overlay {
            title: "Game Over".to_string(),
            message: format!("Final score: {}", snapshot.score),
        },
        _ => Overlay {
            title: "Ready".to_string(),
            message: "Press Start or Space to begin".to_string(),
        },
    });

    let pause_menu = state.pause_menu_visible.then(|| PauseMenu {
        score: snapshot.score,
        high_score: best_high_score.max(snapshot.high_score),
        snake_length: snapshot.snake_body.len(),
    });

    let mut buttons = panel_buttons(board, lifecycle);
    if pause_menu.is_some() {
        buttons.extend(menu_buttons(board, lifecycle));
    }

    UiView {
        board,
        score: snapshot.score,
        best_high_score: best_high_score.max(snapshot.high_score),
        overlay,
        pause_menu,
        buttons,
    }
}

fn panel_buttons(board: Rect, lifecycle: Lifecycle) -> Vec<ButtonView> {
    let x = board.right() + MARGIN;
    let mut y = board.y;
    let mut buttons = Vec::new();

    let pause_label = if lifecycle == Lifecycle::Paused {
        "Resume"
    } else {
        "Pause"
    };
    for (id, label) in [
        (ButtonId::Start, "Start"),
        (ButtonId::PauseResume, pause_label),
        (ButtonId::Restart, "Restart"),
    ] {
        buttons.push(ButtonView {
            id,
            rect: Rect::new(x, y, PANEL_WIDTH, BUTTON_HEIGHT),
            label,
            enabled: id.action().map_or(true, |a| action_enabled(a, lifecycle)),
        });
        y += BUTTON_HEIGHT + BUTTON_GAP;
    }

    let pad_x = x + (PANEL_WIDTH - 3.0 * PAD_CELL) / 2.0;
    let pad_y = y + MARGIN;
    let playing = lifecycle == Lifecycle::Playing;
    for (direction, col, row, label) in [
        (Direction::Up, 1.0, 0.0, "^"),
        (Direction::Left, 0.0, 1.0, "<"),
        (Direction::Right, 2.0, 1.0, ">"),
        (Direction::Down, 1.0, 2.0, "v"),
    ] {
        buttons.push(ButtonView {
            id: ButtonId::Pad(direction),
            rect: Rect::new(
                pad_x + col * PAD_CELL,
                pad_y + row * PAD_CELL,
                PAD_CELL - 4.0,
                PAD_CELL - 4.0,
            ),
            label,
            enabled: playing,
        });
    }

    buttons
}

fn menu_buttons(board: Rect, lifecycle: Lifecycle) -> Vec<ButtonView> {
    let x = board.center().x - MENU_BUTTON_WIDTH / 2.0;
    let mut y = board.center().y + 10.0;

    [
        (ButtonId::MenuResume, "Resume"),
        (ButtonId::MenuRestart, "Restart"),
        (ButtonId::MenuMainMenu, "Main Menu"),
    ]
    .into_iter()
    .map(|(id, label)| {
        let rect = Rect::new(x, y, MENU_BUTTON_WIDTH, MENU_BUTTON_HEIGHT);
        y += MENU_BUTTON_HEIGHT + 8.0;
        ButtonView {
            id,
            rect,
            label,
            enabled: id.action().map_or(true, |a| action_enabled(a, lifecycle)),
        }
    })
    .collect()
}

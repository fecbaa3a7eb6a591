use crate::game::ClientViewState;
use crate::presenter::{ButtonView, UiView};
use log::debug;
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use shared::{Cell, Direction};
use std::f32::consts::TAU;

pub const BACKGROUND: Color = Color::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0);
const PAGE: Color = Color::new(0.09, 0.09, 0.11, 1.0);
const GRID_LINE: Color = Color::new(1.0, 1.0, 1.0, 0.05);
const FOOD_INNER: Color = Color::new(1.0, 107.0 / 255.0, 107.0 / 255.0, 1.0);
const FOOD_OUTER: Color = Color::new(238.0 / 255.0, 90.0 / 255.0, 90.0 / 255.0, 1.0);
const FOOD_HIGHLIGHT: Color = Color::new(1.0, 1.0, 1.0, 0.3);
const SNAKE_LIGHT: Color = Color::new(0.0, 1.0, 136.0 / 255.0, 1.0);
const SNAKE_DARK: Color = Color::new(0.0, 204.0 / 255.0, 106.0 / 255.0, 1.0);
const EYE: Color = BLACK;

const SEGMENT_INSET: f32 = 1.0;
const SEGMENT_CORNER: f32 = 4.0;
const EYE_RADIUS: f32 = 2.0;
const EYE_SPREAD: f32 = 4.0;
const EYE_LEAD: f32 = 2.0;
const HIGHLIGHT_RADIUS: f32 = 2.0;

/// One primitive in board-local pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Fill {
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    /// Disc shaded from `inner` at the centre to `outer` at the rim.
    RadialDisc {
        center: Vec2,
        radius: f32,
        inner: Color,
        outer: Color,
    },
    Disc {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Rounded square shaded diagonally from `start` (top-left) to `end` (bottom-right).
    RoundedSquare {
        rect: Rect,
        corner: f32,
        start: Color,
        end: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Vec2,
    pub shapes: Vec<Shape>,
}

/// Builds the board picture for a view. Pure: same view, same scene.
pub fn compose(state: &ClientViewState) -> Scene {
    let snapshot = &state.snapshot;
    let cell = snapshot.cell_size as f32;
    let (width, height) = snapshot.canvas_size();
    let size = vec2(width as f32, height as f32);

    let mut shapes = vec![Shape::Fill { color: BACKGROUND }];

    for x in 0..=snapshot.grid_width {
        let px = x as f32 * cell;
        shapes.push(Shape::Line {
            from: vec2(px, 0.0),
            to: vec2(px, size.y),
            color: GRID_LINE,
        });
    }
    for y in 0..=snapshot.grid_height {
        let py = y as f32 * cell;
        shapes.push(Shape::Line {
            from: vec2(0.0, py),
            to: vec2(size.x, py),
            color: GRID_LINE,
        });
    }

    if let Some(food) = snapshot.food_position {
        push_food(&mut shapes, food, cell);
    }

    let length = snapshot.snake_body.len();
    for (index, segment) in snapshot.snake_body.iter().enumerate() {
        let origin = cell_origin(*segment, cell);
        let rect = Rect::new(
            origin.x + SEGMENT_INSET,
            origin.y + SEGMENT_INSET,
            cell - 2.0 * SEGMENT_INSET,
            cell - 2.0 * SEGMENT_INSET,
        );
        let alpha = segment_alpha(index, length);
        shapes.push(Shape::RoundedSquare {
            rect,
            corner: SEGMENT_CORNER,
            start: with_alpha(SNAKE_LIGHT, alpha),
            end: with_alpha(SNAKE_DARK, alpha),
        });

        if index == 0 {
            for center in eye_positions(origin, cell, snapshot.direction) {
                shapes.push(Shape::Disc {
                    center,
                    radius: EYE_RADIUS,
                    color: EYE,
                });
            }
        }
    }

    Scene { size, shapes }
}

/// Opacity of body segment `index` in a snake of `length`; the head is always opaque.
pub fn segment_alpha(index: usize, length: usize) -> f32 {
    if index == 0 || length == 0 {
        return 1.0;
    }
    1.0 - (index as f32 / length as f32) * 0.5
}

pub fn eye_positions(origin: Vec2, cell: f32, direction: Direction) -> [Vec2; 2] {
    let center = origin + vec2(cell / 2.0, cell / 2.0);
    match direction {
        Direction::Up => [
            center + vec2(-EYE_SPREAD, -EYE_LEAD),
            center + vec2(EYE_SPREAD, -EYE_LEAD),
        ],
        Direction::Down => [
            center + vec2(-EYE_SPREAD, EYE_LEAD),
            center + vec2(EYE_SPREAD, EYE_LEAD),
        ],
        Direction::Left => [
            center + vec2(-EYE_LEAD, -EYE_SPREAD),
            center + vec2(-EYE_LEAD, EYE_SPREAD),
        ],
        Direction::Right => [
            center + vec2(EYE_LEAD, -EYE_SPREAD),
            center + vec2(EYE_LEAD, EYE_SPREAD),
        ],
    }
}

fn push_food(shapes: &mut Vec<Shape>, food: Cell, cell: f32) {
    let center = cell_origin(food, cell) + vec2(cell / 2.0, cell / 2.0);
    let gradient_radius = cell / 2.0;
    let radius = (gradient_radius - 2.0).max(1.0);

    shapes.push(Shape::RadialDisc {
        center,
        radius,
        inner: FOOD_INNER,
        // The gradient spans the whole cell, so the rim stops short of the outer colour.
        outer: lerp_color(FOOD_INNER, FOOD_OUTER, radius / gradient_radius),
    });
    shapes.push(Shape::Disc {
        center: center - vec2(2.0, 2.0),
        radius: HIGHLIGHT_RADIUS,
        color: FOOD_HIGHLIGHT,
    });
}

fn cell_origin(cell: Cell, size: f32) -> Vec2 {
    vec2(cell.x() as f32 * size, cell.y() as f32 * size)
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, alpha)
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

/// Draws scenes and the presenter's view with macroquad.
pub struct Renderer {
    last_screen: Vec2,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            last_screen: Vec2::ZERO,
        }
    }

    pub fn render(&mut self, state: &ClientViewState, ui: &UiView) {
        let screen = vec2(screen_width(), screen_height());
        if screen != self.last_screen {
            debug!("Viewport {}x{}", screen.x, screen.y);
            self.last_screen = screen;
        }

        clear_background(PAGE);

        let scene = compose(state);
        self.draw_scene(&scene, ui.board.point());
        self.draw_hud(ui);
        for button in &ui.buttons {
            self.draw_button(button);
        }

        if let Some(overlay) = &ui.overlay {
            self.shade_board(ui.board);
            self.draw_centered(&overlay.title, ui.board.center() - vec2(0.0, 16.0), 40.0, WHITE);
            self.draw_centered(&overlay.message, ui.board.center() + vec2(0.0, 20.0), 20.0, LIGHTGRAY);
        }

        if let Some(menu) = &ui.pause_menu {
            self.shade_board(ui.board);
            let top = ui.board.center() - vec2(0.0, 110.0);
            self.draw_centered("Paused", top, 36.0, WHITE);
            let stats = [
                format!("Score: {}", menu.score),
                format!("High score: {}", menu.high_score),
                format!("Length: {}", menu.snake_length),
            ];
            for (i, line) in stats.iter().enumerate() {
                self.draw_centered(line, top + vec2(0.0, 32.0 + i as f32 * 22.0), 20.0, LIGHTGRAY);
            }
            // Menu buttons sit on top of the shade.
            for button in ui.buttons.iter().filter(|b| b.rect.overlaps(&ui.board)) {
                self.draw_button(button);
            }
        }
    }

    fn draw_scene(&self, scene: &Scene, offset: Vec2) {
        for shape in &scene.shapes {
            match shape {
                Shape::Fill { color } => {
                    draw_rectangle(offset.x, offset.y, scene.size.x, scene.size.y, *color);
                }
                Shape::Line { from, to, color } => {
                    let (a, b) = (*from + offset, *to + offset);
                    draw_line(a.x, a.y, b.x, b.y, 1.0, *color);
                }
                Shape::RadialDisc {
                    center,
                    radius,
                    inner,
                    outer,
                } => draw_mesh(&radial_disc_mesh(*center + offset, *radius, *inner, *outer)),
                Shape::Disc {
                    center,
                    radius,
                    color,
                } => {
                    let c = *center + offset;
                    draw_circle(c.x, c.y, *radius, *color);
                }
                Shape::RoundedSquare {
                    rect,
                    corner,
                    start,
                    end,
                } => {
                    let moved = rect.offset(offset);
                    draw_mesh(&rounded_square_mesh(moved, *corner, *start, *end));
                }
            }
        }
    }

    fn draw_hud(&self, ui: &UiView) {
        let baseline = ui.board.y - 12.0;
        draw_text(
            &format!("Score {}", ui.score),
            ui.board.x,
            baseline,
            26.0,
            WHITE,
        );
        let best = format!("Best {}", ui.best_high_score);
        let width = measure_text(&best, None, 26, 1.0).width;
        draw_text(&best, ui.board.right() - width, baseline, 26.0, GOLD);
    }

    fn draw_button(&self, button: &ButtonView) {
        let (fill, text) = if button.enabled {
            (Color::from_rgba(0, 170, 100, 255), WHITE)
        } else {
            (Color::from_rgba(51, 51, 51, 255), GRAY)
        };
        let r = button.rect;
        draw_rectangle(r.x, r.y, r.w, r.h, fill);
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, Color::from_rgba(255, 255, 255, 60));
        self.draw_centered(button.label, r.center() + vec2(0.0, 6.0), 20.0, text);
    }

    fn shade_board(&self, board: Rect) {
        draw_rectangle(board.x, board.y, board.w, board.h, Color::new(0.0, 0.0, 0.0, 0.7));
    }

    fn draw_centered(&self, text: &str, at: Vec2, size: f32, color: Color) {
        let width = measure_text(text, None, size as u16, 1.0).width;
        draw_text(text, at.x - width / 2.0, at.y, size, color);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn radial_disc_mesh(center: Vec2, radius: f32, inner: Color, outer: Color) -> Mesh {
    const SEGMENTS: u16 = 32;

    let mut vertices = vec![Vertex::new(center.x, center.y, 0.0, 0.0, 0.0, inner)];
    for i in 0..SEGMENTS {
        let angle = i as f32 / SEGMENTS as f32 * TAU;
        let p = center + vec2(angle.cos(), angle.sin()) * radius;
        vertices.push(Vertex::new(p.x, p.y, 0.0, 0.0, 0.0, outer));
    }

    Mesh {
        vertices,
        indices: fan_indices(SEGMENTS),
        texture: None,
    }
}

fn rounded_square_mesh(rect: Rect, corner: f32, start: Color, end: Color) -> Mesh {
    const ARC_STEPS: u16 = 5;

    let corner = corner.min(rect.w / 2.0).min(rect.h / 2.0);
    let shade = |p: Vec2| {
        let t = ((p.x - rect.x) + (p.y - rect.y)) / (rect.w + rect.h);
        lerp_color(start, end, t.clamp(0.0, 1.0))
    };

    let arcs = [
        (vec2(rect.right() - corner, rect.y + corner), -0.25),
        (vec2(rect.right() - corner, rect.bottom() - corner), 0.0),
        (vec2(rect.x + corner, rect.bottom() - corner), 0.25),
        (vec2(rect.x + corner, rect.y + corner), 0.5),
    ];

    let center = rect.center();
    let mut vertices = vec![Vertex::new(center.x, center.y, 0.0, 0.0, 0.0, shade(center))];
    for (arc_center, start_turn) in arcs {
        for step in 0..=ARC_STEPS {
            let angle = (start_turn + 0.25 * step as f32 / ARC_STEPS as f32) * TAU;
            let p = arc_center + vec2(angle.cos(), angle.sin()) * corner;
            vertices.push(Vertex::new(p.x, p.y, 0.0, 0.0, 0.0, shade(p)));
        }
    }

    let rim = (vertices.len() - 1) as u16;
    Mesh {
        vertices,
        indices: fan_indices(rim),
        texture: None,
    }
}

/// Triangle fan around vertex 0 over `rim` perimeter vertices, closed.
fn fan_indices(rim: u16) -> Vec<u16> {
    let mut indices = Vec::with_capacity(rim as usize * 3);
    for i in 0..rim {
        indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % rim]);
    }
    indices
}

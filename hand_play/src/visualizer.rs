//! Software-rendered visualizer using `minifb`.
//!
//! Counter layout:
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────┐
//! │   3          │          5    │                      │
//! │  (left zone) │ (right zone)  │     camera panel     │
//! │              │               │                      │
//! ├──────────────┴───────────────┤                      │
//! │ status / key legend          │                      │
//! └──────────────────────────────┴──────────────────────┘
//! ```
//!
//! Drag-box layout: the arena on the left, a divider, and the camera panel
//! filling the rest of the window.
//!
//! In simulation mode the camera panel doubles as the input surface: the
//! mouse over it is the index fingertip, the left button or Space is a fist.

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{Context, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::counter::CounterSnapshot;
use crate::dragbox::DragBoxSnapshot;
use crate::frame::{text_width, FrameImage, BLACK, WHITE};
use crate::sim::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const COUNTER_CAM_W:  usize = 480;
const COUNTER_CAM_H:  usize = 360;
const BOXES_CAM_W:    usize = 500;
const STATUS_H:       usize = 40;
const MARGIN:         usize = 10;

const PANEL_BG:       u32 = 0xFF000000;
const LEFT_TINT:      u32 = 0xFFADD8E6; // light blue
const RIGHT_TINT:     u32 = 0xFF90EE90; // light green
const LEFT_INK:       u32 = 0xFF0000FF;
const RIGHT_INK:      u32 = 0xFF008000;
const TARGETED_BOX:   u32 = 0xFF00FF00;
const POINTER_OPEN:   u32 = 0xFF0000FF;
const POINTER_CLOSED: u32 = 0xFF00FF00;
const STATUS_BG:      u32 = 0xFF0F3460;
const LEGEND_INK:     u32 = 0xFF888888;
const POINTER_RADIUS: isize = 15;

/// Pixel rectangle inside the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    /// Normalized position of a window point inside this rectangle.
    pub fn normalize(&self, mx: f32, my: f32) -> Option<(f32, f32)> {
        let (x, y) = (mx - self.x as f32, my - self.y as f32);
        if x < 0.0 || y < 0.0 || x >= self.w as f32 || y >= self.h as f32 {
            return None;
        }
        Some((x / self.w as f32, y / self.h as f32))
    }
}

/// Where things go in the window for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width:  usize,
    pub height: usize,
    /// Counter canvas or game arena.
    pub stage:  Rect,
    pub camera: Rect,
}

impl Layout {
    pub fn counter(canvas_w: usize, canvas_h: usize) -> Self {
        let height = canvas_h.max(COUNTER_CAM_H + 2 * MARGIN) + STATUS_H;
        Layout {
            width:  canvas_w + COUNTER_CAM_W + 2 * MARGIN,
            height,
            stage:  Rect { x: 0, y: 0, w: canvas_w, h: canvas_h },
            camera: Rect { x: canvas_w + MARGIN, y: MARGIN, w: COUNTER_CAM_W, h: COUNTER_CAM_H },
        }
    }

    pub fn boxes(arena_w: usize, arena_h: usize) -> Self {
        Layout {
            width:  arena_w + BOXES_CAM_W,
            height: arena_h,
            stage:  Rect { x: 0, y: 0, w: arena_w, h: arena_h },
            camera: Rect { x: arena_w, y: 0, w: BOXES_CAM_W, h: arena_h },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    FrameImage,
    layout: Layout,
    /// Present in simulation mode only.
    sim_tx: Option<Sender<SimInput>>,
    last_pointer: Option<(f32, f32)>,
    last_grip:    bool,
}

impl Visualizer {
    pub fn new(title: &str, layout: Layout, fps: u32, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let mut window = Window::new(
            title,
            layout.width, layout.height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        ).context("Failed to open window")?;

        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / fps.max(1) as u64)));
        log::info!("Window {}x{} at {} fps", layout.width, layout.height, fps);

        Ok(Visualizer {
            window,
            buf: FrameImage::blank(layout.width, layout.height, WHITE),
            layout,
            sim_tx,
            last_pointer: None,
            last_grip: false,
        })
    }

    /// False once the window is closed or the user pressed Q / Escape.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
            && !self.window.is_key_pressed(Key::Q, KeyRepeat::No)
    }

    /// Forward mouse and grip state to the simulator, sending only changes.
    pub fn poll_sim_input(&mut self) {
        let Some(tx) = &self.sim_tx else { return; };

        let pointer = self.window
            .get_mouse_pos(MouseMode::Discard)
            .and_then(|(mx, my)| self.layout.camera.normalize(mx, my));
        if pointer != self.last_pointer {
            let msg = match pointer {
                Some((x, y)) => SimInput::Pointer { x, y },
                None         => SimInput::Absent,
            };
            let _ = tx.send(msg);
            self.last_pointer = pointer;
        }

        let grip = self.window.get_mouse_down(MouseButton::Left)
            || self.window.is_key_down(Key::Space);
        if grip != self.last_grip {
            let _ = tx.send(SimInput::Grip(grip));
            self.last_grip = grip;
        }
    }

    pub fn render_counter(&mut self, snap: &CounterSnapshot) -> Result<()> {
        draw_counter(&mut self.buf, &self.layout, snap, self.sim_tx.is_some());
        self.present()
    }

    pub fn render_boxes(&mut self, snap: &DragBoxSnapshot) -> Result<()> {
        draw_boxes(&mut self.buf, &self.layout, snap);
        self.present()
    }

    fn present(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buf.pixels, self.buf.width, self.buf.height)
            .context("Failed to present frame")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene drawing (window-free, so it can be tested)
// ════════════════════════════════════════════════════════════════════════════

pub fn draw_counter(buf: &mut FrameImage, layout: &Layout, snap: &CounterSnapshot, simulated: bool) {
    let stage = layout.stage;
    let mid = stage.w / 2;
    let s = &snap.state;

    buf.fill(WHITE);
    if s.left_highlighted {
        buf.fill_rect(stage.x as isize, stage.y as isize, mid, stage.h, LEFT_TINT);
    }
    if s.right_highlighted {
        buf.fill_rect((stage.x + mid) as isize, stage.y as isize, stage.w - mid, stage.h, RIGHT_TINT);
    }
    buf.fill_rect((stage.x + mid) as isize - 1, stage.y as isize, 2, stage.h, BLACK);

    let left = s.left_count.to_string();
    let right = s.right_count.to_string();
    let scale = 8;
    let lx = (stage.x + mid / 2).saturating_sub(text_width(&left, scale) / 2);
    buf.draw_text(&left, lx as isize, 20, scale, LEFT_INK);
    let rx = (stage.x + mid + (stage.w - mid) / 2).saturating_sub(text_width(&right, scale) / 2);
    buf.draw_text(&right, rx as isize, 20, scale, RIGHT_INK);

    draw_camera(buf, layout.camera, snap.frame.as_deref());

    let sy = layout.height - STATUS_H;
    buf.fill_rect(0, sy as isize, layout.width, STATUS_H, STATUS_BG);
    let legend = if simulated {
        "mouse over camera = hand   button/space = fist   q = quit"
    } else {
        "open then close a hand in a zone to count   q = quit"
    };
    buf.draw_text(legend, MARGIN as isize, (sy + 16) as isize, 2, LEGEND_INK);
}

pub fn draw_boxes(buf: &mut FrameImage, layout: &Layout, snap: &DragBoxSnapshot) {
    let stage = layout.stage;

    buf.fill(WHITE);
    for obj in &snap.objects {
        let color = if obj.targeted { TARGETED_BOX } else { obj.color };
        let side = (2.0 * obj.half_size) as usize;
        buf.fill_rect(
            (obj.position.0 - obj.half_size) as isize,
            (obj.position.1 - obj.half_size) as isize,
            side, side, color,
        );
        if obj.held {
            buf.draw_border(
                (obj.position.0 - obj.half_size) as isize,
                (obj.position.1 - obj.half_size) as isize,
                side, side, BLACK,
            );
        }
    }

    let pointer_color = if snap.hand_closed { POINTER_CLOSED } else { POINTER_OPEN };
    buf.fill_circle(snap.pointer.0 as isize, snap.pointer.1 as isize, POINTER_RADIUS, pointer_color);

    draw_camera(buf, layout.camera, snap.frame.as_deref());
    buf.fill_rect(stage.w as isize - 2, 0, 5, stage.h, BLACK);
}

fn draw_camera(buf: &mut FrameImage, panel: Rect, frame: Option<&FrameImage>) {
    match frame {
        Some(img) => img.scale_into(buf, panel.x, panel.y, panel.w, panel.h),
        None => buf.fill_rect(panel.x as isize, panel.y as isize, panel.w, panel.h, PANEL_BG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterState;
    use crate::dragbox::{ObjectView, BOX_RED};
    use std::sync::Arc;

    #[test]
    fn normalize_inside_and_outside() {
        let r = Rect { x: 100, y: 50, w: 200, h: 100 };
        assert_eq!(r.normalize(200.0, 100.0), Some((0.5, 0.5)));
        assert_eq!(r.normalize(99.0, 100.0), None);
        assert_eq!(r.normalize(300.0, 100.0), None);
    }

    #[test]
    fn boxes_layout_puts_camera_right_of_arena() {
        let l = Layout::boxes(700, 600);
        assert_eq!((l.width, l.height), (1200, 600));
        assert_eq!(l.camera.x, 700);
    }

    #[test]
    fn counter_highlights_only_occupied_zone() {
        let layout = Layout::counter(600, 500);
        let mut buf = FrameImage::blank(layout.width, layout.height, 0);
        let snap = CounterSnapshot {
            state: CounterState { left_highlighted: true, ..CounterState::default() },
            frame: None,
        };
        draw_counter(&mut buf, &layout, &snap, true);
        assert_eq!(buf.pixel(10, 400), Some(LEFT_TINT));
        assert_eq!(buf.pixel(590, 400), Some(WHITE));
        assert_eq!(buf.pixel(layout.camera.x + 5, layout.camera.y + 5), Some(PANEL_BG));
    }

    #[test]
    fn camera_frame_is_blitted() {
        let layout = Layout::boxes(700, 600);
        let mut buf = FrameImage::blank(layout.width, layout.height, 0);
        let snap = DragBoxSnapshot {
            pointer: (100.0, 100.0),
            hand_closed: false,
            objects: vec![ObjectView {
                position: (400.0, 300.0), held: false, targeted: false,
                half_size: 30.0, color: BOX_RED,
            }],
            frame: Some(Arc::new(FrameImage::blank(64, 48, 0xFF123456))),
        };
        draw_boxes(&mut buf, &layout, &snap);
        assert_eq!(buf.pixel(900, 300), Some(0xFF123456));
        assert_eq!(buf.pixel(400, 300), Some(BOX_RED));
        assert_eq!(buf.pixel(100, 100), Some(POINTER_OPEN));
    }
}

//! Software-rendered window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                                                          │
//! │   background                                             │
//! │   + persistent layer   (committed ink)                   │
//! │   + interaction layer  (skeleton, live preview)          │
//! │                                                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  MODE  GESTURE  status message                           │
//! │  key legend                                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The window also doubles as the simulated hand: the mouse is the index
//! fingertip, buttons and keys choose the pose.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_pose::{Gesture, Landmark, Pose};
use ink_canvas::{pixel, LayeredCanvas, MirrorTransform, PixelPoint};

use crate::stroke::Mode;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:     usize = 34;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const STATUS_BG:    u32   = 0xFF0F3460;
const TEXT_COLOR:   u32   = 0xFFEEEEEE;
const LEGEND_COLOR: u32   = 0xFF888888;
const DRAW_COLOR:   u32   = 0xFF56DFCF;
const ERASE_COLOR:  u32   = 0xFFFF8866;

// ════════════════════════════════════════════════════════════════════════════
// Input
// ════════════════════════════════════════════════════════════════════════════

/// Everything the user asked for since the last poll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiInput {
    pub quit:    bool,
    pub mode:    Option<Mode>,
    pub clear:   bool,
    pub analyze: bool,
    /// Simulated hand: pose and fingertip, `None` when out of frame.
    pub hand:    Option<(Pose, Landmark)>,
}

/// Map raw mouse/keyboard state to a simulated hand.  The pointer must be
/// over the canvas (not the status bar) for a hand to be present.
pub fn sim_hand(
    mouse:     Option<(f32, f32)>,
    transform: &MirrorTransform,
    pointing:  bool,
    fist:      bool,
    open:      bool,
) -> Option<(Pose, Landmark)> {
    let (mx, my) = mouse?;
    if mx < 0.0 || my < 0.0 || mx >= transform.width || my >= transform.height {
        return None;
    }
    let pose = if fist {
        Pose::Fist
    } else if open {
        Pose::Open
    } else if pointing {
        Pose::Pointing
    } else {
        Pose::Relaxed
    };
    Some((pose, transform.to_landmark(PixelPoint::new(mx, my))))
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:    Window,
    buf:       Vec<u32>,
    width:     usize,
    height:    usize,
    transform: MirrorTransform,
}

impl Visualizer {
    /// A window with a `width × height` canvas plus the status bar.
    pub fn new(width: usize, height: usize) -> Result<Self, minifb::Error> {
        let win_h = height + STATUS_H;
        let mut window = Window::new(
            "Air Sketch",
            width, win_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * win_h],
            width,
            height: win_h,
            transform: MirrorTransform::new(width, height),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn poll_input(&mut self) -> UiInput {
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        let mut input = UiInput {
            quit:    !self.window.is_open() || one_shot(Key::Q) || one_shot(Key::Escape),
            clear:   one_shot(Key::C),
            analyze: one_shot(Key::A),
            ..UiInput::default()
        };
        if one_shot(Key::D) { input.mode = Some(Mode::Draw);  }
        if one_shot(Key::E) { input.mode = Some(Mode::Erase); }

        input.hand = sim_hand(
            self.window.get_mouse_pos(MouseMode::Discard),
            &self.transform,
            self.window.get_mouse_down(MouseButton::Left),
            self.window.is_key_down(Key::F),
            self.window.is_key_down(Key::O),
        );
        input
    }

    /// Render one frame.
    pub fn render(&mut self, canvas: &LayeredCanvas, mode: Mode, gesture: Gesture, status: &str) {
        // ── Canvas ────────────────────────────────────────────────────────
        composite(canvas, BG_COLOR, &mut self.buf);

        // ── Status bar ────────────────────────────────────────────────────
        let bar_y = canvas.height();
        self.fill_rect(0, bar_y, self.width, STATUS_H, STATUS_BG);

        let mode_color = match mode {
            Mode::Draw  => DRAW_COLOR,
            Mode::Erase => ERASE_COLOR,
        };
        let mut x = self.draw_label(mode.name(), 10, bar_y + 5, 2, mode_color);
        x = self.draw_label(gesture.name(), x + 16, bar_y + 5, 2, TEXT_COLOR);
        self.draw_label(status, x + 16, bar_y + 5, 2, TEXT_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "D=draw  E=erase  C=clear  A=analyze  Q/Esc=quit   mouse=fingertip  click=point  F=fist  O=open",
            10, bar_y + 22, 1, LEGEND_COLOR,
        );

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale × scale` block.
    /// Returns the x just past the last glyph.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) -> usize {
        let advance = 4 * scale;
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.set_pixel(cx + col * scale + dx, y + row * scale + dy, color);
                        }
                    }
                }
            }
            cx += advance;
        }
        cx
    }
}

/// Stack both layers over an opaque background into the top rows of `out`.
fn composite(canvas: &LayeredCanvas, bg: u32, out: &mut [u32]) {
    let persistent  = canvas.persistent().pixels();
    let interaction = canvas.interaction().pixels();
    for (i, dst) in out.iter_mut().take(persistent.len()).enumerate() {
        let mut c = bg;
        if pixel::alpha(persistent[i])  != 0 { c = pixel::over(c, persistent[i]);  }
        if pixel::alpha(interaction[i]) != 0 { c = pixel::over(c, interaction[i]); }
        *dst = c;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' | '`' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

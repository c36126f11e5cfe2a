//! Packed-ARGB rasters: the per-frame camera image handed to the render loop,
//! and the window back buffer the visualizer draws into.

use hand_landmarks::{HandObservation, LandmarkId, HAND_CONNECTIONS};

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;

/// A `width × height` raster of `0xAARRGGBB` pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameImage {
    pub width:  usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameImage {
    pub fn blank(width: usize, height: usize, color: u32) -> Self {
        FrameImage { width, height, pixels: vec![color; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Filled rectangle, clipped to the raster.
    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        let x0 = (x.max(0) as usize).min(self.width);
        let y0 = (y.max(0) as usize).min(self.height);
        let x1 = ((x + w as isize).max(0) as usize).clamp(x0, self.width);
        let y1 = ((y + h as isize).max(0) as usize).min(self.height);
        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(color);
        }
    }

    pub fn draw_border(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        let (r, b) = (x + w as isize - 1, y + h as isize - 1);
        for col in x..=r {
            self.set_pixel(col, y, color);
            self.set_pixel(col, b, color);
        }
        for row in y..=b {
            self.set_pixel(x, row, color);
            self.set_pixel(r, row, color);
        }
    }

    /// Bresenham line, clipped to the raster first so far-away endpoints
    /// cost nothing.
    pub fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), color: u32) {
        let Some(((x0, y0), (x1, y1))) = self.clip_segment(from, to) else { return; };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Liang-Barsky clip of a segment to the pixel grid. `None` when the
    /// segment misses the raster entirely.
    fn clip_segment(
        &self,
        (x0, y0): (isize, isize),
        (x1, y1): (isize, isize),
    ) -> Option<((isize, isize), (isize, isize))> {
        if self.width == 0 || self.height == 0 { return None; }
        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
        let (xmax, ymax) = ((self.width - 1) as f64, (self.height - 1) as f64);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, fx), (dx, xmax - fx), (-dy, fy), (dy, ymax - fy)] {
            if p == 0.0 {
                if q < 0.0 { return None; }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 { return None; }
                    t0 = t0.max(r);
                } else {
                    if r < t0 { return None; }
                    t1 = t1.min(r);
                }
            }
        }
        let at = |t: f64| {
            let x = (fx + t * dx).round().clamp(0.0, xmax) as isize;
            let y = (fy + t * dy).round().clamp(0.0, ymax) as isize;
            (x, y)
        };
        Some((at(t0), at(t1)))
    }

    pub fn fill_circle(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        let r = r.max(0);
        if cx < -r || cy < -r
            || cx > self.width as isize + r || cy > self.height as isize + r
        {
            return;
        }
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw a hand's bones and joints, placing its normalized landmarks on
    /// this raster regardless of the detector's frame size. Landmarks far
    /// outside the frame are pulled in to one frame-width of the edge.
    pub fn draw_skeleton(&mut self, hand: &HandObservation, bone: u32, joint: u32) {
        let (w, h) = (self.width as f32, self.height as f32);
        let at = |id: LandmarkId| {
            let lm = hand.get(id);
            ((lm.x.clamp(-1.0, 2.0) * w) as isize, (lm.y.clamp(-1.0, 2.0) * h) as isize)
        };
        for (a, b) in HAND_CONNECTIONS {
            self.draw_line(at(a), at(b), bone);
        }
        for id in LandmarkId::ALL {
            let (x, y) = at(id);
            self.fill_circle(x, y, 3, joint);
        }
    }

    /// Nearest-neighbour copy of this raster into the `w × h` rectangle of
    /// `dst` whose top-left corner is `(x, y)`.
    pub fn scale_into(&self, dst: &mut FrameImage, x: usize, y: usize, w: usize, h: usize) {
        if self.width == 0 || self.height == 0 { return; }
        for row in 0..h.min(dst.height.saturating_sub(y)) {
            let sy = row * self.height / h;
            for col in 0..w.min(dst.width.saturating_sub(x)) {
                let sx = col * self.width / w;
                dst.pixels[(y + row) * dst.width + x + col] = self.pixels[sy * self.width + sx];
            }
        }
    }

    /// Text in the 3×5 bitmap font, each font pixel drawn `scale × scale`.
    pub fn draw_text(&mut self, text: &str, x: isize, y: isize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            for (row, &bits) in glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(
                            cx + (col * scale) as isize,
                            y + (row * scale) as isize,
                            scale, scale, color,
                        );
                    }
                }
            }
            cx += (4 * scale) as isize;
            if cx >= self.width as isize { break; }
        }
    }
}

/// Width in pixels of `text` drawn by [`FrameImage::draw_text`].
pub fn text_width(text: &str, scale: usize) -> usize {
    (text.chars().count() * 4).saturating_sub(1) * scale.max(1)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
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
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000; 5],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

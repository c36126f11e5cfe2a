//! Application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line overrides. Every section and field is optional in the file:
//!
//! ```toml
//! [source]
//! replay = "session.jsonl"      # or "-" for stdin
//! detector = "python3 hand_detect.py"
//! mirror = true
//! camera_width = 640
//! camera_height = 480
//! sim_interval_ms = 33
//!
//! [render]
//! fps = 60
//!
//! [counter]
//! canvas_width = 600
//! canvas_height = 500
//! armed_at_start = false
//! grip = { rule = "fold" }
//!
//! [boxes]
//! arena_width = 700
//! arena_height = 600
//! box_half_size = 30
//! grab_half_extent = 30
//! grip = { rule = "pinch", threshold_px = 50.0 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hand_gesture::GripRule;
use hand_landmarks::wire::MAX_FRAME_SIDE;
use serde::Deserialize;

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Recorded JSON-lines landmark file; `-` reads stdin.
    pub replay:          Option<PathBuf>,
    /// Detector command whose stdout carries JSON-lines frames.
    pub detector:        Option<String>,
    /// Flip landmarks horizontally, as for a selfie camera.
    pub mirror:          bool,
    /// Frame size the simulator pretends to capture at.
    pub camera_width:    u32,
    pub camera_height:   u32,
    pub sim_interval_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            replay:          None,
            detector:        None,
            mirror:          false,
            camera_width:    640,
            camera_height:   480,
            sim_interval_ms: 33,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig { fps: 60 }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    pub canvas_width:   u32,
    pub canvas_height:  u32,
    /// Count a fist even when no open hand was seen in that zone first.
    pub armed_at_start: bool,
    pub grip:           GripRule,
}

impl Default for CounterConfig {
    fn default() -> Self {
        CounterConfig {
            canvas_width:   600,
            canvas_height:  500,
            armed_at_start: false,
            grip:           GripRule::Fold,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoxesConfig {
    pub arena_width:      u32,
    pub arena_height:     u32,
    pub box_half_size:    f32,
    pub grab_half_extent: f32,
    pub flip_x:           bool,
    pub flip_y:           bool,
    pub grip:             GripRule,
}

impl Default for BoxesConfig {
    fn default() -> Self {
        BoxesConfig {
            arena_width:      700,
            arena_height:     600,
            box_half_size:    30.0,
            grab_half_extent: 30.0,
            flip_x:           false,
            flip_y:           false,
            grip:             GripRule::Fold,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub source:  SourceConfig,
    pub render:  RenderConfig,
    pub counter: CounterConfig,
    pub boxes:   BoxesConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub replay:   Option<PathBuf>,
    pub detector: Option<String>,
    pub mirror:   bool,
    pub grip:     Option<GripRule>,
    pub fps:      Option<u32>,
}

impl AppConfig {
    /// Load `path` if given (defaults otherwise) and apply `overrides`.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read config file: {}", path.display())
                })?;
                let config: AppConfig = toml::from_str(&content).with_context(|| {
                    format!("Failed to parse config file: {}", path.display())
                })?;
                log::info!("Loaded config from {}", path.display());
                config
            }
            None => AppConfig::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, o: &Overrides) {
        if let Some(r) = &o.replay   { self.source.replay   = Some(r.clone()); }
        if let Some(d) = &o.detector { self.source.detector = Some(d.clone()); }
        if o.mirror                  { self.source.mirror   = true; }
        if let Some(fps) = o.fps     { self.render.fps      = fps; }
        if let Some(grip) = o.grip {
            self.counter.grip = grip;
            self.boxes.grip   = grip;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.replay.is_some() && self.source.detector.is_some() {
            bail!("Choose either a replay file or a detector command, not both");
        }
        let (cw, ch) = (self.source.camera_width, self.source.camera_height);
        if cw == 0 || ch == 0 || cw > MAX_FRAME_SIDE || ch > MAX_FRAME_SIDE {
            bail!("Camera size must be within 1..={} per side (got {}x{})", MAX_FRAME_SIDE, cw, ch);
        }
        if !(1..=240).contains(&self.render.fps) {
            bail!("Render fps must be within 1..=240 (got {})", self.render.fps);
        }
        if self.counter.canvas_width < 2 || self.counter.canvas_height == 0 {
            bail!("Counter canvas is too small");
        }
        let (cw, ch) = (self.counter.canvas_width, self.counter.canvas_height);
        let (aw, ah) = (self.boxes.arena_width, self.boxes.arena_height);
        if cw.max(ch) > MAX_FRAME_SIDE || aw.max(ah) > MAX_FRAME_SIDE {
            bail!("Canvas and arena sides must not exceed {} pixels", MAX_FRAME_SIDE);
        }
        let b = &self.boxes;
        require_positive("boxes.box_half_size", b.box_half_size)?;
        require_positive("boxes.grab_half_extent", b.grab_half_extent)?;
        if b.arena_width as f32 <= 2.0 * b.box_half_size
            || b.arena_height as f32 <= 2.0 * b.box_half_size
        {
            bail!("Arena must be larger than a box");
        }
        for (name, grip) in [("counter.grip", self.counter.grip), ("boxes.grip", b.grip)] {
            if let GripRule::Pinch { threshold_px } = grip {
                require_positive(name, threshold_px)?;
            }
        }
        Ok(())
    }
}

/// NaN and infinities fail too.
fn require_positive(name: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        bail!("{} must be a positive number (got {})", name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_match_stock_layout() {
        let c = AppConfig::load(None, &Overrides::default()).unwrap();
        assert_eq!((c.boxes.arena_width, c.boxes.arena_height), (700, 600));
        assert_eq!((c.counter.canvas_width, c.counter.canvas_height), (600, 500));
        assert_eq!(c.render.fps, 60);
        assert_eq!(c.boxes.grip, GripRule::Fold);
        assert!(!c.counter.armed_at_start);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let f = write_config(
            "[boxes]\narena_width = 800\ngrip = { rule = \"pinch\", threshold_px = 40.0 }\n",
        );
        let c = AppConfig::load(Some(f.path()), &Overrides::default()).unwrap();
        assert_eq!(c.boxes.arena_width, 800);
        assert_eq!(c.boxes.arena_height, 600);
        assert_eq!(c.boxes.grip, GripRule::Pinch { threshold_px: 40.0 });
        assert_eq!(c.counter.grip, GripRule::Fold);
    }

    #[test]
    fn overrides_win_over_file() {
        let f = write_config("[render]\nfps = 30\n[source]\nmirror = false\n");
        let o = Overrides { fps: Some(90), mirror: true, ..Overrides::default() };
        let c = AppConfig::load(Some(f.path()), &o).unwrap();
        assert_eq!(c.render.fps, 90);
        assert!(c.source.mirror);
    }

    #[test]
    fn unreadable_and_invalid_files_fail() {
        assert!(AppConfig::load(Some(Path::new("/no/such/config.toml")), &Overrides::default()).is_err());
        let f = write_config("[render]\nfps = \"fast\"\n");
        assert!(AppConfig::load(Some(f.path()), &Overrides::default()).is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut c = AppConfig::default();
        c.render.fps = 0;
        assert!(c.validate().is_err());

        let mut c = AppConfig::default();
        c.source.replay = Some(PathBuf::from("a.jsonl"));
        c.source.detector = Some("detect".into());
        assert!(c.validate().is_err());

        let mut c = AppConfig::default();
        c.boxes.grip = GripRule::Pinch { threshold_px: 0.0 };
        assert!(c.validate().is_err());

        let mut c = AppConfig::default();
        c.boxes.arena_width = 50;
        assert!(c.validate().is_err());

        let mut c = AppConfig::default();
        c.source.camera_height = 4_000_000_000;
        assert!(c.validate().is_err());

        let mut c = AppConfig::default();
        c.boxes.arena_height = 100_000;
        assert!(c.validate().is_err());
    }

    #[test]
    fn non_finite_sizes_are_rejected() {
        for bad in [f32::NAN, f32::INFINITY, -1.0] {
            let mut c = AppConfig::default();
            c.boxes.box_half_size = bad;
            assert!(c.validate().is_err(), "box_half_size {}", bad);

            let mut c = AppConfig::default();
            c.boxes.grab_half_extent = bad;
            assert!(c.validate().is_err(), "grab_half_extent {}", bad);

            let mut c = AppConfig::default();
            c.counter.grip = GripRule::Pinch { threshold_px: bad };
            assert!(c.validate().is_err(), "counter threshold {}", bad);

            let mut c = AppConfig::default();
            c.boxes.grip = GripRule::Pinch { threshold_px: bad };
            assert!(c.validate().is_err(), "boxes threshold {}", bad);
        }
    }

    #[test]
    fn nan_in_file_is_rejected() {
        let f = write_config("[boxes]\nbox_half_size = nan\n");
        let err = AppConfig::load(Some(f.path()), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("box_half_size"));
    }
}

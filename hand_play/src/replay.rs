//! Landmark frames from an external detector, one JSON object per line.
//!
//! Lines can come from a recorded file, from stdin, or from the stdout of a
//! detector process this source spawns and owns (for example a MediaPipe
//! script). See [`hand_landmarks::wire`] for the line format.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{bail, Context, Result};
use hand_landmarks::wire::parse_line;

use crate::frame::FrameImage;
use crate::source::{DetectionFrame, LandmarkSource};

const REPLAY_BACKGROUND: u32 = 0xFF101018;
const REPLAY_BONE:       u32 = 0xFF40E040;
const REPLAY_JOINT:      u32 = 0xFFFF4040;
/// Frame rasters with a side longer than this are drawn at reduced size.
const MAX_IMAGE_SIDE:    u32 = 640;

pub struct JsonLinesSource {
    name:   String,
    reader: Box<dyn BufRead + Send>,
    child:  Option<Child>,
    mirror: bool,
    line:   String,
    lineno: usize,
}

impl JsonLinesSource {
    pub fn from_reader<R: BufRead + Send + 'static>(name: &str, reader: R) -> Self {
        JsonLinesSource {
            name:   name.to_string(),
            reader: Box::new(reader),
            child:  None,
            mirror: false,
            line:   String::new(),
            lineno: 0,
        }
    }

    /// Read a recording; `-` means stdin.
    pub fn open(path: &Path) -> Result<Self> {
        if path == Path::new("-") {
            return Ok(Self::from_reader("stdin", BufReader::new(io::stdin())));
        }
        let file = File::open(path)
            .with_context(|| format!("Failed to open landmark recording: {}", path.display()))?;
        Ok(Self::from_reader(&path.display().to_string(), BufReader::new(file)))
    }

    /// Spawn `command` (program followed by whitespace-separated arguments)
    /// and read frames from its stdout.
    pub fn spawn(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            bail!("Detector command is empty");
        };
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start detector: {}", command))?;
        let stdout = child.stdout.take().context("Detector has no stdout")?;
        log::info!("[replay] detector started (pid {}): {}", child.id(), command);

        let mut src = Self::from_reader(program, BufReader::new(stdout));
        src.child = Some(child);
        Ok(src)
    }

    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }
}

impl LandmarkSource for JsonLinesSource {
    fn name(&self) -> &str { &self.name }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
        loop {
            self.line.clear();
            let n = self.reader.read_line(&mut self.line)
                .with_context(|| format!("Failed to read from {}", self.name))?;
            if n == 0 {
                return Ok(None);
            }
            self.lineno += 1;
            if !self.line.trim().is_empty() {
                break;
            }
        }

        let detected = parse_line(self.line.trim())
            .with_context(|| format!("{} line {}", self.name, self.lineno))?;

        let hands: Vec<_> = if self.mirror {
            detected.hands.iter().map(|h| h.mirrored()).collect()
        } else {
            detected.hands
        };

        let (w, h) = image_size(detected.size.width, detected.size.height);
        let mut image = FrameImage::blank(w, h, REPLAY_BACKGROUND);
        for hand in &hands {
            image.draw_skeleton(hand, REPLAY_BONE, REPLAY_JOINT);
        }

        Ok(Some(DetectionFrame { size: detected.size, hands, image }))
    }
}

impl Drop for JsonLinesSource {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            log::info!("[replay] stopping detector (pid {})", child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Raster size for a frame, shrunk to fit a [`MAX_IMAGE_SIDE`] square
/// keeping aspect.
fn image_size(width: u32, height: u32) -> (usize, usize) {
    let (w, h, m) = (width as u64, height as u64, MAX_IMAGE_SIDE as u64);
    let (w, h) = if w <= m && h <= m {
        (w, h)
    } else if w >= h {
        (m, (h * m / w).max(1))
    } else {
        ((w * m / h).max(1), m)
    };
    (w as usize, h as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::LandmarkId;
    use std::io::{Cursor, Write};

    fn hand_line(width: u32, height: u32, x: f32) -> String {
        let pts: Vec<String> = (0..21).map(|_| format!("[{},0.5]", x)).collect();
        format!(
            r#"{{"width":{},"height":{},"hands":[{{"landmarks":[{}]}}]}}"#,
            width, height, pts.join(",")
        )
    }

    #[test]
    fn reads_frames_then_ends() {
        let text = format!("{}\n\n{}\n", hand_line(640, 480, 0.2), r#"{"width":640,"height":480}"#);
        let mut src = JsonLinesSource::from_reader("mem", Cursor::new(text));
        let f1 = src.next_frame().unwrap().unwrap();
        assert_eq!(f1.hands.len(), 1);
        assert_eq!((f1.image.width, f1.image.height), (640, 480));
        let f2 = src.next_frame().unwrap().unwrap();
        assert!(f2.hands.is_empty());
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn mirror_flips_landmarks() {
        let mut src = JsonLinesSource::from_reader("mem", Cursor::new(hand_line(640, 480, 0.2)))
            .mirrored(true);
        let f = src.next_frame().unwrap().unwrap();
        assert!((f.hands[0].get(LandmarkId::Wrist).x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn malformed_line_is_an_error_naming_the_line() {
        let text = format!("{}\n{{oops\n", hand_line(640, 480, 0.5));
        let mut src = JsonLinesSource::from_reader("mem", Cursor::new(text));
        assert!(src.next_frame().is_ok());
        let err = src.next_frame().unwrap_err();
        assert!(format!("{:#}", err).contains("mem line 2"));
    }

    #[test]
    fn large_frames_get_smaller_rasters() {
        assert_eq!(image_size(1280, 720), (640, 360));
        assert_eq!(image_size(320, 240), (320, 240));
        assert_eq!(image_size(480, 1920), (160, 640));
        assert_eq!(image_size(640, 4_000_000_000), (1, 640));
        assert_eq!(image_size(u32::MAX, u32::MAX), (640, 640));
    }

    #[test]
    fn huge_frame_size_ends_stream_with_error() {
        let mut src = JsonLinesSource::from_reader("mem", Cursor::new(hand_line(640, 4_000_000_000, 0.5)));
        let err = src.next_frame().unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds"));
    }

    #[test]
    fn wild_coordinate_ends_stream_with_error() {
        let mut pts: Vec<String> = (0..21).map(|_| "[0.5,0.5]".to_string()).collect();
        pts[LandmarkId::IndexTip.index()] = "[1e30,0.5]".into();
        let line = format!(
            r#"{{"width":640,"height":480,"hands":[{{"landmarks":[{}]}}]}}"#,
            pts.join(",")
        );
        let mut src = JsonLinesSource::from_reader("mem", Cursor::new(line));
        let err = src.next_frame().unwrap_err();
        assert!(format!("{:#}", err).contains("mem line 1"));
    }

    #[test]
    fn opens_recording_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", hand_line(320, 240, 0.9)).unwrap();
        let mut src = JsonLinesSource::open(file.path()).unwrap();
        assert_eq!(src.next_frame().unwrap().unwrap().hands.len(), 1);
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(JsonLinesSource::open(Path::new("/definitely/not/here.jsonl")).is_err());
    }

    #[test]
    fn empty_detector_command_is_rejected() {
        assert!(JsonLinesSource::spawn("   ").is_err());
    }
}

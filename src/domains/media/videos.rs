//! Video inspection using the `ffprobe` command-line tool.
//!
//! ffprobe reports container and stream metadata as JSON; the container
//! section and every stream are passed through to the client unchanged,
//! with a few commonly needed values lifted to the top level.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::batch::MediaInspector;
use super::error::MediaError;

type JsonObject = Map<String, Value>;

/// Metadata reported for one video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub path: String,
    /// Container metadata as reported by ffprobe.
    pub format: JsonObject,
    pub video_streams: Vec<JsonObject>,
    pub audio_streams: Vec<JsonObject>,
    /// Duration in seconds (0 when unknown).
    pub duration: f64,
    /// File size in bytes (0 when unknown).
    pub size: u64,
    /// Overall bit rate in bits per second (0 when unknown).
    pub bit_rate: u64,
    /// Average frame rate of the first video stream.
    pub framerate: Option<f64>,
}

/// Raw `ffprobe -show_format -show_streams -of json` output.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<JsonObject>,
    #[serde(default)]
    pub format: JsonObject,
}

/// Probes video files by running ffprobe.
#[derive(Debug, Clone)]
pub struct VideoInspector {
    ffprobe: PathBuf,
}

impl VideoInspector {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    /// Run ffprobe on `path` and parse its JSON report.
    #[instrument(skip(self), fields(ffprobe = %self.ffprobe.display()))]
    pub fn probe(&self, path: &Path) -> Result<ProbeOutput, MediaError> {
        debug!("Running ffprobe on {}", path.display());

        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-show_format", "-show_streams", "-of", "json"])
            .arg(path)
            .output()
            .map_err(|e| {
                MediaError::decode(
                    path,
                    format!("failed to run {}: {}", self.ffprobe.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("ffprobe exited with {}", output.status),
                msg => msg.to_string(),
            };
            return Err(MediaError::decode(path, message));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| MediaError::decode(path, format!("invalid ffprobe output: {e}")))
    }
}

impl MediaInspector for VideoInspector {
    type Info = VideoInfo;

    fn inspect(&self, requested: &str, resolved: &Path) -> Result<VideoInfo, MediaError> {
        let probe = self.probe(resolved)?;
        Ok(VideoInfo::from_probe(requested, probe))
    }
}

impl VideoInfo {
    /// Build the client-facing record from an ffprobe report.
    pub fn from_probe(requested: &str, probe: ProbeOutput) -> Self {
        let (video_streams, audio_streams) = split_streams(probe.streams);

        let framerate = video_streams
            .first()
            .and_then(|stream| stream.get("avg_frame_rate"))
            .and_then(Value::as_str)
            .and_then(parse_frame_rate);

        Self {
            path: requested.to_string(),
            duration: number_field(&probe.format, "duration").unwrap_or(0.0),
            size: integer_field(&probe.format, "size").unwrap_or(0),
            bit_rate: integer_field(&probe.format, "bit_rate").unwrap_or(0),
            format: probe.format,
            video_streams,
            audio_streams,
            framerate,
        }
    }
}

fn split_streams(streams: Vec<JsonObject>) -> (Vec<JsonObject>, Vec<JsonObject>) {
    let mut video = Vec::new();
    let mut audio = Vec::new();
    for stream in streams {
        match stream.get("codec_type").and_then(Value::as_str) {
            Some("video") => video.push(stream),
            Some("audio") => audio.push(stream),
            _ => {}
        }
    }
    (video, audio)
}

/// Parse an ffprobe rational such as "30000/1001". A zero denominator
/// (ffprobe prints "0/0" when the rate is unknown) yields `None`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: i64 = num.trim().parse().ok()?;
    let den: i64 = den.trim().parse().ok()?;
    if den == 0 {
        return None;
    }
    Some(num as f64 / den as f64)
}

// ffprobe encodes most numbers as strings in its JSON output.
fn number_field(object: &JsonObject, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn integer_field(object: &JsonObject, key: &str) -> Option<u64> {
    match object.get(key)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

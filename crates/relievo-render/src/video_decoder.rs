//! Video decoding module.
//! Uses an FFmpeg subprocess to stream raw frames out of a video file, one
//! frame per read, in presentation order.

use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use relievo_core::frame::{FrameBuffer, PixelFormat};
use relievo_core::{RelievoError, RelievoResult};

/// Metadata about a video file.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Frame rate (fps).
    pub fps: f64,
    /// Total number of frames, derived from duration and fps (0 if unknown).
    pub frame_count: u64,
}

/// Check if FFmpeg is available on the system.
pub fn ffmpeg_available() -> bool {
    tool_available("ffmpeg")
}

/// Check if ffprobe is available on the system.
pub fn ffprobe_available() -> bool {
    tool_available("ffprobe")
}

fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Probe a video file to get its metadata (width, height, duration, fps).
pub fn probe(path: &Path) -> RelievoResult<VideoInfo> {
    if !ffprobe_available() {
        return Err(RelievoError::Probe(
            "ffprobe not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html".into(),
        ));
    }

    if !path.exists() {
        return Err(RelievoError::asset(
            format!("video file not found: {}", path.display()),
            path,
        ));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RelievoError::Probe(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RelievoError::Probe(format!("ffprobe failed: {}", stderr)));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| RelievoError::Probe(format!("failed to parse ffprobe output: {}", e)))?;

    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| RelievoError::Probe("no streams found in video".into()))?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| RelievoError::Probe("no video stream found".into()))?;

    let width = video_stream["width"]
        .as_u64()
        .ok_or_else(|| RelievoError::Probe("missing width in video stream".into()))?
        as u32;
    let height = video_stream["height"]
        .as_u64()
        .ok_or_else(|| RelievoError::Probe("missing height in video stream".into()))?
        as u32;

    // Frame rate comes as a fraction like "30/1" or "24000/1001".
    let fps = parse_frame_rate(video_stream["r_frame_rate"].as_str().unwrap_or("30/1"));

    let duration_secs = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video_stream["duration"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
        })
        .unwrap_or(0.0);

    let frame_count = if duration_secs > 0.0 {
        (duration_secs * fps).round() as u64
    } else {
        0
    };

    Ok(VideoInfo {
        width,
        height,
        duration_secs,
        fps,
        frame_count,
    })
}

/// A sequential frame reader backed by an FFmpeg subprocess.
///
/// FFmpeg decodes the input and writes packed `rgb24` frames to its stdout;
/// `next_frame` reads exactly one frame's worth of bytes per call. End of
/// the pipe (or a mid-stream decode failure) ends the stream rather than
/// surfacing an error. Dropping the stream kills and reaps the child.
pub struct FrameStream {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    frames_read: u64,
    done: bool,
}

impl FrameStream {
    /// Open a video file for sequential decoding at its native resolution.
    pub fn open(path: &Path, width: u32, height: u32) -> RelievoResult<Self> {
        if !ffmpeg_available() {
            return Err(RelievoError::Decode(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html"
                    .into(),
            ));
        }

        if !path.exists() {
            return Err(RelievoError::asset(
                format!("video file not found: {}", path.display()),
                path,
            ));
        }

        if width == 0 || height == 0 {
            return Err(RelievoError::invalid_frame(format!(
                "cannot decode zero-sized frames ({}x{})",
                width, height
            )));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RelievoError::Decode(format!("failed to start ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RelievoError::Decode("failed to open ffmpeg stdout".into()))?;

        tracing::info!("decoding {} at {}x{}", path.display(), width, height);

        Ok(Self {
            child,
            stdout,
            width,
            height,
            frames_read: 0,
            done: false,
        })
    }

    /// Read the next frame. Returns `Ok(None)` at end of stream.
    pub fn next_frame(&mut self) -> RelievoResult<Option<FrameBuffer>> {
        if self.done {
            return Ok(None);
        }

        let mut frame = FrameBuffer::new(self.width, self.height, PixelFormat::Rgb8);
        let mut filled = 0usize;
        while filled < frame.data.len() {
            match self.stdout.read(&mut frame.data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // A mid-stream decode failure is end-of-stream, not fatal.
                    tracing::warn!("decode read failed after {} frames: {}", self.frames_read, e);
                    self.done = true;
                    return Ok(None);
                }
            }
        }

        if filled == 0 {
            self.done = true;
            return Ok(None);
        }
        if filled < frame.data.len() {
            tracing::warn!(
                "discarding partial trailing frame ({} of {} bytes)",
                filled,
                frame.data.len()
            );
            self.done = true;
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(Some(frame))
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        // The child may have exited on its own; kill/wait errors are moot.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Parse a frame rate string like "30/1" or "24000/1001" into a float.
fn parse_frame_rate(rate_str: &str) -> f64 {
    if let Some((num_str, den_str)) = rate_str.split_once('/') {
        let num: f64 = num_str.parse().unwrap_or(30.0);
        let den: f64 = den_str.parse().unwrap_or(1.0);
        if den > 0.0 {
            num / den
        } else {
            30.0
        }
    } else {
        rate_str.parse::<f64>().unwrap_or(30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate_fraction() {
        assert!((parse_frame_rate("30/1") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("24000/1001") - 23.976).abs() < 0.01);
        assert!((parse_frame_rate("60/1") - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_frame_rate_plain() {
        assert!((parse_frame_rate("25") - 25.0).abs() < 0.001);
        assert!((parse_frame_rate("29.97") - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_invalid() {
        // Should fall back to 30.0
        assert!((parse_frame_rate("invalid") - 30.0).abs() < 0.001);
        assert!((parse_frame_rate("30/0") - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_probe_missing_file() {
        if !ffprobe_available() {
            return;
        }
        let result = probe(Path::new("/nonexistent/video.mp4"));
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_stream_missing_file() {
        if !ffmpeg_available() {
            return;
        }
        let result = FrameStream::open(Path::new("/nonexistent/video.mp4"), 320, 240);
        assert!(result.is_err());
    }

    #[test]
    fn test_availability_check_does_not_panic() {
        // May be true or false depending on the system.
        let _ = ffmpeg_available();
        let _ = ffprobe_available();
    }
}

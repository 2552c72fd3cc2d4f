use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use relievo_core::frame::{FrameBuffer, PixelFormat};
use relievo_core::RelievoError;

/// Streaming encoder that shells out to FFmpeg.
///
/// Frames are written one at a time as packed `rgb24` bytes on the child's
/// stdin, so the whole video never has to be held in memory. `finish`
/// closes the pipe, waits for FFmpeg to exit, and surfaces its stderr on
/// failure. Dropping an unfinished sink kills and reaps the child, leaving
/// a truncated output file rather than a hung process.
pub struct FfmpegSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
    frames_written: u64,
}

impl FfmpegSink {
    /// Check if FFmpeg is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open an output file for encoding.
    ///
    /// # Arguments
    /// * `output_path` - Path for the output video file
    /// * `width` / `height` - Frame dimensions in pixels
    /// * `fps` - Frames per second (matches the input's native rate)
    /// * `codec` - FFmpeg encoder name (e.g. "libx264", "mpeg4")
    pub fn open(
        output_path: &Path,
        width: u32,
        height: u32,
        fps: f64,
        codec: &str,
    ) -> Result<Self, RelievoError> {
        if width == 0 || height == 0 {
            return Err(RelievoError::Encode(format!(
                "cannot encode zero-sized frames ({}x{})",
                width, height
            )));
        }

        if !Self::is_available() {
            return Err(RelievoError::Encode(
                "ffmpeg not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html".into(),
            ));
        }

        // Ensure output directory exists
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-v", "error"]);

        // Input: raw video frames from stdin
        cmd.args([
            "-f", "rawvideo",
            "-pixel_format", "rgb24",
            "-video_size", &format!("{}x{}", width, height),
            "-framerate", &format!("{}", fps),
            "-i", "-",
        ]);

        // Output encoding configuration
        cmd.args(["-c:v", codec, "-pix_fmt", "yuv420p", "-movflags", "+faststart"]);
        cmd.arg(output_path);

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RelievoError::Encode(format!("failed to start ffmpeg: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RelievoError::Encode("failed to open ffmpeg stdin".into()))?;

        tracing::info!(
            "encoding to {} ({}x{} @ {}fps, {})",
            output_path.display(),
            width,
            height,
            fps,
            codec
        );

        Ok(Self {
            child: Some(child),
            stdin: Some(stdin),
            width,
            height,
            frames_written: 0,
        })
    }

    /// Write one frame to the encoder.
    pub fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), RelievoError> {
        if frame.width != self.width || frame.height != self.height {
            return Err(RelievoError::Encode(format!(
                "frame {} has dimensions {}x{}, expected {}x{}",
                self.frames_written, frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.format != PixelFormat::Rgb8 {
            return Err(RelievoError::Encode(format!(
                "encoder expects Rgb8 frames, got {:?}",
                frame.format
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| RelievoError::Encode("encoder already finished".into()))?;

        if let Err(e) = stdin.write_all(&frame.data) {
            // If the write fails, collect the child's stderr instead of just
            // reporting a broken pipe.
            drop(self.stdin.take());
            let stderr = match self.child.take().map(|c| c.wait_with_output()) {
                Some(Ok(output)) => String::from_utf8_lossy(&output.stderr).into_owned(),
                _ => "unavailable".to_string(),
            };
            return Err(RelievoError::Encode(format!(
                "failed to write frame {} to ffmpeg: {}. FFmpeg stderr: {}",
                self.frames_written, e, stderr
            )));
        }

        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Close the input pipe and wait for FFmpeg to finish the file.
    /// Returns the number of frames written.
    pub fn finish(mut self) -> Result<u64, RelievoError> {
        // Close stdin to signal end of input
        drop(self.stdin.take());

        let child = self
            .child
            .take()
            .ok_or_else(|| RelievoError::Encode("encoder already finished".into()))?;

        let output = child
            .wait_with_output()
            .map_err(|e| RelievoError::Encode(format!("ffmpeg process error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RelievoError::Encode(format!(
                "ffmpeg failed with status {}: {}",
                output.status, stderr
            )));
        }

        tracing::info!("encoded {} frames", self.frames_written);
        Ok(self.frames_written)
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(self.stdin.take());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

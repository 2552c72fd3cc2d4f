//! The frame pipeline driver.
//! Reads frames sequentially from the input video, runs each one through
//! the depth → stereo → anaglyph chain, and writes the result to the
//! output encoder, with an optional live preview and cooperative
//! cancellation via a designated key.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use relievo_core::hash::{ContentHash, FrameHasher};
use relievo_core::RelievoResult;
use relievo_encode::{FfmpegSink, PreviewWindow};
use relievo_render::video_decoder::{self, FrameStream};

/// Resolved parameters for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_disparity: u32,
    pub codec: String,
    pub preview: bool,
    pub cancel_key: char,
}

/// What a conversion run produced.
#[derive(Debug)]
pub struct ConvertSummary {
    pub frames_read: u64,
    pub frames_written: u64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub cancelled: bool,
    /// Hash of the anaglyph frames as written (before lossy encoding), for
    /// deterministic-output verification.
    pub content_hash: ContentHash,
}

/// Run a conversion with cancellation wired to the configured key.
pub fn run(opts: &ConvertOptions) -> RelievoResult<ConvertSummary> {
    let mut keys = KeyWatch::start(opts.cancel_key);
    run_with_cancel(opts, || keys.cancel_requested())
}

/// Run a conversion, checking `cancel` at the top of every frame iteration.
///
/// The loop has exactly two states: reading and finished. End of stream,
/// a mid-stream decode failure, and a cancellation request all take the
/// same terminal transition; in every case both ffmpeg children are
/// released before returning.
pub fn run_with_cancel(
    opts: &ConvertOptions,
    mut cancel: impl FnMut() -> bool,
) -> RelievoResult<ConvertSummary> {
    let info = video_decoder::probe(&opts.input)?;
    tracing::info!(
        "input {}: {}x{} @ {:.3}fps, ~{} frames",
        opts.input.display(),
        info.width,
        info.height,
        info.fps,
        info.frame_count
    );

    let mut stream = FrameStream::open(&opts.input, info.width, info.height)?;
    let mut sink = FfmpegSink::open(&opts.output, info.width, info.height, info.fps, &opts.codec)?;

    let mut preview = if opts.preview {
        match PreviewWindow::open(info.width, info.height, info.fps, "relievo preview") {
            Ok(window) => Some(window),
            Err(e) => {
                tracing::warn!("preview disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut hasher = FrameHasher::new();
    let mut cancelled = false;

    loop {
        if cancel() {
            tracing::info!("cancelled by user after {} frames", sink.frames_written());
            cancelled = true;
            break;
        }

        let frame = match stream.next_frame()? {
            Some(frame) => frame,
            None => break,
        };

        let anaglyph = relievo_render::process_frame(&frame, opts.max_disparity)?;
        sink.write_frame(&anaglyph)?;
        hasher.update(&anaglyph);

        let mut preview_gone = false;
        if let Some(window) = preview.as_mut() {
            if let Err(e) = window.write_frame(&anaglyph) {
                tracing::warn!("preview disabled: {}", e);
                preview_gone = true;
            }
        }
        if preview_gone {
            preview = None;
        }

        if sink.frames_written() % 30 == 0 {
            tracing::debug!("converted {} frames", sink.frames_written());
        }
    }

    if let Some(window) = preview.take() {
        window.close();
    }

    let frames_read = stream.frames_read();
    let frames_written = sink.finish()?;
    // `stream` is dropped on return, which reaps the decoder child.

    Ok(ConvertSummary {
        frames_read,
        frames_written,
        width: info.width,
        height: info.height,
        fps: info.fps,
        cancelled,
        content_hash: hasher.finalize(),
    })
}

/// Raw-mode keyboard watcher for the cancellation key.
///
/// Only active when stdin is a terminal; otherwise every poll reports
/// "keep going". Raw mode is restored on drop, including on error paths.
struct KeyWatch {
    cancel_key: char,
    raw: bool,
}

impl KeyWatch {
    fn start(cancel_key: char) -> Self {
        let raw = std::io::stdin().is_terminal() && enable_raw_mode().is_ok();
        if raw {
            tracing::info!("press '{}' to cancel", cancel_key);
        }
        Self { cancel_key, raw }
    }

    fn cancel_requested(&mut self) -> bool {
        if !self.raw {
            return false;
        }
        while event::poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key))
                    if key.kind == KeyEventKind::Press
                        && key.code == KeyCode::Char(self.cancel_key) =>
                {
                    return true;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        false
    }
}

impl Drop for KeyWatch {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

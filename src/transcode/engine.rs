//! Transcoding engine
//!
//! Wraps the external FFmpeg binary behind a narrow [`Transcoder`]
//! interface so tests can substitute a mock without spawning processes.
//! An encode runs as a background job that streams percent progress and
//! resolves to a single success/failure result; the caller can kill it at
//! any point through the job's cancel handle.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::recorder::error::{RecordingError, RecordingResult};
use crate::transcode::filters::build_filter_chain;
use crate::transcode::progress;
use crate::transcode::resolution::Resolution;
use crate::types::Bounds;

/// How many trailing stderr lines to keep for the failure reason.
const STDERR_TAIL_LINES: usize = 8;

/// One encode to run.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Raw captured media buffer on disk.
    pub input: PathBuf,

    /// Final compressed file to produce.
    pub output: PathBuf,

    /// Target output resolution.
    pub resolution: Resolution,

    /// Sub-region to crop to before scaling, if any.
    pub crop: Option<Bounds>,

    /// Whether the output should carry an audio track.
    pub include_audio: bool,
}

/// Handle for killing a running encode.
pub trait EncodeCancel: Send + Sync {
    fn cancel(&self);
}

/// A running encode job.
pub struct EncodeJob {
    /// Resolves with the terminal result once the encoder exits.
    pub handle: JoinHandle<RecordingResult<()>>,

    /// Kills the encoder process. A killed encode reports failure.
    pub canceller: Arc<dyn EncodeCancel>,
}

/// Converts a raw captured buffer into the final compressed file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Start an encode.
    ///
    /// Percent progress (0-100) is delivered on `progress` while the job
    /// runs; the returned job's handle resolves with the terminal result.
    async fn encode(
        &self,
        request: EncodeRequest,
        progress: mpsc::Sender<u8>,
    ) -> RecordingResult<EncodeJob>;
}

/// Cancel handle backed by a kill signal to the ffmpeg child.
struct FfmpegCancel {
    cancelled: AtomicBool,
    notify: Notify,
}

impl FfmpegCancel {
    fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl EncodeCancel for FfmpegCancel {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a kill requested before the job
        // reaches its select point is not lost
        self.notify.notify_one();
    }
}

/// [`Transcoder`] implementation spawning the ffmpeg command-line tool.
pub struct FfmpegTranscoder {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Use specific binary paths instead of relying on PATH lookup.
    pub fn with_binaries(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Check whether the ffmpeg binary can be executed.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Build the ffmpeg argument list for a request.
    ///
    /// Fixed parameters: H.264 video, AAC audio, 30 fps, yuv420p, fast
    /// preset at CRF 23, and `+faststart` so the file streams before it
    /// is fully downloaded.
    pub fn build_args(request: &EncodeRequest) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            request.input.to_string_lossy().to_string(),
            "-vf".to_string(),
            build_filter_chain(request.crop, request.resolution),
            "-c:v".to_string(),
            "libx264".to_string(),
        ];

        if request.include_audio {
            args.push("-c:a".to_string());
            args.push("aac".to_string());
        } else {
            args.push("-an".to_string());
        }

        args.extend(
            [
                "-r",
                "30",
                "-preset",
                "fast",
                "-crf",
                "23",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ]
            .map(String::from),
        );
        args.push(request.output.to_string_lossy().to_string());
        args
    }

    /// Probe the input duration in seconds, for percent progress.
    async fn probe_duration(&self, input: &PathBuf) -> Option<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout).trim().parse().ok()
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn encode(
        &self,
        request: EncodeRequest,
        progress: mpsc::Sender<u8>,
    ) -> RecordingResult<EncodeJob> {
        // Without a known input duration progress stays silent and only
        // the terminal result is reported
        let total_seconds = self.probe_duration(&request.input).await;
        if total_seconds.is_none() {
            tracing::warn!("Could not probe input duration; progress will not be reported");
        }

        let args = Self::build_args(&request);
        tracing::info!("Starting ffmpeg: {} {}", self.ffmpeg, args.join(" "));

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RecordingError::EncodingFailed(format!(
                    "failed to launch '{}': {}",
                    self.ffmpeg, e
                ))
            })?;

        let stderr = child.stderr.take().ok_or_else(|| {
            RecordingError::EncodingFailed("ffmpeg stderr was not captured".to_string())
        })?;

        // Stderr must be drained concurrently with the wait, otherwise a
        // chatty encode can fill the pipe and stall the process
        let reader = tokio::spawn(async move {
            let mut tail: Vec<String> = Vec::new();
            let mut last_percent: Option<u8> = None;
            let mut lines = BufReader::new(stderr).lines();

            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(elapsed) = progress::parse_progress_seconds(&line) {
                    if let Some(pct) = total_seconds.and_then(|t| progress::percent(elapsed, t)) {
                        if last_percent != Some(pct) {
                            last_percent = Some(pct);
                            let _ = progress.send(pct).await;
                        }
                    }
                } else if !line.trim().is_empty() {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
            }
            tail
        });

        let canceller = Arc::new(FfmpegCancel::new());
        let cancel = canceller.clone();

        let handle = tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status?,
                _ = cancel.notify.notified() => {
                    tracing::info!("Killing ffmpeg process on cancellation request");
                    let _ = child.start_kill();
                    child.wait().await?
                }
            };

            let tail = reader.await.unwrap_or_default();

            if cancel.is_cancelled() {
                return Err(RecordingError::Cancelled);
            }
            if !status.success() {
                let reason = tail
                    .last()
                    .cloned()
                    .unwrap_or_else(|| format!("ffmpeg exited with {}", status));
                tracing::warn!("ffmpeg failed: {}", reason);
                return Err(RecordingError::EncodingFailed(reason));
            }

            tracing::info!("ffmpeg finished successfully");
            Ok(())
        });

        Ok(EncodeJob { handle, canceller })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(crop: Option<Bounds>, include_audio: bool) -> EncodeRequest {
        EncodeRequest {
            input: PathBuf::from("/tmp/temp-x.webm"),
            output: PathBuf::from("/tmp/recording-x.mp4"),
            resolution: Resolution::new(1280, 720),
            crop,
            include_audio,
        }
    }

    #[test]
    fn test_args_compose_crop_then_scale() {
        let args = FfmpegTranscoder::build_args(&request(Some(Bounds::new(100, 50, 800, 600)), true));

        let vf_index = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf_index + 1], "crop=800:600:100:50,scale=1280:720");
    }

    #[test]
    fn test_args_fixed_encode_parameters() {
        let args = FfmpegTranscoder::build_args(&request(None, true));

        for pair in [
            ["-c:v", "libx264"],
            ["-c:a", "aac"],
            ["-r", "30"],
            ["-preset", "fast"],
            ["-crf", "23"],
            ["-pix_fmt", "yuv420p"],
            ["-movflags", "+faststart"],
        ] {
            let i = args
                .iter()
                .position(|a| a == pair[0])
                .unwrap_or_else(|| panic!("missing {}", pair[0]));
            assert_eq!(args[i + 1], pair[1]);
        }

        // Output path comes last
        assert_eq!(args.last().unwrap(), "/tmp/recording-x.mp4");
    }

    #[test]
    fn test_args_drop_audio_when_disabled() {
        let args = FfmpegTranscoder::build_args(&request(None, false));
        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"aac".to_string()));
    }

    #[tokio::test]
    async fn test_is_available_false_for_missing_binary() {
        let transcoder =
            FfmpegTranscoder::with_binaries("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        assert!(!transcoder.is_available().await);
    }

    #[tokio::test]
    async fn test_cancel_before_select_is_not_lost() {
        let cancel = FfmpegCancel::new();
        cancel.cancel();
        assert!(cancel.is_cancelled());
        // The stored permit resolves immediately
        cancel.notify.notified().await;
    }
}

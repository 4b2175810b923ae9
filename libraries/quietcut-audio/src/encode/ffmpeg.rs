/// FFmpeg-backed MP3 encoding
///
/// Raw little-endian 16-bit PCM is streamed into an `ffmpeg` child process
/// over stdin; the MP3 stream is collected from stdout on a reader thread so
/// neither pipe can fill up and stall the child.
use super::lossy::{EncoderSpec, FrameEncoder, LossyBackend, PcmBlock};
use quietcut_core::{QuietcutError, Result, Stage};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg_path: PathBuf,
}

impl FfmpegBackend {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl LossyBackend for FfmpegBackend {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn open(&self, spec: &EncoderSpec) -> Result<Box<dyn FrameEncoder>> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error"])
            .args(["-f", "s16le"])
            .arg("-ar")
            .arg(spec.sample_rate.to_string())
            .arg("-ac")
            .arg(spec.channels.to_string())
            .args(["-i", "pipe:0"])
            .arg("-b:a")
            .arg(format!("{}k", spec.bitrate_kbps))
            .args(["-f", "mp3", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            QuietcutError::EncoderUnavailable(format!(
                "failed to start {}: {e}",
                self.ffmpeg_path.display()
            ))
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        debug!(?spec, path = %self.ffmpeg_path.display(), "Started ffmpeg encoder");

        Ok(Box::new(FfmpegEncoder {
            child,
            stdin,
            stdout,
            stderr,
            scratch: Vec::new(),
        }))
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>> {
    match handle {
        None => Ok(Vec::new()),
        Some(handle) => handle
            .join()
            .map_err(|_| encoding_error("ffmpeg reader thread panicked"))?
            .map_err(|e| encoding_error(format!("reading ffmpeg output: {e}"))),
    }
}

fn encoding_error(message: impl Into<String>) -> QuietcutError {
    QuietcutError::stage_failed(Stage::Encoding, message)
}

struct FfmpegEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
}

impl FrameEncoder for FfmpegEncoder {
    fn encode(&mut self, block: PcmBlock<'_>) -> Result<Vec<u8>> {
        self.scratch.clear();
        match block {
            PcmBlock::Mono(samples) => {
                for sample in samples {
                    self.scratch.extend_from_slice(&sample.to_le_bytes());
                }
            }
            PcmBlock::Stereo { left, right } => {
                for (l, r) in left.iter().zip(right) {
                    self.scratch.extend_from_slice(&l.to_le_bytes());
                    self.scratch.extend_from_slice(&r.to_le_bytes());
                }
            }
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| encoding_error("ffmpeg encoder already flushed"))?;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| encoding_error(format!("writing to ffmpeg: {e}")))?;

        // Output arrives on the reader thread and is returned by flush
        Ok(Vec::new())
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        // Closing stdin signals end of input
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .map_err(|e| encoding_error(format!("waiting for ffmpeg: {e}")))?;
        let output = collect(self.stdout.take())?;
        let stderr = collect(self.stderr.take()).unwrap_or_default();

        if !status.success() {
            return Err(encoding_error(format!(
                "ffmpeg failed ({status}): {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(output)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.stdin.take().is_some() {
            // Abandoned mid-stream
            if let Err(e) = self.child.kill() {
                warn!("Failed to stop ffmpeg: {}", e);
            }
            let _ = self.child.wait();
        }
    }
}

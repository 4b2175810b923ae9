//! Processing pipeline
//!
//! ```text
//! SampleBuffer -> [silence removal] -> [enhancement] -> encoder -> EncodedAudio
//!                       |
//!                       v
//!                 Region list (for display)
//! ```
//!
//! Each stage borrows the previous stage's output and produces a new
//! buffer. Progress is reported over the whole run: silence removal takes
//! half of the span when enabled, enhancement and encoding share the rest.

mod silence;

pub use silence::{
    auto_threshold_db, remove_silence, remove_silence_with_hooks, AUTO_THRESHOLD_MAX_DB,
    AUTO_THRESHOLD_MIN_DB, AUTO_THRESHOLD_OFFSET_DB,
};

use crate::effects::enhance_with_hooks;
use crate::encode::{check_lossy, encode, EncodedAudio, LossyBackend};
use quietcut_core::{
    OutputFormat, ProcessHooks, ProcessOptions, ProgressSpan, Region, Result, SampleBuffer,
};
use tracing::info;

const SILENCE_WEIGHT: f32 = 2.0;
const ENHANCE_WEIGHT: f32 = 1.0;
const ENCODE_WEIGHT: f32 = 1.0;

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Processed audio before encoding
    pub buffer: SampleBuffer,
    /// Padded regions of the input; empty when silence removal was skipped
    pub regions: Vec<Region>,
    pub removed_frames: usize,
    pub noise_floor_db: Option<f32>,
    pub encoded: EncodedAudio,
}

/// Run silence removal and/or enhancement, then encode
///
/// Options, the lossy channel limit, and lossy backend availability are
/// checked before any processing starts.
///
/// # Errors
/// - `UnsupportedConfiguration` if no stage is requested or options are out of range
/// - `EncoderUnavailable` if lossy output is requested and `backend` cannot encode
/// - any stage failure, tagged with the failing stage
pub fn process(
    buffer: SampleBuffer,
    options: &ProcessOptions,
    backend: &dyn LossyBackend,
    hooks: &mut dyn ProcessHooks,
) -> Result<PipelineOutput> {
    options.validate()?;
    if let OutputFormat::Mp3 { bitrate_kbps } = options.output {
        check_lossy(buffer.channel_count(), bitrate_kbps, backend)?;
    }

    let total = options.silence.map_or(0.0, |_| SILENCE_WEIGHT)
        + options.enhance.map_or(0.0, |_| ENHANCE_WEIGHT)
        + ENCODE_WEIGHT;
    let mut cursor = 0.0;
    let mut next_span = |weight: f32| {
        let start = cursor / total;
        cursor += weight;
        (start, cursor / total)
    };

    let input_frames = buffer.frames();
    let mut current = buffer;
    let mut regions = Vec::new();
    let mut removed_frames = 0;
    let mut noise_floor_db = None;

    if let Some(silence) = &options.silence {
        let (start, end) = next_span(SILENCE_WEIGHT);
        let mut span = ProgressSpan::new(hooks, start, end);
        let result = remove_silence_with_hooks(&current, silence, &mut span)?;
        current = result.buffer;
        regions = result.regions;
        removed_frames = result.removed_frames;
        noise_floor_db = result.noise_floor_db;
    }

    if let Some(enhance) = &options.enhance {
        let (start, end) = next_span(ENHANCE_WEIGHT);
        let mut span = ProgressSpan::new(hooks, start, end);
        current = enhance_with_hooks(&current, enhance, &mut span);
    }

    let (start, end) = next_span(ENCODE_WEIGHT);
    let encoded = encode(
        &current,
        &options.output,
        backend,
        &mut ProgressSpan::new(hooks, start, end),
    )?;
    hooks.progress(1.0);

    info!(
        input_frames,
        output_frames = current.frames(),
        bytes = encoded.bytes.len(),
        mime = encoded.mime.as_str(),
        "Pipeline complete"
    );

    Ok(PipelineOutput {
        buffer: current,
        regions,
        removed_frames,
        noise_floor_db,
        encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{EncoderSpec, FrameEncoder, PcmBlock, UnavailableBackend, WAV_HEADER_LEN};
    use crate::test_utils::speech_with_gap;
    use quietcut_core::{EnhanceOptions, MimeType, NoHooks, QuietcutError, SilenceOptions, Stage};

    /// Always available; encodes nothing
    struct NullBackend;

    struct NullEncoder;

    impl FrameEncoder for NullEncoder {
        fn encode(&mut self, _block: PcmBlock<'_>) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn flush(&mut self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    impl LossyBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn open(&self, _spec: &EncoderSpec) -> Result<Box<dyn FrameEncoder>> {
            Ok(Box::new(NullEncoder))
        }
    }

    fn options(silence: bool, enhance: bool) -> ProcessOptions {
        ProcessOptions {
            silence: silence.then(SilenceOptions::default),
            enhance: enhance.then(EnhanceOptions::default),
            output: OutputFormat::Wav,
        }
    }

    #[test]
    fn nothing_requested_is_rejected() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 1);
        let err = process(input, &options(false, false), &UnavailableBackend, &mut NoHooks)
            .unwrap_err();
        assert!(matches!(err, QuietcutError::UnsupportedConfiguration(_)));
        assert_eq!(err.stage(), Stage::Validation);
    }

    #[test]
    fn mp3_without_backend_fails_before_processing() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 1);
        let mut reports = Vec::new();
        let mut hooks = quietcut_core::OnProgress(|f: f32| reports.push(f));
        let opts = ProcessOptions {
            output: OutputFormat::Mp3 { bitrate_kbps: 128 },
            ..options(true, false)
        };
        let err = process(input, &opts, &UnavailableBackend, &mut hooks).unwrap_err();
        assert!(matches!(err, QuietcutError::EncoderUnavailable(_)));
        assert!(reports.is_empty());
    }

    #[test]
    fn mp3_with_too_many_channels_fails_before_processing() {
        let input = SampleBuffer::silent(3, 16_000, 8_000).unwrap();
        let mut reports = Vec::new();
        let mut hooks = quietcut_core::OnProgress(|f: f32| reports.push(f));
        let opts = ProcessOptions {
            output: OutputFormat::Mp3 { bitrate_kbps: 128 },
            ..options(true, true)
        };
        let err = process(input, &opts, &NullBackend, &mut hooks).unwrap_err();
        assert!(matches!(err, QuietcutError::UnsupportedConfiguration(_)));
        assert!(reports.is_empty());
    }

    #[test]
    fn stereo_mp3_runs_with_available_backend() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 2);
        let opts = ProcessOptions {
            output: OutputFormat::Mp3 { bitrate_kbps: 128 },
            ..options(true, false)
        };
        let output = process(input, &opts, &NullBackend, &mut NoHooks).unwrap();
        assert_eq!(output.encoded.mime, MimeType::Mp3);
        assert!(output.removed_frames > 0);
    }

    #[test]
    fn silence_only_run() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 2);
        let frames = input.frames();
        let output = process(input, &options(true, false), &UnavailableBackend, &mut NoHooks)
            .unwrap();

        assert!(output.removed_frames > 0);
        assert_eq!(output.buffer.frames(), frames - output.removed_frames);
        assert_eq!(output.encoded.mime, MimeType::Wav);
        assert_eq!(
            output.encoded.bytes.len(),
            WAV_HEADER_LEN + output.buffer.frames() * 2 * 2
        );
    }

    #[test]
    fn enhance_only_keeps_length_and_regions_empty() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 1);
        let frames = input.frames();
        let output = process(input, &options(false, true), &UnavailableBackend, &mut NoHooks)
            .unwrap();
        assert_eq!(output.buffer.frames(), frames);
        assert!(output.regions.is_empty());
        assert_eq!(output.removed_frames, 0);
    }

    #[test]
    fn progress_spans_whole_run() {
        let input = speech_with_gap(8_000, 0.5, 1.0, 1);
        let mut reports = Vec::new();
        let mut hooks = quietcut_core::OnProgress(|f: f32| reports.push(f));
        process(input, &options(true, true), &UnavailableBackend, &mut hooks).unwrap();

        assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(reports.last().copied(), Some(1.0));
        assert!(reports.iter().any(|&f| f > 0.0 && f < 0.5));
    }
}

//! File decoding via Symphonia
//!
//! Every container and codec Symphonia's default registry knows is
//! accepted. Samples are kept planar with the file's own channel count;
//! nothing is downmixed or resampled.

use crate::error::DecodeError;
use quietcut_core::SampleBuffer;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode the default audio track of `path` into a planar buffer
pub fn decode_file(path: &Path) -> Result<SampleBuffer, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::FileNotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Probe(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut planes: Vec<Vec<f32>> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Stream(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!(error = e, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(DecodeError::Stream(e.to_string())),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if planes.is_empty() {
            planes = vec![Vec::new(); channels];
            if sample_rate.is_none() {
                sample_rate = Some(spec.rate);
            }
        } else if planes.len() != channels {
            return Err(DecodeError::ChannelChange {
                expected: planes.len(),
                found: channels,
            });
        }

        let mut buffer = AudioBuffer::<f32>::new(decoded.capacity() as u64, spec);
        decoded.convert(&mut buffer);

        for (index, plane) in planes.iter_mut().enumerate() {
            plane.extend_from_slice(buffer.chan(index));
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| {
        DecodeError::Stream("stream declares no sample rate".to_string())
    })?;
    if planes.is_empty() {
        // No packet decoded; report an empty mono buffer
        planes.push(Vec::new());
    }

    let buffer = SampleBuffer::new(planes, sample_rate)?;
    debug!(
        path = %path.display(),
        channels = buffer.channel_count(),
        frames = buffer.frames(),
        sample_rate,
        "Decoded input"
    );
    Ok(buffer)
}

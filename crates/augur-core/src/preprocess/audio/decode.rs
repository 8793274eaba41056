//! Audio decoding and rate conversion.
//!
//! WAV goes through hound; MP3 through symphonia. Both paths end in mono
//! f32 samples, which the caller resamples to the feature extractor's
//! 16 kHz target.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AugurError, AugurResult};

/// Decoded audio prior to resampling: interleaved samples plus stream
/// parameters.
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

/// Decode WAV or MP3 bytes into interleaved f32 samples.
pub fn decode_audio(bytes: &[u8]) -> AugurResult<DecodedAudio> {
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        decode_wav(bytes)
    } else {
        decode_mp3(bytes)
    }
}

fn decode_wav(bytes: &[u8]) -> AugurResult<DecodedAudio> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AugurError::preprocessing(format!("invalid or corrupt WAV file: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AugurError::preprocessing(format!("invalid WAV sample data: {e}")))?,
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_value = match 1i32.checked_shl(bits.saturating_sub(1) as u32) {
                Some(v) if bits > 0 && bits < 32 => v as f32,
                _ if bits == 32 => i32::MAX as f32 + 1.0,
                _ => {
                    return Err(AugurError::preprocessing(format!(
                        "unsupported WAV bit depth: {bits}"
                    )))
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect::<Result<_, _>>()
                .map_err(|e| AugurError::preprocessing(format!("invalid WAV sample data: {e}")))?
        }
    };

    if samples.is_empty() {
        return Err(AugurError::preprocessing("WAV file contains no samples"));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels as usize,
    })
}

fn decode_mp3(bytes: &[u8]) -> AugurResult<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    hint.mime_type("audio/mpeg");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AugurError::preprocessing(format!("invalid or corrupt audio file: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AugurError::preprocessing("audio file contains no decodable track"))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AugurError::preprocessing(format!("unsupported audio codec: {e}")))?;

    let mut samples = Vec::new();
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => {
                return Err(AugurError::preprocessing(format!(
                    "failed reading audio stream: {e}"
                )))
            }
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // A corrupt frame mid-stream is skippable; the surrounding
            // frames still carry the signal.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(AugurError::preprocessing(format!(
                    "failed decoding audio: {e}"
                )))
            }
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(AugurError::preprocessing(
            "audio file decoded to an empty signal",
        ));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Convert interleaved multi-channel samples to mono by averaging channels.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let num_frames = samples.len() / channels;
    let mut mono = Vec::with_capacity(num_frames);
    for i in 0..num_frames {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += samples.get(i * channels + ch).copied().unwrap_or(0.0);
        }
        mono.push(sum / channels as f32);
    }
    mono
}

/// Resample with linear interpolation.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> AugurResult<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AugurError::preprocessing(
            "audio sample rate must be greater than 0",
        ));
    }
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        if src_idx + 1 < samples.len() {
            output.push(samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac);
        } else if src_idx < samples.len() {
            output.push(samples[src_idx]);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for &s in samples {
                writer
                    .write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)
                    .unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.into_inner()
    }

    #[test]
    fn test_decode_wav_mono() {
        let samples: Vec<f32> = (0..1600)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let decoded = decode_audio(&wav_bytes(&samples, 16000, 1)).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 1600);
    }

    #[test]
    fn test_decode_wav_stereo_interleaved() {
        // L=0.5, R=-0.5 interleaved.
        let interleaved: Vec<f32> = (0..200)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let decoded = decode_audio(&wav_bytes(&interleaved, 44100, 2)).unwrap();
        assert_eq!(decoded.channels, 2);
        let mono = downmix_to_mono(&decoded.samples, decoded.channels);
        assert_eq!(mono.len(), 100);
        for &s in &mono {
            assert!(s.abs() < 0.001);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_audio(b"this is not audio at all, not even close");
        assert!(result.is_err());
    }

    #[test]
    fn test_downmix_passthrough_for_mono() {
        let samples = vec![0.1f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![0.0f32, 0.5, 1.0, 0.5, 0.0];
        let result = resample_linear(&samples, 16000, 16000).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn test_resample_downsample_length() {
        let samples: Vec<f32> = (0..44100).map(|i| i as f32 / 44100.0).collect();
        let result = resample_linear(&samples, 44100, 16000).unwrap();
        assert!((result.len() as i64 - 16000).abs() <= 1);
    }

    #[test]
    fn test_resample_zero_rate_rejected() {
        assert!(resample_linear(&[0.0; 10], 0, 16000).is_err());
        assert!(resample_linear(&[0.0; 10], 16000, 0).is_err());
    }
}

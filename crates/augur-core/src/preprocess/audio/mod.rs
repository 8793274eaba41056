//! Audio preprocessing.
//!
//! Decodes an uploaded WAV or MP3, normalizes it to mono 16 kHz, and
//! extracts 13 MFCCs across the full duration. Unlike the image path the
//! time axis is not fixed: output shape is (1, 13, T) with T proportional
//! to the input duration.

mod decode;
mod mel;
mod mfcc;
mod stft;

pub use decode::{decode_audio, downmix_to_mono, resample_linear, DecodedAudio};
pub use mfcc::{compute_mfcc, MfccConfig};

use ndarray::ArrayD;

use crate::error::AugurResult;

/// Sample rate every signal is normalized to before feature extraction.
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Decode `bytes` into a (1, 13, T) float32 MFCC tensor.
pub fn preprocess(bytes: &[u8]) -> AugurResult<ArrayD<f32>> {
    let decoded = decode_audio(bytes)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    let resampled = resample_linear(&mono, decoded.sample_rate, TARGET_SAMPLE_RATE)?;
    compute_mfcc(&resampled, &MfccConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sine_wav(freq: f32, seconds: f32, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let n = (seconds * sample_rate as f32) as usize;
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for i in 0..n {
                let s =
                    (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin();
                writer.write_sample((s * 0.8 * 32767.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.into_inner()
    }

    #[test]
    fn test_wav_yields_mfcc_tensor() {
        let tensor = preprocess(&sine_wav(440.0, 1.0, 16000)).unwrap();
        assert_eq!(tensor.shape()[0], 1);
        assert_eq!(tensor.shape()[1], 13);
        assert!(tensor.shape()[2] > 0);
    }

    #[test]
    fn test_source_rate_does_not_change_frame_count() {
        // Same logical duration at 44.1 kHz and 16 kHz must agree on T
        // within resampler rounding.
        let t_44k = preprocess(&sine_wav(440.0, 1.0, 44100)).unwrap().shape()[2];
        let t_16k = preprocess(&sine_wav(440.0, 1.0, 16000)).unwrap().shape()[2];
        assert!(
            (t_44k as i64 - t_16k as i64).abs() <= 1,
            "T at 44.1kHz = {t_44k}, T at 16kHz = {t_16k}"
        );
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let bytes = b"<html>not audio</html>".to_vec();
        let before = bytes.clone();
        assert!(preprocess(&bytes).is_err());
        assert_eq!(bytes, before);
    }
}

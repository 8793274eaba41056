//! MFCC feature extraction.
//!
//! Pipeline: reflect-padded STFT power spectrogram → Slaney mel filter bank
//! → power-to-dB with an 80 dB floor → orthonormal DCT-II → first
//! `n_mfcc` coefficients. The defaults replicate the reference extractor's
//! frame configuration; models are trained against these exact constants,
//! so changing any of them silently breaks numerical compatibility.

use ndarray::{ArrayD, IxDyn};

use super::{mel, stft};
use crate::error::{AugurError, AugurResult};

/// MFCC extraction parameters.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    /// Number of cepstral coefficients kept.
    pub n_mfcc: usize,
    /// Number of mel bands the DCT runs over.
    pub n_mels: usize,
    /// FFT window size in samples.
    pub n_fft: usize,
    /// Hop between STFT frames in samples.
    pub hop_length: usize,
    /// Sample rate the signal must already be at.
    pub sample_rate: u32,
    /// Lower edge of the mel filter bank (Hz).
    pub f_min: f64,
    /// Upper edge of the mel filter bank (Hz); Nyquist when 0.
    pub f_max: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            n_mfcc: 13,
            n_mels: 128,
            n_fft: 2048,
            hop_length: 512,
            sample_rate: 16000,
            f_min: 0.0,
            f_max: 0.0,
        }
    }
}

impl MfccConfig {
    /// Effective upper filter edge (Nyquist when `f_max` is unset).
    pub fn effective_f_max(&self) -> f64 {
        if self.f_max <= 0.0 {
            self.sample_rate as f64 / 2.0
        } else {
            self.f_max
        }
    }

    /// Padding applied to each side of the signal for centered frames.
    pub fn pad_size(&self) -> usize {
        self.n_fft / 2
    }
}

/// Compute MFCCs for a mono signal.
///
/// Returns a tensor of shape `(1, n_mfcc, frames)`. The frame count tracks
/// the input duration; it is not fixed.
pub fn compute_mfcc(samples: &[f32], config: &MfccConfig) -> AugurResult<ArrayD<f32>> {
    if samples.is_empty() {
        return Err(AugurError::preprocessing(
            "cannot extract features from empty audio",
        ));
    }

    let padded = stft::pad_reflect(samples, config.pad_size());
    let power = stft::stft_power(&padded, config.n_fft, config.hop_length);
    if power.is_empty() {
        return Err(AugurError::preprocessing(
            "audio too short to produce a feature frame",
        ));
    }

    let n_frames = power.len();
    let n_freqs = config.n_fft / 2 + 1;
    let filters = mel::create_filter_bank(
        config.n_mels,
        config.n_fft,
        config.sample_rate,
        config.f_min,
        config.effective_f_max(),
    );

    // Mel power spectrogram: filters x frames.
    let mut mel_spec = vec![vec![0.0f64; n_frames]; config.n_mels];
    for (frame_idx, frame_power) in power.iter().enumerate() {
        for mel_idx in 0..config.n_mels {
            let mut acc = 0.0;
            for freq_idx in 0..n_freqs {
                acc += filters[mel_idx][freq_idx] * frame_power[freq_idx];
            }
            mel_spec[mel_idx][frame_idx] = acc;
        }
    }

    power_to_db(&mut mel_spec);

    // Orthonormal DCT-II over the mel axis, truncated to n_mfcc rows.
    let basis = dct_basis(config.n_mfcc, config.n_mels);
    let mut mfcc_data = Vec::with_capacity(config.n_mfcc * n_frames);
    for coeffs in basis.iter() {
        for frame_idx in 0..n_frames {
            let mut acc = 0.0;
            for (mel_idx, &weight) in coeffs.iter().enumerate() {
                acc += weight * mel_spec[mel_idx][frame_idx];
            }
            mfcc_data.push(acc as f32);
        }
    }

    let shape = vec![1, config.n_mfcc, n_frames];
    ArrayD::from_shape_vec(IxDyn(&shape), mfcc_data)
        .map_err(|e| AugurError::internal(format!("failed to assemble MFCC tensor: {e}")))
}

/// In-place conversion of mel power to decibels, clamped to 80 dB below the
/// spectrogram maximum.
fn power_to_db(mel_spec: &mut [Vec<f64>]) {
    const AMIN: f64 = 1e-10;
    const TOP_DB: f64 = 80.0;

    for row in mel_spec.iter_mut() {
        for val in row.iter_mut() {
            *val = 10.0 * val.max(AMIN).log10();
        }
    }

    let max_db = mel_spec
        .iter()
        .flat_map(|row| row.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let floor = max_db - TOP_DB;

    for row in mel_spec.iter_mut() {
        for val in row.iter_mut() {
            *val = val.max(floor);
        }
    }
}

/// Orthonormal DCT-II basis, `n_mfcc` rows of `n_mels` weights.
fn dct_basis(n_mfcc: usize, n_mels: usize) -> Vec<Vec<f64>> {
    let n = n_mels as f64;
    (0..n_mfcc)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n).sqrt()
            } else {
                (2.0 / n).sqrt()
            };
            (0..n_mels)
                .map(|m| {
                    scale * (std::f64::consts::PI / n * (m as f64 + 0.5) * k as f64).cos()
                })
                .collect()
        })
        .collect()
}

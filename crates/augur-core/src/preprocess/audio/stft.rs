//! STFT building blocks: reflect padding, Hann windowing, power spectrogram.

use rustfft::{num_complex::Complex, FftPlanner};

/// Reflect-pad `samples` by `pad` on each side (mirror without repeating the
/// edge sample), matching centered-frame feature extractors.
pub fn pad_reflect(samples: &[f32], pad: usize) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return vec![0.0f32; pad * 2];
    }

    let mut padded = vec![0.0f32; pad + n + pad];
    padded[pad..pad + n].copy_from_slice(samples);

    if n > 1 {
        let w = (n - 1) as i32;
        for i in 1..=pad {
            padded[pad - i] = samples[reflect_offset(i as i32, w)];
            padded[pad + n - 1 + i] = samples[reflect_offset(w - i as i32, w)];
        }
    } else {
        for i in 0..pad {
            padded[i] = samples[0];
            padded[pad + 1 + i] = samples[0];
        }
    }

    padded
}

fn reflect_offset(i: i32, w: i32) -> usize {
    ((i + w) % (2 * w) - w).unsigned_abs() as usize
}

/// Periodic Hann window, the STFT variant (as opposed to the symmetric
/// filter-design variant).
pub fn hann_window(size: usize) -> Vec<f64> {
    let factor = 2.0 * std::f64::consts::PI / size as f64;
    (0..size)
        .map(|i| 0.5 - 0.5 * (i as f64 * factor).cos())
        .collect()
}

/// Compute the STFT power spectrogram.
///
/// Returns one `n_fft/2 + 1`-bin power frame per hop. The caller pads the
/// signal beforehand; frames that would run past the end are dropped.
pub fn stft_power(samples: &[f32], n_fft: usize, hop_length: usize) -> Vec<Vec<f64>> {
    let window = hann_window(n_fft);
    let n_freqs = n_fft / 2 + 1;

    let n_frames = samples.len().saturating_sub(n_fft) / hop_length + 1;
    if samples.len() < n_fft {
        return vec![];
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let mut power = Vec::with_capacity(n_frames);
    for frame_idx in 0..n_frames {
        let start = frame_idx * hop_length;
        let end = start + n_fft;
        if end > samples.len() {
            break;
        }

        let mut buf: Vec<Complex<f64>> = (0..n_fft)
            .map(|i| Complex::new(samples[start + i] as f64 * window[i], 0.0))
            .collect();
        fft.process(&mut buf);

        power.push(buf[..n_freqs].iter().map(|c| c.norm_sqr()).collect());
    }

    power
}

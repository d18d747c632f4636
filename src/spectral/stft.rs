//! Short-time Fourier transform
//!
//! Computes Hann-windowed magnitude spectrograms with `rustfft`.

use crate::error::TranscribeError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitude spectrogram with its frequency axis
///
/// Frames are stored time-major: `frames[t][b]` is the magnitude of
/// frequency bin `b` at frame `t`. Only the non-negative frequency bins
/// (`frame_size / 2 + 1`) are kept.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Magnitude frames (n_frames x n_bins)
    pub frames: Vec<Vec<f32>>,

    /// Center frequency of each bin in Hz
    pub bin_frequencies: Vec<f32>,

    /// Sample rate of the source signal in Hz
    pub sample_rate: u32,

    /// FFT frame size in samples
    pub frame_size: usize,

    /// Hop size between frames in samples
    pub hop_size: usize,
}

impl Spectrogram {
    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.bin_frequencies.len()
    }

    /// Frames per second
    pub fn frame_rate(&self) -> f32 {
        self.sample_rate as f32 / self.hop_size as f32
    }

    /// Time of a frame index in seconds
    pub fn frame_time(&self, frame: usize) -> f32 {
        frame as f32 * self.hop_size as f32 / self.sample_rate as f32
    }
}

/// Compute a Hann-windowed magnitude spectrogram
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size (typically 2048)
/// * `hop_size` - Hop between frames (typically 512)
///
/// # Returns
///
/// A [`Spectrogram`]. A signal shorter than one frame yields a spectrogram
/// with zero frames; downstream stages treat that as degenerate analysis
/// rather than an error.
///
/// # Errors
///
/// Returns `TranscribeError::InvalidInput` if `frame_size` or `hop_size`
/// is zero, or `sample_rate` is zero.
pub fn stft(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, TranscribeError> {
    if frame_size == 0 {
        return Err(TranscribeError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(TranscribeError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(TranscribeError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    let n_bins = frame_size / 2 + 1;
    let bin_frequencies: Vec<f32> = (0..n_bins)
        .map(|i| i as f32 * sample_rate as f32 / frame_size as f32)
        .collect();

    if samples.len() < frame_size {
        log::warn!(
            "Signal ({} samples) shorter than frame size ({}), returning empty spectrogram",
            samples.len(),
            frame_size
        );
        return Ok(Spectrogram {
            frames: Vec::new(),
            bin_frequencies,
            sample_rate,
            frame_size,
            hop_size,
        });
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;

    log::debug!(
        "Computing STFT: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        num_frames
    );

    // Hann window
    let window: Vec<f32> = (0..frame_size)
        .map(|i| {
            0.5 * (1.0
                - (2.0 * std::f32::consts::PI * i as f32 / (frame_size - 1) as f32).cos())
        })
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;

        let mut buffer: Vec<Complex<f32>> = samples[start..start + frame_size]
            .iter()
            .zip(window.iter())
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();

        fft.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..n_bins].iter().map(|c| c.norm()).collect();
        frames.push(magnitudes);
    }

    Ok(Spectrogram {
        frames,
        bin_frequencies,
        sample_rate,
        frame_size,
        hop_size,
    })
}

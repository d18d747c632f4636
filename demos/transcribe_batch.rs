//! Demo: transcribe every WAV file in a directory, in parallel
//!
//! Throughput across clips comes from running independent pipeline
//! instances side by side; the pipeline itself stays single-threaded.
//!
//! Usage: cargo run --example transcribe_batch -- path/to/dir

use rayon::prelude::*;
use strudel_dsp::{transcribe_audio, TranscriptionConfig};

fn load_wav(path: &std::path::Path) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dir = match std::env::args().nth(1) {
        Some(d) => d,
        None => {
            eprintln!("Usage: transcribe_batch <directory>");
            std::process::exit(1);
        }
    };

    let files: Vec<std::path::PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|e| e == "wav").unwrap_or(false))
        .collect();

    println!("Processing {} files...", files.len());

    files.par_iter().for_each(|path| {
        let config = TranscriptionConfig::default();
        match load_wav(path).and_then(|(samples, sample_rate)| {
            transcribe_audio(&samples, sample_rate, config).map_err(Into::into)
        }) {
            Ok(result) => {
                println!(
                    "{}: {:.0} BPM, {} {}, {} code lines",
                    path.display(),
                    result.tempo.bpm,
                    result.key.root_name(),
                    result.key.mode_name(),
                    result.code.lines().count()
                );
            }
            Err(e) => {
                eprintln!("{}: error: {}", path.display(), e);
            }
        }
    });

    Ok(())
}

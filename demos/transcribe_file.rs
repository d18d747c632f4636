//! Demo: transcribe a single WAV file
//!
//! Usage: cargo run --example transcribe_file -- path/to/audio.wav [--json]

use strudel_dsp::{transcribe_audio, TranscriptionConfig};

/// Load a WAV file and return (mono samples, sample rate)
fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
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

    // Average down to mono if needed
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

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1) {
        Some(p) => p,
        None => {
            eprintln!("Usage: transcribe_file <audio.wav> [--json]");
            std::process::exit(1);
        }
    };
    let as_json = args.iter().any(|a| a == "--json");

    let (samples, sample_rate) = load_wav(path)?;
    let result = transcribe_audio(&samples, sample_rate, TranscriptionConfig::default())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "// {} | {:.0} BPM | {} {} | {:.1}s | {:.0} ms",
            path,
            result.tempo.bpm,
            result.key.root_name(),
            result.key.mode_name(),
            result.metadata.duration_seconds,
            result.metadata.processing_time_ms
        );
        println!();
        println!("{}", result.code);
    }

    Ok(())
}

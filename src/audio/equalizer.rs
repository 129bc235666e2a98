//! Three-band equalizer: low-pass, band-pass and high-pass copies of the
//! whole track, each gain-adjusted and summed back into one buffer. The
//! result is rendered offline and only audible on the next play.

use anyhow::{anyhow, Context, Result};
use biquad::{Biquad, Coefficients, DirectForm1, ToHertz, Type, Q_BUTTERWORTH_F32};
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Fixed crossover between the bass and mid bands.
pub const BASS_CUTOFF_HZ: f32 = 250.0;
/// Fixed crossover between the mid and treble bands.
pub const TREBLE_CUTOFF_HZ: f32 = 4000.0;
/// Slider range for each band, in dB.
pub const GAIN_LIMIT_DB: f32 = 10.0;

/// Per-band gains in dB, clamped to the slider range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EqSettings {
    pub bass_db: f32,
    pub mid_db: f32,
    pub treble_db: f32,
}

impl EqSettings {
    pub fn new(bass_db: f32, mid_db: f32, treble_db: f32) -> Self {
        Self {
            bass_db: bass_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
            mid_db: mid_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
            treble_db: treble_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.bass_db == 0.0 && self.mid_db == 0.0 && self.treble_db == 0.0
    }
}

/// Fully rendered audio held in memory until the next play exports it.
#[derive(Debug, Clone)]
pub struct EqualizedAudio {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Decode `path` completely and run it through the three bands.
pub fn render(path: &Path, settings: &EqSettings) -> Result<EqualizedAudio> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open audio file '{}'", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to decode audio file '{}'", path.display()))?;

    let channels = source.channels();
    let sample_rate = source.sample_rate();
    let samples: Vec<f32> = source.convert_samples().collect();

    let processed = process(&samples, channels, sample_rate, settings)?;
    info!(
        "Rendered equalized audio for {} ({} samples, bass {:+.0} dB, mid {:+.0} dB, treble {:+.0} dB)",
        path.display(),
        processed.len(),
        settings.bass_db,
        settings.mid_db,
        settings.treble_db
    );

    Ok(EqualizedAudio {
        channels,
        sample_rate,
        samples: processed,
    })
}

/// Write the rendered buffer to a uniquely named WAV file. The handle owns
/// the file; dropping it (for example when the next render replaces it)
/// removes the file again.
pub fn export(audio: &EqualizedAudio) -> Result<NamedTempFile> {
    let tmp = tempfile::Builder::new()
        .prefix("aulos-eq-")
        .suffix(".wav")
        .tempfile()
        .context("Failed to create equalizer export file")?;

    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(tmp.path(), spec)
        .context("Failed to open equalizer export for writing")?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!("Exported equalized audio to {}", tmp.path().display());
    Ok(tmp)
}

fn band_filters(
    filter: Type<f32>,
    sample_rate: f32,
    frequency: f32,
    q: f32,
    channels: usize,
) -> Result<Vec<DirectForm1<f32>>> {
    let coeffs = Coefficients::<f32>::from_params(filter, sample_rate.hz(), frequency.hz(), q)
        .map_err(|e| anyhow!("Filter coefficients rejected at {} Hz: {:?}", frequency, e))?;
    Ok((0..channels).map(|_| DirectForm1::<f32>::new(coeffs)).collect())
}

fn process(samples: &[f32], channels: u16, sample_rate: u32, settings: &EqSettings) -> Result<Vec<f32>> {
    let channels = channels.max(1) as usize;
    let fs = sample_rate as f32;

    // Band-pass centered geometrically between the two crossovers, with Q
    // set from the bandwidth.
    let mid_center = (BASS_CUTOFF_HZ * TREBLE_CUTOFF_HZ).sqrt();
    let mid_q = mid_center / (TREBLE_CUTOFF_HZ - BASS_CUTOFF_HZ);

    let mut low = band_filters(Type::LowPass, fs, BASS_CUTOFF_HZ, Q_BUTTERWORTH_F32, channels)?;
    let mut mid = band_filters(Type::BandPass, fs, mid_center, mid_q, channels)?;
    let mut high = band_filters(Type::HighPass, fs, TREBLE_CUTOFF_HZ, Q_BUTTERWORTH_F32, channels)?;

    let bass_gain = db_to_linear(settings.bass_db);
    let mid_gain = db_to_linear(settings.mid_db);
    let treble_gain = db_to_linear(settings.treble_db);

    let mut out = Vec::with_capacity(samples.len());
    for (i, &sample) in samples.iter().enumerate() {
        let ch = i % channels;
        let l = low[ch].run(sample) * bass_gain;
        let m = mid[ch].run(sample) * mid_gain;
        let h = high[ch].run(sample) * treble_gain;
        out.push(l + m + h);
    }
    Ok(out)
}

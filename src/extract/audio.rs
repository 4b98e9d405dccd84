use std::path::Path;

use crate::error::{AppError, AppResult};

/// Sample rate the speech engine expects.
pub const ENGINE_SAMPLE_RATE: u32 = 16_000;

/// Read a WAV file into mono f32 samples at the engine's sample rate.
///
/// Int samples are scaled to [-1, 1]; stereo is downmixed by averaging.
/// Files at any other sample rate are rejected so a mis-prepared corpus
/// surfaces as a per-file error instead of silently skewing every score.
pub fn load_wav_mono(path: &Path) -> AppResult<Vec<f32>> {
    let mut reader =
        hound::WavReader::open(path).map_err(|error| AppError::Audio(error.to_string()))?;
    let spec = reader.spec();

    if spec.sample_rate != ENGINE_SAMPLE_RATE {
        return Err(AppError::Audio(format!(
            "expected {ENGINE_SAMPLE_RATE} Hz audio, got {} Hz",
            spec.sample_rate
        )));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|sample| sample.map(|value| f32::from(value) / 32768.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| AppError::Audio(error.to_string()))?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| AppError::Audio(error.to_string()))?,
    };

    if spec.channels == 0 {
        return Err(AppError::Audio("zero channels".to_owned()));
    }

    let channels = spec.channels as usize;
    if channels == 1 {
        return Ok(samples);
    }

    Ok(samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{load_wav_mono, ENGINE_SAMPLE_RATE};
    use crate::error::AppError;
    use std::path::Path;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for sample in samples {
            writer.write_sample(*sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn mono_int_samples_are_scaled() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("mono.wav");
        write_wav(&path, ENGINE_SAMPLE_RATE, 1, &[0, 16384, -16384]);

        let samples = load_wav_mono(&path).expect("load");
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.0).abs() < 1e-6);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn stereo_downmixes_by_averaging() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("stereo.wav");
        write_wav(&path, ENGINE_SAMPLE_RATE, 2, &[16384, 0, -16384, -16384]);

        let samples = load_wav_mono(&path).expect("load");
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.25).abs() < 1e-6);
        assert!((samples[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrong_sample_rate_is_rejected() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("441.wav");
        write_wav(&path, 44_100, 1, &[0]);

        let error = load_wav_mono(&path).expect_err("must fail");
        assert!(matches!(error, AppError::Audio(message) if message.contains("44100")));
    }

    #[test]
    fn unreadable_file_is_an_audio_error() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("not-audio.wav");
        std::fs::write(&path, b"definitely not a wav").expect("write");

        let error = load_wav_mono(&path).expect_err("must fail");
        assert!(matches!(error, AppError::Audio(_)));
    }
}

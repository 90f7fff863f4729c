//! Integration tests for ignition-io WAV I/O and offline rendering.

use ignition_effects::{Algorithm, ChainParams};
use ignition_io::{
    AudioBuffer, Error, ProcessingEngine, WavFormat, WavSpec, read_wav, read_wav_info, write_wav,
};
use tempfile::NamedTempFile;

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn stereo(sample_rate: u32, frames: usize) -> AudioBuffer {
    AudioBuffer::from_channels(vec![
        sine_wave(sample_rate, 440.0, frames),
        sine_wave(sample_rate, 660.0, frames)
            .into_iter()
            .map(|s| s * 0.5)
            .collect(),
    ])
    .unwrap()
}

#[test]
fn wav_roundtrip_stereo_f32() {
    let sr = 48000;
    let buffer = stereo(sr, 4800);
    let spec = WavSpec {
        channels: 2,
        sample_rate: sr,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &buffer, spec).unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    assert_eq!(loaded, buffer);
}

#[test]
fn wav_roundtrip_16bit_within_quantization() {
    let sr = 44100;
    let buffer = stereo(sr, 2048);
    let spec = WavSpec {
        channels: 2,
        sample_rate: sr,
        bits_per_sample: 16,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &buffer, spec).unwrap();
    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();

    assert_eq!(loaded_spec.bits_per_sample, 16);
    assert_eq!(loaded.channel_count(), 2);
    for (a, b) in buffer.channels().iter().flatten().zip(loaded.channels().iter().flatten()) {
        assert!((a - b).abs() < 1.0 / 16384.0, "{a} vs {b}");
    }
}

#[test]
fn wav_roundtrip_24bit_multichannel() {
    let sr = 48000;
    let planes: Vec<Vec<f32>> = (0..5)
        .map(|ch| {
            sine_wave(sr, 100.0 * (ch + 1) as f32, 512)
                .into_iter()
                .map(|s| s * 0.8)
                .collect()
        })
        .collect();
    let buffer = AudioBuffer::from_channels(planes).unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 24,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &buffer, spec).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 5);
    assert_eq!(info.num_frames, 512);
    assert_eq!(info.format, WavFormat::Pcm);

    let (loaded, _) = read_wav(file.path()).unwrap();
    assert_eq!(loaded.channel_count(), 5);
    for (a, b) in buffer.channels().iter().flatten().zip(loaded.channels().iter().flatten()) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }
}

#[test]
fn integer_output_clamps_overs() {
    let buffer = AudioBuffer::from_channels(vec![vec![2.0, -2.0, 0.0]]).unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
    };
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &buffer, spec).unwrap();
    let (loaded, _) = read_wav(file.path()).unwrap();
    let samples = loaded.channel(0).unwrap();
    assert!(samples[0] < 1.0 && samples[0] > 0.999);
    assert_eq!(samples[1], -1.0);
    assert_eq!(samples[2], 0.0);
}

#[test]
fn unsupported_bit_depth_rejected() {
    let buffer = AudioBuffer::silence(1, 16).unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 12,
    };
    let file = NamedTempFile::new().unwrap();
    assert!(matches!(
        write_wav(file.path(), &buffer, spec),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_is_wav_error() {
    assert!(matches!(
        read_wav("/nonexistent/ignition/input.wav"),
        Err(Error::Wav(_))
    ));
}

#[test]
fn render_file_through_chain() {
    let sr = 48000;
    let input = stereo(sr, 9600);
    let file_in = NamedTempFile::new().unwrap();
    let file_out = NamedTempFile::new().unwrap();
    write_wav(file_in.path(), &input, WavSpec::default()).unwrap();

    let (mut buffer, spec) = read_wav(file_in.path()).unwrap();
    let params = ChainParams {
        drive: 12.0,
        algorithm: Algorithm::HardClip,
        ..ChainParams::default()
    };
    let mut engine =
        ProcessingEngine::new(spec.sample_rate as f32, buffer.channel_count(), 256).unwrap();
    engine.process_buffer(&params, &mut buffer, |_| {}).unwrap();
    write_wav(file_out.path(), &buffer, spec).unwrap();

    let (output, out_spec) = read_wav(file_out.path()).unwrap();
    assert_eq!(out_spec.channels, 2);
    assert_eq!(output.frames(), input.frames());
    assert!(output.peak() <= 1.0);
    assert!(output.rms() > input.rms());
    assert_eq!(engine.visualizer().envelope_history().len(), 9600 / 255);
}

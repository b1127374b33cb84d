//! Audio device integration using rodio
//!
//! Plays sound assets and synthesized tones on the default output device.
//! Each call appends to a single sink and waits for it to drain, so only
//! one cue is ever sounding.

use super::AudioSink;
use crate::cues::Tone;
use crate::synth::ToneBuffer;
use crate::{Result, TossCueError};
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Encoded asset bytes, decoded again for every playback
#[derive(Clone)]
pub struct RodioSound {
    path: PathBuf,
    data: Arc<[u8]>,
}

impl RodioSound {
    fn decoder(&self) -> std::result::Result<Decoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError> {
        Decoder::new(Cursor::new(Arc::clone(&self.data)))
    }
}

/// Audio playback device using rodio
pub struct RodioDevice {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl RodioDevice {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| TossCueError::AudioDevice(format!("Failed to create audio stream: {}", e)))?;

        let sink = Sink::try_new(&handle)
            .map_err(|e| TossCueError::AudioDevice(format!("Failed to create audio sink: {}", e)))?;

        Ok(RodioDevice {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    /// Stop anything still queued
    pub fn shutdown(&self) {
        self.sink.stop();
    }
}

impl AudioSink for RodioDevice {
    type Sound = RodioSound;

    fn load_sound(&mut self, path: &Path) -> Result<RodioSound> {
        let data = std::fs::read(path).map_err(|e| TossCueError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let sound = RodioSound {
            path: path.to_path_buf(),
            data: Arc::from(data),
        };
        // Decode once up front so broken files fail at load time
        sound.decoder().map_err(|e| TossCueError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(sound)
    }

    fn play_sound(&mut self, sound: &RodioSound) -> Result<Duration> {
        let decoder = sound.decoder().map_err(|e| {
            TossCueError::AssetPlayback(format!("{}: {}", sound.path.display(), e))
        })?;
        let expected = decoder.total_duration();

        let started = Instant::now();
        self.sink.append(decoder);
        self.sink.sleep_until_end();
        Ok(expected.unwrap_or_else(|| started.elapsed()))
    }

    fn play_tone(&mut self, _tone: &Tone, buffer: &ToneBuffer) -> Result<()> {
        let source = SamplesBuffer::new(buffer.channels, buffer.sample_rate, buffer.samples.clone());
        self.sink.append(source);
        self.sink.sleep_until_end();
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::ToneSynth;

    fn try_device() -> Option<RodioDevice> {
        match RodioDevice::new() {
            Ok(device) => Some(device),
            Err(err) => {
                eprintln!(
                    "Skipping playback::rodio_device test (audio backend unavailable): {}",
                    err
                );
                None
            }
        }
    }

    #[test]
    fn test_missing_asset_load_fails() {
        let Some(mut device) = try_device() else {
            return;
        };
        let err = device
            .load_sound(Path::new("/definitely/not/here.wav"))
            .unwrap_err();
        assert!(matches!(err, TossCueError::AssetLoad { .. }));
    }

    #[test]
    fn test_short_tone_plays() {
        let Some(mut device) = try_device() else {
            return;
        };
        let tone = Tone::new(440, 20, 0);
        let buffer = ToneSynth::default().synthesize(440, 20);
        assert!(device.play_tone(&tone, &buffer).is_ok());
    }
}

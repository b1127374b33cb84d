//! WAV export of fallback cues
//!
//! Writes the synthesized sequences to disk under their asset names so an
//! operator has editable starting files for every cue.

use super::ToneSynth;
use crate::cues::{CueLibrary, ToneSequence};
use crate::Result;
use std::path::{Path, PathBuf};

/// Write one sequence as a 16-bit PCM WAV file
pub fn write_sequence_wav(synth: &ToneSynth, sequence: &ToneSequence, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: synth.channels(),
        sample_rate: synth.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
    for sample in synth.render_sequence(sequence).samples {
        writer
            .write_sample(sample)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }
    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize '{}': {}", path.display(), e))?;
    Ok(())
}

/// Render every cue of `library` into `dir`, returning the written paths.
///
/// Existing files are left alone unless `overwrite` is set.
pub fn render_default_cues(
    synth: &ToneSynth,
    library: &CueLibrary,
    dir: &Path,
    overwrite: bool,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for entry in library.entries() {
        let path = dir.join(entry.asset);
        if path.exists() && !overwrite {
            tracing::info!(path = %path.display(), "asset exists, skipping");
            continue;
        }
        write_sequence_wav(synth, &ToneSequence::from(entry.tones), &path)?;
        tracing::info!(path = %path.display(), "rendered cue");
        written.push(path);
    }
    Ok(written)
}

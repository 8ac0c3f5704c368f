use crate::error::{RadioError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Audio capability used by the tuner.
///
/// Implemented by [`Player`] for real output; tests substitute a recorder.
pub trait AudioOutput {
    /// Stop the looping station track. No-op when nothing is playing.
    fn stop(&mut self);

    /// Play a file once on its own sink, overlapping whatever is playing.
    fn play_once(&mut self, path: &Path) -> Result<()>;

    /// Play a file looping forever, starting `offset` into the track.
    fn play_looped(&mut self, path: &Path, offset: Duration) -> Result<()>;
}

/// Runtime audio player wrapping rodio. Created fresh per session.
pub struct Player {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    station: Option<Sink>,
    effect: Option<Sink>,
}

impl Player {
    /// Initialize audio output on the default device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| RadioError::Audio(format!("Failed to open audio output: {}", e)))?;
        Ok(Player {
            _stream: stream,
            stream_handle: handle,
            station: None,
            effect: None,
        })
    }

    /// Create a new independent sink on the same audio output.
    fn create_sink(&self) -> Result<Sink> {
        Sink::try_new(&self.stream_handle)
            .map_err(|e| RadioError::Audio(format!("Failed to create sink: {}", e)))
    }

    /// True while a station track is queued.
    pub fn is_playing(&self) -> bool {
        self.station.as_ref().is_some_and(|s| !s.empty())
    }
}

impl AudioOutput for Player {
    fn stop(&mut self) {
        if let Some(sink) = self.station.take() {
            sink.stop();
        }
    }

    fn play_once(&mut self, path: &Path) -> Result<()> {
        let file = open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| RadioError::Audio(format!("Cannot decode '{}': {}", path.display(), e)))?;
        let sink = self.create_sink()?;
        sink.append(source);
        sink.play();
        // Dropping the previous effect sink cuts any burst still playing.
        self.effect = Some(sink);
        Ok(())
    }

    fn play_looped(&mut self, path: &Path, offset: Duration) -> Result<()> {
        let file = open(path)?;
        let mut source = Decoder::new_looped(BufReader::new(file))
            .map_err(|e| RadioError::Audio(format!("Cannot decode '{}': {}", path.display(), e)))?;
        let sink = self.create_sink()?;

        if offset.is_zero() || source.try_seek(offset).is_ok() {
            sink.append(source);
        } else {
            debug!(path = %path.display(), "decoder cannot seek, skipping samples");
            sink.append(source.skip_duration(offset));
        }
        sink.play();

        if let Some(old) = self.station.replace(sink) {
            old.stop();
        }
        Ok(())
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| RadioError::Audio(format!("Cannot open '{}': {}", path.display(), e)))
}

//! Station catalog built from the `Audios/<Game>/<Station>/<file>.wav` tree.

use crate::error::{RadioError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Extensions accepted as station audio.
const AUDIO_EXTENSIONS: &[&str] = &["wav"];

/// Audio resource backing a single station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEntry {
    pub path: PathBuf,
    pub duration: Duration,
}

impl StationEntry {
    /// Create an entry by reading the audio header of `path`.
    ///
    /// The duration is the exact frame count over the sample rate, not
    /// rounded to milliseconds.
    pub fn from_path(path: &Path) -> Result<Self> {
        let unreadable = |source: Box<dyn std::error::Error + Send + Sync>| {
            RadioError::UnreadableAudio {
                path: path.to_path_buf(),
                source,
            }
        };

        lofty::read_from_path(path).map_err(|e| unreadable(e.into()))?;

        let reader = hound::WavReader::open(path).map_err(|e| unreadable(e.into()))?;
        let rate = reader.spec().sample_rate;
        let frames = reader.duration();
        if rate == 0 || frames == 0 {
            return Err(RadioError::EmptyAudio(path.to_path_buf()));
        }
        let duration = Duration::from_secs_f64(frames as f64 / rate as f64);
        if duration.is_zero() {
            return Err(RadioError::EmptyAudio(path.to_path_buf()));
        }

        Ok(StationEntry {
            path: path.to_path_buf(),
            duration,
        })
    }

    /// Format duration as MM:SS.
    pub fn duration_display(&self) -> String {
        let secs = self.duration.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub entry: StationEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub name: String,
    pub stations: Vec<Station>,
}

impl Game {
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name.as_str()).collect()
    }
}

/// How games and stations are ordered in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrder {
    /// Whatever order the directory listing yields.
    #[default]
    Discovery,
    /// Case-insensitive by folder name.
    Alphabetical,
}

/// Read-only catalog of every game and its stations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    /// Scan `root` and build the catalog. Any malformed station aborts the
    /// whole load.
    pub fn load(root: &Path, order: ListingOrder) -> Result<Self> {
        if !root.is_dir() {
            return Err(RadioError::MissingDirectory(root.to_path_buf()));
        }

        let mut games = Vec::new();
        for (game_name, game_path) in subdirectories(root, order)? {
            let mut stations = Vec::new();
            for (station_name, station_path) in subdirectories(&game_path, order)? {
                let entry = load_station(&station_path)?;
                debug!(
                    game = %game_name,
                    station = %station_name,
                    duration = %entry.duration_display(),
                    "station loaded"
                );
                stations.push(Station {
                    name: station_name,
                    entry,
                });
            }
            games.push(Game {
                name: game_name,
                stations,
            });
        }

        Ok(Catalog { games })
    }

    /// Build a catalog directly from games (used by tests and tools).
    pub fn from_games(games: Vec<Game>) -> Self {
        Catalog { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, index: usize) -> Option<&Game> {
        self.games.get(index)
    }

    pub fn game_names(&self) -> Vec<&str> {
        self.games.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn find_game(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.name == name)
    }

    /// Look up the audio entry for a (game, station) pair.
    pub fn get(&self, game: &str, station: &str) -> Option<&StationEntry> {
        self.find_game(game)?
            .stations
            .iter()
            .find(|s| s.name == station)
            .map(|s| &s.entry)
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Total number of stations across all games.
    pub fn station_count(&self) -> usize {
        self.games.iter().map(|g| g.stations.len()).sum()
    }
}

/// Named subdirectories of `dir`. Plain files are skipped.
fn subdirectories(dir: &Path, order: ListingOrder) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };
        dirs.push((name, path));
    }
    if order == ListingOrder::Alphabetical {
        dirs.sort_by_key(|(name, _)| name.to_lowercase());
    }
    Ok(dirs)
}

/// Validate a station folder and read its single audio file.
fn load_station(station_path: &Path) -> Result<StationEntry> {
    let mut audio = Vec::new();
    for entry in fs::read_dir(station_path)? {
        let path = entry?.path();
        if path.is_file() && is_audio_file(&path) {
            audio.push(path);
        }
    }

    if audio.len() != 1 {
        return Err(RadioError::InvalidStation {
            path: station_path.to_path_buf(),
            found: audio.len(),
        });
    }

    StationEntry::from_path(&audio[0])
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

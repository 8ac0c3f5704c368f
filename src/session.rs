use crate::clock::now_epoch_secs;
use crate::error::{RadioError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default file name of the persisted session, relative to the program.
pub const STATE_FILE: &str = "state.json";

/// A (game, station) pair, either of which may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub game: Option<String>,
    pub station: Option<String>,
}

impl Selection {
    pub fn new(game: impl Into<String>, station: impl Into<String>) -> Self {
        Selection {
            game: Some(game.into()),
            station: Some(station.into()),
        }
    }

    /// Both halves, when both are set.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.game, &self.station) {
            (Some(g), Some(s)) => Some((g.as_str(), s.as_str())),
            _ => None,
        }
    }
}

/// Persisted session record.
///
/// `global_start` is the broadcast epoch: written once on the very first run
/// and never changed afterwards. `last` is the most recently tuned station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub global_start: f64,
    #[serde(default)]
    pub last: Selection,
}

impl SessionState {
    /// Fresh state with the epoch set to now.
    pub fn new() -> Self {
        SessionState {
            global_start: now_epoch_secs(),
            last: Selection::default(),
        }
    }

    /// Load state from `path`, or create and immediately persist a fresh one
    /// if the file does not exist. A file that exists but does not parse is an
    /// error; it is never silently replaced.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read(path)?;
            return serde_json::from_slice(&data).map_err(|source| RadioError::CorruptState {
                path: path.to_path_buf(),
                source,
            });
        }

        let state = SessionState::new();
        state.save(path)?;
        info!(path = %path.display(), global_start = state.global_start, "created session state");
        Ok(state)
    }

    /// Persist state as pretty-printed JSON.
    ///
    /// Writes to a temporary file next to `path` and renames it into place,
    /// so an interrupted write leaves the previous file intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RadioError::Io(std::io::Error::other(e)))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| RadioError::Io(e.error))?;
        Ok(())
    }

    /// Record `selection` as the last-tuned station.
    pub fn remember(&mut self, selection: &Selection) {
        self.last = selection.clone();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_creates_file_with_current_epoch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(STATE_FILE);
        let before = now_epoch_secs();

        let state = SessionState::load_or_init(&path).unwrap();

        assert!(path.exists());
        assert!(state.global_start >= before - 1.0);
        assert!(state.global_start <= now_epoch_secs() + 1.0);
        assert_eq!(state.last, Selection::default());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk["last"]["game"].is_null());
        assert!(on_disk["last"]["station"].is_null());
    }

    #[test]
    fn existing_state_is_loaded_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(STATE_FILE);
        fs::write(
            &path,
            r#"{"global_start": 1600000000.5, "last": {"game": "GTA", "station": "Flash"}}"#,
        )
        .unwrap();

        let state = SessionState::load_or_init(&path).unwrap();
        assert_eq!(state.global_start, 1600000000.5);
        assert_eq!(state.last.pair(), Some(("GTA", "Flash")));
    }

    #[test]
    fn epoch_survives_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(STATE_FILE);

        let mut state = SessionState::load_or_init(&path).unwrap();
        let epoch = state.global_start;
        state.remember(&Selection::new("Game", "Station"));
        state.save(&path).unwrap();

        let reloaded = SessionState::load_or_init(&path).unwrap();
        assert_eq!(reloaded.global_start, epoch);
        assert_eq!(reloaded.last.pair(), Some(("Game", "Station")));
    }

    #[test]
    fn corrupt_file_is_an_error_and_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(STATE_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = SessionState::load_or_init(&path).unwrap_err();
        assert!(matches!(err, RadioError::CorruptState { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_utf8_file_is_corrupt_state() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(STATE_FILE);
        fs::write(&path, [0xff, 0xfe, b'{', 0x80]).unwrap();

        let err = SessionState::load_or_init(&path).unwrap_err();
        assert!(matches!(err, RadioError::CorruptState { .. }));
    }

    #[test]
    fn missing_last_defaults_to_nulls() {
        let json = r#"{"global_start": 12.0}"#;
        let state: SessionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.last, Selection::default());
    }

    #[test]
    fn save_creates_parent_dirs_and_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join(STATE_FILE);

        SessionState::new().save(&path).unwrap();

        let files: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .map(|e| e.file_name())
            .collect();
        assert_eq!(files, vec![std::ffi::OsString::from(STATE_FILE)]);
    }

    #[test]
    fn selection_pair_requires_both_halves() {
        let half = Selection {
            game: Some("Game".into()),
            station: None,
        };
        assert!(half.pair().is_none());
        assert!(Selection::default().pair().is_none());
    }
}

//! RadioApp: top-level owner of the catalog, session and tuner.
//!
//! The menu and the binary drive the radio exclusively through this type;
//! there is no ambient global state.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{RadioError, Result};
use crate::player::AudioOutput;
use crate::session::{Selection, SessionState};
use crate::tuner::Tuner;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub struct RadioApp<O: AudioOutput> {
    catalog: Catalog,
    session: SessionState,
    state_path: PathBuf,
    tuner: Tuner<O>,
}

impl<O: AudioOutput> RadioApp<O> {
    pub fn new(
        catalog: Catalog,
        session: SessionState,
        state_path: impl Into<PathBuf>,
        tuner: Tuner<O>,
    ) -> Self {
        RadioApp {
            catalog,
            session,
            state_path: state_path.into(),
            tuner,
        }
    }

    /// Load session state and the station catalog as described by `config`.
    ///
    /// The session is loaded first so the broadcast epoch is fixed on the very
    /// first launch even if the catalog then fails to load.
    pub fn open(config: &Config, output: O) -> Result<Self> {
        let session = SessionState::load_or_init(&config.state_file)?;
        let catalog = Catalog::load(&config.audio_dir, config.listing_order)?;
        info!(
            games = catalog.len(),
            stations = catalog.station_count(),
            "catalog loaded"
        );
        let tuner = Tuner::from_config(output, config);
        Ok(Self::new(catalog, session, &config.state_file, tuner))
    }

    /// Re-tune the station from the previous run, if any.
    ///
    /// Never fails: a station that no longer exists, or an audio error, is
    /// logged and the app continues untuned. Returns true when playback
    /// resumed.
    pub fn resume_last(&mut self) -> bool {
        let Some((game, station)) = self
            .session
            .last
            .pair()
            .map(|(g, s)| (g.to_string(), s.to_string()))
        else {
            return false;
        };

        match self.tune(&game, &station) {
            Ok(_) => true,
            Err(e @ RadioError::UnknownStation { .. }) => {
                info!("not resuming: {}", e);
                false
            }
            Err(e) => {
                warn!("could not resume {} / {}: {}", game, station, e);
                false
            }
        }
    }

    /// Tune a station and remember it as the last-tuned one.
    pub fn tune(&mut self, game: &str, station: &str) -> Result<Duration> {
        let offset = self
            .tuner
            .tune(&self.catalog, self.session.global_start, game, station)?;
        self.remember_current();
        Ok(offset)
    }

    /// [`RadioApp::tune`] with an explicit clock reading.
    pub fn tune_at(&mut self, game: &str, station: &str, now: f64) -> Result<Duration> {
        let offset =
            self.tuner
                .tune_at(&self.catalog, self.session.global_start, game, station, now)?;
        self.remember_current();
        Ok(offset)
    }

    fn remember_current(&mut self) {
        self.session.remember(self.tuner.current());
        if let Err(e) = self.session.save(&self.state_path) {
            warn!("could not save state: {}", e);
        }
    }

    /// Store the current selection and flush state to disk.
    pub fn quit(&mut self) -> Result<()> {
        self.session.remember(self.tuner.current());
        self.session.save(&self.state_path)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// What is currently audible.
    pub fn current(&self) -> &Selection {
        self.tuner.current()
    }

    pub fn tuner(&self) -> &Tuner<O> {
        &self.tuner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::STATE_FILE;
    use crate::tuner::test_support::*;

    fn make_app(dir: &Path, last: Selection) -> RadioApp<Recorder> {
        let catalog = catalog_with("GTA", &[("Flash", 120), ("VCPR", 60)]);
        let session = SessionState {
            global_start: 1_700_000_000.0,
            last,
        };
        RadioApp::new(
            catalog,
            session,
            dir.join(STATE_FILE),
            quiet_tuner(Recorder::default()),
        )
    }

    #[test]
    fn tune_persists_last_station() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path(), Selection::default());

        app.tune_at("GTA", "VCPR", 1_700_000_090.0).unwrap();

        let saved = SessionState::load_or_init(app.state_path()).unwrap();
        assert_eq!(saved.last.pair(), Some(("GTA", "VCPR")));
        assert_eq!(saved.global_start, 1_700_000_000.0);
    }

    #[test]
    fn resume_last_tunes_previous_station() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path(), Selection::new("GTA", "Flash"));

        assert!(app.resume_last());
        assert_eq!(app.current().pair(), Some(("GTA", "Flash")));
        assert_eq!(app.tuner().output().looped().len(), 1);
    }

    #[test]
    fn resume_last_swallows_stale_station() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path(), Selection::new("GTA", "Removed"));

        assert!(!app.resume_last());
        assert_eq!(app.current(), &Selection::default());
    }

    #[test]
    fn resume_last_skips_half_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let last = Selection {
            game: Some("GTA".into()),
            station: None,
        };
        let mut app = make_app(tmp.path(), last);

        assert!(!app.resume_last());
        assert!(app.tuner().output().calls.is_empty());
    }

    #[test]
    fn quit_writes_current_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path(), Selection::default());
        app.tune("GTA", "Flash").unwrap();

        app.quit().unwrap();

        let saved = SessionState::load_or_init(app.state_path()).unwrap();
        assert_eq!(saved.last.pair(), Some(("GTA", "Flash")));
    }

    #[test]
    fn quit_without_tuning_clears_last() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path(), Selection::new("GTA", "Removed"));
        app.resume_last();

        app.quit().unwrap();

        let saved = SessionState::load_or_init(app.state_path()).unwrap();
        assert_eq!(saved.last, Selection::default());
    }
}

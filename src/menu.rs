//! Line-based numbered menu: games, then stations of the chosen game.

use crate::app::RadioApp;
use crate::error::Result;
use crate::player::AudioOutput;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::debug;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Where the menu currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    GameSelect,
    /// Index of the chosen game in the catalog.
    StationSelect(usize),
    Terminal,
}

/// Why a line could not be used as a menu index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NotANumber(String),
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotANumber(s) => write!(f, "Invalid input: '{}' is not a number", s),
            InputError::OutOfRange { index, len } if *len == 0 => {
                write!(f, "Invalid input: {} (nothing to select)", index)
            }
            InputError::OutOfRange { index, len } => {
                write!(f, "Invalid input: {} is out of range (0-{})", index, len - 1)
            }
        }
    }
}

/// Parse a menu index against a list of `len` entries.
pub fn parse_index(input: &str, len: usize) -> std::result::Result<usize, InputError> {
    let index: usize = input
        .parse()
        .map_err(|_| InputError::NotANumber(input.to_string()))?;
    if index >= len {
        return Err(InputError::OutOfRange { index, len });
    }
    Ok(index)
}

pub struct Menu<R, W> {
    input: R,
    out: W,
    clear_screen: bool,
    notice: Option<String>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, out: W, clear_screen: bool) -> Self {
        Menu {
            input,
            out,
            clear_screen,
            notice: None,
        }
    }

    /// Run until the user quits (or input ends), then save state.
    pub fn run<O: AudioOutput>(&mut self, app: &mut RadioApp<O>) -> Result<()> {
        let mut state = MenuState::GameSelect;
        while state != MenuState::Terminal {
            state = self.step(app, state)?;
        }
        app.quit()
    }

    /// Render `state`, read one line and return the next state.
    pub fn step<O: AudioOutput>(
        &mut self,
        app: &mut RadioApp<O>,
        state: MenuState,
    ) -> Result<MenuState> {
        match state {
            MenuState::GameSelect => self.game_select(app),
            MenuState::StationSelect(game) => self.station_select(app, game),
            MenuState::Terminal => Ok(MenuState::Terminal),
        }
    }

    fn game_select<O: AudioOutput>(&mut self, app: &mut RadioApp<O>) -> Result<MenuState> {
        self.begin_render()?;
        writeln!(self.out, "\nGames:")?;
        for (i, name) in app.catalog().game_names().iter().enumerate() {
            writeln!(self.out, "{} - {}", i, name)?;
        }
        writeln!(self.out, "q - quit")?;

        let Some(line) = self.prompt()? else {
            return Ok(MenuState::Terminal);
        };
        match line.as_str() {
            "" => Ok(MenuState::GameSelect),
            "q" => Ok(MenuState::Terminal),
            other => match parse_index(other, app.catalog().len()) {
                Ok(index) => Ok(MenuState::StationSelect(index)),
                Err(e) => {
                    self.notice = Some(e.to_string());
                    Ok(MenuState::GameSelect)
                }
            },
        }
    }

    fn station_select<O: AudioOutput>(
        &mut self,
        app: &mut RadioApp<O>,
        game_index: usize,
    ) -> Result<MenuState> {
        let Some(game) = app.catalog().game(game_index).cloned() else {
            return Ok(MenuState::GameSelect);
        };

        self.begin_render()?;
        writeln!(self.out, "\nStations ({}):", game.name)?;
        for (i, station) in game.stations.iter().enumerate() {
            writeln!(self.out, "{} - {}", i, station.name)?;
        }
        writeln!(self.out, "b - back")?;

        let Some(line) = self.prompt()? else {
            return Ok(MenuState::Terminal);
        };
        let stay = MenuState::StationSelect(game_index);
        match line.as_str() {
            "" => Ok(stay),
            "b" => Ok(MenuState::GameSelect),
            other => {
                match parse_index(other, game.stations.len()) {
                    Ok(index) => {
                        let station = &game.stations[index].name;
                        match app.tune(&game.name, station) {
                            Ok(_) => self.notice = Some(format!("▶ {} / {}", game.name, station)),
                            Err(e) => self.notice = Some(format!("Could not tune: {}", e)),
                        }
                    }
                    Err(e) => {
                        debug!("ignored station input: {}", e);
                        self.notice = Some(e.to_string());
                    }
                }
                Ok(stay)
            }
        }
    }

    fn begin_render(&mut self) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        if let Some(notice) = self.notice.take() {
            writeln!(self.out, "{}", notice)?;
        }
        Ok(())
    }

    /// Print the prompt and read a trimmed line. `None` on end of input.
    fn prompt(&mut self) -> Result<Option<String>> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Game};
    use crate::session::{STATE_FILE, Selection, SessionState};
    use crate::tuner::test_support::*;
    use std::io::Cursor;
    use std::path::Path;

    fn make_app(dir: &Path) -> RadioApp<Recorder> {
        let mut games = catalog_with("GTA", &[("Flash", 120), ("VCPR", 60), ("Wave", 90)])
            .games()
            .to_vec();
        games.push(Game {
            name: "Empty".to_string(),
            stations: Vec::new(),
        });
        RadioApp::new(
            Catalog::from_games(games),
            SessionState {
                global_start: 1_700_000_000.0,
                last: Selection::default(),
            },
            dir.join(STATE_FILE),
            quiet_tuner(Recorder::default()),
        )
    }

    fn run(app: &mut RadioApp<Recorder>, input: &str) -> String {
        let mut menu = Menu::new(Cursor::new(input.to_string()), Vec::new(), false);
        menu.run(app).unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn parse_index_distinguishes_errors() {
        assert_eq!(parse_index("2", 3), Ok(2));
        assert_eq!(
            parse_index("abc", 3),
            Err(InputError::NotANumber("abc".into()))
        );
        assert_eq!(
            parse_index("99", 3),
            Err(InputError::OutOfRange { index: 99, len: 3 })
        );
        assert!(matches!(parse_index("-1", 3), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn input_error_messages() {
        assert_eq!(
            InputError::OutOfRange { index: 5, len: 3 }.to_string(),
            "Invalid input: 5 is out of range (0-2)"
        );
        assert!(
            InputError::NotANumber("x".into())
                .to_string()
                .contains("not a number")
        );
    }

    #[test]
    fn lists_games_and_quits() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let out = run(&mut app, "q\n");
        assert!(out.contains("Games:\n0 - GTA\n1 - Empty\nq - quit\n> "));
        assert!(tmp.path().join(STATE_FILE).exists());
    }

    #[test]
    fn selecting_station_tunes_and_stays_in_station_menu() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let out = run(&mut app, "0\n1\nb\nq\n");
        assert!(out.contains("Stations (GTA):\n0 - Flash\n1 - VCPR\n2 - Wave\nb - back"));
        assert!(out.contains("▶ GTA / VCPR"));
        assert_eq!(app.current().pair(), Some(("GTA", "VCPR")));

        let saved = SessionState::load_or_init(app.state_path()).unwrap();
        assert_eq!(saved.last.pair(), Some(("GTA", "VCPR")));
    }

    #[test]
    fn out_of_range_station_leaves_playback_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let out = run(&mut app, "0\n0\n99\nb\nq\n");
        assert!(out.contains("99 is out of range"));
        assert_eq!(app.current().pair(), Some(("GTA", "Flash")));
        assert_eq!(app.tuner().output().looped().len(), 1);
    }

    #[test]
    fn invalid_game_input_rerenders_game_menu() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let out = run(&mut app, "zzz\n7\nq\n");
        assert!(out.contains("'zzz' is not a number"));
        assert!(out.contains("7 is out of range (0-1)"));
        assert_eq!(out.matches("Games:").count(), 3);
        assert!(!out.contains("Stations"));
    }

    #[test]
    fn letters_are_scoped_to_their_menu() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        // 'b' means nothing at game level, 'q' nothing at station level
        let out = run(&mut app, "b\n0\nq\nb\nq\n");
        assert!(out.contains("'b' is not a number"));
        assert!(out.contains("'q' is not a number"));
    }

    #[test]
    fn empty_game_shows_no_stations() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let out = run(&mut app, "1\n0\nb\nq\n");
        assert!(out.contains("Stations (Empty):\nb - back"));
        assert!(out.contains("nothing to select"));
        assert!(app.tuner().output().looped().is_empty());
    }

    #[test]
    fn end_of_input_quits_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        run(&mut app, "0\n2\n");

        let saved = SessionState::load_or_init(app.state_path()).unwrap();
        assert_eq!(saved.last.pair(), Some(("GTA", "Wave")));
    }

    #[test]
    fn clear_screen_emits_escape_per_render() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = make_app(tmp.path());

        let mut menu = Menu::new(Cursor::new("0\nb\nq\n".to_string()), Vec::new(), true);
        menu.run(&mut app).unwrap();
        let out = String::from_utf8(menu.into_output()).unwrap();
        assert_eq!(out.matches(CLEAR_SCREEN).count(), 3);
    }
}

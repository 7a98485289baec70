//! The interactive menu loop.
//!
//! A small state machine: every action state returns to `MainMenu`, and only
//! option 5 (or end of input) reaches `Terminated`.

use crate::render::{self, Palette};
use health_core::{seasonal_illnesses, Error, Result, Severity, Tracker};
use std::io::{BufRead, Write};

const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    MainMenu,
    LoggingSymptom,
    ViewingHistory,
    ViewingInsights,
    ViewingSeasonal,
    Terminated,
}

impl State {
    /// The state selected by a raw main-menu answer
    pub fn from_choice(input: &str) -> Result<State> {
        match input.trim() {
            "1" => Ok(State::LoggingSymptom),
            "2" => Ok(State::ViewingHistory),
            "3" => Ok(State::ViewingInsights),
            "4" => Ok(State::ViewingSeasonal),
            "5" => Ok(State::Terminated),
            other => Err(Error::InvalidSelection(format!(
                "'{}' is not a menu option",
                other
            ))),
        }
    }
}

/// One interactive run over an input and an output stream
pub struct Session<'a, R, W> {
    tracker: &'a Tracker,
    input: R,
    output: W,
    palette: Palette,
    pause_after_action: bool,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(tracker: &'a Tracker, input: R, output: W) -> Self {
        Self {
            tracker,
            input,
            output,
            palette: Palette::plain(),
            pause_after_action: false,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_pause(mut self, pause_after_action: bool) -> Self {
        self.pause_after_action = pause_after_action;
        self
    }

    /// Drive the menu until the user exits
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::MainMenu;
        while state != State::Terminated {
            let next = self.step(state)?;
            tracing::debug!("{:?} -> {:?}", state, next);
            state = next;
        }
        self.output.flush()?;
        Ok(())
    }

    fn step(&mut self, state: State) -> Result<State> {
        let next = match state {
            State::MainMenu => return self.main_menu(),
            State::LoggingSymptom => self.log_symptom()?,
            State::ViewingHistory => self.view_history()?,
            State::ViewingInsights => self.view_insights()?,
            State::ViewingSeasonal => {
                render::seasonal(&mut self.output, self.palette, seasonal_illnesses())?;
                State::MainMenu
            }
            State::Terminated => return Ok(State::Terminated),
        };

        if next == State::Terminated {
            return Ok(next);
        }
        self.pause()
    }

    fn main_menu(&mut self) -> Result<State> {
        render::menu(&mut self.output, self.palette)?;
        let Some(answer) = self.prompt("\nChoose an option (1-5): ")? else {
            return self.goodbye();
        };

        match State::from_choice(&answer) {
            Ok(State::Terminated) => self.goodbye(),
            Ok(next) => Ok(next),
            Err(e) => {
                tracing::debug!("{}", e);
                render::error(&mut self.output, self.palette, INVALID_CHOICE)?;
                self.pause()
            }
        }
    }

    fn log_symptom(&mut self) -> Result<State> {
        let tracker = self.tracker;
        render::symptom_list(
            &mut self.output,
            self.palette,
            &tracker.references().list_names(),
        )?;

        let Some(answer) = self.prompt("\nEnter symptom number: ")? else {
            return self.goodbye();
        };
        let (symptom, _) = match tracker.select_symptom(&answer) {
            Ok(selected) => selected,
            Err(e) => {
                tracing::debug!("{}", e);
                render::error(&mut self.output, self.palette, INVALID_CHOICE)?;
                return Ok(State::MainMenu);
            }
        };

        let severity = loop {
            let Some(raw) = self.prompt("Rate severity (1-5, where 5 is most severe): ")? else {
                return self.goodbye();
            };
            match Severity::parse(&raw) {
                Ok(severity) => break severity,
                Err(e) => render::error(&mut self.output, self.palette, &e.to_string())?,
            }
        };

        match tracker.log_symptom(symptom, severity) {
            Ok(logged) => render::logged(&mut self.output, self.palette, &logged)?,
            Err(e) => self.store_error("Could not save the entry", &e)?,
        }
        Ok(State::MainMenu)
    }

    fn view_history(&mut self) -> Result<State> {
        match self.tracker.history() {
            Ok(entries) => render::history(&mut self.output, self.palette, &entries)?,
            Err(e) => self.store_error("Could not read the health log", &e)?,
        }
        Ok(State::MainMenu)
    }

    fn view_insights(&mut self) -> Result<State> {
        match self.tracker.insights() {
            Ok(report) => render::insights(&mut self.output, self.palette, &report)?,
            Err(e) => self.store_error("No data available for insights", &e)?,
        }
        Ok(State::MainMenu)
    }

    /// Report a store failure and carry on; the store is never modified here
    fn store_error(&mut self, context: &str, err: &Error) -> Result<()> {
        tracing::warn!("{}: {}", context, err);
        render::error(
            &mut self.output,
            self.palette,
            &format!("{}: {}", context, err),
        )?;
        if matches!(err, Error::StoreCorrupt { .. }) {
            writeln!(
                self.output,
                "Fix or move the file aside, then try again. It has not been modified."
            )?;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<State> {
        if !self.pause_after_action {
            return Ok(State::MainMenu);
        }
        match self.prompt("\nPress Enter to continue...")? {
            Some(_) => Ok(State::MainMenu),
            None => self.goodbye(),
        }
    }

    fn goodbye(&mut self) -> Result<State> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", self.palette.good("Take care! Goodbye!"))?;
        Ok(State::Terminated)
    }

    /// Print `text` and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

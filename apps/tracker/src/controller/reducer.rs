//! Session state and the two entry points that change it: user input and
//! backend results. Nothing here performs I/O; side effects leave as
//! [`BackendCommand`] values for the caller to dispatch.

use std::collections::{HashMap, HashSet};

use shared::domain::{TrackingNumber, TrackingRecord};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AppMessage, InputEvent, UiError, UiErrorContext};
use crate::ui::input::InputField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Adding,
    /// Browsing with the delete modifier armed.
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Continue(Option<BackendCommand>),
    Quit,
}

/// Cursor 0 is the "add new" line; cursor `i > 0` is `tracking_numbers[i - 1]`.
#[derive(Debug, Default)]
pub struct SessionState {
    tracking_numbers: Vec<TrackingNumber>,
    history_cache: HashMap<TrackingNumber, TrackingRecord>,
    visibility: HashMap<TrackingNumber, bool>,
    in_flight: HashSet<TrackingNumber>,
    cursor: usize,
    mode: Mode,
    input: InputField,
    last_error: Option<UiError>,
    loaded: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn startup_command(&self) -> BackendCommand {
        BackendCommand::LoadTrackingNumbers
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Transition {
        if event == InputEvent::Quit {
            return Transition::Quit;
        }
        // An error screen swallows the next key press.
        if self.last_error.take().is_some() {
            return Transition::Continue(None);
        }

        let command = match self.mode {
            Mode::Adding => self.handle_adding(event),
            Mode::Browsing | Mode::Deleting => self.handle_browsing(event),
        };
        Transition::Continue(command)
    }

    fn handle_adding(&mut self, event: InputEvent) -> Option<BackendCommand> {
        match event {
            InputEvent::Char(c) => self.input.push(c),
            InputEvent::Backspace => self.input.pop(),
            InputEvent::Cancel => {
                self.input.clear();
                self.leave_adding();
            }
            InputEvent::Activate => {
                let pending = self.input.take();
                self.leave_adding();
                return TrackingNumber::parse(&pending)
                    .map(|number| BackendCommand::AppendTrackingNumber { number });
            }
            InputEvent::Up | InputEvent::Down | InputEvent::ToggleDelete | InputEvent::Quit => {}
        }
        None
    }

    fn handle_browsing(&mut self, event: InputEvent) -> Option<BackendCommand> {
        match event {
            InputEvent::Up => self.cursor = self.cursor.saturating_sub(1),
            InputEvent::Down => {
                if self.cursor < self.tracking_numbers.len() {
                    self.cursor += 1;
                }
            }
            InputEvent::ToggleDelete => {
                self.mode = match self.mode {
                    Mode::Deleting => Mode::Browsing,
                    _ => Mode::Deleting,
                };
            }
            InputEvent::Cancel => {
                if self.mode == Mode::Deleting {
                    self.mode = Mode::Browsing;
                }
            }
            InputEvent::Activate => return self.activate(),
            InputEvent::Char(_) | InputEvent::Backspace | InputEvent::Quit => {}
        }
        None
    }

    fn activate(&mut self) -> Option<BackendCommand> {
        let Some(index) = self.cursor.checked_sub(1) else {
            self.mode = Mode::Adding;
            self.input.focus();
            return None;
        };
        let number = self.tracking_numbers.get(index)?.clone();

        if self.mode == Mode::Deleting {
            self.cursor = index;
            self.mode = Mode::Browsing;
            return Some(BackendCommand::RemoveTrackingNumber { index });
        }

        if self.history_cache.contains_key(&number) {
            let visible = self.visibility.entry(number).or_insert(false);
            *visible = !*visible;
            return None;
        }

        self.in_flight.insert(number.clone());
        Some(BackendCommand::FetchHistory { number })
    }

    fn leave_adding(&mut self) {
        self.input.blur();
        self.mode = Mode::Browsing;
    }

    /// Applies a backend result. Valid in every mode: results can arrive
    /// long after the user moved on.
    pub fn fold(&mut self, message: AppMessage) {
        match message {
            AppMessage::ListUpdated(numbers) => {
                self.tracking_numbers = numbers;
                self.cursor = self.cursor.min(self.tracking_numbers.len());
                self.loaded = true;
            }
            AppMessage::HistoryFetched(record) => {
                let number = record.tracking_number.clone();
                self.in_flight.remove(&number);
                self.visibility.insert(number.clone(), true);
                self.history_cache.insert(number, record);
            }
            AppMessage::Failed(error) => {
                if let Some(number) = error.tracking_number() {
                    self.in_flight.remove(number);
                }
                if error.context() == UiErrorContext::LoadList {
                    self.loaded = true;
                }
                tracing::warn!(
                    context = ?error.context(),
                    code = ?error.code(),
                    "{}",
                    error.message()
                );
                self.last_error = Some(error);
            }
        }
    }

    pub fn tracking_numbers(&self) -> &[TrackingNumber] {
        &self.tracking_numbers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_fetching(&self, number: &TrackingNumber) -> bool {
        self.in_flight.contains(number)
    }

    pub fn cached_history(&self, number: &TrackingNumber) -> Option<&TrackingRecord> {
        self.history_cache.get(number)
    }

    /// The history to draw under `number`, if fetched and expanded.
    pub fn visible_history(&self, number: &TrackingNumber) -> Option<&TrackingRecord> {
        if self.visibility.get(number).copied().unwrap_or(false) {
            self.history_cache.get(number)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;

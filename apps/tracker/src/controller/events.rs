//! Input events, backend results, and error modeling for the tracker session.

use shared::{
    domain::{TrackingNumber, TrackingRecord},
    error::{ClassifiedError, ErrorCode, ErrorReport},
};

/// Keyboard intent, already decoupled from the terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    /// Select in the list, confirm in the input field.
    Activate,
    Cancel,
    ToggleDelete,
    Char(char),
    Backspace,
    Quit,
}

/// Exactly one of these is delivered per backend command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    ListUpdated(Vec<TrackingNumber>),
    HistoryFetched(TrackingRecord),
    Failed(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadList,
    AppendNumber,
    RemoveNumber,
    FetchHistory,
    CommandQueue,
}

impl UiErrorContext {
    pub fn describe(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "starting the background worker",
            UiErrorContext::LoadList => "loading saved tracking numbers",
            UiErrorContext::AppendNumber => "saving the new tracking number",
            UiErrorContext::RemoveNumber => "removing the tracking number",
            UiErrorContext::FetchHistory => "fetching the parcel history",
            UiErrorContext::CommandQueue => "queueing the request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    report: ErrorReport,
    tracking_number: Option<TrackingNumber>,
}

impl UiError {
    pub fn new(context: UiErrorContext, report: ErrorReport) -> Self {
        Self {
            context,
            report,
            tracking_number: None,
        }
    }

    pub fn from_error<E: ClassifiedError>(context: UiErrorContext, err: &E) -> Self {
        Self::new(context, err.report())
    }

    pub fn with_tracking_number(mut self, number: TrackingNumber) -> Self {
        self.tracking_number = Some(number);
        self
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn code(&self) -> ErrorCode {
        self.report.code
    }

    pub fn message(&self) -> &str {
        &self.report.message
    }

    pub fn tracking_number(&self) -> Option<&TrackingNumber> {
        self.tracking_number.as_ref()
    }
}

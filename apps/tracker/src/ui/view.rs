//! Text projection of [`SessionState`]. Pure: the same state and options
//! always render the same frame.

use std::fmt::Display;

use chrono::{DateTime, Local, Locale, TimeZone, Utc};

use crate::controller::events::UiError;
use crate::controller::reducer::{Mode, SessionState};

pub const TIMESTAMP_FORMAT: &str = "%a %H:%M %d.%m.%Y";

const ADD_LINE_LABEL: &str = "Add a new parcel number";
const EMPTY_MARKER: &str = "  ";
const ADD_MARKER: &str = "🆕";
const SELECTED_MARKER: &str = "📦";
const DELETE_MARKER: &str = "🗑️ ";
const FETCHING_SUFFIX: &str = " ⏳";

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub locale: Locale,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            locale: Locale::pl_PL,
        }
    }
}

/// Renders in the machine's local timezone.
pub fn render(state: &SessionState, options: &ViewOptions) -> String {
    render_in(state, options, &Local)
}

pub fn render_in<Tz>(state: &SessionState, options: &ViewOptions, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Some(error) = state.last_error() {
        return render_error(error);
    }
    if !state.is_loaded() {
        return "\n Loading saved parcel numbers...\n".to_string();
    }

    let mut lines = Vec::new();

    if state.mode() == Mode::Adding {
        lines.push(state.input().view());
    } else {
        let marker = if state.cursor() == 0 {
            ADD_MARKER
        } else {
            EMPTY_MARKER
        };
        lines.push(format!(" {marker} {ADD_LINE_LABEL}"));
    }

    for (index, number) in state.tracking_numbers().iter().enumerate() {
        let marker = match (state.cursor() == index + 1, state.mode()) {
            (true, Mode::Deleting) => DELETE_MARKER,
            (true, _) => SELECTED_MARKER,
            (false, _) => EMPTY_MARKER,
        };
        let suffix = if state.is_fetching(number) {
            FETCHING_SUFFIX
        } else {
            ""
        };
        lines.push(format!(" {marker} {number}{suffix}"));

        if let Some(record) = state.visible_history(number) {
            for entry in &record.history {
                let when = format_timestamp(&entry.timestamp, tz, options.locale);
                lines.push(format!("       {when} {}", entry.status.title));
            }
        }
    }

    format!("\n{}\n\n", lines.join("\n"))
}

fn render_error(error: &UiError) -> String {
    format!(
        "\n {} error while {}: {}\n\n Press any key to continue.\n",
        error.code().label(),
        error.context().describe(),
        error.message()
    )
}

pub fn format_timestamp<Tz>(timestamp: &DateTime<Utc>, tz: &Tz, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format_localized(TIMESTAMP_FORMAT, locale)
        .to_string()
}

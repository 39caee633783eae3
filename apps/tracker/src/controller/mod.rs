//! Controller layer: key events, session state transitions, and backend command dispatch.

pub mod events;
pub mod orchestration;
pub mod reducer;

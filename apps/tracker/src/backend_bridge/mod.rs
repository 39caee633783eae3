//! Backend bridge: the command vocabulary and the worker that executes it.

pub mod commands;
pub mod runtime;

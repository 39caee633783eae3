pub mod input;
pub mod terminal;
pub mod view;

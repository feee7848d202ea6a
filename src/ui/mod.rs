pub mod components;
pub mod line;
pub mod terminal;
pub mod theme;

// The binary entry point is main.rs; the library target exposes the module
// tree so integration tests can reach the plan model and the settings store.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod store;
pub mod ui;

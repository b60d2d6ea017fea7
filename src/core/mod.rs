pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod extract;
pub mod launch;
pub mod models;
pub mod paths;
pub mod present;
pub mod probe;
pub mod sessions;
pub mod status;
pub mod util;

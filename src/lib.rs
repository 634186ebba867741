pub mod app;
pub mod catalog;
pub mod details;
pub mod hero;
pub mod models;
pub mod navigation;
pub mod playback;

pub mod config;
pub mod desktop;
pub mod events;
pub mod gui;
pub mod sys;

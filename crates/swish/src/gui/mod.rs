pub mod app;
pub mod strip;
pub mod theme;
pub mod window;

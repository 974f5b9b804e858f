pub mod file_io;
pub mod image_utils;
pub mod plot;
pub mod render_window;
pub mod stopwatch;
pub mod view_control;

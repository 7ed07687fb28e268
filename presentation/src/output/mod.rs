//! Output formatting and rendering

pub mod console;
pub mod renderer;
pub mod stream;

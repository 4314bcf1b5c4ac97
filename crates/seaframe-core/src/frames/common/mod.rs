pub mod buffer;
pub mod time;

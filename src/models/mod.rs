pub mod time;
pub mod week;

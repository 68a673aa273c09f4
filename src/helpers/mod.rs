pub mod hours;
pub mod week_id;

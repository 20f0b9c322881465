pub mod list;
pub mod process;
pub mod uploads;

pub mod expenses;
pub mod setup;
pub mod ui;

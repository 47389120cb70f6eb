pub mod baseline;
pub mod catalog;
pub mod history;

pub mod app;
pub mod budget_file;
pub mod logging;
pub mod report;
pub mod utils;

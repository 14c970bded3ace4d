pub mod command;
pub mod logging;

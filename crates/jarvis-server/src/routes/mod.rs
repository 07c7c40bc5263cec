pub mod command;
pub mod plugin;

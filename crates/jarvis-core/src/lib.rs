pub mod command;
pub mod config;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod folders;
pub mod io;
pub mod llm;
pub mod paths;
pub mod plugin;
pub mod relay;
pub mod table;

pub use error::{JarvisError, Result};

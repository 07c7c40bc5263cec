pub mod exec;
pub mod folder;
pub mod init;
pub mod prompt;
pub mod push;
pub mod relay;
pub mod serve;
pub mod tables;

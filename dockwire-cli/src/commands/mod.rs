//! Command handlers -- one module per subcommand

pub mod config;
pub mod container;
pub mod image;
pub mod volume;

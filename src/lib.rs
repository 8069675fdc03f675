pub mod builder;
pub mod cli;
pub mod error;
pub mod git;
pub mod loader;
pub mod metadata;
pub mod mode;
pub mod model;
pub mod parsers;
pub mod path;
pub mod payload;
pub mod ports;
pub mod xml;

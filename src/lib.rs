pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod parser;
pub mod problem;
pub mod query;
pub mod repository;
pub mod ui;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use problem::{Metrics, Problem};
pub use query::{Category, SortDirection, SortKey, SortSpec};
pub use repository::{LoadError, LoadReport, Repository};

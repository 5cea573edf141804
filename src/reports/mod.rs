pub mod archive_registry;
pub mod audit;
pub mod config;
pub mod partition;
pub mod paths;
pub mod registry;
pub mod relocate;
pub mod row;
pub mod util;
pub mod warn;

pub mod ai;
pub mod canned;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod driver;
pub mod meeting;
pub mod parser;
pub mod session;
pub mod transcript;

pub use voxdrive_common::error;
pub use voxdrive_common::protocol;

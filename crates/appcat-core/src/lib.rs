pub mod config;
pub mod logging;

pub mod catalog;
pub mod checksum;
pub mod engine;
pub mod error;
pub mod fetch_head;
pub mod fetcher;
pub mod http;
pub mod resolver;
pub mod source;
pub mod strategy;

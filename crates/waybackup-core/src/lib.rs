pub mod config;
pub mod logging;

pub mod availability;
pub mod filter;
pub mod http;
pub mod index;
pub mod lists;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod writer;

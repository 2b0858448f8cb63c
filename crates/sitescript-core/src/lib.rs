pub mod config;
pub mod logging;

pub mod handshake;
pub mod host_key;
pub mod store;

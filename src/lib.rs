pub mod catalog;
pub mod config;
pub mod logger;
pub mod mocks;
pub mod server;
pub mod upstream;
pub mod watch;

pub use config::{AppConfig, CargoEnv};
pub use logger::Logger;
pub use server::ApplicationServer;

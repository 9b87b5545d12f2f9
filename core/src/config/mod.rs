pub mod load;
pub mod types;

pub use load::{load_config, tasklane_data_dir};
pub use types::{AppConfig, DefaultsConfig, LoggingConfig, ServerConfig};

pub mod app_config;
pub mod clock;
pub mod config;
pub mod consent;
pub mod location;
pub mod storage;

pub use app_config::{
    BlogConfig, Breakpoint, CarouselConfig, ConsentConfig, LocationConfig, UiConfig,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::build_ui_config;
pub use consent::{ConsentChoice, ConsentRecord, CONSENT_SCHEMA_VERSION};
pub use location::{Coordinates, LocationRecord};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

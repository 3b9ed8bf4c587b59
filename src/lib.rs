pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use app::pipelines::rotation_pipeline::RotationPipeline;
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};

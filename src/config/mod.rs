pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rotation-etl")]
#[command(about = "Build the monthly rotation JSON from the latest LVLI entries export")]
pub struct CliConfig {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory searched recursively for export files
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Case-insensitive file name pattern for export files
    #[arg(long)]
    pub file_pattern: Option<String>,

    /// Value of the list field that selects the rotation rows
    #[arg(long)]
    pub list_id: Option<String>,

    /// Output directory
    #[arg(long)]
    pub output_path: Option<String>,

    /// Select the source file and print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (若有) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(dir) = &self.source_dir {
            config.source.root = dir.clone();
        }
        if let Some(pattern) = &self.file_pattern {
            config.source.file_pattern = pattern.clone();
        }
        if let Some(list_id) = &self.list_id {
            config.rotation.list_id = list_id.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.output.path = output_path.clone();
        }

        Ok(config)
    }
}

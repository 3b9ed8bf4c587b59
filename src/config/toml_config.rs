use crate::config::settings::{DocumentSettings, OutputSettings, RotationSettings, SourceSettings};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

/// Full run configuration. Every section is optional in the file and falls back to
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceSettings,
    pub rotation: RotationSettings,
    pub document: DocumentSettings,
    pub output: OutputSettings,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TSV_ROOT})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.root", &self.source.root)?;
        validation::validate_pattern("source.file_pattern", &self.source.file_pattern)?;

        validation::validate_non_empty_string("rotation.list_field", &self.rotation.list_field)?;
        validation::validate_non_empty_string("rotation.list_id", &self.rotation.list_id)?;
        validation::validate_non_empty_string(
            "rotation.reference_field",
            &self.rotation.reference_field,
        )?;
        validation::validate_non_empty_string("rotation.type_tag", &self.rotation.type_tag)?;
        validation::validate_non_empty_string("rotation.month_marker", &self.rotation.month_marker)?;
        validation::validate_non_empty_string("rotation.tag_prefix", &self.rotation.tag_prefix)?;
        validation::validate_non_empty_string(
            "rotation.fallback_name",
            &self.rotation.fallback_name,
        )?;

        validation::validate_range("document.schema_version", self.document.schema_version, 1, 1)?;
        validation::validate_non_empty_string("document.timezone", &self.document.timezone)?;
        validation::validate_time_of_day("document.rollover_time", &self.document.rollover_time)?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.filename", &self.output.filename)?;

        Ok(())
    }

    /// 輸出檔完整路徑
    pub fn output_file(&self) -> String {
        format!("{}/{}", self.output.path.trim_end_matches('/'), self.output.filename)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> &SourceSettings {
        &self.source
    }

    fn rotation(&self) -> &RotationSettings {
        &self.rotation
    }

    fn document(&self) -> &DocumentSettings {
        &self.document
    }

    fn output(&self) -> &OutputSettings {
        &self.output
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.rotation.type_tag, "FISH");
        assert_eq!(config.rotation.fallback_name, "TBA");
        assert_eq!(config.document.schema_version, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[source]
root = "./exports"

[rotation]
list_id = "LL_Fishing_Axolotl_2026"
reference_field = "Entry Reference"

[document]
timezone = "UTC"
rollover_time = "09:30"

[output]
filename = "rotation.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.root, "./exports");
        assert_eq!(config.source.file_pattern, SourceSettings::default().file_pattern);
        assert_eq!(config.rotation.list_id, "LL_Fishing_Axolotl_2026");
        assert_eq!(config.rotation.reference_field, "Entry Reference");
        assert_eq!(config.rotation.list_field, "LVLI_EDID");
        assert_eq!(config.document.timezone, "UTC");
        assert_eq!(config.output_file(), "./dist/rotation.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ROTATION_TEST_TSV_ROOT", "/data/tsv");

        let toml_content = r#"
[source]
root = "${ROTATION_TEST_TSV_ROOT}"
file_pattern = "${ROTATION_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.root, "/data/tsv");
        assert_eq!(config.source.file_pattern, "${ROTATION_TEST_UNSET_VAR}");

        std::env::remove_var("ROTATION_TEST_TSV_ROOT");
    }

    #[test]
    fn test_config_validation() {
        let bad_time = TomlConfig::from_toml_str("[document]\nrollover_time = \"noon\"\n").unwrap();
        assert!(bad_time.validate().is_err());

        let bad_pattern = TomlConfig::from_toml_str("[source]\nfile_pattern = \"(\"\n").unwrap();
        assert!(bad_pattern.validate().is_err());

        let bad_version = TomlConfig::from_toml_str("[document]\nschema_version = 2\n").unwrap();
        assert!(bad_version.validate().is_err());

        let blank_list = TomlConfig::from_toml_str("[rotation]\nlist_id = \"  \"\n").unwrap();
        assert!(blank_list.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[source\nroot = 1").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[rotation]\nlist_id = \"LL_From_File\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.rotation.list_id, "LL_From_File");
    }
}

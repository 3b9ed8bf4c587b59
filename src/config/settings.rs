use serde::{Deserialize, Serialize};

/// 匯出檔所在位置與檔名規則
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub root: String,
    /// Case-insensitive regex tested against the base file name.
    pub file_pattern: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            root: "./tsv".to_string(),
            file_pattern: r"lvli.*entries.*\.tsv$".to_string(),
        }
    }
}

/// Everything the assembler needs to find and read the rotation rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub list_field: String,
    pub list_id: String,
    pub reference_field: String,
    pub type_tag: String,
    pub month_marker: String,
    pub tag_prefix: String,
    pub fallback_name: String,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            list_field: "LVLI_EDID".to_string(),
            list_id: "LL_Fishing_Axolotl_Monthly".to_string(),
            reference_field: "LVLO_Reference".to_string(),
            type_tag: "FISH".to_string(),
            month_marker: "GetCurrentMonth".to_string(),
            tag_prefix: "LocRegion".to_string(),
            fallback_name: "TBA".to_string(),
        }
    }
}

/// 輸出 JSON 文件的固定欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub schema_version: u32,
    pub timezone: String,
    /// Local time of day (HH:MM) at which a month's entry becomes active.
    pub rollover_time: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            schema_version: 1,
            timezone: "America/New_York".to_string(),
            rollover_time: "12:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub path: String,
    pub filename: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: "./dist".to_string(),
            filename: "axolotl_rotation.json".to_string(),
        }
    }
}

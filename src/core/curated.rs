use crate::core::tsv::{decode_lossy, RecordStream};
use crate::domain::model::Record;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use std::path::Path;

/// Options for the hand-curated TSV -> JSON conversion.
#[derive(Debug, Clone, Default)]
pub struct CuratedOptions {
    /// Column whose non-empty values must be `YYYY-MM-DD` dates.
    pub date_field: Option<String>,
    /// Column used for a stable ascending sort.
    pub sort_by: Option<String>,
}

/// Parse one curated TSV, validate its date column and sort it.
pub fn convert_rows(text: &str, source_name: &str, options: &CuratedOptions) -> Result<Vec<Record>> {
    let mut rows = RecordStream::from_text(text).collect::<Result<Vec<_>>>()?;

    if let Some(field) = &options.date_field {
        for (index, row) in rows.iter().enumerate() {
            let value = row.value(field);
            if value.is_empty() {
                continue;
            }
            if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "{} row {}: '{}' in column '{}' is not an ISO date (YYYY-MM-DD)",
                        source_name,
                        index + 1,
                        value,
                        field
                    ),
                });
            }
        }
    }

    if let Some(field) = &options.sort_by {
        // sort_by 是穩定排序，相同值維持原本順序
        rows.sort_by(|a, b| a.value(field).cmp(b.value(field)));
    }

    Ok(rows)
}

/// `*.tsv` file names directly inside `dir`, sorted.
pub fn tsv_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(EtlError::not_found(format!(
            "TSV directory {} does not exist",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
        if path.is_file() && is_tsv {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    if names.is_empty() {
        return Err(EtlError::not_found(format!(
            "no TSV files found in {}",
            dir.display()
        )));
    }
    Ok(names)
}

/// Convert every TSV in `dir` (read through `input`) into `<stem>.json` written through
/// `output`. Returns the written file names.
pub async fn convert_directory<S: Storage>(
    input: &S,
    output: &S,
    dir: &Path,
    options: &CuratedOptions,
) -> Result<Vec<String>> {
    let mut written = Vec::new();

    for name in tsv_files(dir)? {
        let bytes = input.read_file(&name).await?;
        let rows = convert_rows(&decode_lossy(&bytes), &name, options)?;

        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name.as_str());
        let json_name = format!("{}.json", stem);

        let mut json = serde_json::to_string_pretty(&rows)?;
        json.push('\n');
        output.write_file(&json_name, json.as_bytes()).await?;

        tracing::info!("📝 {} -> {} ({} rows)", name, json_name, rows.len());
        written.push(json_name);
    }

    Ok(written)
}

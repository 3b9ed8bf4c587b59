use crate::core::file_select::{ExportFile, FileSelector};
use crate::core::rotation::RotationAssembler;
use crate::core::tsv::{read_lossy, RecordStream};
use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::domain::model::RotationDocument;
use crate::utils::error::Result;
use chrono::Utc;
use std::path::Path;

/// 月份輪替 Pipeline：選檔、解析、組表、輸出 JSON
pub struct RotationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RotationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// The export file a run would read right now.
    pub fn select_source(&self) -> Result<ExportFile> {
        let source = self.config.source();
        let selector = FileSelector::new(&source.file_pattern)?;
        selector.select_latest(Path::new(&source.root))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RotationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let export = self.select_source()?;
        tracing::info!("📄 Using export: {}", export.path.display());

        let text = read_lossy(&export.path)?;
        let records = RecordStream::from_text(text).collect::<Result<Vec<_>>>()?;

        tracing::debug!("Parsed {} records from {}", records.len(), export.path.display());
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let assembler = RotationAssembler::new(self.config.rotation())?;
        let assembly = assembler.assemble(&data)?;

        let document = RotationDocument::new(&assembly.table, self.config.document(), Utc::now());

        Ok(TransformResult {
            document,
            matched_rows: assembly.matched_rows,
            missing_months: assembly.missing_months(),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output = self.config.output();

        let mut json = serde_json::to_string_pretty(&result.document)?;
        json.push('\n');

        tracing::debug!("Writing rotation document ({} bytes)", json.len());
        self.storage.write_file(&output.filename, json.as_bytes()).await?;

        Ok(format!(
            "{}/{}",
            output.path.trim_end_matches('/'),
            output.filename
        ))
    }
}

use crate::config::settings::RotationSettings;
use crate::core::conditions::ConditionPatterns;
use crate::core::naming::DisplayNameDeriver;
use crate::domain::model::{MonthIndex, Record, RotationEntry, RotationTable};
use crate::utils::error::{EtlError, Result};

/// Result of one assembly pass.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub table: RotationTable,
    pub matched_rows: usize,
    pub skipped_rows: usize,
}

impl Assembly {
    pub fn missing_months(&self) -> Vec<MonthIndex> {
        self.table.missing_months()
    }

    /// `found K/12 months (missing: ...)` when the table is incomplete.
    pub fn completeness_warning(&self) -> Option<String> {
        let missing = self.missing_months();
        if missing.is_empty() {
            return None;
        }

        let missing: Vec<String> = missing.iter().map(MonthIndex::to_string).collect();
        Some(format!(
            "found {}/{} months (missing: {})",
            self.table.len(),
            MonthIndex::COUNT,
            missing.join(", ")
        ))
    }
}

pub struct RotationAssembler<'a> {
    settings: &'a RotationSettings,
    conditions: ConditionPatterns,
    names: DisplayNameDeriver,
}

impl<'a> RotationAssembler<'a> {
    pub fn new(settings: &'a RotationSettings) -> Result<Self> {
        Ok(Self {
            settings,
            conditions: ConditionPatterns::from_settings(settings)?,
            names: DisplayNameDeriver::new(&settings.type_tag)?,
        })
    }

    /// Builds the month table from the rows whose list field equals the configured list id.
    ///
    /// Rows without a usable month are skipped. When two rows claim the same month the
    /// later one wins. An incomplete table is logged, not rejected.
    pub fn assemble(&self, records: &[Record]) -> Result<Assembly> {
        let mut table = RotationTable::new();
        let mut matched_rows = 0;
        let mut skipped_rows = 0;

        let rows = records
            .iter()
            .filter(|record| record.value(&self.settings.list_field) == self.settings.list_id);

        for record in rows {
            matched_rows += 1;

            let Some(month) = self.conditions.extract_month_index(record) else {
                skipped_rows += 1;
                tracing::debug!(
                    "Skipping row {} without a month condition",
                    matched_rows
                );
                continue;
            };

            let entry = self.build_entry(month, record);
            tracing::debug!(
                "Month {} -> {} {:?}",
                month,
                entry.display_name,
                entry.tags
            );

            if let Some(previous) = table.insert(entry) {
                tracing::warn!(
                    "⚠️ Month {} appears more than once; '{}' replaced by a later row",
                    month,
                    previous.display_name
                );
            }
        }

        if matched_rows == 0 {
            return Err(EtlError::MissingListError {
                field: self.settings.list_field.clone(),
                list_id: self.settings.list_id.clone(),
            });
        }

        let assembly = Assembly {
            table,
            matched_rows,
            skipped_rows,
        };

        match assembly.completeness_warning() {
            Some(warning) => tracing::warn!("⚠️ Rotation incomplete: {}", warning),
            None => tracing::info!("✅ All {} months resolved", MonthIndex::COUNT),
        }

        Ok(assembly)
    }

    fn build_entry(&self, month: MonthIndex, record: &Record) -> RotationEntry {
        let mut display_name = self
            .names
            .derive(record.value(&self.settings.reference_field));
        if display_name.is_empty() {
            display_name = self.settings.fallback_name.clone();
        }

        RotationEntry {
            month,
            display_name,
            tags: self.conditions.extract_region_tags(record),
            image: None,
        }
    }
}

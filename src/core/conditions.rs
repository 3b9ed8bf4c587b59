use crate::config::settings::RotationSettings;
use crate::core::naming::space_camel_case;
use crate::domain::model::{MonthIndex, Record};
use crate::utils::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// Condition slots are named `Cond1`, `Cond2`, ... with gaps allowed.
static CONDITION_SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Cond(\d+)$").expect("condition slot pattern"));

/// Numeric literals in the export always carry six decimal places.
static MONTH_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.000000").expect("month value pattern"));

/// Condition fields of `record`, ordered by slot number (`Cond2` before `Cond10`).
pub fn condition_slots(record: &Record) -> Vec<(u32, &str)> {
    let mut slots: Vec<(u32, &str)> = record
        .fields()
        .filter_map(|(name, value)| {
            let caps = CONDITION_SLOT.captures(name)?;
            let slot = caps[1].parse::<u32>().ok()?;
            Some((slot, value))
        })
        .collect();
    slots.sort_by_key(|(slot, _)| *slot);
    slots
}

/// The two text patterns recognised inside condition expressions.
pub struct ConditionPatterns {
    month_marker: String,
    region_tag: Regex,
}

impl ConditionPatterns {
    pub fn new(month_marker: &str, tag_prefix: &str) -> Result<Self> {
        let region_tag = Regex::new(&format!(
            r"\b{}([A-Z][A-Za-z0-9]*)\s*\[KYWD:[0-9A-Fa-f]+\]",
            regex::escape(tag_prefix)
        ))?;

        Ok(Self {
            month_marker: month_marker.to_string(),
            region_tag,
        })
    }

    pub fn from_settings(settings: &RotationSettings) -> Result<Self> {
        Self::new(&settings.month_marker, &settings.tag_prefix)
    }

    /// Month carried by a single condition expression, if it calls the month function
    /// with a literal in 1..=12.
    pub fn month_index(&self, text: &str) -> Option<MonthIndex> {
        let at = text.find(&self.month_marker)?;
        let rest = &text[at + self.month_marker.len()..];
        let caps = MONTH_VALUE.captures(rest)?;
        caps[1].parse::<u32>().ok().and_then(MonthIndex::new)
    }

    /// Display tags for every region keyword in a single condition expression.
    pub fn region_tags<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.region_tag
            .captures_iter(text)
            .map(|caps| space_camel_case(&caps[1]))
    }

    /// First valid month across the record's condition slots.
    pub fn extract_month_index(&self, record: &Record) -> Option<MonthIndex> {
        condition_slots(record)
            .into_iter()
            .find_map(|(_, text)| self.month_index(text))
    }

    /// Distinct region tags across all condition slots, in first-seen order.
    pub fn extract_region_tags(&self, record: &Record) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for (_, text) in condition_slots(record) {
            for tag in self.region_tags(text) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
        tags
    }
}

use crate::utils::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel boundary pattern"));

/// `ForestFloodlands` -> `Forest Floodlands`: one space wherever a lowercase letter
/// is directly followed by an uppercase one.
pub fn space_camel_case(identifier: &str) -> String {
    CAMEL_BOUNDARY.replace_all(identifier, "$1 $2").into_owned()
}

/// Turns a composite reference such as
/// `0080070C:Fishing_Fish_Small_Axolotl01_CharcoalAxolotl:FISH` into a display name.
pub struct DisplayNameDeriver {
    reference: Regex,
}

impl DisplayNameDeriver {
    pub fn new(type_tag: &str) -> Result<Self> {
        let reference = Regex::new(&format!(r"([A-Za-z0-9_]+):{}\b", regex::escape(type_tag)))?;
        Ok(Self { reference })
    }

    /// Empty string when no segment carries the type tag.
    pub fn derive(&self, reference: &str) -> String {
        let Some(caps) = self.reference.captures(reference) else {
            return String::new();
        };

        caps[1]
            .rsplit('_')
            .next()
            .map(space_camel_case)
            .unwrap_or_default()
    }
}

//! Column-name constants for the normalized species table.
//! Names are given in their post-normalization form.

use polars::prelude::DataFrame;

pub const PARK_NAME: &str = "parkname";
pub const SCI_NAME: &str = "sciname";
pub const NATIVENESS: &str = "nativeness";
pub const CATEGORY_NAME: &str = "categoryname";
pub const FAMILY: &str = "family";

/// Columns every run needs.
pub const MANDATORY: [&str; 2] = [PARK_NAME, SCI_NAME];

/// Nativeness value counted as native; any other value is non-native.
pub const NATIVE: &str = "Native";

/// Which optional aggregations the loaded table can support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaCapabilities {
    pub nativeness: bool,
    pub category: bool,
    pub family: bool,
}

impl SchemaCapabilities {
    pub fn detect(df: &DataFrame) -> Self {
        let has = |name: &str| df.get_column_index(name).is_some();
        Self {
            nativeness: has(NATIVENESS),
            category: has(CATEGORY_NAME),
            family: has(FAMILY),
        }
    }
}

/// Mandatory columns absent from the table, in declaration order.
pub fn missing_mandatory(df: &DataFrame) -> Vec<&'static str> {
    MANDATORY
        .iter()
        .copied()
        .filter(|name| df.get_column_index(name).is_none())
        .collect()
}

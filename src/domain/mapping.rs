//! Source-to-target field mapping
//!
//! A [`FieldMapping`] is an ordered list of [`FieldPair`]s. A pair with only a
//! target side is a field generated in the warehouse (the auto-assigned
//! identifier, the row hash); a pair with only a source side is read and hashed
//! but never staged.
//!
//! All views are derived once at construction. Duplicate names are accepted as
//! given; in the rename table a later pair overrides an earlier one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One source/target correspondence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl FieldPair {
    /// Field present on both sides
    pub fn mapped(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    /// Field that only exists in the warehouse
    pub fn target_only(target: impl Into<String>) -> Self {
        Self {
            source: None,
            target: Some(target.into()),
        }
    }

    /// Field that only exists in the source
    pub fn source_only(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: None,
        }
    }

    /// At least one side must be present
    pub fn is_valid(&self) -> bool {
        self.source.is_some() || self.target.is_some()
    }
}

/// Derived views over an ordered list of field pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pairs: Vec<FieldPair>,
    source_columns: Vec<String>,
    target_columns: Vec<String>,
    rename_table: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new(pairs: Vec<FieldPair>) -> Self {
        let source_columns = pairs.iter().filter_map(|p| p.source.clone()).collect();
        let target_columns = pairs.iter().filter_map(|p| p.target.clone()).collect();
        let rename_table = pairs
            .iter()
            .filter_map(|p| match (&p.source, &p.target) {
                (Some(source), Some(target)) => Some((source.clone(), target.clone())),
                _ => None,
            })
            .collect();

        Self {
            pairs,
            source_columns,
            target_columns,
            rename_table,
        }
    }

    /// Source-side names in mapping order
    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    /// Target-side names in mapping order
    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }

    /// Source name to target name, for pairs with both sides
    pub fn rename_table(&self) -> &HashMap<String, String> {
        &self.rename_table
    }

    /// Source positions that are staged, with the target name each is staged under
    ///
    /// Positions index into [`FieldMapping::source_columns`]. Source-only fields
    /// are skipped.
    pub fn staged_fields(&self) -> Vec<(usize, &str)> {
        self.source_columns
            .iter()
            .enumerate()
            .filter_map(|(index, source)| {
                self.rename_table
                    .get(source)
                    .map(|target| (index, target.as_str()))
            })
            .collect()
    }

    /// Whether `name` is a target-only field
    pub fn is_target_only(&self, name: &str) -> bool {
        self.pairs
            .iter()
            .any(|p| p.source.is_none() && p.target.as_deref() == Some(name))
    }
}

impl From<Vec<FieldPair>> for FieldMapping {
    fn from(pairs: Vec<FieldPair>) -> Self {
        Self::new(pairs)
    }
}

//! JSON parser for census reporter table responses.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{CensusError, Result};

/// Top-level response body. Fields the report does not use (release info,
/// geography names, margins of error) are ignored.
#[derive(Debug, Deserialize)]
pub struct CensusDataResponse {
    /// geo id -> table id -> values
    pub data: HashMap<String, HashMap<String, DataItem>>,
    pub tables: HashMap<String, TableDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct DataItem {
    pub estimate: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct TableDefinition {
    pub title: String,
    pub columns: BTreeMap<String, ColumnDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub indent: i64,
}

/// One census table: its column definitions plus the estimates of every
/// geography the response carried.
#[derive(Debug)]
pub struct StatisticalTable {
    pub id: String,
    pub title: String,
    pub columns: BTreeMap<String, ColumnDefinition>,
    pub estimates: HashMap<String, BTreeMap<String, f64>>,
}

impl StatisticalTable {
    /// Column ids whose label is exactly `label`, in column id order.
    pub fn columns_labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.columns
            .iter()
            .filter(move |(_, def)| def.name == label)
            .map(|(id, _)| id.as_str())
    }

    pub fn estimates_for(&self, geo_id: &str) -> Result<&BTreeMap<String, f64>> {
        self.estimates
            .get(geo_id)
            .ok_or_else(|| CensusError::lookup(format!("{} data for {geo_id}", self.id)))
    }
}

impl CensusDataResponse {
    /// Pulls `table_id` out of the response.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Lookup`] if the response has no definition for
    /// the table.
    pub fn into_table(mut self, table_id: &str) -> Result<StatisticalTable> {
        let definition = self
            .tables
            .remove(table_id)
            .ok_or_else(|| CensusError::lookup(format!("table definition {table_id}")))?;

        let estimates = self
            .data
            .into_iter()
            .filter_map(|(geo_id, mut tables)| {
                tables
                    .remove(table_id)
                    .map(|item| (geo_id, item.estimate))
            })
            .collect();

        Ok(StatisticalTable {
            id: table_id.to_string(),
            title: definition.title,
            columns: definition.columns,
            estimates,
        })
    }
}

/// Decodes a raw response body and extracts `table_id` from it.
///
/// # Errors
///
/// Returns [`CensusError::Parse`] if the bytes are not a census response and
/// [`CensusError::Lookup`] if the table is absent.
pub fn parse_table(bytes: &[u8], table_id: &str) -> Result<StatisticalTable> {
    let response: CensusDataResponse = serde_json::from_slice(bytes)?;
    response.into_table(table_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tables": {
            "B03002": {
                "title": "Hispanic or Latino Origin by Race",
                "universe": "Total population",
                "denominator_column_id": "B03002001",
                "columns": {
                    "B03002001": {"name": "Total:", "indent": 0},
                    "B03002003": {"name": "White alone", "indent": 2},
                    "B03002012": {"name": "Hispanic or Latino:", "indent": 1}
                }
            }
        },
        "data": {
            "05000US06037": {
                "B03002": {
                    "estimate": {"B03002001": 100.0, "B03002003": 25.0, "B03002012": 48.5},
                    "error": {"B03002001": 0.0, "B03002003": 1.0, "B03002012": 2.0}
                }
            }
        },
        "geography": {"05000US06037": {"name": "Los Angeles County, CA"}},
        "release": {"id": "acs2022_5yr"}
    }"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let table = parse_table(SAMPLE.as_bytes(), "B03002").unwrap();
        assert_eq!(table.id, "B03002");
        assert_eq!(table.title, "Hispanic or Latino Origin by Race");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns["B03002003"].indent, 2);

        let estimates = table.estimates_for("05000US06037").unwrap();
        assert_eq!(estimates["B03002012"], 48.5);
    }

    #[test]
    fn test_parse_missing_table_is_lookup_error() {
        let result = parse_table(SAMPLE.as_bytes(), "B01001");
        assert!(matches!(result, Err(CensusError::Lookup { .. })));
    }

    #[test]
    fn test_parse_missing_required_field_is_parse_error() {
        let result = parse_table(br#"{"tables": {}}"#, "B03002");
        assert!(matches!(result, Err(CensusError::Parse(_))));
    }

    #[test]
    fn test_parse_column_without_indent_is_parse_error() {
        let body = SAMPLE.replace(r#""indent": 2"#, r#""universe": "people""#);
        let result = parse_table(body.as_bytes(), "B03002");
        assert!(matches!(result, Err(CensusError::Parse(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_table(b"<html>rate limited</html>", "B03002");
        assert!(matches!(result, Err(CensusError::Parse(_))));
    }

    #[test]
    fn test_estimates_for_unknown_geography() {
        let table = parse_table(SAMPLE.as_bytes(), "B03002").unwrap();
        let result = table.estimates_for("04000US39");
        assert!(matches!(result, Err(CensusError::Lookup { .. })));
    }

    #[test]
    fn test_columns_labelled_matches_exactly() {
        let table = parse_table(SAMPLE.as_bytes(), "B03002").unwrap();
        let ids: Vec<_> = table.columns_labelled("White alone").collect();
        assert_eq!(ids, vec!["B03002003"]);
        assert_eq!(table.columns_labelled("White").count(), 0);
    }
}

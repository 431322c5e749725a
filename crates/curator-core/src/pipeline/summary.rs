//! The gallery summary: category → ranked records, written as JSON.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::types::SummaryRecord;

/// Records grouped by category, in the order categories were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    groups: Vec<(String, Vec<SummaryRecord>)>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a category's list.
    pub fn push(&mut self, category: &str, record: SummaryRecord) {
        match self.groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((category.to_string(), vec![record])),
        }
    }

    /// Order every category's records by confidence, highest first.
    ///
    /// The sort is stable: equal confidences keep their insertion order.
    pub fn sort(&mut self) {
        for (_, records) in &mut self.groups {
            records.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            });
        }
    }

    /// Records for one category, if any were produced.
    pub fn get(&self, category: &str) -> Option<&[SummaryRecord]> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, records)| records.as_slice())
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of records across all categories.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Write the summary as indented JSON, replacing any existing file.
    ///
    /// Parent directories are created as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        tracing::debug!("Wrote {} summary record(s) to {:?}", self.total(), path);
        Ok(())
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (name, records) in &self.groups {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, score: f32) -> SummaryRecord {
        SummaryRecord::new(format!("/images/gallery/x/{source}"), score, source.to_string())
    }

    fn sources(summary: &Summary, category: &str) -> Vec<String> {
        summary
            .get(category)
            .unwrap()
            .iter()
            .map(|r| r.source.clone())
            .collect()
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let mut summary = Summary::new();
        summary.push("decks", record("low", 0.10));
        summary.push("decks", record("tie-first", 0.30));
        summary.push("decks", record("high", 0.40));
        summary.push("decks", record("tie-second", 0.30));
        summary.sort();

        assert_eq!(
            sources(&summary, "decks"),
            ["high", "tie-first", "tie-second", "low"]
        );
    }

    #[test]
    fn test_scores_rounding_to_zero_are_ties() {
        let mut summary = Summary::new();
        summary.push("decks", record("negative", -0.000_01));
        summary.push("decks", record("positive", 0.000_01));
        summary.sort();

        assert_eq!(sources(&summary, "decks"), ["negative", "positive"]);
    }

    #[test]
    fn test_categories_keep_first_seen_order() {
        let mut summary = Summary::new();
        summary.push("interiors", record("a", 0.2));
        summary.push("cabinetry", record("b", 0.2));
        summary.push("interiors", record("c", 0.2));

        let names: Vec<_> = summary.categories().collect();
        assert_eq!(names, ["interiors", "cabinetry"]);
        assert_eq!(summary.total(), 3);
        assert!(summary.get("decks").is_none());
    }

    #[test]
    fn test_serializes_as_object_of_arrays() {
        let mut summary = Summary::new();
        summary.push("decks", record("d.jpg", 0.25));
        summary.push("cabinetry", record("c.jpg", 0.5));

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.starts_with(r#"{"decks":[{"file":"/images/gallery/x/d.jpg""#));
        assert!(json.find("decks").unwrap() < json.find("cabinetry").unwrap());
    }

    #[test]
    fn test_save_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/nested/gallery.json");

        let mut first = Summary::new();
        first.push("decks", record("one.jpg", 0.1));
        first.push("decks", record("two.jpg", 0.2));
        first.save(&path).unwrap();

        let mut second = Summary::new();
        second.push("interiors", record("three.jpg", 0.3));
        second.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"interiors\": ["));
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(parsed.get("decks").is_none());
        assert_eq!(parsed["interiors"][0]["confidence"], 0.3);
    }

    #[test]
    fn test_empty_summary_is_empty_object() {
        let summary = Summary::new();
        assert!(summary.is_empty());
        assert_eq!(serde_json::to_string(&summary).unwrap(), "{}");
    }
}

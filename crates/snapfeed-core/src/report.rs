//! Feedback report data model
//!
//! A [`Report`] accumulates everything the user composes before submission:
//! named text sections, the destination list, a priority label, and binary
//! attachments. One report maps to one card on the remote board.

use serde::{Deserialize, Serialize};

/// A named block of free text rendered into the card body.
///
/// Sections are ordered by `sort_order` at render time, not by insertion
/// order. Names are unique within a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Unique key within the report (e.g. "Summary")
    pub name: String,
    /// Free text content
    pub text: String,
    /// Ascending render position; ties keep insertion order
    pub sort_order: i32,
}

/// A priority/severity tag attached to the card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    /// Remote label identifier
    pub id: String,
    /// Optional color identifier understood by the board
    #[serde(default)]
    pub color_id: Option<String>,
    /// Human-readable label name
    pub name: String,
}

impl Label {
    /// Creates a new label.
    pub fn new(
        id: impl Into<String>,
        color_id: Option<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            color_id,
            name: name.into(),
        }
    }
}

/// Destination column/category on the remote board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRef {
    pub id: String,
    pub name: String,
}

/// A named binary blob uploaded to the card after creation.
///
/// Owned exclusively by the report that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
}

/// A single feedback report, consumed exactly once by the submission
/// coordinator and replaced with a fresh instance afterwards.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Card title; the coordinator substitutes a placeholder when empty
    pub title: String,
    /// Destination list
    pub list: ListRef,
    /// Screenshot bytes, converted to a creation-time artifact at submit
    pub screenshot: Option<Vec<u8>>,
    sections: Vec<Section>,
    label: Option<Label>,
    attachments: Vec<Attachment>,
}

impl Report {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section with the given name and initial text.
    ///
    /// Silently does nothing if a section with the same name already exists,
    /// so callers can create sections idempotently.
    pub fn add_section(&mut self, name: impl Into<String>, initial_text: impl Into<String>) {
        let name = name.into();
        if self.has_section(&name) {
            return;
        }
        self.sections.push(Section {
            name,
            text: initial_text.into(),
            sort_order: 0,
        });
    }

    /// Returns whether a section with the given name exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    /// Returns a mutable reference to the named section, if present.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Returns the sections in insertion order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sets the single label slot, overwriting any previous selection.
    pub fn add_label(&mut self, label: Label) {
        self.label = Some(label);
    }

    /// Returns the selected label, if any.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Returns the label ids to send with card creation.
    pub fn label_ids(&self) -> Vec<String> {
        self.label.iter().map(|l| l.id.clone()).collect()
    }

    /// Appends an attachment. Attachments are append-only during composition.
    pub fn add_attachment(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.attachments.push(Attachment {
            name: name.into(),
            data,
        });
    }

    /// Returns the attachments in insertion order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Renders the card body: sections ordered by ascending `sort_order`,
    /// each as a `"<name>\n<text>"` block separated by a blank line.
    ///
    /// The sort is stable, so equal sort orders keep insertion order.
    pub fn render(&self) -> String {
        let mut ordered: Vec<&Section> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.sort_order);

        ordered
            .iter()
            .map(|s| format!("{}\n{}", s.name, s.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_section_and_lookup() {
        let mut report = Report::new();
        report.add_section("Summary", "it broke");

        assert!(report.has_section("Summary"));
        assert!(!report.has_section("Detail"));
        assert_eq!(report.section_mut("Summary").unwrap().text, "it broke");
        assert!(report.section_mut("Detail").is_none());
    }

    #[test]
    fn test_add_section_is_idempotent() {
        let mut report = Report::new();
        report.add_section("Summary", "first");
        report.add_section("Summary", "second");

        assert_eq!(report.sections().len(), 1);
        assert_eq!(report.sections()[0].text, "first");
    }

    #[test]
    fn test_render_orders_by_sort_order() {
        let mut report = Report::new();
        report.add_section("Detail", "the details");
        report.add_section("Summary", "the summary");
        report.section_mut("Detail").unwrap().sort_order = 2;
        report.section_mut("Summary").unwrap().sort_order = 0;

        assert_eq!(report.render(), "Summary\nthe summary\n\nDetail\nthe details");
    }

    #[test]
    fn test_render_ties_keep_insertion_order() {
        let mut report = Report::new();
        report.add_section("A", "a");
        report.add_section("B", "b");
        report.add_section("C", "c");
        // All sort_order 0; insertion order must survive the sort
        assert_eq!(report.render(), "A\na\n\nB\nb\n\nC\nc");
    }

    #[test]
    fn test_render_empty_report() {
        let report = Report::new();
        assert_eq!(report.render(), "");
    }

    #[test]
    fn test_add_label_overwrites_previous() {
        let mut report = Report::new();
        report.add_label(Label::new("1", None, "Low Priority"));
        report.add_label(Label::new("3", None, "High Priority"));

        assert_eq!(report.label().unwrap().id, "3");
        assert_eq!(report.label_ids(), vec!["3".to_string()]);
    }

    #[test]
    fn test_label_ids_empty_without_selection() {
        let report = Report::new();
        assert!(report.label_ids().is_empty());
    }

    #[test]
    fn test_attachments_append_only() {
        let mut report = Report::new();
        report.add_attachment("log.txt", vec![1, 2, 3]);
        report.add_attachment("trace.bin", vec![4]);

        let names: Vec<&str> = report.attachments().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["log.txt", "trace.bin"]);
    }

    #[test]
    fn test_label_deserializes_without_color() {
        let label: Label = toml::from_str(r#"id = "1"
name = "Low Priority""#)
        .expect("failed to parse");
        assert_eq!(label.id, "1");
        assert!(label.color_id.is_none());
    }
}

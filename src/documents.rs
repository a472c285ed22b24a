//! Document browser state: filters, selection, notes and tags.

use crate::error::{Error, Result};
use crate::remote::documents::{Document, DocumentStatus};
use crate::utils::color::ColorExt;
use chrono::{DateTime, NaiveDate, Utc};
use eframe::egui::Color32;
use std::collections::HashMap;

const NOTE_MAX_CHARS: usize = 1000;
const TAG_NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub search: String,
    /// `None` means every status.
    pub status: Option<DocumentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
}

impl DocumentFilter {
    pub fn is_active(&self) -> bool {
        *self != DocumentFilter::default()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !doc.name.to_lowercase().contains(&needle)
                && !doc.company.to_lowercase().contains(&needle)
                && !doc.cnpj.contains(&self.search)
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if doc.status != status {
                return false;
            }
        }

        let day = doc.date.date_naive();
        if self.date_from.is_some_and(|from| day < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| day > to) {
            return false;
        }
        if self.value_min.is_some_and(|min| doc.value < min) {
            return false;
        }
        if self.value_max.is_some_and(|max| doc.value > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentStats {
    pub total: usize,
    pub total_value: f64,
    pub errors: usize,
    pub average_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTag {
    pub name: String,
    pub color: Color32,
}

impl DocumentTag {
    pub fn parse(name: &str, color: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > TAG_NAME_MAX_CHARS {
            return Err(Error::InvalidInput(format!(
                "Tag name must have 1 to {} characters",
                TAG_NAME_MAX_CHARS
            )));
        }
        let color = Color32::from_hex_rgb(color)
            .ok_or_else(|| Error::InvalidInput("Invalid color".to_string()))?;
        Ok(Self {
            name: name.to_string(),
            color,
        })
    }
}

#[derive(Debug, Default)]
pub struct DocumentBrowser {
    documents: Vec<Document>,
    pub filter: DocumentFilter,
    selected: Vec<String>,
    notes: HashMap<String, Vec<Note>>,
    tags: HashMap<String, Vec<DocumentTag>>,
}

impl DocumentBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document list. Selections of vanished documents are dropped.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.selected
            .retain(|id| documents.iter().any(|d| &d.id == id));
        self.documents = documents;
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn filtered(&self) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| self.filter.matches(d))
            .collect()
    }

    pub fn stats(&self) -> DocumentStats {
        let filtered = self.filtered();
        let total = filtered.len();
        let total_value: f64 = filtered.iter().map(|d| d.value).sum();
        DocumentStats {
            total,
            total_value,
            errors: filtered
                .iter()
                .filter(|d| d.status == DocumentStatus::Error)
                .count(),
            average_value: if total > 0 {
                total_value / total as f64
            } else {
                0.0
            },
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter = DocumentFilter::default();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Select every filtered document, or clear the selection when all of
    /// them are already selected.
    pub fn toggle_select_all(&mut self) {
        let filtered: Vec<String> = self.filtered().iter().map(|d| d.id.clone()).collect();
        if !filtered.is_empty() && self.selected.len() == filtered.len() {
            self.selected.clear();
        } else {
            self.selected = filtered;
        }
    }

    pub fn add_note(&mut self, document_id: &str, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() || content.chars().count() > NOTE_MAX_CHARS {
            return Err(Error::InvalidInput(format!(
                "Note must have 1 to {} characters",
                NOTE_MAX_CHARS
            )));
        }
        self.notes
            .entry(document_id.to_string())
            .or_default()
            .push(Note {
                content: content.to_string(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    pub fn notes(&self, document_id: &str) -> &[Note] {
        self.notes
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add_tag(&mut self, document_id: &str, name: &str, color: &str) -> Result<()> {
        let tag = DocumentTag::parse(name, color)?;
        let tags = self.tags.entry(document_id.to_string()).or_default();
        if !tags.iter().any(|t| t.name == tag.name) {
            tags.push(tag);
        }
        Ok(())
    }

    pub fn custom_tags(&self, document_id: &str) -> &[DocumentTag] {
        self.tags
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::documents::mock_documents;

    fn browser() -> DocumentBrowser {
        let mut browser = DocumentBrowser::new();
        browser.set_documents(mock_documents());
        browser
    }

    #[test]
    fn search_matches_name_company_and_cnpj() {
        let mut b = browser();
        b.filter.search = "tech".to_string();
        assert_eq!(b.filtered().len(), 1);

        b.filter.search = "98.765".to_string();
        let found = b.filtered();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");

        b.filter.search = "nfe_333".to_string();
        assert_eq!(b.filtered()[0].id, "5");
    }

    #[test]
    fn status_date_and_value_filters_combine() {
        let mut b = browser();
        b.filter.status = Some(DocumentStatus::Success);
        assert_eq!(b.filtered().len(), 3);

        b.filter.date_from = NaiveDate::from_ymd_opt(2024, 1, 12);
        assert_eq!(b.filtered().len(), 2);

        b.filter.value_min = Some(20000.0);
        let found = b.filtered();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "4");

        b.clear_filters();
        assert!(!b.filter.is_active());
        assert_eq!(b.filtered().len(), 5);
    }

    #[test]
    fn date_to_is_inclusive() {
        let mut b = browser();
        b.filter.date_to = NaiveDate::from_ymd_opt(2024, 1, 12);
        let ids: Vec<_> = b.filtered().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["4", "5"]);
    }

    #[test]
    fn stats_follow_filtered_set() {
        let mut b = browser();
        let stats = b.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.errors, 1);
        assert!((stats.total_value - 72421.25).abs() < 1e-6);

        b.filter.search = "nothing matches this".to_string();
        assert_eq!(b.stats(), DocumentStats::default());
    }

    #[test]
    fn select_all_toggles() {
        let mut b = browser();
        b.toggle_selection("1");
        assert!(b.is_selected("1"));
        b.toggle_select_all();
        assert_eq!(b.selected().len(), 5);
        b.toggle_select_all();
        assert!(b.selected().is_empty());
    }

    #[test]
    fn notes_are_trimmed_and_bounded() {
        let mut b = browser();
        b.add_note("1", "  check ICMS  ").unwrap();
        assert_eq!(b.notes("1")[0].content, "check ICMS");
        assert!(b.add_note("1", "   ").is_err());
        assert!(b.add_note("1", &"x".repeat(1001)).is_err());
        assert!(b.notes("2").is_empty());
    }

    #[test]
    fn tags_need_hex_color() {
        let mut b = browser();
        b.add_tag("1", "Urgente", "#FF0000").unwrap();
        b.add_tag("1", "Urgente", "#00ff00").unwrap();
        assert_eq!(b.custom_tags("1").len(), 1);
        assert_eq!(b.custom_tags("1")[0].color, Color32::from_rgb(255, 0, 0));
        assert!(b.add_tag("1", "Bad", "red").is_err());
        assert!(b.add_tag("1", "", "#FFFFFF").is_err());
    }
}

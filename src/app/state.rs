use crate::chat::Conversation;
use crate::documents::DocumentBrowser;
use crate::remote::analysis::AiAnalysis;
use crate::remote::chat::ChatReply;
use crate::remote::dashboard::DashboardData;
use crate::remote::documents::Document;
use crate::remote::home::HomeStats;
use crate::upload::CandidateFile;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Upload,
    Dashboard,
    Documents,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Upload, Tab::Dashboard, Tab::Documents, Tab::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Upload => "📤 Upload",
            Tab::Dashboard => "📊 Dashboard",
            Tab::Documents => "📄 Documents",
            Tab::Chat => "💬 Chat",
        }
    }
}

#[derive(Default)]
pub struct UploadViewState {
    pub url_input: String,
    pub folder_path: Option<String>,
    pub folder_receiver: Option<Receiver<Vec<CandidateFile>>>,
    pub show_details: bool,
}

impl UploadViewState {
    pub fn is_scanning(&self) -> bool {
        self.folder_receiver.is_some()
    }
}

/// Latest values delivered by the background pollers.
#[derive(Default)]
pub struct RemoteState {
    pub dashboard: Option<DashboardData>,
    pub home: HomeStats,
    pub dashboard_receiver: Option<Receiver<DashboardData>>,
    pub home_receiver: Option<Receiver<HomeStats>>,
    pub documents_receiver: Option<Receiver<Vec<Document>>>,
}

/// Text fields behind the document filters. Parsed into the browser's
/// filter every frame; unparsable input leaves that bound unset.
#[derive(Default)]
pub struct FilterInputs {
    pub date_from: String,
    pub date_to: String,
    pub value_min: String,
    pub value_max: String,
}

impl FilterInputs {
    pub fn date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    pub fn amount(raw: &str) -> Option<f64> {
        raw.trim().replace(',', ".").parse().ok()
    }

    pub fn clear(&mut self) {
        *self = FilterInputs::default();
    }

    pub fn is_blank(&self) -> bool {
        [&self.date_from, &self.date_to, &self.value_min, &self.value_max]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

pub struct DocumentsViewState {
    pub browser: DocumentBrowser,
    pub inputs: FilterInputs,
    pub open_document: Option<String>,
    pub note_input: String,
    pub tag_name_input: String,
    pub tag_color_input: String,
    pub analyses: HashMap<String, AiAnalysis>,
    pub analysis_receiver: Option<Receiver<(String, AiAnalysis)>>,
}

impl Default for DocumentsViewState {
    fn default() -> Self {
        Self {
            browser: DocumentBrowser::new(),
            inputs: FilterInputs::default(),
            open_document: None,
            note_input: String::new(),
            tag_name_input: String::new(),
            tag_color_input: "#A159E1".to_string(),
            analyses: HashMap::new(),
            analysis_receiver: None,
        }
    }
}

#[derive(Default)]
pub struct ChatViewState {
    pub conversation: Conversation,
    pub input: String,
    pub reply_receiver: Option<Receiver<ChatReply>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_inputs() {
        assert_eq!(
            FilterInputs::date(" 2024-01-12 "),
            NaiveDate::from_ymd_opt(2024, 1, 12)
        );
        assert_eq!(FilterInputs::date("12/01/2024"), None);
        assert_eq!(FilterInputs::amount("1500,5"), Some(1500.5));
        assert_eq!(FilterInputs::amount(""), None);
    }

    #[test]
    fn unparsable_input_still_counts_as_filtering() {
        let mut inputs = FilterInputs::default();
        assert!(inputs.is_blank());

        inputs.date_from = "12/01".to_string();
        assert_eq!(FilterInputs::date(&inputs.date_from), None);
        assert!(!inputs.is_blank());

        inputs.clear();
        inputs.value_max = "   ".to_string();
        assert!(inputs.is_blank());
    }

    #[test]
    fn scanning_tracks_the_folder_receiver() {
        let mut upload = UploadViewState::default();
        assert!(!upload.is_scanning());

        let (_sender, receiver) = std::sync::mpsc::channel();
        upload.folder_receiver = Some(receiver);
        assert!(upload.is_scanning());
    }
}

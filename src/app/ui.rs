use super::{NfeApp, Tab};
use crate::chat::{Sender, MAX_MESSAGE_CHARS, SUGGESTED_QUESTIONS};
use crate::export::ExportFormat;
use crate::notify::{Toast, ToastKind};
use crate::remote::analysis::{AiAnalysis, Finding};
use crate::remote::dashboard::DashboardData;
use crate::remote::documents::{Document, DocumentStatus};
use crate::upload::{RecordId, RecordStatus, UploadRecord};
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align2, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
const WARNING: Color32 = Color32::from_rgb(230, 160, 30);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

enum RecordAction {
    Pause,
    Resume,
    Retry,
    Remove,
    Preview,
}

impl NfeApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui.selectable_label(self.tab == tab, tab.title()).clicked() {
                        self.tab = tab;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let home = &self.remote.home;
                    ui.label(
                        RichText::new(format!(
                            "{} documents | {} analyzed | {}",
                            home.total_documents,
                            home.analyzed_documents,
                            FileSizeUtils::format_brl(home.total_value)
                        ))
                        .color(MUTED),
                    );
                });
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::Upload => self.render_upload(ui),
                    Tab::Dashboard => self.render_dashboard(ui),
                    Tab::Documents => self.render_documents(ui),
                    Tab::Chat => self.render_chat(ui),
                });
        });

        self.render_document_window(ctx);
        self.render_toasts(ctx);
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.heading("NF-e Upload");
            ui.add_space(5.0);
            ui.label(
                RichText::new("Send ZIP archives with your fiscal documents")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });
        ui.add_space(20.0);

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.label(RichText::new("⬇ Drop ZIP files anywhere in this window").size(16.0));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("📄 Select Files").clicked() {
                        if let Some(paths) = FileDialog::new()
                            .add_filter("ZIP archives", &["zip"])
                            .pick_files()
                        {
                            self.add_paths(paths);
                        }
                    }
                    let scanning = self.upload.is_scanning();
                    if ui
                        .add_enabled(!scanning, egui::Button::new("📁 Select Folder"))
                        .clicked()
                    {
                        if let Some(folder) = FileDialog::new().pick_folder() {
                            self.add_folder(folder);
                        }
                    }
                    if scanning {
                        ui.spinner();
                        ui.label("Scanning folder...");
                    }
                });
                if let Some(folder) = &self.upload.folder_path {
                    ui.label(format!("Last folder: {}", folder));
                }
                ui.add_space(10.0);
            });
        });

        ui.add_space(10.0);
        ui.group(|ui| {
            ui.label("Upload from URL");
            ui.horizontal(|ui| {
                let edit = egui::TextEdit::singleline(&mut self.upload.url_input)
                    .hint_text("https://example.com/notas.zip")
                    .desired_width(ui.available_width() - 120.0);
                let response = ui.add(edit);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("🔗 Upload").clicked() || submitted {
                    self.submit_url();
                }
            });
        });

        if self.pipeline.records().is_empty() {
            return;
        }

        ui.add_space(20.0);
        ui.group(|ui| {
            let stats = self.pipeline.stats();
            ui.label(format!(
                "Total: {} | ✅ Success: {} | ❌ Errors: {} | ⏳ In progress: {}",
                stats.total, stats.succeeded, stats.errored, stats.in_flight
            ));
            let progress = self.pipeline.aggregate_progress() as f32 / 100.0;
            ui.add(
                egui::ProgressBar::new(progress)
                    .show_percentage()
                    .animate(stats.in_flight > 0)
                    .fill(ACCENT),
            );
            ui.horizontal(|ui| {
                if ui.button("🗑 Clear All").clicked() {
                    self.pipeline.clear_all();
                }
                if ui
                    .button(if self.upload.show_details {
                        "Hide Details"
                    } else {
                        "Show Details"
                    })
                    .clicked()
                {
                    self.upload.show_details = !self.upload.show_details;
                }
            });
        });

        ui.add_space(10.0);
        let mut actions = Vec::new();
        for record in self.pipeline.records() {
            if let Some(action) = Self::render_record(ui, record, self.upload.show_details) {
                actions.push((record.id, action));
            }
        }
        for (id, action) in actions {
            self.apply_record_action(id, action);
        }
    }

    fn render_record(
        ui: &mut egui::Ui,
        record: &UploadRecord,
        show_details: bool,
    ) -> Option<RecordAction> {
        let mut action = None;
        egui::Frame::none()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (icon, color) = match record.status {
                        RecordStatus::Uploading | RecordStatus::Processing => ("⏳", MUTED),
                        RecordStatus::Paused => ("⏸", WARNING),
                        RecordStatus::Success => ("✅", SUCCESS),
                        RecordStatus::Error => ("❌", ERROR),
                    };
                    ui.label(icon);
                    ui.colored_label(color, &record.name);
                    ui.label(
                        RichText::new(FileSizeUtils::format_size(record.size)).color(MUTED),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✖").on_hover_text("Remove").clicked() {
                            action = Some(RecordAction::Remove);
                        }
                        match record.status {
                            RecordStatus::Uploading => {
                                if ui.small_button("⏸ Pause").clicked() {
                                    action = Some(RecordAction::Pause);
                                }
                            }
                            RecordStatus::Paused => {
                                if ui.small_button("▶ Resume").clicked() {
                                    action = Some(RecordAction::Resume);
                                }
                            }
                            RecordStatus::Error => {
                                if ui.small_button("🔄 Retry").clicked() {
                                    action = Some(RecordAction::Retry);
                                }
                            }
                            RecordStatus::Success if record.content.is_none() => {
                                if ui.small_button("👁 Preview").clicked() {
                                    action = Some(RecordAction::Preview);
                                }
                            }
                            _ => {}
                        }
                    });
                });

                if record.status != RecordStatus::Success {
                    ui.add(
                        egui::ProgressBar::new(record.progress as f32 / 100.0)
                            .show_percentage()
                            .fill(ACCENT),
                    );
                }
                if let Some(message) = &record.message {
                    let color = if record.status == RecordStatus::Error {
                        ERROR
                    } else {
                        SUCCESS
                    };
                    ui.colored_label(color, message);
                }
                if let Some(content) = &record.content {
                    egui::CollapsingHeader::new("Archive contents")
                        .id_source(record.id)
                        .default_open(true)
                        .show(ui, |ui| {
                            ui.label(RichText::new(content).monospace().small());
                        });
                }
                if show_details {
                    ui.label(RichText::new(format!("ID: {}", record.id)).small().color(MUTED));
                }
            });
        ui.add_space(4.0);
        action
    }

    fn apply_record_action(&mut self, id: RecordId, action: RecordAction) {
        match action {
            RecordAction::Pause => self.pipeline.pause(id),
            RecordAction::Resume => self.pipeline.resume(id),
            RecordAction::Retry => self.pipeline.retry(id),
            RecordAction::Remove => self.pipeline.remove(id),
            RecordAction::Preview => self.pipeline.request_preview(id),
        };
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.heading("Dashboard");
        ui.add_space(10.0);

        let Some(data) = &self.remote.dashboard else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading dashboard...");
            });
            return;
        };
        Self::render_kpis(ui, data);

        ui.add_space(16.0);
        ui.columns(2, |columns| {
            columns[0].group(|ui| {
                ui.strong("Documents per month");
                let max = data
                    .documents_per_month
                    .iter()
                    .map(|m| m.total)
                    .max()
                    .unwrap_or(0)
                    .max(1);
                for month in &data.documents_per_month {
                    ui.horizontal(|ui| {
                        ui.label(&month.month);
                        ui.add(
                            egui::ProgressBar::new(month.total as f32 / max as f32)
                                .text(month.total.to_string())
                                .fill(ACCENT),
                        );
                    });
                }
            });
            columns[1].group(|ui| {
                ui.strong("Supplier distribution");
                for share in &data.supplier_distribution {
                    ui.horizontal(|ui| {
                        ui.label(&share.supplier);
                        ui.add(
                            egui::ProgressBar::new(share.percentage as f32 / 100.0)
                                .text(format!("{:.1}%", share.percentage)),
                        );
                    });
                }
            });
        });

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.strong("Total value evolution");
            egui::Grid::new("value_evolution").striped(true).show(ui, |ui| {
                for point in &data.total_value_evolution {
                    ui.label(&point.month);
                    ui.label(FileSizeUtils::format_brl(point.value));
                    ui.end_row();
                }
            });
        });

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.strong("Taxes");
            let taxes = &data.taxes;
            if taxes.available {
                egui::Grid::new("taxes").show(ui, |ui| {
                    for (name, value) in [
                        ("ICMS", taxes.icms),
                        ("IPI", taxes.ipi),
                        ("PIS", taxes.pis),
                        ("COFINS", taxes.cofins),
                    ] {
                        ui.label(name);
                        ui.label(value.map(FileSizeUtils::format_brl).unwrap_or_else(|| "-".to_string()));
                        ui.end_row();
                    }
                });
            } else {
                ui.colored_label(MUTED, &taxes.message);
            }
        });
    }

    fn render_kpis(ui: &mut egui::Ui, data: &DashboardData) {
        let kpis = &data.kpis;
        let delta = |pct: f64| {
            let color = if pct >= 0.0 { SUCCESS } else { ERROR };
            RichText::new(format!("{:+.1}% vs previous period", pct)).color(color)
        };

        ui.columns(4, |columns| {
            columns[0].group(|ui| {
                ui.label("Total documents");
                ui.heading(kpis.total_documents.to_string());
                ui.label(delta(kpis.total_documents_delta_pct));
            });
            columns[1].group(|ui| {
                ui.label("Total value");
                ui.heading(FileSizeUtils::format_brl(kpis.total_value));
                ui.label(delta(kpis.total_value_delta_pct));
            });
            columns[2].group(|ui| {
                ui.label("Error rate");
                ui.heading(format!("{:.1}%", kpis.error_rate_pct));
            });
            columns[3].group(|ui| {
                ui.label("Automatic processing");
                ui.heading(format!("{:.1}%", kpis.automatic_processing_pct));
            });
        });
    }

    fn status_color(status: DocumentStatus) -> Color32 {
        match status {
            DocumentStatus::Success => SUCCESS,
            DocumentStatus::Warning => WARNING,
            DocumentStatus::Error => ERROR,
        }
    }

    fn render_documents(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.heading("Documents");
        ui.add_space(10.0);

        ui.group(|ui| {
            let docs = &mut self.documents;
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut docs.browser.filter.search)
                        .hint_text("Search by name, company or CNPJ"),
                );
                let selected = docs
                    .browser
                    .filter
                    .status
                    .map(DocumentStatus::label)
                    .unwrap_or("All");
                egui::ComboBox::from_id_source("status_filter")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut docs.browser.filter.status, None, "All");
                        for status in DocumentStatus::ALL {
                            ui.selectable_value(
                                &mut docs.browser.filter.status,
                                Some(status),
                                status.label(),
                            );
                        }
                    });
            });
            ui.horizontal(|ui| {
                ui.label("From");
                ui.add(
                    egui::TextEdit::singleline(&mut docs.inputs.date_from)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(90.0),
                );
                ui.label("To");
                ui.add(
                    egui::TextEdit::singleline(&mut docs.inputs.date_to)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(90.0),
                );
                ui.label("Value");
                ui.add(
                    egui::TextEdit::singleline(&mut docs.inputs.value_min)
                        .hint_text("min")
                        .desired_width(70.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut docs.inputs.value_max)
                        .hint_text("max")
                        .desired_width(70.0),
                );
                let filtering = docs.browser.filter.is_active() || !docs.inputs.is_blank();
                if ui
                    .add_enabled(filtering, egui::Button::new("Clear filters"))
                    .clicked()
                {
                    docs.inputs.clear();
                    docs.browser.clear_filters();
                }
            });
        });

        let stats = self.documents.browser.stats();
        ui.add_space(8.0);
        ui.label(format!(
            "Total: {} | Value: {} | Errors: {} | Average: {}",
            stats.total,
            FileSizeUtils::format_brl(stats.total_value),
            stats.errors,
            FileSizeUtils::format_brl(stats.average_value)
        ));

        ui.horizontal(|ui| {
            if ui.button("☑ Select all").clicked() {
                self.documents.browser.toggle_select_all();
            }
            let count = self.documents.browser.selected().len();
            if count > 0 {
                ui.label(format!("{} selected", count));
            }
        });
        ui.add_space(8.0);

        let rows: Vec<Document> = self
            .documents
            .browser
            .filtered()
            .into_iter()
            .cloned()
            .collect();
        if rows.is_empty() {
            ui.colored_label(MUTED, "No documents match the current filters.");
            return;
        }

        let mut toggled = Vec::new();
        let mut opened = None;
        egui::Grid::new("documents")
            .striped(true)
            .num_columns(8)
            .show(ui, |ui| {
                for header in ["", "Name", "Company", "CNPJ", "Value", "Status", "Date", ""] {
                    ui.strong(header);
                }
                ui.end_row();

                for doc in &rows {
                    let mut checked = self.documents.browser.is_selected(&doc.id);
                    if ui.checkbox(&mut checked, "").changed() {
                        toggled.push(doc.id.clone());
                    }
                    ui.label(&doc.name);
                    ui.label(&doc.company);
                    ui.label(&doc.cnpj);
                    ui.label(FileSizeUtils::format_brl(doc.value));
                    ui.colored_label(Self::status_color(doc.status), doc.status.label());
                    ui.label(doc.date.format("%d/%m/%Y").to_string());
                    if ui.small_button("Details").clicked() {
                        opened = Some(doc.id.clone());
                    }
                    ui.end_row();
                }
            });

        for id in toggled {
            self.documents.browser.toggle_selection(&id);
        }
        if let Some(id) = opened {
            self.open_document(id);
        }
    }

    fn render_document_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.documents.open_document.clone() else {
            return;
        };
        let Some(doc) = self.documents.browser.get(&id).cloned() else {
            self.documents.open_document = None;
            return;
        };

        let mut open = true;
        let mut add_note = false;
        let mut add_tag = false;
        egui::Window::new(&doc.name)
            .id(egui::Id::new("document_details"))
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                egui::Grid::new("document_fields").show(ui, |ui| {
                    for (label, value) in [
                        ("Company", doc.company.clone()),
                        ("CNPJ", doc.cnpj.clone()),
                        ("Value", FileSizeUtils::format_brl(doc.value)),
                        ("ICMS", FileSizeUtils::format_brl(doc.icms)),
                        ("Items", doc.items.to_string()),
                        ("Date", doc.date.format("%d/%m/%Y").to_string()),
                    ] {
                        ui.label(label);
                        ui.label(value);
                        ui.end_row();
                    }
                    ui.label("Status");
                    ui.colored_label(Self::status_color(doc.status), doc.status.label());
                    ui.end_row();
                });

                ui.horizontal_wrapped(|ui| {
                    for tag in &doc.tags {
                        ui.label(RichText::new(tag).background_color(ui.visuals().faint_bg_color));
                    }
                    for tag in self.documents.browser.custom_tags(&id) {
                        ui.label(RichText::new(&tag.name).color(Color32::WHITE).background_color(tag.color));
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.documents.tag_name_input)
                            .hint_text("New tag")
                            .desired_width(140.0),
                    );
                    ui.add(
                        egui::TextEdit::singleline(&mut self.documents.tag_color_input)
                            .desired_width(70.0),
                    );
                    add_tag = ui.button("Add tag").clicked();
                });

                ui.separator();
                ui.strong("AI analysis");
                match self.documents.analyses.get(&id) {
                    Some(analysis) => Self::render_analysis(ui, analysis),
                    None => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Analyzing...");
                        });
                    }
                }

                ui.separator();
                ui.strong("Notes");
                for note in self.documents.browser.notes(&id) {
                    ui.label(
                        RichText::new(note.created_at.format("%d/%m/%Y %H:%M").to_string())
                            .small()
                            .color(MUTED),
                    );
                    ui.label(&note.content);
                }
                ui.add(
                    egui::TextEdit::multiline(&mut self.documents.note_input)
                        .hint_text("Add a note")
                        .desired_rows(2),
                );
                add_note = ui.button("Add note").clicked();
            });

        if add_tag {
            let docs = &mut self.documents;
            match docs
                .browser
                .add_tag(&id, &docs.tag_name_input, &docs.tag_color_input)
            {
                Ok(()) => docs.tag_name_input.clear(),
                Err(e) => self.notifier.error("Invalid tag", e.to_string()),
            }
        }
        if add_note {
            let docs = &mut self.documents;
            match docs.browser.add_note(&id, &docs.note_input) {
                Ok(()) => {
                    docs.note_input.clear();
                    self.notifier.success("Note added", "The note was saved.");
                }
                Err(e) => self.notifier.error("Invalid note", e.to_string()),
            }
        }
        if !open {
            self.documents.open_document = None;
        }
    }

    fn render_analysis(ui: &mut egui::Ui, analysis: &AiAnalysis) {
        if let Some(summary) = &analysis.summary {
            ui.label(summary);
        }
        let sections: [(&str, &[Finding], Color32); 4] = [
            ("Problems", &analysis.problems, ERROR),
            ("Risks", &analysis.risks, WARNING),
            ("Aggressors", &analysis.aggressors, ACCENT),
            ("Recommendations", &analysis.recommendations, SUCCESS),
        ];
        for (title, findings, color) in sections {
            if findings.is_empty() {
                continue;
            }
            ui.add_space(4.0);
            ui.colored_label(color, title);
            for finding in findings {
                ui.horizontal_wrapped(|ui| {
                    ui.strong(finding.heading());
                    if let Some(description) = &finding.description {
                        ui.label(description);
                    }
                    if let Some(difference) = &finding.difference {
                        ui.colored_label(ERROR, difference);
                    }
                });
            }
        }
    }

    fn render_chat(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.heading("Fiscal AI Chat");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.clear_chat();
                }
                if ui.button("Export PDF").clicked() {
                    self.export_chat(ExportFormat::Pdf);
                }
                if ui.button("Export CSV").clicked() {
                    self.export_chat(ExportFormat::Csv);
                }
            });
        });
        ui.add_space(10.0);

        egui::ScrollArea::vertical()
            .id_source("chat_messages")
            .max_height((ui.available_height() - 140.0).max(200.0))
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in self.chat.conversation.messages() {
                    let (name, color) = match message.sender {
                        Sender::User => (message.sender.label(), ACCENT),
                        Sender::Bot => (message.sender.label(), SUCCESS),
                    };
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.colored_label(color, name);
                                ui.label(
                                    RichText::new(message.timestamp.format("%H:%M").to_string())
                                        .small()
                                        .color(MUTED),
                                );
                            });
                            if message.is_error {
                                ui.colored_label(ERROR, &message.text);
                            } else {
                                ui.label(&message.text);
                            }
                        });
                    ui.add_space(4.0);
                }
                if self.chat.conversation.is_awaiting_reply() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Fiscal AI is typing...");
                    });
                }
            });

        if !self.chat.conversation.has_exchange() {
            ui.add_space(8.0);
            ui.label(RichText::new("Suggested questions:").color(MUTED));
            ui.horizontal_wrapped(|ui| {
                for question in SUGGESTED_QUESTIONS {
                    if ui.button(question).clicked() {
                        self.chat.input = question.to_string();
                    }
                }
            });
        }

        ui.add_space(8.0);
        let chars = self.chat.input.chars().count();
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.chat.input)
                .hint_text("Ask about your invoices (Ctrl+Enter to send)")
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        let shortcut = response.has_focus()
            && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));

        ui.horizontal(|ui| {
            let over_limit = chars > MAX_MESSAGE_CHARS;
            ui.colored_label(
                if over_limit { ERROR } else { MUTED },
                format!("{}/{}", chars, MAX_MESSAGE_CHARS),
            );
            let can_send = !self.chat.conversation.is_awaiting_reply()
                && !self.chat.input.trim().is_empty()
                && !over_limit;
            ui.add_enabled_ui(can_send, |ui| {
                if ui.button("Send ➤").clicked() || (can_send && shortcut) {
                    self.send_chat_message();
                }
            });
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let toasts = self.notifier.bus().visible();
        if toasts.is_empty() {
            return;
        }
        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &toasts {
                    self.render_toast(ui, toast);
                    ui.add_space(6.0);
                }
            });
    }

    fn render_toast(&self, ui: &mut egui::Ui, toast: &Toast) {
        let (icon, color) = match toast.kind {
            ToastKind::Info => ("ℹ", ui.visuals().text_color()),
            ToastKind::Success => ("✅", SUCCESS),
            ToastKind::Destructive => ("❌", ERROR),
            ToastKind::Celebration => ("🎉", ACCENT),
        };
        egui::Frame::popup(ui.style()).show(ui, |ui| {
            ui.set_max_width(320.0);
            ui.horizontal(|ui| {
                ui.label(icon);
                ui.colored_label(color, RichText::new(&toast.title).strong());
                if ui.small_button("✖").clicked() {
                    self.notifier.bus().dismiss(toast.id);
                }
            });
            if !toast.description.is_empty() {
                ui.label(&toast.description);
            }
        });
    }
}

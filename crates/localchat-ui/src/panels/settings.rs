//! Settings panel — Ollama server, model and persona.

use egui::{self, RichText, Vec2};
use localchat_types::config::{ChatConfig, DEFAULT_BASE_URL};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing to do
    None,
    /// Ask the backend which models are installed
    RefreshModels,
    /// Rebuild the backend client and start a new chat with the edited config
    Apply,
}

/// Render the settings panel. Edits `config` in place; the caller decides
/// when the edits take effect.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ChatConfig,
    available_models: &[String],
    busy: bool,
) -> SettingsAction {
    let mut action = SettingsAction::None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Backend Section ──────────────────────────────
            ui.label(RichText::new("Ollama").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Server URL").color(TEXT_SECONDARY).small());
            ui.add(
                egui::TextEdit::singleline(&mut config.backend.base_url)
                    .hint_text(DEFAULT_BASE_URL),
            );

            ui.add_space(4.0);

            ui.label(RichText::new("Model").color(TEXT_SECONDARY).small());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut config.backend.model)
                        .desired_width(ui.available_width() - 70.0),
                );
                if ui.small_button("Refresh").clicked() {
                    action = SettingsAction::RefreshModels;
                }
            });

            if !available_models.is_empty() {
                egui::ComboBox::from_id_salt("installed_models")
                    .selected_text("Installed models")
                    .show_ui(ui, |ui| {
                        for model in available_models {
                            ui.selectable_value(&mut config.backend.model, model.clone(), model);
                        }
                    });
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Persona Section ──────────────────────────────
            ui.label(RichText::new("System prompt").color(ACCENT).strong());
            ui.add(
                egui::TextEdit::multiline(&mut config.system_prompt)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.label(
                RichText::new("Applies to new chats only.")
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            // ── Apply Button ─────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add_enabled(
                    !busy,
                    egui::Button::new(
                        RichText::new("Apply & new chat")
                            .color(TEXT_PRIMARY)
                            .strong(),
                    )
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(140.0, 28.0)),
                );
                if btn.clicked() {
                    action = SettingsAction::Apply;
                }
                if busy {
                    ui.label(
                        RichText::new("Waiting for the current reply")
                            .color(WARNING)
                            .small(),
                    );
                }
            });
        });

    action
}

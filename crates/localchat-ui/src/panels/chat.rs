//! Chat panel — transcript, streamed reply, attachments and input field.

use egui::{self, Align, Color32, Layout, RichText, ScrollArea, Vec2};
use localchat_core::queue::InboundMessage;
use localchat_types::attachment::Attachment;
use crate::state::{ChatEntry, EntryRole, UiState};
use crate::theme::*;

/// What the caller should do after rendering the chat panel
#[derive(Debug, PartialEq, Eq)]
pub enum ChatAction {
    None,
    /// The user submitted a message
    Send(InboundMessage),
    /// The user asked for a fresh session
    NewChat,
}

/// Render the chat panel and report what the user did.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> ChatAction {
    let mut action = ChatAction::None;

    collect_dropped_files(ui.ctx(), state);

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new("Local Chat")
                            .color(TEXT_PRIMARY)
                            .strong(),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .small_button(RichText::new("New chat").color(TEXT_SECONDARY))
                            .clicked()
                        {
                            action = ChatAction::NewChat;
                        }
                        let status_color = match state.turn_status {
                            localchat_core::runtime::TurnState::Error(_) => ERROR,
                            _ if state.is_busy() => WARNING,
                            _ => SUCCESS,
                        };
                        ui.label(
                            RichText::new(&state.status_text)
                                .color(status_color)
                                .small(),
                        );
                    });
                });

                ui.separator();

                // Messages area
                let reserved = if state.pending_attachments.is_empty() { 60.0 } else { 90.0 };
                let available_height = ui.available_height() - reserved;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &state.messages {
                            render_message(ui, entry);
                            ui.add_space(4.0);
                        }

                        if !state.streaming_text.is_empty() {
                            egui::Frame::default()
                                .fill(BG_SECONDARY)
                                .corner_radius(PANEL_ROUNDING)
                                .inner_margin(BUBBLE_PADDING)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new(&state.streaming_text)
                                            .color(TEXT_PRIMARY),
                                    );
                                    ui.label(RichText::new("▌").color(ACCENT).strong());
                                });
                        }
                    });

                ui.add_space(8.0);

                // Pending attachments
                if !state.pending_attachments.is_empty() {
                    let mut remove = None;
                    ui.horizontal_wrapped(|ui| {
                        for (i, attachment) in state.pending_attachments.iter().enumerate() {
                            let label = format!("{} ✕", attachment.name);
                            if ui
                                .small_button(RichText::new(label).color(TEXT_SECONDARY))
                                .on_hover_text(attachment.mime.as_str())
                                .clicked()
                            {
                                remove = Some(i);
                            }
                        }
                    });
                    if let Some(i) = remove {
                        state.pending_attachments.remove(i);
                    }
                }

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Type a message, or drop an image...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let send_enabled = !state.input_text.trim().is_empty();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click. Messages sent while a
                    // turn is running are queued by the app.
                    if (response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && send_enabled)
                        || send_btn.clicked()
                    {
                        if let Some(msg) = take_outgoing(state) {
                            action = ChatAction::Send(msg);
                        }
                        response.request_focus();
                    }
                });
            });
        });

    action
}

/// Move the input text and pending attachments into an outbound message.
/// None when there is no text. The transcript shows it once its turn starts.
pub fn take_outgoing(state: &mut UiState) -> Option<InboundMessage> {
    let text = state.input_text.trim().to_string();
    if text.is_empty() {
        return None;
    }
    let attachments = std::mem::take(&mut state.pending_attachments);
    state.input_text.clear();
    Some(InboundMessage::new(text, attachments))
}

fn collect_dropped_files(ctx: &egui::Context, state: &mut UiState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    for file in &dropped {
        match attachment_from_dropped(file) {
            Some(attachment) => {
                log::info!("Attached {} ({})", attachment.name, attachment.mime);
                state.pending_attachments.push(attachment);
            }
            None => log::warn!("Dropped file {:?} has no readable content", file.name),
        }
    }
}

/// Convert a file dropped onto the window. Browsers hand over bytes;
/// a native drop only carries a path, which is read here since the
/// backend takes image data rather than paths.
pub fn attachment_from_dropped(file: &egui::DroppedFile) -> Option<Attachment> {
    let name = if file.name.is_empty() {
        file.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        file.name.clone()
    };
    let mime = if file.mime.is_empty() {
        guess_mime(&name).to_string()
    } else {
        file.mime.clone()
    };

    if let Some(bytes) = &file.bytes {
        return Some(Attachment::from_bytes(name, mime, bytes.to_vec()));
    }
    let path = file.path.as_ref()?;
    match std::fs::read(path) {
        Ok(bytes) => Some(Attachment::from_bytes(name, mime, bytes)),
        Err(e) => {
            log::warn!("Could not read dropped file {}: {}", path.display(), e);
            None
        }
    }
}

/// MIME type from a file extension, for drops that carry none
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "txt" | "md" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn render_message(ui: &mut egui::Ui, entry: &ChatEntry) {
    let (label, label_color, bg): (&str, Color32, Color32) = match entry.role {
        EntryRole::User => ("You", ACCENT, BG_USER),
        EntryRole::Assistant => ("Assistant", SUCCESS, BG_SECONDARY),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(BUBBLE_PADDING)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&entry.content).color(TEXT_PRIMARY));
            if !entry.attachment_names.is_empty() {
                ui.label(
                    RichText::new(format!("📎 {}", entry.attachment_names.join(", ")))
                        .color(TEXT_SECONDARY)
                        .small(),
                );
            }
        });
}

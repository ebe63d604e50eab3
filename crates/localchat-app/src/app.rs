//! Main egui application — composes the panels and drives the chat runtime.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use localchat_core::event_bus::EventBus;
use localchat_core::ports::{DisplayPort, InferencePort};
use localchat_core::queue::{InboundMessage, TurnQueue, drain_turns};
use localchat_core::runtime::ChatRuntime;
use localchat_platform::llm::OllamaProvider;
use localchat_types::config::ChatConfig;
use localchat_ui::panels::chat::{self, ChatAction};
use localchat_ui::panels::settings::{self, SettingsAction};
use localchat_ui::state::UiState;
use localchat_ui::theme;

use crate::display::EventBusDisplay;

/// Result slot filled by the async model listing
type ModelSlot = Rc<RefCell<Option<Result<Vec<String>, String>>>>;

/// The config being edited in the settings panel, and the one in use.
pub struct ConfigSlots {
    pub draft: ChatConfig,
    applied: ChatConfig,
}

impl ConfigSlots {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            draft: config.clone(),
            applied: config,
        }
    }

    pub fn applied(&self) -> &ChatConfig {
        &self.applied
    }

    /// Promote the draft to the config in use.
    pub fn apply(&mut self) -> &ChatConfig {
        self.applied = self.draft.clone();
        &self.applied
    }

    /// Top bar text; always describes the applied backend.
    pub fn backend_label(&self) -> String {
        format!(
            "Model: {} | Server: {}",
            self.applied.backend.model, self.applied.backend.base_url
        )
    }
}

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    config: ConfigSlots,
    event_bus: EventBus,
    runtime: Rc<RefCell<ChatRuntime>>,
    queue: TurnQueue,
    llm: Rc<dyn InferencePort>,
    display: Rc<dyn DisplayPort>,
    models: ModelSlot,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = ChatConfig::default();
        let event_bus = EventBus::new();
        let runtime = ChatRuntime::new(config.clone(), event_bus.clone());

        Self {
            ui_state: UiState::new(),
            llm: Rc::new(OllamaProvider::new(config.backend.clone())),
            display: Rc::new(EventBusDisplay::new(event_bus.clone())),
            config: ConfigSlots::new(config),
            event_bus,
            runtime: Rc::new(RefCell::new(runtime)),
            queue: TurnQueue::new(),
            models: Rc::new(RefCell::new(None)),
            first_frame: true,
        }
    }

    fn rebuild_llm(&mut self) {
        self.llm = Rc::new(OllamaProvider::new(self.config.applied().backend.clone()));
    }

    /// Close the current session and start a new one with a greeting.
    fn start_chat(&mut self, ctx: &egui::Context) {
        if self.queue.is_draining() {
            log::warn!("New chat requested while a reply is pending; ignoring");
            self.ui_state.status_text = "Wait for the current reply to finish".to_string();
            return;
        }

        let runtime = self.runtime.clone();
        let display = self.display.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match runtime.try_borrow_mut() {
                Ok(mut rt) => rt.on_chat_start(display.as_ref()).await,
                Err(_) => log::warn!("Chat runtime busy; new chat not started"),
            }
            ctx.request_repaint();
        });
    }

    /// Queue a user message; start draining if nothing is running.
    fn dispatch_message(&self, msg: InboundMessage, ctx: &egui::Context) {
        if !self.queue.enqueue(msg) {
            log::debug!("Turn in progress; message queued ({} waiting)", self.queue.len());
            return;
        }

        let runtime = self.runtime.clone();
        let queue = self.queue.clone();
        let llm = self.llm.clone();
        let display = self.display.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcomes = drain_turns(&runtime, &queue, llm.as_ref(), display.as_ref()).await;
            let failed = outcomes.iter().filter(|o| !o.is_reply()).count();
            if failed > 0 {
                log::warn!("{} of {} turns failed", failed, outcomes.len());
            }
            ctx.request_repaint();
        });
    }

    /// Ask the backend which models it has installed (async)
    fn refresh_models(&self, ctx: &egui::Context) {
        let llm = self.llm.clone();
        let slot = self.models.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = llm.list_models().await.map_err(|e| e.to_string());
            *slot.borrow_mut() = Some(result);
            ctx.request_repaint();
        });
    }

    fn collect_models(&mut self) {
        let Some(result) = self.models.borrow_mut().take() else {
            return;
        };
        match result {
            Ok(models) => {
                log::info!("Backend reports {} installed models", models.len());
                self.ui_state.available_models = models;
            }
            Err(e) => {
                log::warn!("Could not list models: {}", e);
                self.ui_state.status_text = format!("Could not list models: {}", e);
            }
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        let Ok(mut rt) = self.runtime.try_borrow_mut() else {
            log::warn!("Settings not applied; a turn is running");
            return;
        };
        let applied = self.config.apply();
        rt.config = applied.clone();
        drop(rt);

        log::info!(
            "Settings applied: {} on {}",
            applied.backend.model,
            applied.backend.base_url
        );
        self.rebuild_llm();
        self.refresh_models(ctx);
        self.start_chat(ctx);
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.start_chat(ctx);
            self.refresh_models(ctx);
            self.first_frame = false;
        }

        // Drain events from the chat runtime
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.collect_models();

        if self.ui_state.is_busy() || self.queue.is_draining() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("LocalChat")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(self.config.backend_label())
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let busy = self.queue.is_draining();
            let action = SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    settings::settings_panel(
                        ui,
                        &mut self.config.draft,
                        &self.ui_state.available_models,
                        busy,
                    )
                })
                .inner;
            match action {
                SettingsAction::None => {}
                SettingsAction::RefreshModels => self.refresh_models(ctx),
                SettingsAction::Apply => self.apply_settings(ctx),
            }
        }

        // ── Chat ─────────────────────────────────────────────
        let action = CentralPanel::default()
            .show(ctx, |ui| chat::chat_panel(ui, &mut self.ui_state))
            .inner;
        match action {
            ChatAction::None => {}
            ChatAction::Send(msg) => self.dispatch_message(msg, ctx),
            ChatAction::NewChat => self.start_chat(ctx),
        }
    }
}

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, RichText};

use crate::api::{ActivePlanner, ApiError, HistoryEntry, PlannerClient};
use crate::config::Config;
use crate::grid::{Activity, CommitError, EditSession, Grid, SelectionEngine};
use super::views;

/// How long the autosave snackbar stays up.
const SNACKBAR_DURATION: Duration = Duration::from_millis(2500);

pub struct PlannerApp {
    config: Config,
    state: AppState,

    // The grid is the single source of truth; the view only projects it.
    grid: Grid,
    planner_id: Option<i64>,
    engine: SelectionEngine,

    // Edit dialog (present while open; dropping it cancels)
    editor: Option<EditSession>,
    editor_error: bool,
    focus_editor: bool,

    // History dialog
    show_history: bool,
    history: Vec<HistoryEntry>,
    history_loading: bool,
    // A restored snapshot is local-only until the user saves it
    restored_unsaved: bool,

    // Settings dialog
    show_settings: bool,
    settings_url: String,
    settings_font_scale: f32,
    settings_autosave_minutes: u64,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    snackbar: Option<(String, Instant)>,
    loading: bool,
    saving: bool,
    // A save requested mid-flight; carries the `auto` flag to re-issue with
    save_queued: Option<bool>,
    is_offline: bool,
    last_autosave: Instant,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

enum AsyncResult {
    PlannerLoaded(Option<ActivePlanner>),
    Saved { id: i64, auto: bool },
    HistoryLoaded(Vec<HistoryEntry>),
    SnapshotLoaded { planner_id: i64, activities: Vec<Activity> },
    Error(String),
    Offline,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            log::warn!("Could not load config, starting fresh: {e:#}");
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);
        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (result_tx, result_rx) = channel();

        let mut app = Self {
            settings_url: config.server_url.clone(),
            settings_font_scale: config.font_scale,
            settings_autosave_minutes: config.autosave_minutes,
            config,
            state,
            grid: Grid::new(),
            planner_id: None,
            engine: SelectionEngine::new(),
            editor: None,
            editor_error: false,
            focus_editor: false,
            show_history: false,
            history: Vec::new(),
            history_loading: false,
            restored_unsaved: false,
            show_settings: false,
            status_message: None,
            snackbar: None,
            loading: false,
            saving: false,
            save_queued: None,
            is_offline: false,
            last_autosave: Instant::now(),
            runtime,
            result_rx,
            result_tx,
        };

        if state == AppState::Main {
            app.load_planner();
        }

        app
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::PlannerLoaded(planner) => {
                    self.loading = false;
                    self.is_offline = false;
                    match planner {
                        Some(planner) => {
                            log::info!(
                                "Loaded planner {} with {} activities",
                                planner.id,
                                planner.activities.len()
                            );
                            self.planner_id = Some(planner.id);
                            self.grid = Grid::from_activities(&planner.activities);
                        }
                        None => {
                            log::info!("No active planner on the server yet");
                            self.planner_id = None;
                            self.grid = Grid::new();
                        }
                    }
                    self.engine.clear();
                    self.editor = None;
                    self.restored_unsaved = false;
                }
                AsyncResult::Saved { id, auto } => {
                    self.saving = false;
                    self.is_offline = false;
                    self.planner_id = Some(id);
                    self.restored_unsaved = false;
                    log::debug!("Saved planner {id} (auto: {auto})");
                    // A successful save is what closes the edit dialog;
                    // only then is the selection released.
                    if self.editor.take().is_some() {
                        self.engine.clear();
                        self.editor_error = false;
                    }
                    if auto {
                        self.snackbar = Some(("Autosaved".to_string(), Instant::now()));
                    } else {
                        self.status_message = Some(("Saved".to_string(), false));
                    }
                    if let Some(queued_auto) = self.save_queued.take() {
                        self.start_save(queued_auto);
                    }
                }
                AsyncResult::HistoryLoaded(entries) => {
                    self.history_loading = false;
                    self.history = entries;
                }
                AsyncResult::SnapshotLoaded { planner_id, activities } => {
                    self.history_loading = false;
                    self.show_history = false;
                    self.grid = Grid::from_activities(&activities);
                    self.planner_id = Some(planner_id);
                    self.engine.clear();
                    self.editor = None;
                    self.restored_unsaved = true;
                    self.status_message = Some((
                        "Loaded a snapshot. Save to make it the active plan.".to_string(),
                        false,
                    ));
                }
                AsyncResult::Error(msg) => {
                    log::warn!("{msg}");
                    self.loading = false;
                    self.saving = false;
                    self.save_queued = None;
                    self.history_loading = false;
                    self.is_offline = false;
                    // A failed save leaves the edit dialog open with the
                    // draft intact; the optimistic grid edit stays as-is.
                    self.status_message = Some((msg, true));
                }
                AsyncResult::Offline => {
                    self.loading = false;
                    self.saving = false;
                    self.save_queued = None;
                    self.history_loading = false;
                    self.is_offline = true;
                    self.status_message = None;
                }
            }
        }
    }

    fn load_planner(&mut self) {
        if !self.config.is_configured() || self.loading {
            return;
        }
        self.loading = true;

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = PlannerClient::new(&config)?;
                client.fetch_active().await
            }
            .await;

            match result {
                Ok(planner) => {
                    let _ = tx.send(AsyncResult::PlannerLoaded(planner));
                }
                Err(e) if e.is_offline() => {
                    let _ = tx.send(AsyncResult::Offline);
                }
                Err(e) => {
                    let _ = tx.send(AsyncResult::Error(format!("Load failed: {e}")));
                }
            }
        });
    }

    /// Push the full grid to the server. At most one save is in flight; a
    /// save requested meanwhile is coalesced into one follow-up issued when
    /// the response lands, so history snapshots never interleave.
    fn start_save(&mut self, auto: bool) {
        if !self.config.is_configured() {
            return;
        }
        if self.saving {
            self.save_queued = Some(self.save_queued.unwrap_or(auto) && auto);
            return;
        }
        self.saving = true;

        let config = self.config.clone();
        let activities = self.grid.to_activities();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = PlannerClient::new(&config)?;
                let response = client.save(&activities).await?;
                if !response.success {
                    return Err(ApiError::Server {
                        status: 200,
                        message: "save was not acknowledged".to_string(),
                    });
                }
                Ok(response.id)
            }
            .await;

            match result {
                Ok(id) => {
                    let _ = tx.send(AsyncResult::Saved { id, auto });
                }
                Err(e) if e.is_offline() => {
                    let _ = tx.send(AsyncResult::Offline);
                }
                Err(e) => {
                    let _ = tx.send(AsyncResult::Error(format!("Save failed: {e}")));
                }
            }
        });
    }

    fn open_history(&mut self) {
        self.show_history = true;
        self.history.clear();
        self.history_loading = true;

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = PlannerClient::new(&config)?;
                client.history().await
            }
            .await;

            match result {
                Ok(entries) => {
                    let _ = tx.send(AsyncResult::HistoryLoaded(entries));
                }
                Err(e) if e.is_offline() => {
                    let _ = tx.send(AsyncResult::Offline);
                }
                Err(e) => {
                    let _ = tx.send(AsyncResult::Error(format!("History failed: {e}")));
                }
            }
        });
    }

    fn load_snapshot(&mut self, id: i64) {
        if self.history_loading {
            return;
        }
        self.history_loading = true;

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = PlannerClient::new(&config)?;
                let snapshot = client.history_item(id).await?;
                let activities = snapshot.activities().map_err(ApiError::from)?;
                Ok((snapshot.evening_planner_id, activities))
            }
            .await;

            match result {
                Ok((planner_id, activities)) => {
                    let _ = tx.send(AsyncResult::SnapshotLoaded { planner_id, activities });
                }
                Err(ApiError::NotFound) => {
                    let _ = tx.send(AsyncResult::Error(
                        "That snapshot no longer exists".to_string(),
                    ));
                }
                Err(e) if e.is_offline() => {
                    let _ = tx.send(AsyncResult::Offline);
                }
                Err(e) => {
                    let _ = tx.send(AsyncResult::Error(format!("Snapshot failed: {e}")));
                }
            }
        });
    }

    /// Validate the draft and, if non-blank, apply it to the grid
    /// optimistically and kick off the save. Blank drafts re-prompt.
    fn commit_editor(&mut self) {
        let Some(session) = &self.editor else {
            return;
        };
        match session.commit() {
            Ok(batch) => {
                self.editor_error = false;
                self.grid.upsert_many(&batch);
                self.start_save(false);
            }
            Err(CommitError::EmptyText) => {
                self.editor_error = true;
                self.focus_editor = true;
            }
        }
    }

    fn cancel_editor(&mut self) {
        self.editor = None;
        self.editor_error = false;
        self.engine.clear();
    }

    fn save_settings(&mut self) {
        let server_changed = self.config.server_url != self.settings_url;

        self.config.server_url = self.settings_url.trim().to_string();
        self.config.font_scale = self.settings_font_scale;
        self.config.autosave_minutes = self.settings_autosave_minutes;

        match self.config.save() {
            Ok(_) => {
                self.show_settings = false;
                if self.config.is_configured() && self.state == AppState::Setup {
                    self.state = AppState::Main;
                    self.load_planner();
                } else if server_changed {
                    self.load_planner();
                }
            }
            Err(e) => {
                self.status_message = Some((format!("Failed to save settings: {e}"), true));
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, save_combo, load_combo) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::L),
            )
        });

        if escape {
            if self.editor.is_some() {
                self.cancel_editor();
                return;
            }
            if self.show_history {
                self.show_history = false;
                return;
            }
            if self.show_settings {
                self.show_settings = false;
                return;
            }
        }

        // Save/load shortcuts are inert while a dialog is up
        if self.editor.is_some() || self.show_history || self.show_settings {
            return;
        }
        if save_combo {
            self.start_save(false);
        }
        if load_combo {
            self.load_planner();
        }
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Evening Planner setup");
            ui.add_space(20.0);
            ui.label("Point the app at your planner server to get started.");
            ui.add_space(20.0);
        });

        egui::Grid::new("setup_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Server URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_url)
                        .hint_text("http://localhost:3000")
                        .desired_width(350.0),
                );
                ui.end_row();
            });

        ui.add_space(20.0);

        if ui.button("Save and connect").clicked() {
            self.save_settings();
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui, now: Instant) {
        // Header: title left, icon buttons right
        ui.horizontal(|ui| {
            ui.label(RichText::new("Evening Planner").size(18.0).color(Color32::WHITE));
            if self.restored_unsaved {
                ui.label(
                    RichText::new("unsaved snapshot")
                        .size(13.0)
                        .color(Color32::from_rgb(255, 176, 0)),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text_color = Color32::from_rgb(150, 150, 150);
                let hover_color = Color32::WHITE;
                let font_id = egui::FontId::proportional(18.0);

                let icon_button = |ui: &mut egui::Ui, icon: &str, tip: &str| -> bool {
                    let icon_size = ui.fonts(|f| {
                        f.layout_no_wrap(icon.to_string(), font_id.clone(), Color32::WHITE)
                            .size()
                    });
                    let (rect, response) =
                        ui.allocate_exact_size(icon_size + egui::vec2(8.0, 4.0), egui::Sense::click());
                    let color = if response.hovered() { hover_color } else { text_color };
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        icon,
                        font_id.clone(),
                        color,
                    );
                    response.on_hover_text(tip).clicked()
                };

                if icon_button(ui, egui_phosphor::regular::FADERS_HORIZONTAL, "Settings") {
                    self.settings_url = self.config.server_url.clone();
                    self.settings_font_scale = self.config.font_scale;
                    self.settings_autosave_minutes = self.config.autosave_minutes;
                    self.show_settings = true;
                }
                ui.add_space(12.0);

                if icon_button(ui, egui_phosphor::regular::CLOUD_ARROW_DOWN, "Reload from server") {
                    self.load_planner();
                }
                ui.add_space(12.0);

                if icon_button(
                    ui,
                    egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE,
                    "History",
                ) {
                    self.open_history();
                }
                ui.add_space(12.0);

                if icon_button(ui, egui_phosphor::regular::FLOPPY_DISK, "Save") {
                    self.start_save(false);
                }
            });
        });

        ui.add_space(4.0);
        ui.label(
            RichText::new("Click a cell or drag across cells to plan an activity. Ctrl/Cmd-click adds to the selection.")
                .size(13.0)
                .color(super::theme::grid_label_color()),
        );
        ui.add_space(8.0);

        // Offline screen replaces the grid until a retry succeeds
        if self.is_offline {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(egui_phosphor::regular::WIFI_SLASH.to_string())
                        .size(34.0)
                        .color(Color32::from_rgb(224, 108, 117)),
                );
                ui.add_space(16.0);
                ui.label(
                    RichText::new("No connection")
                        .size(20.0)
                        .color(Color32::from_rgb(200, 200, 210)),
                );
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Check that the planner server is reachable")
                        .size(14.0)
                        .color(Color32::from_rgb(120, 120, 140)),
                );
                ui.add_space(24.0);
                if ui
                    .add(
                        egui::Button::new(
                            RichText::new(format!(
                                "{} Retry",
                                egui_phosphor::regular::ARROWS_CLOCKWISE
                            ))
                            .size(17.0)
                            .color(Color32::WHITE),
                        )
                        .fill(super::theme::accent())
                        .rounding(6.0),
                    )
                    .clicked()
                {
                    self.is_offline = false;
                    self.load_planner();
                }
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            views::render_grid(ui, &self.grid, &mut self.engine, now);
        });
    }

    fn render_editor_dialog(&mut self, ctx: &egui::Context) {
        let Some(session) = &mut self.editor else {
            return;
        };
        let cell_count = session.cell_count();

        let (content_bg, frame_color, _) = super::theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut commit = false;
        let mut cancel = false;

        egui::Window::new("Plan activity")
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(if cell_count == 1 {
                        "The selected cell gets this activity.".to_string()
                    } else {
                        format!("All {cell_count} selected cells get the same activity.")
                    })
                    .size(14.0)
                    .color(Color32::from_rgb(176, 176, 168)),
                );
                ui.add_space(8.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut session.draft)
                        .hint_text("Type an activity...")
                        .desired_width(f32::INFINITY),
                );
                if self.focus_editor {
                    response.request_focus();
                    self.focus_editor = false;
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }

                if self.editor_error {
                    ui.label(
                        RichText::new("Enter an activity first.")
                            .size(13.0)
                            .color(Color32::from_rgb(224, 108, 117)),
                    );
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let save_label = if self.saving { "Saving..." } else { "Save" };
                    if ui
                        .add_enabled(!self.saving, egui::Button::new(save_label))
                        .clicked()
                    {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if commit {
            self.commit_editor();
        }
        if cancel {
            self.cancel_editor();
        }
    }

    fn render_history_dialog(&mut self, ctx: &egui::Context) {
        let (content_bg, frame_color, frame_text) = super::theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut close = false;
        let mut load_id: Option<i64> = None;

        egui::Window::new("History")
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Every save keeps a snapshot. Load one to inspect it; save again to make it active.")
                        .size(13.0)
                        .color(frame_text),
                );
                ui.add_space(8.0);

                if self.history_loading {
                    ui.label("Loading...");
                } else if self.history.is_empty() {
                    ui.label("No snapshots yet.");
                } else {
                    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                        for entry in &self.history {
                            let stamp = entry
                                .created_at
                                .with_timezone(&chrono::Local)
                                .format("%Y.%m.%d %H:%M")
                                .to_string();
                            let row = ui.add(
                                egui::Button::new(
                                    RichText::new(stamp).size(14.0).color(Color32::WHITE),
                                )
                                .frame(false)
                                .min_size(egui::vec2(ui.available_width(), 28.0)),
                            );
                            if row.clicked() {
                                load_id = Some(entry.id);
                            }
                        }
                    });
                }

                ui.add_space(12.0);
                if ui.button("Close").clicked() {
                    close = true;
                }
            });

        if let Some(id) = load_id {
            self.load_snapshot(id);
        }
        if close {
            self.show_history = false;
        }
    }

    fn render_settings_dialog(&mut self, ctx: &egui::Context) {
        let (content_bg, frame_color, _) = super::theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .default_width(460.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Server URL");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_url)
                                .hint_text("http://localhost:3000")
                                .desired_width(280.0),
                        );
                        ui.end_row();

                        ui.label("UI scale");
                        ui.add(
                            egui::Slider::new(&mut self.settings_font_scale, 0.75..=1.5)
                                .step_by(0.05),
                        );
                        ui.end_row();

                        ui.label("Autosave (minutes)");
                        ui.add(
                            egui::DragValue::new(&mut self.settings_autosave_minutes)
                                .range(0..=120),
                        );
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.label(
                    RichText::new("Autosave 0 turns background saving off.")
                        .size(13.0)
                        .color(Color32::from_rgb(140, 140, 160)),
                );

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if save {
            self.save_settings();
        }
        if cancel {
            self.show_settings = false;
        }
    }

    fn render_snackbar(&mut self, ctx: &egui::Context) {
        let Some((message, since)) = &self.snackbar else {
            return;
        };
        if since.elapsed() > SNACKBAR_DURATION {
            self.snackbar = None;
            return;
        }
        let message = message.clone();

        egui::Area::new(egui::Id::new("snackbar"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                let (bg, text) = super::theme::button_colors();
                egui::Frame::none()
                    .fill(bg)
                    .rounding(egui::Rounding::same(6.0))
                    .inner_margin(egui::Margin::symmetric(16.0, 8.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(message).size(14.0).color(text));
                    });
            });
    }

    fn autosave_tick(&mut self) {
        if self.state != AppState::Main || self.config.autosave_minutes == 0 {
            return;
        }
        if self.last_autosave.elapsed() < Duration::from_secs(self.config.autosave_minutes * 60) {
            return;
        }
        self.last_autosave = Instant::now();

        // Only save when the app is idle: no dialog up, nothing in flight,
        // and there is something worth snapshotting.
        let idle = self.editor.is_none()
            && !self.show_history
            && !self.show_settings
            && !self.saving
            && !self.loading
            && !self.is_offline;
        if idle && (self.planner_id.is_some() || !self.grid.is_empty()) {
            log::debug!("Autosave tick");
            self.start_save(true);
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_async_results();
        let now = Instant::now();

        ctx.set_zoom_factor(self.config.font_scale);

        self.handle_shortcuts(ctx);
        self.autosave_tick();

        // The settled-selection debounce opens the edit dialog
        if self.editor.is_none()
            && !self.show_history
            && !self.show_settings
            && self.engine.take_auto_open(now)
        {
            self.editor = EditSession::open(self.engine.selected(), &self.grid);
            self.editor_error = false;
            self.focus_editor = true;
        }

        // Keep repainting while timers are pending (debounce, snackbar,
        // autosave clock)
        if self.engine.auto_open_pending() || self.snackbar.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        if self.editor.is_some() {
            self.render_editor_dialog(ctx);
        }
        if self.show_history {
            self.render_history_dialog(ctx);
        }
        if self.show_settings {
            self.render_settings_dialog(ctx);
        }
        self.render_snackbar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                // Status message with a dismiss button
                let mut dismiss_message = false;
                if let Some((msg, is_error)) = &self.status_message {
                    let color = if *is_error {
                        Color32::from_rgb(224, 108, 117)
                    } else {
                        Color32::from_rgb(152, 195, 121)
                    };
                    let dim_color = Color32::from_rgb(120, 120, 130);
                    ui.horizontal(|ui| {
                        ui.add(egui::Label::new(RichText::new(msg).color(color)));
                        ui.add_space(8.0);
                        let close_btn = ui.add(
                            egui::Label::new(
                                RichText::new(egui_phosphor::regular::X)
                                    .size(14.0)
                                    .color(dim_color),
                            )
                            .sense(egui::Sense::click()),
                        );
                        if close_btn.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if close_btn.clicked() {
                            dismiss_message = true;
                        }
                    });
                    ui.add_space(8.0);
                }
                if dismiss_message {
                    self.status_message = None;
                }

                match self.state {
                    AppState::Setup => self.render_setup(ui),
                    AppState::Main => self.render_main(ui, now),
                }
            });
    }
}

use std::time::Duration;

use client_core::{view::LOADING_TEXT, ChoiceOption, PageView, ReadyView};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::FieldEdit;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{apply_ui_event, EditorUiState},
};

pub const SETTINGS_STORAGE_KEY: &str = "mbkm_desktop_settings";

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x26, 0x26);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(0x16, 0x65, 0x34);
const SUCCESS_FILL: egui::Color32 = egui::Color32::from_rgb(0xdc, 0xfc, 0xe7);

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PersistedGuiSettings {
    pub last_nim: String,
}

pub struct StartupConfig {
    /// Student to open immediately, as if it came from the route.
    pub nim: Option<String>,
}

pub struct EditPageApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: EditorUiState,
    nim_input: String,
}

impl EditPageApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        persisted: Option<PersistedGuiSettings>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: EditorUiState::default(),
            nim_input: persisted.map(|p| p.last_nim).unwrap_or_default(),
        };
        if let Some(nim) = startup.nim.filter(|nim| !nim.trim().is_empty()) {
            app.nim_input = nim;
            app.open_student();
        }
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
    }

    fn open_student(&mut self) {
        let nim = self.nim_input.trim().to_string();
        if nim.is_empty() {
            self.state.status = "Enter a NIM first".to_string();
            return;
        }
        self.dispatch(BackendCommand::OpenStudent { nim });
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.state, event);
        }
    }

    fn show_student_picker(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("NIM");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.nim_input)
                    .hint_text("A11.2021.00001")
                    .desired_width(200.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            if ui.button("Buka").clicked() || submitted {
                self.open_student();
            }
        });
    }

    fn show_page(&mut self, ui: &mut egui::Ui) {
        match self.state.view.clone() {
            None => {
                ui.weak("Open a student to edit their MBKM data.");
            }
            Some(PageView::Loading) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOADING_TEXT);
                });
            }
            Some(PageView::Error(message)) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            Some(PageView::Ready(ready)) => self.show_form(ui, &ready),
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, ready: &ReadyView) {
        ui.heading("Edit Data Mahasiswa");
        ui.add_space(8.0);

        if let Some(banner) = &ready.banner {
            egui::Frame::new()
                .fill(SUCCESS_FILL)
                .corner_radius(6.0)
                .inner_margin(egui::Margin::same(12))
                .show(ui, |ui| {
                    ui.colored_label(SUCCESS_COLOR, format!("✔ {banner}"));
                });
            ui.add_space(8.0);
        }

        let mut edits = Vec::new();
        egui::Grid::new("student_form")
            .num_columns(2)
            .spacing([16.0, 10.0])
            .show(ui, |ui| {
                ui.label("NIM");
                let mut nim = ready.nim.as_str();
                ui.add_enabled(false, egui::TextEdit::singleline(&mut nim));
                ui.end_row();

                ui.label("Nama Mahasiswa");
                let mut name = ready.nama_mahasiswa.as_str();
                ui.add_enabled(false, egui::TextEdit::singleline(&mut name));
                ui.end_row();

                ui.label("Semester");
                let semester = ui.add(
                    egui::TextEdit::singleline(&mut self.state.semester_draft).desired_width(80.0),
                );
                if semester.changed() {
                    edits.push(FieldEdit::Semester(self.state.semester_draft.clone()));
                }
                ui.end_row();

                ui.label("Program MBKM");
                if let Some(value) = choice_combo(ui, "program_mbkm", &ready.program_choices) {
                    edits.push(FieldEdit::Program(value));
                }
                ui.end_row();

                ui.label("Dosen Pembimbing");
                if let Some(value) = choice_combo(ui, "dosen_pembimbing", &ready.supervisor_choices)
                {
                    edits.push(FieldEdit::Supervisor(value));
                }
                ui.end_row();
            });

        for edit in edits {
            self.dispatch(BackendCommand::Edit(edit));
        }

        ui.add_space(12.0);
        if ui.button("💾 Simpan").clicked() {
            self.dispatch(BackendCommand::Submit);
        }
    }
}

/// Drop-down over the given choices. Returns the newly picked value, if any.
fn choice_combo(ui: &mut egui::Ui, id: &str, choices: &[ChoiceOption]) -> Option<String> {
    let selected_text = choices
        .iter()
        .find(|choice| choice.selected)
        .map(|choice| choice.label.clone())
        .unwrap_or_default();

    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .width(280.0)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for choice in choices {
                if ui.selectable_label(choice.selected, &choice.label).clicked()
                    && !choice.selected
                {
                    picked = Some(choice.value.clone());
                }
            }
        });
    picked
}

impl eframe::App for EditPageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.state.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_student_picker(ui);
            ui.separator();
            self.show_page(ui);
        });

        // Banner expiry and backend replies arrive without user input.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedGuiSettings {
            last_nim: self.nim_input.trim().to_string(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

//! Render-ready projection of [`PageState`].

use std::fmt::Write as _;

use crate::page::PageState;

pub const PROGRAM_PLACEHOLDER: &str = "Pilih Program";
pub const SUPERVISOR_PLACEHOLDER: &str = "Pilih Dosen Pembimbing";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyView {
    pub nim: String,
    pub nama_mahasiswa: String,
    pub semester: String,
    pub program_choices: Vec<ChoiceOption>,
    pub supervisor_choices: Vec<ChoiceOption>,
    pub banner: Option<String>,
}

impl ReadyView {
    pub fn selected_program(&self) -> Option<&ChoiceOption> {
        self.program_choices.iter().find(|choice| choice.selected)
    }

    pub fn selected_supervisor(&self) -> Option<&ChoiceOption> {
        self.supervisor_choices.iter().find(|choice| choice.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Error(String),
    Ready(ReadyView),
}

impl PageState {
    /// Loading wins over error, error wins over the form.
    pub fn view(&self) -> PageView {
        if self.loading {
            return PageView::Loading;
        }
        if let Some(message) = &self.error {
            return PageView::Error(message.clone());
        }

        let form = &self.form;
        let program_choices = choices(
            PROGRAM_PLACEHOLDER,
            &form.id_program_mbkm,
            self.programs
                .iter()
                .map(|program| (program.id_program_mbkm.to_string(), program.label())),
        );
        let supervisor_choices = choices(
            SUPERVISOR_PLACEHOLDER,
            &form.nip_dosbing,
            self.supervisors.iter().map(|supervisor| {
                (
                    supervisor.nip_dosbing.to_string(),
                    supervisor.nama_dosbing.clone(),
                )
            }),
        );

        PageView::Ready(ReadyView {
            nim: form.nim.clone(),
            nama_mahasiswa: form.nama_mahasiswa.clone(),
            semester: form.semester.clone(),
            program_choices,
            supervisor_choices,
            banner: self.success.clone(),
        })
    }
}

fn choices(
    placeholder: &str,
    current: &str,
    options: impl Iterator<Item = (String, String)>,
) -> Vec<ChoiceOption> {
    let mut out = vec![ChoiceOption {
        value: String::new(),
        label: placeholder.to_string(),
        selected: current.is_empty(),
    }];
    out.extend(options.map(|(value, label)| ChoiceOption {
        selected: value == current,
        value,
        label,
    }));
    out
}

/// Plain-text rendering used by the command line host.
pub fn render_text(view: &PageView) -> String {
    match view {
        PageView::Loading => LOADING_TEXT.to_string(),
        PageView::Error(message) => message.clone(),
        PageView::Ready(ready) => {
            let mut out = String::from("Edit Data Mahasiswa\n");
            if let Some(banner) = &ready.banner {
                let _ = writeln!(out, "[ok] {banner}");
            }
            let _ = writeln!(out, "{:<18}: {}", "NIM", ready.nim);
            let _ = writeln!(out, "{:<18}: {}", "Nama Mahasiswa", ready.nama_mahasiswa);
            let _ = writeln!(out, "{:<18}: {}", "Semester", ready.semester);
            let _ = writeln!(
                out,
                "{:<18}: {}",
                "Program MBKM",
                selected_label(&ready.program_choices)
            );
            let _ = writeln!(
                out,
                "{:<18}: {}",
                "Dosen Pembimbing",
                selected_label(&ready.supervisor_choices)
            );
            out
        }
    }
}

fn selected_label(choices: &[ChoiceOption]) -> &str {
    choices
        .iter()
        .find(|choice| choice.selected)
        .map(|choice| choice.label.as_str())
        .unwrap_or("-")
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;

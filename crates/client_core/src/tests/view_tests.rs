use super::*;

use shared::{
    domain::{ProgramId, SupervisorNip},
    protocol::{ProgramOption, SupervisorOption},
};

use crate::page::StudentForm;

fn ready_state() -> PageState {
    PageState {
        form: StudentForm {
            nim: "A11.2021.001".to_string(),
            nama_mahasiswa: "Budi".to_string(),
            semester: "5".to_string(),
            id_program_mbkm: "3".to_string(),
            nip_dosbing: String::new(),
            ..StudentForm::default()
        },
        programs: vec![ProgramOption {
            id_program_mbkm: ProgramId(3),
            company: "Acme".to_string(),
            role: "Intern".to_string(),
        }],
        supervisors: vec![SupervisorOption {
            nip_dosbing: SupervisorNip(12),
            nama_dosbing: "Dr. Sari".to_string(),
        }],
        loading: false,
        ..PageState::default()
    }
}

#[test]
fn loading_takes_precedence_over_everything() {
    let state = PageState {
        error: Some("boom".to_string()),
        ..PageState::default()
    };
    assert_eq!(state.view(), PageView::Loading);
}

#[test]
fn error_replaces_the_form() {
    let state = PageState {
        error: Some("Gagal memuat data.".to_string()),
        ..ready_state()
    };
    assert_eq!(state.view(), PageView::Error("Gagal memuat data.".to_string()));
}

#[test]
fn choice_lists_start_with_placeholder_and_mark_selection() {
    let PageView::Ready(view) = ready_state().view() else {
        panic!("expected form view");
    };

    assert_eq!(view.program_choices.len(), 2);
    assert_eq!(view.program_choices[0].label, PROGRAM_PLACEHOLDER);
    assert!(!view.program_choices[0].selected);
    assert_eq!(
        view.program_choices[1],
        ChoiceOption {
            value: "3".to_string(),
            label: "Acme - Intern".to_string(),
            selected: true,
        }
    );

    assert_eq!(
        view.selected_supervisor().map(|choice| choice.label.as_str()),
        Some(SUPERVISOR_PLACEHOLDER)
    );
}

#[test]
fn unknown_foreign_key_selects_nothing() {
    let mut state = ready_state();
    state.form.id_program_mbkm = "99".to_string();
    let PageView::Ready(view) = state.view() else {
        panic!("expected form view");
    };
    assert_eq!(view.selected_program(), None);
}

#[test]
fn text_rendering_shows_banner_and_selected_labels() {
    let state = PageState {
        success: Some("Mahasiswa berhasil diperbarui!".to_string()),
        ..ready_state()
    };
    let text = render_text(&state.view());

    assert!(text.starts_with("Edit Data Mahasiswa\n"));
    assert!(text.contains("[ok] Mahasiswa berhasil diperbarui!"));
    assert!(text.contains("Semester          : 5"));
    assert!(text.contains("Acme - Intern"));
    assert!(text.contains(SUPERVISOR_PLACEHOLDER));
    assert_eq!(render_text(&PageView::Loading), LOADING_TEXT);
}

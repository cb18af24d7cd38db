//! Folds backend events into the state the window renders from.

use client_core::PageView;

use super::events::{UiError, UiEvent};

#[derive(Debug, Default)]
pub struct EditorUiState {
    /// `None` until a student has been opened.
    pub view: Option<PageView>,
    /// Text of the semester input. Owned by the UI once the form is shown.
    pub semester_draft: String,
    pub status: String,
    pub last_error: Option<UiError>,
}

pub fn apply_ui_event(state: &mut EditorUiState, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            state.status = message;
        }
        UiEvent::ViewChanged(view) => {
            if let PageView::Ready(ready) = &view {
                let same_student = matches!(
                    &state.view,
                    Some(PageView::Ready(previous)) if previous.nim == ready.nim
                );
                if !same_student {
                    state.semester_draft = ready.semester.clone();
                }
            }
            state.view = Some(view);
        }
        UiEvent::Error(err) => {
            tracing::warn!(
                category = ?err.category(),
                context = ?err.context(),
                "{}",
                err.message()
            );
            if err.requires_reauth() {
                tracing::warn!("bearer token missing or rejected; sign in to the dashboard again");
            }
            state.status = err.status_line();
            state.last_error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::{UiErrorCategory, UiErrorContext};
    use client_core::ReadyView;

    fn ready(nim: &str, semester: &str) -> PageView {
        PageView::Ready(ReadyView {
            nim: nim.to_string(),
            nama_mahasiswa: "Budi".to_string(),
            semester: semester.to_string(),
            program_choices: Vec::new(),
            supervisor_choices: Vec::new(),
            banner: None,
        })
    }

    #[test]
    fn first_ready_view_seeds_semester_draft() {
        let mut state = EditorUiState::default();
        apply_ui_event(&mut state, UiEvent::ViewChanged(PageView::Loading));
        assert_eq!(state.semester_draft, "");

        apply_ui_event(&mut state, UiEvent::ViewChanged(ready("A11", "5")));
        assert_eq!(state.semester_draft, "5");
    }

    #[test]
    fn echoed_views_do_not_clobber_typing() {
        let mut state = EditorUiState::default();
        apply_ui_event(&mut state, UiEvent::ViewChanged(ready("A11", "5")));
        state.semester_draft = "12".to_string();

        apply_ui_event(&mut state, UiEvent::ViewChanged(ready("A11", "1")));
        assert_eq!(state.semester_draft, "12");

        apply_ui_event(&mut state, UiEvent::ViewChanged(ready("A12", "3")));
        assert_eq!(state.semester_draft, "3");
    }

    #[test]
    fn auth_errors_are_flagged_for_reauth() {
        let mut state = EditorUiState::default();
        apply_ui_event(
            &mut state,
            UiEvent::Error(UiError::from_message(
                UiErrorContext::Submit,
                "failed to update student A11: PUT http://x/api/mahasiswa/A11 returned HTTP 401: jwt expired",
            )),
        );

        let err = state.last_error.expect("error kept");
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(err.requires_reauth());
        assert!(state.status.contains("token cookie"));
    }

    #[test]
    fn connection_failures_classify_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::Load,
            "GET http://x/api/dosbing failed: error trying to connect: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.requires_reauth());
    }
}

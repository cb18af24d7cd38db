//! Backend commands queued from UI to backend worker.

use shared::domain::FieldEdit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Opens the edit page for a student, replacing any page already open.
    OpenStudent { nim: String },
    Edit(FieldEdit),
    Submit,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::OpenStudent { .. } => "open_student",
            BackendCommand::Edit(_) => "edit",
            BackendCommand::Submit => "submit",
        }
    }
}

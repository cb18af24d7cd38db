use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProgramId);
id_newtype!(SupervisorNip);

/// Form fields a user may change on the edit page. NIM and name are display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Semester(String),
    Program(String),
    Supervisor(String),
}

impl FieldEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::Semester(_) => "semester",
            FieldEdit::Program(_) => "id_program_mbkm",
            FieldEdit::Supervisor(_) => "NIP_dosbing",
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{ProgramId, SupervisorNip};

/// Semester as it travels on the wire. The backend stores an integer, but the
/// form input hands back text that may not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SemesterValue {
    Number(i64),
    Text(String),
}

impl Default for SemesterValue {
    fn default() -> Self {
        SemesterValue::Number(1)
    }
}

impl SemesterValue {
    pub fn from_input(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(value) => SemesterValue::Number(value),
            Err(_) => SemesterValue::Text(raw.to_string()),
        }
    }

    pub fn to_input(&self) -> String {
        match self {
            SemesterValue::Number(value) => value.to_string(),
            SemesterValue::Text(text) => text.clone(),
        }
    }
}

/// Foreign key as returned by the backend: usually a number, occasionally a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForeignKeyValue {
    Number(i64),
    Text(String),
}

impl ForeignKeyValue {
    pub fn to_input(&self) -> String {
        match self {
            ForeignKeyValue::Number(value) => value.to_string(),
            ForeignKeyValue::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "NIM", default)]
    pub nim: String,
    #[serde(default)]
    pub nama_mahasiswa: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub semester: SemesterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_program_mbkm: Option<ForeignKeyValue>,
    #[serde(rename = "NIP_dosbing", default, skip_serializing_if = "Option::is_none")]
    pub nip_dosbing: Option<ForeignKeyValue>,
    /// Any other columns the backend returns; sent back untouched on update.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramOption {
    pub id_program_mbkm: ProgramId,
    pub company: String,
    pub role: String,
}

impl ProgramOption {
    pub fn label(&self) -> String {
        format!("{} - {}", self.company, self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorOption {
    #[serde(rename = "NIP_dosbing")]
    pub nip_dosbing: SupervisorNip,
    pub nama_dosbing: String,
}

/// Body of `PUT /mahasiswa/{NIM}`. Empty foreign keys are left out entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentUpdate {
    #[serde(rename = "NIM")]
    pub nim: String,
    pub nama_mahasiswa: String,
    pub semester: SemesterValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_program_mbkm: Option<String>,
    #[serde(rename = "NIP_dosbing", skip_serializing_if = "Option::is_none")]
    pub nip_dosbing: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_student_with_numeric_foreign_keys() {
        let record: StudentRecord = serde_json::from_str(
            r#"{"NIM":"A11.2021.001","nama_mahasiswa":"Budi","semester":5,"id_program_mbkm":3,"NIP_dosbing":12}"#,
        )
        .expect("decode");

        assert_eq!(record.nim, "A11.2021.001");
        assert_eq!(record.semester, SemesterValue::Number(5));
        assert_eq!(record.id_program_mbkm, Some(ForeignKeyValue::Number(3)));
        assert_eq!(record.nip_dosbing, Some(ForeignKeyValue::Number(12)));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn decodes_student_with_null_foreign_keys_and_extra_columns() {
        let record: StudentRecord = serde_json::from_str(
            r#"{"NIM":"A11","nama_mahasiswa":"Sari","semester":"6","id_program_mbkm":null,"angkatan":2021}"#,
        )
        .expect("decode");

        assert_eq!(record.semester, SemesterValue::Text("6".to_string()));
        assert_eq!(record.id_program_mbkm, None);
        assert_eq!(record.nip_dosbing, None);
        assert_eq!(record.extra.get("angkatan"), Some(&Value::from(2021)));
    }

    #[test]
    fn null_semester_falls_back_to_first_semester() {
        let record: StudentRecord = serde_json::from_str(
            r#"{"NIM":"A","nama_mahasiswa":"B","semester":null,"id_program_mbkm":null}"#,
        )
        .expect("decode");

        assert_eq!(record.semester, SemesterValue::Number(1));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn update_omits_empty_foreign_keys() {
        let update = StudentUpdate {
            nim: "A11".to_string(),
            nama_mahasiswa: "Budi".to_string(),
            semester: SemesterValue::from_input("5"),
            id_program_mbkm: Some("3".to_string()),
            nip_dosbing: None,
            extra: BTreeMap::new(),
        };

        let json = serde_json::to_value(&update).expect("encode");
        assert_eq!(json["semester"], Value::from(5));
        assert_eq!(json["id_program_mbkm"], Value::from("3"));
        assert!(json.get("NIP_dosbing").is_none());
    }

    #[test]
    fn semester_keeps_unparseable_input_as_text() {
        assert_eq!(
            SemesterValue::from_input("lima"),
            SemesterValue::Text("lima".to_string())
        );
        assert_eq!(SemesterValue::from_input(" 7 ").to_input(), "7");
    }

    #[test]
    fn program_label_joins_company_and_role() {
        let program = ProgramOption {
            id_program_mbkm: ProgramId(3),
            company: "Acme".to_string(),
            role: "Intern".to_string(),
        };
        assert_eq!(program.label(), "Acme - Intern");
    }
}

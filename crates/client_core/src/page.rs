//! Controller for the student ("mahasiswa") edit page.
//!
//! Owns the form state, fans out the three initial reads, applies field edits
//! and submits the update. Hosts render from [`StudentEditPage::view`] and may
//! listen on [`StudentEditPage::subscribe`] to know when to re-render.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use serde_json::Value;
use shared::{
    domain::FieldEdit,
    protocol::{ProgramOption, SemesterValue, StudentRecord, StudentUpdate, SupervisorOption},
};
use tokio::{
    sync::{broadcast, RwLock},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{credentials::CredentialProvider, error::PageError, view::PageView, MbkmApi};

pub const LOAD_FAILED_MESSAGE: &str = "Gagal memuat data.";
pub const UPDATE_FAILED_MESSAGE: &str = "Gagal memperbarui data mahasiswa";
pub const UPDATE_SUCCEEDED_MESSAGE: &str = "Mahasiswa berhasil diperbarui!";
pub const SUCCESS_BANNER_DURATION: Duration = Duration::from_secs(3);

/// Local copy of the student record. Foreign keys and semester are kept as the
/// text the form controls work with.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentForm {
    pub nim: String,
    pub nama_mahasiswa: String,
    pub semester: String,
    pub id_program_mbkm: String,
    pub nip_dosbing: String,
    pub extra: BTreeMap<String, Value>,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            nim: String::new(),
            nama_mahasiswa: String::new(),
            semester: SemesterValue::default().to_input(),
            id_program_mbkm: String::new(),
            nip_dosbing: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl StudentForm {
    pub fn from_record(record: StudentRecord) -> Self {
        Self {
            nim: record.nim,
            nama_mahasiswa: record.nama_mahasiswa,
            semester: record.semester.to_input(),
            id_program_mbkm: record
                .id_program_mbkm
                .map(|key| key.to_input())
                .unwrap_or_default(),
            nip_dosbing: record
                .nip_dosbing
                .map(|key| key.to_input())
                .unwrap_or_default(),
            extra: record.extra,
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Semester(value) => self.semester = value,
            FieldEdit::Program(value) => self.id_program_mbkm = value,
            FieldEdit::Supervisor(value) => self.nip_dosbing = value,
        }
    }

    pub fn to_update(&self) -> StudentUpdate {
        StudentUpdate {
            nim: self.nim.clone(),
            nama_mahasiswa: self.nama_mahasiswa.clone(),
            semester: SemesterValue::from_input(&self.semester),
            id_program_mbkm: non_empty(&self.id_program_mbkm),
            nip_dosbing: non_empty(&self.nip_dosbing),
            extra: self.extra.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub form: StudentForm,
    pub programs: Vec<ProgramOption>,
    pub supervisors: Vec<SupervisorOption>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub(crate) banner_generation: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            form: StudentForm::default(),
            programs: Vec::new(),
            supervisors: Vec::new(),
            loading: true,
            error: None,
            success: None,
            banner_generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Loaded,
    LoadFailed(String),
    Edited { field: &'static str },
    Saved,
    SaveFailed(String),
    BannerCleared,
}

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub success_banner: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            success_banner: SUCCESS_BANNER_DURATION,
        }
    }
}

pub struct StudentEditPage {
    nim: String,
    api: Arc<dyn MbkmApi>,
    credentials: Arc<dyn CredentialProvider>,
    options: PageOptions,
    state: Arc<RwLock<PageState>>,
    banner_task: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<PageEvent>,
}

impl StudentEditPage {
    pub fn new(
        nim: impl Into<String>,
        api: Arc<dyn MbkmApi>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self::with_options(nim, api, credentials, PageOptions::default())
    }

    pub fn with_options(
        nim: impl Into<String>,
        api: Arc<dyn MbkmApi>,
        credentials: Arc<dyn CredentialProvider>,
        options: PageOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            nim: nim.into(),
            api,
            credentials,
            options,
            state: Arc::new(RwLock::new(PageState::default())),
            banner_task: Mutex::new(None),
            events,
        }
    }

    pub fn nim(&self) -> &str {
        &self.nim
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> PageView {
        self.state.read().await.view()
    }

    /// Fetches the student, programs and supervisors concurrently.
    ///
    /// Any single failure discards the other results and leaves the page in
    /// its error state. Without an identifier nothing is requested and the
    /// page keeps loading.
    pub async fn load(&self) -> Result<(), PageError> {
        if self.nim.trim().is_empty() {
            debug!("student edit page: no identifier yet, skipping load");
            return Ok(());
        }

        let result = tokio::try_join!(
            self.api.fetch_student(&self.nim),
            self.api.fetch_programs(),
            self.api.fetch_supervisors(),
        );

        match result {
            Ok((record, programs, supervisors)) => {
                {
                    let mut state = self.state.write().await;
                    state.form = StudentForm::from_record(record);
                    state.programs = programs;
                    state.supervisors = supervisors;
                    state.loading = false;
                    info!(
                        nim = %self.nim,
                        programs = state.programs.len(),
                        supervisors = state.supervisors.len(),
                        "student edit page loaded"
                    );
                }
                let _ = self.events.send(PageEvent::Loaded);
                Ok(())
            }
            Err(source) => {
                error!(nim = %self.nim, "error fetching data: {source:#}");
                {
                    let mut state = self.state.write().await;
                    state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                    state.loading = false;
                }
                let _ = self
                    .events
                    .send(PageEvent::LoadFailed(LOAD_FAILED_MESSAGE.to_string()));
                Err(PageError::Load {
                    nim: self.nim.clone(),
                    source,
                })
            }
        }
    }

    pub async fn edit(&self, edit: FieldEdit) {
        let field = edit.field_name();
        self.state.write().await.form.apply(edit);
        let _ = self.events.send(PageEvent::Edited { field });
    }

    /// Sends the current form to the backend with the bearer token attached.
    ///
    /// A failure lands in the same error slot as a load failure, so the page
    /// switches to its error view.
    pub async fn submit(&self) -> Result<(), PageError> {
        let update = self.state.read().await.form.to_update();
        let nim = update.nim.clone();

        let outcome = match self.credentials.bearer_token() {
            Some(token) => self
                .api
                .update_student(&nim, &update, &token)
                .await
                .map_err(|source| PageError::Update {
                    nim: nim.clone(),
                    source,
                }),
            None => Err(PageError::MissingCredential { nim: nim.clone() }),
        };

        match outcome {
            Ok(()) => {
                info!(nim = %nim, "student updated");
                self.show_success().await;
                Ok(())
            }
            Err(err) => {
                error!(nim = %nim, "error updating student: {err:#}");
                self.state.write().await.error = Some(UPDATE_FAILED_MESSAGE.to_string());
                let _ = self
                    .events
                    .send(PageEvent::SaveFailed(UPDATE_FAILED_MESSAGE.to_string()));
                Err(err)
            }
        }
    }

    async fn show_success(&self) {
        let generation = {
            let mut state = self.state.write().await;
            state.success = Some(UPDATE_SUCCEEDED_MESSAGE.to_string());
            state.banner_generation += 1;
            state.banner_generation
        };
        let _ = self.events.send(PageEvent::Saved);

        let task = spawn_banner_clear(
            Arc::downgrade(&self.state),
            generation,
            self.options.success_banner,
            self.events.clone(),
        );
        let previous = self
            .banner_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Cancels the pending banner clear. Called automatically on drop.
    pub fn close(&self) {
        if let Some(task) = self
            .banner_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for StudentEditPage {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_banner_clear(
    state: Weak<RwLock<PageState>>,
    generation: u64,
    delay: Duration,
    events: broadcast::Sender<PageEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut guard = state.write().await;
        // A newer success owns the banner now.
        if guard.banner_generation != generation {
            return;
        }
        guard.success = None;
        drop(guard);
        let _ = events.send(PageEvent::BannerCleared);
    })
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;

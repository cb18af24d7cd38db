use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::{ProgramOption, StudentRecord, StudentUpdate, SupervisorOption};

pub mod config;
pub mod credentials;
pub mod error;
pub mod page;
pub mod transport;
pub mod view;

pub use config::{load_settings, Settings};
pub use credentials::{CookieJarCredentials, CredentialProvider, StaticCredentials};
pub use error::{ApiClientError, PageError};
pub use page::{PageEvent, PageOptions, PageState, StudentEditPage, StudentForm};
pub use transport::HttpMbkmApi;
pub use view::{ChoiceOption, PageView, ReadyView};

/// Backend operations used by the student edit page.
#[async_trait]
pub trait MbkmApi: Send + Sync {
    async fn fetch_student(&self, nim: &str) -> Result<StudentRecord>;
    async fn fetch_programs(&self) -> Result<Vec<ProgramOption>>;
    async fn fetch_supervisors(&self) -> Result<Vec<SupervisorOption>>;
    async fn update_student(&self, nim: &str, update: &StudentUpdate, token: &str) -> Result<()>;
}

pub struct MissingMbkmApi;

#[async_trait]
impl MbkmApi for MissingMbkmApi {
    async fn fetch_student(&self, nim: &str) -> Result<StudentRecord> {
        Err(anyhow!("mbkm backend unavailable for student {nim}"))
    }

    async fn fetch_programs(&self) -> Result<Vec<ProgramOption>> {
        Err(anyhow!("mbkm backend unavailable"))
    }

    async fn fetch_supervisors(&self) -> Result<Vec<SupervisorOption>> {
        Err(anyhow!("mbkm backend unavailable"))
    }

    async fn update_student(
        &self,
        nim: &str,
        _update: &StudentUpdate,
        _token: &str,
    ) -> Result<()> {
        Err(anyhow!("mbkm backend unavailable for student {nim}"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

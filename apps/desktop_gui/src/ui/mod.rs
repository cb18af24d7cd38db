//! UI layer for the desktop edit page: app shell and form widgets.

pub mod app;

pub use app::{EditPageApp, PersistedGuiSettings, StartupConfig, SETTINGS_STORAGE_KEY};

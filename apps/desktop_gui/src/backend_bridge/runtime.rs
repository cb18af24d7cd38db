//! Runtime bridge between UI command queue and backend event intake.

use std::{
    sync::{Arc, Weak},
    thread,
};

use client_core::{
    ApiClientError, CredentialProvider, HttpMbkmApi, MbkmApi, MissingMbkmApi, PageError,
    PageOptions, PageView, StudentEditPage,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub struct BackendConfig {
    pub api_base_url: String,
    pub credentials: Arc<dyn CredentialProvider>,
    pub page_options: PageOptions,
}

struct OpenPage {
    page: Arc<StudentEditPage>,
    forwarder: JoinHandle<()>,
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: BackendConfig) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let api = match build_api(&config.api_base_url) {
                Ok(api) => {
                    let _ = ui_tx.try_send(UiEvent::Info(format!(
                        "Backend worker ready ({})",
                        config.api_base_url
                    )));
                    api
                }
                Err((api, err)) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    tracing::error!("backend worker startup failure: {err}");
                    api
                }
            };

            let mut open: Option<OpenPage> = None;
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::OpenStudent { nim } => {
                        if let Some(previous) = open.take() {
                            previous.forwarder.abort();
                        }
                        let page = Arc::new(StudentEditPage::with_options(
                            nim,
                            Arc::clone(&api),
                            Arc::clone(&config.credentials),
                            config.page_options.clone(),
                        ));
                        let forwarder = spawn_view_forwarder(Arc::downgrade(&page), ui_tx.clone());
                        let _ = ui_tx.try_send(UiEvent::ViewChanged(PageView::Loading));
                        if let Err(err) = page.load().await {
                            report(&ui_tx, UiErrorContext::Load, &err);
                        }
                        let _ = ui_tx.try_send(UiEvent::ViewChanged(page.view().await));
                        open = Some(OpenPage { page, forwarder });
                    }
                    BackendCommand::Edit(edit) => {
                        let Some(current) = &open else {
                            tracing::debug!("edit ignored: no student open");
                            continue;
                        };
                        current.page.edit(edit).await;
                    }
                    BackendCommand::Submit => {
                        let Some(current) = &open else {
                            tracing::debug!("submit ignored: no student open");
                            continue;
                        };
                        if let Err(err) = current.page.submit().await {
                            report(&ui_tx, UiErrorContext::Submit, &err);
                        }
                    }
                }
            }

            if let Some(current) = open.take() {
                current.forwarder.abort();
                current.page.close();
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

/// HTTP client for the configured backend. An unusable base url still yields
/// an api, one that fails every call, so opened pages land in their error view.
fn build_api(
    base_url: &str,
) -> Result<Arc<dyn MbkmApi>, (Arc<dyn MbkmApi>, ApiClientError)> {
    match HttpMbkmApi::new(base_url) {
        Ok(api) => Ok(Arc::new(api)),
        Err(err) => Err((Arc::new(MissingMbkmApi), err)),
    }
}

fn report(ui_tx: &Sender<UiEvent>, context: UiErrorContext, err: &PageError) {
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(context, err.to_string())));
}

/// Pushes a fresh view to the UI after every page event, including the
/// banner clear that fires on its own timer.
fn spawn_view_forwarder(page: Weak<StudentEditPage>, ui_tx: Sender<UiEvent>) -> JoinHandle<()> {
    let Some(mut events) = page.upgrade().map(|page| page.subscribe()) else {
        return tokio::spawn(async {});
    };
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    let Some(page) = page.upgrade() else {
                        break;
                    };
                    let view = page.view().await;
                    if ui_tx.try_send(UiEvent::ViewChanged(view)).is_err() {
                        tracing::warn!("ui event queue unavailable; dropping view update");
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::StaticCredentials;

    #[test]
    fn unusable_base_url_falls_back_to_failing_api() {
        let Err((api, err)) = build_api("not a url") else {
            panic!("base url must be rejected");
        };
        assert!(matches!(err, ApiClientError::InvalidBaseUrl { .. }));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let view = runtime.block_on(async {
            let page = StudentEditPage::new("A11", api, Arc::new(StaticCredentials::none()));
            assert!(page.load().await.is_err());
            page.view().await
        });
        assert_eq!(view, PageView::Error("Gagal memuat data.".to_string()));
    }

    #[test]
    fn valid_base_url_builds_http_api() {
        assert!(build_api("https://backend-si-mbkm.vercel.app/api").is_ok());
    }
}

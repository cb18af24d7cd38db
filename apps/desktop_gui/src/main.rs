use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, CredentialProvider, StaticCredentials};
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::{
    commands::BackendCommand,
    runtime::{self, BackendConfig},
};
use controller::events::UiEvent;
use ui::{EditPageApp, PersistedGuiSettings, StartupConfig, SETTINGS_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(name = "mbkm-desktop", about = "Desktop editor for MBKM student records")]
struct Args {
    /// Student to open on launch.
    #[arg(long)]
    nim: Option<String>,
    #[arg(long)]
    api_base_url: Option<String>,
    /// Bearer token; takes precedence over the cookie jar.
    #[arg(long)]
    token: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    let credentials: Arc<dyn CredentialProvider> = match args.token {
        Some(token) => Arc::new(StaticCredentials::new(token)),
        None => settings.credentials(),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(
        cmd_rx,
        ui_tx,
        BackendConfig {
            api_base_url: settings.api_base_url.clone(),
            credentials,
            page_options: settings.page_options(),
        },
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Edit Data Mahasiswa")
            .with_inner_size([720.0, 480.0])
            .with_min_inner_size([560.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MBKM Desktop",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedGuiSettings>(&text).ok())
            });
            Ok(Box::new(EditPageApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig { nim: args.nim },
                persisted,
            )))
        }),
    )
}

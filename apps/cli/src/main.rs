use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from},
    view::render_text,
    CredentialProvider, HttpMbkmApi, Settings, StaticCredentials, StudentEditPage,
};
use shared::domain::FieldEdit;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mbkm", about = "Edit MBKM student records from the terminal")]
struct Args {
    /// Settings file; defaults to ./mbkm.toml when present.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    /// Bearer token; takes precedence over the cookie jar.
    #[arg(long, env = "MBKM_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long)]
    cookie_jar: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a student and print the edit form.
    Show { nim: String },
    /// Load a student, apply the given changes and save.
    Edit {
        nim: String,
        #[arg(long)]
        semester: Option<String>,
        /// Program id; pass an empty string to clear it.
        #[arg(long)]
        program: Option<String>,
        /// Supervisor NIP; pass an empty string to clear it.
        #[arg(long)]
        supervisor: Option<String>,
    },
}

fn requested_edits(
    semester: Option<String>,
    program: Option<String>,
    supervisor: Option<String>,
) -> Vec<FieldEdit> {
    let mut edits = Vec::new();
    if let Some(value) = semester {
        edits.push(FieldEdit::Semester(value));
    }
    if let Some(value) = program {
        edits.push(FieldEdit::Program(value));
    }
    if let Some(value) = supervisor {
        edits.push(FieldEdit::Supervisor(value));
    }
    edits
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(url) = &args.api_base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &args.cookie_jar {
        settings.cookie_jar = Some(path.clone());
    }
    Ok(settings)
}

fn resolve_credentials(args: &Args, settings: &Settings) -> Arc<dyn CredentialProvider> {
    match &args.token {
        Some(token) => Arc::new(StaticCredentials::new(token.clone())),
        None => settings.credentials(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    let credentials = resolve_credentials(&args, &settings);
    let api = HttpMbkmApi::new(&settings.api_base_url)
        .with_context(|| format!("unusable api base url {}", settings.api_base_url))?;
    info!(
        base_url = %api.base_url(),
        cookie_jar = ?settings.cookie_jar,
        token_from_flag = args.token.is_some(),
        "using mbkm backend"
    );
    let api = Arc::new(api);

    match args.command {
        Command::Show { nim } => {
            let page =
                StudentEditPage::with_options(nim, api, credentials, settings.page_options());
            let loaded = page.load().await;
            println!("{}", render_text(&page.view().await));
            loaded?;
        }
        Command::Edit {
            nim,
            semester,
            program,
            supervisor,
        } => {
            let page =
                StudentEditPage::with_options(nim, api, credentials, settings.page_options());
            if let Err(err) = page.load().await {
                println!("{}", render_text(&page.view().await));
                return Err(err.into());
            }
            for edit in requested_edits(semester, program, supervisor) {
                page.edit(edit).await;
            }
            let saved = page.submit().await;
            println!("{}", render_text(&page.view().await));
            if let Err(err) = &saved {
                if err.needs_fresh_token() {
                    warn!(
                        status = ?err.backend_status(),
                        "token missing or rejected; pass --token or refresh the cookie jar"
                    );
                }
            }
            saved?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edit_with_cleared_supervisor() {
        let args = Args::try_parse_from([
            "mbkm",
            "edit",
            "A11.2021.001",
            "--semester",
            "6",
            "--supervisor",
            "",
        ])
        .expect("parse");

        let Command::Edit {
            nim,
            semester,
            program,
            supervisor,
        } = args.command
        else {
            panic!("expected edit command");
        };
        assert_eq!(nim, "A11.2021.001");
        assert_eq!(
            requested_edits(semester, program, supervisor),
            vec![
                FieldEdit::Semester("6".to_string()),
                FieldEdit::Supervisor(String::new()),
            ]
        );
    }

    #[test]
    fn explicit_token_beats_cookie_jar() {
        let args = Args::try_parse_from([
            "mbkm",
            "--token",
            "cli-token",
            "--cookie-jar",
            "/nonexistent/cookies.txt",
            "show",
            "A11",
        ])
        .expect("parse");
        let settings = resolve_settings(&args).expect("settings");
        assert_eq!(
            settings.cookie_jar,
            Some(PathBuf::from("/nonexistent/cookies.txt"))
        );

        let credentials = resolve_credentials(&args, &settings);
        assert_eq!(credentials.bearer_token(), Some("cli-token".to_string()));
    }
}

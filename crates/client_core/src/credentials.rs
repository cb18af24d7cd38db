//! Read-only access to the bearer token used for write requests.

use std::{fs, path::PathBuf};

use tracing::debug;

pub const DEFAULT_TOKEN_COOKIE: &str = "token";

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn none() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Looks the token up in a cookie file on every call.
///
/// Accepts either `Cookie:` header style lines (`a=1; token=abc`) or the
/// tab-separated Netscape jar format written by curl and most browsers'
/// export tools.
#[derive(Debug, Clone)]
pub struct CookieJarCredentials {
    path: PathBuf,
    cookie_name: String,
}

impl CookieJarCredentials {
    pub fn new(path: impl Into<PathBuf>, cookie_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cookie_name: cookie_name.into(),
        }
    }
}

impl CredentialProvider for CookieJarCredentials {
    fn bearer_token(&self) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), "cookie jar unreadable: {err}");
                return None;
            }
        };
        let token = find_cookie(&raw, &self.cookie_name);
        if token.is_none() {
            debug!(
                path = %self.path.display(),
                cookie = %self.cookie_name,
                "cookie not present in jar"
            );
        }
        token
    }
}

pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    let mut found = None;
    for line in raw.lines() {
        let line = line.trim();
        let line = line.strip_prefix(HTTP_ONLY_PREFIX).unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() == 7 {
            if fields[5].trim() == name {
                found = Some(fields[6].trim().to_string());
            }
            continue;
        }

        for pair in strip_header_name(line).split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key.trim() == name {
                found = Some(value.trim().trim_matches('"').to_string());
            }
        }
    }

    // Later entries win, matching how a jar overwrites older values.
    found.filter(|value| !value.is_empty())
}

/// Drops a leading `Cookie:` header name, matched case-insensitively.
fn strip_header_name(line: &str) -> &str {
    match line.split_once(':') {
        Some((name, rest)) if name.trim().eq_ignore_ascii_case("cookie") => rest,
        _ => line,
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;

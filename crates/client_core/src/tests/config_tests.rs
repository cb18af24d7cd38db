use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_point_at_public_backend() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.token_cookie, "token");
    assert_eq!(settings.page_options().success_banner, Duration::from_secs(3));
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("MBKM_API_BASE_URL", "http://short.example/api"),
            ("APP__API_BASE_URL", "http://app.example/api"),
            ("MBKM_COOKIE_JAR", "/tmp/jar.txt"),
        ]),
    );
    assert_eq!(settings.api_base_url, "http://app.example/api");
    assert_eq!(settings.cookie_jar, Some(PathBuf::from("/tmp/jar.txt")));
}

#[test]
fn blank_or_invalid_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("MBKM_API_BASE_URL", "   "),
            ("APP__SUCCESS_BANNER_MS", "soon"),
        ]),
    );
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.success_banner_ms, 3000);
}

#[test]
fn settings_file_overrides_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("mbkm_settings_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("mbkm.toml");
    fs::write(
        &path,
        "api_base_url = \"http://localhost:4000/api\"\ntoken_cookie = \"auth\"\nsuccess_banner_ms = 500\n",
    )
    .expect("write settings");

    let file_cfg = load_settings_file(&path).expect("parse");
    let mut settings = Settings::default();
    apply_file_settings(&mut settings, file_cfg);

    assert_eq!(settings.api_base_url, "http://localhost:4000/api");
    assert_eq!(settings.token_cookie, "auth");
    assert_eq!(
        settings.page_options().success_banner,
        Duration::from_millis(500)
    );

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_settings_file_reports_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("mbkm_settings_bad_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("mbkm.toml");
    fs::write(&path, "success_banner_ms = \"later\"").expect("write settings");

    let err = load_settings_file(&path).expect_err("must fail");
    assert!(format!("{err:#}").contains("mbkm.toml"));

    fs::remove_dir_all(dir).expect("cleanup");
}

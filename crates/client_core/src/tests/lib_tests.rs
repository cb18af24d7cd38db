use super::*;
use std::sync::Arc;

#[tokio::test]
async fn missing_api_reports_every_read_as_unavailable() {
    let api = MissingMbkmApi;

    let err = api.fetch_student("A11").await.expect_err("no backend");
    assert!(err.to_string().contains("A11"));
    assert!(api.fetch_programs().await.is_err());
    assert!(api.fetch_supervisors().await.is_err());
}

#[tokio::test]
async fn page_over_missing_api_lands_in_error_view() {
    let page = StudentEditPage::new(
        "A11",
        Arc::new(MissingMbkmApi),
        Arc::new(StaticCredentials::new("t")),
    );

    let err = page.load().await.expect_err("load must fail");
    assert!(matches!(err, PageError::Load { .. }));
    assert_eq!(
        page.view().await,
        PageView::Error(page::LOAD_FAILED_MESSAGE.to_string())
    );
}

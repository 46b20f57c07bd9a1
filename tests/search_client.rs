// SPDX-License-Identifier: MPL-2.0
//! Exercises the HTTP client against a stub search server on a local port.

use axum::{
    extract::{Multipart, Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use search_lens::error::{Error, HttpError};
use search_lens::fragment::{Block, Fragment, HelpDocument};
use search_lens::search::query::{ResultsQuery, SearchSubmission};
use search_lens::search::routes::{ApiVariant, Routes};
use search_lens::search::validation::SelectedImage;
use search_lens::search::{SearchClient, SearchResponse};
use std::collections::HashMap;
use std::time::Duration;

const INDEX_PAGE: &str = r#"<html><head><script>
    window.MAX_CHARS_TEXT_FILTER = 100;
    window.MAX_UPLOAD_SIZE = 2048;
    window.ALLOWED_EXTENSIONS = ".png,.webp";
</script></head><body></body></html>"#;

const HELP_PAGE: &str = r#"<h1>Help</h1>
<div class="hover-table-help">Photos<div class="accordion-text-block"><p>Pick one.</p></div></div>
<div class="hover-table-help">Text<div class="accordion-text-block"><p>Type it.</p></div></div>"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn help() -> Html<&'static str> {
    Html(HELP_PAGE)
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Redirect {
    if form.get("password").map(String::as_str) == Some("secret") {
        Redirect::to("/")
    } else {
        Redirect::to("/login")
    }
}

async fn login_page() -> Html<&'static str> {
    Html("<form>password</form>")
}

async fn search(mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(str::to_owned);
            let _ = field.bytes().await;
        } else {
            fields.insert(name, field.text().await.unwrap_or_default());
        }
    }

    match fields.get("query_text").map(String::as_str) {
        Some("huge") => (StatusCode::PAYLOAD_TOO_LARGE, "too large").into_response(),
        Some("") if file_name.is_none() => Json(serde_json::json!({
            "errors": "No photo, no text,Pick a photo or type a query"
        }))
        .into_response(),
        _ => {
            let id = format!(
                "{}|{}|{}",
                file_name.unwrap_or_else(|| "none".to_string()),
                fields.get("text_filter").cloned().unwrap_or_default(),
                fields.get("include_digits").cloned().unwrap_or_default(),
            );
            Json(serde_json::json!({ "results_id": id })).into_response()
        }
    }
}

async fn results(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("queryText").map(String::as_str) == Some("fail") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let id = params
        .get("resultsId")
        .cloned()
        .unwrap_or_else(|| "none".to_string());
    let page = params.get("page").cloned().unwrap_or_default();
    Html(format!(
        r#"<p>resultsId={id} page={page}</p><img src="/static/a.png" alt="a">"#
    ))
    .into_response()
}

async fn category(
    Path(group): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let page = params.get("page").cloned().unwrap_or_default();
    Html(format!("<h2>{group}</h2><p>page {page}</p>"))
}

async fn article(Path((group, item)): Path<(String, String)>) -> Html<String> {
    Html(format!("<h2>{group} {item}</h2>"))
}

async fn result_group(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(format!(
        "<h2>{}</h2><p>page {}</p>",
        params.get("id").cloned().unwrap_or_default(),
        params.get("page").cloned().unwrap_or_default()
    ))
}

async fn result_item(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    Html(format!(
        "<h2>{} {}</h2>",
        params.get("group_id").cloned().unwrap_or_default(),
        params.get("item_id").cloned().unwrap_or_default()
    ))
}

async fn image() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G']
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/", get(index))
        .route("/help", get(help))
        .route("/login", post(login).get(login_page))
        .route("/locale=nl", get(|| async { StatusCode::OK }))
        .route("/search", post(search))
        .route("/search/results", get(results))
        .route("/categories/:group", get(category))
        .route("/categories/:group/articles/:item", get(article))
        .route("/result/group", get(result_group))
        .route("/result/item", get(result_item))
        .route("/static/a.png", get(image));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{addr}/")
}

fn client(base: &str, variant: ApiVariant) -> SearchClient {
    let routes = Routes::new(base, variant).expect("valid base url");
    SearchClient::new(routes, Duration::from_secs(5)).expect("http client")
}

fn query(results_id: Option<&str>, page: u32) -> ResultsQuery {
    ResultsQuery {
        query_text: String::new(),
        results_id: results_id.map(str::to_owned),
        include_digits: false,
        page,
    }
}

fn submission(text: &str) -> SearchSubmission {
    SearchSubmission {
        query_text: text.to_string(),
        text_filter: true,
        include_digits: true,
    }
}

fn paragraph_text(fragment: &Fragment) -> String {
    fragment
        .blocks
        .iter()
        .map(|block| format!("{:?}", block))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn page_globals_are_read_from_index() {
    let base = spawn_server().await;
    let globals = client(&base, ApiVariant::Categories)
        .fetch_page_globals()
        .await
        .expect("index page");

    assert_eq!(globals.max_upload_size, Some(2048));
    assert_eq!(globals.max_chars_text_filter, Some(100));
    assert_eq!(globals.allowed_extensions.as_deref(), Some(".png,.webp"));
}

#[tokio::test]
async fn login_reports_acceptance() {
    let base = spawn_server().await;
    let client = client(&base, ApiVariant::Categories);

    assert!(client.login("secret").await.expect("login request"));
    assert!(!client.login("wrong").await.expect("login request"));
}

#[tokio::test]
async fn locale_and_help_are_fetched() {
    let base = spawn_server().await;
    let client = client(&base, ApiVariant::Categories);

    client.select_locale("nl").await.expect("locale");
    let help = HelpDocument::parse(&client.fetch_help().await.expect("help page"));
    assert_eq!(help.sections.len(), 2);
    assert_eq!(help.sections[0].title, "Photos");
}

#[tokio::test]
async fn search_with_image_returns_results_id() {
    let base = spawn_server().await;
    let image = SelectedImage {
        name: "cobra.png".to_string(),
        size: 4,
        bytes: vec![1, 2, 3, 4],
    };

    let response = client(&base, ApiVariant::Categories)
        .post_search(submission("cobra"), Some(image))
        .await
        .expect("search");

    assert_eq!(
        response,
        SearchResponse::Results {
            results_id: "cobra.png|true|true".to_string()
        }
    );
}

#[tokio::test]
async fn search_without_image_omits_file_part() {
    let base = spawn_server().await;
    let response = client(&base, ApiVariant::Categories)
        .post_search(submission("cobra"), None)
        .await
        .expect("search");

    match response {
        SearchResponse::Results { results_id } => assert!(results_id.starts_with("none|")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn validation_errors_keep_the_server_string() {
    let base = spawn_server().await;
    let response = client(&base, ApiVariant::Categories)
        .post_search(submission(""), None)
        .await
        .expect("search");

    assert_eq!(
        response,
        SearchResponse::Errors {
            errors: vec!["No photo, no text,Pick a photo or type a query".to_string()]
        }
    );
}

#[tokio::test]
async fn payload_too_large_maps_to_its_own_key() {
    let base = spawn_server().await;
    let err = client(&base, ApiVariant::Categories)
        .post_search(submission("huge"), None)
        .await
        .expect_err("413");

    assert!(matches!(err, Error::Http(HttpError::Status(413))));
    assert_eq!(err.i18n_key(), "error-server-upload-too-large");
}

#[tokio::test]
async fn results_request_carries_results_id_only_when_known() {
    let base = spawn_server().await;
    let client = client(&base, ApiVariant::Categories);

    let with_id = Fragment::parse(&client.fetch_results(query(Some("abc"), 2)).await.expect("results"));
    assert!(paragraph_text(&with_id).contains("resultsId=abc page=2"));
    assert_eq!(with_id.image_sources(), vec!["/static/a.png".to_string()]);

    let without_id = Fragment::parse(&client.fetch_results(query(None, 1)).await.expect("results"));
    assert!(paragraph_text(&without_id).contains("resultsId=none page=1"));
}

#[tokio::test]
async fn server_errors_become_status_errors() {
    let base = spawn_server().await;
    let mut failing = query(None, 1);
    failing.query_text = "fail".to_string();

    let err = client(&base, ApiVariant::Categories)
        .fetch_results(failing)
        .await
        .expect_err("500");
    assert!(matches!(err, Error::Http(HttpError::Status(500))));
}

#[tokio::test]
async fn categories_variant_fetches_group_and_item() {
    let base = spawn_server().await;
    let client = client(&base, ApiVariant::Categories);

    let group = Fragment::parse(
        &client
            .fetch_group("cobra".to_string(), query(None, 3))
            .await
            .expect("group"),
    );
    assert!(matches!(group.blocks.first(), Some(Block::Heading { .. })));
    assert!(paragraph_text(&group).contains("page 3"));

    let item = client
        .fetch_item("cobra".to_string(), "6".to_string())
        .await
        .expect("item");
    assert!(item.contains("cobra 6"));
}

#[tokio::test]
async fn groups_variant_fetches_group_and_item() {
    let base = spawn_server().await;
    let client = client(&base, ApiVariant::Groups);

    let group = client
        .fetch_group("g1".to_string(), query(None, 2))
        .await
        .expect("group");
    assert!(group.contains("g1") && group.contains("page 2"));

    let item = client
        .fetch_item("g1".to_string(), "i9".to_string())
        .await
        .expect("item");
    assert!(item.contains("g1 i9"));
}

#[tokio::test]
async fn fragment_images_resolve_against_base() {
    let base = spawn_server().await;
    let bytes = client(&base, ApiVariant::Categories)
        .fetch_image("/static/a.png".to_string())
        .await
        .expect("image");
    assert_eq!(&bytes[1..], b"PNG");
}

#[tokio::test]
async fn unreachable_server_is_a_connect_error() {
    // Bind and drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local address");
    drop(listener);

    let err = client(&format!("http://{addr}/"), ApiVariant::Categories)
        .fetch_help()
        .await
        .expect_err("nothing listens");
    assert_eq!(err.i18n_key(), "error-server-unreachable");
}

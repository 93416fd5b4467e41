use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

/// A submitted answer in the fixture.
#[derive(Clone, Debug)]
pub enum MockItem {
    Text { id: String, value: String },
    List { id: String, values: Vec<String> },
    /// Any item type the real service may add later (file, rating, ...).
    Other { id: String, kind: String, value: String },
}

#[derive(Clone, Debug)]
pub struct MockResult {
    pub id: String,
    pub status: String,
    pub items: Vec<MockItem>,
}

#[derive(Clone, Debug)]
pub struct MockForm {
    pub id: String,
    pub name: String,
    pub directory: String,
    pub state: String,
    pub last_modified: String,
    pub results: Vec<MockResult>,
}

#[derive(Clone, Debug)]
pub struct MockAccount {
    pub user: String,
    pub api_key: String,
    pub forms: Vec<MockForm>,
}

impl MockAccount {
    /// Account `demo` / key `demo-key` with one populated and one empty form.
    pub fn sample() -> Self {
        let survey = MockForm {
            id: "100".into(),
            name: "Customer Survey".into(),
            directory: "customer_survey".into(),
            state: "open".into(),
            last_modified: "2015-03-01 10:00:00".into(),
            results: vec![
                MockResult {
                    id: "9001".into(),
                    status: "Complete".into(),
                    items: vec![
                        MockItem::Text {
                            id: "10".into(),
                            value: "hello".into(),
                        },
                        MockItem::List {
                            id: "11".into(),
                            values: vec!["red".into(), "green".into()],
                        },
                        MockItem::Other {
                            id: "12".into(),
                            kind: "file".into(),
                            value: "upload.pdf".into(),
                        },
                    ],
                },
                MockResult {
                    id: "9002".into(),
                    status: "Incomplete".into(),
                    items: vec![MockItem::Text {
                        id: "10".into(),
                        value: "half typed".into(),
                    }],
                },
                MockResult {
                    id: "9003".into(),
                    status: "Partial".into(),
                    items: vec![MockItem::Text {
                        id: "10".into(),
                        value: "saved & resumed".into(),
                    }],
                },
            ],
        };
        let empty = MockForm {
            id: "101".into(),
            name: "Empty Form".into(),
            directory: "empty_form".into(),
            state: "closed".into(),
            last_modified: "2014-12-24 08:30:00".into(),
            results: Vec::new(),
        };
        Self {
            user: "demo".into(),
            api_key: "demo-key".into(),
            forms: vec![survey, empty],
        }
    }

    fn form(&self, directory: &str) -> Option<&MockForm> {
        self.forms.iter().find(|f| f.directory == directory)
    }
}

pub type Db = Arc<MockAccount>;

#[derive(Deserialize)]
pub struct ApiKeyParams {
    pub fs_api_key: Option<String>,
}

pub fn app() -> Router {
    app_with(MockAccount::sample())
}

pub fn app_with(account: MockAccount) -> Router {
    let db: Db = Arc::new(account);
    Router::new()
        .route("/api/users/{user}/forms", get(list_forms))
        .route("/api/users/{user}/forms/{directory}/status", get(form_status))
        .route("/api/users/{user}/forms/{directory}/results", get(form_results))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, account: MockAccount) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(account)).await
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    xml(
        status,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><fs_response status="failure"><error>{}</error></fs_response>"#,
            escape(message)
        ),
    )
}

fn success(payload: String) -> Response {
    xml(
        StatusCode::OK,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><fs_response status="success">{payload}</fs_response>"#
        ),
    )
}

/// Rejects requests for another user or with the wrong key.
fn authorize(db: &MockAccount, user: &str, params: &ApiKeyParams) -> Result<(), Response> {
    if user != db.user {
        return Err(failure(StatusCode::NOT_FOUND, "unknown user"));
    }
    if params.fs_api_key.as_deref() != Some(db.api_key.as_str()) {
        return Err(failure(StatusCode::UNAUTHORIZED, "invalid api key"));
    }
    Ok(())
}

async fn list_forms(
    State(db): State<Db>,
    Path(user): Path<String>,
    Query(params): Query<ApiKeyParams>,
) -> Response {
    if let Err(rejected) = authorize(&db, &user, &params) {
        return rejected;
    }
    success(render_forms(&db.forms))
}

async fn form_status(
    State(db): State<Db>,
    Path((user, directory)): Path<(String, String)>,
    Query(params): Query<ApiKeyParams>,
) -> Response {
    if let Err(rejected) = authorize(&db, &user, &params) {
        return rejected;
    }
    match db.form(&directory) {
        Some(form) => success(render_status(form)),
        None => failure(StatusCode::NOT_FOUND, "unknown form"),
    }
}

async fn form_results(
    State(db): State<Db>,
    Path((user, directory)): Path<(String, String)>,
    Query(params): Query<ApiKeyParams>,
) -> Response {
    if let Err(rejected) = authorize(&db, &user, &params) {
        return rejected;
    }
    match db.form(&directory) {
        Some(form) => success(render_results(&form.results)),
        None => failure(StatusCode::NOT_FOUND, "unknown form"),
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_forms(forms: &[MockForm]) -> String {
    let mut out = String::from("<forms>");
    for form in forms {
        out.push_str(&format!(
            r#"<form id="{}"><name>{}</name><directory>{}</directory></form>"#,
            escape(&form.id),
            escape(&form.name),
            escape(&form.directory)
        ));
    }
    out.push_str("</forms>");
    out
}

pub fn render_status(form: &MockForm) -> String {
    let items_used: usize = form.results.iter().map(|r| r.items.len()).sum();
    format!(
        concat!(
            "<status><state>{}</state><last_modified>{}</last_modified><limits>",
            r#"<limit type="items"><used>{}</used><total>100</total></limit>"#,
            r#"<limit type="results"><used>{}</used><total>1000</total></limit>"#,
            "</limits></status>"
        ),
        escape(&form.state),
        escape(&form.last_modified),
        items_used,
        form.results.len()
    )
}

pub fn render_results(results: &[MockResult]) -> String {
    let mut out = String::from("<results>");
    for result in results {
        out.push_str(&format!(
            r#"<result id="{}"><metas><meta id="result_status">{}</meta><meta id="date_update">2015-03-01 10:00:00</meta></metas><items>"#,
            escape(&result.id),
            escape(&result.status)
        ));
        for item in &result.items {
            out.push_str(&render_item(item));
        }
        out.push_str("</items></result>");
    }
    out.push_str("</results>");
    out
}

fn render_item(item: &MockItem) -> String {
    match item {
        MockItem::Text { id, value } => format!(
            r#"<item id="{}" type="text"><value>{}</value></item>"#,
            escape(id),
            escape(value)
        ),
        MockItem::List { id, values } => {
            let values: String = values
                .iter()
                .enumerate()
                .map(|(i, v)| format!(r#"<value index="{}">{}</value>"#, i + 1, escape(v)))
                .collect();
            format!(r#"<item id="{}" type="list">{values}</item>"#, escape(id))
        }
        MockItem::Other { id, kind, value } => format!(
            r#"<item id="{}" type="{}"><value>{}</value></item>"#,
            escape(id),
            escape(kind),
            escape(value)
        ),
    }
}

//! Stateless HTTP request builder and response parser for the FormSite API.
//!
//! # Design
//! `FormSiteClient` holds only the account's `Credentials` and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. Executing the round-trip is left to a `Transport`, so
//! everything here is deterministic.

use tracing::debug;

use crate::config::Credentials;
use crate::document;
use crate::error::ApiError;
use crate::http::{path_segment, HttpRequest, HttpResponse};
use crate::mapper;
use crate::types::{FormEntry, FormResult, FormStatus};

/// Name of the query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "fs_api_key";

/// Synchronous, stateless client for one FormSite account.
#[derive(Debug, Clone)]
pub struct FormSiteClient {
    credentials: Credentials,
}

impl FormSiteClient {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn user(&self) -> &str {
        self.credentials.user()
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{path}", self.credentials.base_url()))
            .with_query(API_KEY_PARAM, self.credentials.api_key())
    }

    pub fn build_list_forms(&self) -> HttpRequest {
        self.request("forms")
    }

    pub fn build_form_status(&self, directory: &str) -> HttpRequest {
        self.request(&format!("forms/{}/status", path_segment(directory)))
    }

    pub fn build_form_results(&self, directory: &str) -> HttpRequest {
        self.request(&format!("forms/{}/results", path_segment(directory)))
    }

    pub fn parse_list_forms(&self, response: HttpResponse) -> Result<Vec<FormEntry>, ApiError> {
        check_status(&response)?;
        let doc = document::parse(&response.body)?;
        mapper::map_forms(&doc)
    }

    pub fn parse_form_status(&self, response: HttpResponse) -> Result<FormStatus, ApiError> {
        check_status(&response)?;
        let doc = document::parse(&response.body)?;
        mapper::map_status(&doc)
    }

    pub fn parse_form_results(&self, response: HttpResponse) -> Result<Vec<FormResult>, ApiError> {
        check_status(&response)?;
        let doc = document::parse(&response.body)?;
        mapper::map_results(&doc)
    }
}

/// Anything outside 2xx is a transport failure; the body is kept for
/// diagnostics.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    debug!(status = response.status, "request failed");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn client() -> FormSiteClient {
        FormSiteClient::new(Credentials::new("bob", "key123"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_forms_produces_correct_request() {
        let req = client().build_list_forms();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://fs7.formsite.com/api/users/bob/forms");
        assert_eq!(
            req.query,
            vec![("fs_api_key".to_string(), "key123".to_string())]
        );
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_form_status_uses_directory() {
        let req = client().build_form_status("survey1");
        assert_eq!(
            req.url,
            "https://fs7.formsite.com/api/users/bob/forms/survey1/status"
        );
        assert_eq!(req.query_param(API_KEY_PARAM), Some("key123"));
    }

    #[test]
    fn build_form_results_uses_directory() {
        let req = client().build_form_results("survey1");
        assert_eq!(
            req.url,
            "https://fs7.formsite.com/api/users/bob/forms/survey1/results"
        );
        assert_eq!(req.query_param(API_KEY_PARAM), Some("key123"));
    }

    #[test]
    fn directory_is_percent_encoded() {
        let req = client().build_form_results("my survey#2");
        assert_eq!(
            req.url,
            "https://fs7.formsite.com/api/users/bob/forms/my%20survey%232/results"
        );
        let req = client().build_form_status("a/b");
        assert_eq!(
            req.url,
            "https://fs7.formsite.com/api/users/bob/forms/a%2Fb/status"
        );
    }

    #[test]
    fn api_root_override_is_used() {
        let client = FormSiteClient::new(
            Credentials::new("bob", "k").with_api_root("http://localhost:3000"),
        );
        assert_eq!(
            client.build_list_forms().url,
            "http://localhost:3000/api/users/bob/forms"
        );
    }

    #[test]
    fn parse_list_forms_success() {
        let body = r#"<fs_response status="success"><forms>
            <form id="100"><name>Survey</name><directory>abc</directory></form>
        </forms></fs_response>"#;
        let forms = client().parse_list_forms(response(200, body)).unwrap();
        assert_eq!(
            forms,
            vec![FormEntry {
                id: "100".into(),
                name: "Survey".into(),
                directory: "abc".into(),
            }]
        );
    }

    #[test]
    fn parse_list_forms_http_error() {
        let err = client()
            .parse_list_forms(response(401, "invalid api key"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
        assert!(err.is_transport());
    }

    #[test]
    fn parse_list_forms_bad_xml() {
        let err = client()
            .parse_list_forms(response(200, "<html>oops"))
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn parse_form_status_success() {
        let body = r#"<fs_response><status>
            <state>closed</state><last_modified>2015-02-01</last_modified>
            <limit type="items"><used>1</used><total>2</total></limit>
            <limit type="results"><used>3</used><total>4</total></limit>
        </status></fs_response>"#;
        let status = client().parse_form_status(response(200, body)).unwrap();
        assert_eq!(status.state, "closed");
        assert_eq!(status.limit_results.used, "3");
    }

    #[test]
    fn parse_form_status_server_error() {
        let err = client()
            .parse_form_status(response(500, "boom"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_form_results_empty() {
        let results = client()
            .parse_form_results(response(200, "<fs_response><results></results></fs_response>"))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn parse_form_results_failure_is_error_not_empty() {
        let err = client()
            .parse_form_results(response(503, ""))
            .unwrap_err();
        assert!(err.is_transport());
    }
}

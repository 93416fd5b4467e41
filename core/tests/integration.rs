//! End-to-end test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Account` over real
//! HTTP through `UreqTransport`, checking that request building, transport
//! and XML mapping agree with what the server actually emits.

use std::sync::Arc;

use formsite_core::{Account, ApiError, Credentials, ItemValue, ResultStatus, UreqTransport};
use mock_server::{MockAccount, MockForm, MockItem, MockResult};

/// Serve the sample fixture on a random port and return its root URL.
fn start_server() -> String {
    start_server_with(MockAccount::sample())
}

/// Serve `account` on a random port and return its root URL.
fn start_server_with(account: MockAccount) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, account).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn connect(root: &str, api_key: &str) -> Result<Account, ApiError> {
    let credentials = Credentials::new("demo", api_key).with_api_root(root);
    Account::connect(credentials, Arc::new(UreqTransport::new()))
}

#[test]
fn account_walkthrough() {
    let root = start_server();

    // Step 1: construction lists forms in server order.
    let account = connect(&root, "demo-key").unwrap();
    assert_eq!(account.len(), 2);
    let dirs: Vec<&str> = account.iter().map(|f| f.directory()).collect();
    assert_eq!(dirs, vec!["customer_survey", "empty_form"]);
    assert_eq!(account[0].id(), "100");
    assert_eq!(account[0].name(), "Customer Survey");

    // Step 2: status of the populated form.
    let status = account[0].status().unwrap();
    assert_eq!(status.state, "open");
    assert_eq!(status.last_modified, "2015-03-01 10:00:00");
    assert_eq!(status.limit_results.used, "3");
    assert_eq!(status.limit_results.total, "1000");
    assert_eq!(status.limit_items.total, "100");

    // Step 3: results keep document order.
    let results = account[0].results().unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["9001", "9002", "9003"]);

    // Step 4: complete result exposes text and list items; the file item is skipped.
    let complete = results.get(0).unwrap();
    assert!(complete.is_complete());
    assert_eq!(complete.meta.get("date_update"), Some("2015-03-01 10:00:00"));
    assert_eq!(complete.items.len(), 2);
    assert_eq!(complete.items["10"], ItemValue::Text("hello".into()));
    let list = complete.items["11"].as_list().unwrap();
    assert_eq!(list["1"], "red");
    assert_eq!(list["2"], "green");
    assert!(!complete.items.contains_key("12"));

    // Step 5: incomplete result hides its items.
    let incomplete = results.get(1).unwrap();
    assert_eq!(incomplete.status(), Some(ResultStatus::Incomplete));
    assert!(!incomplete.is_complete());
    assert!(incomplete.items.is_empty());

    // Step 6: partial result is not complete but keeps its items.
    let partial = results.get(2).unwrap();
    assert!(!partial.is_complete());
    assert_eq!(partial.items["10"].as_text(), Some("saved & resumed"));

    // Step 7: a form with no results yields an empty collection.
    let empty = account[1].results().unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.len(), 0);
    assert_eq!(account[1].status().unwrap().state, "closed");
}

#[test]
fn wrong_key_fails_construction() {
    let root = start_server();
    let err = connect(&root, "wrong").unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
}

#[test]
fn unreachable_server_fails_construction() {
    let err = connect("http://127.0.0.1:1", "demo-key").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn awkward_slugs_and_long_lists_survive_the_round_trip() {
    let options: Vec<String> = (1..=12).map(|i| format!("option {i}")).collect();
    let form = MockForm {
        id: "200".into(),
        name: "Spring Survey".into(),
        directory: "spring survey#1".into(),
        state: "open".into(),
        last_modified: "2015-04-01 09:00:00".into(),
        results: vec![MockResult {
            id: "1".into(),
            status: "Complete".into(),
            items: vec![
                MockItem::Text {
                    id: "9".into(),
                    value: "first".into(),
                },
                MockItem::List {
                    id: "10".into(),
                    values: options.clone(),
                },
            ],
        }],
    };
    let root = start_server_with(MockAccount {
        forms: vec![form],
        ..MockAccount::sample()
    });

    let account = connect(&root, "demo-key").unwrap();
    assert_eq!(account.len(), 1);
    assert_eq!(account[0].directory(), "spring survey#1");

    let results = account[0].results().unwrap();
    let result = results.get(0).unwrap();
    let ids: Vec<&str> = result.items.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["9", "10"]);

    let list = result.items["10"].as_list().unwrap();
    let indices: Vec<&str> = list.keys().map(String::as_str).collect();
    let expected: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
    assert_eq!(indices, expected);
    let values: Vec<String> = list.values().cloned().collect();
    assert_eq!(values, options);

    assert_eq!(account[0].status().unwrap().limit_results.used, "1");
}

#[test]
fn account_without_forms_is_empty() {
    let root = start_server_with(MockAccount {
        forms: Vec::new(),
        ..MockAccount::sample()
    });
    let account = connect(&root, "demo-key").unwrap();
    assert!(account.is_empty());
}

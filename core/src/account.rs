//! Object model over a FormSite account.
//!
//! # Design
//! `Account` fetches the forms listing once, at construction, and keeps the
//! resulting `Form` handles for its lifetime. Each `Form` shares the
//! account's client and transport, so it can issue its own requests after
//! the `Account` is gone. `Form::status` and `Form::results` perform a fresh
//! network round-trip on every call; nothing is memoized.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use tracing::debug;

use crate::client::FormSiteClient;
use crate::config::Credentials;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{FormEntry, FormResult, FormStatus};

struct Session {
    client: FormSiteClient,
    transport: Arc<dyn Transport>,
}

/// A FormSite account and the forms it owned when it was constructed.
pub struct Account {
    session: Arc<Session>,
    forms: Vec<Form>,
}

impl Account {
    /// Connect to the default shard over `ureq` and list the account's forms.
    ///
    /// # Errors
    /// Fails if the listing request fails or its body cannot be mapped.
    pub fn new(user: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::connect(Credentials::new(user, api_key), Arc::new(UreqTransport::new()))
    }

    /// Like `new`, with credentials taken from `FORMSITE_*` variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::connect(Credentials::from_env()?, Arc::new(UreqTransport::new()))
    }

    pub fn connect(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(Session {
            client: FormSiteClient::new(credentials),
            transport,
        });

        let request = session.client.build_list_forms();
        let response = session.transport.execute(&request)?;
        let entries = session.client.parse_list_forms(response)?;
        debug!(user = session.client.user(), forms = entries.len(), "account connected");

        let forms = entries
            .into_iter()
            .map(|entry| Form {
                entry,
                session: Arc::clone(&session),
            })
            .collect();
        Ok(Self { session, forms })
    }

    pub fn user(&self) -> &str {
        self.session.client.user()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Form> {
        self.forms.get(index)
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Form> {
        self.forms.iter()
    }
}

impl Index<usize> for Account {
    type Output = Form;

    fn index(&self, index: usize) -> &Form {
        &self.forms[index]
    }
}

impl<'a> IntoIterator for &'a Account {
    type Item = &'a Form;
    type IntoIter = std::slice::Iter<'a, Form>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.iter()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("credentials", self.session.client.credentials())
            .field("forms", &self.forms)
            .finish()
    }
}

/// Handle to one form of an account.
#[derive(Clone)]
pub struct Form {
    entry: FormEntry,
    session: Arc<Session>,
}

impl Form {
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Routing slug used in every form-scoped request.
    pub fn directory(&self) -> &str {
        &self.entry.directory
    }

    pub fn user(&self) -> &str {
        self.session.client.user()
    }

    pub fn entry(&self) -> &FormEntry {
        &self.entry
    }

    /// Fetch the form's current status. Every call hits the network.
    pub fn status(&self) -> Result<FormStatus, ApiError> {
        let client = &self.session.client;
        let request = client.build_form_status(self.directory());
        let response = self.session.transport.execute(&request)?;
        client.parse_form_status(response)
    }

    /// Fetch the form's results. Every call hits the network and returns a
    /// fresh collection; an empty collection means the form has no results.
    pub fn results(&self) -> Result<ResultCollection, ApiError> {
        let client = &self.session.client;
        let request = client.build_form_results(self.directory());
        let response = self.session.transport.execute(&request)?;
        let results = client.parse_form_results(response)?;
        debug!(directory = self.directory(), results = results.len(), "fetched results");
        Ok(ResultCollection { results })
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}@{}>", self.name(), self.directory(), self.user())
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.entry.id)
            .field("directory", &self.entry.directory)
            .field("user", &self.user())
            .finish_non_exhaustive()
    }
}

/// Results of one `Form::results` call, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCollection {
    results: Vec<FormResult>,
}

impl ResultCollection {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FormResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormResult> {
        self.results.iter()
    }

    pub fn into_vec(self) -> Vec<FormResult> {
        self.results
    }
}

impl IntoIterator for ResultCollection {
    type Item = FormResult;
    type IntoIter = std::vec::IntoIter<FormResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a FormResult;
    type IntoIter = std::slice::Iter<'a, FormResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

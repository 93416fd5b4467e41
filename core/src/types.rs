//! Records mapped from FormSite XML documents.
//!
//! # Design
//! All values stay opaque text as delivered by the service; nothing is
//! coerced to numbers or dates. Metadata is a keyed map because the set of
//! meta fields varies per account, but the one field that drives behaviour
//! (`result_status`) is exposed through a typed accessor.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of the forms listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEntry {
    pub id: String,
    pub name: String,
    pub directory: String,
}

/// Which usage counter a `Limit` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    Items,
    Results,
}

impl LimitKind {
    /// Value of the `type` attribute on the `<limit>` element.
    pub fn as_str(self) -> &'static str {
        match self {
            LimitKind::Items => "items",
            LimitKind::Results => "results",
        }
    }
}

/// A used/total usage counter pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub used: String,
    pub total: String,
}

/// Snapshot of a form's state and usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatus {
    pub state: String,
    pub last_modified: String,
    pub limit_items: Limit,
    pub limit_results: Limit,
}

impl FormStatus {
    pub fn limit(&self, kind: LimitKind) -> &Limit {
        match kind {
            LimitKind::Items => &self.limit_items,
            LimitKind::Results => &self.limit_results,
        }
    }
}

/// Completion state of a result, read from its `result_status` meta field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    Complete,
    Incomplete,
    Other(String),
}

impl ResultStatus {
    /// Exact, case-sensitive match against the service's vocabulary.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Complete" => ResultStatus::Complete,
            "Incomplete" => ResultStatus::Incomplete,
            other => ResultStatus::Other(other.to_string()),
        }
    }
}

/// Meta fields of a result keyed by their `id` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMeta {
    fields: BTreeMap<String, String>,
}

impl ResultMeta {
    pub const RESULT_STATUS: &'static str = "result_status";

    pub fn get(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    /// `None` when the document carried no `result_status` meta.
    pub fn result_status(&self) -> Option<ResultStatus> {
        self.get(Self::RESULT_STATUS).map(ResultStatus::parse)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for ResultMeta {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    Text(String),
    /// Multi-valued answer keyed by each value's `index` attribute.
    List(ListValues),
}

impl ItemValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemValue::Text(text) => Some(text),
            ItemValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValues> {
        match self {
            ItemValue::Text(_) => None,
            ItemValue::List(values) => Some(values),
        }
    }
}

/// Values of a list item, `index` to text, in document order.
pub type ListValues = IndexMap<String, String>;

/// Submitted answers keyed by item id, in document order.
pub type Items = IndexMap<String, ItemValue>;

/// One submission against a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResult {
    pub id: String,
    pub meta: ResultMeta,
    /// Empty when the result is `Incomplete`.
    pub items: Items,
}

impl FormResult {
    pub fn status(&self) -> Option<ResultStatus> {
        self.meta.result_status()
    }

    pub fn is_complete(&self) -> bool {
        self.status() == Some(ResultStatus::Complete)
    }
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result {}", self.id)?;
        if let Some(status) = self.meta.get(ResultMeta::RESULT_STATUS) {
            write!(f, " ({status})")?;
        }
        Ok(())
    }
}

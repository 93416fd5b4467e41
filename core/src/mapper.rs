//! Maps parsed FormSite documents onto typed records.
//!
//! Every function here is pure: it takes nodes of an already-parsed
//! document and returns records or a `MalformedResponse` error. Ordering is
//! always document order.

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::document::{
    child, child_text, children, descendants, require_attribute, require_section, text,
};
use crate::error::ApiError;
use crate::types::{
    FormEntry, FormResult, FormStatus, ItemValue, Items, Limit, LimitKind, ListValues,
    ResultMeta, ResultStatus,
};

/// Item types the mapper understands. Anything else is skipped.
pub const ITEM_TYPE_TEXT: &str = "text";
pub const ITEM_TYPE_LIST: &str = "list";

pub fn map_forms(doc: &Document<'_>) -> Result<Vec<FormEntry>, ApiError> {
    let forms = require_section(doc, "forms")?;
    let entries = children(forms, "form")
        .map(map_form_entry)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = entries.len(), "mapped forms listing");
    Ok(entries)
}

pub fn map_form_entry(form: Node<'_, '_>) -> Result<FormEntry, ApiError> {
    Ok(FormEntry {
        id: require_attribute(form, "id")?.to_string(),
        name: child_text(form, "name")?,
        directory: child_text(form, "directory")?,
    })
}

pub fn map_status(doc: &Document<'_>) -> Result<FormStatus, ApiError> {
    let status = require_section(doc, "status")?;
    Ok(FormStatus {
        state: child_text(status, "state")?,
        last_modified: child_text(status, "last_modified")?,
        limit_items: map_limit(status, LimitKind::Items)?,
        limit_results: map_limit(status, LimitKind::Results)?,
    })
}

fn map_limit(status: Node<'_, '_>, kind: LimitKind) -> Result<Limit, ApiError> {
    let limit = descendants(status, "limit")
        .find(|l| l.attribute("type") == Some(kind.as_str()))
        .ok_or_else(|| {
            ApiError::malformed(format!("status has no <limit type=\"{}\">", kind.as_str()))
        })?;
    Ok(Limit {
        used: child_text(limit, "used")?,
        total: child_text(limit, "total")?,
    })
}

/// Map every `<result>` of the results section. Zero results is an empty
/// vector, not an error.
pub fn map_results(doc: &Document<'_>) -> Result<Vec<FormResult>, ApiError> {
    let results = require_section(doc, "results")?;
    let mapped = children(results, "result")
        .map(map_result)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = mapped.len(), "mapped results");
    Ok(mapped)
}

pub fn map_result(result: Node<'_, '_>) -> Result<FormResult, ApiError> {
    let id = require_attribute(result, "id")?.to_string();
    let meta = map_meta(result)?;
    let items = match meta.result_status() {
        Some(ResultStatus::Incomplete) => Items::new(),
        _ => match child(result, "items") {
            Some(items) => map_items(items)?,
            None => Items::new(),
        },
    };
    Ok(FormResult { id, meta, items })
}

fn map_meta(result: Node<'_, '_>) -> Result<ResultMeta, ApiError> {
    descendants(result, "meta")
        .map(|meta| -> Result<_, ApiError> {
            Ok((require_attribute(meta, "id")?.to_string(), text(meta)))
        })
        .collect()
}

pub fn map_items(items: Node<'_, '_>) -> Result<Items, ApiError> {
    let mut mapped = Items::new();
    for item in descendants(items, "item") {
        let id = require_attribute(item, "id")?;
        let value = match require_attribute(item, "type")? {
            ITEM_TYPE_TEXT => ItemValue::Text(child_text(item, "value")?),
            ITEM_TYPE_LIST => ItemValue::List(map_list_values(item)?),
            other => {
                warn!(item = id, item_type = other, "skipping item of unrecognized type");
                continue;
            }
        };
        mapped.insert(id.to_string(), value);
    }
    Ok(mapped)
}

fn map_list_values(item: Node<'_, '_>) -> Result<ListValues, ApiError> {
    descendants(item, "value")
        .map(|value| -> Result<_, ApiError> {
            Ok((require_attribute(value, "index")?.to_string(), text(value)))
        })
        .collect()
}

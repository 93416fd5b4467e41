//! XML document access on top of `roxmltree`.
//!
//! The live service wraps every payload in an `<fs_response>` element, so a
//! named section is looked up either as the root itself or as a direct child
//! of the root.

use roxmltree::{Document, Node};

use crate::error::ApiError;

pub fn parse(body: &str) -> Result<Document<'_>, ApiError> {
    Document::parse(body).map_err(|e| ApiError::malformed(format!("invalid XML: {e}")))
}

/// The `name` section of `doc`, or `None` if the document has none.
pub fn section<'a, 'input>(doc: &'a Document<'input>, name: &str) -> Option<Node<'a, 'input>> {
    let root = doc.root_element();
    if root.has_tag_name(name) {
        return Some(root);
    }
    child(root, name)
}

/// Like `section`, but absence is a malformed response.
pub fn require_section<'a, 'input>(
    doc: &'a Document<'input>,
    name: &str,
) -> Result<Node<'a, 'input>, ApiError> {
    section(doc, name).ok_or_else(|| ApiError::malformed(format!("missing <{name}> section")))
}

/// First direct child element called `name`.
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.has_tag_name(name))
}

/// Every element called `name` below `node`, in document order.
pub fn descendants<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.has_tag_name(name))
}

pub fn require_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>, ApiError> {
    child(node, name).ok_or_else(|| {
        ApiError::malformed(format!(
            "<{}> has no <{name}> element",
            node.tag_name().name()
        ))
    })
}

pub fn require_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, ApiError> {
    node.attribute(name).ok_or_else(|| {
        ApiError::malformed(format!(
            "<{}> has no `{name}` attribute",
            node.tag_name().name()
        ))
    })
}

/// Text content of `node`; an element with no text yields an empty string.
pub fn text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().to_string()
}

/// Text of the required child element `name`.
pub fn child_text(node: Node<'_, '_>, name: &str) -> Result<String, ApiError> {
    require_child(node, name).map(text)
}

//! Document format templates.
//!
//! Templates interpolate document fields into text and are used both for the
//! label shown in the list (`header_format`) and for the string a query is
//! matched against (`match_format`).
//!
//! # Syntax
//!
//! - `{doc[title]}` or `{doc['title']}`: value of an info field (empty if absent)
//! - `{doc.subfolder}`: name of the document folder
//! - `{doc.folder}`: full folder path
//! - `{{` and `}}`: literal braces
//!
//! Anything else between braces is copied through unchanged.

use crate::domain::Document;

/// Renders `template` for `document`.
///
/// # Example
///
/// ```
/// use bibshelf::domain::{format_document, Document};
/// use std::collections::BTreeMap;
///
/// let mut info = BTreeMap::new();
/// info.insert("title".to_string(), serde_json::json!("SICP"));
/// let doc = Document::new("/host/papers/sicp", info);
///
/// assert_eq!(format_document("{doc[title]} ({doc.subfolder})", &doc), "SICP (sicp)");
/// ```
#[must_use]
pub fn format_document(template: &str, document: &Document) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail.find('}') {
                Some(end) => {
                    let field = &tail[1..end];
                    match resolve(field, document) {
                        Some(value) => out.push_str(&value),
                        None => out.push_str(&tail[..=end]),
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn resolve(field: &str, document: &Document) -> Option<String> {
    let field = field.trim();
    if let Some(key) = field
        .strip_prefix("doc[")
        .and_then(|f| f.strip_suffix(']'))
    {
        let key = key.trim_matches(|c| c == '\'' || c == '"');
        return Some(document.get(key));
    }
    match field {
        "doc.subfolder" => Some(document.subfolder().to_string()),
        "doc.folder" => Some(document.folder.clone()),
        _ => None,
    }
}

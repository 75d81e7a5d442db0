//! Parent router
//!
//! Derives the sync context a child stream runs under from one parent record.

use super::types::{ParentLink, SyncContext};
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::types::{JsonObject, JsonValue};

/// Builds child contexts from parent records
#[derive(Debug, Clone)]
pub struct ParentRouter<'a> {
    child: &'a str,
    link: &'a ParentLink,
}

impl<'a> ParentRouter<'a> {
    /// Create a router for `child` following `link`
    pub fn new(child: &'a str, link: &'a ParentLink) -> Self {
        Self { child, link }
    }

    /// Name of the parent stream
    pub fn parent(&self) -> &str {
        &self.link.stream
    }

    /// Sync context for one parent record
    ///
    /// A parent record lacking a linked field (or holding null there) cannot
    /// scope a child fetch and is a fatal error.
    pub fn context_for(&self, parent_record: &Record) -> Result<SyncContext> {
        let mut context = SyncContext::new();
        for field in &self.link.context {
            let value = extract_field(parent_record.as_object(), &field.parent_field)
                .filter(|v| !v.is_null())
                .ok_or_else(|| Error::missing_context(self.child, &field.context_key))?;
            context.insert(field.context_key.clone(), value.clone());
        }
        Ok(context)
    }
}

/// Extract a value from an object using a dot path like `id` or `source.id`
pub fn extract_field<'v>(object: &'v JsonObject, path: &str) -> Option<&'v JsonValue> {
    let mut parts = path.split('.');
    let mut current = object.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

//! Post-processing types and traits

use crate::error::Result;
use crate::partition::SyncContext;
use crate::types::JsonObject;
use std::sync::Arc;

/// Per-record normalization applied before schema conformance
///
/// Returning `Ok(None)` excludes the record. That is not an error: the
/// engine counts it and moves on.
pub trait PostProcessor: Send + Sync {
    fn post_process(&self, raw: JsonObject, context: &SyncContext) -> Result<Option<JsonObject>>;
}

impl<F> PostProcessor for F
where
    F: Fn(JsonObject, &SyncContext) -> Result<Option<JsonObject>> + Send + Sync,
{
    fn post_process(&self, raw: JsonObject, context: &SyncContext) -> Result<Option<JsonObject>> {
        self(raw, context)
    }
}

/// Declarative post-processing step
#[derive(Clone)]
pub enum PostProcessStep {
    /// Lower-case `custom_attributes` keys and replace spaces with `_`
    NormalizeCustomAttributes,

    /// Copy a sync-context key into the record
    InjectContext {
        /// Context key, also used as the record field name
        key: String,
    },

    /// Set `target` to whether `source` is a non-empty string
    FlagNonEmpty {
        /// Field to inspect
        source: String,
        /// Boolean field to write
        target: String,
    },

    /// Arbitrary processor
    Custom(Arc<dyn PostProcessor>),
}

impl PostProcessStep {
    /// Inject a context key
    pub fn inject(key: impl Into<String>) -> Self {
        Self::InjectContext { key: key.into() }
    }

    /// Derive a non-empty flag
    pub fn flag_non_empty(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::FlagNonEmpty {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Wrap a custom processor
    pub fn custom(processor: impl PostProcessor + 'static) -> Self {
        Self::Custom(Arc::new(processor))
    }
}

impl std::fmt::Debug for PostProcessStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NormalizeCustomAttributes => write!(f, "NormalizeCustomAttributes"),
            Self::InjectContext { key } => f.debug_struct("InjectContext").field("key", key).finish(),
            Self::FlagNonEmpty { source, target } => f
                .debug_struct("FlagNonEmpty")
                .field("source", source)
                .field("target", target)
                .finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

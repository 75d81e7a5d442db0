//! Stream registry
//!
//! The eight Intercom streams, built once on first use.

use super::schemas;
use super::types::{Catalog, StreamDefinition};
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::partition::ParentLink;
use crate::transform::PostProcessStep;
use crate::types::Method;
use std::sync::LazyLock;

static REGISTRY: LazyLock<StreamRegistry> = LazyLock::new(StreamRegistry::intercom);

/// Ordered set of stream definitions
#[derive(Debug, Clone)]
pub struct StreamRegistry {
    streams: Vec<StreamDefinition>,
}

impl StreamRegistry {
    /// The shared Intercom registry
    pub fn global() -> &'static StreamRegistry {
        &REGISTRY
    }

    /// Registry over arbitrary definitions
    pub fn new(streams: Vec<StreamDefinition>) -> Self {
        Self { streams }
    }

    fn intercom() -> Self {
        let conversations = StreamDefinition::new(
            "conversations",
            "/conversations/search",
            schemas::conversations(),
        )
        .search()
        .with_record_path("$.conversations[*]")
        .with_pagination(PaginationConfig::json_path_cursor(
            "$.pages.next.starting_after",
        ))
        .with_replication_key("updated_at")
        .with_step(PostProcessStep::NormalizeCustomAttributes);

        let conversation_parts = StreamDefinition::new(
            "conversation_parts",
            "/conversations/{conversation_id}",
            schemas::conversation_parts(),
        )
        .with_parent(ParentLink::new("conversations", "conversation_id", "id"))
        .with_record_path("$.conversation_parts.conversation_parts[*]")
        .with_replication_key("updated_at")
        .with_pagination(PaginationConfig::Single)
        .with_state_partitioning_keys(Vec::new())
        .with_step(PostProcessStep::inject("conversation_id"))
        .with_step(PostProcessStep::flag_non_empty(
            "body",
            "conversation_part_has_body",
        ));

        let admins = StreamDefinition::new("admins", "/admins", schemas::admins())
            .with_record_path("$.admins[*]");

        let tags = StreamDefinition::new("tags", "/tags", schemas::tags());

        let teams =
            StreamDefinition::new("teams", "/teams", schemas::teams()).with_record_path("$.teams[*]");

        let contacts = StreamDefinition::new("contacts", "/contacts/search", schemas::contacts())
            .search()
            .with_replication_key("updated_at")
            .with_step(PostProcessStep::NormalizeCustomAttributes);

        let articles = StreamDefinition::new("articles", "/articles", schemas::articles())
            .with_pagination(PaginationConfig::Hateoas);

        let articles_extended = StreamDefinition::new(
            "articles_extended",
            "/articles/{article_id}",
            schemas::articles_extended(),
        )
        .with_parent(ParentLink::new("articles", "article_id", "id"))
        .with_record_path("$")
        .with_pagination(PaginationConfig::Single)
        .with_step(PostProcessStep::inject("article_id"));

        Self::new(vec![
            conversations,
            conversation_parts,
            admins,
            tags,
            teams,
            contacts,
            articles,
            articles_extended,
        ])
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&StreamDefinition> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// All streams in registration order
    pub fn all(&self) -> &[StreamDefinition] {
        &self.streams
    }

    /// Stream names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Discovery catalog
    pub fn catalog(&self) -> Catalog {
        Catalog {
            streams: self.streams.iter().map(StreamDefinition::catalog_entry).collect(),
        }
    }

    /// Filters may only target search streams
    pub fn validate_filters(&self, config: &TapConfig) -> Result<()> {
        let mut names: Vec<&String> = config.filters.keys().collect();
        names.sort();
        for name in names {
            match self.get(name) {
                None => {
                    return Err(Error::invalid_value(
                        "filters",
                        format!("unknown stream '{name}'"),
                    ))
                }
                Some(stream) if stream.method != Method::POST => {
                    return Err(Error::invalid_value(
                        "filters",
                        format!("stream '{name}' does not support search filters"),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

//! Stream definitions
//!
//! # Overview
//!
//! | stream | endpoint | records | replication key |
//! |---|---|---|---|
//! | `conversations` | POST `/conversations/search` | `$.conversations[*]` | `updated_at` |
//! | `conversation_parts` | GET `/conversations/{conversation_id}` | `$.conversation_parts.conversation_parts[*]` | `updated_at` |
//! | `admins` | GET `/admins` | `$.admins[*]` | |
//! | `tags` | GET `/tags` | `$.data[*]` | |
//! | `teams` | GET `/teams` | `$.teams[*]` | |
//! | `contacts` | POST `/contacts/search` | `$.data[*]` | `updated_at` |
//! | `articles` | GET `/articles` | `$.data[*]` | |
//! | `articles_extended` | GET `/articles/{article_id}` | `$` | |

mod registry;
pub mod schemas;
mod types;

pub use registry::StreamRegistry;
pub use types::{Catalog, CatalogStream, StreamDefinition};

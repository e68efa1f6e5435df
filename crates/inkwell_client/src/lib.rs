//! Reactive article list client for the Inkwell API.
//!
//! [`ArticleListState`] is the pure fetch-state machine; [`spawn_article_list`]
//! runs it on a tokio task against any [`ArticleSource`].

pub mod config;
pub mod controller;
pub mod error;
pub mod source;
pub mod state;

pub use config::ClientConfig;
pub use controller::{spawn_article_list, ArticleListHandle};
pub use error::{ClientError, TransportError, TransportResult};
pub use source::{ArticleSource, HttpArticleSource, SourceFuture};
pub use state::{
    ArticleListState, ArticleListView, FetchPayload, FetchPhase, FetchTicket, SettleOutcome,
    ALL_CATEGORIES,
};

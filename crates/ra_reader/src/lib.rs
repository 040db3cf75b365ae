pub mod actions;
pub mod client;
pub mod feed;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{Action, ActionReconciler};
pub use client::ReaderClient;
pub use feed::FeedAssembler;

pub mod prelude {
    pub use super::actions::{Action, ActionReconciler};
    pub use super::client::ReaderClient;
    pub use super::feed::FeedAssembler;
    pub use ra_core::{Article, ArticleSource, Error, FeedItem, FeedResponse, Result, Scope};
}

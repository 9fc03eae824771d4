//! Session orchestration over the cached activity feed

mod fetch;
mod github;
mod session;

pub use fetch::Fetcher;
pub use github::GithubFetcher;
pub use session::{Feed, Session};

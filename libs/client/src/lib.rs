//! Client-side session handling for the Vehicle Tracker dashboard
//!
//! Mirrors the dashboard's auth plumbing: a persisted session store, a
//! request pipeline that attaches the bearer token and silently refreshes it
//! once on 401, typed API calls, and cross-process logout propagation.

pub mod error;
pub mod http;
pub mod models;
mod services;
pub mod store;
pub mod sync;

pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use store::{AuthSession, FileStorage, MemoryStorage, STORAGE_KEY, SessionStorage, SessionStore};
pub use sync::SessionWatcher;

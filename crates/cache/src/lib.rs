//! Key-value caching for the API: the HTTP response cache and the token
//! revocation store, both over a shared Redis or in-memory backend.

pub mod backend;
pub mod response;
pub mod revocation;

pub use backend::CacheBackend;
pub use response::ResponseCache;
pub use revocation::RevocationStore;

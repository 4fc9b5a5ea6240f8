//! Client-side mirror of the server's todo list with optimistic updates.
//!
//! [cache::TodoListCache] is an explicit state container: every mutation first
//! cancels in-flight refreshes, snapshots the current list, then applies a
//! predicted patch so callers can render the result with zero latency.
//! [api_client::TodoClient] drives that protocol against a [transport::TodoTransport],
//! reconciling the cache with authoritative server state on success and rolling
//! back to the snapshot on failure.

pub mod api_client;
pub mod cache;
pub mod transport;

pub mod app_config;
pub mod cache;
pub mod local;
pub mod session_store;

pub use app_config::Config;
pub use cache::{LocalPendingSelectionStore, LocalSnapshotStore};
pub use local::{LocalStore, StoreError};
pub use session_store::PersistedSessionStore;

// ── Reactive in-process storage ──

mod cache;
mod collection;
mod data_store;

pub(crate) use cache::ResourceCache;
pub(crate) use collection::EntityCollection;
pub use data_store::DataStore;

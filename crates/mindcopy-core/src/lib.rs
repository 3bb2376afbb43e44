//! MindCopy: Core library.
//! State document, renderer, mutation handlers, import/export, offline asset cache and
//! the shell host model for a single-user journal.

pub mod config;
pub mod controller;
pub mod docs;
pub mod error;
pub mod offline_cache;
pub mod policy;
pub mod render;
pub mod shell;
pub mod state;
pub mod store;
pub mod transfer;

pub use crate::config::MindcopyConfig;
pub use controller::{MindController, Region, ViewRegions};
pub use docs::{DocBoard, DocPanel, AUX_DOCUMENTS};
pub use error::{CacheError, CacheResult, MindcopyError, MindcopyResult, IMPORT_ALERT};
pub use offline_cache::{
    AssetFetcher, CacheStorage, CacheWorker, CachedResponse, DirFetcher, FetchSource,
    HttpFetcher, MemoryCacheStorage, SledCacheStorage, WorkerState,
};
pub use policy::ErrorPolicy;
pub use render::{
    render_doc_panel, render_entries, render_entry_form, render_modes, render_profile,
};
pub use shell::{BackAction, ShellHost, SurfaceSettings};
pub use state::{
    EntryFields, LogEntry, ModeFlag, Modes, Profile, ProfileFields, RawStateDocument,
    StateDocument,
};
pub use store::StateStore;
pub use transfer::{export_document, ExportFile};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

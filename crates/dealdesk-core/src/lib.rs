//! Reactive data layer between `dealdesk-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the marketplace admin workspace:
//!
//! - **[`Backoffice`]** — Central facade managing the full session lifecycle:
//!   [`connect()`](Backoffice::connect) authenticates against the identity
//!   provider, loads the reference-data caches, then spawns the command
//!   processor task. [`Backoffice::oneshot()`](Backoffice::oneshot) provides a
//!   lightweight connect-run-disconnect mode for single CLI invocations.
//!
//! - **[`DataStore`]** — Reactive storage for reference data: categories and
//!   top deals in swap-on-refresh caches, plans in an `EntityCollection`
//!   (`DashMap` + `tokio::sync::watch` channels), the admin profile in a
//!   watch cell.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the backoffice's command processor. Reads bypass the channel
//!   via direct API fetches or `DataStore` snapshots.
//!
//! - **[`OrderedList`]** / **[`Pager`]** — UI-agnostic state machines for the
//!   two interactions every admin frontend reimplements badly: drag-to-reorder
//!   with deferred persistence, and cursor-style infinite scrolling.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Product`, `Category`,
//!   `Deal`, `Order`, `Vendor`, etc.) with [`EntityId`] absorbing the API's
//!   mixed UUID / opaque-string identifiers.

pub mod command;
pub mod config;
pub mod backoffice;
pub mod convert;
pub mod error;
pub mod model;
pub mod pager;
pub mod reorder;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{Credentials, SessionConfig, TlsVerification};
pub use backoffice::{Backoffice, SessionState, obtain_refresh_token};
pub use error::DeskError;
pub use pager::{PagePhase, PageRequest, Pager};
pub use reorder::{CommitError, DragSession, Orderable, OrderedList, commit_order};
pub use store::DataStore;

// Part of `Backoffice::fetch_redemptions`' signature, so callers get it
// without a direct `dealdesk-api` dependency.
pub use dealdesk_api::RedemptionScope;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AdminProfile,
    ApprovalStat,
    BillingInterval,
    // Reference data
    Category,
    // Deals & redemptions
    Deal,
    DealAnalytics,
    DealStatus,
    EntityId,
    Influencer,
    // Media library
    MediaItem,
    MediaUpload,
    // Commerce
    Order,
    OrderItem,
    OrderStatus,
    Plan,
    // Catalog
    Product,
    ProductFilter,
    ProductState,
    Redemption,
    RedemptionStatus,
    TimePoint,
    TopUser,
    Variant,
    // Partners
    Vendor,
    VendorAnalytics,
};

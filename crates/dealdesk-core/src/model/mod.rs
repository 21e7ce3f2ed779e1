// ── Unified domain model ──
//
// Every type in this module is the canonical representation of a
// marketplace entity. They clean up the raw wire shapes from
// `dealdesk_api` (string ids, stringly-typed statuses, mixed-type
// numeric fields) into a single interface that consumers (CLI/TUI)
// depend on.

pub mod entity_id;

pub mod analytics;
pub mod category;
pub mod deal;
pub mod media;
pub mod order;
pub mod partner;
pub mod plan;
pub mod product;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use dealdesk_core::model::*` gives you everything.

pub use entity_id::EntityId;

pub use category::Category;

pub use product::{Product, ProductFilter, ProductState, Variant};

pub use partner::{AdminProfile, Influencer, Vendor};

pub use deal::{Deal, DealStatus, Redemption, RedemptionStatus};

pub use order::{Order, OrderItem, OrderStatus};

pub use plan::{BillingInterval, Plan};

pub use media::{MediaItem, MediaUpload};

pub use analytics::{ApprovalStat, DealAnalytics, TimePoint, TopUser, VendorAnalytics};

//! Actions flowing between the event loop, the app, and the screens.
//!
//! Everything that happens in the UI is expressed as an [`Action`]: key
//! presses become navigation or command actions, background tasks report
//! back with data actions, and the app fans data actions out to every
//! screen so caches stay consistent no matter which tab is visible.

use std::fmt;
use std::sync::Arc;

use dealdesk_core::{
    AdminProfile, Category, Deal, EntityId, Influencer, MediaItem, Order, PageRequest, Plan,
    Product, ProductFilter, Redemption, RedemptionScope, SessionConfig, Vendor,
};

use crate::screen::ScreenId;

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message shown in the corner of the screen.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A count probed from the first page of a listing.
///
/// When the probe page came back full the real total may be larger, so the
/// display appends a `+` instead of pretending the number is exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbedCount {
    pub count: usize,
    pub capped: bool,
}

impl ProbedCount {
    pub fn new(count: usize, capped: bool) -> Self {
        Self { count, capped }
    }
}

impl fmt::Display for ProbedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.capped {
            write!(f, "{}+", self.count)
        } else {
            write!(f, "{}", self.count)
        }
    }
}

/// Work-queue summary assembled from several concurrent first-page probes.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub pending_coupons: ProbedCount,
    pub pending_vendors: ProbedCount,
    pub pending_influencers: ProbedCount,
    pub recent_orders: Vec<Order>,
}

/// A mutation that needs a yes/no dialog before it runs.
///
/// Screens build these with the display name of the row under the cursor;
/// the app turns a confirmed one into the matching backoffice command.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteCategory { id: EntityId, name: String },
    DeleteProduct { id: EntityId, name: String },
    ApproveVendor { id: EntityId, name: String },
    BlockVendor { id: EntityId, name: String },
    ApproveInfluencer { id: EntityId, name: String },
    BlockInfluencer { id: EntityId, name: String },
    CreditWallet { id: EntityId, name: String, amount: f64 },
    ApproveCoupon { id: EntityId, label: String },
    MarkCouponUsed { id: EntityId, label: String },
    DeletePlan { id: EntityId, name: String },
    DeleteMedia { id: EntityId, name: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteCategory { name, .. } => {
                write!(f, "Delete category {name}? This cannot be undone.")
            }
            Self::DeleteProduct { name, .. } => {
                write!(f, "Delete product {name}? This cannot be undone.")
            }
            Self::ApproveVendor { name, .. } => write!(f, "Approve vendor {name}?"),
            Self::BlockVendor { name, .. } => write!(f, "Block vendor {name}?"),
            Self::ApproveInfluencer { name, .. } => write!(f, "Approve influencer {name}?"),
            Self::BlockInfluencer { name, .. } => write!(f, "Block influencer {name}?"),
            Self::CreditWallet { name, amount, .. } => {
                write!(f, "Credit ${amount:.2} to {name}'s wallet?")
            }
            Self::ApproveCoupon { label, .. } => write!(f, "Approve redemption {label}?"),
            Self::MarkCouponUsed { label, .. } => {
                write!(f, "Mark redemption {label} as used?")
            }
            Self::DeletePlan { name, .. } => {
                write!(f, "Delete plan {name}? This cannot be undone.")
            }
            Self::DeleteMedia { name, .. } => {
                write!(f, "Delete {name} from the gallery? This cannot be undone.")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ─────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Connection Status ──────────────────────────────────────
    Connected,
    Disconnected(String),
    Reconnecting,

    // ── Reference Data ─────────────────────────────────────────
    // Cached snapshots pushed by the session bridge or after an
    // explicit refresh. Broadcast to every screen.
    CategoriesUpdated(Arc<Vec<Category>>),
    TopDealsUpdated(Arc<Vec<Deal>>),
    PlansUpdated(Arc<Vec<Arc<Plan>>>),
    ProfileUpdated(Option<Arc<AdminProfile>>),

    // ── Paged Fetches (screen → app) ───────────────────────────
    FetchProducts {
        request: PageRequest,
        filter: ProductFilter,
    },
    FetchCoupons {
        request: PageRequest,
        scope: RedemptionScope,
    },
    FetchOrders {
        request: PageRequest,
    },
    FetchVendors {
        request: PageRequest,
        search: Option<String>,
    },
    FetchInfluencers {
        request: PageRequest,
        search: Option<String>,
    },
    FetchMedia {
        request: PageRequest,
    },
    FetchDashboard,

    // ── Paged Results (app → screens) ──────────────────────────
    // Errors arrive pre-rendered so the action stays cloneable.
    ProductsPage(PageRequest, Result<Vec<Product>, String>),
    CouponsPage(PageRequest, Result<Vec<Redemption>, String>),
    OrdersPage(PageRequest, Result<Vec<Order>, String>),
    VendorsPage(PageRequest, Result<Vec<Vendor>, String>),
    InfluencersPage(PageRequest, Result<Vec<Influencer>, String>),
    MediaPage(PageRequest, Result<Vec<MediaItem>, String>),
    DashboardUpdated(DashboardData),

    // ── Refresh (screen → app) ─────────────────────────────────
    RefreshCategories,
    RefreshPlans,

    // ── Commands ───────────────────────────────────────────────
    // Order saves run without a dialog; everything destructive goes
    // through ShowConfirm instead.
    SaveCategoryOrder(Vec<(EntityId, u32)>),
    SaveProductOrder(Vec<(EntityId, u32)>),

    // ── Confirm Dialog ─────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    /// A confirmed mutation completed on the server. Broadcast so the
    /// screen owning the affected listing can refetch it.
    Mutated(ConfirmAction),

    // ── Search ─────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,

    // ── Help ───────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ──────────────────────────────────────────
    Notify(Notification),
    DismissNotification,

    // ── Settings ───────────────────────────────────────────────
    OpenSettings,
    CloseSettings,
    SettingsTestResult(Result<(), String>),
    SettingsApply {
        profile_name: String,
        config: Box<SessionConfig>,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn confirm_prompts_name_the_row() {
        let prompt = ConfirmAction::DeleteCategory {
            id: EntityId::from("cat-1"),
            name: "Streetwear".into(),
        }
        .to_string();
        assert_eq!(prompt, "Delete category Streetwear? This cannot be undone.");

        let prompt = ConfirmAction::CreditWallet {
            id: EntityId::from("inf-1"),
            name: "June".into(),
            amount: 25.0,
        }
        .to_string();
        assert_eq!(prompt, "Credit $25.00 to June's wallet?");
    }

    #[test]
    fn probed_counts_mark_full_pages() {
        assert_eq!(ProbedCount::new(3, false).to_string(), "3");
        assert_eq!(ProbedCount::new(25, true).to_string(), "25+");
    }
}

// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The session
// routes each variant to the matching REST call and applies the few store
// updates the screens rely on.

pub mod requests;

use crate::error::DeskError;
use crate::model::{Category, EntityId, MediaUpload, Plan, Product};

pub use requests::{
    CategoryDraft, DealPatch, OrderPatch, PlanDraft, ProductDraft, ProductPatch, ProfilePatch,
    ReviewDecision,
};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, DeskError>>,
}

/// All possible write operations against the backoffice API.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Category CRUD & ordering ─────────────────────────────────────
    CreateCategory(CategoryDraft),
    UpdateCategory {
        id: EntityId,
        draft: CategoryDraft,
    },
    DeleteCategory {
        id: EntityId,
    },
    /// Persist a reordered category list: one index patch per item, all
    /// concurrent, all-or-nothing reporting.
    SaveCategoryOrder {
        order: Vec<(EntityId, u32)>,
    },

    // ── Product CRUD & ordering ──────────────────────────────────────
    CreateProduct(ProductDraft),
    UpdateProduct {
        id: EntityId,
        update: ProductPatch,
    },
    DeleteProduct {
        id: EntityId,
    },
    /// Persist a reordered product list in a single bulk call.
    SaveProductOrder {
        order: Vec<(EntityId, u32)>,
    },
    RemoveVariant {
        variant_id: EntityId,
    },

    // ── Partner approval ─────────────────────────────────────────────
    ApproveVendor {
        id: EntityId,
    },
    BlockVendor {
        id: EntityId,
    },
    ApproveInfluencer {
        id: EntityId,
    },
    BlockInfluencer {
        id: EntityId,
    },
    CreditWallet {
        user_id: EntityId,
        amount: f64,
    },

    // ── Deals & redemptions ──────────────────────────────────────────
    UpdateDeal {
        id: EntityId,
        update: DealPatch,
    },
    DeleteDeal {
        id: EntityId,
    },
    ReviewRedemption {
        id: EntityId,
        decision: ReviewDecision,
    },

    // ── Orders ───────────────────────────────────────────────────────
    UpdateOrder {
        id: EntityId,
        update: OrderPatch,
    },

    // ── Plans ────────────────────────────────────────────────────────
    CreatePlan(PlanDraft),
    UpdatePlan {
        id: EntityId,
        draft: PlanDraft,
    },
    DeletePlan {
        id: EntityId,
    },

    // ── Gallery ──────────────────────────────────────────────────────
    UploadMedia {
        files: Vec<MediaUpload>,
    },
    DeleteMedia {
        id: EntityId,
    },

    // ── Profile ──────────────────────────────────────────────────────
    UpdateProfile(ProfilePatch),
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    Category(Category),
    Product(Product),
    Plan(Plan),
}

//! Clap derive structures for the `dealdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This module must stay free of crate-internal imports: `build.rs`
//! includes it directly to generate man pages, so only `clap` and
//! `clap_complete` may appear here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dealdesk -- admin CLI for the Dealdesk marketplace backoffice
#[derive(Debug, Parser)]
#[command(
    name = "dealdesk",
    version,
    about = "Administer the Dealdesk marketplace from the command line",
    long_about = "Backoffice administration for the Dealdesk marketplace.\n\n\
        Covers the catalog (categories, products), partner approval\n\
        (vendors, influencers), coupon review, orders, subscription\n\
        plans, and the shared media gallery.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "DEALDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Marketplace API base URL (overrides profile)
    #[arg(long, env = "DEALDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Identity provider base URL (overrides profile)
    #[arg(long, env = "DEALDESK_IDENTITY_URL", global = true)]
    pub identity_url: Option<String>,

    /// Raw bearer token (skips the identity provider)
    #[arg(long, env = "DEALDESK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DEALDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DEALDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DEALDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store a refresh token in the system keyring
    Login(LoginArgs),

    /// Show the signed-in administrator
    Whoami,

    /// Clear the stored refresh token for the active profile
    Logout,

    /// Manage product categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage catalog products
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Manage vendor accounts
    #[command(alias = "vend")]
    Vendors(VendorsArgs),

    /// Manage influencer accounts
    #[command(alias = "inf")]
    Influencers(InfluencersArgs),

    /// Review coupon redemptions
    #[command(alias = "red")]
    Coupons(CouponsArgs),

    /// Manage vendor deals
    Deals(DealsArgs),

    /// Manage customer orders
    #[command(alias = "ord")]
    Orders(OrdersArgs),

    /// Manage subscription plans
    Plans(PlansArgs),

    /// Manage the shared media gallery
    #[command(alias = "media")]
    Gallery(GalleryArgs),

    /// Update the signed-in administrator's profile
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Results per page (defaults to the profile's page size)
    #[arg(long, short = 'n')]
    pub take: Option<usize>,

    /// 0-based page to fetch
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Fetch every page
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Print the refresh token instead of storing it in the keyring
    #[arg(long)]
    pub no_store: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories in display order
    #[command(alias = "ls")]
    List,

    /// Create a category
    Create {
        /// Category name
        name: String,

        /// Description text
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Parent category ID or name (omit for a root category)
        #[arg(long)]
        parent: Option<String>,

        /// Image file to attach
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Update a category
    Update {
        /// Category ID or name
        category: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// New parent category ID or name
        #[arg(long)]
        parent: Option<String>,

        /// Replacement image file
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },

    /// Delete a category
    Delete {
        /// Category ID or name
        category: String,
    },

    /// Move a category to a new display position
    Move {
        /// Current 0-based position
        #[arg(long, required = true)]
        from: usize,

        /// Target 0-based position
        #[arg(long, required = true)]
        to: usize,
    },

    /// Persist an explicit category order (IDs listed first-to-last)
    SaveOrder {
        /// Category IDs in the desired display order
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

/// Server-side filters shared by `products list` and `products reorder`.
#[derive(Debug, Args)]
pub struct ProductFilterArgs {
    /// Free-text search over title and description
    #[arg(long)]
    pub query: Option<String>,

    /// Restrict to one category (ID or name)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Restrict to one listing state (active, inactive, draft)
    #[arg(long, short = 's')]
    pub state: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: ProductFilterArgs,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get product details
    Show {
        /// Product ID
        product: String,
    },

    /// Create a product
    Create {
        /// Product title
        title: String,

        /// Price
        #[arg(long, required = true)]
        price: f64,

        /// Category ID or name
        #[arg(long, short = 'c', required = true)]
        category: String,

        /// Description text
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Listing state (active, inactive, draft)
        #[arg(long, short = 's', default_value = "active")]
        state: String,

        /// Image URLs to attach
        #[arg(long, value_name = "URL")]
        image: Vec<String>,
    },

    /// Update a product
    Update {
        /// Product ID
        product: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// New price
        #[arg(long)]
        price: Option<f64>,

        /// New listing state (active, inactive, draft)
        #[arg(long, short = 's')]
        state: Option<String>,

        /// New category ID or name
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Delete a product
    Delete {
        /// Product ID
        product: String,
    },

    /// Move a product to a new display position within the listing
    Reorder {
        #[command(flatten)]
        filter: ProductFilterArgs,

        /// Current 0-based position
        #[arg(long, required = true)]
        from: usize,

        /// Target 0-based position
        #[arg(long, required = true)]
        to: usize,
    },

    /// Persist an explicit product order (IDs listed first-to-last)
    SaveOrder {
        /// Product IDs in the desired display order
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },

    /// List a product's variants
    Variants {
        /// Product ID
        product: String,
    },

    /// Remove a variant
    RemoveVariant {
        /// Variant ID
        variant: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VENDORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VendorsArgs {
    #[command(subcommand)]
    pub command: VendorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VendorsCommand {
    /// List vendor accounts
    #[command(alias = "ls")]
    List {
        /// Filter by name or email
        #[arg(long, short = 's')]
        search: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get vendor details
    Show {
        /// Vendor ID
        vendor: String,
    },

    /// Approve a pending vendor
    Approve {
        /// Vendor ID
        vendor: String,
    },

    /// Block a vendor
    Block {
        /// Vendor ID
        vendor: String,
    },

    /// Show a vendor's dashboard analytics
    Analytics {
        /// Vendor ID
        vendor: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INFLUENCERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InfluencersArgs {
    #[command(subcommand)]
    pub command: InfluencersCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfluencersCommand {
    /// List influencer accounts
    #[command(alias = "ls")]
    List {
        /// Filter by name or email
        #[arg(long, short = 's')]
        search: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get influencer details
    Show {
        /// Influencer ID
        influencer: String,
    },

    /// Approve a pending influencer
    Approve {
        /// Influencer ID
        influencer: String,
    },

    /// Block an influencer
    Block {
        /// Influencer ID
        influencer: String,
    },

    /// Credit an influencer's wallet
    Credit {
        /// Influencer ID
        influencer: String,

        /// Amount to add
        #[arg(long, required = true)]
        amount: f64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COUPONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CouponsArgs {
    #[command(subcommand)]
    pub command: CouponsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CouponsCommand {
    /// List coupon redemptions awaiting review
    #[command(alias = "ls")]
    List {
        /// Show the pending-approval queue (default)
        #[arg(long, conflicts_with = "used")]
        pending: bool,

        /// Show already-used redemptions instead
        #[arg(long)]
        used: bool,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get redemption details
    Show {
        /// Redemption ID
        coupon: String,
    },

    /// Approve a pending redemption
    Approve {
        /// Redemption ID
        coupon: String,
    },

    /// Mark an approved redemption as used
    MarkUsed {
        /// Redemption ID
        coupon: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEALS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DealsArgs {
    #[command(subcommand)]
    pub command: DealsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DealsCommand {
    /// Get deal details
    Show {
        /// Deal ID
        deal: String,
    },

    /// Update a deal
    Update {
        /// Deal ID
        deal: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// New status (active, inactive, expired)
        #[arg(long, short = 's')]
        status: Option<String>,

        /// New expiration (RFC 3339, e.g. 2026-12-31T00:00:00Z)
        #[arg(long, value_name = "TIMESTAMP")]
        expires: Option<String>,
    },

    /// Delete a deal
    Delete {
        /// Deal ID
        deal: String,
    },

    /// List all deals published by one vendor
    ByVendor {
        /// Vendor ID
        vendor: String,
    },

    /// List the most-redeemed deals
    Top {
        /// How many to show
        #[arg(long, short = 'n', default_value = "10")]
        take: usize,
    },

    /// Show a deal's redemption analytics
    Analytics {
        /// Deal ID
        deal: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get order details
    Show {
        /// Order ID
        order: String,
    },

    /// Change an order's fulfilment status
    SetStatus {
        /// Order ID
        order: String,

        /// New status (pending, processing, shipped, delivered, cancelled)
        status: String,

        /// Carrier tracking number
        #[arg(long)]
        tracking: Option<String>,

        /// Internal notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List every order placed by one customer
    ByUser {
        /// Customer user ID
        user: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PLANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PlansArgs {
    #[command(subcommand)]
    pub command: PlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlansCommand {
    /// List subscription plans
    #[command(alias = "ls")]
    List,

    /// Create a plan
    Create {
        /// Plan name
        name: String,

        /// Price per billing interval
        #[arg(long, required = true)]
        amount: f64,

        /// Billing interval (month, year)
        #[arg(long, short = 'i', default_value = "month")]
        interval: String,

        /// Description text
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Free trial length in days
        #[arg(long)]
        trial_days: Option<i64>,

        /// Cap on concurrent deals (omit for unlimited)
        #[arg(long)]
        max_deals: Option<i64>,

        /// Create the plan deactivated
        #[arg(long)]
        inactive: bool,
    },

    /// Replace a plan's fields
    Update {
        /// Plan ID
        plan: String,

        /// Plan name
        #[arg(long, required = true)]
        name: String,

        /// Price per billing interval
        #[arg(long, required = true)]
        amount: f64,

        /// Billing interval (month, year)
        #[arg(long, short = 'i', default_value = "month")]
        interval: String,

        /// Description text
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Free trial length in days
        #[arg(long)]
        trial_days: Option<i64>,

        /// Cap on concurrent deals (omit for unlimited)
        #[arg(long)]
        max_deals: Option<i64>,

        /// Deactivate the plan
        #[arg(long)]
        inactive: bool,
    },

    /// Delete a plan
    Delete {
        /// Plan ID
        plan: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GALLERY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GalleryArgs {
    #[command(subcommand)]
    pub command: GalleryCommand,
}

#[derive(Debug, Subcommand)]
pub enum GalleryCommand {
    /// List gallery images, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Upload image files to the gallery
    Upload {
        /// Files to upload
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Delete a gallery image
    Delete {
        /// Media ID
        media: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Update the signed-in administrator's name or photo
    Update {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Photo URL
        #[arg(long, value_name = "URL")]
        photo_url: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set the default profile
    SetDefault {
        /// Profile name to make the default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Backoffice session ──
//
// Full lifecycle management for an admin session against the
// marketplace API. Handles authentication, reference-data caching,
// command routing, and reactive data access through the DataStore.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{Credentials, SessionConfig};
use crate::error::DeskError;
use crate::model::{
    AdminProfile, Category, Deal, DealAnalytics, EntityId, Influencer, MediaItem, Order, Plan,
    Product, ProductFilter, Redemption, Variant, Vendor, VendorAnalytics,
};
use crate::reorder;
use crate::store::DataStore;

use dealdesk_api::models::ProductQuery;
use dealdesk_api::{ApiClient, IdentityClient, RedemptionScope, TokenSource};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// How many deals the dashboard's top-deals widget shows.
const TOP_DEALS_TAKE: usize = 10;

// ── SessionState ─────────────────────────────────────────────────

/// Session state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Backoffice ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<BackofficeInner>`. Manages the full
/// session lifecycle: authentication against the identity provider,
/// the initial reference-data load, and command routing. Reads go
/// straight to the API; only reference data (categories, plans, the
/// admin profile, top deals) lives in the [`DataStore`].
#[derive(Clone)]
pub struct Backoffice {
    inner: Arc<BackofficeInner>,
}

struct BackofficeInner {
    config: SessionConfig,
    store: Arc<DataStore>,
    session_state: watch::Sender<SessionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Child token for the current session — cancelled on disconnect,
    /// replaced on reconnect (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    api: Mutex<Option<ApiClient>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Backoffice {
    /// Create a new Backoffice from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start the
    /// command processor.
    pub fn new(config: SessionConfig) -> Self {
        let store = Arc::new(DataStore::new());
        let (session_state, _) = watch::channel(SessionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(BackofficeInner {
                config,
                store,
                session_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                api: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Connect to the backoffice.
    ///
    /// Authenticates with the identity provider, verifies the session
    /// by fetching the admin profile, loads the reference-data caches,
    /// and spawns the command processor task.
    pub async fn connect(&self) -> Result<(), DeskError> {
        let _ = self.inner.session_state.send(SessionState::Connecting);

        match self.establish().await {
            Ok(()) => {
                let _ = self.inner.session_state.send(SessionState::Connected);
                info!("backoffice session established");
                Ok(())
            }
            Err(e) => {
                let _ = self.inner.session_state.send(SessionState::Failed);
                Err(e)
            }
        }
    }

    async fn establish(&self) -> Result<(), DeskError> {
        // Fresh child token for this session (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child;

        let config = &self.inner.config;
        let transport = config.transport();

        let tokens = match &config.credentials {
            Credentials::Password { email, password } => {
                let identity = IdentityClient::new(&config.identity_url, &transport)?;
                identity.sign_in(email, password).await?;
                TokenSource::Identity(identity)
            }
            Credentials::RefreshToken(token) => {
                let identity = IdentityClient::new(&config.identity_url, &transport)?
                    .with_refresh_token(token.clone());
                TokenSource::Identity(identity)
            }
            Credentials::StaticToken(token) => TokenSource::Static(token.clone()),
        };

        let api = ApiClient::new(&config.api_url, tokens, &transport)?;

        // Verify the session before anything else — this is where a bad
        // password or expired refresh token surfaces.
        let profile = api.me().await?;
        self.inner.store.set_profile(Some(profile.into()));

        let mut categories: Vec<Category> = api
            .list_categories()
            .await?
            .into_iter()
            .map(Category::from)
            .collect();
        categories.sort_by_key(|category| category.position);
        let category_count = categories.len();
        self.inner.store.categories.initialize(categories);

        let plans: Vec<(EntityId, Plan)> = api
            .list_plans()
            .await?
            .into_iter()
            .map(|dto| {
                let plan = Plan::from(dto);
                (plan.id.clone(), plan)
            })
            .collect();
        let plan_count = plans.len();
        self.inner.store.plans.replace_all(plans);

        // Dashboard garnish; a failing stats endpoint must not block
        // the session.
        match api.top_deals(TOP_DEALS_TAKE, 0).await {
            Ok(deals) => {
                let deals: Vec<Deal> = deals.into_iter().map(Deal::from).collect();
                self.inner.store.top_deals.initialize(deals);
            }
            Err(e) => warn!(error = %e, "top deals unavailable (non-fatal)"),
        }

        debug!(categories = category_count, plans = plan_count, "reference data loaded");

        *self.inner.api.lock().await = Some(api);

        let mut handles = self.inner.task_handles.lock().await;
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let backoffice = self.clone();
            handles.push(tokio::spawn(command_processor_task(backoffice, rx)));
        }
        drop(handles);

        Ok(())
    }

    /// Disconnect from the backoffice.
    ///
    /// Cancels the command processor, drops the identity session, and
    /// resets the session state to
    /// [`Disconnected`](SessionState::Disconnected).
    pub async fn disconnect(&self) {
        // Cancel the child token (not the parent — allows reconnect).
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        // Drop the cached identity session so tokens don't outlive the
        // session object.
        if let Some(api) = self.inner.api.lock().await.take() {
            if let TokenSource::Identity(identity) = api.token_source() {
                identity.sign_out().await;
            }
        }

        self.inner.store.clear();

        // Recreate the command channel so reconnects can hand a fresh
        // receiver to a new processor task.
        {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
            *self.inner.command_rx.lock().await = Some(rx);
        }

        let _ = self.inner.session_state.send(SessionState::Disconnected);
        debug!("session closed");
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the backoffice.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, DeskError> {
        if *self.inner.session_state.borrow() != SessionState::Connected {
            return Err(DeskError::NotConnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        let command_tx = self.inner.command_tx.lock().await.clone();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| DeskError::CommandDropped)?;

        rx.await.map_err(|_| DeskError::CommandDropped)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// The shape every CLI subcommand wants — a single authenticated
    /// request-response cycle with no long-lived session.
    pub async fn oneshot<F, Fut, T>(config: SessionConfig, f: F) -> Result<T, DeskError>
    where
        F: FnOnce(Backoffice) -> Fut,
        Fut: std::future::Future<Output = Result<T, DeskError>>,
    {
        let backoffice = Backoffice::new(config);
        backoffice.connect().await?;
        let result = f(backoffice.clone()).await;
        backoffice.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to session state changes.
    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.inner.session_state.subscribe()
    }

    // ── Cache accessors (delegate to DataStore) ──────────────────

    pub fn categories(&self) -> Arc<Vec<Category>> {
        self.inner.store.categories()
    }

    pub fn category_by_id(&self, id: &EntityId) -> Option<Category> {
        self.inner.store.category_by_id(id)
    }

    pub fn top_deals(&self) -> Arc<Vec<Deal>> {
        self.inner.store.top_deals()
    }

    pub fn plans_snapshot(&self) -> Arc<Vec<Arc<Plan>>> {
        self.inner.store.plans_snapshot()
    }

    pub fn subscribe_plans(&self) -> watch::Receiver<Arc<Vec<Arc<Plan>>>> {
        self.inner.store.subscribe_plans()
    }

    pub fn profile(&self) -> Option<Arc<AdminProfile>> {
        self.inner.store.profile()
    }

    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Arc<AdminProfile>>> {
        self.inner.store.subscribe_profile()
    }

    // ── Cache refresh ────────────────────────────────────────────
    //
    // Mutations deliberately do not write through to the caches; the
    // frontend decides when a stale list is worth a refetch.

    /// Refetch the category tree and swap the cache.
    pub async fn refresh_categories(&self) -> Result<(), DeskError> {
        let api = self.api().await?;
        let mut categories: Vec<Category> = api
            .list_categories()
            .await?
            .into_iter()
            .map(Category::from)
            .collect();
        categories.sort_by_key(|category| category.position);
        self.inner.store.categories.initialize(categories);
        Ok(())
    }

    /// Refetch the plan catalog and swap the collection.
    pub async fn refresh_plans(&self) -> Result<(), DeskError> {
        let api = self.api().await?;
        let plans: Vec<(EntityId, Plan)> = api
            .list_plans()
            .await?
            .into_iter()
            .map(|dto| {
                let plan = Plan::from(dto);
                (plan.id.clone(), plan)
            })
            .collect();
        self.inner.store.plans.replace_all(plans);
        Ok(())
    }

    /// Refetch the dashboard's top deals.
    pub async fn refresh_top_deals(&self) -> Result<(), DeskError> {
        let api = self.api().await?;
        let deals: Vec<Deal> = api
            .top_deals(TOP_DEALS_TAKE, 0)
            .await?
            .into_iter()
            .map(Deal::from)
            .collect();
        self.inner.store.top_deals.initialize(deals);
        Ok(())
    }

    /// Refetch the admin profile (after an update, or to re-verify).
    pub async fn refresh_profile(&self) -> Result<(), DeskError> {
        let api = self.api().await?;
        let profile = api.me().await?;
        self.inner.store.set_profile(Some(profile.into()));
        Ok(())
    }

    // ── Direct reads ─────────────────────────────────────────────
    //
    // List endpoints the frontends page through. Nothing here touches
    // the DataStore; each call is a plain authenticated fetch.

    /// One page of products matching `filter`.
    pub async fn fetch_products(
        &self,
        filter: &ProductFilter,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Product>, DeskError> {
        let api = self.api().await?;
        let query = product_query(filter, take, skip);
        let products = api.list_products(&query).await?;
        Ok(products.into_iter().map(Product::from).collect())
    }

    pub async fn fetch_product(&self, id: &EntityId) -> Result<Product, DeskError> {
        let api = self.api().await?;
        Ok(api.get_product(&id.to_string()).await?.into())
    }

    pub async fn fetch_variants(&self, product_id: &EntityId) -> Result<Vec<Variant>, DeskError> {
        let api = self.api().await?;
        let variants = api.product_variants(&product_id.to_string()).await?;
        Ok(variants.into_iter().map(Variant::from).collect())
    }

    /// One page of vendors, optionally filtered by a search term.
    pub async fn fetch_vendors(
        &self,
        search: Option<&str>,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Vendor>, DeskError> {
        let api = self.api().await?;
        let vendors = api.list_vendors(take, skip, search).await?;
        Ok(vendors.into_iter().map(Vendor::from).collect())
    }

    pub async fn fetch_vendor(&self, id: &EntityId) -> Result<Vendor, DeskError> {
        let api = self.api().await?;
        Ok(api.get_vendor(&id.to_string()).await?.into())
    }

    /// All deals published by one vendor.
    pub async fn fetch_vendor_deals(&self, vendor_id: &EntityId) -> Result<Vec<Deal>, DeskError> {
        let api = self.api().await?;
        let deals = api.vendor_deals(&vendor_id.to_string()).await?;
        Ok(deals.into_iter().map(Deal::from).collect())
    }

    pub async fn vendor_analytics(&self, id: &EntityId) -> Result<VendorAnalytics, DeskError> {
        let api = self.api().await?;
        Ok(api.vendor_analytics(&id.to_string()).await?.into())
    }

    /// One page of influencers, optionally filtered by a search term.
    pub async fn fetch_influencers(
        &self,
        search: Option<&str>,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Influencer>, DeskError> {
        let api = self.api().await?;
        let influencers = api.list_influencers(take, skip, search).await?;
        Ok(influencers.into_iter().map(Influencer::from).collect())
    }

    pub async fn fetch_influencer(&self, id: &EntityId) -> Result<Influencer, DeskError> {
        let api = self.api().await?;
        Ok(api.get_influencer(&id.to_string()).await?.into())
    }

    pub async fn fetch_deal(&self, id: &EntityId) -> Result<Deal, DeskError> {
        let api = self.api().await?;
        Ok(api.get_deal(&id.to_string()).await?.into())
    }

    pub async fn deal_analytics(&self, id: &EntityId) -> Result<DealAnalytics, DeskError> {
        let api = self.api().await?;
        Ok(api.deal_analytics(&id.to_string()).await?.into())
    }

    /// One page of redemptions in the given review scope.
    pub async fn fetch_redemptions(
        &self,
        scope: RedemptionScope,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Redemption>, DeskError> {
        let api = self.api().await?;
        let redemptions = api.list_redemptions(scope, take, skip).await?;
        Ok(redemptions.into_iter().map(Redemption::from).collect())
    }

    pub async fn fetch_redemption(&self, id: &EntityId) -> Result<Redemption, DeskError> {
        let api = self.api().await?;
        Ok(api.get_redemption(&id.to_string()).await?.into())
    }

    /// One page of the shop-wide order feed, newest first.
    pub async fn fetch_orders(&self, take: usize, skip: usize) -> Result<Vec<Order>, DeskError> {
        let api = self.api().await?;
        let orders = api.list_orders(take, skip).await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    pub async fn fetch_order(&self, id: &EntityId) -> Result<Order, DeskError> {
        let api = self.api().await?;
        Ok(api.get_order(&id.to_string()).await?.into())
    }

    /// Every order placed by one customer.
    pub async fn fetch_user_orders(&self, user_id: &EntityId) -> Result<Vec<Order>, DeskError> {
        let api = self.api().await?;
        let orders = api.user_orders(&user_id.to_string()).await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    /// One page of the media library, newest first.
    pub async fn fetch_media(&self, take: usize, skip: usize) -> Result<Vec<MediaItem>, DeskError> {
        let api = self.api().await?;
        let items = api.list_media(take, skip).await?;
        Ok(items.into_iter().map(MediaItem::from).collect())
    }

    /// The most-redeemed deals, bypassing the dashboard cache so callers
    /// can page past its fixed size.
    pub async fn fetch_top_deals(&self, take: usize, skip: usize) -> Result<Vec<Deal>, DeskError> {
        let api = self.api().await?;
        let deals = api.top_deals(take, skip).await?;
        Ok(deals.into_iter().map(Deal::from).collect())
    }

    /// The page size from configuration.
    pub fn default_take(&self) -> usize {
        self.inner.config.default_take
    }

    /// A clone of the live API client, or `NotConnected`.
    ///
    /// Cloned out of the mutex so the guard never lives across an
    /// `.await` on a network call.
    async fn api(&self) -> Result<ApiClient, DeskError> {
        self.inner
            .api
            .lock()
            .await
            .clone()
            .ok_or(DeskError::NotConnected)
    }
}

/// Sign in with email/password and return the refresh token the identity
/// provider issued, without opening a full session.
///
/// `login` commands store this token; later sessions pass it back as
/// [`Credentials::RefreshToken`].
pub async fn obtain_refresh_token(
    config: &SessionConfig,
) -> Result<secrecy::SecretString, DeskError> {
    let Credentials::Password { email, password } = &config.credentials else {
        return Err(DeskError::Config {
            message: "refresh tokens are only issued for password sign-in".into(),
        });
    };
    let identity = IdentityClient::new(&config.identity_url, &config.transport())?;
    let token = identity.sign_in(email, password).await?;
    info!("refresh token issued");
    Ok(token)
}

// ── Command processing ───────────────────────────────────────────

/// Process commands from the mpsc channel, routing each to the
/// appropriate API call.
async fn command_processor_task(backoffice: Backoffice, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = backoffice.inner.cancel_child.lock().await.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&backoffice, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

/// Route a command to the appropriate API call.
///
/// Plan mutations write through to the store (the collection is the
/// only live view of plans); everything else leaves cache refresh to
/// the caller.
#[allow(clippy::too_many_lines)]
async fn route_command(backoffice: &Backoffice, cmd: Command) -> Result<CommandResult, DeskError> {
    let store = &backoffice.inner.store;
    let api = backoffice.api().await?;

    match cmd {
        // ── Category operations ──────────────────────────────────
        Command::CreateCategory(draft) => {
            let dto = api.create_category(&draft.into_upload()).await?;
            Ok(CommandResult::Category(dto.into()))
        }

        Command::UpdateCategory { id, draft } => {
            api.update_category(&id.to_string(), &draft.into_upload())
                .await?;
            Ok(CommandResult::Ok)
        }

        Command::DeleteCategory { id } => {
            api.delete_category(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::SaveCategoryOrder { order } => {
            // One call per row; the endpoint has no bulk form. Every
            // position is attempted even when an earlier one fails.
            reorder::commit_order(&order, |id, position| {
                let api = api.clone();
                async move { api.set_category_index(&id.to_string(), position).await }
            })
            .await
            .map_err(|e| DeskError::OrderCommitFailed {
                failed: e.failed,
                total: e.total,
                first_error: e.first_error.to_string(),
            })?;
            Ok(CommandResult::Ok)
        }

        // ── Product operations ───────────────────────────────────
        Command::CreateProduct(draft) => {
            let dto = api.create_product(&draft.into_create()).await?;
            Ok(CommandResult::Product(dto.into()))
        }

        Command::UpdateProduct { id, update } => {
            api.update_product(&id.to_string(), &update.into_update())
                .await?;
            Ok(CommandResult::Ok)
        }

        Command::DeleteProduct { id } => {
            api.delete_product(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::SaveProductOrder { order } => {
            let order: Vec<(String, u32)> = order
                .iter()
                .map(|(id, position)| (id.to_string(), *position))
                .collect();
            api.reorder_products(&order).await?;
            Ok(CommandResult::Ok)
        }

        Command::RemoveVariant { variant_id } => {
            api.remove_variant(&variant_id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        // ── Partner operations ───────────────────────────────────
        Command::ApproveVendor { id } => {
            api.approve_vendor(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::BlockVendor { id } => {
            api.block_vendor(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::ApproveInfluencer { id } => {
            api.approve_influencer(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::BlockInfluencer { id } => {
            api.block_influencer(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::CreditWallet { user_id, amount } => {
            api.credit_wallet(&user_id.to_string(), amount).await?;
            Ok(CommandResult::Ok)
        }

        // ── Deal & redemption operations ─────────────────────────
        Command::UpdateDeal { id, update } => {
            api.update_deal(&id.to_string(), &update.into_update())
                .await?;
            Ok(CommandResult::Ok)
        }

        Command::DeleteDeal { id } => {
            api.delete_deal(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::ReviewRedemption { id, decision } => {
            api.review_redemption(&id.to_string(), &decision.into_review())
                .await?;
            Ok(CommandResult::Ok)
        }

        // ── Order operations ─────────────────────────────────────
        Command::UpdateOrder { id, update } => {
            api.update_order(&id.to_string(), &update.into_update())
                .await?;
            Ok(CommandResult::Ok)
        }

        // ── Plan operations ──────────────────────────────────────
        Command::CreatePlan(draft) => {
            let dto = api.create_plan(&draft.into_payload()).await?;
            let plan = Plan::from(dto);
            store.plans.upsert(plan.id.clone(), plan.clone());
            Ok(CommandResult::Plan(plan))
        }

        Command::UpdatePlan { id, draft } => {
            api.update_plan(&id.to_string(), &draft.clone().into_payload())
                .await?;
            // The update endpoint returns no body; rebuild the entity
            // from what we sent.
            let plan = draft.into_plan(id.clone());
            store.plans.upsert(id, plan.clone());
            Ok(CommandResult::Plan(plan))
        }

        Command::DeletePlan { id } => {
            api.delete_plan(&id.to_string()).await?;
            store.plans.remove(&id);
            Ok(CommandResult::Ok)
        }

        // ── Media operations ─────────────────────────────────────
        Command::UploadMedia { files } => {
            api.upload_media(&files).await?;
            Ok(CommandResult::Ok)
        }

        Command::DeleteMedia { id } => {
            api.delete_media(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        // ── Account operations ───────────────────────────────────
        Command::UpdateProfile(patch) => {
            api.update_profile(&patch.into_update()).await?;
            let profile = api.me().await?;
            store.set_profile(Some(profile.into()));
            Ok(CommandResult::Ok)
        }
    }
}

/// Lower a domain filter into the wire query for one page.
fn product_query(filter: &ProductFilter, take: usize, skip: usize) -> ProductQuery {
    ProductQuery {
        q: filter.query.clone(),
        category_id: filter.category_id.as_ref().map(ToString::to_string),
        state: filter.state.as_ref().map(ToString::to_string),
        take,
        skip,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ProductState;
    use secrecy::SecretString;
    use url::Url;

    fn test_config() -> SessionConfig {
        SessionConfig::new(
            Url::parse("https://api.example.test").unwrap(),
            Url::parse("https://identity.example.test").unwrap(),
            Credentials::StaticToken(SecretString::from("token")),
        )
    }

    #[tokio::test]
    async fn execute_refuses_when_disconnected() {
        let backoffice = Backoffice::new(test_config());
        let result = backoffice
            .execute(Command::DeleteCategory {
                id: EntityId::from("cat-1"),
            })
            .await;
        assert!(matches!(result, Err(DeskError::NotConnected)));
    }

    #[tokio::test]
    async fn direct_reads_refuse_when_disconnected() {
        let backoffice = Backoffice::new(test_config());
        let result = backoffice.fetch_orders(10, 0).await;
        assert!(matches!(result, Err(DeskError::NotConnected)));
    }

    #[test]
    fn product_query_carries_every_filter_field() {
        let filter = ProductFilter {
            query: Some("mug".into()),
            category_id: Some(EntityId::from("cat-9")),
            state: Some(ProductState::Inactive),
        };
        let query = product_query(&filter, 25, 50);
        assert_eq!(query.q.as_deref(), Some("mug"));
        assert_eq!(query.category_id.as_deref(), Some("cat-9"));
        assert_eq!(query.state.as_deref(), Some("INACTIVE"));
        assert_eq!(query.take, 25);
        assert_eq!(query.skip, 50);
    }

    #[test]
    fn empty_filter_lowers_to_empty_query() {
        let query = product_query(&ProductFilter::default(), 10, 0);
        assert!(query.q.is_none());
        assert!(query.category_id.is_none());
        assert!(query.state.is_none());
    }
}

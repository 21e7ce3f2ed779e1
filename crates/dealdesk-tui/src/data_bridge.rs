//! Session bridge — turns [`Backoffice`] watch channels into TUI actions.
//!
//! Runs as a background task: connects the session, pushes the initial
//! reference-data snapshots, then forwards every cache change and
//! session-state transition through the action channel until cancelled.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dealdesk_core::{Backoffice, SessionState};

use crate::action::Action;

/// Connect and forward backoffice state to the TUI.
///
/// Reference data (categories, plans, the admin profile) arrives through
/// watch channels, so a refresh triggered anywhere in the app lands on
/// every screen via this one loop. Top deals have no channel and are
/// pushed by whoever refreshes them.
pub async fn run_session_bridge(
    backoffice: Backoffice,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Reconnecting);

    if let Err(e) = backoffice.connect().await {
        warn!(error = %e, "failed to open backoffice session");
        let _ = action_tx.send(Action::Disconnected(format!("{e}")));
        return;
    }

    let _ = action_tx.send(Action::Connected);

    let mut categories_ready = backoffice.store().subscribe_categories_ready();
    let mut plans = backoffice.subscribe_plans();
    let mut profile = backoffice.subscribe_profile();
    let mut session = backoffice.session_state();

    // Initial snapshots so screens render data on the first frame.
    let _ = action_tx.send(Action::CategoriesUpdated(backoffice.categories()));
    let _ = action_tx.send(Action::TopDealsUpdated(backoffice.top_deals()));
    let _ = action_tx.send(Action::PlansUpdated(backoffice.plans_snapshot()));
    let _ = action_tx.send(Action::ProfileUpdated(backoffice.profile()));

    // Mark the subscriptions as seen; the snapshots above already cover
    // whatever state the caches were in at subscribe time.
    let _ = categories_ready.borrow_and_update();
    let _ = plans.borrow_and_update();
    let _ = profile.borrow_and_update();
    let _ = session.borrow_and_update();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = categories_ready.changed() => {
                if *categories_ready.borrow_and_update() {
                    debug!("dispatching CategoriesUpdated");
                    let _ = action_tx.send(Action::CategoriesUpdated(backoffice.categories()));
                }
            }
            Ok(()) = plans.changed() => {
                let snapshot = plans.borrow_and_update().clone();
                let _ = action_tx.send(Action::PlansUpdated(snapshot));
            }
            Ok(()) = profile.changed() => {
                let snapshot = profile.borrow_and_update().clone();
                let _ = action_tx.send(Action::ProfileUpdated(snapshot));
            }
            Ok(()) = session.changed() => {
                let state = session.borrow_and_update().clone();
                match state {
                    SessionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    SessionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("session closed".into()));
                    }
                    SessionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("session failed".into()));
                    }
                    SessionState::Connecting => {
                        let _ = action_tx.send(Action::Reconnecting);
                    }
                }
            }
        }
    }

    backoffice.disconnect().await;
    debug!("session bridge shut down");
}

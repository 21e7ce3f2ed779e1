// ── Partner domain types ──
//
// Two kinds of account pass through the approval workflows: vendors
// (shops selling on the marketplace) and influencers (users redeeming
// deals for exposure). Both carry the same approve/block switches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A shop selling on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub approved: bool,
    pub blocked: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Vendor {
    /// Human label for the approval state, used by list views.
    pub fn standing(&self) -> &'static str {
        standing(self.approved, self.blocked)
    }
}

/// An influencer account redeeming deals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influencer {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub approved: bool,
    pub blocked: bool,
    /// Present only when the listing embeds the wallet.
    pub wallet_balance: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Influencer {
    pub fn standing(&self) -> &'static str {
        standing(self.approved, self.blocked)
    }
}

fn standing(approved: bool, blocked: bool) -> &'static str {
    if blocked {
        "blocked"
    } else if approved {
        "approved"
    } else {
        "pending"
    }
}

/// The signed-in administrator's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_wins_over_approved() {
        assert_eq!(standing(true, true), "blocked");
        assert_eq!(standing(true, false), "approved");
        assert_eq!(standing(false, false), "pending");
    }
}

//! Screen implementations. Each screen is a top-level Component.

pub mod categories;
pub mod coupons;
pub mod dashboard;
pub mod gallery;
pub mod influencers;
pub mod orders;
pub mod plans;
pub mod products;
pub mod settings;
pub mod vendors;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar. Settings is not a tab;
/// the app creates it on demand.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenId::Products,
            Box::new(products::ProductsScreen::new()),
        ),
        (
            ScreenId::Categories,
            Box::new(categories::CategoriesScreen::new()),
        ),
        (ScreenId::Coupons, Box::new(coupons::CouponsScreen::new())),
        (ScreenId::Orders, Box::new(orders::OrdersScreen::new())),
        (ScreenId::Vendors, Box::new(vendors::VendorsScreen::new())),
        (
            ScreenId::Influencers,
            Box::new(influencers::InfluencersScreen::new()),
        ),
        (ScreenId::Plans, Box::new(plans::PlansScreen::new())),
        (ScreenId::Gallery, Box::new(gallery::GalleryScreen::new())),
    ]
}

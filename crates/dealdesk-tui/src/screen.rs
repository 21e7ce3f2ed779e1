//! Screen identifier enum and tab-bar ordering.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    Products,    // 2
    Categories,  // 3
    Coupons,     // 4
    Orders,      // 5
    Vendors,     // 6
    Influencers, // 7
    Plans,       // 8
    Gallery,     // 9
    /// Profile editor — not in the tab bar, opened with `,`. Doubles as
    /// the first-run screen when no usable profile exists.
    Settings,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 9] = [
        Self::Dashboard,
        Self::Products,
        Self::Categories,
        Self::Coupons,
        Self::Orders,
        Self::Vendors,
        Self::Influencers,
        Self::Plans,
        Self::Gallery,
    ];

    /// Numeric key (1-9) for this screen. Settings has no number key.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Products => 2,
            Self::Categories => 3,
            Self::Coupons => 4,
            Self::Orders => 5,
            Self::Vendors => 6,
            Self::Influencers => 7,
            Self::Plans => 8,
            Self::Gallery => 9,
            Self::Settings => 0,
        }
    }

    /// Screen from a numeric key (1-9). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Products),
            3 => Some(Self::Categories),
            4 => Some(Self::Coupons),
            5 => Some(Self::Orders),
            6 => Some(Self::Vendors),
            7 => Some(Self::Influencers),
            8 => Some(Self::Plans),
            9 => Some(Self::Gallery),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Coupons => "Coupons",
            Self::Orders => "Orders",
            Self::Vendors => "Vendors",
            Self::Influencers => "Influencers",
            Self::Plans => "Plans",
            Self::Gallery => "Gallery",
            Self::Settings => "Settings",
        }
    }

    /// Compact label for narrow terminals (< 120 cols).
    pub fn label_short(self) -> &'static str {
        match self {
            Self::Dashboard => "Dash",
            Self::Products => "Prod",
            Self::Categories => "Cat",
            Self::Coupons => "Coup",
            Self::Orders => "Ord",
            Self::Vendors => "Vend",
            Self::Influencers => "Infl",
            Self::Plans => "Plan",
            Self::Gallery => "Gal",
            Self::Settings => "Set",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn number_keys_round_trip_through_the_tab_bar() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(10), None);
    }

    #[test]
    fn tab_cycling_wraps_both_ways() {
        assert_eq!(ScreenId::Gallery.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Gallery);
        let mut id = ScreenId::Dashboard;
        for _ in 0..ScreenId::ALL.len() {
            id = id.next();
        }
        assert_eq!(id, ScreenId::Dashboard);
    }

    #[test]
    fn settings_stays_off_the_tab_bar() {
        assert!(!ScreenId::ALL.contains(&ScreenId::Settings));
        assert_eq!(ScreenId::Settings.number(), 0);
    }
}

//! Tabs, screens, and the role check guarding administrator views.

use std::fmt;

use cmdgate_api_models::Session;

use crate::error::NavigationError;

/// Console tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Command entry and the latest outcome.
    #[default]
    Terminal,
    /// The caller's own execution records.
    History,
    /// Member creation.
    AdminUsers,
    /// Rule creation.
    AdminRules,
    /// Every user's execution records.
    AdminLogs,
}

impl Tab {
    /// All tabs in navigation order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Terminal,
            Self::History,
            Self::AdminUsers,
            Self::AdminRules,
            Self::AdminLogs,
        ]
    }

    /// Whether the tab is reserved for administrators.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::AdminUsers | Self::AdminRules | Self::AdminLogs)
    }

    /// Heading shown above the tab content.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Terminal => "Command Terminal",
            Self::History => "Execution History",
            Self::AdminUsers => "User Management",
            Self::AdminRules => "Security Rules",
            Self::AdminLogs => "System Audit Logs",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn nav_label(self) -> &'static str {
        match self {
            Self::Terminal => "Terminal",
            Self::History => "History",
            Self::AdminUsers => "Manage Users",
            Self::AdminRules => "Manage Rules",
            Self::AdminLogs => "Audit Logs",
        }
    }

    /// Stable identifier used in markup and command input.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::History => "history",
            Self::AdminUsers => "admin-users",
            Self::AdminRules => "admin-rules",
            Self::AdminLogs => "admin-logs",
        }
    }

    /// Parse a slug, also accepting the short admin names.
    #[must_use]
    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "terminal" => Some(Self::Terminal),
            "history" => Some(Self::History),
            "admin-users" | "users" => Some(Self::AdminUsers),
            "admin-rules" | "rules" => Some(Self::AdminRules),
            "admin-logs" | "logs" => Some(Self::AdminLogs),
            _ => None,
        }
    }

    /// Sidebar section the tab belongs to.
    #[must_use]
    pub const fn section(self) -> NavSection {
        if self.requires_admin() {
            NavSection::Administration
        } else {
            NavSection::Member
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No session; credential entry.
    Login,
    /// Authenticated console showing a tab.
    Console(Tab),
}

/// Sidebar grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    /// Tabs every user sees.
    Member,
    /// Tabs shown to administrators only.
    Administration,
}

impl NavSection {
    /// Section heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Member => "Console",
            Self::Administration => "Administration",
        }
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// Target tab.
    pub tab: Tab,
    /// Display label.
    pub label: &'static str,
    /// Grouping.
    pub section: NavSection,
    /// Whether the tab is currently showing.
    pub active: bool,
}

/// Check whether `session` may open `tab`.
///
/// # Errors
///
/// Returns [`NavigationError::NotAuthenticated`] without a session and
/// [`NavigationError::AdminRequired`] when a member asks for an admin tab.
pub fn authorize(tab: Tab, session: Option<&Session>) -> Result<(), NavigationError> {
    let session = session.ok_or(NavigationError::NotAuthenticated(tab))?;
    if tab.requires_admin() && !session.role.is_admin() {
        return Err(NavigationError::AdminRequired(tab));
    }
    Ok(())
}

/// Sidebar entries visible to `session`, flagged against the active tab.
#[must_use]
pub fn nav_items(session: Option<&Session>, active: Tab) -> Vec<NavItem> {
    Tab::all()
        .into_iter()
        .filter(|tab| authorize(*tab, session).is_ok())
        .map(|tab| NavItem {
            tab,
            label: tab.nav_label(),
            section: tab.section(),
            active: tab == active,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_api_models::Role;

    fn session(role: Role) -> Session {
        Session {
            username: "alice".into(),
            role,
            credits: 10,
        }
    }

    #[test]
    fn members_are_refused_admin_tabs() {
        let member = session(Role::Member);
        for tab in Tab::all() {
            let result = authorize(tab, Some(&member));
            if tab.requires_admin() {
                assert_eq!(result, Err(NavigationError::AdminRequired(tab)));
            } else {
                assert!(result.is_ok());
            }
        }
    }

    #[test]
    fn anonymous_callers_are_refused_every_tab() {
        for tab in Tab::all() {
            assert_eq!(
                authorize(tab, None),
                Err(NavigationError::NotAuthenticated(tab))
            );
        }
    }

    #[test]
    fn nav_items_hide_admin_section_from_members() {
        let member = session(Role::Member);
        let items = nav_items(Some(&member), Tab::History);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.section == NavSection::Member));
        assert!(items.iter().any(|item| item.tab == Tab::History && item.active));

        let admin = session(Role::Admin);
        let items = nav_items(Some(&admin), Tab::AdminLogs);
        assert_eq!(items.len(), 5);
        assert_eq!(
            items
                .iter()
                .filter(|item| item.section == NavSection::Administration)
                .count(),
            3
        );
        assert!(nav_items(None, Tab::Terminal).is_empty());
    }

    #[test]
    fn slugs_parse_back_including_short_forms() {
        for tab in Tab::all() {
            assert_eq!(Tab::from_slug(tab.slug()), Some(tab));
        }
        assert_eq!(Tab::from_slug(" Logs "), Some(Tab::AdminLogs));
        assert_eq!(Tab::from_slug("settings"), None);
    }
}

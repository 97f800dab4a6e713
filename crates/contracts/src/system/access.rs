//! Role-based page visibility.
//!
//! An [`AccessContext`] is built once per request from the validated token
//! and handed to whatever needs to decide what the caller may see or change.

use serde::{Deserialize, Serialize};

use super::auth::TokenClaims;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Warehouse,
    Technician,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Warehouse => "warehouse",
            Role::Technician => "technician",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "warehouse" => Some(Role::Warehouse),
            "technician" => Some(Role::Technician),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Clients,
    Products,
    Categories,
    Tools,
    Tasks,
    Users,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::Clients,
        Page::Products,
        Page::Categories,
        Page::Tools,
        Page::Tasks,
        Page::Users,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

impl AccessContext {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_view(&self, page: Page) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Manager => page != Page::Users,
            Role::Warehouse => matches!(
                page,
                Page::Dashboard | Page::Products | Page::Categories | Page::Tools
            ),
            Role::Technician => matches!(page, Page::Dashboard | Page::Tools | Page::Tasks),
        }
    }

    pub fn can_edit(&self, page: Page) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Manager => page != Page::Users && page != Page::Dashboard,
            Role::Warehouse => matches!(page, Page::Products | Page::Categories | Page::Tools),
            Role::Technician => page == Page::Tasks,
        }
    }

    pub fn visible_pages(&self) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|page| self.can_view(*page))
            .collect()
    }
}

impl From<&TokenClaims> for AccessContext {
    fn from(claims: &TokenClaims) -> Self {
        Self::new(claims.sub.clone(), claims.username.clone(), claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AccessContext {
        AccessContext::new("u-1", "someone", role)
    }

    #[test]
    fn test_admin_sees_everything() {
        assert_eq!(ctx(Role::Admin).visible_pages(), Page::ALL.to_vec());
        assert!(Page::ALL.iter().all(|p| ctx(Role::Admin).can_edit(*p)));
    }

    #[test]
    fn test_manager_has_no_users_page() {
        let m = ctx(Role::Manager);
        assert!(!m.can_view(Page::Users));
        assert!(m.can_edit(Page::Tools));
        assert_eq!(m.visible_pages().len(), Page::ALL.len() - 1);
    }

    #[test]
    fn test_warehouse_pages() {
        let w = ctx(Role::Warehouse);
        assert_eq!(
            w.visible_pages(),
            vec![Page::Dashboard, Page::Products, Page::Categories, Page::Tools]
        );
        assert!(!w.can_view(Page::Clients));
        assert!(!w.can_edit(Page::Tasks));
    }

    #[test]
    fn test_technician_pages() {
        let t = ctx(Role::Technician);
        assert_eq!(t.visible_pages(), vec![Page::Dashboard, Page::Tools, Page::Tasks]);
        assert!(t.can_edit(Page::Tasks));
        assert!(!t.can_edit(Page::Tools));
    }

    #[test]
    fn test_every_editable_page_is_visible() {
        for role in [Role::Admin, Role::Manager, Role::Warehouse, Role::Technician] {
            let c = ctx(role);
            for page in Page::ALL {
                if c.can_edit(page) {
                    assert!(c.can_view(page), "{role:?} edits {page:?} without seeing it");
                }
            }
        }
    }

    #[test]
    fn test_from_claims() {
        let claims = TokenClaims {
            sub: "u-9".into(),
            username: "kim".into(),
            role: Role::Warehouse,
            exp: 0,
            iat: 0,
        };
        let c = AccessContext::from(&claims);
        assert_eq!(c.user_id, "u-9");
        assert_eq!(c.role, Role::Warehouse);
        assert!(!c.is_admin());
    }

    #[test]
    fn test_role_strings() {
        for role in [Role::Admin, Role::Manager, Role::Warehouse, Role::Technician] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("root"), None);
    }
}

//! Role → menu items mapping consumed by the popup menu.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::shared::error::AppResult;
use crate::shared::settings::MenuSettings;
use crate::shared::types::MenuItem;

#[async_trait]
pub trait MenuProvider: Send + Sync {
    async fn menu_items(&self, role: &str) -> AppResult<Vec<MenuItem>>;
}

/// Menu content taken from the user settings.
pub struct SettingsMenuProvider {
    roles: BTreeMap<String, Vec<MenuItem>>,
}

impl SettingsMenuProvider {
    pub fn new(menus: &MenuSettings) -> Self {
        Self {
            roles: menus.roles.clone(),
        }
    }
}

#[async_trait]
impl MenuProvider for SettingsMenuProvider {
    async fn menu_items(&self, role: &str) -> AppResult<Vec<MenuItem>> {
        match self.roles.get(role) {
            Some(items) => Ok(items.clone()),
            None => {
                log::warn!("[Menu] No menu items configured for role '{}'", role);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn items_follow_role() {
        let provider = SettingsMenuProvider::new(&MenuSettings::default());

        let member = provider.menu_items("member").await.unwrap();
        assert_eq!(member[0].route, "/tasks");
        assert!(!member.iter().any(|i| i.id == "reports"));

        let admin = provider.menu_items("admin").await.unwrap();
        assert!(admin.iter().any(|i| i.id == "reports"));

        assert!(provider.menu_items("guest").await.unwrap().is_empty());
    }
}

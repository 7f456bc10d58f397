use crate::config::MENU_METRICS;
use crate::core::geometry;
use crate::shared::types::{Bounds, MenuItem, MenuState, ScreenSize};

/// Popup menu anchored to the collapsed orb.
#[derive(Default)]
pub struct MenuOwner {
    state: MenuState,
}

impl MenuOwner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// Open around `orb` and return the grown widget window bounds.
    pub fn open(&mut self, items: Vec<MenuItem>, orb: Bounds, screen: ScreenSize) -> Bounds {
        let layout = geometry::menu_layout(orb, &MENU_METRICS, items.len(), screen);
        self.state = MenuState {
            open: true,
            anchor: layout.menu_offset(),
            orb_offset: layout.orb_offset(orb),
            items,
        };
        layout.window
    }

    /// Returns `true` if the menu was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.state.open;
        self.state = MenuState::default();
        was_open
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.state.items.iter().find(|item| item.id == id)
    }
}

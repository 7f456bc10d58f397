//! Screen geometry helpers for the widget and secondary windows.
//!
//! Out-of-range bounds are clamped here and never surfaced as errors.

use crate::config::MenuMetrics;
use crate::shared::types::{Bounds, Point, ScreenSize};

/// Clamp `bounds` so that `0 <= x <= screen.width - w` and `0 <= y <= screen.height - h`.
///
/// A window larger than the screen is pinned to the origin on that axis.
pub fn clamp_to_screen(bounds: Bounds, screen: ScreenSize) -> Bounds {
    let max_x = (screen.width - bounds.width).max(0.0);
    let max_y = (screen.height - bounds.height).max(0.0);
    Bounds {
        x: bounds.x.clamp(0.0, max_x),
        y: bounds.y.clamp(0.0, max_y),
        ..bounds
    }
}

/// Default collapsed placement: bottom-right corner, `margin` away from both edges.
pub fn corner_default(width: f64, height: f64, screen: ScreenSize, margin: f64) -> Bounds {
    clamp_to_screen(
        Bounds::new(screen.width - width - margin, screen.height - height - margin, width, height),
        screen,
    )
}

pub fn centered(width: f64, height: f64, screen: ScreenSize) -> Bounds {
    clamp_to_screen(
        Bounds::new((screen.width - width) / 2.0, (screen.height - height) / 2.0, width, height),
        screen,
    )
}

/// Resize keeping the edges nearest to the screen edges fixed.
///
/// An orb parked in the bottom-right quadrant grows up and to the left, one
/// in the top-left quadrant grows down and to the right.
pub fn corner_biased_resize(current: Bounds, width: f64, height: f64, screen: ScreenSize) -> Bounds {
    let center = current.center();
    let x = if center.x > screen.width / 2.0 {
        current.right() - width
    } else {
        current.x
    };
    let y = if center.y > screen.height / 2.0 {
        current.bottom() - height
    } else {
        current.y
    };
    clamp_to_screen(Bounds::new(x, y, width, height), screen)
}

/// Orb hit-area: the circle inscribed in the orb bounds.
pub fn orb_hit(orb: Bounds, point: Point) -> bool {
    let radius = orb.width.min(orb.height) / 2.0;
    orb.center().distance_to(point) <= radius
}

/// Placement of the popup menu around a collapsed orb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    /// Grown widget window region: union of orb and menu surface
    pub window: Bounds,
    /// Menu surface in screen coordinates
    pub menu: Bounds,
}

impl MenuLayout {
    pub fn menu_offset(&self) -> Point {
        Point::new(self.menu.x - self.window.x, self.menu.y - self.window.y)
    }

    pub fn orb_offset(&self, orb: Bounds) -> Point {
        Point::new(orb.x - self.window.x, orb.y - self.window.y)
    }
}

/// Lay the menu out above the orb, horizontally centered on it.
///
/// Falls back to below the orb when there is no room above. The menu surface
/// is kept on screen independently so the orb never moves while the menu is open.
pub fn menu_layout(orb: Bounds, metrics: &MenuMetrics, item_count: usize, screen: ScreenSize) -> MenuLayout {
    let height = metrics.surface_height(item_count);
    let x = orb.center().x - metrics.width / 2.0;
    let above = orb.y - metrics.gap - height;
    let y = if above >= 0.0 {
        above
    } else {
        orb.bottom() + metrics.gap
    };

    let menu = clamp_to_screen(Bounds::new(x, y, metrics.width, height), screen);
    MenuLayout {
        window: orb.union(&menu),
        menu,
    }
}

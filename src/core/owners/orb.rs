//! Collapsed orb: hover tracking and press/drag/release classification.

use crate::core::geometry;
use crate::shared::settings::InteractionSettings;
use crate::shared::types::{Bounds, Point, PointerSample, ScreenSize};

/// How a press on the orb ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Click,
    DragEnd { moved: bool },
}

/// Click iff both the press duration and the pointer displacement stay
/// strictly below their thresholds.
pub fn classify_release(elapsed_ms: f64, displacement: f64, thresholds: &InteractionSettings) -> Release {
    if elapsed_ms < thresholds.click_threshold_ms as f64 && displacement < thresholds.move_threshold_px {
        Release::Click
    } else {
        Release::DragEnd {
            moved: displacement > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    /// Pointer position relative to the orb origin at press time
    pointer_offset: Point,
    origin_bounds: Bounds,
    press: Point,
    pressed_at_ms: f64,
    /// False when the press began with the menu open; such a press can only click
    moves_window: bool,
}

pub struct OrbOwner {
    drag: Option<DragSession>,
    pointer_over: bool,
    thresholds: InteractionSettings,
}

impl OrbOwner {
    pub fn new(thresholds: InteractionSettings) -> Self {
        Self {
            drag: None,
            pointer_over: false,
            thresholds,
        }
    }

    pub fn set_thresholds(&mut self, thresholds: InteractionSettings) {
        self.thresholds = thresholds;
    }

    pub fn pointer_over(&self) -> bool {
        self.pointer_over
    }

    /// Returns `true` when the hover state changed.
    pub fn set_hover(&mut self, inside: bool) -> bool {
        let changed = self.pointer_over != inside;
        self.pointer_over = inside;
        changed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.map(|d| d.moves_window).unwrap_or(false)
    }

    /// Start a press if `sample` hits the orb. Returns `true` when a session began.
    pub fn press(&mut self, sample: PointerSample, orb: Bounds, menu_open: bool) -> bool {
        let position = sample.position();
        if !geometry::orb_hit(orb, position) {
            return false;
        }
        self.pointer_over = true;
        self.drag = Some(DragSession {
            pointer_offset: Point::new(position.x - orb.x, position.y - orb.y),
            origin_bounds: orb,
            press: position,
            pressed_at_ms: sample.timestamp_ms,
            moves_window: !menu_open,
        });
        true
    }

    /// Orb bounds following the pointer, clamped to the screen. `None` outside a drag.
    pub fn drag_to(&self, pointer: Point, screen: ScreenSize) -> Option<Bounds> {
        let session = self.drag.filter(|d| d.moves_window)?;
        let origin = Point::new(
            pointer.x - session.pointer_offset.x,
            pointer.y - session.pointer_offset.y,
        );
        Some(geometry::clamp_to_screen(session.origin_bounds.with_origin(origin), screen))
    }

    /// End the press and classify it. `None` when no press was in progress.
    pub fn release(&mut self, sample: PointerSample) -> Option<Release> {
        let session = self.drag.take()?;
        let elapsed = (sample.timestamp_ms - session.pressed_at_ms).max(0.0);
        let displacement = session.press.distance_to(sample.position());
        let release = classify_release(elapsed, displacement, &self.thresholds);
        match release {
            Release::DragEnd { .. } if !session.moves_window => Some(Release::DragEnd { moved: false }),
            other => Some(other),
        }
    }

    /// Drop a press without classifying it.
    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 1920.0,
        height: 1080.0,
    };

    fn orb() -> Bounds {
        Bounds::new(1000.0, 500.0, 64.0, 64.0)
    }

    fn sample(x: f64, y: f64, t: f64) -> PointerSample {
        PointerSample { x, y, timestamp_ms: t }
    }

    #[test]
    fn click_thresholds_are_exclusive() {
        let t = InteractionSettings::default();
        assert_eq!(classify_release(299.9, 4.99, &t), Release::Click);
        assert!(matches!(classify_release(300.0, 0.0, &t), Release::DragEnd { .. }));
        assert!(matches!(classify_release(0.0, 5.0, &t), Release::DragEnd { .. }));
        assert_eq!(classify_release(300.0, 0.0, &t), Release::DragEnd { moved: false });
    }

    #[test]
    fn fractional_dom_timestamps_are_accepted() {
        let parsed: PointerSample =
            serde_json::from_str(r#"{"x": 10.0, "y": 20.0, "timestamp_ms": 1532.4000000059605}"#).unwrap();
        assert_eq!(parsed.timestamp_ms, 1532.4000000059605);

        let mut owner = OrbOwner::new(InteractionSettings::default());
        assert!(owner.press(sample(1032.0, 532.0, 1_000.25), orb(), false));
        assert_eq!(owner.release(sample(1032.0, 532.0, 1_299.75)), Some(Release::Click));
    }

    #[test]
    fn quick_small_press_is_a_click() {
        let mut owner = OrbOwner::new(InteractionSettings::default());
        assert!(owner.press(sample(1032.0, 532.0, 1_000.0), orb(), false));
        assert!(owner.is_dragging());
        assert_eq!(owner.release(sample(1034.0, 532.0, 1_150.0)), Some(Release::Click));
        assert!(!owner.is_dragging());
    }

    #[test]
    fn press_outside_inscribed_circle_is_ignored() {
        let mut owner = OrbOwner::new(InteractionSettings::default());
        // Corner of the bounding box, outside the circle
        assert!(!owner.press(sample(1001.0, 501.0, 0.0), orb(), false));
        assert_eq!(owner.release(sample(1001.0, 501.0, 10.0)), None);
    }

    #[test]
    fn drag_follows_pointer_and_stays_on_screen() {
        let mut owner = OrbOwner::new(InteractionSettings::default());
        owner.press(sample(1032.0, 532.0, 0.0), orb(), false);

        let moved = owner.drag_to(Point::new(1132.0, 432.0), SCREEN).unwrap();
        assert_eq!(moved, Bounds::new(1100.0, 400.0, 64.0, 64.0));

        let clamped = owner.drag_to(Point::new(5000.0, -100.0), SCREEN).unwrap();
        assert_eq!(clamped, Bounds::new(1856.0, 0.0, 64.0, 64.0));

        assert_eq!(
            owner.release(sample(1132.0, 432.0, 400.0)),
            Some(Release::DragEnd { moved: true })
        );
    }

    #[test]
    fn press_with_menu_open_never_moves_the_window() {
        let mut owner = OrbOwner::new(InteractionSettings::default());
        owner.press(sample(1032.0, 532.0, 0.0), orb(), true);
        assert!(!owner.is_dragging());
        assert_eq!(owner.drag_to(Point::new(1200.0, 600.0), SCREEN), None);
        assert_eq!(
            owner.release(sample(1200.0, 600.0, 50.0)),
            Some(Release::DragEnd { moved: false })
        );
    }

    #[test]
    fn hover_reports_edges_only() {
        let mut owner = OrbOwner::new(InteractionSettings::default());
        assert!(!owner.pointer_over());
        assert!(owner.set_hover(true));
        assert!(!owner.set_hover(true));
        assert!(owner.pointer_over());
        assert!(owner.set_hover(false));
    }
}

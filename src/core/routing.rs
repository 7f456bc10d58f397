//! Input routing controller
//!
//! Single write chokepoint for every window's capture/pass-through mode.
//! Intents are versioned per window; only the newest version from the
//! authoritative owner (see [`ownership`]) is ever applied, regardless of the
//! order in which intents arrive.

pub mod ownership;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ComponentId, RoutingMode, RoutingOutcome, WindowKind};

pub use ownership::{rule_for, Phase, Rule};

/// Applies an accepted routing mode to an OS window.
pub trait RoutingSink {
    fn has_window(&self, window: WindowKind) -> bool;
    fn apply_routing(&mut self, window: WindowKind, mode: RoutingMode) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingIntent {
    pub source: ComponentId,
    pub desired_mode: RoutingMode,
    pub version: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingState {
    pub effective_mode: Option<RoutingMode>,
    pub last_applied_version: u64,
}

pub struct InputRoutingController {
    phase: Phase,
    states: HashMap<WindowKind, RoutingState>,
    next_versions: HashMap<WindowKind, u64>,
}

impl InputRoutingController {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            states: HashMap::new(),
            next_versions: HashMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Update the phase the ownership table is evaluated against.
    pub fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            log::debug!("[Routing] phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Allocate the next version for `window`. Versions start at 1.
    pub fn reserve_version(&mut self, window: WindowKind) -> AppResult<u64> {
        let next = self.next_versions.entry(window).or_insert(0);
        *next = next
            .checked_add(1)
            .ok_or_else(|| AppError::Validation(format!("{} window routing versions exhausted", window)))?;
        Ok(*next)
    }

    /// Highest version handed out for `window` so far.
    pub fn latest_version(&self, window: WindowKind) -> u64 {
        self.next_versions.get(&window).copied().unwrap_or(0)
    }

    /// Build an intent stamped with a freshly reserved version.
    pub fn intent(
        &mut self,
        window: WindowKind,
        source: ComponentId,
        mode: RoutingMode,
    ) -> AppResult<RoutingIntent> {
        Ok(RoutingIntent {
            source,
            desired_mode: mode,
            version: self.reserve_version(window)?,
            timestamp: Utc::now(),
        })
    }

    /// Allocate a version and submit in one step.
    pub fn request_routing(
        &mut self,
        window: WindowKind,
        mode: RoutingMode,
        source: ComponentId,
        sink: &mut dyn RoutingSink,
    ) -> AppResult<RoutingOutcome> {
        let intent = self.intent(window, source, mode)?;
        self.submit(window, intent, sink)
    }

    /// Arbitrate and, if accepted, apply an intent.
    ///
    /// Rejections leave both the effective mode and the stored version untouched.
    pub fn submit(
        &mut self,
        window: WindowKind,
        intent: RoutingIntent,
        sink: &mut dyn RoutingSink,
    ) -> AppResult<RoutingOutcome> {
        if !sink.has_window(window) {
            return Err(AppError::WindowMissing(window));
        }

        let latest = self.latest_version(window);
        if intent.version > latest {
            log::warn!(
                "[Routing] {} submitted unallocated v{} on {} window (latest v{})",
                intent.source,
                intent.version,
                window,
                latest
            );
            return Ok(RoutingOutcome::UnallocatedVersion {
                version: intent.version,
                latest,
            });
        }

        let rule = rule_for(window, self.phase);
        if !rule.allows(intent.source) {
            log::warn!(
                "[Routing] ownership violation on {} window: {} requested {:?} while {} owns {:?}",
                window,
                intent.source,
                intent.desired_mode,
                rule.primary(),
                self.phase
            );
            return Ok(RoutingOutcome::OwnershipViolation {
                source: intent.source,
                owner: rule.primary(),
            });
        }

        if rule.forced != intent.desired_mode {
            log::warn!(
                "[Routing] {} requested {:?} on {} window but {:?} is forced in {:?}",
                intent.source,
                intent.desired_mode,
                window,
                rule.forced,
                self.phase
            );
            return Ok(RoutingOutcome::PolicyViolation {
                requested: intent.desired_mode,
                forced: rule.forced,
            });
        }

        let state = self.state(window);
        if intent.version <= state.last_applied_version {
            log::debug!(
                "[Routing] stale intent v{} from {} on {} window (last applied v{})",
                intent.version,
                intent.source,
                window,
                state.last_applied_version
            );
            return Ok(RoutingOutcome::Stale {
                version: intent.version,
                last_applied: state.last_applied_version,
            });
        }

        sink.apply_routing(window, intent.desired_mode)?;

        self.states.insert(
            window,
            RoutingState {
                effective_mode: Some(intent.desired_mode),
                last_applied_version: intent.version,
            },
        );
        log::debug!(
            "[Routing] {} window -> {:?} (v{}, {})",
            window,
            intent.desired_mode,
            intent.version,
            intent.source
        );
        Ok(RoutingOutcome::Applied {
            version: intent.version,
            mode: intent.desired_mode,
        })
    }

    pub fn effective_mode(&self, window: WindowKind) -> Option<RoutingMode> {
        self.state(window).effective_mode
    }

    pub fn state(&self, window: WindowKind) -> RoutingState {
        self.states.get(&window).copied().unwrap_or_default()
    }

    /// Drop the effective mode of a destroyed window. Versions keep increasing.
    pub fn forget(&mut self, window: WindowKind) {
        if let Some(state) = self.states.get_mut(&window) {
            state.effective_mode = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::{CollapsedSubstate, UiMode};

    #[derive(Default)]
    struct RecordingSink {
        applied: Vec<(WindowKind, RoutingMode)>,
        missing_secondary: bool,
    }

    impl RoutingSink for RecordingSink {
        fn has_window(&self, window: WindowKind) -> bool {
            !(self.missing_secondary && window == WindowKind::Secondary)
        }

        fn apply_routing(&mut self, window: WindowKind, mode: RoutingMode) -> AppResult<()> {
            self.applied.push((window, mode));
            Ok(())
        }
    }

    fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    /// Phase in which the widget owner may request `mode`.
    fn phase_allowing(mode: RoutingMode) -> Phase {
        match mode {
            RoutingMode::Capture => Phase::collapsed(CollapsedSubstate::Hovering),
            RoutingMode::PassThrough => Phase::collapsed(CollapsedSubstate::Idle),
        }
    }

    #[test]
    fn highest_version_wins_in_any_delivery_order() {
        let modes = [
            RoutingMode::Capture,
            RoutingMode::PassThrough,
            RoutingMode::Capture,
            RoutingMode::PassThrough,
        ];

        for order in permutations(&[0, 1, 2, 3]) {
            let mut controller = InputRoutingController::new(Phase::collapsed(CollapsedSubstate::Idle));
            let mut sink = RecordingSink::default();
            let intents: Vec<_> = modes
                .iter()
                .map(|mode| controller.intent(WindowKind::Widget, ComponentId::Widget, *mode).unwrap())
                .collect();

            for &i in &order {
                // Each intent arrives while the hover state that produced it still holds
                controller.set_phase(phase_allowing(intents[i].desired_mode));
                controller.submit(WindowKind::Widget, intents[i], &mut sink).unwrap();
            }

            assert_eq!(
                controller.effective_mode(WindowKind::Widget),
                Some(RoutingMode::PassThrough),
                "order {:?}",
                order
            );
            assert_eq!(controller.state(WindowKind::Widget).last_applied_version, 4);
        }
    }

    #[test]
    fn stale_pass_through_cannot_undo_newer_capture() {
        let mut controller = InputRoutingController::new(Phase::collapsed(CollapsedSubstate::Hovering));
        let mut sink = RecordingSink::default();
        let old = controller
            .intent(WindowKind::Widget, ComponentId::Widget, RoutingMode::PassThrough)
            .unwrap();
        let new = controller
            .intent(WindowKind::Widget, ComponentId::Widget, RoutingMode::Capture)
            .unwrap();

        controller.submit(WindowKind::Widget, new, &mut sink).unwrap();
        controller.set_phase(Phase::collapsed(CollapsedSubstate::Idle));
        let outcome = controller.submit(WindowKind::Widget, old, &mut sink).unwrap();

        assert_eq!(outcome, RoutingOutcome::Stale { version: 1, last_applied: 2 });
        assert_eq!(controller.effective_mode(WindowKind::Widget), Some(RoutingMode::Capture));
        assert_eq!(sink.applied, vec![(WindowKind::Widget, RoutingMode::Capture)]);
    }

    #[test]
    fn idle_and_hovering_policies_are_enforced() {
        let mut controller = InputRoutingController::new(Phase::collapsed(CollapsedSubstate::Idle));
        let mut sink = RecordingSink::default();
        controller
            .request_routing(WindowKind::Widget, RoutingMode::PassThrough, ComponentId::Widget, &mut sink)
            .unwrap();

        // Pointer is elsewhere: the orb may not swallow clicks
        let capture = controller
            .request_routing(WindowKind::Widget, RoutingMode::Capture, ComponentId::Widget, &mut sink)
            .unwrap();
        assert_eq!(
            capture,
            RoutingOutcome::PolicyViolation {
                requested: RoutingMode::Capture,
                forced: RoutingMode::PassThrough
            }
        );
        assert_eq!(controller.effective_mode(WindowKind::Widget), Some(RoutingMode::PassThrough));

        controller.set_phase(Phase::collapsed(CollapsedSubstate::Hovering));
        controller
            .request_routing(WindowKind::Widget, RoutingMode::Capture, ComponentId::Widget, &mut sink)
            .unwrap();
        let version = controller.state(WindowKind::Widget).last_applied_version;

        // A leave arriving after the pointer came back cannot release the orb
        let leave = controller
            .request_routing(WindowKind::Widget, RoutingMode::PassThrough, ComponentId::Widget, &mut sink)
            .unwrap();
        assert!(matches!(leave, RoutingOutcome::PolicyViolation { .. }));
        assert_eq!(controller.effective_mode(WindowKind::Widget), Some(RoutingMode::Capture));
        assert_eq!(controller.state(WindowKind::Widget).last_applied_version, version);
    }

    #[test]
    fn non_owner_changes_neither_mode_nor_version() {
        let mut controller = InputRoutingController::new(Phase::new(UiMode::Expanded));
        let mut sink = RecordingSink::default();
        controller
            .request_routing(WindowKind::Widget, RoutingMode::Capture, ComponentId::Shell, &mut sink)
            .unwrap();
        let before = controller.state(WindowKind::Widget);

        for source in [ComponentId::Widget, ComponentId::Menu] {
            for mode in [RoutingMode::PassThrough, RoutingMode::Capture] {
                let outcome = controller
                    .request_routing(WindowKind::Widget, mode, source, &mut sink)
                    .unwrap();
                assert_eq!(
                    outcome,
                    RoutingOutcome::OwnershipViolation {
                        source,
                        owner: ComponentId::Shell
                    }
                );
                assert_eq!(controller.state(WindowKind::Widget), before);
            }
        }
        assert_eq!(sink.applied.len(), 1);
    }

    #[test]
    fn forced_policy_rejects_owner_release() {
        let mut controller = InputRoutingController::new(Phase::collapsed(CollapsedSubstate::MenuOpen));
        let mut sink = RecordingSink::default();
        controller
            .request_routing(WindowKind::Widget, RoutingMode::Capture, ComponentId::Menu, &mut sink)
            .unwrap();

        // A late pointer-leave from the orb must not release the open menu
        let outcome = controller
            .request_routing(WindowKind::Widget, RoutingMode::PassThrough, ComponentId::Widget, &mut sink)
            .unwrap();

        assert_eq!(
            outcome,
            RoutingOutcome::PolicyViolation {
                requested: RoutingMode::PassThrough,
                forced: RoutingMode::Capture
            }
        );
        assert_eq!(controller.effective_mode(WindowKind::Widget), Some(RoutingMode::Capture));
        assert_eq!(controller.state(WindowKind::Widget).last_applied_version, 1);
    }

    #[test]
    fn versions_are_per_window() {
        let mut controller = InputRoutingController::new(Phase::new(UiMode::Expanded));
        assert_eq!(controller.reserve_version(WindowKind::Widget).unwrap(), 1);
        assert_eq!(controller.reserve_version(WindowKind::Widget).unwrap(), 2);
        assert_eq!(controller.reserve_version(WindowKind::Secondary).unwrap(), 1);
    }

    #[test]
    fn unallocated_version_is_rejected() {
        let mut controller = InputRoutingController::new(Phase::new(UiMode::Expanded));
        let mut sink = RecordingSink::default();
        let reserved = controller.reserve_version(WindowKind::Widget).unwrap();
        let intent = RoutingIntent {
            source: ComponentId::Shell,
            desired_mode: RoutingMode::Capture,
            version: u64::MAX,
            timestamp: Utc::now(),
        };

        let outcome = controller.submit(WindowKind::Widget, intent, &mut sink).unwrap();

        assert_eq!(
            outcome,
            RoutingOutcome::UnallocatedVersion {
                version: u64::MAX,
                latest: reserved
            }
        );
        assert_eq!(controller.state(WindowKind::Widget), RoutingState::default());
        assert!(sink.applied.is_empty());

        // The allocator is untouched and the reserved intent still applies
        let pending = RoutingIntent { version: reserved, ..intent };
        assert!(controller.submit(WindowKind::Widget, pending, &mut sink).unwrap().is_applied());
        assert_eq!(controller.reserve_version(WindowKind::Widget).unwrap(), reserved + 1);
    }

    #[test]
    fn exhausted_versions_are_an_error_not_a_wrap() {
        let mut controller = InputRoutingController::new(Phase::new(UiMode::Expanded));
        controller.next_versions.insert(WindowKind::Widget, u64::MAX);

        assert!(matches!(
            controller.reserve_version(WindowKind::Widget),
            Err(AppError::Validation(_))
        ));
        assert_eq!(controller.latest_version(WindowKind::Widget), u64::MAX);
    }

    #[test]
    fn missing_window_is_an_error() {
        let mut controller = InputRoutingController::new(Phase::new(UiMode::Expanded));
        let mut sink = RecordingSink {
            missing_secondary: true,
            ..Default::default()
        };
        let result = controller.request_routing(
            WindowKind::Secondary,
            RoutingMode::Capture,
            ComponentId::Shell,
            &mut sink,
        );
        assert!(matches!(result, Err(AppError::WindowMissing(WindowKind::Secondary))));
    }
}

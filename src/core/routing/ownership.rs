//! Ownership table: which component may set routing for a window, and which
//! mode is forced, for every UI phase.

use crate::shared::types::{CollapsedSubstate, ComponentId, RoutingMode, UiMode, WindowKind};

/// UI mode plus the collapsed substate. The substate is ignored outside `Collapsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub mode: UiMode,
    pub substate: CollapsedSubstate,
}

impl Phase {
    pub fn new(mode: UiMode) -> Self {
        Self {
            mode,
            substate: CollapsedSubstate::Idle,
        }
    }

    pub fn collapsed(substate: CollapsedSubstate) -> Self {
        Self {
            mode: UiMode::Collapsed,
            substate,
        }
    }

    pub fn substate(&self) -> Option<CollapsedSubstate> {
        (self.mode == UiMode::Collapsed).then_some(self.substate)
    }
}

/// One row of the ownership table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Authoritative owners; the first one re-asserts the policy on phase changes.
    pub owners: &'static [ComponentId],
    /// Mode every accepted intent must carry.
    pub forced: RoutingMode,
}

impl Rule {
    pub fn primary(&self) -> ComponentId {
        self.owners[0]
    }

    pub fn allows(&self, source: ComponentId) -> bool {
        self.owners.contains(&source)
    }
}

const SHELL_CAPTURE: Rule = Rule {
    owners: &[ComponentId::Shell],
    forced: RoutingMode::Capture,
};

pub fn rule_for(window: WindowKind, phase: Phase) -> Rule {
    if window == WindowKind::Secondary {
        return SHELL_CAPTURE;
    }

    match phase.mode {
        UiMode::Unauthenticated | UiMode::AuthLoading => SHELL_CAPTURE,
        UiMode::Expanding | UiMode::Expanded | UiMode::Collapsing => SHELL_CAPTURE,
        UiMode::Collapsed => match phase.substate {
            CollapsedSubstate::Idle => Rule {
                owners: &[ComponentId::Widget],
                forced: RoutingMode::PassThrough,
            },
            // Pointer is over the orb hit-area
            CollapsedSubstate::Hovering | CollapsedSubstate::Dragging => Rule {
                owners: &[ComponentId::Widget],
                forced: RoutingMode::Capture,
            },
            CollapsedSubstate::MenuOpen => Rule {
                owners: &[ComponentId::Menu, ComponentId::Widget],
                forced: RoutingMode::Capture,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_and_expanded_modes_belong_to_shell() {
        for mode in [
            UiMode::Unauthenticated,
            UiMode::AuthLoading,
            UiMode::Expanding,
            UiMode::Expanded,
            UiMode::Collapsing,
        ] {
            let rule = rule_for(WindowKind::Widget, Phase::new(mode));
            assert_eq!(rule.owners, &[ComponentId::Shell]);
            assert_eq!(rule.forced, RoutingMode::Capture);
        }
    }

    #[test]
    fn collapsed_substates_belong_to_widget_side() {
        let idle = rule_for(WindowKind::Widget, Phase::collapsed(CollapsedSubstate::Idle));
        assert!(idle.allows(ComponentId::Widget));
        assert!(!idle.allows(ComponentId::Shell));
        assert_eq!(idle.forced, RoutingMode::PassThrough);

        let hovering = rule_for(WindowKind::Widget, Phase::collapsed(CollapsedSubstate::Hovering));
        assert_eq!(hovering.owners, &[ComponentId::Widget]);
        assert_eq!(hovering.forced, RoutingMode::Capture);

        let dragging = rule_for(WindowKind::Widget, Phase::collapsed(CollapsedSubstate::Dragging));
        assert_eq!(dragging.forced, RoutingMode::Capture);

        let menu = rule_for(WindowKind::Widget, Phase::collapsed(CollapsedSubstate::MenuOpen));
        assert!(menu.allows(ComponentId::Menu));
        assert!(menu.allows(ComponentId::Widget));
        assert!(!menu.allows(ComponentId::Shell));
        assert_eq!(menu.forced, RoutingMode::Capture);
    }

    #[test]
    fn secondary_is_always_shell_capture() {
        let rule = rule_for(WindowKind::Secondary, Phase::collapsed(CollapsedSubstate::Idle));
        assert_eq!(rule, SHELL_CAPTURE);
    }

    #[test]
    fn substate_only_reported_when_collapsed() {
        assert_eq!(Phase::new(UiMode::Expanded).substate(), None);
        assert_eq!(
            Phase::collapsed(CollapsedSubstate::Hovering).substate(),
            Some(CollapsedSubstate::Hovering)
        );
    }
}

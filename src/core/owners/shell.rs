//! Shell-level UI mode: auth gating and the expand/collapse cycle.

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{AuthStatus, UiMode};

/// Effect of an auth update on the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// Entered a gated mode; secondary content must be hidden
    Gated(UiMode),
    /// Authenticated again, back to the collapsed orb
    Released,
}

pub struct ShellOwner {
    mode: UiMode,
}

impl Default for ShellOwner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellOwner {
    pub fn new() -> Self {
        Self {
            mode: UiMode::Unauthenticated,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn is_gated(&self) -> bool {
        matches!(self.mode, UiMode::Unauthenticated | UiMode::AuthLoading)
    }

    pub fn apply_auth(&mut self, status: AuthStatus) -> Transition {
        let gate = if status.auth_loading {
            Some(UiMode::AuthLoading)
        } else if !status.authenticated {
            Some(UiMode::Unauthenticated)
        } else {
            None
        };

        match gate {
            Some(mode) if mode == self.mode => Transition::Unchanged,
            Some(mode) => {
                self.set(mode);
                Transition::Gated(mode)
            }
            None if self.is_gated() => {
                self.set(UiMode::Collapsed);
                Transition::Released
            }
            None => Transition::Unchanged,
        }
    }

    /// Collapsed or Expanded → Expanding.
    pub fn begin_expand(&mut self) -> AppResult<()> {
        match self.mode {
            UiMode::Collapsed | UiMode::Expanded => {
                self.set(UiMode::Expanding);
                Ok(())
            }
            mode => Err(AppError::Validation(format!(
                "cannot open the secondary window while {:?}",
                mode
            ))),
        }
    }

    pub fn finish_expand(&mut self) {
        if self.mode == UiMode::Expanding {
            self.set(UiMode::Expanded);
        }
    }

    /// Secondary failed to open or navigate. Falls back to Expanded when the
    /// old content is still on screen, otherwise to the collapsed orb.
    pub fn abort_expand(&mut self, secondary_visible: bool) {
        if self.mode == UiMode::Expanding {
            self.set(if secondary_visible {
                UiMode::Expanded
            } else {
                UiMode::Collapsed
            });
        }
    }

    /// Expanded → Collapsing. Returns `false` from any other mode.
    pub fn begin_collapse(&mut self) -> bool {
        if self.mode == UiMode::Expanded {
            self.set(UiMode::Collapsing);
            true
        } else {
            false
        }
    }

    pub fn finish_collapse(&mut self) {
        if self.mode == UiMode::Collapsing {
            self.set(UiMode::Collapsed);
        }
    }

    /// Collapsing failed: the secondary is still on screen.
    pub fn abort_collapse(&mut self) {
        if self.mode == UiMode::Collapsing {
            self.set(UiMode::Expanded);
        }
    }

    fn set(&mut self, mode: UiMode) {
        log::info!("[Shell] {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> AuthStatus {
        AuthStatus {
            auth_loading: false,
            authenticated: true,
        }
    }

    #[test]
    fn starts_gated_until_authenticated() {
        let mut shell = ShellOwner::new();
        assert!(shell.is_gated());
        assert!(shell.begin_expand().is_err());

        let loading = AuthStatus {
            auth_loading: true,
            authenticated: false,
        };
        assert_eq!(shell.apply_auth(loading), Transition::Gated(UiMode::AuthLoading));
        assert_eq!(shell.apply_auth(signed_in()), Transition::Released);
        assert_eq!(shell.mode(), UiMode::Collapsed);
        assert_eq!(shell.apply_auth(signed_in()), Transition::Unchanged);
    }

    #[test]
    fn full_expand_collapse_cycle() {
        let mut shell = ShellOwner::new();
        shell.apply_auth(signed_in());

        shell.begin_expand().unwrap();
        assert_eq!(shell.mode(), UiMode::Expanding);
        shell.finish_expand();
        assert_eq!(shell.mode(), UiMode::Expanded);

        assert!(shell.begin_collapse());
        assert_eq!(shell.mode(), UiMode::Collapsing);
        shell.finish_collapse();
        assert_eq!(shell.mode(), UiMode::Collapsed);
        assert!(!shell.begin_collapse());
    }

    #[test]
    fn sign_out_while_expanded_gates() {
        let mut shell = ShellOwner::new();
        shell.apply_auth(signed_in());
        shell.begin_expand().unwrap();
        shell.finish_expand();

        let transition = shell.apply_auth(AuthStatus::default());
        assert_eq!(transition, Transition::Gated(UiMode::Unauthenticated));
        assert!(shell.is_gated());
    }

    #[test]
    fn aborted_expand_returns_to_collapsed() {
        let mut shell = ShellOwner::new();
        shell.apply_auth(signed_in());
        shell.begin_expand().unwrap();
        shell.abort_expand(false);
        assert_eq!(shell.mode(), UiMode::Collapsed);

        shell.begin_expand().unwrap();
        shell.finish_expand();
        shell.begin_expand().unwrap();
        shell.abort_expand(true);
        assert_eq!(shell.mode(), UiMode::Expanded);
    }
}

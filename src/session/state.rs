use crate::navigation::Screen;

/// A boolean that has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unknown,
    True,
    False,
}

impl TriState {
    pub fn known(self) -> Option<bool> {
        match self {
            TriState::Unknown => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

/// In-memory launch state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootstrapState {
    pub is_first_launch: TriState,
    pub is_logged_in: TriState,
    /// Only consulted while `is_first_launch` is true.
    pub splash_done: bool,
}

impl BootstrapState {
    pub fn screen(&self) -> Option<Screen> {
        derive_screen(self)
    }

    pub fn is_resolved(&self) -> bool {
        self.is_first_launch.known().is_some() && self.is_logged_in.known().is_some()
    }
}

/// Selects the mounted screen group. `None` means nothing may be rendered yet.
pub fn derive_screen(state: &BootstrapState) -> Option<Screen> {
    let first_launch = state.is_first_launch.known()?;
    let logged_in = state.is_logged_in.known()?;

    if first_launch && !state.splash_done {
        return Some(Screen::Splash);
    }
    Some(if logged_in {
        Screen::Authenticated
    } else {
        Screen::Unauthenticated
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TriState; 3] = [TriState::Unknown, TriState::True, TriState::False];

    fn all_states() -> impl Iterator<Item = BootstrapState> {
        ALL.into_iter().flat_map(|is_first_launch| {
            ALL.into_iter().flat_map(move |is_logged_in| {
                [false, true].into_iter().map(move |splash_done| BootstrapState {
                    is_first_launch,
                    is_logged_in,
                    splash_done,
                })
            })
        })
    }

    #[test]
    fn default_state_is_unresolved() {
        let state = BootstrapState::default();
        assert!(!state.is_resolved());
        assert_eq!(state.screen(), None);
    }

    #[test]
    fn nothing_renders_while_any_flag_is_unknown() {
        for state in all_states() {
            if !state.is_resolved() {
                assert_eq!(derive_screen(&state), None, "{state:?}");
            } else {
                assert!(derive_screen(&state).is_some(), "{state:?}");
            }
        }
    }

    #[test]
    fn splash_only_on_first_launch_before_timer() {
        for state in all_states() {
            let is_splash = derive_screen(&state) == Some(Screen::Splash);
            let expected = state.is_first_launch == TriState::True
                && state.is_logged_in != TriState::Unknown
                && !state.splash_done;
            assert_eq!(is_splash, expected, "{state:?}");
        }
    }

    #[test]
    fn resolved_non_splash_follows_login_flag() {
        let state = BootstrapState {
            is_first_launch: TriState::False,
            is_logged_in: TriState::True,
            splash_done: false,
        };
        assert_eq!(derive_screen(&state), Some(Screen::Authenticated));

        let state = BootstrapState {
            is_first_launch: TriState::True,
            is_logged_in: TriState::False,
            splash_done: true,
        };
        assert_eq!(derive_screen(&state), Some(Screen::Unauthenticated));
    }

    #[test]
    fn tri_state_from_bool() {
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::from(false), TriState::False);
        assert_eq!(TriState::Unknown.known(), None);
    }
}

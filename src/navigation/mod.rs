//! Screen catalogue and the navigation stack the controller mounts into.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

/// Tabs inside the authenticated [`Route::BottomTab`] group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Dashboard,
    Reward,
    UploadScreenshot,
    PaymentStatus,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Dashboard,
        Tab::Reward,
        Tab::UploadScreenshot,
        Tab::PaymentStatus,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Reward => "Reward",
            Tab::UploadScreenshot => "Upload Screenshot",
            Tab::PaymentStatus => "Payment Status",
        }
    }
}

/// Mutually exclusive screen groups; exactly one is mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Splash,
    Authenticated,
    Unauthenticated,
}

impl Screen {
    /// Route the stack is reset to when this group gets mounted.
    pub fn entry_route(self) -> Route {
        match self {
            Screen::Splash => Route::Splash,
            Screen::Authenticated => Route::BottomTab { tab: Tab::Dashboard },
            Screen::Unauthenticated => Route::Home,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Splash => "splash",
            Screen::Authenticated => "authenticated",
            Screen::Unauthenticated => "unauthenticated",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Splash,
    Home,
    Login,
    Otp { mobile: String },
    BottomTab { tab: Tab },
    Home2,
}

impl Route {
    pub fn group(&self) -> Screen {
        match self {
            Route::Splash => Screen::Splash,
            Route::Home | Route::Login | Route::Otp { .. } => Screen::Unauthenticated,
            Route::BottomTab { .. } | Route::Home2 => Screen::Authenticated,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Splash => "Splash",
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Otp { .. } => "OTP",
            Route::BottomTab { .. } => "BottomTab",
            Route::Home2 => "Home2",
        }
    }

    fn same_screen(&self, other: &Route) -> bool {
        self.name() == other.name()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Otp { mobile } => write!(f, "OTP({mobile})"),
            Route::BottomTab { tab } => write!(f, "BottomTab({})", tab.title()),
            other => f.write_str(other.name()),
        }
    }
}

/// Imperative navigation handle shared with every screen.
pub trait Navigator: Send + Sync {
    /// Pushes `route`, or pops back to it when the same screen is already on
    /// the stack (its params are replaced).
    fn navigate(&self, route: Route);

    /// Pops the top entry. The root entry is never popped; returns whether
    /// anything changed.
    fn go_back(&self) -> bool;

    /// Replaces the whole history.
    fn reset(&self, routes: Vec<Route>);

    fn routes(&self) -> Vec<Route>;

    fn current(&self) -> Option<Route> {
        self.routes().last().cloned()
    }
}

#[derive(Debug, Default)]
pub struct StackNavigator {
    stack: Mutex<Vec<Route>>,
}

impl StackNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for StackNavigator {
    fn navigate(&self, route: Route) {
        let mut stack = self.stack.lock();
        if let Some(pos) = stack.iter().position(|r| r.same_screen(&route)) {
            stack.truncate(pos);
        }
        tracing::debug!(%route, "navigate");
        stack.push(route);
    }

    fn go_back(&self) -> bool {
        let mut stack = self.stack.lock();
        if stack.len() <= 1 {
            return false;
        }
        stack.pop();
        true
    }

    fn reset(&self, routes: Vec<Route>) {
        tracing::debug!(depth = routes.len(), "navigation reset");
        *self.stack.lock() = routes;
    }

    fn routes(&self) -> Vec<Route> {
        self.stack.lock().clone()
    }
}

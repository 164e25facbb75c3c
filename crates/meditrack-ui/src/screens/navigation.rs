//! Top-level destinations and the back stack.

use crate::intent::Intent;
use crate::view::Node;

/// A top-level destination shown in the bottom bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Records,
    Appointments,
    Profile,
}

impl Route {
    /// Bottom bar order.
    pub const ALL: [Route; 4] = [
        Route::Dashboard,
        Route::Records,
        Route::Appointments,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Records => "records",
            Route::Appointments => "appointments",
            Route::Profile => "profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Records => "Records",
            Route::Appointments => "Appointments",
            Route::Profile => "Profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.path() == path)
    }
}

/// Back stack rooted at [`Route::Dashboard`].
///
/// Switching tabs pops back to the start destination first, and selecting
/// the current tab again is a no-op, so the stack never holds more than the
/// start destination plus one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub const START: Route = Route::Dashboard;

    pub fn new() -> Self {
        Self {
            stack: vec![Self::START],
        }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Self::START)
    }

    pub fn back_stack(&self) -> &[Route] {
        &self.stack
    }

    pub fn navigate(&mut self, route: Route) {
        if self.current() == route {
            return;
        }
        self.stack.truncate(1);
        if route != Self::START {
            self.stack.push(route);
        }
        tracing::debug!(route = route.path(), depth = self.stack.len(), "navigate");
    }

    /// Pop one destination. Returns false at the start destination.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Apply a navigation intent. Other intents are handed back.
    pub fn handle(&mut self, intent: Intent) -> Option<Intent> {
        match intent {
            Intent::Navigate(route) => {
                self.navigate(route);
                None
            }
            Intent::Back if self.back() => None,
            other => Some(other),
        }
    }

    /// Bottom navigation bar, one tab per route.
    pub fn bottom_bar(&self) -> Node {
        let current = self.current();
        Node::row(
            Route::ALL
                .into_iter()
                .map(|route| {
                    Node::tab(route.title(), Intent::Navigate(route), route == current)
                        .tagged(format!("nav_{}", route.path()))
                })
                .collect(),
        )
        .tagged("bottom_bar")
    }
}

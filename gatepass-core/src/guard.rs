use gatepass_shared::Role;

use crate::session::Session;

/// Outcome of a route-guard check. Re-derived on every page entry; there
/// is no cross-tab invalidation once a decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Storage has not loaded yet; render nothing and decide later.
    Pending,
    Allow,
    RedirectToLogin { callback: Option<String> },
    /// Authenticated but the wrong role for this area.
    RedirectHome,
}

/// Gate a page behind authentication and (optionally) a role.
///
/// The hydration check comes first: deciding before the persisted session
/// has loaded would bounce a logged-in user to the login page.
pub fn evaluate(
    hydrated: bool,
    session: &Session,
    required_role: Option<Role>,
    requested_path: &str,
) -> GuardDecision {
    if !hydrated {
        return GuardDecision::Pending;
    }

    if !session.is_authenticated || session.token.is_none() {
        tracing::debug!(path = requested_path, "Unauthenticated; redirecting to login");
        let callback = if requested_path.is_empty() {
            None
        } else {
            Some(requested_path.to_string())
        };
        return GuardDecision::RedirectToLogin { callback };
    }

    if let Some(required) = required_role {
        if session.role != Some(required) {
            return GuardDecision::RedirectHome;
        }
    }

    GuardDecision::Allow
}

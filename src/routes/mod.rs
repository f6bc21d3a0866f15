/// Router Module Index
///
/// Splits the shell's routes by how access is decided, so that every protected
/// view is covered by a layer rather than by a check inside a handler.

/// Routes open to everyone: health, the login flow, the unauthorized notice and
/// the guard probe.
pub mod public;

/// Routes that act on the current session. Handlers take the `AuthUser`
/// extractor and answer 401 when nobody is logged in.
pub mod session;

/// Every other path is a page navigation decided by the route guard.
pub mod pages;

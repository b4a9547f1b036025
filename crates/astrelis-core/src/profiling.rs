//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are compiled in but stay inert until [`set_enabled`] turns them on,
//! so hot paths can carry `profile_function!()` unconditionally.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn scope collection on or off.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
    tracing::debug!(enabled, "puffin scopes toggled");
}

/// Whether scopes are currently being collected.
pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per layout pass so scopes are grouped by pass.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

//! Error taxonomy for the overlay core.
//!
//! Nothing in here is fatal: every failure degrades to "stop this one
//! operation, keep prior state consistent".

/// Failures reported by a [`crate::backend::VolumeBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    /// The platform refused a relative step or a policy change.
    /// Steps already applied in the current operation stay in effect.
    #[error("platform denied the volume operation")]
    PermissionDenied,
}

/// Failures reported by the window-surface capability.
///
/// Both variants mean the requested state already holds, so callers
/// treat them as already satisfied and swallow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface is already attached")]
    AlreadyAttached,
    #[error("surface is already detached")]
    AlreadyDetached,
}

/// Failures surfaced to the direct volume-set entry point.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RemoteSetError {
    /// No backend session is currently attached.
    #[error("volume backend is not ready")]
    NotReady,
    /// The requested fraction is outside `[0, 1]` or not a number.
    #[error("invalid volume fraction: {0}")]
    InvalidArgument(f32),
}

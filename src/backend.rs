//! Volume backend capability and the ratchet apply algorithm.
//!
//! The backend only exposes *relative* raise/lower steps, so absolute
//! targets are reached by [`apply_target`], which ratchets one step at a
//! time while re-reading the live level between steps. Some platforms
//! apply increments asynchronously or clamp silently, which is why the
//! loop guards against overshoot instead of trusting its own arithmetic.

use std::collections::HashMap;

use tracing::debug;

use crate::error::VolumeError;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Raise,
    Lower,
}

/// Device notification policy. Anything other than `Normal` suppresses
/// ring/notification audio and must be exited before raising those streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    Normal,
    Filtered,
}

/// Read/step access to per-stream volume levels.
///
/// Calls are expected to be fast, synchronous and local; a slower
/// implementation must be wrapped so the control thread never blocks.
pub trait VolumeBackend {
    fn current(&self, stream: Stream) -> u32;
    fn max(&self, stream: Stream) -> u32;
    fn step(&mut self, stream: Stream, direction: Direction) -> Result<(), VolumeError>;
    fn policy_mode(&self) -> PolicyMode;
    fn policy_access_granted(&self) -> bool;
    fn set_policy_mode(&mut self, normal: bool) -> Result<(), VolumeError>;
}

/// Ratchet the stream toward `target` using relative steps.
///
/// Guarantees: idempotent (no-op when already at `target`), monotonic
/// (each step strictly reduces the distance) and bounded (at most
/// `|target - current|` step calls). A `PermissionDenied` aborts the
/// remaining steps but keeps the ones already applied.
pub fn apply_target<B: VolumeBackend + ?Sized>(
    backend: &mut B,
    stream: Stream,
    target: u32,
) -> Result<(), VolumeError> {
    let max = backend.max(stream);
    let target = target.min(max);
    let current = backend.current(stream);
    if current == target {
        return Ok(());
    }

    // Leaving silent/DND must happen before the first step.
    if stream.policy_sensitive()
        && target > 0
        && backend.policy_mode() != PolicyMode::Normal
        && backend.policy_access_granted()
    {
        backend.set_policy_mode(true)?;
    }

    let direction = if target > current {
        Direction::Raise
    } else {
        Direction::Lower
    };

    for _ in 0..current.abs_diff(target) {
        let level = backend.current(stream);
        let reached = match direction {
            Direction::Raise => level >= target,
            Direction::Lower => level <= target,
        };
        if reached {
            break;
        }
        backend.step(stream, direction)?;
    }

    debug!(%stream, from = current, to = target, "ratchet apply finished");
    Ok(())
}

/// In-memory backend used by the demo binary.
///
/// Mirrors platform mixer semantics: stepping past a bound is a silent
/// no-op, never an error.
pub struct MemoryBackend {
    levels: HashMap<Stream, u32>,
    max_levels: HashMap<Stream, u32>,
    policy: PolicyMode,
    policy_access: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let streams = [Stream::Media, Stream::Ring, Stream::Notification, Stream::Alarm];
        Self {
            levels: streams.iter().map(|s| (*s, 5)).collect(),
            max_levels: streams.iter().map(|s| (*s, 15)).collect(),
            policy: PolicyMode::Normal,
            policy_access: true,
        }
    }

    pub fn set_level(&mut self, stream: Stream, level: u32) {
        let max = self.max(stream);
        self.levels.insert(stream, level.min(max));
    }

    pub fn set_max(&mut self, stream: Stream, max: u32) {
        self.max_levels.insert(stream, max.max(1));
        let level = self.current(stream).min(max);
        self.levels.insert(stream, level);
    }

    pub fn set_policy(&mut self, policy: PolicyMode) {
        self.policy = policy;
    }

    pub fn set_policy_access(&mut self, granted: bool) {
        self.policy_access = granted;
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeBackend for MemoryBackend {
    fn current(&self, stream: Stream) -> u32 {
        self.levels.get(&stream).copied().unwrap_or(0)
    }

    fn max(&self, stream: Stream) -> u32 {
        self.max_levels.get(&stream).copied().unwrap_or(1)
    }

    fn step(&mut self, stream: Stream, direction: Direction) -> Result<(), VolumeError> {
        let max = self.max(stream);
        let level = self.current(stream);
        let next = match direction {
            Direction::Raise => level.saturating_add(1).min(max),
            Direction::Lower => level.saturating_sub(1),
        };
        self.levels.insert(stream, next);
        Ok(())
    }

    fn policy_mode(&self) -> PolicyMode {
        self.policy
    }

    fn policy_access_granted(&self) -> bool {
        self.policy_access
    }

    fn set_policy_mode(&mut self, normal: bool) -> Result<(), VolumeError> {
        self.policy = if normal {
            PolicyMode::Normal
        } else {
            PolicyMode::Filtered
        };
        Ok(())
    }
}

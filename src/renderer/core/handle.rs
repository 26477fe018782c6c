//! Strongly-typed GPU handles.
//!
//! Thin `Copy` wrappers around the `u16` indices the device hands out. Both
//! reserve `u16::MAX` as the invalid sentinel; release logic branches on
//! [`is_valid`](ShaderHandle::is_valid) so destroying twice is harmless.

use std::sync::atomic::{AtomicU64, Ordering};

const INVALID_HANDLE: u16 = u16::MAX;

/// Handle to a device-side shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u16);

impl ShaderHandle {
    pub const INVALID: ShaderHandle = ShaderHandle(INVALID_HANDLE);

    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 != INVALID_HANDLE
    }
}

impl Default for ShaderHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Handle to a device-side uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformHandle(pub u16);

impl UniformHandle {
    pub const INVALID: UniformHandle = UniformHandle(INVALID_HANDLE);

    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 != INVALID_HANDLE
    }
}

impl Default for UniformHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Process-unique identity of a [`ShaderVariation`].
///
/// The device reports its currently bound shaders by this id, so a variation
/// can tell whether it must unbind itself on release.
///
/// [`ShaderVariation`]: crate::renderer::pipeline::ShaderVariation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariationId(u64);

static NEXT_VARIATION_ID: AtomicU64 = AtomicU64::new(1);

impl VariationId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_VARIATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

//! Error taxonomy.
//!
//! Every class here is fatal to the process: the binary logs it and exits with
//! a non-zero status. They are separate types so callers (and tests) can tell
//! them apart after they have been folded into an `anyhow::Error`.

use std::fmt;

use crate::pipeline::StageKind;

/// The host could not provide a window/surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceCreationError {
    pub message: String,
}

impl SurfaceCreationError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for SurfaceCreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface creation failed: {}", self.message)
    }
}

impl std::error::Error for SurfaceCreationError {}

/// The graphics device could not be brought up (instance, surface, adapter or
/// logical device acquisition failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLoadError {
    pub message: String,
}

impl DeviceLoadError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for DeviceLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device load failed: {}", self.message)
    }
}

impl std::error::Error for DeviceLoadError {}

/// A shader stage failed to compile. `log` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub stage: StageKind,
    pub log: String,
}

impl CompileError {
    pub(crate) fn new(stage: StageKind, log: impl Into<String>) -> Self {
        let mut log = log.into();
        if log.trim().is_empty() {
            log = "compiler reported failure without a diagnostic".to_string();
        }
        Self { stage, log }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage compilation failed:\n{}", self.stage, self.log)
    }
}

impl std::error::Error for CompileError {}

/// Two stages could not be linked into a program. `log` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkError {
    pub log: String,
}

impl LinkError {
    pub(crate) fn new(log: impl Into<String>) -> Self {
        let mut log = log.into();
        if log.trim().is_empty() {
            log = "linker reported failure without a diagnostic".to_string();
        }
        Self { log }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program linking failed:\n{}", self.log)
    }
}

impl std::error::Error for LinkError {}

/// A frame could not be presented and rendering cannot continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameError {
    pub message: String,
}

impl FrameError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame presentation failed: {}", self.message)
    }
}

impl std::error::Error for FrameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage() {
        let e = CompileError::new(StageKind::Fragment, "1:5: unknown identifier");
        assert_eq!(
            e.to_string(),
            "fragment stage compilation failed:\n1:5: unknown identifier"
        );
    }

    #[test]
    fn empty_diagnostics_are_replaced() {
        assert!(!CompileError::new(StageKind::Vertex, "  ").log.trim().is_empty());
        assert!(!LinkError::new("").log.is_empty());
    }
}

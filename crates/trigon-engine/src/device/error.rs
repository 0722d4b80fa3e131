/// How `Gpu::present` reacts to a failed image acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated: the surface configuration was re-applied and this
    /// iteration is counted as skipped.
    Reconfigured,
    /// Timed out or otherwise transient: this iteration is counted as skipped.
    SkipFrame,
    /// Out of memory: `present` returns a `FrameError` and the loop ends.
    Fatal,
}

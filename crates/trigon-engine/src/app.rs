//! Startup, render loop, shutdown.
//!
//! The whole program is one linear sequence:
//! surface → device → geometry → stages → program → loop → release.
//! Every failure before the loop is fatal and returned to the caller;
//! resources acquired up to that point are released on the way out.

use anyhow::{Context, Result};

use crate::device::{Device, Gpu, GpuInit};
use crate::frame::{ClearColor, FrameLoop, LoopReport};
use crate::geometry::{GeometryBuffer, TRIANGLE};
use crate::host::{SurfaceConfig, SurfaceProvider, WinitSurface};
use crate::pipeline::{self, ShaderSources, StageKind};

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub gpu: GpuInit,
    pub clear_color: ClearColor,
    pub shaders: ShaderSources,
}

/// Opens the window, loads the device and renders until the window is closed.
pub fn run(config: AppConfig) -> Result<LoopReport> {
    let mut surface = WinitSurface::create(&config.surface).context("failed to open the window")?;

    let mut gpu = pollster::block_on(Gpu::new(surface.window(), config.gpu.clone()))
        .context("failed to load the graphics device")?;

    // `gpu` is declared after `surface`, so it is dropped first.
    run_on(&mut surface, &mut gpu, &config)
}

/// Builds the geometry and the program on `device`, then runs the frame loop
/// against `surface`.
pub fn run_on<S, D>(surface: &mut S, device: &mut D, config: &AppConfig) -> Result<LoopReport>
where
    S: SurfaceProvider,
    D: Device,
{
    let geometry = GeometryBuffer::create(device, "trigon triangle vbo", &TRIANGLE);

    let vertex = pipeline::compile(StageKind::Vertex, config.shaders.vertex)?;
    let fragment = pipeline::compile(StageKind::Fragment, config.shaders.fragment)?;
    let program = pipeline::link(device, vertex, fragment, *geometry.layout())?;
    log::info!("pipeline ready");

    let report = FrameLoop::new(config.clear_color).run(surface, device, &program, &geometry)?;

    drop(geometry);
    drop(program);
    log::info!(
        "shut down after {} frames ({} skipped)",
        report.frames,
        report.skipped
    );

    Ok(report)
}

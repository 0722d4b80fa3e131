use std::fmt;

use wgpu::naga;
use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::CompileError;

/// Which programmable stage a unit belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    #[inline]
    pub(crate) fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        })
    }
}

/// A single compiled and validated shader stage, not yet linked.
///
/// Consumed by [`link`](super::link); nothing else can use it.
#[derive(Debug)]
pub struct StageUnit {
    kind: StageKind,
    module: naga::Module,
}

impl StageUnit {
    #[inline]
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Validated IR, entry point `main`.
    #[inline]
    pub fn module(&self) -> &naga::Module {
        &self.module
    }
}

/// Compiles one GLSL stage.
///
/// Parse → validate → status. The diagnostic string is only rendered when a
/// step fails; the success path allocates none.
pub fn compile(kind: StageKind, source: &str) -> Result<StageUnit, CompileError> {
    let mut frontend = glsl::Frontend::default();
    let module = frontend
        .parse(&glsl::Options::from(kind.naga_stage()), source)
        .map_err(|errors| CompileError::new(kind, parse_log(&errors, source)))?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::empty());
    if let Err(err) = validator.validate(&module) {
        // `{:#}` walks the source chain, which is where naga puts the detail.
        let log = format!("{:#}", anyhow::Error::new(err.into_inner()));
        return Err(CompileError::new(kind, log));
    }

    log::debug!("{kind} stage compiled ({} entry points)", module.entry_points.len());

    Ok(StageUnit { kind, module })
}

fn parse_log(errors: &glsl::ParseErrors, source: &str) -> String {
    errors
        .errors
        .iter()
        .map(|e| {
            let loc = e.meta.location(source);
            format!("{}:{}: {}", loc.line_number, loc.line_position, e.kind)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

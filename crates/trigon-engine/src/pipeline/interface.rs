//! Stage interface reflection used by the linker.

use wgpu::naga;
use wgpu::naga::{Binding, Handle, ScalarKind, Type, TypeInner};

/// One user-defined input or output of a stage entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Varying {
    pub location: u32,
    pub components: u32,
    pub kind: ScalarKind,
}

#[derive(Debug, Default)]
pub(crate) struct StageInterface {
    pub inputs: Vec<Varying>,
    pub outputs: Vec<Varying>,
}

impl StageInterface {
    pub fn output_at(&self, location: u32) -> Option<&Varying> {
        self.outputs.iter().find(|v| v.location == location)
    }
}

/// Collects the location-bound inputs and outputs of the first entry point
/// for `stage`. Built-ins (`gl_Position`, ...) are skipped.
///
/// Returns `None` if the module has no entry point for that stage.
pub(crate) fn reflect(module: &naga::Module, stage: naga::ShaderStage) -> Option<StageInterface> {
    let entry = module.entry_points.iter().find(|ep| ep.stage == stage)?;
    let mut iface = StageInterface::default();

    for arg in &entry.function.arguments {
        collect(module, arg.ty, arg.binding.as_ref(), &mut iface.inputs);
    }
    if let Some(result) = &entry.function.result {
        collect(module, result.ty, result.binding.as_ref(), &mut iface.outputs);
    }

    Some(iface)
}

fn collect(module: &naga::Module, ty: Handle<Type>, binding: Option<&Binding>, out: &mut Vec<Varying>) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => {
            if let Some((components, kind)) = shape(inner) {
                out.push(Varying {
                    location: *location,
                    components,
                    kind,
                });
            }
        }
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn shape(inner: &TypeInner) -> Option<(u32, ScalarKind)> {
    match inner {
        TypeInner::Scalar(scalar) => Some((1, scalar.kind)),
        TypeInner::Vector { size, scalar } => Some((*size as u32, scalar.kind)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{compile, StageKind, FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE};

    #[test]
    fn vertex_stage_reads_vec3_at_location_zero() {
        let unit = compile(StageKind::Vertex, VERTEX_SHADER_SOURCE).unwrap();
        let iface = reflect(unit.module(), naga::ShaderStage::Vertex).unwrap();

        assert_eq!(
            iface.inputs,
            vec![Varying { location: 0, components: 3, kind: ScalarKind::Float }]
        );
        // Only gl_Position is written, and built-ins are skipped.
        assert!(iface.outputs.is_empty());
    }

    #[test]
    fn fragment_stage_writes_vec4_at_location_zero() {
        let unit = compile(StageKind::Fragment, FRAGMENT_SHADER_SOURCE).unwrap();
        let iface = reflect(unit.module(), naga::ShaderStage::Fragment).unwrap();

        assert!(iface.inputs.is_empty());
        assert_eq!(
            iface.output_at(0),
            Some(&Varying { location: 0, components: 4, kind: ScalarKind::Float })
        );
    }

    #[test]
    fn wrong_stage_has_no_interface() {
        let unit = compile(StageKind::Fragment, FRAGMENT_SHADER_SOURCE).unwrap();
        assert!(reflect(unit.module(), naga::ShaderStage::Vertex).is_none());
    }
}

use wgpu::naga::ScalarKind;

use crate::device::Device;
use crate::error::LinkError;
use crate::geometry::{ComponentType, VertexLayout};

use super::interface::{reflect, StageInterface};
use super::stage::{StageKind, StageUnit};

/// A linked, drawable pipeline program.
///
/// Only [`link`] produces one, so holding a `Program` means both stages
/// compiled and linked. The device program is released on drop.
pub struct Program<D: Device> {
    handle: D::Program,
    layout: VertexLayout,
}

impl<D: Device> Program<D> {
    /// Vertex layout the program was linked against.
    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn handle(&self) -> &D::Program {
        &self.handle
    }
}

impl<D: Device> Drop for Program<D> {
    fn drop(&mut self) {
        log::debug!("releasing pipeline program");
    }
}

/// Links a vertex and a fragment stage into a program.
///
/// The stage interfaces are checked against each other and against `layout`
/// before the device builds anything. Both stage units are consumed: they are
/// released here whether linking succeeds or not.
pub fn link<D: Device>(
    device: &mut D,
    vertex: StageUnit,
    fragment: StageUnit,
    layout: VertexLayout,
) -> Result<Program<D>, LinkError> {
    let problems = check_interfaces(&vertex, &fragment, &layout);
    if !problems.is_empty() {
        return Err(LinkError::new(problems.join("\n")));
    }

    let handle = device.create_program(&vertex, &fragment, &layout)?;
    log::debug!("program linked; stage units released");

    Ok(Program { handle, layout })
}

fn check_interfaces(vertex: &StageUnit, fragment: &StageUnit, layout: &VertexLayout) -> Vec<String> {
    let mut problems = Vec::new();

    if vertex.kind() != StageKind::Vertex {
        problems.push(format!("expected a vertex stage, got a {} stage", vertex.kind()));
    }
    if fragment.kind() != StageKind::Fragment {
        problems.push(format!("expected a fragment stage, got a {} stage", fragment.kind()));
    }
    if !problems.is_empty() {
        return problems;
    }

    let Some(vs) = reflect(vertex.module(), StageKind::Vertex.naga_stage()) else {
        problems.push("vertex stage has no vertex entry point".to_string());
        return problems;
    };
    let Some(fs) = reflect(fragment.module(), StageKind::Fragment.naga_stage()) else {
        problems.push("fragment stage has no fragment entry point".to_string());
        return problems;
    };

    check_vertex_inputs(&vs, layout, &mut problems);
    check_varyings(&vs, &fs, &mut problems);

    check_color_outputs(&fs, &mut problems);

    problems
}

/// The pipeline has a single floating-point color target at location 0.
fn check_color_outputs(fs: &StageInterface, problems: &mut Vec<String>) {
    if fs.outputs.is_empty() {
        problems.push("fragment stage writes no color output".to_string());
        return;
    }

    for output in &fs.outputs {
        if output.location != 0 {
            problems.push(format!(
                "fragment output at location {} has no color target",
                output.location
            ));
        } else if output.kind != ScalarKind::Float {
            problems.push(format!(
                "fragment output at location 0 is {:?}, the color target expects Float",
                output.kind
            ));
        }
    }
}

fn check_vertex_inputs(vs: &StageInterface, layout: &VertexLayout, problems: &mut Vec<String>) {
    let fed_kind = match layout.component_type {
        ComponentType::Float32 => ScalarKind::Float,
    };

    for input in &vs.inputs {
        if input.location != layout.attribute_index {
            problems.push(format!(
                "vertex input at location {} is not fed by the vertex layout (attribute {})",
                input.location, layout.attribute_index
            ));
        } else if input.components != layout.components || input.kind != fed_kind {
            problems.push(format!(
                "vertex input at location {} expects {} x {:?}, layout provides {} x {:?}",
                input.location, input.components, input.kind, layout.components, layout.component_type
            ));
        }
    }
}

fn check_varyings(vs: &StageInterface, fs: &StageInterface, problems: &mut Vec<String>) {
    for input in &fs.inputs {
        match vs.output_at(input.location) {
            None => problems.push(format!(
                "fragment input at location {} is not written by the vertex stage",
                input.location
            )),
            Some(out) if out.components != input.components || out.kind != input.kind => {
                problems.push(format!(
                    "fragment input at location {} expects {} x {:?}, vertex stage writes {} x {:?}",
                    input.location, input.components, input.kind, out.components, out.kind
                ))
            }
            Some(_) => {}
        }
    }
}

//! Interface contract between the host and the shader files.
//!
//! The host feeds exactly one vertex attribute and one uniform block, so the
//! stages must agree with that layout:
//!
//! - vertex stage: a float vector input at `location = 0` and nothing else;
//! - fragment stage: a uniform block at `set = 0, binding = 0` holding
//!   `float winWidth` at offset 0 and `float winHeight` at offset 4.
//!
//! The check runs on naga IR as part of linking, before anything reaches the
//! GPU, so a mismatch is reported as a link failure with a readable message.
use thiserror::Error;
use wgpu::naga;

use crate::compile::CompiledStage;

/// Vertex input location carrying the quad corners.
pub const POSITION_LOCATION: u32 = 0;
/// Bind group holding the window uniforms.
pub const UNIFORM_GROUP: u32 = 0;
/// Binding of the window uniforms inside [`UNIFORM_GROUP`].
pub const UNIFORM_BINDING: u32 = 0;
/// Uniform carrying the window width.
pub const WIDTH_UNIFORM: &str = "winWidth";
/// Uniform carrying the window height.
pub const HEIGHT_UNIFORM: &str = "winHeight";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("no vertex entry point")]
    MissingVertexEntry,

    #[error("no fragment entry point")]
    MissingFragmentEntry,

    #[error("vertex stage does not read a position at location 0")]
    MissingPosition,

    #[error("vertex input at location 0 must be a float vector")]
    PositionType,

    #[error("vertex stage reads location {0}, but only location 0 is provided")]
    UnexpectedVertexInput(u32),

    #[error("fragment stage declares no uniform block at set = 0, binding = 0")]
    MissingUniformBlock,

    #[error("uniform `{0}` is missing from the window block")]
    MissingUniform(&'static str),

    #[error("uniform `{name}` must be a float at offset {expected}, found offset {found}")]
    UniformLayout {
        name: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("uniform `{0}` must be declared as float")]
    UniformType(&'static str),
}

/// Checks that a vertex/fragment pair matches what the host provides.
pub fn validate(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<(), ContractError> {
    validate_vertex(&vertex.module)?;
    validate_fragment(&fragment.module)
}

fn validate_vertex(module: &naga::Module) -> Result<(), ContractError> {
    let entry = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == naga::ShaderStage::Vertex)
        .ok_or(ContractError::MissingVertexEntry)?;

    let mut position = None;
    for argument in &entry.function.arguments {
        let Some(naga::Binding::Location { location, .. }) = argument.binding else {
            continue;
        };
        if location != POSITION_LOCATION {
            return Err(ContractError::UnexpectedVertexInput(location));
        }
        position = Some(argument.ty);
    }

    let ty = position.ok_or(ContractError::MissingPosition)?;
    match module.types[ty].inner {
        naga::TypeInner::Vector { scalar, .. } if scalar.kind == naga::ScalarKind::Float => Ok(()),
        _ => Err(ContractError::PositionType),
    }
}

fn validate_fragment(module: &naga::Module) -> Result<(), ContractError> {
    if !module
        .entry_points
        .iter()
        .any(|entry| entry.stage == naga::ShaderStage::Fragment)
    {
        return Err(ContractError::MissingFragmentEntry);
    }

    let block = module
        .global_variables
        .iter()
        .map(|(_, var)| var)
        .find(|var| {
            var.space == naga::AddressSpace::Uniform
                && var.binding
                    == Some(naga::ResourceBinding {
                        group: UNIFORM_GROUP,
                        binding: UNIFORM_BINDING,
                    })
        })
        .ok_or(ContractError::MissingUniformBlock)?;

    let naga::TypeInner::Struct { ref members, .. } = module.types[block.ty].inner else {
        return Err(ContractError::MissingUniformBlock);
    };

    for (name, expected) in [(WIDTH_UNIFORM, 0), (HEIGHT_UNIFORM, 4)] {
        let member = members
            .iter()
            .find(|member| member.name.as_deref() == Some(name))
            .ok_or(ContractError::MissingUniform(name))?;
        if !matches!(module.types[member.ty].inner, naga::TypeInner::Scalar(scalar) if scalar == naga::Scalar::F32)
        {
            return Err(ContractError::UniformType(name));
        }
        if member.offset != expected {
            return Err(ContractError::UniformLayout {
                name,
                expected,
                found: member.offset,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::compile::{compile_stage, fallback_stage};
    use crate::loader::ShaderSource;
    use crate::types::StageKind;

    fn compile(stage: StageKind, text: &str) -> CompiledStage {
        compile_stage(&ShaderSource {
            stage,
            path: PathBuf::from("contract.glsl"),
            text: text.to_string(),
            missing: false,
        })
        .unwrap()
    }

    fn fragment_with(declarations: &str) -> CompiledStage {
        let text = format!(
            "#version 450\n{declarations}\nlayout(location = 0) out vec4 color;\nvoid main() {{ color = vec4(1.0); }}\n"
        );
        compile(StageKind::Fragment, &text)
    }

    #[test]
    fn fallback_pair_satisfies_contract() {
        let vertex = fallback_stage(StageKind::Vertex).unwrap();
        let fragment = fallback_stage(StageKind::Fragment).unwrap();
        assert_eq!(validate(&vertex, &fragment), Ok(()));
    }

    #[test]
    fn loose_gl_uniforms_satisfy_contract() {
        let vertex = fallback_stage(StageKind::Vertex).unwrap();
        let fragment = fragment_with("uniform float winWidth;\nuniform float winHeight;");
        assert_eq!(validate(&vertex, &fragment), Ok(()));
    }

    #[test]
    fn fragment_without_uniforms_is_rejected() {
        let vertex = fallback_stage(StageKind::Vertex).unwrap();
        let fragment = fragment_with("");
        assert_eq!(
            validate(&vertex, &fragment),
            Err(ContractError::MissingUniformBlock)
        );
    }

    #[test]
    fn swapped_uniform_offsets_are_rejected() {
        let vertex = fallback_stage(StageKind::Vertex).unwrap();
        let fragment = fragment_with(
            "layout(std140, set = 0, binding = 0) uniform WindowParams { float winHeight; float winWidth; };",
        );
        assert_eq!(
            validate(&vertex, &fragment),
            Err(ContractError::UniformLayout {
                name: WIDTH_UNIFORM,
                expected: 0,
                found: 4,
            })
        );
    }

    #[test]
    fn vertex_input_at_other_location_is_rejected() {
        let vertex = compile(
            StageKind::Vertex,
            "#version 450\nlayout(location = 1) in vec2 position;\nvoid main() { gl_Position = vec4(position, 0.0, 1.0); }\n",
        );
        let fragment = fallback_stage(StageKind::Fragment).unwrap();
        assert_eq!(
            validate(&vertex, &fragment),
            Err(ContractError::UnexpectedVertexInput(1))
        );
    }

    #[test]
    fn integer_position_is_rejected() {
        let vertex = compile(
            StageKind::Vertex,
            "#version 450\nlayout(location = 0) in ivec2 position;\nvoid main() { gl_Position = vec4(vec2(position), 0.0, 1.0); }\n",
        );
        let fragment = fallback_stage(StageKind::Fragment).unwrap();
        assert_eq!(validate(&vertex, &fragment), Err(ContractError::PositionType));
    }

    #[test]
    fn vec4_position_is_accepted() {
        let vertex = compile(
            StageKind::Vertex,
            "#version 450\nlayout(location = 0) in vec4 position;\nvoid main() { gl_Position = position; }\n",
        );
        let fragment = fallback_stage(StageKind::Fragment).unwrap();
        assert_eq!(validate(&vertex, &fragment), Ok(()));
    }
}

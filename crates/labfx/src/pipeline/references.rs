//! Cross-reference checking
//!
//! The parser records references between blocks as plain names and never resolves
//! them. Consumers that want to reject dangling references before building GPU
//! resources can call `PipelineDescription::unresolved_references`.

use super::PipelineDescription;
use std::fmt;

/// A name used by a pass that does not resolve to a declared block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReference {
    /// The pass's shader is not declared (pass, shader)
    Shader(String, String),
    /// The pass's output buffer is not declared (pass, buffer)
    OutputBuffer(String, String),
    /// An output texture is not an attachment of the output buffer (pass, texture)
    OutputTexture(String, String),
    /// An input buffer is not declared (pass, buffer)
    InputBuffer(String, String),
    /// An input texture is not an attachment of its buffer (pass, buffer, texture)
    InputTexture(String, String, String),
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shader(pass, shader) => write!(f, "Pass '{pass}' uses undeclared shader '{shader}'"),
            Self::OutputBuffer(pass, buffer) => write!(f, "Pass '{pass}' writes undeclared buffer '{buffer}'"),
            Self::OutputTexture(pass, texture) => {
                write!(f, "Pass '{pass}' writes texture '{texture}' which is not attached to its output buffer")
            }
            Self::InputBuffer(pass, buffer) => write!(f, "Pass '{pass}' reads undeclared buffer '{buffer}'"),
            Self::InputTexture(pass, buffer, texture) => {
                write!(f, "Pass '{pass}' reads '{buffer}.{texture}' which is not attached to buffer '{buffer}'")
            }
        }
    }
}

impl PipelineDescription {
    /// Lists every pass reference that does not resolve, in pass order
    ///
    /// An empty shader name or output buffer means the pass did not declare one and
    /// is not reported.
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut unresolved = Vec::new();

        for pass in &self.passes {
            if !pass.shader.is_empty() && self.find_shader(&pass.shader).is_none() {
                unresolved.push(UnresolvedReference::Shader(pass.name.clone(), pass.shader.clone()));
            }

            for input in &pass.input_textures {
                match self.find_buffer(&input.buffer) {
                    None => unresolved.push(UnresolvedReference::InputBuffer(pass.name.clone(), input.buffer.clone())),
                    Some(buffer) if buffer.attachment(&input.texture).is_none() => {
                        unresolved.push(UnresolvedReference::InputTexture(pass.name.clone(), input.buffer.clone(), input.texture.clone()));
                    }
                    Some(_) => {}
                }
            }

            if pass.output_buffer.is_empty() {
                continue;
            }
            match self.find_buffer(&pass.output_buffer) {
                None => unresolved.push(UnresolvedReference::OutputBuffer(pass.name.clone(), pass.output_buffer.clone())),
                Some(buffer) => {
                    for texture in &pass.output_textures {
                        if buffer.attachment(texture).is_none() {
                            unresolved.push(UnresolvedReference::OutputTexture(pass.name.clone(), texture.clone()));
                        }
                    }
                }
            }
        }

        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Buffer, InputTexture, Pass, Shader, Texture};

    fn description() -> PipelineDescription {
        PipelineDescription {
            buffers: vec![Buffer {
                name: "gbuffer".to_string(),
                has_depth: true,
                textures: vec![Texture::new("color")],
            }],
            shaders: vec![Shader {
                name: "lighting".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolved_pass() {
        let mut description = description();
        description.passes.push(Pass {
            name: "light".to_string(),
            shader: "lighting".to_string(),
            input_textures: vec![InputTexture {
                buffer: "gbuffer".to_string(),
                texture: "color".to_string(),
            }],
            output_buffer: "gbuffer".to_string(),
            output_textures: vec!["color".to_string()],
            ..Default::default()
        });

        assert!(description.unresolved_references().is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let mut description = description();
        description.passes.push(Pass {
            name: "light".to_string(),
            shader: "missing".to_string(),
            input_textures: vec![
                InputTexture {
                    buffer: "gbuffer".to_string(),
                    texture: "normal".to_string(),
                },
                InputTexture {
                    buffer: "shadow".to_string(),
                    texture: "depth".to_string(),
                },
            ],
            output_buffer: "lbuffer".to_string(),
            output_textures: vec!["color".to_string()],
            ..Default::default()
        });

        let unresolved = description.unresolved_references();
        assert_eq!(
            unresolved,
            vec![
                UnresolvedReference::Shader("light".to_string(), "missing".to_string()),
                UnresolvedReference::InputTexture("light".to_string(), "gbuffer".to_string(), "normal".to_string()),
                UnresolvedReference::InputBuffer("light".to_string(), "shadow".to_string()),
                UnresolvedReference::OutputBuffer("light".to_string(), "lbuffer".to_string()),
            ]
        );
        assert_eq!(unresolved[0].to_string(), "Pass 'light' uses undeclared shader 'missing'");
    }

    #[test]
    fn test_unattached_output_texture() {
        let mut description = description();
        description.passes.push(Pass {
            name: "geometry".to_string(),
            output_buffer: "gbuffer".to_string(),
            output_textures: vec!["color".to_string(), "depth".to_string()],
            ..Default::default()
        });

        assert_eq!(
            description.unresolved_references(),
            vec![UnresolvedReference::OutputTexture("geometry".to_string(), "depth".to_string())]
        );
    }
}

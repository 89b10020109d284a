//! Shader source generation
//!
//! Turns each parsed shader into a vertex and a fragment source by prefixing the
//! user-written body with a version header, attribute declarations with explicit
//! locations, uniform declarations and a varying interface block.

use crate::pipeline::{PipelineDescription, Shader, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Options controlling the generated preamble
///
/// Every field has a default, so a YAML file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// First line of every generated source
    pub version_header: String,
    /// Block name of the varying interface block
    pub interface_block: String,
    /// Instance name of the varying interface block
    pub interface_instance: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version_header: "#version 410".to_string(),
            interface_block: "Var".to_string(),
            interface_instance: "var".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a generator configuration from YAML content
    ///
    /// # Arguments
    /// * `yaml_content` - YAML mapping with any subset of the configuration fields
    pub fn from_yaml(yaml_content: &str) -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(yaml_content)
    }

    /// Parses a generator configuration from a YAML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }
}

/// Final sources of one shader, ready for a shading-language compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedShader {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
}

/// Direction of the varying interface block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterfaceDirection {
    Out,
    In,
}

/// Generates shader sources from parsed shader declarations
#[derive(Debug, Clone, Default)]
pub struct ShaderGenerator {
    config: GeneratorConfig,
}

impl ShaderGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates sources for every shader of a description, in declaration order
    pub fn generate(&self, description: &PipelineDescription) -> Vec<GeneratedShader> {
        description.shaders.iter().map(|shader| self.generate_shader(shader)).collect()
    }

    /// Generates the vertex and fragment sources of a single shader
    ///
    /// Attributes are declared in the vertex stage only, with their position in the
    /// attribute list as the location. Uniforms are declared identically in both
    /// stages. Automatic bindings do not change the emitted declarations. Types that
    /// did not resolve are written as `unknown` and left for the shader compiler to
    /// reject.
    pub fn generate_shader(&self, shader: &Shader) -> GeneratedShader {
        let mut vertex_source = self.preamble();
        for (location, attribute) in shader.attributes.iter().enumerate() {
            let _ = writeln!(vertex_source, "layout(location = {location}) in {} {};", attribute.ty, attribute.name);
        }
        self.write_uniforms(&mut vertex_source, &shader.uniforms);
        self.write_interface_block(&mut vertex_source, &shader.varyings, InterfaceDirection::Out);
        vertex_source.push_str(&shader.vsh_source);

        let mut fragment_source = self.preamble();
        self.write_uniforms(&mut fragment_source, &shader.uniforms);
        self.write_interface_block(&mut fragment_source, &shader.varyings, InterfaceDirection::In);
        fragment_source.push_str(&shader.fsh_source);

        tracing::trace!(shader = %shader.name, vertex_len = vertex_source.len(), fragment_len = fragment_source.len(), "generated shader");

        GeneratedShader {
            name: shader.name.clone(),
            vertex_source,
            fragment_source,
        }
    }

    fn preamble(&self) -> String {
        format!("{}\n", self.config.version_header)
    }

    fn write_uniforms(&self, source: &mut String, uniforms: &[Uniform]) {
        for uniform in uniforms {
            let _ = writeln!(source, "uniform {} {};", uniform.ty, uniform.name);
        }
    }

    fn write_interface_block(&self, source: &mut String, varyings: &[Uniform], direction: InterfaceDirection) {
        if varyings.is_empty() {
            return;
        }

        let keyword = match direction {
            InterfaceDirection::Out => "out",
            InterfaceDirection::In => "in",
        };
        let _ = writeln!(source, "{keyword} {} {{", self.config.interface_block);
        for varying in varyings {
            let _ = writeln!(source, "    {} {};", varying.ty, varying.name);
        }
        let _ = writeln!(source, "}} {};", self.config.interface_instance);
    }
}

/// Generates sources for every shader with the default configuration
pub fn generate(description: &PipelineDescription) -> Vec<GeneratedShader> {
    ShaderGenerator::default().generate(description)
}

//! LabFx render pipeline descriptions
//!
//! This crate parses `.labfx` pipeline descriptions, a textual format declaring
//! offscreen buffers, render passes, standalone textures and shader programs, into
//! an owned pipeline graph, and synthesizes complete vertex/fragment shader sources
//! from the shader bodies embedded in the description.
//!
//! ```text
//! name: deferred
//! buffer: gbuffer
//!     has depth: yes
//!     textures: [ color, f32x4 ]
//! pass: lighting
//!     shader: deferred-lighting
//!     inputs: [gbuffer.color]
//!     outputs: lbuffer [ color ]
//! ```

mod scanner;
mod semantic_type;
mod token;

pub mod generator;
pub mod parser;
pub mod pipeline;

pub use generator::{GeneratedShader, GeneratorConfig, ShaderGenerator, generate};
pub use parser::{ParseError, Parser};
pub use pipeline::PipelineDescription;
pub use semantic_type::SemanticType;
pub use token::Token;

/// Parses a pipeline description
///
/// On failure the diagnostic is logged through `tracing` and the error is returned;
/// a partially parsed description is never surfaced.
///
/// # Arguments
/// * `source` - Complete text of one description
pub fn parse_pipeline(source: &str) -> Result<PipelineDescription, ParseError> {
    Parser::new(source).parse().inspect_err(|e| {
        tracing::error!("Error parsing pipeline description: {e}");
    })
}

/// Reads and parses a pipeline description file
///
/// # Arguments
/// * `path` - Path to a `.labfx` file
pub fn parse_pipeline_file<P: AsRef<std::path::Path>>(path: P) -> Result<PipelineDescription, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).inspect_err(|e| {
        tracing::error!("Error reading file {path:?}: {e}");
    })?;
    Ok(parse_pipeline(&source)?)
}

/// Parses a description and generates the sources of all its shaders
///
/// # Returns
/// The parsed description together with one `GeneratedShader` per declared shader
pub fn compile(source: &str, config: &GeneratorConfig) -> Result<(PipelineDescription, Vec<GeneratedShader>), ParseError> {
    let description = parse_pipeline(source)?;
    let shaders = ShaderGenerator::new(config.clone()).generate(&description);
    Ok((description, shaders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{DepthTestMode, InputTexture, PassDrawMode, TextureType};

    const DEFERRED: &str = include_str!("../fixtures/deferred.labfx");

    #[test]
    fn test_deferred_fixture() {
        let description = parse_pipeline(DEFERRED).unwrap();
        assert_eq!(description.name, "deferred");
        assert_eq!(description.version, "1.0");

        let gbuffer = description.find_buffer("gbuffer").unwrap();
        assert!(gbuffer.has_depth);
        let formats: Vec<_> = gbuffer.textures.iter().map(|t| (t.name.as_str(), t.format)).collect();
        assert_eq!(formats, [("diffuse", TextureType::U8x4), ("position", TextureType::F16x4), ("normal", TextureType::F16x4)]);

        let lbuffer = description.find_buffer("lbuffer").unwrap();
        assert!(!lbuffer.has_depth);
        assert_eq!(lbuffer.textures[0].scale, 0.5);

        let passes: Vec<_> = description.passes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(passes, ["geometry", "lighting"]);

        let geometry = description.find_pass("geometry").unwrap();
        assert_eq!(geometry.draw, PassDrawMode::OpaqueGeometry);
        assert!(geometry.clear_depth && geometry.write_depth && geometry.clear_outputs);
        assert_eq!(geometry.depth_test, DepthTestMode::Less);
        assert_eq!(geometry.output_textures.len(), 3);

        let lighting = description.find_pass("lighting").unwrap();
        assert_eq!(lighting.shader, "deferred-lighting");
        assert_eq!(lighting.input_textures[1], InputTexture {
            buffer: "gbuffer".to_string(),
            texture: "normal".to_string(),
        });

        assert_eq!(description.find_texture("noise").unwrap().path.as_deref(), Some("textures/noise.png"));
        assert!(description.unresolved_references().is_empty());
    }

    #[test]
    fn test_compile_fixture() {
        let (description, shaders) = compile(DEFERRED, &GeneratorConfig::default()).unwrap();
        assert_eq!(shaders.len(), description.shaders.len());

        let geometry = &shaders[0];
        assert_eq!(geometry.name, "deferred-geometry");
        let position = geometry.vertex_source.find("layout(location = 0) in vec3 a_position;").unwrap();
        let normal = geometry.vertex_source.find("layout(location = 1) in vec3 a_normal;").unwrap();
        assert!(position < normal);
        assert!(geometry.vertex_source.contains("uniform mat4 u_modelViewProjection;\n"));
        assert!(geometry.fragment_source.contains("in Var {\n    vec3 v_normal;\n} var;\n"));
        assert!(!geometry.fragment_source.contains("a_position"));
        assert!(geometry.fragment_source.ends_with("}\n"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let first = compile(DEFERRED, &GeneratorConfig::default()).unwrap();
        let second = compile(DEFERRED, &GeneratorConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_automatic_uniform_keeps_plain_declaration() {
        let source = "shader: s\n    uniforms: [u: mat4 <- viewProjection]\n";
        let (description, shaders) = compile(source, &GeneratorConfig::default()).unwrap();
        assert_eq!(description.shaders[0].uniforms[0].automatic, "viewProjection");
        assert!(shaders[0].vertex_source.contains("uniform mat4 u;\n"));
        assert!(!shaders[0].vertex_source.contains("viewProjection"));
    }

    #[test]
    fn test_failed_parse_returns_no_description() {
        let source = format!("{DEFERRED}\nbuffer: broken\n    has depth: maybe\n");
        assert!(matches!(parse_pipeline(&source), Err(ParseError::MalformedBoolean { .. })));
        assert!(compile(&source, &GeneratorConfig::default()).is_err());
    }

    #[test]
    fn test_parse_pipeline_file_reports_missing_file() {
        assert!(parse_pipeline_file("does/not/exist.labfx").is_err());
    }
}

//! Pipeline description model
//!
//! The parser's output: a single owned tree of buffers, passes, shaders and
//! standalone textures. Declaration order is preserved everywhere because passes
//! execute in declared order and attribute order decides binding locations.

use crate::SemanticType;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Error returned when a literal does not name a member of one of the closed enums
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} `{literal}`")]
pub struct LiteralParseError {
    /// What was being parsed, e.g. "texture format"
    pub kind: &'static str,
    /// The rejected text
    pub literal: String,
}

impl LiteralParseError {
    fn new(kind: &'static str, literal: &str) -> Self {
        Self { kind, literal: literal.to_string() }
    }
}

/// Texel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureType {
    #[default]
    None,
    F32x1,
    F32x2,
    F32x3,
    F32x4,
    F16x1,
    F16x2,
    F16x3,
    F16x4,
    U8x1,
    U8x2,
    U8x3,
    U8x4,
    S8x1,
    S8x2,
    S8x3,
    S8x4,
}

const TEXTURE_TYPE_NAMES: &[(TextureType, &str)] = &[
    (TextureType::None, "none"),
    (TextureType::F32x1, "f32x1"),
    (TextureType::F32x2, "f32x2"),
    (TextureType::F32x3, "f32x3"),
    (TextureType::F32x4, "f32x4"),
    (TextureType::F16x1, "f16x1"),
    (TextureType::F16x2, "f16x2"),
    (TextureType::F16x3, "f16x3"),
    (TextureType::F16x4, "f16x4"),
    (TextureType::U8x1, "u8x1"),
    (TextureType::U8x2, "u8x2"),
    (TextureType::U8x3, "u8x3"),
    (TextureType::U8x4, "u8x4"),
    (TextureType::S8x1, "s8x1"),
    (TextureType::S8x2, "s8x2"),
    (TextureType::S8x3, "s8x3"),
    (TextureType::S8x4, "s8x4"),
];

impl TextureType {
    /// Number of channels per texel, 0 for `none`
    pub fn components(self) -> u32 {
        use TextureType::*;
        match self {
            None => 0,
            F32x1 | F16x1 | U8x1 | S8x1 => 1,
            F32x2 | F16x2 | U8x2 | S8x2 => 2,
            F32x3 | F16x3 | U8x3 | S8x3 => 3,
            F32x4 | F16x4 | U8x4 | S8x4 => 4,
        }
    }

    /// Size of one texel in bytes
    pub fn bytes_per_texel(self) -> u32 {
        use TextureType::*;
        let channel_size = match self {
            None => 0,
            F32x1 | F32x2 | F32x3 | F32x4 => 4,
            F16x1 | F16x2 | F16x3 | F16x4 => 2,
            U8x1 | U8x2 | U8x3 | U8x4 | S8x1 | S8x2 | S8x3 | S8x4 => 1,
        };
        channel_size * self.components()
    }

    fn name(self) -> &'static str {
        TEXTURE_TYPE_NAMES.iter().find(|(ty, _)| *ty == self).map_or("none", |(_, name)| *name)
    }
}

impl FromStr for TextureType {
    type Err = LiteralParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TEXTURE_TYPE_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(ty, _)| *ty)
            .ok_or_else(|| LiteralParseError::new("texture format", s))
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What geometry a pass draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassDrawMode {
    #[default]
    None,
    OpaqueGeometry,
    Quad,
}

impl FromStr for PassDrawMode {
    type Err = LiteralParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "opaque geometry" | "opaque_geometry" => Ok(Self::OpaqueGeometry),
            "quad" => Ok(Self::Quad),
            _ => Err(LiteralParseError::new("draw mode", s)),
        }
    }
}

/// Depth comparison used by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthTestMode {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

impl FromStr for DepthTestMode {
    type Err = LiteralParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(Self::Never),
            "less" => Ok(Self::Less),
            "equal" => Ok(Self::Equal),
            "lequal" | "less equal" => Ok(Self::LessEqual),
            "greater" => Ok(Self::Greater),
            "notequal" | "not equal" => Ok(Self::NotEqual),
            "gequal" | "greater equal" => Ok(Self::GreaterEqual),
            "always" => Ok(Self::Always),
            _ => Err(LiteralParseError::new("depth test", s)),
        }
    }
}

/// A texture: either a buffer attachment or a standalone asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Texture {
    pub name: String,
    pub format: TextureType,
    /// Size relative to the viewport
    pub scale: f32,
    /// Asset path, only set for standalone textures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Texture {
    /// Creates a texture with the default format and a scale of 1.0
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: TextureType::None,
            scale: 1.0,
            path: None,
        }
    }
}

/// A named offscreen render target
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Buffer {
    pub name: String,
    pub has_depth: bool,
    /// Color attachments in declaration order
    pub textures: Vec<Texture>,
}

impl Buffer {
    /// Finds an attachment by name
    pub fn attachment(&self, name: &str) -> Option<&Texture> {
        self.textures.iter().find(|texture| texture.name == name)
    }
}

/// A texture read by a pass, referenced as `buffer.texture`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputTexture {
    pub buffer: String,
    pub texture: String,
}

/// One rendering step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pass {
    pub name: String,
    /// Name of the shader, resolved by the consumer
    pub shader: String,
    pub draw: PassDrawMode,
    pub clear_depth: bool,
    pub write_depth: bool,
    pub clear_outputs: bool,
    pub depth_test: DepthTestMode,
    pub input_textures: Vec<InputTexture>,
    /// Name of the target buffer, empty when the pass has no outputs declared
    pub output_buffer: String,
    /// Attachments of the output buffer written by this pass
    pub output_textures: Vec<String>,
}

/// A typed shader variable: attribute, uniform or varying
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uniform {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    /// Engine-provided binding source declared with `<-`, empty if none
    pub automatic: String,
}

/// A vertex/fragment program pair with its declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Shader {
    pub name: String,
    pub vsh_source: String,
    pub fsh_source: String,
    /// Vertex inputs; the index is the binding location
    pub attributes: Vec<Uniform>,
    pub uniforms: Vec<Uniform>,
    pub varyings: Vec<Uniform>,
}

/// A complete parsed pipeline description
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineDescription {
    pub name: String,
    pub version: String,
    pub buffers: Vec<Buffer>,
    pub passes: Vec<Pass>,
    pub shaders: Vec<Shader>,
    pub textures: Vec<Texture>,
}

impl PipelineDescription {
    pub fn find_buffer(&self, name: &str) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.name == name)
    }

    pub fn find_pass(&self, name: &str) -> Option<&Pass> {
        self.passes.iter().find(|pass| pass.name == name)
    }

    pub fn find_shader(&self, name: &str) -> Option<&Shader> {
        self.shaders.iter().find(|shader| shader.name == name)
    }

    /// Finds a standalone texture; buffer attachments are reached through `find_buffer`
    pub fn find_texture(&self, name: &str) -> Option<&Texture> {
        self.textures.iter().find(|texture| texture.name == name)
    }
}

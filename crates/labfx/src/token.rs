//! Grammar keywords
//!
//! Both block-opening keywords (`buffer`, `pass`, ...) and in-block field keywords
//! (`draw`, `inputs`, ...) share one enumeration. The parser decides from its
//! current block which of them it accepts.

/// A keyword of the description language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Buffer,
    Pass,
    Shader,
    Texture,
    Name,
    Version,
    HasDepth,
    Textures,
    Draw,
    Inputs,
    Outputs,
    ClearDepth,
    WriteDepth,
    ClearOutputs,
    DepthTest,
    Attributes,
    Uniforms,
    Varying,
    VertexShader,
    FragmentShader,
    Source,
    Path,
    Format,
    Scale,
    /// Anything not in the keyword table
    Unknown,
}

/// Keyword spellings, scanned in order. `Token::Unknown` must stay last.
const TOKEN_TABLE: &[(&str, Token)] = &[
    ("buffer", Token::Buffer),
    ("pass", Token::Pass),
    ("shader", Token::Shader),
    ("texture", Token::Texture),
    ("name", Token::Name),
    ("version", Token::Version),
    ("has depth", Token::HasDepth),
    ("textures", Token::Textures),
    ("draw", Token::Draw),
    ("inputs", Token::Inputs),
    ("outputs", Token::Outputs),
    ("clear depth", Token::ClearDepth),
    ("write depth", Token::WriteDepth),
    ("clear outputs", Token::ClearOutputs),
    ("depth test", Token::DepthTest),
    ("attributes", Token::Attributes),
    ("uniforms", Token::Uniforms),
    ("varying", Token::Varying),
    ("vsh", Token::VertexShader),
    ("fsh", Token::FragmentShader),
    ("source", Token::Source),
    ("path", Token::Path),
    ("format", Token::Format),
    ("scale", Token::Scale),
    ("", Token::Unknown),
];

impl Token {
    /// Classifies a keyword, case-sensitively
    ///
    /// The first matching table entry wins.
    pub fn classify(keyword: &str) -> Self {
        TOKEN_TABLE
            .iter()
            .find(|(spelling, token)| *spelling == keyword || *token == Token::Unknown)
            .map_or(Token::Unknown, |(_, token)| *token)
    }

    /// Returns true for the keywords that open a new top-level block
    pub fn opens_block(self) -> bool {
        matches!(self, Token::Buffer | Token::Pass | Token::Shader | Token::Texture)
    }
}

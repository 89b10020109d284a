//! Description parser
//!
//! A recursive-descent parser with one function per block kind. Each block function
//! owns the value it is building and hands it back to the root loop when the next
//! block opens, so the root never mutates a block through the tail of a list. A
//! keyword that neither the block nor an enclosing block accepts is an error;
//! `name` and `version` are therefore only valid before the first block.
//!
//! A block opener written at column 0 always starts a new block. Indented, the
//! `shader` keyword inside a pass names the pass's shader instead.

mod error;
mod lists;

pub use error::ParseError;

use crate::pipeline::{Buffer, Pass, PipelineDescription, Shader, Texture};
use crate::scanner::{FieldLine, Scanner};
use crate::token::Token;

const BUFFER_FIELDS: &[Token] = &[Token::HasDepth, Token::Textures];
/// An indented `shader` inside a pass is the pass's shader reference, not a block opener
const PASS_FIELDS: &[Token] = &[
    Token::Shader,
    Token::Draw,
    Token::Inputs,
    Token::Outputs,
    Token::ClearDepth,
    Token::WriteDepth,
    Token::ClearOutputs,
    Token::DepthTest,
];
const SHADER_FIELDS: &[Token] = &[Token::Attributes, Token::Uniforms, Token::Varying, Token::VertexShader, Token::FragmentShader];
const STAGE_FIELDS: &[Token] = &[Token::Source, Token::Attributes];
const TEXTURE_FIELDS: &[Token] = &[Token::Path, Token::Format, Token::Scale];

/// Shader stage whose sub-block is being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vertex,
    Fragment,
}

/// Parser over a single description text
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { scanner: Scanner::new(source) }
    }

    /// Parses the whole description
    ///
    /// # Errors
    /// Returns the first `ParseError` encountered; no partially built description is
    /// ever returned.
    pub fn parse(mut self) -> Result<PipelineDescription, ParseError> {
        let mut description = PipelineDescription::default();

        while let Some(field) = self.peek_field()? {
            self.scanner.advance();
            match field.token {
                Token::Name => description.name = field.value.to_string(),
                Token::Version => description.version = field.value.to_string(),
                Token::Buffer => {
                    let buffer = self.parse_buffer(&field)?;
                    description.buffers.push(buffer);
                }
                Token::Pass => {
                    let pass = self.parse_pass(&field)?;
                    description.passes.push(pass);
                }
                Token::Shader => {
                    let shader = self.parse_shader(&field)?;
                    description.shaders.push(shader);
                }
                Token::Texture => {
                    let texture = self.parse_texture(&field)?;
                    description.textures.push(texture);
                }
                _ => {
                    return Err(ParseError::UnknownToken {
                        token: field.keyword.to_string(),
                        line: field.line,
                    });
                }
            }
        }

        Ok(description)
    }

    /// Returns the next field line without consuming it
    fn peek_field(&mut self) -> Result<Option<Field<'a>>, ParseError> {
        let Some((line, text)) = self.scanner.peek_line() else {
            return Ok(None);
        };
        let field = Scanner::split_field(line, text).ok_or_else(|| ParseError::MissingColon {
            text: text.trim().to_string(),
            line,
        })?;
        Ok(Some(Field::new(field)))
    }

    /// Consumes and returns the next field if the current block owns its keyword
    ///
    /// Returns `None` when the block ends: at the end of input, at a column-0 block
    /// opener, or at a keyword owned by an enclosing block (`enclosing`) or opening a
    /// new one. Any other keyword is an `UnknownToken` error.
    fn accept(&mut self, owned: &[Token], enclosing: &[Token]) -> Result<Option<Field<'a>>, ParseError> {
        let Some(field) = self.peek_field()? else {
            return Ok(None);
        };
        if field.at_line_start && field.token.opens_block() {
            return Ok(None);
        }
        if owned.contains(&field.token) {
            self.scanner.advance();
            return Ok(Some(field));
        }
        if field.token.opens_block() || enclosing.contains(&field.token) {
            return Ok(None);
        }
        Err(ParseError::UnknownToken {
            token: field.keyword.to_string(),
            line: field.line,
        })
    }

    fn parse_buffer(&mut self, opener: &Field<'a>) -> Result<Buffer, ParseError> {
        let mut buffer = Buffer {
            name: block_name(opener)?,
            ..Default::default()
        };

        while let Some(field) = self.accept(BUFFER_FIELDS, &[])? {
            match field.token {
                Token::HasDepth => buffer.has_depth = parse_bool(&field)?,
                Token::Textures => buffer.textures = self.parse_texture_list(&field)?,
                _ => unreachable!("buffer field {:?}", field.token),
            }
        }

        tracing::debug!(buffer = %buffer.name, textures = buffer.textures.len(), "parsed buffer");
        Ok(buffer)
    }

    fn parse_pass(&mut self, opener: &Field<'a>) -> Result<Pass, ParseError> {
        let mut pass = Pass {
            name: block_name(opener)?,
            ..Default::default()
        };

        while let Some(field) = self.accept(PASS_FIELDS, &[])? {
            match field.token {
                Token::Shader => pass.shader = field.value.to_string(),
                Token::Draw => pass.draw = parse_literal(&field)?,
                Token::Inputs => pass.input_textures = self.parse_input_list(&field)?,
                Token::Outputs => {
                    let (buffer, textures) = self.parse_outputs(&field)?;
                    pass.output_buffer = buffer;
                    pass.output_textures = textures;
                }
                Token::ClearDepth => pass.clear_depth = parse_bool(&field)?,
                Token::WriteDepth => pass.write_depth = parse_bool(&field)?,
                Token::ClearOutputs => pass.clear_outputs = parse_bool(&field)?,
                Token::DepthTest => pass.depth_test = parse_literal(&field)?,
                _ => unreachable!("pass field {:?}", field.token),
            }
        }

        tracing::debug!(pass = %pass.name, shader = %pass.shader, "parsed pass");
        Ok(pass)
    }

    fn parse_shader(&mut self, opener: &Field<'a>) -> Result<Shader, ParseError> {
        let mut shader = Shader {
            name: block_name(opener)?,
            ..Default::default()
        };

        while let Some(field) = self.accept(SHADER_FIELDS, &[])? {
            match field.token {
                Token::Attributes => shader.attributes.extend(self.parse_uniform_list(&field)?),
                Token::Uniforms => shader.uniforms.extend(self.parse_uniform_list(&field)?),
                Token::Varying => shader.varyings.extend(self.parse_uniform_list(&field)?),
                Token::VertexShader => self.parse_stage(&field, Stage::Vertex, &mut shader)?,
                Token::FragmentShader => self.parse_stage(&field, Stage::Fragment, &mut shader)?,
                _ => unreachable!("shader field {:?}", field.token),
            }
        }

        tracing::debug!(
            shader = %shader.name,
            attributes = shader.attributes.len(),
            uniforms = shader.uniforms.len(),
            varyings = shader.varyings.len(),
            "parsed shader"
        );
        Ok(shader)
    }

    /// Parses the `source` and `attributes` fields following `vsh:` or `fsh:`
    fn parse_stage(&mut self, opener: &Field<'a>, stage: Stage, shader: &mut Shader) -> Result<(), ParseError> {
        if !opener.value.is_empty() {
            return Err(ParseError::MalformedValue {
                field: opener.keyword.to_string(),
                value: opener.value.to_string(),
                line: opener.line,
            });
        }

        let mut has_source = false;
        while let Some(field) = self.accept(STAGE_FIELDS, SHADER_FIELDS)? {
            match field.token {
                Token::Source => {
                    has_source = true;
                    let source = self.parse_source(&field)?;
                    match stage {
                        Stage::Vertex => shader.vsh_source = source,
                        Stage::Fragment => shader.fsh_source = source,
                    }
                }
                Token::Attributes => shader.attributes.extend(self.parse_uniform_list(&field)?),
                _ => unreachable!("stage field {:?}", field.token),
            }
        }

        if !has_source {
            return Err(ParseError::MissingSource {
                stage: opener.keyword.to_string(),
                line: opener.line,
            });
        }
        Ok(())
    }

    /// Reads the backtick-fenced raw block of a `source:` field
    fn parse_source(&mut self, field: &Field<'a>) -> Result<String, ParseError> {
        let fence_line = if field.value.starts_with('`') {
            check_fence(field.value, field.line)?;
            field.line
        } else if !field.value.is_empty() {
            return Err(ParseError::MissingFence {
                found: field.value.to_string(),
                line: field.line,
            });
        } else {
            match self.scanner.peek_line() {
                Some((line, text)) if text.trim_start().starts_with('`') => {
                    check_fence(text, line)?;
                    self.scanner.advance();
                    line
                }
                Some((line, text)) => {
                    return Err(ParseError::MissingFence {
                        found: text.trim().to_string(),
                        line,
                    });
                }
                None => {
                    return Err(ParseError::UnexpectedEndOfInput {
                        context: "shader source",
                        line: field.line,
                    });
                }
            }
        };

        self.scanner.capture_fenced().ok_or(ParseError::UnexpectedEndOfInput {
            context: "shader source",
            line: fence_line,
        })
    }

    fn parse_texture(&mut self, opener: &Field<'a>) -> Result<Texture, ParseError> {
        let mut texture = Texture::new(block_name(opener)?);

        while let Some(field) = self.accept(TEXTURE_FIELDS, &[])? {
            match field.token {
                Token::Path => texture.path = Some(field.value.to_string()),
                Token::Format => texture.format = parse_literal(&field)?,
                Token::Scale => texture.scale = parse_scale(field.value).ok_or_else(|| field.malformed_value())?,
                _ => unreachable!("texture field {:?}", field.token),
            }
        }

        tracing::debug!(texture = %texture.name, format = %texture.format, "parsed texture");
        Ok(texture)
    }
}

/// A field line together with its classified keyword
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    line: usize,
    keyword: &'a str,
    value: &'a str,
    at_line_start: bool,
    token: Token,
}

impl<'a> Field<'a> {
    fn new(field: FieldLine<'a>) -> Self {
        Self {
            line: field.line,
            keyword: field.keyword,
            value: field.value,
            at_line_start: field.at_line_start,
            token: Token::classify(field.keyword),
        }
    }

    fn malformed_value(&self) -> ParseError {
        ParseError::MalformedValue {
            field: self.keyword.to_string(),
            value: self.value.to_string(),
            line: self.line,
        }
    }
}

fn block_name(opener: &Field<'_>) -> Result<String, ParseError> {
    if opener.value.is_empty() {
        return Err(opener.malformed_value());
    }
    Ok(opener.value.to_string())
}

/// Accepts exactly `yes`, `no`, `true` and `false`
fn parse_bool(field: &Field<'_>) -> Result<bool, ParseError> {
    match field.value {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        value => Err(ParseError::MalformedBoolean {
            field: field.keyword.to_string(),
            value: value.to_string(),
            line: field.line,
        }),
    }
}

/// Parses a viewport-relative scale, which must be finite and positive
fn parse_scale(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|scale| scale.is_finite() && *scale > 0.0)
}

/// Checks an opening fence line: backticks optionally followed by a language tag
fn check_fence(text: &str, line: usize) -> Result<(), ParseError> {
    let tag = text.trim().trim_start_matches('`');
    if tag.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')) {
        return Ok(());
    }
    Err(ParseError::MalformedValue {
        field: "source".to_string(),
        value: text.trim().to_string(),
        line,
    })
}

fn parse_literal<T: std::str::FromStr>(field: &Field<'_>) -> Result<T, ParseError> {
    field.value.parse().map_err(|_| field.malformed_value())
}

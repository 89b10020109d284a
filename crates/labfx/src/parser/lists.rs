//! List sub-grammars
//!
//! Uniform lists (`attributes`, `uniforms`, `varying`), buffer texture lists, pass
//! inputs and pass outputs. Every list is bracketed and may span several lines; the
//! opening bracket may also start the line after the keyword.

use super::{Field, ParseError, Parser, parse_scale};
use crate::SemanticType;
use crate::pipeline::{InputTexture, Texture, TextureType, Uniform};
use regex::Regex;
use std::sync::LazyLock;

/// `name : type` with an optional `<- automatic` binding
static UNIFORM_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<name>[^\s:]+)\s*:\s*(?<type>[^\s<]+)(?:\s*<-\s*(?<automatic>\S+))?$").unwrap());

/// A `scale:<float>` pair (spaces allowed around the colon) or any other token
static TEXTURE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"scale\s*:\s*[^\s,]*|[^\s,]+").unwrap());

impl<'a> Parser<'a> {
    /// Returns the text of the list starting on the field line or, when the field
    /// value is empty, on the next line
    fn list_opening(&mut self, field: &Field<'a>) -> &'a str {
        if field.value.is_empty() {
            if let Some((_, text)) = self.scanner.peek_line() {
                let text = text.trim_start();
                if text.starts_with('[') {
                    self.scanner.advance();
                    return text;
                }
            }
        }
        field.value
    }

    /// Collects the text between the brackets of a list
    fn bracketed(&mut self, field: &Field<'a>, opening: &'a str, context: &'static str) -> Result<String, ParseError> {
        let malformed = |token: &str| ParseError::MalformedList {
            context,
            token: token.to_string(),
            line: field.line,
        };

        let (inner, rest) = self.scanner.collect_bracketed(opening).ok_or_else(|| malformed(opening))?;
        if !rest.trim().is_empty() {
            return Err(malformed(rest.trim()));
        }
        Ok(inner)
    }

    /// Parses `[name: type <- automatic, ...]`
    pub(super) fn parse_uniform_list(&mut self, field: &Field<'a>) -> Result<Vec<Uniform>, ParseError> {
        let opening = self.list_opening(field);
        let inner = self.bracketed(field, opening, "uniform")?;

        inner
            .split([',', '\n'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let captures = UNIFORM_ENTRY_RE.captures(entry).ok_or_else(|| ParseError::MalformedList {
                    context: "uniform",
                    token: entry.to_string(),
                    line: field.line,
                })?;
                Ok(Uniform {
                    name: captures["name"].to_string(),
                    ty: SemanticType::from_name(&captures["type"]),
                    automatic: captures.name("automatic").map_or_else(String::new, |m| m.as_str().to_string()),
                })
            })
            .collect()
    }

    /// Parses a buffer's attachments
    ///
    /// Entries are separated by newlines or `;`. The first token of an entry names
    /// the texture; the remaining ones are a texture format or `scale:<float>`.
    pub(super) fn parse_texture_list(&mut self, field: &Field<'a>) -> Result<Vec<Texture>, ParseError> {
        let opening = self.list_opening(field);
        let inner = self.bracketed(field, opening, "texture")?;
        let malformed = |token: &str| ParseError::MalformedList {
            context: "texture",
            token: token.to_string(),
            line: field.line,
        };

        let mut textures = Vec::new();
        for entry in inner.split(['\n', ';']) {
            let mut tokens = TEXTURE_TOKEN_RE.find_iter(entry).map(|m| m.as_str());
            let Some(name) = tokens.next() else {
                continue;
            };
            if name.contains(':') {
                return Err(malformed(name));
            }

            let mut texture = Texture::new(name);
            for token in tokens {
                if let Some(value) = token.strip_prefix("scale").and_then(|rest| rest.trim_start().strip_prefix(':')) {
                    texture.scale = parse_scale(value).ok_or_else(|| malformed(token))?;
                } else {
                    texture.format = token.parse::<TextureType>().map_err(|_| malformed(token))?;
                }
            }
            textures.push(texture);
        }

        Ok(textures)
    }

    /// Parses `[buffer.texture, ...]`
    pub(super) fn parse_input_list(&mut self, field: &Field<'a>) -> Result<Vec<InputTexture>, ParseError> {
        let opening = self.list_opening(field);
        let inner = self.bracketed(field, opening, "input")?;

        inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('.') {
                Some((buffer, texture)) if !buffer.is_empty() && !texture.is_empty() && !texture.contains('.') => Ok(InputTexture {
                    buffer: buffer.to_string(),
                    texture: texture.to_string(),
                }),
                _ => Err(ParseError::MalformedList {
                    context: "input",
                    token: token.to_string(),
                    line: field.line,
                }),
            })
            .collect()
    }

    /// Parses `buffer` optionally followed by `[texture, ...]`
    ///
    /// With an empty field value the buffer is read from the next line, provided that
    /// line is not itself a field.
    pub(super) fn parse_outputs(&mut self, field: &Field<'a>) -> Result<(String, Vec<String>), ParseError> {
        let value = if field.value.is_empty() {
            match self.scanner.peek_line() {
                Some((_, text)) if !text.contains(':') => {
                    self.scanner.advance();
                    text.trim()
                }
                _ => return Err(field.malformed_value()),
            }
        } else {
            field.value
        };
        let (buffer, list) = match value.find('[') {
            Some(index) => (value[..index].trim(), Some(&value[index..])),
            None => (value, None),
        };
        if buffer.is_empty() || buffer.contains(char::is_whitespace) {
            return Err(field.malformed_value());
        }

        let list = match list {
            Some(list) => Some(list),
            None => match self.scanner.peek_line() {
                Some((_, text)) if text.trim_start().starts_with('[') => {
                    self.scanner.advance();
                    Some(text.trim_start())
                }
                _ => None,
            },
        };

        let textures = match list {
            Some(list) => self
                .bracketed(field, list, "output")?
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        Ok((buffer.to_string(), textures))
    }
}

#[cfg(test)]
mod tests {
    use crate::SemanticType;
    use crate::parser::{ParseError, Parser};
    use crate::pipeline::{PassDrawMode, PipelineDescription, TextureType};

    fn parse(source: &str) -> Result<PipelineDescription, ParseError> {
        Parser::new(source).parse()
    }

    #[test]
    fn test_uniform_list_entries() {
        let source = "shader: s\n    uniforms: [a: mat4 <- viewProjection, b : vec3, c: sampler2D<-gbuffer,]\n";
        let uniforms = &parse(source).unwrap().shaders[0].uniforms;
        assert_eq!(uniforms.len(), 3);
        assert_eq!(uniforms[0].automatic, "viewProjection");
        assert_eq!(uniforms[1].name, "b");
        assert_eq!(uniforms[1].ty, SemanticType::Vec3);
        assert!(uniforms[1].automatic.is_empty());
        assert_eq!(uniforms[2].ty, SemanticType::Sampler2D);
        assert_eq!(uniforms[2].automatic, "gbuffer");
    }

    #[test]
    fn test_multi_line_uniform_list() {
        let source = "\
shader: s
    uniforms: [
        u_model: mat4 <- model,
        - the projection comes from the camera
        u_projection: mat4 <- projection
        u_tint: vec4
    ]
    varying:
    [ v_uv: vec2 ]
";
        let shader = &parse(source).unwrap().shaders[0];
        let names: Vec<_> = shader.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["u_model", "u_projection", "u_tint"]);
        assert_eq!(shader.varyings[0].ty, SemanticType::Vec2);
    }

    #[test]
    fn test_unknown_uniform_type_is_kept() {
        let uniforms = &parse("shader: s\n    uniforms: [u: quaternion]\n").unwrap().shaders[0].uniforms;
        assert_eq!(uniforms[0].ty, SemanticType::Unknown);
    }

    #[test]
    fn test_malformed_uniform_entry() {
        let err = parse("shader: s\n    uniforms: [u mat4]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedList {
                context: "uniform",
                token: "u mat4".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_unterminated_list() {
        let err = parse("shader: s\n    uniforms: [u: mat4,\n    v: vec3\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedList { context: "uniform", line: 2, .. }));
    }

    #[test]
    fn test_list_requires_brackets() {
        let err = parse("shader: s\n    uniforms: u: mat4\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedList { .. }));
    }

    #[test]
    fn test_trailing_text_after_list() {
        let err = parse("pass: p\n    inputs: [a.b] extra\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedList { ref token, .. } if token == "extra"));
    }

    #[test]
    fn test_texture_list_entries() {
        let source = "\
buffer: gbuffer
    textures: [
        diffuse, u8x4
        normal f16x4 scale:0.5
        position, f32x4, scale: 2
        mask
    ]
";
        let textures = &parse(source).unwrap().buffers[0].textures;
        assert_eq!(textures.len(), 4);
        assert_eq!(textures[0].format, TextureType::U8x4);
        assert_eq!(textures[1].format, TextureType::F16x4);
        assert_eq!(textures[1].scale, 0.5);
        assert_eq!(textures[2].scale, 2.0);
        assert_eq!(textures[3].name, "mask");
        assert_eq!(textures[3].format, TextureType::None);
    }

    #[test]
    fn test_texture_list_semicolon_entries() {
        let textures = &parse("buffer: b\n    textures: [a, f32x1; b, u8x2]\n").unwrap().buffers[0].textures;
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[1].format, TextureType::U8x2);
    }

    #[test]
    fn test_unrecognized_texture_token() {
        let err = parse("buffer: b\n    textures: [color, rgba8]\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedList { context: "texture", ref token, .. } if token == "rgba8"));

        let err = parse("buffer: b\n    textures: [color, scale:big]\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedList { context: "texture", .. }));
    }

    #[test]
    fn test_input_list() {
        let inputs = &parse("pass: p\n    inputs: [gbuffer.color, gbuffer.normal\n        shadow.depth]\n").unwrap().passes[0].input_textures;
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[2].buffer, "shadow");
        assert_eq!(inputs[2].texture, "depth");
    }

    #[test]
    fn test_malformed_input() {
        for list in ["[gbuffer]", "[.color]", "[gbuffer.]", "[a.b.c]"] {
            let source = format!("pass: p\n    inputs: {list}\n");
            assert!(matches!(parse(&source), Err(ParseError::MalformedList { context: "input", .. })), "{list}");
        }
    }

    #[test]
    fn test_outputs() {
        let pass = &parse("pass: p\n    outputs: gbuffer\n").unwrap().passes[0];
        assert_eq!(pass.output_buffer, "gbuffer");
        assert!(pass.output_textures.is_empty());

        let source = "pass: p\n    outputs: gbuffer\n        [ diffuse,\n          normal ]\n    draw: quad\n";
        let pass = &parse(source).unwrap().passes[0];
        assert_eq!(pass.output_textures, vec!["diffuse".to_string(), "normal".to_string()]);
        assert_eq!(pass.draw, PassDrawMode::Quad);
    }

    #[test]
    fn test_outputs_on_following_line() {
        let pass = &parse("pass: p\n    outputs:\n        lbuffer [ color ]\n    draw: quad\n").unwrap().passes[0];
        assert_eq!(pass.output_buffer, "lbuffer");
        assert_eq!(pass.output_textures, vec!["color".to_string()]);
        assert_eq!(pass.draw, PassDrawMode::Quad);

        let pass = &parse("pass: p\n    outputs:\n        gbuffer\n        [diffuse, normal]\n").unwrap().passes[0];
        assert_eq!(pass.output_buffer, "gbuffer");
        assert_eq!(pass.output_textures.len(), 2);

        let err = parse("pass: p\n    outputs:\n    draw: quad\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedValue { line: 2, .. }));
    }

    #[test]
    fn test_texture_list_scale_must_be_finite_and_positive() {
        for scale in ["-2", "NaN", "inf", "0"] {
            let source = format!("buffer: b\n    textures: [c, f32x4, scale:{scale}]\n");
            let err = parse(&source).unwrap_err();
            assert!(matches!(err, ParseError::MalformedList { context: "texture", .. }), "{scale}");
        }
    }

    #[test]
    fn test_outputs_require_a_buffer() {
        assert!(matches!(parse("pass: p\n    outputs: [color]\n"), Err(ParseError::MalformedValue { .. })));
        assert!(matches!(parse("pass: p\n    outputs: two buffers\n"), Err(ParseError::MalformedValue { .. })));
    }
}

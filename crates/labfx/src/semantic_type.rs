//! Semantic type table
//!
//! This module maps shading-language type names (scalars, vectors, matrices and the
//! sampler family) to a closed enumeration together with their element count and
//! byte stride. The table is static; lookups never allocate.

use serde::{Serialize, Serializer};
use std::fmt;

/// Names longer than this are rejected without scanning the table
const MAX_TYPE_NAME_LENGTH: usize = 32;

/// Declares the `SemanticType` enum together with its static table
macro_rules! semantic_types {
    ($($variant:ident => $name:literal, $count:literal, $stride:literal;)*) => {
        /// A shading-language type usable for attributes, uniforms and varyings
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum SemanticType {
            $($variant,)*
            /// Sentinel for names missing from the table
            #[default]
            Unknown,
        }

        /// (type, name, element count, byte stride)
        const SEMANTIC_TYPE_TABLE: &[(SemanticType, &str, u32, u32)] = &[
            $((SemanticType::$variant, $name, $count, $stride),)*
        ];
    };
}

semantic_types! {
    Float => "float", 1, 4;
    Vec2 => "vec2", 2, 8;
    Vec3 => "vec3", 3, 12;
    Vec4 => "vec4", 4, 16;
    Double => "double", 1, 8;
    DVec2 => "dvec2", 2, 16;
    DVec3 => "dvec3", 3, 24;
    DVec4 => "dvec4", 4, 32;
    Int => "int", 1, 4;
    IVec2 => "ivec2", 2, 8;
    IVec3 => "ivec3", 3, 12;
    IVec4 => "ivec4", 4, 16;
    UInt => "uint", 1, 4;
    UVec2 => "uvec2", 2, 8;
    UVec3 => "uvec3", 3, 12;
    UVec4 => "uvec4", 4, 16;
    Bool => "bool", 1, 4;
    BVec2 => "bvec2", 2, 8;
    BVec3 => "bvec3", 3, 12;
    BVec4 => "bvec4", 4, 16;
    Mat2 => "mat2", 4, 16;
    Mat3 => "mat3", 9, 36;
    Mat4 => "mat4", 16, 64;
    Mat2x2 => "mat2x2", 4, 16;
    Mat2x3 => "mat2x3", 6, 24;
    Mat2x4 => "mat2x4", 8, 32;
    Mat3x2 => "mat3x2", 6, 24;
    Mat3x3 => "mat3x3", 9, 36;
    Mat3x4 => "mat3x4", 12, 48;
    Mat4x2 => "mat4x2", 8, 32;
    Mat4x3 => "mat4x3", 12, 48;
    Mat4x4 => "mat4x4", 16, 64;
    DMat2 => "dmat2", 4, 32;
    DMat3 => "dmat3", 9, 72;
    DMat4 => "dmat4", 16, 128;
    Sampler1D => "sampler1D", 1, 4;
    Sampler2D => "sampler2D", 1, 4;
    Sampler3D => "sampler3D", 1, 4;
    SamplerCube => "samplerCube", 1, 4;
    Sampler2DRect => "sampler2DRect", 1, 4;
    Sampler1DArray => "sampler1DArray", 1, 4;
    Sampler2DArray => "sampler2DArray", 1, 4;
    SamplerCubeArray => "samplerCubeArray", 1, 4;
    SamplerBuffer => "samplerBuffer", 1, 4;
    Sampler2DMS => "sampler2DMS", 1, 4;
    Sampler2DMSArray => "sampler2DMSArray", 1, 4;
    Sampler1DShadow => "sampler1DShadow", 1, 4;
    Sampler2DShadow => "sampler2DShadow", 1, 4;
    Sampler2DRectShadow => "sampler2DRectShadow", 1, 4;
    Sampler1DArrayShadow => "sampler1DArrayShadow", 1, 4;
    Sampler2DArrayShadow => "sampler2DArrayShadow", 1, 4;
    SamplerCubeShadow => "samplerCubeShadow", 1, 4;
    SamplerCubeArrayShadow => "samplerCubeArrayShadow", 1, 4;
    ISampler1D => "isampler1D", 1, 4;
    ISampler2D => "isampler2D", 1, 4;
    ISampler3D => "isampler3D", 1, 4;
    ISamplerCube => "isamplerCube", 1, 4;
    ISampler2DRect => "isampler2DRect", 1, 4;
    ISampler1DArray => "isampler1DArray", 1, 4;
    ISampler2DArray => "isampler2DArray", 1, 4;
    ISamplerBuffer => "isamplerBuffer", 1, 4;
    ISampler2DMS => "isampler2DMS", 1, 4;
    ISampler2DMSArray => "isampler2DMSArray", 1, 4;
    USampler1D => "usampler1D", 1, 4;
    USampler2D => "usampler2D", 1, 4;
    USampler3D => "usampler3D", 1, 4;
    USamplerCube => "usamplerCube", 1, 4;
    USampler2DRect => "usampler2DRect", 1, 4;
    USampler1DArray => "usampler1DArray", 1, 4;
    USampler2DArray => "usampler2DArray", 1, 4;
    USamplerBuffer => "usamplerBuffer", 1, 4;
    USampler2DMS => "usampler2DMS", 1, 4;
    USampler2DMSArray => "usampler2DMSArray", 1, 4;
}

impl SemanticType {
    /// Looks up a type by its shading-language name
    ///
    /// Matching is case-insensitive and requires the whole name to match. Names that are
    /// not in the table, or that exceed the maximum type name length, yield
    /// `SemanticType::Unknown`.
    ///
    /// # Arguments
    /// * `name` - Type name as written in a description, e.g. `vec3` or `sampler2DShadow`
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() || name.len() > MAX_TYPE_NAME_LENGTH {
            return Self::Unknown;
        }

        SEMANTIC_TYPE_TABLE
            .iter()
            .find(|(_, entry_name, _, _)| entry_name.eq_ignore_ascii_case(name))
            .map_or(Self::Unknown, |(ty, _, _, _)| *ty)
    }

    fn entry(self) -> Option<&'static (SemanticType, &'static str, u32, u32)> {
        SEMANTIC_TYPE_TABLE.iter().find(|(ty, _, _, _)| *ty == self)
    }

    /// Canonical shading-language spelling, `"unknown"` for the sentinel
    pub fn name(self) -> &'static str {
        self.entry().map_or("unknown", |(_, name, _, _)| *name)
    }

    /// Number of scalar elements (a `mat4` has 16, samplers have 1)
    pub fn element_count(self) -> u32 {
        self.entry().map_or(1, |(_, _, count, _)| *count)
    }

    /// Size in bytes of one tightly packed value
    pub fn byte_stride(self) -> u32 {
        self.entry().map_or(4, |(_, _, _, stride)| *stride)
    }

    /// Returns true for every member of the sampler family
    pub fn is_sampler(self) -> bool {
        self.name().contains("sampler")
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SemanticType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(SemanticType::from_name("vec3"), SemanticType::Vec3);
        assert_eq!(SemanticType::from_name("VEC3"), SemanticType::Vec3);
        assert_eq!(SemanticType::from_name("Sampler2DShadow"), SemanticType::Sampler2DShadow);
        assert_eq!(SemanticType::from_name("mat4"), SemanticType::Mat4);
    }

    #[test]
    fn test_lookup_requires_exact_length() {
        assert_eq!(SemanticType::from_name("vec"), SemanticType::Unknown);
        assert_eq!(SemanticType::from_name("vec33"), SemanticType::Unknown);
        assert_eq!(SemanticType::from_name("sampler2"), SemanticType::Unknown);
        assert_eq!(SemanticType::from_name(""), SemanticType::Unknown);
    }

    #[test]
    fn test_overlong_names_are_unknown() {
        let long_name = "float".repeat(10);
        assert_eq!(SemanticType::from_name(&long_name), SemanticType::Unknown);
    }

    #[test]
    fn test_counts_and_strides() {
        assert_eq!(SemanticType::Float.element_count(), 1);
        assert_eq!(SemanticType::Float.byte_stride(), 4);
        assert_eq!(SemanticType::Vec3.byte_stride(), 12);
        assert_eq!(SemanticType::Mat4.element_count(), 16);
        assert_eq!(SemanticType::Mat4.byte_stride(), 64);
        assert_eq!(SemanticType::Mat3x4.element_count(), 12);
        assert_eq!(SemanticType::DMat4.byte_stride(), 128);
        assert_eq!(SemanticType::Sampler2D.element_count(), 1);
    }

    #[test]
    fn test_unknown_fallbacks() {
        assert_eq!(SemanticType::Unknown.name(), "unknown");
        assert_eq!(SemanticType::Unknown.element_count(), 1);
        assert_eq!(SemanticType::Unknown.byte_stride(), 4);
        assert!(!SemanticType::Unknown.is_sampler());
    }

    #[test]
    fn test_every_name_round_trips() {
        for (ty, name, _, _) in SEMANTIC_TYPE_TABLE {
            assert_eq!(SemanticType::from_name(name), *ty, "{name}");
            assert_eq!(ty.name(), *name);
        }
    }

    #[test]
    fn test_sampler_family() {
        assert!(SemanticType::USampler2DMSArray.is_sampler());
        assert!(SemanticType::SamplerCubeArrayShadow.is_sampler());
        assert!(!SemanticType::Mat2.is_sampler());
    }
}

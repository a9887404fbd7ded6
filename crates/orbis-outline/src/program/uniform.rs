//! Typed uniform/attribute descriptors shared by every program backend.

/// Shape of a uniform block member.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Float,
    Int,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    /// Size in bytes of the member's data (not its padded slot).
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }
}

/// Resolved uniform location: byte offset inside the program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub offset: u32,
    pub kind: UniformKind,
}

impl UniformLocation {
    #[inline]
    pub const fn new(offset: u32, kind: UniformKind) -> Self {
        Self { offset, kind }
    }
}

/// A single uniform upload.
///
/// Matrices are column-major, matching WGSL `mat4x4<f32>` and `glam::Mat4`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

impl UniformValue {
    #[inline]
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Raw little-endian bytes as laid out in the uniform block.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformValue::Float(v) => bytemuck::bytes_of(v),
            UniformValue::Int(v) => bytemuck::bytes_of(v),
            UniformValue::Vec2(v) => bytemuck::cast_slice(v),
            UniformValue::Vec3(v) => bytemuck::cast_slice(v),
            UniformValue::Vec4(v) => bytemuck::cast_slice(v),
            UniformValue::Mat4(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Vertex attribute component layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeFormat {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeFormat {
    #[inline]
    pub const fn size(self) -> u32 {
        match self {
            AttributeFormat::Float => 4,
            AttributeFormat::Vec2 => 8,
            AttributeFormat::Vec3 => 12,
            AttributeFormat::Vec4 => 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_bytes_match_kind_size() {
        let values = [
            UniformValue::Float(1.0),
            UniformValue::Int(-3),
            UniformValue::Vec2([1.0, 2.0]),
            UniformValue::Vec3([1.0, 2.0, 3.0]),
            UniformValue::Vec4([0.0; 4]),
            UniformValue::Mat4([0.0; 16]),
        ];
        for v in values {
            assert_eq!(v.as_bytes().len() as u32, v.kind().size(), "{v:?}");
        }
    }

    #[test]
    fn int_bytes_are_little_endian() {
        assert_eq!(UniformValue::Int(1).as_bytes(), &[1, 0, 0, 0]);
    }
}

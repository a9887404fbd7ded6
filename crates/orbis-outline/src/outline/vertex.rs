use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One outline strip vertex as consumed by the outline vertex kernel.
///
/// Invariants:
/// - `prev_pos != next_pos` (the tangent is undefined otherwise)
/// - `direction != 0`; its sign picks the extrusion side and its magnitude
///   is the cumulative arc length used for stippling
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct OutlineVertex {
    pub pos: [f32; 3],
    pub prev_pos: [f32; 3],
    pub next_pos: [f32; 3],
    pub direction: f32,
}

impl OutlineVertex {
    /// Shader attribute names, in location order.
    pub const ATTRIBUTE_NAMES: [&'static str; 4] = ["pos", "prevPos", "nextPos", "direction"];

    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3, // prevPos
        2 => Float32x3, // nextPos
        3 => Float32    // direction
    ];

    #[inline]
    pub fn new(pos: Vec3, prev_pos: Vec3, next_pos: Vec3, direction: f32) -> Self {
        Self {
            pos: pos.to_array(),
            prev_pos: prev_pos.to_array(),
            next_pos: next_pos.to_array(),
            direction,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.pos)
    }

    #[inline]
    pub fn previous(&self) -> Vec3 {
        Vec3::from_array(self.prev_pos)
    }

    #[inline]
    pub fn next(&self) -> Vec3 {
        Vec3::from_array(self.next_pos)
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OutlineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<OutlineVertex>(), 40);
        let layout = OutlineVertex::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 24, 36]);
    }
}

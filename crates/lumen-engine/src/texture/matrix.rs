use std::ops::Index;

use bytemuck::{Pod, Zeroable};

use crate::coords::TexSize;

/// 4x4 texture coordinate transform, column-major.
///
/// Textures only ever produce axis scales: identity with `m[0]` and `m[5]`
/// holding `logical / backing` per axis, so the unit square maps onto the
/// part of the allocation that holds content.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexMatrix([f32; 16]);

impl TexMatrix {
    pub const IDENTITY: TexMatrix = TexMatrix([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
    ]);

    /// Identity with the X and Y diagonal entries replaced.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        let mut m = Self::IDENTITY.0;
        m[0] = sx;
        m[5] = sy;
        Self(m)
    }

    /// Matrix that maps the unit square onto `logical` inside `backing`.
    pub fn cropping(logical: TexSize, backing: TexSize) -> Self {
        debug_assert!(!backing.is_empty());
        Self::scale(
            logical.width as f32 / backing.width as f32,
            logical.height as f32 / backing.height as f32,
        )
    }

    #[inline]
    pub const fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 16] {
        self.0
    }

    /// `(m[0], m[5])`.
    #[inline]
    pub const fn scale_factors(&self) -> (f32, f32) {
        (self.0[0], self.0[5])
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the matrix to the texture coordinate `(u, v, 0, 1)`.
    #[inline]
    pub fn transform_uv(&self, u: f32, v: f32) -> [f32; 2] {
        let m = &self.0;
        [
            m[0] * u + m[4] * v + m[12],
            m[1] * u + m[5] * v + m[13],
        ]
    }

    /// Raw bytes, for uniform uploads.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for TexMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for TexMatrix {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl From<TexMatrix> for [f32; 16] {
    fn from(m: TexMatrix) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cropping_equal_sizes_is_identity() {
        let s = TexSize::new(640, 480);
        assert!(TexMatrix::cropping(s, s).is_identity());
    }

    #[test]
    fn cropping_sets_only_diagonal_scales() {
        let m = TexMatrix::cropping(TexSize::new(100, 60), TexSize::new(128, 64));
        assert_eq!(m.scale_factors(), (0.78125, 0.9375));
        for (i, v) in m.as_array().iter().enumerate() {
            match i {
                0 | 5 => {}
                10 | 15 => assert_eq!(*v, 1.0),
                _ => assert_eq!(*v, 0.0, "entry {i}"),
            }
        }
    }

    #[test]
    fn transform_uv_crops_unit_square() {
        let m = TexMatrix::scale(0.5, 0.25);
        assert_eq!(m.transform_uv(0.0, 0.0), [0.0, 0.0]);
        assert_eq!(m.transform_uv(1.0, 1.0), [0.5, 0.25]);
        assert_eq!(m.transform_uv(1.0, 0.0), [0.5, 0.0]);
    }

    #[test]
    fn bytes_are_sixteen_floats() {
        assert_eq!(TexMatrix::IDENTITY.as_bytes().len(), 64);
        assert_eq!(&TexMatrix::IDENTITY.as_bytes()[..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn index_and_conversion() {
        let m = TexMatrix::scale(2.0, 3.0);
        assert_eq!(m[0], 2.0);
        assert_eq!(m[5], 3.0);
        let raw: [f32; 16] = m.into();
        assert_eq!(raw[15], 1.0);
    }
}

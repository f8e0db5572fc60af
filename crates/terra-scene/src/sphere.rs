//! UV sphere mesh used for the globe, the atmosphere shell and the pins.
//!
//! Vertex `(ix, iy)` sits at `u = ix / width_segments`, `v = iy / height_segments`
//! with
//!
//! ```text
//! x = -r cos(2πu) sin(πv)
//! y =  r cos(πv)
//! z =  r sin(2πu) sin(πv)
//! ```
//!
//! so `v = 0` is the north pole and `u = 0` faces -X. An equirectangular map
//! sampled at `(u, v)` therefore lines up with
//! [`terra_geo::geo_to_cartesian`] for `u = (lon + 180) / 360` and
//! `v = (90 - lat) / 180`.

use std::f32::consts::{PI, TAU};

use terra_render::VertexPositionNormalUv;

/// CPU-side sphere geometry, counter-clockwise when seen from outside.
#[derive(Clone, Debug, PartialEq)]
pub struct UvSphere {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
    width_segments: u32,
    height_segments: u32,
}

impl UvSphere {
    /// Segment counts are clamped to at least 3 around and 2 top to bottom.
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let columns = width_segments + 1;
        let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            // Pole rows use the middle of each segment so the seam texels
            // are not smeared across the cap.
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_theta, cos_theta) = (v * PI).sin_cos();
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();

                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                vertices.push(VertexPositionNormalUv {
                    position: normal.map(|c| c * radius),
                    normal,
                    uv: [u + u_offset, v],
                });
            }
        }

        let index = |ix: u32, iy: u32| iy * columns + ix;
        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = index(ix + 1, iy);
                let b = index(ix, iy);
                let c = index(ix, iy + 1);
                let d = index(ix + 1, iy + 1);

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            vertices,
            indices,
            width_segments,
            height_segments,
        }
    }

    pub fn width_segments(&self) -> u32 {
        self.width_segments
    }

    pub fn height_segments(&self) -> u32 {
        self.height_segments
    }

    /// Vertex at grid column `ix` and row `iy`.
    pub fn vertex(&self, ix: u32, iy: u32) -> Option<&VertexPositionNormalUv> {
        if ix > self.width_segments || iy > self.height_segments {
            return None;
        }
        self.vertices
            .get((iy * (self.width_segments + 1) + ix) as usize)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

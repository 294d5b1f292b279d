use crate::{Error, Result, Vec3};

/// Vertex data ready for upload. Positions have `dimensions` components per
/// vertex, normals 3 and colours 3 (RGB bytes). Normals and colours are
/// either empty or one per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub dimensions: i32,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub colours: Vec<u8>,
    pub indices: Option<Vec<u16>>,
}

type Colour = [u8; 3];

// Face colours for the F, front first, in the order faces are pushed.
const F_COLOURS: [Colour; 6] = [
    [200, 70, 120],
    [80, 70, 200],
    [70, 200, 210],
    [200, 200, 70],
    [210, 100, 70],
    [90, 130, 110],
];

// Quads of an axis aligned box as corner selectors, counter-clockwise
// when seen from outside: (use max x, use max y, use max z).
const FACES: [[[bool; 3]; 4]; 6] = [
    // +Z
    [
        [false, false, true],
        [true, false, true],
        [true, true, true],
        [false, true, true],
    ],
    // -Z
    [
        [true, false, false],
        [false, false, false],
        [false, true, false],
        [true, true, false],
    ],
    // +X
    [
        [true, false, true],
        [true, false, false],
        [true, true, false],
        [true, true, true],
    ],
    // -X
    [
        [false, false, false],
        [false, false, true],
        [false, true, true],
        [false, true, false],
    ],
    // +Y
    [
        [false, true, true],
        [true, true, true],
        [true, true, false],
        [false, true, false],
    ],
    // -Y
    [
        [false, false, false],
        [true, false, false],
        [true, false, true],
        [false, false, true],
    ],
];

const FACE_NORMALS: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
];

impl Geometry {
    fn new(dimensions: i32) -> Self {
        Geometry {
            dimensions,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> i32 {
        match &self.indices {
            Some(indices) => indices.len() as i32,
            None => self.positions.len() as i32 / self.dimensions.max(1),
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// A single triangle in clip space with red, green and blue corners.
    #[rustfmt::skip]
    pub fn triangle() -> Self {
        Geometry {
            dimensions: 2,
            positions: vec![
                0.0, 0.5,
                -0.5, -0.5,
                0.5, -0.5,
            ],
            normals: Vec::new(),
            colours: vec![
                255, 0, 0,
                0, 255, 0,
                0, 0, 255,
            ],
            indices: None,
        }
    }

    /// Two triangles covering the rectangle, 2D.
    pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut geometry = Self::new(2);
        geometry.push_rectangle(x, y, w, h);
        geometry
    }

    fn push_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (x1, y1) = (x + w, y + h);
        self.positions
            .extend_from_slice(&[x, y, x1, y, x, y1, x, y1, x1, y, x1, y1]);
    }

    /// The letter F in pixel units, 100 wide and 150 tall, with (0, 0) at
    /// the top left and y increasing downwards.
    pub fn f_2d() -> Self {
        let mut geometry = Self::new(2);
        geometry.push_rectangle(0.0, 0.0, 30.0, 150.0);
        geometry.push_rectangle(30.0, 0.0, 70.0, 30.0);
        geometry.push_rectangle(30.0, 60.0, 37.0, 30.0);
        geometry
    }

    /// A solid F, 100 x 150 x 30, centred on the origin with y up. Each face
    /// direction has its own colour.
    pub fn f_3d() -> Self {
        let mut geometry = Self::new(3);

        let offset = Vec3::new(-50.0, -75.0, -15.0);
        let parts = [
            // Upright
            (Vec3::new(0.0, 0.0, 0.0), Vec3::new(30.0, 150.0, 30.0)),
            // Top rung
            (Vec3::new(30.0, 120.0, 0.0), Vec3::new(100.0, 150.0, 30.0)),
            // Middle rung
            (Vec3::new(30.0, 60.0, 0.0), Vec3::new(67.0, 90.0, 30.0)),
        ];

        for (min, max) in parts {
            geometry.push_cuboid(min + offset, max + offset);
        }

        geometry
    }

    fn push_cuboid(&mut self, min: Vec3, max: Vec3) {
        let corner = |[x, y, z]: [bool; 3]| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };

        for (face, quad) in FACES.iter().enumerate() {
            let [a, b, c, d] = (*quad).map(corner);
            for v in [a, b, c, a, c, d] {
                self.positions.extend_from_slice(&v.arr());
                self.normals.extend_from_slice(&FACE_NORMALS[face].arr());
                self.colours.extend_from_slice(&F_COLOURS[face]);
            }
        }
    }

    /// Indexed cube of side `size` centred on the origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut geometry = Self::new(3);
        let mut indices = Vec::with_capacity(36);

        for (face, quad) in FACES.iter().enumerate() {
            let base = (geometry.positions.len() / 3) as u16;
            for [x, y, z] in quad {
                let p = Vec3::new(
                    if *x { h } else { -h },
                    if *y { h } else { -h },
                    if *z { h } else { -h },
                );
                geometry.positions.extend_from_slice(&p.arr());
                geometry.normals.extend_from_slice(&FACE_NORMALS[face].arr());
                geometry.colours.extend_from_slice(&F_COLOURS[face]);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        geometry.indices = Some(indices);
        geometry
    }

    /// Indexed plane on y = 0 facing up.
    pub fn plane(width: f32, depth: f32) -> Self {
        let (w, d) = (width / 2.0, depth / 2.0);

        #[rustfmt::skip]
        let positions = vec![
            -w, 0.0, -d,
            w,  0.0, -d,
            -w, 0.0, d,
            w,  0.0, d,
        ];

        Geometry {
            dimensions: 3,
            positions,
            normals: [0.0, 1.0, 0.0].repeat(4),
            colours: Vec::new(),
            indices: Some(vec![2, 3, 1, 2, 1, 0]),
        }
    }

    /// Indexed UV sphere. Needs at least 2 latitude and 3 longitude bands
    /// and must fit in 16-bit indices.
    pub fn sphere(radius: f32, lat_bands: u16, long_bands: u16) -> Result<Self> {
        if lat_bands < 2 || long_bands < 3 {
            return Err(Error::Degenerate("sphere needs more bands"));
        }

        let vertices = (lat_bands as u32 + 1) * (long_bands as u32 + 1);
        if vertices > u16::MAX as u32 {
            return Err(Error::Degenerate("sphere has too many vertices"));
        }

        let mut geometry = Self::new(3);
        for lat in 0..=lat_bands {
            let theta = lat as f32 * std::f32::consts::PI / lat_bands as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for long in 0..=long_bands {
                let phi = long as f32 * 2.0 * std::f32::consts::PI / long_bands as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let normal = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                geometry.normals.extend_from_slice(&normal.arr());
                geometry
                    .positions
                    .extend_from_slice(&(normal * radius).arr());
            }
        }

        let mut indices = Vec::with_capacity(lat_bands as usize * long_bands as usize * 6);
        for lat in 0..lat_bands {
            for long in 0..long_bands {
                let first = lat * (long_bands + 1) + long;
                let second = first + long_bands + 1;
                indices.extend_from_slice(&[first, first + 1, second]);
                indices.extend_from_slice(&[second, first + 1, second + 1]);
            }
        }

        geometry.indices = Some(indices);
        Ok(geometry)
    }

    /// Replace normals with per-face normals. Only meaningful for
    /// non-indexed 3D triangle lists.
    pub fn flat_normals(&mut self) {
        self.normals = flat_normals(&self.positions);
    }
}

pub fn flat_normals(positions: &[f32]) -> Vec<f32> {
    let mut normals = Vec::with_capacity(positions.len());
    for tri in positions.chunks_exact(9) {
        let a = Vec3::new(tri[0], tri[1], tri[2]);
        let b = Vec3::new(tri[3], tri[4], tri[5]);
        let c = Vec3::new(tri[6], tri[7], tri[8]);
        let n = (b - a).cross(c - a).normalize();
        for _ in 0..3 {
            normals.extend_from_slice(&n.arr());
        }
    }
    normals
}

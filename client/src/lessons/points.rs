use std::rc::Rc;

use math::Geometry;
use serde_derive::{Deserialize, Serialize};

use super::{merge_options, to_json, Lesson};
use crate::bridge::Context;
use crate::render::{Gl, Mesh, Program};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PointsOptions {
    pub point_size: f32,

    // How many of the points to draw, starting from the centre one.
    pub count: i64,
}

impl PointsOptions {
    pub const MAX_POINT_SIZE: f32 = 64.0;

    pub fn clamped(self) -> Self {
        PointsOptions {
            point_size: self.point_size.clamp(1.0, Self::MAX_POINT_SIZE),
            count: self.count.clamp(0, POINT_COUNT as i64),
        }
    }
}

impl Default for PointsOptions {
    fn default() -> Self {
        PointsOptions {
            point_size: 10.0,
            count: POINT_COUNT as i64,
        }
    }
}

const POINT_COUNT: usize = 5;

/// A point at the centre of clip space and one towards each corner.
#[rustfmt::skip]
pub fn points() -> Geometry {
    Geometry {
        dimensions: 2,
        positions: vec![
            0.0, 0.0,
            -0.5, 0.5,
            0.5, 0.5,
            0.5, -0.5,
            -0.5, -0.5,
        ],
        normals: Vec::new(),
        colours: vec![
            255, 255, 255,
            255, 0, 0,
            0, 255, 0,
            0, 0, 255,
            255, 255, 0,
        ],
        indices: None,
    }
}

pub struct Points {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    options: PointsOptions,
}

impl Points {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/points.vert"),
            include_str!("shaders/colour.frag"),
            &["u_point_size"],
        )?;

        let mesh = match Mesh::new(&gl, &program, &points()) {
            Ok(mesh) => mesh.points(),
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(Points {
            gl,
            program,
            mesh,
            options: PointsOptions::default(),
        })
    }
}

impl Lesson for Points {
    fn frame(&mut self, _ctx: &Context, _dt: f32) -> anyhow::Result<()> {
        self.program.use_program();
        self.program.set_f32("u_point_size", self.options.point_size);
        self.mesh.draw_first(&self.gl, self.options.count as i32);
        Ok(())
    }

    fn options(&self) -> String {
        to_json(&self.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        self.options = merge_options(&self.options, json)?.clamped();
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

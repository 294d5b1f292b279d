use std::rc::Rc;

use math::{radians, Geometry, Mat4};
use serde_derive::{Deserialize, Serialize};

use super::{merge_options, to_json, Lesson};
use crate::bridge::event::{InputEvent, Key};
use crate::bridge::Context;
use crate::render::{Gl, Mesh, Program};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PerspectiveOptions {
    pub fov_degrees: f32,
    pub translation: [f32; 3],

    // Euler angles in degrees, applied x then y then z.
    pub rotation: [f32; 3],
    pub spin: bool,

    // Degrees per second about y while spinning.
    pub speed: f32,
}

impl Default for PerspectiveOptions {
    fn default() -> Self {
        PerspectiveOptions {
            fov_degrees: 60.0,
            translation: [0.0, 0.0, -400.0],
            rotation: [20.0, 30.0, 0.0],
            spin: true,
            speed: 45.0,
        }
    }
}

impl PerspectiveOptions {
    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 2000.0;

    pub fn advance(&mut self, dt: f32) {
        if self.spin {
            self.rotation[1] = (self.rotation[1] + self.speed * dt).rem_euclid(360.0);
        }
    }

    pub fn matrix(&self, aspect: f32) -> math::Result<Mat4> {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        Ok(
            Mat4::perspective(radians(self.fov_degrees), aspect, Self::NEAR, Self::FAR)?
                .translate(tx, ty, tz)
                .x_rotate(radians(rx))
                .y_rotate(radians(ry))
                .z_rotate(radians(rz)),
        )
    }
}

pub struct Perspective {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    options: PerspectiveOptions,
}

impl Perspective {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/3d.vert"),
            include_str!("shaders/colour.frag"),
            &["u_matrix"],
        )?;

        let mesh = match Mesh::new(&gl, &program, &Geometry::f_3d()) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(Perspective {
            gl,
            program,
            mesh,
            options: PerspectiveOptions::default(),
        })
    }
}

impl Lesson for Perspective {
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()> {
        self.options.advance(dt);

        self.program.use_program();
        self.program
            .set_mat4("u_matrix", &self.options.matrix(ctx.aspect())?);
        self.mesh.draw(&self.gl);
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        if event.key_down() == Some(Key::Space) {
            self.options.spin = !self.options.spin;
        }
    }

    fn options(&self) -> String {
        to_json(&self.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        let options = merge_options(&self.options, json)?;
        // Reject a field of view the projection can't be built from.
        options.matrix(1.0)?;
        self.options = options;
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

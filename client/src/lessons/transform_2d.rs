use std::rc::Rc;

use math::{radians, Geometry, Mat3};
use serde_derive::{Deserialize, Serialize};

use super::{merge_options, to_json, Lesson};
use crate::bridge::event::{InputEvent, Key};
use crate::bridge::Context;
use crate::render::{Gl, Mesh, Program};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Transform2dOptions {
    // Pixels from the top left of the canvas.
    pub translation: [f32; 2],
    pub angle: f32,
    pub scale: [f32; 2],
    pub colour: [f32; 3],
}

impl Default for Transform2dOptions {
    fn default() -> Self {
        Transform2dOptions {
            translation: [150.0, 150.0],
            angle: 0.0,
            scale: [1.0, 1.0],
            colour: [0.2, 1.0, 0.2],
        }
    }
}

impl Transform2dOptions {
    const STEP: f32 = 10.0;
    const ANGLE_STEP: f32 = 5.0;

    /// Arrow keys move the F, plus and minus turn it.
    pub fn apply_key(&mut self, key: Key) {
        if let Some((dx, dy)) = key.direction() {
            self.translation[0] += dx * Self::STEP;
            // Pixel space runs downwards.
            self.translation[1] -= dy * Self::STEP;
            return;
        }

        match key {
            Key::Plus => self.angle += Self::ANGLE_STEP,
            Key::Minus => self.angle -= Self::ANGLE_STEP,
            _ => {}
        }
        self.angle = self.angle.rem_euclid(360.0);
    }

    /// Pixel space to clip space, then the F's own transform. The F turns
    /// and scales about its centre.
    pub fn matrix(&self, width: f32, height: f32) -> Mat3 {
        let [tx, ty] = self.translation;
        let [sx, sy] = self.scale;
        Mat3::projection(width, height)
            .translate(tx, ty)
            .rotate(radians(self.angle))
            .scale(sx, sy)
            .translate(-F_CENTRE.0, -F_CENTRE.1)
    }
}

const F_CENTRE: (f32, f32) = (50.0, 75.0);

pub struct Transform2d {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    colour_location: u32,
    options: Transform2dOptions,
}

impl Transform2d {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/2d.vert"),
            include_str!("shaders/colour.frag"),
            &["u_matrix"],
        )?;

        // The F has no per vertex colour, so the attribute's constant
        // value is used instead.
        let setup = || -> anyhow::Result<(u32, Mesh)> {
            let location = program.attrib("a_colour")?;
            Ok((location, Mesh::new(&gl, &program, &Geometry::f_2d())?))
        };
        let (colour_location, mesh) = match setup() {
            Ok(r) => r,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(Transform2d {
            gl,
            program,
            mesh,
            colour_location,
            options: Transform2dOptions::default(),
        })
    }
}

impl Lesson for Transform2d {
    fn frame(&mut self, ctx: &Context, _dt: f32) -> anyhow::Result<()> {
        let (w, h) = ctx.size();
        let [r, g, b] = self.options.colour;

        self.program.use_program();
        self.program
            .set_mat3("u_matrix", &self.options.matrix(w as f32, h as f32));
        self.gl.vertex_attrib3f(self.colour_location, r, g, b);
        self.mesh.draw(&self.gl);
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        if let Some(key) = event.key_down() {
            self.options.apply_key(key);
        }
    }

    fn options(&self) -> String {
        to_json(&self.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        self.options = merge_options(&self.options, json)?;
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

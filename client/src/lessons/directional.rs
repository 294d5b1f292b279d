use std::rc::Rc;

use math::{radians, Camera, Geometry, Mat4, Vec3};
use serde_derive::{Deserialize, Serialize};

use super::control::OrbitControl;
use super::{merge_options, to_json, Lesson};
use crate::bridge::event::{InputEvent, Key};
use crate::bridge::Context;
use crate::render::{Gl, Mesh, Program};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DirectionalOptions {
    // Direction towards the light, need not be normalized.
    pub light_direction: [f32; 3],
    pub colour: [f32; 4],
    pub spin: bool,
    pub speed: f32,
}

impl Default for DirectionalOptions {
    fn default() -> Self {
        DirectionalOptions {
            light_direction: [0.5, 0.7, 1.0],
            colour: [0.2, 1.0, 0.2, 1.0],
            spin: true,
            speed: 30.0,
        }
    }
}

impl DirectionalOptions {
    pub fn light(&self) -> anyhow::Result<Vec3> {
        let direction = Vec3::from(self.light_direction);
        if direction.length() <= f32::EPSILON {
            return Err(anyhow::anyhow!("Light direction must not be zero."));
        }
        Ok(direction.normalize())
    }
}

pub struct Directional {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    control: OrbitControl,
    options: DirectionalOptions,

    // Radians about y.
    rotation: f32,
}

impl Directional {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/directional.vert"),
            include_str!("shaders/directional.frag"),
            &[
                "u_world_view_projection",
                "u_normal_matrix",
                "u_reverse_light_direction",
                "u_colour",
            ],
        )?;

        let mesh = match Mesh::new(&gl, &program, &Geometry::f_3d()) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(Directional {
            gl,
            program,
            mesh,
            control: OrbitControl::new(Camera::new(
                Vec3::new(100.0, 150.0, 200.0),
                Vec3::new(0.0, 35.0, 0.0),
            )),
            options: DirectionalOptions::default(),
            rotation: 0.0,
        })
    }
}

impl Lesson for Directional {
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()> {
        if self.options.spin {
            self.rotation = (self.rotation + radians(self.options.speed) * dt)
                .rem_euclid(std::f32::consts::TAU);
        }

        let world = Mat4::y_rotation(self.rotation);
        let view_projection = self.control.camera.view_projection(ctx.aspect())?;

        self.program.use_program();
        self.program
            .set_mat4("u_world_view_projection", &(view_projection * world));
        self.program
            .set_mat3("u_normal_matrix", &world.normal_matrix()?);
        self.program
            .set_vec3("u_reverse_light_direction", self.options.light()?);
        self.program.set_vec4("u_colour", self.options.colour);
        self.mesh.draw(&self.gl);
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        if event.key_down() == Some(Key::Space) {
            self.options.spin = !self.options.spin;
        } else {
            self.control.handle(event);
        }
    }

    fn options(&self) -> String {
        to_json(&self.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        let options = merge_options(&self.options, json)?;
        options.light()?;
        self.options = options;
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

use std::f32::consts::TAU;
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
pub struct LookAtOptions {
    pub count: u8,
    pub radius: f32,
    pub fov_degrees: f32,

    // Turn the camera around the ring on its own.
    pub orbit: bool,
    pub speed: f32,
}

impl Default for LookAtOptions {
    fn default() -> Self {
        LookAtOptions {
            count: 5,
            radius: 200.0,
            fov_degrees: 60.0,
            orbit: true,
            speed: 20.0,
        }
    }
}

/// `count` points evenly spaced on a circle of `radius` around the y axis,
/// the first on +x.
pub fn ring_positions(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = i as f32 * TAU / count as f32;
            let (s, c) = angle.sin_cos();
            Vec3::new(c * radius, 0.0, s * radius)
        })
        .collect()
}

fn initial_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 150.0, 500.0), Vec3::ZERO)
}

pub struct LookAt {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    control: OrbitControl,
    options: LookAtOptions,
}

impl LookAt {
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

        Ok(LookAt {
            gl,
            program,
            mesh,
            control: OrbitControl::new(initial_camera()),
            options: LookAtOptions::default(),
        })
    }
}

impl Lesson for LookAt {
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()> {
        if self.options.orbit && !self.control.is_dragging() {
            self.control
                .camera
                .orbit(radians(self.options.speed) * dt, 0.0);
        }

        let mut camera = self.control.camera;
        camera.fov_y = radians(self.options.fov_degrees);
        let view_projection = camera.view_projection(ctx.aspect())?;

        self.program.use_program();
        for position in ring_positions(self.options.count as usize, self.options.radius) {
            let world = Mat4::translation(position.x, position.y, position.z);
            self.program.set_mat4("u_matrix", &(view_projection * world));
            self.mesh.draw(&self.gl);
        }
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        if event.key_down() == Some(Key::Space) {
            self.options.orbit = !self.options.orbit;
        } else {
            self.control.handle(event);
        }
    }

    fn options(&self) -> String {
        to_json(&self.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        let options = merge_options(&self.options, json)?;
        let mut camera = self.control.camera;
        camera.fov_y = radians(options.fov_degrees);
        camera.projection_matrix(1.0)?;
        self.options = options;
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

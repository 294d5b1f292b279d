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
pub struct PointLightOptions {
    pub light_position: [f32; 3],
    pub shininess: f32,
    pub colour: [f32; 4],
    pub light_colour: [f32; 3],
    pub specular_colour: [f32; 3],
    pub ambient: f32,
    pub spin: bool,
    pub speed: f32,
}

impl Default for PointLightOptions {
    fn default() -> Self {
        PointLightOptions {
            light_position: [20.0, 30.0, 60.0],
            shininess: 150.0,
            colour: [0.2, 1.0, 0.2, 1.0],
            light_colour: [1.0, 1.0, 1.0],
            specular_colour: [1.0, 1.0, 1.0],
            ambient: 0.1,
            spin: true,
            speed: 30.0,
        }
    }
}

impl PointLightOptions {
    pub const MIN_SHININESS: f32 = 1.0;
    pub const MAX_SHININESS: f32 = 1000.0;

    pub fn clamped(self) -> Self {
        PointLightOptions {
            shininess: self
                .shininess
                .clamp(Self::MIN_SHININESS, Self::MAX_SHININESS),
            ambient: self.ambient.clamp(0.0, 1.0),
            ..self
        }
    }
}

pub struct PointLight {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    control: OrbitControl,
    options: PointLightOptions,
    rotation: f32,
}

impl PointLight {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/point.vert"),
            include_str!("shaders/point.frag"),
            &[
                "u_world",
                "u_world_view_projection",
                "u_normal_matrix",
                "u_light_position",
                "u_view_position",
                "u_colour",
                "u_light_colour",
                "u_specular_colour",
                "u_shininess",
                "u_ambient",
            ],
        )?;

        let mesh = match Mesh::new(&gl, &program, &Geometry::f_3d()) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(PointLight {
            gl,
            program,
            mesh,
            control: OrbitControl::new(Camera::new(
                Vec3::new(100.0, 150.0, 200.0),
                Vec3::new(0.0, 35.0, 0.0),
            )),
            options: PointLightOptions::default(),
            rotation: 0.0,
        })
    }
}

impl Lesson for PointLight {
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()> {
        if self.options.spin {
            self.rotation = (self.rotation + radians(self.options.speed) * dt)
                .rem_euclid(std::f32::consts::TAU);
        }

        let camera = &self.control.camera;
        let world = Mat4::y_rotation(self.rotation);
        let view_projection = camera.view_projection(ctx.aspect())?;
        let options = &self.options;

        let p = &self.program;
        p.use_program();
        p.set_mat4("u_world", &world);
        p.set_mat4("u_world_view_projection", &(view_projection * world));
        p.set_mat3("u_normal_matrix", &world.normal_matrix()?);
        p.set_vec3("u_light_position", Vec3::from(options.light_position));
        p.set_vec3("u_view_position", camera.position);
        p.set_vec4("u_colour", options.colour);
        p.set_vec3("u_light_colour", Vec3::from(options.light_colour));
        p.set_vec3("u_specular_colour", Vec3::from(options.specular_colour));
        p.set_f32("u_shininess", options.shininess);
        p.set_f32("u_ambient", options.ambient);
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
        self.options = merge_options(&self.options, json)?.clamped();
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

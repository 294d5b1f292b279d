use std::rc::Rc;

use math::{Camera, Geometry, Graph, NodeId, Transform, Vec3};
use serde_derive::{Deserialize, Serialize};

use super::control::OrbitControl;
use super::{merge_options, to_json, Lesson};
use crate::bridge::event::{InputEvent, Key};
use crate::bridge::Context;
use crate::render::{Gl, Mesh, Program};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SolarOptions {
    pub paused: bool,

    // Multiplier on every rotation rate.
    pub speed: f32,
}

impl SolarOptions {
    pub const MAX_SPEED: f32 = 16.0;

    pub fn clamped(self) -> Self {
        SolarOptions {
            speed: self.speed.clamp(0.0, Self::MAX_SPEED),
            ..self
        }
    }
}

impl Default for SolarOptions {
    fn default() -> Self {
        SolarOptions {
            paused: false,
            speed: 1.0,
        }
    }
}

/// Something drawn: a sphere at a node with a colour. `ambient` of 1 draws
/// it at full brightness regardless of the light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub node: NodeId,
    pub colour: [f32; 4],
    pub ambient: f32,
}

pub const EARTH_ORBIT_RADIUS: f32 = 100.0;
pub const MOON_ORBIT_RADIUS: f32 = 30.0;

/// Sun, earth and moon as a transform hierarchy. Orbits are nodes that
/// rotate and carry their children around with them:
///
/// solar system -> sun
///              -> earth orbit -> earth
///                             -> moon orbit -> moon
pub struct SolarSystem {
    pub graph: Graph,
    pub options: SolarOptions,
    pub sun: NodeId,
    pub earth: NodeId,
    pub moon: NodeId,

    // Radians per second about y for each rotating node.
    rates: Vec<(NodeId, f32)>,
}

impl SolarSystem {
    pub fn new() -> math::Result<Self> {
        let mut graph = Graph::new();

        let root = graph.add(Transform::new());
        let sun = graph.add_child(root, Transform::new().scaled(Vec3::same(5.0)))?;
        let earth_orbit = graph.add_child(
            root,
            Transform::new().at(Vec3::new(EARTH_ORBIT_RADIUS, 0.0, 0.0)),
        )?;
        let earth = graph.add_child(earth_orbit, Transform::new().scaled(Vec3::same(2.0)))?;
        let moon_orbit = graph.add_child(
            earth_orbit,
            Transform::new().at(Vec3::new(MOON_ORBIT_RADIUS, 0.0, 0.0)),
        )?;
        let moon = graph.add_child(moon_orbit, Transform::new().scaled(Vec3::same(0.4)))?;

        graph.update_world_matrices();

        Ok(SolarSystem {
            graph,
            options: SolarOptions::default(),
            sun,
            earth,
            moon,
            rates: vec![
                (root, 0.6),
                (sun, 0.3),
                (earth_orbit, 0.6),
                (earth, 1.2),
                (moon, -0.6),
            ],
        })
    }

    pub fn advance(&mut self, dt: f32) -> math::Result<()> {
        if self.options.paused {
            return Ok(());
        }

        let scale = dt * self.options.speed;
        for &(id, rate) in &self.rates {
            let local = &mut self.graph.get_mut(id)?.local;
            local.rotate_by(Vec3::new(0.0, rate * scale, 0.0));
            local.rotation.y = local.rotation.y.rem_euclid(std::f32::consts::TAU);
        }
        self.graph.update_world_matrices();
        Ok(())
    }

    // Plus steps up from here once the speed has dropped to zero.
    const MIN_STEP_SPEED: f32 = 0.05;

    /// Space pauses, plus and minus change the speed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Space => self.options.paused = !self.options.paused,
            Key::Plus => {
                self.options.speed = (self.options.speed * 1.25).max(Self::MIN_STEP_SPEED)
            }
            Key::Minus => self.options.speed /= 1.25,
            _ => return false,
        }
        self.options = self.options.clamped();
        true
    }

    pub fn position(&self, id: NodeId) -> math::Result<Vec3> {
        Ok(self.graph.world(id)?.transform_point(Vec3::ZERO))
    }

    pub fn bodies(&self) -> [Body; 3] {
        [
            Body {
                node: self.sun,
                colour: [1.0, 0.8, 0.2, 1.0],
                ambient: 1.0,
            },
            Body {
                node: self.earth,
                colour: [0.2, 0.5, 1.0, 1.0],
                ambient: 0.1,
            },
            Body {
                node: self.moon,
                colour: [0.6, 0.6, 0.6, 1.0],
                ambient: 0.1,
            },
        ]
    }
}

pub struct SolarSystemLesson {
    gl: Rc<Gl>,
    program: Program,
    mesh: Mesh,
    control: OrbitControl,
    system: SolarSystem,
}

impl SolarSystemLesson {
    const SPHERE_RADIUS: f32 = 10.0;

    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let system = SolarSystem::new()?;
        let sphere = Geometry::sphere(Self::SPHERE_RADIUS, 24, 32)?;

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

        let mesh = match Mesh::new(&gl, &program, &sphere) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        Ok(SolarSystemLesson {
            gl,
            program,
            mesh,
            control: OrbitControl::new(Camera::new(Vec3::new(0.0, 200.0, 300.0), Vec3::ZERO)),
            system,
        })
    }
}

impl Lesson for SolarSystemLesson {
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()> {
        self.system.advance(dt)?;

        let camera = &self.control.camera;
        let view_projection = camera.view_projection(ctx.aspect())?;

        let p = &self.program;
        p.use_program();
        p.set_vec3("u_light_position", self.system.position(self.system.sun)?);
        p.set_vec3("u_view_position", camera.position);
        p.set_vec3("u_light_colour", Vec3::ONE);
        p.set_vec3("u_specular_colour", Vec3::same(0.3));
        p.set_f32("u_shininess", 30.0);

        for body in self.system.bodies() {
            let world = self.system.graph.world(body.node)?;
            p.set_mat4("u_world", &world);
            p.set_mat4("u_world_view_projection", &(view_projection * world));
            p.set_mat3("u_normal_matrix", &world.normal_matrix()?);
            p.set_vec4("u_colour", body.colour);
            p.set_f32("u_ambient", body.ambient);
            self.mesh.draw(&self.gl);
        }
        Ok(())
    }

    fn input(&mut self, event: &InputEvent) {
        let handled = match event.key_down() {
            Some(key) => self.system.handle_key(key),
            None => false,
        };

        if !handled {
            self.control.handle(event);
        }
    }

    fn options(&self) -> String {
        to_json(&self.system.options)
    }

    fn set_options(&mut self, json: &str) -> anyhow::Result<()> {
        self.system.options = merge_options(&self.system.options, json)?.clamped();
        Ok(())
    }

    fn delete(&mut self) {
        self.mesh.delete(&self.gl);
        self.program.delete();
    }
}

use std::collections::HashMap;
use std::rc::Rc;

use math::{Mat3, Mat4, Vec3};
use web_sys::{WebGlProgram, WebGlUniformLocation};

use super::{create_program, get_attrib_location, get_uniform_location, validate_program, Gl};

/// A linked program with the locations of its uniforms looked up once.
pub struct Program {
    gl: Rc<Gl>,
    program: WebGlProgram,
    uniforms: HashMap<&'static str, WebGlUniformLocation>,
}

impl Program {
    /// Every name in `uniforms` must be used by the shaders, otherwise the
    /// GLSL compiler strips it and the lookup fails.
    pub fn new(
        gl: Rc<Gl>,
        vert: &str,
        frag: &str,
        uniforms: &[&'static str],
    ) -> anyhow::Result<Self> {
        let program = create_program(&gl, vert, frag)?;

        let mut locations = HashMap::with_capacity(uniforms.len());
        for &name in uniforms {
            match get_uniform_location(&gl, &program, name) {
                Ok(l) => {
                    locations.insert(name, l);
                }
                Err(e) => {
                    gl.delete_program(Some(&program));
                    return Err(e);
                }
            }
        }

        Ok(Program {
            gl,
            program,
            uniforms: locations,
        })
    }

    pub fn attrib(&self, name: &str) -> anyhow::Result<u32> {
        get_attrib_location(&self.gl, &self.program, name)
    }

    pub fn has_attrib(&self, name: &str) -> bool {
        self.gl.get_attrib_location(&self.program, name) >= 0
    }

    pub fn use_program(&self) {
        self.gl.use_program(Some(&self.program));
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_program(&self.gl, &self.program)
    }

    // Unknown names give None, which WebGL treats as a no-op.
    fn location(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }

    pub fn set_mat4(&self, name: &str, m: &Mat4) {
        self.gl
            .uniform_matrix4fv_with_f32_array(self.location(name), false, m.as_slice());
    }

    pub fn set_mat3(&self, name: &str, m: &Mat3) {
        self.gl
            .uniform_matrix3fv_with_f32_array(self.location(name), false, m.as_slice());
    }

    pub fn set_vec3(&self, name: &str, v: Vec3) {
        self.gl.uniform3fv_with_f32_array(self.location(name), &v.arr());
    }

    pub fn set_vec4(&self, name: &str, v: [f32; 4]) {
        self.gl.uniform4fv_with_f32_array(self.location(name), &v);
    }

    pub fn set_f32(&self, name: &str, v: f32) {
        self.gl.uniform1f(self.location(name), v);
    }

    pub fn delete(&self) {
        self.gl.delete_program(Some(&self.program));
    }
}

use std::rc::Rc;

use math::{Geometry, Mat3};
use web_sys::WebGlBuffer;

use super::Lesson;
use crate::bridge::Context;
use crate::render::{create_colour_buffer, Gl, Program, VertexArray};

/// One triangle, with its vertex array put together by hand rather than
/// through `Mesh`.
pub struct Triangle {
    gl: Rc<Gl>,
    program: Program,
    vao: VertexArray,
    buffers: Vec<WebGlBuffer>,
    vertex_count: i32,
}

impl Triangle {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let gl = ctx.gl().clone();
        let program = Program::new(
            gl.clone(),
            include_str!("shaders/2d.vert"),
            include_str!("shaders/colour.frag"),
            &["u_matrix"],
        )?;

        let vao = match VertexArray::new(&gl) {
            Ok(vao) => vao,
            Err(e) => {
                program.delete();
                return Err(e);
            }
        };

        let mut buffers = Vec::new();
        vao.bind(&gl);
        let result = Self::upload(ctx, &program, &vao, &mut buffers);
        VertexArray::unbind(&gl);

        if let Err(e) = result {
            for buffer in &buffers {
                gl.delete_buffer(Some(buffer));
            }
            vao.delete(&gl);
            program.delete();
            return Err(e);
        }

        Ok(Triangle {
            gl,
            program,
            vao,
            buffers,
            vertex_count: 3,
        })
    }

    fn upload(
        ctx: &Context,
        program: &Program,
        vao: &VertexArray,
        buffers: &mut Vec<WebGlBuffer>,
    ) -> anyhow::Result<()> {
        let gl = ctx.gl();
        let triangle = Geometry::triangle();

        let position = program.attrib("a_position")?;
        let buffer = ctx.create_array_buffer(&triangle.positions)?;
        vao.attribute(gl, position, &buffer, 2, Gl::FLOAT, false);
        buffers.push(buffer);

        let colour = program.attrib("a_colour")?;
        let buffer = create_colour_buffer(gl, &triangle.colours)?;
        vao.attribute(gl, colour, &buffer, 3, Gl::UNSIGNED_BYTE, true);
        buffers.push(buffer);

        program.use_program();
        program.validate()
    }
}

impl Lesson for Triangle {
    fn frame(&mut self, _ctx: &Context, _dt: f32) -> anyhow::Result<()> {
        self.program.use_program();
        // Positions are already in clip space.
        self.program.set_mat3("u_matrix", &Mat3::IDENTITY);

        self.vao.bind(&self.gl);
        self.gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);
        VertexArray::unbind(&self.gl);
        Ok(())
    }

    fn delete(&mut self) {
        for buffer in &self.buffers {
            self.gl.delete_buffer(Some(buffer));
        }
        self.vao.delete(&self.gl);
        self.program.delete();
    }
}

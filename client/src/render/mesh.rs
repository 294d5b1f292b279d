use js_sys::Float32Array;
use math::Geometry;
use web_sys::{WebGlBuffer, WebGlVertexArrayObject};

use super::{create_buffer, create_colour_buffer, create_index_buffer, Gl, Program};

/// Vertex array object: remembers which buffers feed which attributes.
pub struct VertexArray {
    vao: WebGlVertexArrayObject,
}

impl VertexArray {
    pub fn new(gl: &Gl) -> anyhow::Result<Self> {
        match gl.create_vertex_array() {
            Some(vao) => Ok(VertexArray { vao }),
            None => Err(anyhow::anyhow!("Failed to create vertex array.")),
        }
    }

    pub fn bind(&self, gl: &Gl) {
        gl.bind_vertex_array(Some(&self.vao));
    }

    pub fn unbind(gl: &Gl) {
        gl.bind_vertex_array(None);
    }

    /// Point `location` at `buffer`. The VAO must be bound.
    pub fn attribute(
        &self,
        gl: &Gl,
        location: u32,
        buffer: &WebGlBuffer,
        size: i32,
        kind: u32,
        normalized: bool,
    ) {
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, size, kind, normalized, 0, 0);
    }

    pub fn delete(&self, gl: &Gl) {
        gl.delete_vertex_array(Some(&self.vao));
    }
}

/// Geometry uploaded to the GPU for a particular program. Binds
/// `a_position` and, where both the geometry and program have them,
/// `a_normal` and `a_colour`.
pub struct Mesh {
    vao: VertexArray,
    buffers: Vec<WebGlBuffer>,
    vertex_count: i32,
    indexed: bool,
    mode: u32,
}

impl Mesh {
    pub fn new(gl: &Gl, program: &Program, geometry: &Geometry) -> anyhow::Result<Self> {
        let vao = VertexArray::new(gl)?;
        vao.bind(gl);

        let mut buffers = Vec::new();
        let result = Self::upload(gl, program, geometry, &vao, &mut buffers);
        VertexArray::unbind(gl);

        if let Err(e) = result {
            for buffer in &buffers {
                gl.delete_buffer(Some(buffer));
            }
            vao.delete(gl);
            return Err(e);
        }

        Ok(Mesh {
            vao,
            buffers,
            vertex_count: geometry.vertex_count(),
            indexed: geometry.is_indexed(),
            mode: Gl::TRIANGLES,
        })
    }

    fn upload(
        gl: &Gl,
        program: &Program,
        geometry: &Geometry,
        vao: &VertexArray,
        buffers: &mut Vec<WebGlBuffer>,
    ) -> anyhow::Result<()> {
        let position = program.attrib("a_position")?;
        let buffer = create_buffer(gl, Some(&Float32Array::from(&geometry.positions[..])))?;
        vao.attribute(gl, position, &buffer, geometry.dimensions, Gl::FLOAT, false);
        buffers.push(buffer);

        if !geometry.normals.is_empty() && program.has_attrib("a_normal") {
            let normal = program.attrib("a_normal")?;
            let buffer = create_buffer(gl, Some(&Float32Array::from(&geometry.normals[..])))?;
            vao.attribute(gl, normal, &buffer, 3, Gl::FLOAT, false);
            buffers.push(buffer);
        }

        if !geometry.colours.is_empty() && program.has_attrib("a_colour") {
            let colour = program.attrib("a_colour")?;
            let buffer = create_colour_buffer(gl, &geometry.colours)?;
            // Bytes are normalized to [0, 1].
            vao.attribute(gl, colour, &buffer, 3, Gl::UNSIGNED_BYTE, true);
            buffers.push(buffer);
        }

        if let Some(indices) = &geometry.indices {
            buffers.push(create_index_buffer(gl, indices)?);
        }

        Ok(())
    }

    /// Draw as points rather than triangles.
    pub fn points(mut self) -> Self {
        self.mode = Gl::POINTS;
        self
    }

    // Should be called after using a program.
    pub fn draw(&self, gl: &Gl) {
        self.draw_first(gl, self.vertex_count);
    }

    /// Draw only the first `count` vertices (or indices).
    pub fn draw_first(&self, gl: &Gl, count: i32) {
        let count = count.clamp(0, self.vertex_count);
        self.vao.bind(gl);
        if self.indexed {
            gl.draw_elements_with_i32(self.mode, count, Gl::UNSIGNED_SHORT, 0);
        } else {
            gl.draw_arrays(self.mode, 0, count);
        }
        VertexArray::unbind(gl);
    }

    pub fn delete(&self, gl: &Gl) {
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        self.vao.delete(gl);
    }
}

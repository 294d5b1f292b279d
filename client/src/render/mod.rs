use js_sys::{Float32Array, Uint16Array, Uint8Array};
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

mod mesh;
mod program;

pub type Gl = WebGl2RenderingContext;

pub use {
    mesh::{Mesh, VertexArray},
    program::Program,
};

pub fn get_uniform_location(
    gl: &Gl,
    program: &WebGlProgram,
    location: &str,
) -> anyhow::Result<WebGlUniformLocation> {
    match gl.get_uniform_location(program, location) {
        Some(l) => Ok(l),
        None => Err(anyhow::anyhow!(
            "Failed to get WebGlUniformLocation {location}."
        )),
    }
}

pub fn get_attrib_location(gl: &Gl, program: &WebGlProgram, name: &str) -> anyhow::Result<u32> {
    match gl.get_attrib_location(program, name) {
        l if l >= 0 => Ok(l as u32),
        _ => Err(anyhow::anyhow!("Failed to get attribute location {name}.")),
    }
}

pub fn create_buffer(gl: &Gl, data_opt: Option<&Float32Array>) -> anyhow::Result<WebGlBuffer> {
    let buffer = match gl.create_buffer() {
        Some(b) => b,
        None => return Err(anyhow::anyhow!("Failed to create WebGL buffer.")),
    };

    if let Some(data) = data_opt {
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_opt_array_buffer(
            Gl::ARRAY_BUFFER,
            Some(&data.buffer()),
            Gl::STATIC_DRAW,
        );
    }

    Ok(buffer)
}

pub fn create_colour_buffer(gl: &Gl, data: &[u8]) -> anyhow::Result<WebGlBuffer> {
    let buffer = match gl.create_buffer() {
        Some(b) => b,
        None => return Err(anyhow::anyhow!("Failed to create WebGL buffer.")),
    };

    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_opt_array_buffer(
        Gl::ARRAY_BUFFER,
        Some(&Uint8Array::from(data).buffer()),
        Gl::STATIC_DRAW,
    );

    Ok(buffer)
}

/// Element array buffer. Left bound, so call with the owning VAO bound.
pub fn create_index_buffer(gl: &Gl, indices: &[u16]) -> anyhow::Result<WebGlBuffer> {
    let buffer = match gl.create_buffer() {
        Some(b) => b,
        None => return Err(anyhow::anyhow!("Failed to create WebGL index buffer.")),
    };

    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_opt_array_buffer(
        Gl::ELEMENT_ARRAY_BUFFER,
        Some(&Uint16Array::from(indices).buffer()),
        Gl::STATIC_DRAW,
    );

    Ok(buffer)
}

pub fn create_shader(gl: &Gl, src: &str, stype: u32) -> anyhow::Result<WebGlShader> {
    let shader = match gl.create_shader(stype) {
        Some(s) => s,
        None => return Err(anyhow::anyhow!("Failed to create shader.")),
    };

    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .is_falsy()
    {
        let log = gl.get_shader_info_log(&shader);
        gl.delete_shader(Some(&shader));
        return match log {
            Some(e) => Err(anyhow::anyhow!("Shader compilation failed, log: {e}")),
            None => Err(anyhow::anyhow!(
                "Shader compilation failed, no error message."
            )),
        };
    }

    Ok(shader)
}

pub fn create_program(gl: &Gl, vert: &str, frag: &str) -> anyhow::Result<WebGlProgram> {
    let vertex_shader = create_shader(gl, vert, Gl::VERTEX_SHADER)?;
    let fragment_shader = match create_shader(gl, frag, Gl::FRAGMENT_SHADER) {
        Ok(s) => s,
        Err(e) => {
            gl.delete_shader(Some(&vertex_shader));
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Some(p) => p,
        None => {
            gl.delete_shader(Some(&vertex_shader));
            gl.delete_shader(Some(&fragment_shader));
            return Err(anyhow::anyhow!("WebGL program creation failed."));
        }
    };

    gl.attach_shader(&program, &vertex_shader);
    gl.attach_shader(&program, &fragment_shader);

    gl.link_program(&program);

    // Once linked, the program no longer needs the shader objects.
    for shader in [&vertex_shader, &fragment_shader] {
        gl.detach_shader(&program, shader);
        gl.delete_shader(Some(shader));
    }

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .is_falsy()
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(anyhow::anyhow!("WebGL program linking failed. {log}"));
    }

    Ok(program)
}

/// Check the program can run in the current GL state. Mostly useful while
/// debugging, as it depends on what is bound at the time.
pub fn validate_program(gl: &Gl, program: &WebGlProgram) -> anyhow::Result<()> {
    gl.validate_program(program);

    if gl
        .get_program_parameter(program, Gl::VALIDATE_STATUS)
        .is_falsy()
    {
        let log = gl.get_program_info_log(program).unwrap_or_default();
        return Err(anyhow::anyhow!("WebGL program validation failed. {log}"));
    }

    Ok(())
}

//! Shader compilation and program linking.

use glow::HasContext;

use crate::error::LayerError;

/// Compiles a vertex/fragment pair and links them into a program.
///
/// On any compile or link failure the driver's info log is collected
/// into [`LayerError::ShaderBuild`] and every partially created GL
/// object is released before returning.
pub fn build_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, LayerError> {
    unsafe {
        let vertex = compile_stage(gl, glow::VERTEX_SHADER, vertex_src)?;
        let fragment = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_src) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(LayerError::ShaderBuild(e));
            }
        };

        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.get_program_link_status(program) {
            let info_log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(LayerError::ShaderBuild(format!(
                "program link: {}",
                info_log
            )));
        }

        Ok(program)
    }
}

fn compile_stage(
    gl: &glow::Context,
    stage: u32,
    source: &str,
) -> Result<glow::Shader, LayerError> {
    let stage_name = if stage == glow::VERTEX_SHADER {
        "vertex"
    } else {
        "fragment"
    };

    unsafe {
        let shader = gl
            .create_shader(stage)
            .map_err(LayerError::ShaderBuild)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let info_log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(LayerError::ShaderBuild(format!(
                "{} shader: {}",
                stage_name, info_log
            )));
        }

        Ok(shader)
    }
}

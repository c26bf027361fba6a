//! Shader compilation and linking for the warp pass.
//!
//! The compile/link functions need a live `glow::Context`; the source
//! formatting helper is pure string work and is what makes driver error
//! logs (which cite line numbers) readable next to the GLSL.

use std::fmt::Write as _;

use thiserror::Error;

/// Errors from shader compilation or program linking.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile {
        /// The stage that failed ("vertex" or "fragment").
        stage: &'static str,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// The program failed to link.
    #[error("shader program failed to link:\n{0}")]
    Link(String),
}

/// Prefixes each line of `source` with a right-aligned line number so
/// driver errors like `ERROR: 0:12:` can be matched to the GLSL.
pub fn format_shader_source(source: &str) -> String {
    let count = source.lines().count();
    let width = count.max(1).to_string().len();
    let mut out = String::with_capacity(source.len() + count * (width + 2));
    for (i, line) in source.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:>width$}: {line}", i + 1);
    }
    out
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

#[allow(unsafe_code)]
fn compile_stage(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let stage = stage_name(shader_type);

    // SAFETY: glow exposes raw GL entry points as unsafe. The shader type
    // is a valid GL constant and the handle is deleted on the error path.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(|log| ShaderError::Compile { stage, log })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    if unsafe { gl.get_shader_compile_status(shader) } {
        Ok(shader)
    } else {
        let info = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::Compile {
            stage,
            log: format!("{}\n\n{info}", format_shader_source(source)),
        })
    }
}

/// Compiles both stages and links them into a program.
///
/// Shader handles are deleted after linking whether or not it succeeds;
/// the program keeps its own copies.
///
/// # Errors
///
/// Returns `ShaderError::Compile` if either stage fails to compile, or
/// `ShaderError::Link` if the program fails to link.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_stage(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid handle from compile_stage.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    // SAFETY: all handles below come from successful glow calls.
    let program = unsafe {
        match gl.create_program() {
            Ok(p) => p,
            Err(log) => {
                gl.delete_shader(vert);
                gl.delete_shader(frag);
                return Err(ShaderError::Link(log));
            }
        }
    };

    unsafe {
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        gl.detach_shader(program, vert);
        gl.detach_shader(program, frag);
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    if unsafe { gl.get_program_link_status(program) } {
        Ok(program)
    } else {
        let info = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ShaderError::Link(info))
    }
}

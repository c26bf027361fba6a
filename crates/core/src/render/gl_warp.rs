//! GPU implementation of the warp seam.
//!
//! Draws a fullscreen triangle that, per output pixel, reads the
//! displacement intensity, derives a polar offset from it, and samples
//! the luminance texture at the offset coordinate. The math matches
//! [`crate::warp::warp_source_uv`]; the CPU backend is the reference.
//!
//! Coordinates are defined in top-down image space. The vertex stage
//! flips `v_uv.y` so the fragment shader works in image space directly,
//! and read-back reverses rows to undo GL's bottom-up framebuffer
//! layout.

use glow::HasContext;

use super::shader::compile_program;
use super::target::ReadbackTarget;
use super::texture::{create_texture, upload_r8, TextureConfig};
use crate::error::EngineError;
use crate::field::{DispField, LumaField};
use crate::warp::WarpBackend;

/// Vertex stage: a VBO-less fullscreen triangle from `gl_VertexID`.
/// `v_uv` is emitted in top-down image space.
const WARP_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    vec2 corner = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    v_uv = vec2(corner.x, 1.0 - corner.y);
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Fragment stage: intensity doubles as warp angle and magnitude.
const WARP_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_luma;
uniform sampler2D u_disp;
uniform float u_amount;
out vec4 frag_color;
const float TAU = 6.283185307179586;
void main() {
    float intensity = texture(u_disp, v_uv).r;
    float theta = intensity * TAU;
    vec2 dir = vec2(sin(theta), cos(theta));
    vec2 src_uv = v_uv + dir * intensity * u_amount;
    float luma = texture(u_luma, src_uv).r;
    frag_color = vec4(vec3(luma), 1.0);
}
"#;

struct SizedTexture {
    handle: glow::Texture,
    width: u32,
    height: u32,
}

/// GPU warp backend built on glow.
///
/// Owns its GL context. Input textures and the read-back target are
/// cached and recreated only when the raster dimensions change, so the
/// steady-state per-frame cost is two uploads, one draw, and one
/// read-back.
pub struct GlWarp {
    gl: glow::Context,
    program: glow::Program,
    vao: glow::VertexArray,
    u_amount: Option<glow::UniformLocation>,
    luma_tex: Option<SizedTexture>,
    disp_tex: Option<SizedTexture>,
    target: Option<ReadbackTarget>,
    disp_bytes: Vec<u8>,
}

impl GlWarp {
    /// Compiles the warp program against the given context.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Gpu` if shader compilation, linking, or VAO
    /// creation fails. The caller is expected to fall back to the CPU
    /// backend or run without warping.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, EngineError> {
        let program = match compile_program(&gl, WARP_VERTEX_SHADER, WARP_FRAGMENT_SHADER) {
            Ok(program) => program,
            Err(e) => {
                log::error!("warp shader program rejected: {e}");
                return Err(EngineError::Gpu(e.to_string()));
            }
        };

        // SAFETY: program is a valid linked handle; uniform names match
        // the sources above.
        let (vao, u_amount) = unsafe {
            let vao = match gl.create_vertex_array() {
                Ok(vao) => vao,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(EngineError::Gpu(e));
                }
            };
            gl.use_program(Some(program));
            if let Some(loc) = gl.get_uniform_location(program, "u_luma") {
                gl.uniform_1_i32(Some(&loc), 0);
            }
            if let Some(loc) = gl.get_uniform_location(program, "u_disp") {
                gl.uniform_1_i32(Some(&loc), 1);
            }
            let u_amount = gl.get_uniform_location(program, "u_amount");
            gl.use_program(None);
            (vao, u_amount)
        };

        Ok(Self {
            gl,
            program,
            vao,
            u_amount,
            luma_tex: None,
            disp_tex: None,
            target: None,
            disp_bytes: Vec::new(),
        })
    }

    fn ensure_input(
        slot: &mut Option<SizedTexture>,
        gl: &glow::Context,
        config: TextureConfig,
    ) -> Result<glow::Texture, EngineError> {
        if let Some(tex) = slot {
            if tex.width == config.width && tex.height == config.height {
                return Ok(tex.handle);
            }
        }
        Self::drop_input(slot, gl);
        let handle = create_texture(gl, &config).map_err(EngineError::Gpu)?;
        *slot = Some(SizedTexture {
            handle,
            width: config.width,
            height: config.height,
        });
        Ok(handle)
    }

    #[allow(unsafe_code)]
    fn drop_input(slot: &mut Option<SizedTexture>, gl: &glow::Context) {
        if let Some(tex) = slot.take() {
            // SAFETY: the handle is valid and owned by this backend.
            unsafe { gl.delete_texture(tex.handle) };
        }
    }

    fn ensure_target(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if let Some(target) = &self.target {
            if target.width() == width && target.height() == height {
                return Ok(());
            }
        }
        if let Some(old) = self.target.take() {
            old.destroy(&self.gl);
        }
        log::debug!("warp read-back target resized to {width}x{height}");
        self.target = Some(
            ReadbackTarget::new(&self.gl, width, height).map_err(EngineError::Gpu)?,
        );
        Ok(())
    }

    /// Releases all GL resources. Explicit because GL handles carry no
    /// context-aware destructor.
    #[allow(unsafe_code)]
    pub fn destroy(mut self) {
        Self::drop_input(&mut self.luma_tex, &self.gl);
        Self::drop_input(&mut self.disp_tex, &self.gl);
        if let Some(target) = self.target.take() {
            target.destroy(&self.gl);
        }
        // SAFETY: both handles are valid and owned by this backend.
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_program(self.program);
        }
    }
}

impl WarpBackend for GlWarp {
    #[allow(unsafe_code)]
    fn warp(
        &mut self,
        luma: &LumaField,
        disp: &DispField,
        ripple_amount: f64,
    ) -> Result<LumaField, EngineError> {
        let out_w = disp.width() as u32;
        let out_h = disp.height() as u32;

        let luma_tex = Self::ensure_input(
            &mut self.luma_tex,
            &self.gl,
            TextureConfig::r8_linear(luma.width() as u32, luma.height() as u32),
        )?;
        let disp_tex = Self::ensure_input(
            &mut self.disp_tex,
            &self.gl,
            TextureConfig::r8_nearest(out_w, out_h),
        )?;
        self.ensure_target(out_w, out_h)?;

        upload_r8(
            &self.gl,
            luma_tex,
            luma.width() as u32,
            luma.height() as u32,
            luma.data(),
        );

        // The displacement buffer is quantized to bytes for upload, the
        // same precision the GL texture would carry anyway.
        self.disp_bytes.clear();
        self.disp_bytes.extend(
            disp.data()
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8),
        );
        upload_r8(&self.gl, disp_tex, out_w, out_h, &self.disp_bytes);

        let target = match &self.target {
            Some(t) => t,
            None => return Err(EngineError::Gpu("warp target missing".into())),
        };
        target.bind(&self.gl);

        // SAFETY: all handles are valid and the draw uses the VBO-less
        // fullscreen triangle, so no vertex attributes are read.
        unsafe {
            self.gl.use_program(Some(self.program));
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .uniform_1_f32(self.u_amount.as_ref(), ripple_amount as f32);

            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(luma_tex));
            self.gl.active_texture(glow::TEXTURE1);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(disp_tex));

            self.gl.disable(glow::BLEND);
            self.gl.draw_arrays(glow::TRIANGLES, 0, 3);

            self.gl.bind_vertex_array(None);
            self.gl.use_program(None);
        }

        let pixels = target.read_red_channel(&self.gl);
        LumaField::from_data(out_w as usize, out_h as usize, pixels)
    }
}

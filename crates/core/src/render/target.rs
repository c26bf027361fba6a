//! Off-screen render target with CPU read-back.
//!
//! The warp pass draws into a [`ReadbackTarget`] and immediately reads
//! the result back into a `Vec<u8>` for the CPU-side compositor. The
//! attachment is RGBA8; the warped luminance lives in the red channel.

use super::texture::{create_texture, TextureConfig};

/// A framebuffer with an RGBA8 color attachment that can be read back
/// into host memory.
pub struct ReadbackTarget {
    fbo: glow::Framebuffer,
    texture: glow::Texture,
    width: u32,
    height: u32,
}

impl ReadbackTarget {
    /// Creates the framebuffer, attaches a fresh RGBA8 texture, and
    /// verifies completeness.
    ///
    /// # Errors
    ///
    /// Returns the driver's error string if allocation fails or the
    /// framebuffer is incomplete.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, String> {
        use glow::HasContext;

        let texture = create_texture(gl, &TextureConfig::rgba8(width, height))?;

        // SAFETY: glow exposes raw GL entry points as unsafe. Handles are
        // deleted on every error path.
        let fbo = match unsafe { gl.create_framebuffer() } {
            Ok(fbo) => fbo,
            Err(e) => {
                unsafe { gl.delete_texture(texture) };
                return Err(e);
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(fbo);
                gl.delete_texture(texture);
                return Err(format!("framebuffer incomplete: status 0x{status:04X}"));
            }
        }

        Ok(Self {
            fbo,
            texture,
            width,
            height,
        })
    }

    /// Binds the framebuffer for drawing and sets the viewport to the
    /// attachment size.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid handle from new().
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    /// Reads the red channel of the attachment back into host memory,
    /// one byte per pixel, rows ordered top-down.
    ///
    /// GL reads rows bottom-up from the framebuffer origin, so the rows
    /// are reversed here to match the engine's image-space layout.
    #[allow(unsafe_code)]
    pub fn read_red_channel(&self, gl: &glow::Context) -> Vec<u8> {
        use glow::HasContext;

        let w = self.width as usize;
        let h = self.height as usize;
        let mut rgba = vec![0u8; w * h * 4];

        // SAFETY: the buffer covers width * height RGBA bytes and the
        // framebuffer is complete.
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            gl.read_pixels(
                0,
                0,
                self.width as i32,
                self.height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut rgba)),
            );
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, 4);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }

        let mut out = vec![0u8; w * h];
        for y in 0..h {
            let src_row = h - 1 - y;
            for x in 0..w {
                out[y * w + x] = rgba[(src_row * w + x) * 4];
            }
        }
        out
    }

    /// Width of the attachment in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the attachment in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Releases the framebuffer and texture. GL objects have no Rust
    /// destructor tied to the context, so cleanup is explicit.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: both handles are valid and owned by this target.
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.texture);
        }
    }
}

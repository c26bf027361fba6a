//! Texture helpers for the warp pass.
//!
//! The pass uses two kinds of textures: single-channel R8 inputs (the
//! luminance field and the quantized displacement buffer) and an RGBA8
//! color attachment for the read-back target. Everything is byte-typed;
//! there is no float framebuffer requirement.

/// Parameters for a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// GL internal format (`glow::R8` or `glow::RGBA8`).
    pub internal_format: u32,
    /// Min/mag filter (`glow::LINEAR` or `glow::NEAREST`).
    pub filter: u32,
}

impl TextureConfig {
    /// Single-channel byte texture with LINEAR filtering. Used for the
    /// luminance field, where the warp relies on hardware bilinear
    /// sampling.
    pub fn r8_linear(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            internal_format: glow::R8,
            filter: glow::LINEAR,
        }
    }

    /// Single-channel byte texture with NEAREST filtering. Used for the
    /// displacement buffer, sampled only at its own texel centers.
    pub fn r8_nearest(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            internal_format: glow::R8,
            filter: glow::NEAREST,
        }
    }

    /// Four-channel byte texture with NEAREST filtering. Used as the
    /// color attachment of the read-back target.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            internal_format: glow::RGBA8,
            filter: glow::NEAREST,
        }
    }

    /// The matching upload format for `internal_format`.
    pub fn upload_format(&self) -> u32 {
        match self.internal_format {
            glow::R8 => glow::RED,
            _ => glow::RGBA,
        }
    }
}

/// Creates and allocates a texture per `config`.
///
/// Wrap mode is `CLAMP_TO_EDGE` on both axes: out-of-range warp samples
/// must clamp to the edge texel, never wrap.
///
/// # Errors
///
/// Returns the driver's error string if the texture cannot be created.
#[allow(unsafe_code)]
pub fn create_texture(gl: &glow::Context, config: &TextureConfig) -> Result<glow::Texture, String> {
    use glow::HasContext;

    // SAFETY: glow exposes raw GL entry points as unsafe. All parameters
    // are valid GL constants derived from TextureConfig.
    let texture = unsafe { gl.create_texture()? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            config.filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            config.filter as i32,
        );

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            config.internal_format as i32,
            config.width as i32,
            config.height as i32,
            0,
            config.upload_format(),
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(None),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

/// Uploads a full frame of single-channel bytes into an R8 texture.
///
/// Rows are tightly packed, so unpack alignment is dropped to 1 for the
/// upload (the GL default of 4 would skew odd-width rasters).
#[allow(unsafe_code)]
pub fn upload_r8(
    gl: &glow::Context,
    texture: glow::Texture,
    width: u32,
    height: u32,
    data: &[u8],
) {
    use glow::HasContext;

    debug_assert_eq!(data.len(), (width * height) as usize);

    // SAFETY: texture is a valid handle and data covers width * height
    // tightly packed bytes.
    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_sub_image_2d(
            glow::TEXTURE_2D,
            0,
            0,
            0,
            width as i32,
            height as i32,
            glow::RED,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(data)),
        );
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
        gl.bind_texture(glow::TEXTURE_2D, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r8_linear_config_uses_red_channel_and_linear_filter() {
        let config = TextureConfig::r8_linear(640, 480);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.internal_format, glow::R8);
        assert_eq!(config.filter, glow::LINEAR);
        assert_eq!(config.upload_format(), glow::RED);
    }

    #[test]
    fn r8_nearest_config_uses_nearest_filter() {
        let config = TextureConfig::r8_nearest(64, 64);
        assert_eq!(config.internal_format, glow::R8);
        assert_eq!(config.filter, glow::NEAREST);
    }

    #[test]
    fn rgba8_config_uploads_rgba() {
        let config = TextureConfig::rgba8(32, 32);
        assert_eq!(config.internal_format, glow::RGBA8);
        assert_eq!(config.upload_format(), glow::RGBA);
    }

    #[test]
    fn texture_config_is_copy() {
        let config = TextureConfig::r8_linear(8, 8);
        let copy = config;
        assert_eq!(config, copy);
    }
}

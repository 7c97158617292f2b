//! Texture upload for decoded raster assets.

use glow::HasContext;

use crate::assets::RasterImage;
use crate::error::LayerError;

/// Filtering mode for an uploaded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest min/mag. Used for encoded data rasters where
    /// interpolation between texels would mix unrelated values.
    Nearest,
    /// Nearest min, linear mag. Used for the height/velocity frames so
    /// magnification stays smooth without mipmap bleed.
    NearestLinear,
}

impl TextureFilter {
    fn min_mag(self) -> (u32, u32) {
        match self {
            TextureFilter::Nearest => (glow::NEAREST, glow::NEAREST),
            TextureFilter::NearestLinear => (glow::NEAREST, glow::LINEAR),
        }
    }
}

/// Uploads an RGBA8 raster as a clamped, non-mipmapped 2D texture.
pub fn create_raster_texture(
    gl: &glow::Context,
    raster: &RasterImage,
    filter: TextureFilter,
) -> Result<glow::Texture, LayerError> {
    let (min_filter, mag_filter) = filter.min_mag();

    unsafe {
        let texture = gl
            .create_texture()
            .map_err(|e| LayerError::ResourceLoad(format!("GPU texture allocation failed: {}", e)))?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            min_filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            mag_filter as i32,
        );
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

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            raster.width as i32,
            raster.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(&raster.pixels)),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

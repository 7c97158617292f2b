//! Channel-bridged asset loading.
//!
//! Shader sources and raster images are fetched asynchronously during
//! layer setup, but the host drives rendering through a synchronous
//! per-frame callback. This module bridges the two with an mpsc
//! channel: requests spawn an async task (web) or a thread (native),
//! and the layer polls for completed results each render call without
//! ever blocking.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::error::LayerError;

/// A decoded RGBA8 raster ready for texture upload.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA bytes, row-major from the top-left.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, LayerError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(LayerError::ResourceLoad(format!(
                "raster byte count {} does not match {}x{} RGBA",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// A successfully loaded asset.
#[derive(Debug, Clone)]
pub enum AssetPayload {
    Text(String),
    Raster(RasterImage),
}

/// One completed load: the requester's key plus the outcome.
pub type AssetReply = (String, Result<AssetPayload, LayerError>);

/// Channel-based asset loader.
///
/// Loads are async but `render` is synchronous; results are passed
/// back through the channel and collected with [`AssetChannel::try_recv`]
/// on the render thread. Dropping the channel after the owning layer is
/// removed simply discards any in-flight completion.
pub struct AssetChannel {
    sender: Sender<AssetReply>,
    receiver: Receiver<AssetReply>,
}

impl Default for AssetChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns an async fetch of a text asset (shader source, manifest).
    pub fn request_text(&self, key: impl Into<String>, url: impl Into<String>) {
        let key = key.into();
        let url = url.into();
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = web::fetch_text(&url).await.map(AssetPayload::Text);
            let _ = sender.send((key, result));
        });

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = native::load_text(&url).map(AssetPayload::Text);
            let _ = sender.send((key, result));
        });
    }

    /// Spawns an async fetch of a raster asset, decoded to RGBA8.
    pub fn request_image(&self, key: impl Into<String>, url: impl Into<String>) {
        let key = key.into();
        let url = url.into();
        let sender = self.sender.clone();

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = web::fetch_image(&url).await.map(AssetPayload::Raster);
            let _ = sender.send((key, result));
        });

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = native::load_image(&url).map(AssetPayload::Raster);
            let _ = sender.send((key, result));
        });
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<AssetReply> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use super::{LayerError, RasterImage};

    fn load_err(url: &str, detail: impl std::fmt::Debug) -> LayerError {
        LayerError::ResourceLoad(format!("{}: {:?}", url, detail))
    }

    pub async fn fetch_text(url: &str) -> Result<String, LayerError> {
        let window = web_sys::window()
            .ok_or_else(|| LayerError::ResourceLoad("no window available".to_string()))?;

        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| load_err(url, e))?;
        let response: web_sys::Response =
            response.dyn_into().map_err(|e| load_err(url, e))?;

        if !response.ok() {
            return Err(LayerError::ResourceLoad(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        let text = JsFuture::from(response.text().map_err(|e| load_err(url, e))?)
            .await
            .map_err(|e| load_err(url, e))?;
        text.as_string()
            .ok_or_else(|| LayerError::ResourceLoad(format!("{}: response was not text", url)))
    }

    pub async fn fetch_image(url: &str) -> Result<RasterImage, LayerError> {
        let image =
            web_sys::HtmlImageElement::new().map_err(|e| load_err(url, e))?;
        image.set_cross_origin(Some("anonymous"));
        image.set_src(url);

        JsFuture::from(image.decode())
            .await
            .map_err(|e| load_err(url, e))?;

        let width = image.natural_width();
        let height = image.natural_height();

        // Decode through a scratch 2D canvas to get raw RGBA bytes.
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| LayerError::ResourceLoad("no document available".to_string()))?;
        let canvas: web_sys::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| load_err(url, e))?
            .dyn_into()
            .map_err(|e| load_err(url, e))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: web_sys::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| load_err(url, e))?
            .ok_or_else(|| LayerError::ResourceLoad(format!("{}: no 2d context", url)))?
            .dyn_into()
            .map_err(|e| load_err(url, e))?;
        context
            .draw_image_with_html_image_element(&image, 0.0, 0.0)
            .map_err(|e| load_err(url, e))?;

        let data = context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|e| load_err(url, e))?;

        RasterImage::new(width, height, data.data().0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{LayerError, RasterImage};

    pub fn load_text(path: &str) -> Result<String, LayerError> {
        std::fs::read_to_string(path)
            .map_err(|e| LayerError::ResourceLoad(format!("{}: {}", path, e)))
    }

    pub fn load_image(path: &str) -> Result<RasterImage, LayerError> {
        let decoded = image::open(path)
            .map_err(|e| LayerError::ResourceLoad(format!("{}: {}", path, e)))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        RasterImage::new(width, height, decoded.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recv_blocking(channel: &AssetChannel) -> AssetReply {
        for _ in 0..200 {
            if let Some(reply) = channel.try_recv() {
                return reply;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("asset load did not complete");
    }

    #[test]
    fn test_raster_rejects_mismatched_bytes() {
        assert!(matches!(
            RasterImage::new(2, 2, vec![0u8; 15]),
            Err(LayerError::ResourceLoad(_))
        ));
        assert!(RasterImage::new(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_text_load_roundtrip() {
        let dir = std::env::temp_dir().join("mapscape_fetch_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("shader.vert");
        std::fs::write(&path, "void main() {}").unwrap();

        let channel = AssetChannel::new();
        channel.request_text("vertex", path.to_string_lossy().to_string());

        let (key, result) = recv_blocking(&channel);
        assert_eq!(key, "vertex");
        match result.unwrap() {
            AssetPayload::Text(text) => assert_eq!(text, "void main() {}"),
            other => panic!("expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_asset_reports_resource_error() {
        let channel = AssetChannel::new();
        channel.request_text("vertex", "/definitely/not/a/real/path.vert");

        let (key, result) = recv_blocking(&channel);
        assert_eq!(key, "vertex");
        assert!(matches!(result, Err(LayerError::ResourceLoad(_))));
    }

    #[test]
    fn test_late_completion_is_discarded_on_drop() {
        // Dropping the receiver while a load is in flight must not
        // panic the worker; the send simply fails.
        let channel = AssetChannel::new();
        channel.request_text("vertex", "/definitely/not/a/real/path.vert");
        drop(channel);
        std::thread::sleep(Duration::from_millis(30));
    }
}

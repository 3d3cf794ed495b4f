//! QR code PNG renderer

use crate::config::schema::ArtifactsConfig;
use crate::error::{TesseraError, TesseraResult};
use crate::render::Renderer;
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

/// QR error correction strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Renders content as a greyscale QR code PNG
#[derive(Debug, Clone)]
pub struct QrRenderer {
    pub width: u32,
    pub height: u32,
    pub error_correction: ErrorCorrection,
    pub quiet_zone: bool,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            error_correction: ErrorCorrection::M,
            quiet_zone: true,
        }
    }
}

impl QrRenderer {
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            error_correction: config.error_correction,
            quiet_zone: config.quiet_zone,
        }
    }
}

impl Renderer for QrRenderer {
    fn render(&self, content: &str) -> TesseraResult<Vec<u8>> {
        let code =
            QrCode::with_error_correction_level(content.as_bytes(), self.error_correction.into())
                .map_err(|e| TesseraError::Render(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.width, self.height)
            .quiet_zone(self.quiet_zone)
            .build();

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| TesseraError::Render(e.to_string()))?;

        debug!(
            "Rendered {}x{} QR code ({} bytes)",
            image.width(),
            image.height(),
            png.len()
        );
        Ok(png)
    }
}

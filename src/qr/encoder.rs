//! QR code encoder

use crate::config::QrOptions;
use crate::error::Result;
use crate::qr::QrRequest;
use image::{DynamicImage, Luma};
use qrcode::QrCode;

/// Renders requests into black-on-white grayscale images
pub struct QrEncoder {
    module_size: u32,
    quiet_zone: bool,
}

impl QrEncoder {
    /// Encoder with 10px modules and the standard quiet zone
    pub fn new() -> Self {
        Self::from_options(&QrOptions::default())
    }

    /// Encoder following the configured rendering options
    pub fn from_options(options: &QrOptions) -> Self {
        Self {
            module_size: options.module_size.max(1),
            quiet_zone: options.quiet_zone,
        }
    }

    /// Encode the request payload at the requested level.
    ///
    /// The smallest symbol version that fits the payload is chosen.
    pub fn encode(&self, request: &QrRequest) -> Result<DynamicImage> {
        let code = QrCode::with_error_correction_level(
            request.payload.as_bytes(),
            request.level.to_ec_level(),
        )?;

        tracing::debug!(
            version = ?code.version(),
            modules = code.width(),
            level = %request.level,
            "Encoded QR payload"
        );

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .quiet_zone(self.quiet_zone)
            .dark_color(Luma([0u8]))
            .light_color(Luma([255u8]))
            .build();

        Ok(DynamicImage::ImageLuma8(image))
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

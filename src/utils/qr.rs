//! QR code rendering
//!
//! Check-in tokens are encoded at error-correction level High and rendered
//! as PNG, either raw (email attachment) or as a data URL (API response).

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::constants::QR_CODE_WIDTH;

/// QR rendering errors
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// A rendered QR code
#[derive(Debug, Clone)]
pub struct QrImage {
    pub png: Vec<u8>,
}

impl QrImage {
    /// `data:image/png;base64,...` for direct use in an `<img>` tag
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Render `data` as a PNG QR code
pub fn render_png(data: &str) -> Result<QrImage, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_CODE_WIDTH, QR_CODE_WIDTH)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(QrImage { png })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_render_png_produces_png() {
        let qr = render_png("0123456789abcdef0123456789abcdef").unwrap();
        assert!(qr.png.starts_with(PNG_SIGNATURE));

        let decoded = image::load_from_memory(&qr.png).unwrap();
        assert!(decoded.width() >= QR_CODE_WIDTH);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[test]
    fn test_data_url_prefix() {
        let qr = render_png("token").unwrap();
        let url = qr.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(&url["data:image/png;base64,".len()..], STANDARD.encode(&qr.png));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("QR encoding error: {0}")]
    Qr(#[from] qrcode::types::QrError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid raster configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No rows to export")]
    NoValidRows,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout error: {0}")]
    Layout(#[from] card_layout::LayoutError),
    #[error("Raster error: {0}")]
    Raster(#[from] card_raster::RasterError),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ExportError>;

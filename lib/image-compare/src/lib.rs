pub mod compose;
pub mod widget;

pub use compose::{compose, compose_from_bytes};
pub use widget::{CompareView, Divider, DragCapture, ImageCompare, download_file_name};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image resize error: {0}")]
    ImageResize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    ImageBufferError(#[from] fast_image_resize::ImageBufferError),
}

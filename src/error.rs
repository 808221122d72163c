use std::path::PathBuf;

/// Failure modes of the conversion pipeline.
///
/// Structural problems (missing annotation fields, classes absent from the
/// label map, unregistered image formats) abort the run. Locally recoverable
/// conditions such as malformed label lines never surface here; they are
/// absorbed where they occur.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required field `{field}` in {path:?}")]
    MissingField { field: &'static str, path: PathBuf },

    #[error("class `{class}` is not present in the label map")]
    UnknownClass { class: String },

    #[error("unsupported image format: {path:?}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse annotation {path:?}: {source}")]
    Xml {
        path: PathBuf,
        source: serde_xml_rs::Error,
    },

    #[error("malformed value `{token}` in {path:?}")]
    MalformedValue { token: String, path: PathBuf },

    #[error("failed to decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write record stream: {0}")]
    Record(#[from] tfrecord::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;

// A bounding box in absolute pixel coordinates, as declared by a VOC
// annotation. Invariants: xmin < xmax, ymin < ymax, bounded by the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBox {
    pub label: String,
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

// A bounding box in normalized [0, 1] corner coordinates. Kept as a separate
// type from PixelBox so the two coordinate spaces never mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Dimensions and identity of one source image; the normalization divisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// A normalized box paired with its class token as it appeared in the label
/// file. The token is kept as an opaque string and is only resolved to a
/// numeric id when records are assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBox {
    pub label: String,
    pub bbox: NormBox,
}

/// Join structure between images and their converted annotations, keyed by
/// filename stem. Duplicate stems resolve last-write-wins.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    entries: HashMap<String, Vec<LabeledBox>>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the boxes for a stem, replacing any previous entry.
    pub fn insert(&mut self, stem: String, boxes: Vec<LabeledBox>) {
        self.entries.insert(stem, boxes);
    }

    pub fn get(&self, stem: &str) -> Option<&[LabeledBox]> {
        self.entries.get(stem).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Image formats accepted by the record writer. Every extension outside this
// registry is an error rather than a silent fallback tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Resolve the format tag from a file extension.
    pub fn from_extension(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The tag stored in the `image/format` feature.
    pub fn tag(&self) -> &'static [u8] {
        match self {
            ImageFormat::Jpeg => b"jpeg",
            ImageFormat::Png => b"png",
        }
    }
}

//! Pascal VOC to YOLO and TFRecord converter
//!
//! This library converts object-detection ground truth between three
//! representations: per-image Pascal VOC XML annotations with pixel-space
//! boxes, normalized YOLO label files, and a single TFRecord stream pairing
//! images with their normalized annotations for training.

pub mod config;
pub mod convert;
pub mod error;
pub mod label_map;
pub mod record;
pub mod types;
pub mod utils;
pub mod voc;
pub mod yolo;

// Re-export commonly used types and functions
pub use config::{Args, Command};
pub use convert::convert_labels;
pub use error::{Error, Result};
pub use label_map::LabelMap;
pub use record::{build_example, write_records};
pub use types::{AnnotationIndex, ImageFormat, ImageMeta, LabeledBox, NormBox, PixelBox};
pub use voc::parse_annotation;
pub use yolo::{format_yolo_lines, load_annotation_index, parse_label_file, parse_label_line};

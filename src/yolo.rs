//! YOLO label format conversion, in both directions.
//!
//! Forward: pixel-space VOC boxes become normalized center-format lines
//! (`<class_index> <cx> <cy> <w> <h>`, six decimals). Reverse: label lines
//! become normalized corner boxes keyed by file stem. The class token read
//! back in the reverse direction stays an opaque string; it is not mapped
//! back to a class name.

use glob::glob;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{AnnotationIndex, ImageMeta, LabeledBox, NormBox, PixelBox};

/// Convert pixel-space boxes to YOLO center-format lines.
///
/// The class index is the label's position in `classes`. Lines are joined by
/// a newline with no trailing newline; zero boxes produce an empty string.
pub fn format_yolo_lines(meta: &ImageMeta, boxes: &[PixelBox], classes: &[String]) -> String {
    let width = meta.width as f64;
    let height = meta.height as f64;

    let lines: Vec<String> = boxes
        .iter()
        .filter_map(|bbox| {
            let class_id = classes.iter().position(|class| class == &bbox.label)?;
            let x_center = (bbox.xmin as f64 + bbox.xmax as f64) / 2.0 / width;
            let y_center = (bbox.ymin as f64 + bbox.ymax as f64) / 2.0 / height;
            let bbox_width = (bbox.xmax as f64 - bbox.xmin as f64) / width;
            let bbox_height = (bbox.ymax as f64 - bbox.ymin as f64) / height;
            Some(format!(
                "{} {:.6} {:.6} {:.6} {:.6}",
                class_id, x_center, y_center, bbox_width, bbox_height
            ))
        })
        .collect();

    lines.join("\n")
}

/// Parse one label line into a normalized corner box.
///
/// Lines without exactly five whitespace-separated tokens are skipped and
/// reported as `Ok(None)`. A five-token line with an unparseable coordinate
/// is a structural failure.
pub fn parse_label_line(line: &str, path: &Path) -> Result<Option<LabeledBox>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 5 {
        return Ok(None);
    }

    let mut values = [0f64; 4];
    for (value, token) in values.iter_mut().zip(&tokens[1..]) {
        *value = token.parse().map_err(|_| Error::MalformedValue {
            token: token.to_string(),
            path: path.to_path_buf(),
        })?;
    }
    let [x_center, y_center, width, height] = values;

    Ok(Some(LabeledBox {
        label: tokens[0].to_string(),
        bbox: NormBox {
            xmin: x_center - width / 2.0,
            ymin: y_center - height / 2.0,
            xmax: x_center + width / 2.0,
            ymax: y_center + height / 2.0,
        },
    }))
}

/// Parse a whole label file, skipping malformed lines.
pub fn parse_label_file(content: &str, path: &Path) -> Result<Vec<LabeledBox>> {
    let mut boxes = Vec::new();
    for line in content.lines() {
        if let Some(labeled) = parse_label_line(line, path)? {
            boxes.push(labeled);
        }
    }
    Ok(boxes)
}

/// Load every `.txt` label file under `labels_dir` into an annotation index
/// keyed by file stem.
pub fn load_annotation_index(labels_dir: &Path) -> Result<AnnotationIndex> {
    let pattern = format!("{}/*.txt", labels_dir.display());
    let mut index = AnnotationIndex::new();

    for entry in glob(&pattern).expect("Failed to read label glob pattern") {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to read label file entry: {:?}", e);
                continue;
            }
        };
        let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        let content = fs::read_to_string(&path)?;
        let boxes = parse_label_file(&content, &path)?;
        index.insert(stem, boxes);
    }

    Ok(index)
}

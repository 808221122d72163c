//! VOC to YOLO batch conversion driver.

use glob::glob;
use log::info;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::utils::create_progress_bar;
use crate::voc::parse_annotation;
use crate::yolo::format_yolo_lines;

/// Convert every `.xml` annotation under `xml_dir` into a YOLO label file
/// under `label_dir` with the same stem.
///
/// `classes` is the ordered allow-list: objects outside it are dropped, and
/// a label's class index is its position in the list. An annotation with no
/// surviving objects still produces its (empty) label file. Returns the
/// number of annotations converted.
pub fn convert_labels(xml_dir: &Path, label_dir: &Path, classes: &[String]) -> Result<usize> {
    fs::create_dir_all(label_dir)?;

    let pattern = format!("{}/*.xml", xml_dir.display());
    let xml_paths: Vec<_> = glob(&pattern)
        .expect("Failed to read XML glob pattern")
        .filter_map(|entry| entry.ok())
        .collect();

    let pb = create_progress_bar(xml_paths.len() as u64, "Labels");

    let mut converted = 0;
    for xml_path in &xml_paths {
        let (meta, boxes) = parse_annotation(xml_path, classes)?;
        let lines = format_yolo_lines(&meta, &boxes, classes);

        let stem = xml_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let txt_path = label_dir.join(stem).with_extension("txt");
        fs::write(&txt_path, lines)?;
        converted += 1;
        pb.inc(1);
    }

    pb.finish_with_message("Label conversion complete");
    info!(
        "Converted {} XML annotations from {} to YOLO labels in {}",
        converted,
        xml_dir.display(),
        label_dir.display()
    );
    Ok(converted)
}

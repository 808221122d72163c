//! TFRecord dataset assembly.
//!
//! Joins every image under `<root>/images/` with its converted annotations
//! (by filename stem) and the label map, builds one `tf.train.Example` per
//! image, and appends it to a single record stream. The stream has no index;
//! consumers scan it sequentially in the order records were appended.

use image::GenericImageView;
use log::info;
use std::fs;
use std::path::Path;

use glob::glob;
use tfrecord::protobuf::{feature::Kind, BytesList, Example, Feature, Features, FloatList, Int64List};
use tfrecord::{ExampleWriter, RecordWriter};

use crate::error::{Error, Result};
use crate::label_map::LabelMap;
use crate::types::{AnnotationIndex, ImageFormat, ImageMeta, LabeledBox};
use crate::utils::create_progress_bar;

fn bytes_feature(values: Vec<Vec<u8>>) -> Feature {
    Feature {
        kind: Some(Kind::BytesList(BytesList { value: values })),
    }
}

fn float_feature(values: Vec<f32>) -> Feature {
    Feature {
        kind: Some(Kind::FloatList(FloatList { value: values })),
    }
}

fn int64_feature(values: Vec<i64>) -> Feature {
    Feature {
        kind: Some(Kind::Int64List(Int64List { value: values })),
    }
}

/// Assemble one record from an image and its normalized boxes.
///
/// The six per-object sequences always share the same length; an image with
/// no ground truth produces a record whose object arrays are all empty.
/// Resolving a class token that is absent from the label map is fatal.
pub fn build_example(
    meta: &ImageMeta,
    encoded: Vec<u8>,
    format: ImageFormat,
    boxes: &[LabeledBox],
    label_map: &LabelMap,
) -> Result<Example> {
    let mut xmins = Vec::with_capacity(boxes.len());
    let mut xmaxs = Vec::with_capacity(boxes.len());
    let mut ymins = Vec::with_capacity(boxes.len());
    let mut ymaxs = Vec::with_capacity(boxes.len());
    let mut classes_text = Vec::with_capacity(boxes.len());
    let mut classes = Vec::with_capacity(boxes.len());

    for labeled in boxes {
        xmins.push(labeled.bbox.xmin as f32);
        xmaxs.push(labeled.bbox.xmax as f32);
        ymins.push(labeled.bbox.ymin as f32);
        ymaxs.push(labeled.bbox.ymax as f32);
        classes_text.push(labeled.label.as_bytes().to_vec());
        classes.push(label_map.resolve(&labeled.label)?);
    }

    let filename = meta.filename.as_bytes().to_vec();
    let feature = [
        ("image/height", int64_feature(vec![meta.height as i64])),
        ("image/width", int64_feature(vec![meta.width as i64])),
        ("image/filename", bytes_feature(vec![filename.clone()])),
        ("image/source_id", bytes_feature(vec![filename])),
        ("image/encoded", bytes_feature(vec![encoded])),
        ("image/format", bytes_feature(vec![format.tag().to_vec()])),
        ("image/object/bbox/xmin", float_feature(xmins)),
        ("image/object/bbox/xmax", float_feature(xmaxs)),
        ("image/object/bbox/ymin", float_feature(ymins)),
        ("image/object/bbox/ymax", float_feature(ymaxs)),
        ("image/object/class/text", bytes_feature(classes_text)),
        ("image/object/class/label", int64_feature(classes)),
    ]
    .into_iter()
    .map(|(key, feature)| (key.to_string(), feature))
    .collect();

    Ok(Example {
        features: Some(Features { feature }),
    })
}

/// Decode an image file into its metadata and a canonical raw RGB encoding.
fn load_image(path: &Path) -> Result<(ImageMeta, Vec<u8>, ImageFormat)> {
    let format = ImageFormat::from_extension(path)?;
    let bytes = fs::read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = img.dimensions();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    Ok((
        ImageMeta {
            filename,
            width,
            height,
        },
        img.to_rgb8().into_raw(),
        format,
    ))
}

/// Write one record per image under `<images_path>/images/` to `output_path`,
/// joining images to `index` by filename stem. An image without an index
/// entry still gets a record, with all object arrays empty.
///
/// The writer is owned by this function and released on every exit path; a
/// failure partway through leaves the records appended so far in place.
/// Returns the number of records written.
pub fn write_records(
    images_path: &Path,
    index: &AnnotationIndex,
    label_map: &LabelMap,
    output_path: &Path,
) -> Result<usize> {
    let pattern = format!("{}/images/*", images_path.display());
    let image_paths: Vec<_> = glob(&pattern)
        .expect("Failed to read image glob pattern")
        .filter_map(|entry| entry.ok())
        .collect();

    info!(
        "Packing {} images into {}",
        image_paths.len(),
        output_path.display()
    );
    let mut writer: ExampleWriter<_> = RecordWriter::create(output_path)?;
    let pb = create_progress_bar(image_paths.len() as u64, "Records");

    let mut written = 0;
    for image_path in &image_paths {
        let (meta, encoded, format) = load_image(image_path)?;

        let stem = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let boxes = index.get(stem).unwrap_or(&[]);

        let example = build_example(&meta, encoded, format, boxes, label_map)?;
        writer.send(example)?;
        written += 1;
        pb.inc(1);
    }

    pb.finish_with_message("Record writing complete");
    Ok(written)
}

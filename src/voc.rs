//! Pascal VOC annotation parsing.
//!
//! One XML file describes one image: its pixel dimensions and zero or more
//! `object` entries carrying a class name and a pixel-space bounding box.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ImageMeta, PixelBox};

// Raw deserialization targets. Every field the pipeline requires is optional
// here so that absence is reported as a MissingField error instead of an
// opaque serde failure.
#[derive(Debug, Deserialize)]
struct RawAnnotation {
    filename: Option<String>,
    size: Option<RawSize>,
    #[serde(rename = "object", default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawSize {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    name: Option<String>,
    bndbox: Option<RawBndBox>,
}

#[derive(Debug, Deserialize)]
struct RawBndBox {
    xmin: Option<u32>,
    ymin: Option<u32>,
    xmax: Option<u32>,
    ymax: Option<u32>,
}

fn require<T>(value: Option<T>, field: &'static str, path: &Path) -> Result<T> {
    value.ok_or_else(|| Error::MissingField {
        field,
        path: path.to_path_buf(),
    })
}

/// Parse one VOC XML file into image metadata and its pixel-space boxes.
///
/// Objects whose class name is not in `classes` are silently dropped; an
/// annotation where nothing survives the filter yields an empty box list.
/// Missing `size` or `bndbox` fields are fatal for the file. Source object
/// order is preserved.
pub fn parse_annotation(path: &Path, classes: &[String]) -> Result<(ImageMeta, Vec<PixelBox>)> {
    let content = fs::read_to_string(path)?;
    let raw: RawAnnotation = serde_xml_rs::from_str(&content).map_err(|source| Error::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let size = require(raw.size, "size", path)?;
    let width = require(size.width, "size.width", path)?;
    let height = require(size.height, "size.height", path)?;
    if width == 0 || height == 0 {
        return Err(Error::MalformedValue {
            token: format!("size {}x{}", width, height),
            path: path.to_path_buf(),
        });
    }

    let filename = raw.filename.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    });

    let mut boxes = Vec::new();
    for object in raw.objects {
        let name = require(object.name, "object.name", path)?;
        if !classes.iter().any(|class| class == &name) {
            continue;
        }
        let bndbox = require(object.bndbox, "object.bndbox", path)?;
        boxes.push(PixelBox {
            label: name,
            xmin: require(bndbox.xmin, "bndbox.xmin", path)?,
            ymin: require(bndbox.ymin, "bndbox.ymin", path)?,
            xmax: require(bndbox.xmax, "bndbox.xmax", path)?,
            ymax: require(bndbox.ymax, "bndbox.ymax", path)?,
        });
    }

    Ok((
        ImageMeta {
            filename,
            width,
            height,
        },
        boxes,
    ))
}

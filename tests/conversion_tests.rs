use std::fs;
use std::path::Path;

use voc2record::{
    convert_labels, format_yolo_lines, load_annotation_index, parse_annotation, parse_label_file,
    parse_label_line, write_records, Error, LabelMap,
};

const CAR1_XML: &str = r#"<annotation>
    <folder>images</folder>
    <filename>car1.jpg</filename>
    <size>
        <width>1000</width>
        <height>800</height>
        <depth>3</depth>
    </size>
    <object>
        <name>licence</name>
        <pose>Unspecified</pose>
        <bndbox>
            <xmin>100</xmin>
            <ymin>200</ymin>
            <xmax>300</xmax>
            <ymax>400</ymax>
        </bndbox>
    </object>
    <object>
        <name>car</name>
        <bndbox>
            <xmin>10</xmin>
            <ymin>20</ymin>
            <xmax>900</xmax>
            <ymax>700</ymax>
        </bndbox>
    </object>
</annotation>
"#;

const LICENCE_MAP: &str = "item {\n  id: 0\n  name: 'licence'\n}\n";

fn licence_classes() -> Vec<String> {
    vec!["licence".to_string()]
}

#[test]
fn test_parse_annotation_applies_allow_list() {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("car1.xml");
    fs::write(&xml_path, CAR1_XML).unwrap();

    let (meta, boxes) = parse_annotation(&xml_path, &licence_classes()).unwrap();
    assert_eq!(meta.width, 1000);
    assert_eq!(meta.height, 800);
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].label, "licence");
    assert_eq!((boxes[0].xmin, boxes[0].ymax), (100, 400));
}

#[test]
fn test_parse_annotation_missing_size_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("bad.xml");
    fs::write(&xml_path, "<annotation><filename>bad.jpg</filename></annotation>").unwrap();

    let result = parse_annotation(&xml_path, &licence_classes());
    assert!(matches!(result, Err(Error::MissingField { .. })));
}

#[test]
fn test_forward_line_matches_reference_output() {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("car1.xml");
    fs::write(&xml_path, CAR1_XML).unwrap();

    let (meta, boxes) = parse_annotation(&xml_path, &licence_classes()).unwrap();
    let lines = format_yolo_lines(&meta, &boxes, &licence_classes());
    assert_eq!(lines, "0 0.200000 0.375000 0.200000 0.250000");
}

#[test]
fn test_forward_values_stay_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("car1.xml");
    fs::write(&xml_path, CAR1_XML).unwrap();

    let classes = vec!["licence".to_string(), "car".to_string()];
    let (meta, boxes) = parse_annotation(&xml_path, &classes).unwrap();
    let lines = format_yolo_lines(&meta, &boxes, &classes);

    for line in lines.lines() {
        for token in line.split_whitespace().skip(1) {
            let value: f64 = token.parse().unwrap();
            assert!((0.0..=1.0).contains(&value), "{} out of range", value);
        }
    }
}

#[test]
fn test_round_trip_recovers_normalized_corners() {
    let meta = voc2record::ImageMeta {
        filename: "car1.jpg".to_string(),
        width: 1000,
        height: 800,
    };
    let boxes = vec![voc2record::PixelBox {
        label: "licence".to_string(),
        xmin: 100,
        ymin: 200,
        xmax: 300,
        ymax: 400,
    }];
    let lines = format_yolo_lines(&meta, &boxes, &licence_classes());
    let labeled = parse_label_line(&lines, Path::new("car1.txt"))
        .unwrap()
        .unwrap();

    assert!((labeled.bbox.xmin - 100.0 / 1000.0).abs() < 1e-6);
    assert!((labeled.bbox.ymin - 200.0 / 800.0).abs() < 1e-6);
    assert!((labeled.bbox.xmax - 300.0 / 1000.0).abs() < 1e-6);
    assert!((labeled.bbox.ymax - 400.0 / 800.0).abs() < 1e-6);
    // The recovered label is the forward-path class index token, not the
    // original class name.
    assert_eq!(labeled.label, "0");
}

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let content = "0 0.5 0.5 0.2\n0 0.500000 0.500000 0.200000 0.200000\n0 0.1 0.1 0.1 0.1 0.1\n";
    let boxes = parse_label_file(content, Path::new("mixed.txt")).unwrap();
    assert_eq!(boxes.len(), 1);
    assert!((boxes[0].bbox.xmin - 0.4).abs() < 1e-6);
}

#[test]
fn test_convert_labels_writes_empty_artifact_for_filtered_image() {
    let dir = tempfile::tempdir().unwrap();
    let xml_dir = dir.path().join("labels_xml");
    let label_dir = dir.path().join("labels");
    fs::create_dir_all(&xml_dir).unwrap();

    // Only a non-allow-listed object; the artifact must exist and be empty.
    let xml = CAR1_XML.replace("licence", "truck");
    fs::write(xml_dir.join("car1.xml"), xml).unwrap();

    let converted = convert_labels(&xml_dir, &label_dir, &licence_classes()).unwrap();
    assert_eq!(converted, 1);

    let content = fs::read_to_string(label_dir.join("car1.txt")).unwrap();
    assert_eq!(content, "");
}

#[test]
fn test_convert_labels_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let xml_dir = dir.path().join("labels_xml");
    let label_dir = dir.path().join("labels");
    fs::create_dir_all(&xml_dir).unwrap();
    fs::write(xml_dir.join("car1.xml"), CAR1_XML).unwrap();

    convert_labels(&xml_dir, &label_dir, &licence_classes()).unwrap();
    let first = fs::read(label_dir.join("car1.txt")).unwrap();

    convert_labels(&xml_dir, &label_dir, &licence_classes()).unwrap();
    let second = fs::read(label_dir.join("car1.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_write_records_emits_record_for_unannotated_image() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    let labels_dir = dir.path().join("labels");
    fs::create_dir_all(&images_dir).unwrap();
    fs::create_dir_all(&labels_dir).unwrap();

    let img = image::RgbImage::from_pixel(10, 8, image::Rgb([40, 90, 200]));
    img.save(images_dir.join("car1.png")).unwrap();

    let label_map = LabelMap::from_pbtxt(LICENCE_MAP, Path::new("label_map.pbtxt")).unwrap();
    let index = load_annotation_index(&labels_dir).unwrap();
    assert!(index.is_empty());
    let output_path = dir.path().join("out.tfrecord");

    let written = write_records(dir.path(), &index, &label_map, &output_path).unwrap();
    assert_eq!(written, 1);

    let stream = fs::read(&output_path).unwrap();
    assert!(!stream.is_empty());
}

#[test]
fn test_write_records_unknown_class_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    let labels_dir = dir.path().join("labels");
    fs::create_dir_all(&images_dir).unwrap();
    fs::create_dir_all(&labels_dir).unwrap();

    let img = image::RgbImage::from_pixel(10, 8, image::Rgb([0, 0, 0]));
    img.save(images_dir.join("car1.jpg")).unwrap();
    // The label token "0" is not a key of the label map; resolution is fatal.
    fs::write(
        labels_dir.join("car1.txt"),
        "0 0.200000 0.375000 0.200000 0.250000",
    )
    .unwrap();

    let label_map = LabelMap::from_pbtxt(LICENCE_MAP, Path::new("label_map.pbtxt")).unwrap();
    let index = load_annotation_index(&labels_dir).unwrap();
    let output_path = dir.path().join("out.tfrecord");

    let result = write_records(dir.path(), &index, &label_map, &output_path);
    assert!(matches!(result, Err(Error::UnknownClass { .. })));
}

#[test]
fn test_write_records_rejects_unregistered_extension() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    fs::create_dir_all(&images_dir).unwrap();
    fs::create_dir_all(dir.path().join("labels")).unwrap();
    fs::write(images_dir.join("car1.gif"), [0u8; 4]).unwrap();

    let label_map = LabelMap::from_pbtxt(LICENCE_MAP, Path::new("label_map.pbtxt")).unwrap();
    let index = load_annotation_index(&dir.path().join("labels")).unwrap();
    let result = write_records(
        dir.path(),
        &index,
        &label_map,
        &dir.path().join("out.tfrecord"),
    );
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

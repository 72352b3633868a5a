extern crate yolo_predict;

use std::io::{self, Read};
use yolo_predict::errors::MetadataError;
use yolo_predict::metadata::{ModelMetadata, DEFAULT_INPUT_SIZE};

fn loaded(yaml: &str) -> ModelMetadata {
    let mut metadata = ModelMetadata::new();
    metadata.load_from(yaml.as_bytes()).unwrap();
    metadata
}

fn labels(metadata: &ModelMetadata) -> Vec<String> {
    metadata.labels().to_vec()
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "stream closed"))
    }
}

#[test]
fn round_trip_names_and_imgsz() {
    let metadata = loaded("names: {0: person, 1: car}\nimgsz: [640, 480]\n");
    assert_eq!(labels(&metadata), vec!["person", "car"]);
    assert_eq!(metadata.input_size(), 640);
}

#[test]
fn missing_names_keeps_labels() {
    let mut metadata = loaded("names: {0: a, 1: b}");
    metadata.load_from("imgsz: [416, 416]".as_bytes()).unwrap();
    assert_eq!(labels(&metadata), vec!["a", "b"]);
    assert_eq!(metadata.input_size(), 416);
}

#[test]
fn non_string_names_are_skipped_in_order() {
    let metadata = loaded("names:\n  3: zebra\n  1: 42\n  0: apple\n  2: [x]\n  5: mango\n");
    assert_eq!(labels(&metadata), vec!["zebra", "apple", "mango"]);
}

#[test]
fn malformed_imgsz_keeps_default() {
    let metadata = loaded("names: {0: a}\nimgsz: [300]\n");
    assert_eq!(labels(&metadata), vec!["a"]);
    assert_eq!(metadata.input_size(), DEFAULT_INPUT_SIZE);

    for yaml in ["imgsz: [1, 2, 3]", "imgsz: 640", "imgsz: {w: 640, h: 640}", "imgsz: []"] {
        assert_eq!(loaded(yaml).input_size(), DEFAULT_INPUT_SIZE, "{yaml}");
    }
}

#[test]
fn numeric_strings_coerce_like_integers() {
    assert_eq!(loaded("imgsz: ['640', '480']").input_size(), loaded("imgsz: [640, 480]").input_size());
    assert_eq!(loaded("imgsz: ['320', 640]").input_size(), 640);
    assert_eq!(loaded("imgsz: [512.9, 100]").input_size(), 512);
}

#[test]
fn coercion_failure_keeps_size() {
    let mut metadata = loaded("imgsz: [800, 600]");
    for yaml in ["imgsz: [abc, 640]", "imgsz: [640, 'x1']", "imgsz: [nope, nope]", "imgsz: [true, 640]"] {
        metadata.load_from(yaml.as_bytes()).unwrap();
        assert_eq!(metadata.input_size(), 800, "{yaml}");
    }
}

#[test]
fn unreadable_stream_keeps_previous_values() {
    let mut metadata = loaded("names: {0: cat}\nimgsz: [224, 224]");
    let before = metadata.clone();

    assert!(matches!(metadata.load_from(BrokenReader), Err(MetadataError::Io(_))));
    assert!(matches!(metadata.load_from("".as_bytes()), Err(MetadataError::NotAMapping(_))));
    assert_eq!(metadata, before);
}

#[test]
fn instances_do_not_share_input_size() {
    let a = loaded("imgsz: [640, 640]");
    let b = ModelMetadata::new();
    assert_eq!(a.input_size(), 640);
    assert_eq!(b.input_size(), DEFAULT_INPUT_SIZE);
}

#[test]
fn byte_order_mark_is_skipped() {
    let metadata = loaded("\u{feff}names: {0: a}\nimgsz: [640, 480]\n");
    assert_eq!(labels(&metadata), vec!["a"]);
    assert_eq!(metadata.input_size(), 640);
}

#[test]
fn repeated_keys_take_the_last_value() {
    let metadata = loaded("names: {0: a, 1: b, 0: c}\nimgsz: [320, 320]\nimgsz: [512, 384]\n");
    assert_eq!(labels(&metadata), vec!["c", "b"]);
    assert_eq!(metadata.input_size(), 512);
}

#[test]
fn oversized_imgsz_keeps_size() {
    let metadata = loaded("imgsz: [65536, 65536]");
    assert_eq!(metadata.input_size(), DEFAULT_INPUT_SIZE);
}

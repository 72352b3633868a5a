use std::io::Read;
use serde_yaml::{Mapping, Value};
use crate::data::LabelSet;
use crate::errors::{FieldError, MetadataError};
use crate::metadata::document;
use crate::metadata::field::{coerce_int, value_kind, Field};

/// Square edge used until a metadata load provides `imgsz`.
pub const DEFAULT_INPUT_SIZE: u32 = 320;

/// Largest accepted `imgsz` edge. Larger declarations are treated as malformed.
pub const MAX_INPUT_SIZE: u32 = 8192;

const NAMES_KEY: &str = "names";
const IMGSZ_KEY: &str = "imgsz";

/// Labels and canonical input size of a model, as declared by its metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
    labels: LabelSet,
    input_size: u32,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            labels: LabelSet::default(),
            input_size: DEFAULT_INPUT_SIZE,
        }
    }
}

impl ModelMetadata {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Reads a YAML metadata document and updates labels and input size in place.
    ///
    /// The reader is consumed and dropped before any field is applied. Only I/O failures,
    /// undecodable YAML and a non-mapping top level are reported; a malformed `names` or `imgsz`
    /// leaves the corresponding value untouched.
    pub fn load_from<R: Read>(&mut self, reader: R) -> Result<(), MetadataError> {
        let document = read_document(reader)?;

        self.apply_names(Field::lookup(&document, NAMES_KEY));
        self.apply_imgsz(Field::lookup(&document, IMGSZ_KEY));

        Ok(())
    }

    fn apply_names(&mut self, field: Field) {
        match field {
            Field::Mapping(names) => {
                let labels = names
                    .values()
                    .filter_map(|value| match value {
                        Value::String(label) => Some(label.clone()),
                        _ => None,
                    })
                    .collect();
                self.labels.replace(labels);
                log::debug!("Loaded {} labels from metadata", self.labels.len());
            }
            Field::Absent => log::debug!("Metadata has no `{NAMES_KEY}`, keeping current labels"),
            Field::Sequence(_) => {
                log::debug!("Metadata `{NAMES_KEY}` is a sequence, not a mapping, keeping current labels")
            }
            Field::Other(value) => log::debug!(
                "Metadata `{NAMES_KEY}` is a {}, not a mapping, keeping current labels",
                value_kind(value)
            ),
        }
    }

    fn apply_imgsz(&mut self, field: Field) {
        let pair = match field {
            Field::Sequence(pair) if pair.len() == 2 => pair,
            Field::Sequence(seq) => {
                log::debug!("Metadata `{IMGSZ_KEY}` has {} elements, expected 2", seq.len());
                return;
            }
            Field::Other(value) => {
                log::debug!("Metadata `{IMGSZ_KEY}` is a {}, expected a sequence", value_kind(value));
                return;
            }
            Field::Mapping(_) => {
                log::debug!("Metadata `{IMGSZ_KEY}` is a mapping, expected a sequence");
                return;
            }
            Field::Absent => return,
        };

        match canonical_input_size(&pair[0], &pair[1]) {
            Ok(size) => {
                self.input_size = size;
                log::info!("Model input size: {}", size);
            }
            Err(err) => log::warn!("Failed to parse {IMGSZ_KEY}: {err}"),
        }
    }
}

fn read_document<R: Read>(mut reader: R) -> Result<Mapping, MetadataError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    drop(reader);

    match document::parse(&text)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(MetadataError::NotAMapping(value_kind(&other))),
    }
}

fn canonical_input_size(width: &Value, height: &Value) -> Result<u32, FieldError> {
    let width = coerce_int(width)?;
    let height = coerce_int(height)?;
    let size = width.max(height);

    if size <= 0 {
        return Err(FieldError::NotPositive(size));
    }
    match u32::try_from(size) {
        Ok(size) if size <= MAX_INPUT_SIZE => Ok(size),
        _ => Err(FieldError::OutOfRange(size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(metadata: &mut ModelMetadata, yaml: &str) -> Result<(), MetadataError> {
        metadata.load_from(yaml.as_bytes())
    }

    #[test]
    fn default_input_size_is_seeded() {
        assert_eq!(ModelMetadata::new().input_size(), DEFAULT_INPUT_SIZE);
        assert!(ModelMetadata::new().labels().is_empty());
    }

    #[test]
    fn input_size_is_larger_dimension() {
        let mut metadata = ModelMetadata::new();
        load(&mut metadata, "imgsz: [480, 640]").unwrap();
        assert_eq!(metadata.input_size(), 640);
        load(&mut metadata, "imgsz: [1280, 736]").unwrap();
        assert_eq!(metadata.input_size(), 1280);
    }

    #[test]
    fn non_positive_size_is_ignored() {
        let mut metadata = ModelMetadata::new();
        load(&mut metadata, "imgsz: [0, -4]").unwrap();
        assert_eq!(metadata.input_size(), DEFAULT_INPUT_SIZE);
        load(&mut metadata, "imgsz: [99999999999, 1]").unwrap();
        assert_eq!(metadata.input_size(), DEFAULT_INPUT_SIZE);
        load(&mut metadata, "imgsz: [65536, 65536]").unwrap();
        assert_eq!(metadata.input_size(), DEFAULT_INPUT_SIZE);
        load(&mut metadata, "imgsz: [8192, 640]").unwrap();
        assert_eq!(metadata.input_size(), MAX_INPUT_SIZE);
    }

    #[test]
    fn names_as_sequence_leaves_labels() {
        let mut metadata = ModelMetadata::new();
        load(&mut metadata, "names: {0: cat}").unwrap();
        load(&mut metadata, "names: [dog, bird]").unwrap();
        assert_eq!(metadata.labels().to_vec(), vec!["cat"]);
    }

    #[test]
    fn top_level_must_be_a_mapping() {
        let mut metadata = ModelMetadata::new();
        assert!(matches!(
            load(&mut metadata, "- names\n- imgsz"),
            Err(MetadataError::NotAMapping("sequence"))
        ));
        assert!(matches!(load(&mut metadata, "names: [unclosed"), Err(MetadataError::Decode(_))));
    }
}

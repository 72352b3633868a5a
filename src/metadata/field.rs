use serde_yaml::{Mapping, Value};
use crate::errors::FieldError;

/// Shape of a top-level metadata entry, decided once per key.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Field<'a> {
    Absent,
    Mapping(&'a Mapping),
    Sequence(&'a [Value]),
    Other(&'a Value),
}

impl<'a> Field<'a> {
    pub(crate) fn lookup(document: &'a Mapping, key: &str) -> Self {
        match document.get(key) {
            None => Field::Absent,
            Some(Value::Mapping(mapping)) => Field::Mapping(mapping),
            Some(Value::Sequence(sequence)) => Field::Sequence(sequence),
            Some(other) => Field::Other(other),
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Tolerant integer conversion for loosely typed metadata values.
///
/// Integers pass through, floats are truncated toward zero and strings are parsed as base-10.
pub(crate) fn coerce_int(value: &Value) -> Result<i64, FieldError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(u) = n.as_u64() {
                Ok(i64::try_from(u).unwrap_or(i64::MAX))
            } else {
                // `as` saturates and maps NaN to 0
                Ok(n.as_f64().map(|f| f.trunc() as i64).unwrap_or_default())
            }
        }
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| FieldError::NotNumeric(s.clone())),
        other => Err(FieldError::UnsupportedType(value_kind(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn coerces_integers_floats_and_strings() {
        assert_eq!(coerce_int(&yaml("640")), Ok(640));
        assert_eq!(coerce_int(&yaml("639.9")), Ok(639));
        assert_eq!(coerce_int(&yaml("-2.7")), Ok(-2));
        assert_eq!(coerce_int(&yaml("'480'")), Ok(480));
        assert_eq!(coerce_int(&yaml("'+32'")), Ok(32));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(
            coerce_int(&yaml("'640px'")),
            Err(FieldError::NotNumeric("640px".to_string()))
        );
        assert_eq!(coerce_int(&yaml("'6.5'")), Err(FieldError::NotNumeric("6.5".to_string())));
        assert_eq!(coerce_int(&yaml("true")), Err(FieldError::UnsupportedType("bool")));
        assert_eq!(coerce_int(&yaml("~")), Err(FieldError::UnsupportedType("null")));
        assert_eq!(coerce_int(&yaml("[1]")), Err(FieldError::UnsupportedType("sequence")));
    }

    #[test]
    fn lookup_classifies_shapes() {
        let doc: Mapping = serde_yaml::from_str("a: {0: x}\nb: [1, 2]\nc: 3").unwrap();
        assert!(matches!(Field::lookup(&doc, "a"), Field::Mapping(_)));
        assert!(matches!(Field::lookup(&doc, "b"), Field::Sequence(s) if s.len() == 2));
        assert!(matches!(Field::lookup(&doc, "c"), Field::Other(_)));
        assert!(matches!(Field::lookup(&doc, "d"), Field::Absent));
    }
}

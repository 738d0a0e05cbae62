use crate::error::Result;
use crate::results::{ResultSet, ResultValue};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::io::Write;

/// How non-finite floats (including `ResultValue::Missing`) are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NanEncoding {
    /// JSON `null`
    #[default]
    Null,
    /// The strings "NaN", "Infinity" and "-Infinity"
    String,
}

/// Merges the three extraction phases. Later phases overwrite earlier ones:
/// log variables, then text files, then tables.
pub fn merge(log_set: ResultSet, text_set: ResultSet, table_set: ResultSet) -> ResultSet {
    let mut merged = log_set;
    merged.extend(text_set);
    merged.extend(table_set);
    merged
}

pub fn serialize(set: &ResultSet, encoding: NanEncoding, pretty: bool) -> Result<String> {
    let document = Encoded { set, encoding };
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

pub fn write_document<W: Write>(
    writer: W,
    set: &ResultSet,
    encoding: NanEncoding,
    pretty: bool,
) -> Result<()> {
    let document = Encoded { set, encoding };
    if pretty {
        serde_json::to_writer_pretty(writer, &document)?;
    } else {
        serde_json::to_writer(writer, &document)?;
    }
    Ok(())
}

struct Encoded<'a> {
    set: &'a ResultSet,
    encoding: NanEncoding,
}

struct EncodedValue<'a> {
    value: &'a ResultValue,
    encoding: NanEncoding,
}

struct EncodedFloats<'a> {
    values: &'a [f64],
    encoding: NanEncoding,
}

struct EncodedFloat {
    value: f64,
    encoding: NanEncoding,
}

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.set.len()))?;
        for (name, value) in self.set.iter() {
            map.serialize_entry(
                name,
                &EncodedValue {
                    value,
                    encoding: self.encoding,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for EncodedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let encoding = self.encoding;
        match self.value {
            ResultValue::Scalar(value) => EncodedFloat {
                value: *value,
                encoding,
            }
            .serialize(serializer),
            ResultValue::Missing => EncodedFloat {
                value: f64::NAN,
                encoding,
            }
            .serialize(serializer),
            ResultValue::Text(text) => serializer.serialize_str(text),
            ResultValue::Column(values) => EncodedFloats { values, encoding }.serialize(serializer),
            ResultValue::Table(rows) => {
                let mut seq = serializer.serialize_seq(Some(rows.len()))?;
                for row in rows {
                    seq.serialize_element(&EncodedFloats {
                        values: row,
                        encoding,
                    })?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for EncodedFloats<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in self.values {
            seq.serialize_element(&EncodedFloat {
                value: *value,
                encoding: self.encoding,
            })?;
        }
        seq.end()
    }
}

impl Serialize for EncodedFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = self.value;
        if value.is_finite() {
            return serializer.serialize_f64(value);
        }

        match self.encoding {
            NanEncoding::Null => serializer.serialize_unit(),
            NanEncoding::String if value.is_nan() => serializer.serialize_str("NaN"),
            NanEncoding::String if value > 0.0 => serializer.serialize_str("Infinity"),
            NanEncoding::String => serializer.serialize_str("-Infinity"),
        }
    }
}

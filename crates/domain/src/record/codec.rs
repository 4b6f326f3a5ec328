//! Single-line text codec for [`AuditInfo`] field maps.
//!
//! One record is one line: every field in [`FieldKey::ALL`] order, joined
//! by the `\` delimiter. A literal `\` inside a value is escaped by
//! doubling; line breaks cannot be represented and are rejected at encode
//! time, which keeps decode unambiguous.

use crate::record::error::CodecError;
use crate::record::fields::{AuditInfo, FieldKey};

pub const FIELD_DELIMITER: char = '\\';

/// Encode a field map into one delimited line (without trailing newline).
pub fn encode(info: &AuditInfo) -> Result<String, CodecError> {
    let mut line = String::new();
    for (key, value) in info.iter() {
        if key != FieldKey::ALL[0] {
            line.push(FIELD_DELIMITER);
        }
        if let Some(value) = value {
            push_escaped(&mut line, key, value)?;
        }
    }
    Ok(line)
}

/// Decode one line back into a field map.
///
/// Lines written by older builds may carry fewer fields; the tail decodes
/// as absent. More fields than the enumeration knows is a hard error — the
/// line cannot have come from this codec.
pub fn decode(line: &str) -> Result<AuditInfo, CodecError> {
    let mut info = AuditInfo::new();
    let mut field = String::new();
    let mut index = 0usize;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c != FIELD_DELIMITER {
            field.push(c);
            continue;
        }
        match chars.clone().next() {
            // Doubled delimiter is an escaped literal.
            Some(FIELD_DELIMITER) => {
                chars.next();
                field.push(FIELD_DELIMITER);
            }
            // Single delimiter ends the field.
            _ => {
                store_field(&mut info, index, &mut field)?;
                index += 1;
            }
        }
    }
    store_field(&mut info, index, &mut field)?;
    Ok(info)
}

fn push_escaped(line: &mut String, key: FieldKey, value: &str) -> Result<(), CodecError> {
    for c in value.chars() {
        match c {
            '\n' | '\r' => {
                return Err(CodecError::UnencodableValue {
                    key,
                    reason: "line breaks cannot appear in a single-line record".to_string(),
                });
            }
            FIELD_DELIMITER => {
                line.push(FIELD_DELIMITER);
                line.push(FIELD_DELIMITER);
            }
            _ => line.push(c),
        }
    }
    Ok(())
}

fn store_field(info: &mut AuditInfo, index: usize, field: &mut String) -> Result<(), CodecError> {
    if index >= FieldKey::COUNT {
        return Err(CodecError::TooManyFields {
            max: FieldKey::COUNT,
        });
    }
    info.set(FieldKey::ALL[index], std::mem::take(field));
    Ok(())
}

use thiserror::Error;

use crate::record::fields::FieldKey;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("field {key:?} contains an unencodable character: {reason}")]
    UnencodableValue { key: FieldKey, reason: String },

    #[error("record line has more than the {max} known fields")]
    TooManyFields { max: usize },

    #[error("payload-carrying records must not hold detail records")]
    DetailsWithPayload,

    #[error("only payload-carrying categories may hold attachments")]
    AttachmentsWithoutPayload,
}

#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("spool I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("spool file is empty")]
    EmptyFile,

    #[error("spool file already consumed by another dispatcher")]
    Gone,

    #[error("spool filename carries no known category: {0}")]
    UnknownCategory(String),

    #[error("binary payload section is truncated")]
    TruncatedPayload,

    #[error("spool file is not valid UTF-8 in its record section")]
    NotUtf8,
}

//! In-memory form of one spooled unit and its on-disk serialization.
//!
//! File layout: UTF-8 text lines first (main record, then detail records),
//! followed by an optional binary attachment section. Payload-carrying
//! categories hold exactly one text line, so the reader knows where text
//! ends; the attachment section itself is a sequence of
//! `u64 big-endian length + bytes` frames.

use crate::event::entity::EventCategory;
use crate::record::codec;
use crate::record::error::{CodecError, SpoolError};
use crate::record::fields::AuditInfo;

/// One spooled unit: a main record, its detail sub-records, and raw
/// binary attachments. Exclusively owned by the pipeline from creation
/// until commit or dead-letter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpoolRecord {
    pub main: AuditInfo,
    pub details: Vec<AuditInfo>,
    pub attachments: Vec<Vec<u8>>,
}

impl SpoolRecord {
    pub fn new(main: AuditInfo) -> Self {
        Self {
            main,
            details: Vec::new(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: AuditInfo) -> Self {
        self.details.push(detail);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Vec<u8>) -> Self {
        if !attachment.is_empty() {
            self.attachments.push(attachment);
        }
        self
    }

    /// Serialize the full record for a fresh spool file.
    pub fn to_bytes(&self, category: EventCategory) -> Result<Vec<u8>, CodecError> {
        if category.carries_payload() {
            if !self.details.is_empty() {
                return Err(CodecError::DetailsWithPayload);
            }
        } else if !self.attachments.is_empty() {
            return Err(CodecError::AttachmentsWithoutPayload);
        }

        let mut out = Vec::new();
        out.extend_from_slice(codec::encode(&self.main)?.as_bytes());
        out.push(b'\n');
        for detail in &self.details {
            out.extend_from_slice(codec::encode(detail)?.as_bytes());
            out.push(b'\n');
        }
        for attachment in &self.attachments {
            out.extend_from_slice(&(attachment.len() as u64).to_be_bytes());
            out.extend_from_slice(attachment);
        }
        Ok(out)
    }

    /// Serialize only the detail records, for appending to an existing
    /// spool file of a mergeable unit. The main record is never rewritten.
    pub fn detail_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        for detail in &self.details {
            out.extend_from_slice(codec::encode(detail)?.as_bytes());
            out.push(b'\n');
        }
        Ok(out)
    }

    /// Parse a spool file back. The category decides where the text
    /// section ends: payload-carrying categories have exactly one text
    /// line, everything else is all text.
    pub fn from_bytes(category: EventCategory, bytes: &[u8]) -> Result<Self, SpoolError> {
        if bytes.is_empty() {
            return Err(SpoolError::EmptyFile);
        }

        let (text, tail) = if category.carries_payload() {
            let end = bytes
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |i| i + 1);
            bytes.split_at(end)
        } else {
            (bytes, &[][..])
        };

        let text = std::str::from_utf8(text).map_err(|_| SpoolError::NotUtf8)?;
        let mut lines = text.lines();
        let main = codec::decode(lines.next().ok_or(SpoolError::EmptyFile)?)
            .map_err(SpoolError::Codec)?;
        let mut record = SpoolRecord::new(main);
        for line in lines {
            record.details.push(codec::decode(line).map_err(SpoolError::Codec)?);
        }
        record.attachments = split_attachments(tail)?;
        Ok(record)
    }
}

fn split_attachments(mut tail: &[u8]) -> Result<Vec<Vec<u8>>, SpoolError> {
    let mut attachments = Vec::new();
    while !tail.is_empty() {
        if tail.len() < 8 {
            return Err(SpoolError::TruncatedPayload);
        }
        let (len_bytes, rest) = tail.split_at(8);
        let mut len = [0u8; 8];
        len.copy_from_slice(len_bytes);
        let len = u64::from_be_bytes(len) as usize;
        if rest.len() < len {
            return Err(SpoolError::TruncatedPayload);
        }
        let (attachment, rest) = rest.split_at(len);
        attachments.push(attachment.to_vec());
        tail = rest;
    }
    Ok(attachments)
}

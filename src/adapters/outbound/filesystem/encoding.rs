use crate::shared::error::FileTemplateError;
use encoding_rs::{Decoder, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

/// A character encoding resolved from a WHATWG label
///
/// Labels are matched case-insensitively and ignore surrounding whitespace,
/// so `"utf8"`, `" UTF-8 "`, `"Shift_JIS"`, `"sjis"` and `"windows-31j"`
/// are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Resolves `label`, rejecting unknown labels and the replacement encoding.
    pub fn for_label(label: &str) -> Result<Self, FileTemplateError> {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if encoding != REPLACEMENT => Ok(Self(encoding)),
            _ => Err(FileTemplateError::UnsupportedEncoding {
                label: label.to_string(),
            }),
        }
    }

    /// Canonical name, e.g. `"Shift_JIS"` for the label `"sjis"`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decoder that drops a leading byte order mark of this encoding.
    pub(crate) fn decoder(&self) -> Decoder {
        self.0.new_decoder_with_bom_removal()
    }

    /// Encodes `text`; unmappable characters become numeric character references.
    ///
    /// UTF-16 is written without a byte order mark.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        if self.0 == UTF_16LE {
            Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
        } else if self.0 == UTF_16BE {
            Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
        } else {
            let (bytes, _, _) = self.0.encode(text);
            bytes
        }
    }
}

//! Wire codec for extension class payloads.
//!
//! A payload is a header naming the merge key followed by the method list:
//!
//! ```text
//! owner (class) | delegate kind | count | method*
//! method := name | qualifiers | type params | params | return tags
//!         | owner (class) | invocation template | kind tag | [return type]
//! ```
//!
//! The return type is present only for the `Return` kind. Static delegates
//! are written with `static` added and `ReturnThis` degraded to `VoidEffect`.

pub mod method;
pub mod stream;

pub use method::{
    invocation_template, GeneratedMethod, Invocation, MethodDecoder, MethodEncoder, Statement,
};
pub use stream::{ElementDecoder, ElementEncoder, TokenReader, TokenWriter, DEFAULT_MAX_TOKEN_BYTES};

use crate::descriptor::ExtensionClass;
use crate::error::CodecResult;
use crate::model::{DelegateKind, MergeKey};

/// Encode `class` into a standalone payload.
pub fn encode_class(class: &ExtensionClass) -> CodecResult<Vec<u8>> {
    let mut writer = TokenWriter::new();
    write_class(&mut writer, class)?;
    Ok(writer.into_bytes())
}

/// Append the payload for `class` to `writer`.
pub fn write_class(writer: &mut TokenWriter, class: &ExtensionClass) -> CodecResult<()> {
    writer.write_class(class.owner())?;
    writer.write_string(class.delegate_kind().as_tag())?;
    writer.write_list(class.methods(), &MethodEncoder::new(class))
}

/// Methods decoded from one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedClass {
    pub key: MergeKey,
    pub methods: Vec<GeneratedMethod>,
}

/// Decodes payloads, naming generated types with a fixed suffix.
#[derive(Debug, Clone)]
pub struct ClassDecoder {
    type_suffix: String,
    max_token_bytes: u64,
}

impl ClassDecoder {
    pub fn new(type_suffix: impl Into<String>) -> Self {
        Self {
            type_suffix: type_suffix.into(),
            max_token_bytes: DEFAULT_MAX_TOKEN_BYTES,
        }
    }

    pub fn with_max_token_bytes(mut self, limit: u64) -> Self {
        self.max_token_bytes = limit;
        self
    }

    pub fn type_suffix(&self) -> &str {
        &self.type_suffix
    }

    /// Decode a complete payload; trailing bytes are an error.
    pub fn decode(&self, bytes: &[u8]) -> CodecResult<DecodedClass> {
        let mut reader = TokenReader::with_limit(bytes, self.max_token_bytes);
        let decoded = self.read_class(&mut reader)?;
        reader.finish()?;
        Ok(decoded)
    }

    pub fn read_class(&self, reader: &mut TokenReader<'_>) -> CodecResult<DecodedClass> {
        let owner = reader.read_class()?;
        let delegate_kind: DelegateKind = reader.read_string()?.parse()?;
        let key = MergeKey::new(owner, delegate_kind);
        let decoder = MethodDecoder::new(key.extension_type(&self.type_suffix));
        let methods = reader.read_list(&decoder)?;
        Ok(DecodedClass { key, methods })
    }
}

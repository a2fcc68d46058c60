//! Ordered token stream.
//!
//! Every token is a single `bincode` value written back to back. The stream
//! carries no field names or type markers, so a reader must consume tokens in
//! exactly the order the writer produced them.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};
use crate::model::{MetadataTag, Parameter, Qualifier, QualifierSet, TypeIdentity, TypeParameter};

/// Default upper bound for a single token, in bytes.
pub const DEFAULT_MAX_TOKEN_BYTES: u64 = 1024 * 1024;

fn wire(limit: u64) -> impl Options {
    bincode::DefaultOptions::new().with_limit(limit)
}

/// Writes one element of a list.
pub trait ElementEncoder<T> {
    fn encode(&self, writer: &mut TokenWriter, item: &T) -> CodecResult<()>;
}

/// Reads one element of a list.
pub trait ElementDecoder<T> {
    fn decode(&self, reader: &mut TokenReader<'_>) -> CodecResult<T>;
}

impl<T, F> ElementEncoder<T> for F
where
    F: Fn(&mut TokenWriter, &T) -> CodecResult<()>,
{
    fn encode(&self, writer: &mut TokenWriter, item: &T) -> CodecResult<()> {
        self(writer, item)
    }
}

impl<T, F> ElementDecoder<T> for F
where
    F: Fn(&mut TokenReader<'_>) -> CodecResult<T>,
{
    fn decode(&self, reader: &mut TokenReader<'_>) -> CodecResult<T> {
        self(reader)
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Appends tokens to an in-memory buffer.
#[derive(Debug)]
pub struct TokenWriter {
    buf: Vec<u8>,
    limit: u64,
}

impl Default for TokenWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenWriter {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_TOKEN_BYTES)
    }

    pub fn with_limit(limit: u64) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    fn put<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        wire(self.limit).serialize_into(&mut self.buf, value)?;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        self.put(value)
    }

    pub fn write_count(&mut self, count: usize) -> CodecResult<()> {
        self.put(&(count as u64))
    }

    /// Write `items` as a count followed by one `write` call per element.
    pub fn write_list_with<T>(
        &mut self,
        items: &[T],
        mut write: impl FnMut(&mut Self, &T) -> CodecResult<()>,
    ) -> CodecResult<()> {
        self.write_count(items.len())?;
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Write `items` with a pluggable element encoder.
    pub fn write_list<T, E>(&mut self, items: &[T], encoder: &E) -> CodecResult<()>
    where
        E: ElementEncoder<T> + ?Sized,
    {
        self.write_list_with(items, |w, item| encoder.encode(w, item))
    }

    pub fn write_qualifiers(&mut self, qualifiers: &QualifierSet) -> CodecResult<()> {
        let qualifiers: Vec<Qualifier> = qualifiers.iter().copied().collect();
        self.write_list_with(&qualifiers, |w, q| w.write_string(q.as_str()))
    }

    pub fn write_type(&mut self, ty: &TypeIdentity) -> CodecResult<()> {
        self.write_string(ty.as_str())
    }

    /// Class identity: package and local name as two tokens.
    pub fn write_class(&mut self, class: &TypeIdentity) -> CodecResult<()> {
        self.write_string(class.package())?;
        self.write_string(class.local_name())
    }

    pub fn write_type_params(&mut self, params: &[TypeParameter]) -> CodecResult<()> {
        self.write_list_with(params, |w, param| {
            w.write_string(&param.name)?;
            w.write_list_with(&param.bounds, |w, bound| w.write_type(bound))
        })
    }

    /// Write formal parameters and return the forwarded argument list.
    pub fn write_params(&mut self, params: &[Parameter]) -> CodecResult<String> {
        self.write_list_with(params, |w, param| {
            w.write_string(&param.name)?;
            w.write_type(&param.ty)
        })?;
        Ok(params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", "))
    }

    pub fn write_tags(&mut self, tags: &[MetadataTag]) -> CodecResult<()> {
        self.write_list_with(tags, |w, tag| {
            w.write_type(&tag.ty)?;
            w.write_list_with(&tag.members, |w, (member, value)| {
                w.write_string(member)?;
                w.write_string(value)
            })
        })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Consumes tokens from a byte slice.
#[derive(Debug)]
pub struct TokenReader<'a> {
    input: &'a [u8],
    limit: u64,
}

impl<'a> TokenReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_limit(input, DEFAULT_MAX_TOKEN_BYTES)
    }

    pub fn with_limit(input: &'a [u8], limit: u64) -> Self {
        Self { input, limit }
    }

    fn take<T: DeserializeOwned>(&mut self) -> CodecResult<T> {
        Ok(wire(self.limit).deserialize_from(&mut self.input)?)
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        self.take()
    }

    pub fn read_count(&mut self) -> CodecResult<usize> {
        let count: u64 = self.take()?;
        usize::try_from(count)
            .map_err(|_| CodecError::Malformed(format!("list count {} out of range", count)))
    }

    /// Read a count followed by that many `read` calls.
    pub fn read_list_with<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<Vec<T>> {
        let count = self.read_count()?;
        let mut items = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    /// Read a list with a pluggable element decoder.
    pub fn read_list<T, D>(&mut self, decoder: &D) -> CodecResult<Vec<T>>
    where
        D: ElementDecoder<T> + ?Sized,
    {
        self.read_list_with(|r| decoder.decode(r))
    }

    pub fn read_qualifiers(&mut self) -> CodecResult<QualifierSet> {
        let qualifiers = self.read_list_with(|r| r.read_string()?.parse::<Qualifier>())?;
        Ok(qualifiers.into_iter().collect())
    }

    pub fn read_type(&mut self) -> CodecResult<TypeIdentity> {
        Ok(TypeIdentity::new(self.read_string()?))
    }

    pub fn read_class(&mut self) -> CodecResult<TypeIdentity> {
        let package = self.read_string()?;
        let local = self.read_string()?;
        if package.is_empty() {
            Ok(TypeIdentity::new(local))
        } else {
            Ok(TypeIdentity::new(format!("{}.{}", package, local)))
        }
    }

    pub fn read_type_params(&mut self) -> CodecResult<Vec<TypeParameter>> {
        self.read_list_with(|r| {
            let name = r.read_string()?;
            let bounds = r.read_list_with(|r| r.read_type())?;
            Ok(TypeParameter { name, bounds })
        })
    }

    pub fn read_params(&mut self) -> CodecResult<Vec<Parameter>> {
        self.read_list_with(|r| {
            let name = r.read_string()?;
            let ty = r.read_type()?;
            Ok(Parameter { name, ty })
        })
    }

    pub fn read_tags(&mut self) -> CodecResult<Vec<MetadataTag>> {
        self.read_list_with(|r| {
            let ty = r.read_type()?;
            let members = r.read_list_with(|r| Ok((r.read_string()?, r.read_string()?)))?;
            Ok(MetadataTag { ty, members })
        })
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Fail unless the whole input was consumed.
    pub fn finish(self) -> CodecResult<()> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes(self.input.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_read_back_in_order() {
        let mut writer = TokenWriter::new();
        writer.write_string("first").unwrap();
        writer.write_class(&TypeIdentity::new("com.example.Strings")).unwrap();
        writer.write_type(&TypeIdentity::new("java.util.List<T>")).unwrap();

        let bytes = writer.into_bytes();
        let mut reader = TokenReader::new(&bytes);
        assert_eq!(reader.read_string().unwrap(), "first");
        assert_eq!(reader.read_class().unwrap().as_str(), "com.example.Strings");
        assert_eq!(reader.read_type().unwrap().as_str(), "java.util.List<T>");
        reader.finish().unwrap();
    }

    #[test]
    fn test_write_params_returns_argument_list() {
        let mut writer = TokenWriter::new();
        let args = writer
            .write_params(&[Parameter::new("a", "int"), Parameter::new("b", "long")])
            .unwrap();
        assert_eq!(args, "a, b");

        let none = TokenWriter::new().write_params(&[]).unwrap();
        assert_eq!(none, "");
    }

    struct Doubler;

    impl ElementEncoder<u32> for Doubler {
        fn encode(&self, writer: &mut TokenWriter, item: &u32) -> CodecResult<()> {
            writer.write_string(&(item * 2).to_string())
        }
    }

    impl ElementDecoder<u32> for Doubler {
        fn decode(&self, reader: &mut TokenReader<'_>) -> CodecResult<u32> {
            let text = reader.read_string()?;
            let value: u32 = text
                .parse()
                .map_err(|_| CodecError::Malformed(format!("not a number: {}", text)))?;
            Ok(value / 2)
        }
    }

    #[test]
    fn test_pluggable_element_codec() {
        let mut writer = TokenWriter::new();
        writer.write_list(&[1u32, 2, 3], &Doubler).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes);
        assert_eq!(reader.read_list(&Doubler).unwrap(), vec![1, 2, 3]);
        reader.finish().unwrap();
    }

    fn write_upper(writer: &mut TokenWriter, item: &String) -> CodecResult<()> {
        writer.write_string(&item.to_uppercase())
    }

    fn read_lower(reader: &mut TokenReader<'_>) -> CodecResult<String> {
        Ok(reader.read_string()?.to_lowercase())
    }

    #[test]
    fn test_functions_as_element_codec() {
        let items = vec!["ab".to_string(), "Cd".to_string()];
        let mut writer = TokenWriter::new();
        writer.write_list(&items, &write_upper).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes);
        assert_eq!(reader.read_list(&read_lower).unwrap(), vec!["ab", "cd"]);
        reader.finish().unwrap();
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let mut writer = TokenWriter::new();
        writer.write_string("truncated token").unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes[..bytes.len() - 3]);
        assert!(matches!(reader.read_string(), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_oversized_count_is_rejected() {
        let mut writer = TokenWriter::new();
        writer.write_count(1_000_000).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes);
        assert!(matches!(reader.read_params(), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_list_of_empty_elements() {
        let mut writer = TokenWriter::new();
        writer.write_list_with(&[(), (), ()], |_, _| Ok(())).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes);
        assert_eq!(reader.read_list_with(|_| Ok(())).unwrap(), vec![(), (), ()]);
        reader.finish().unwrap();
    }

    #[test]
    fn test_token_limit() {
        let mut writer = TokenWriter::with_limit(8);
        assert!(writer.write_string("this is longer than eight bytes").is_err());
    }

    #[test]
    fn test_finish_reports_trailing_bytes() {
        let mut writer = TokenWriter::new();
        writer.write_string("a").unwrap();
        writer.write_string("b").unwrap();
        let bytes = writer.into_bytes();

        let mut reader = TokenReader::new(&bytes);
        reader.read_string().unwrap();
        assert!(matches!(reader.finish(), Err(CodecError::TrailingBytes(2))));
    }
}

//! Per-method encode ("pen") and decode ("parse").

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stream::{ElementDecoder, ElementEncoder, TokenReader, TokenWriter};
use crate::descriptor::{ExtensionClass, ExtensionMethod};
use crate::error::CodecResult;
use crate::model::{
    DelegateKind, MetadataTag, MethodKind, Parameter, Qualifier, QualifierSet, TypeIdentity,
    TypeParameter,
};

/// Placeholder in an invocation template bound to the owner type.
pub const OWNER_PLACEHOLDER: &str = "$T";

/// Template for a forwarded call: fetch the receiver through the designated
/// method, then call `method` on it.
pub fn invocation_template(designated: &str, method: &str, arguments: &str) -> String {
    format!(
        "{}.{}().{}({})",
        OWNER_PLACEHOLDER, designated, method, arguments
    )
}

// ============================================================================
// Reconstructed declarations
// ============================================================================

/// A forwarded call with its owner type bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub template: String,
    pub owner: TypeIdentity,
}

impl Invocation {
    /// Template with the owner substituted.
    pub fn render(&self) -> String {
        match self.template.strip_prefix(OWNER_PLACEHOLDER) {
            Some(rest) => format!("{}{}", self.owner, rest),
            None => self.template.clone(),
        }
    }
}

/// Body statement of a generated method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Evaluate the invocation for its effect.
    Invoke(Invocation),
    /// Return the invocation's value.
    ReturnValue(Invocation),
    /// Return the receiver.
    ReturnSelf,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Invoke(call) => write!(f, "{};", call.render()),
            Statement::ReturnValue(call) => write!(f, "return {};", call.render()),
            Statement::ReturnSelf => f.write_str("return this;"),
        }
    }
}

/// Method declaration reconstructed from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMethod {
    pub name: String,
    pub kind: MethodKind,
    pub qualifiers: QualifierSet,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_tags: Vec<MetadataTag>,
    /// `None` for methods without a return value.
    pub returns: Option<TypeIdentity>,
    pub body: Vec<Statement>,
}

// ============================================================================
// Encode
// ============================================================================

/// Writes the methods of one extension class.
pub struct MethodEncoder<'a> {
    class: &'a ExtensionClass,
}

impl<'a> MethodEncoder<'a> {
    pub fn new(class: &'a ExtensionClass) -> Self {
        Self { class }
    }
}

impl ElementEncoder<ExtensionMethod> for MethodEncoder<'_> {
    fn encode(&self, writer: &mut TokenWriter, method: &ExtensionMethod) -> CodecResult<()> {
        writer.write_string(&method.name)?;

        let delegate = self.class.delegate_kind();
        let qualifiers = match delegate {
            DelegateKind::StaticDelegate => {
                let mut qualifiers = method.qualifiers.clone();
                qualifiers.insert(Qualifier::Static);
                Cow::Owned(qualifiers)
            }
            DelegateKind::InstanceDelegate => Cow::Borrowed(&method.qualifiers),
        };
        let kind = method.kind.for_delegate(delegate);
        writer.write_qualifiers(&qualifiers)?;

        writer.write_type_params(&method.type_parameters)?;
        let arguments = writer.write_params(&method.parameters)?;
        writer.write_tags(&method.return_tags)?;

        writer.write_class(self.class.owner())?;
        writer.write_string(&invocation_template(
            &self.class.designated().name,
            &method.name,
            &arguments,
        ))?;

        writer.write_string(kind.as_tag())?;
        match kind {
            MethodKind::Return => writer.write_type(&method.returns)?,
            MethodKind::ReturnThis | MethodKind::VoidEffect => {}
        }
        Ok(())
    }
}

// ============================================================================
// Decode
// ============================================================================

/// Reads methods destined for one generated type.
pub struct MethodDecoder {
    target: TypeIdentity,
}

impl MethodDecoder {
    /// `target` is the generated type that `ReturnThis` methods hand back.
    pub fn new(target: TypeIdentity) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &TypeIdentity {
        &self.target
    }
}

impl ElementDecoder<GeneratedMethod> for MethodDecoder {
    fn decode(&self, reader: &mut TokenReader<'_>) -> CodecResult<GeneratedMethod> {
        let name = reader.read_string()?;
        let qualifiers = reader.read_qualifiers()?;
        let type_parameters = reader.read_type_params()?;
        let parameters = reader.read_params()?;
        let return_tags = reader.read_tags()?;

        let owner = reader.read_class()?;
        let template = reader.read_string()?;
        let kind: MethodKind = reader.read_string()?.parse()?;

        let call = Invocation { template, owner };
        let (returns, body) = match kind {
            MethodKind::Return => {
                let returns = reader.read_type()?;
                (Some(returns), vec![Statement::ReturnValue(call)])
            }
            MethodKind::ReturnThis => (
                Some(self.target.clone()),
                vec![Statement::Invoke(call), Statement::ReturnSelf],
            ),
            MethodKind::VoidEffect => (None, vec![Statement::Invoke(call)]),
        };

        Ok(GeneratedMethod {
            name,
            kind,
            qualifiers,
            type_parameters,
            parameters,
            return_tags,
            returns,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_template() {
        assert_eq!(
            invocation_template("get", "pad", "width, fill"),
            "$T.get().pad(width, fill)"
        );
    }

    #[test]
    fn test_statement_display() {
        let call = Invocation {
            template: invocation_template("get", "trim", ""),
            owner: TypeIdentity::new("com.example.Strings"),
        };
        assert_eq!(
            Statement::Invoke(call.clone()).to_string(),
            "com.example.Strings.get().trim();"
        );
        assert_eq!(
            Statement::ReturnValue(call).to_string(),
            "return com.example.Strings.get().trim();"
        );
        assert_eq!(Statement::ReturnSelf.to_string(), "return this;");
    }

    #[test]
    fn test_render_binds_only_leading_placeholder() {
        let call = Invocation {
            template: invocation_template("get", "copy", "$Tmp, $T"),
            owner: TypeIdentity::new("com.example.Strings"),
        };
        assert_eq!(call.render(), "com.example.Strings.get().copy($Tmp, $T)");
    }
}

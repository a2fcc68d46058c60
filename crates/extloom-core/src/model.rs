//! Primitive descriptor types shared by the builder and the codec.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

// ============================================================================
// Type identity
// ============================================================================

/// Fully qualified type reference, e.g. `com.example.Strings`.
///
/// Held as source text; two identities are equal when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentity(String);

impl TypeIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package portion of the name, empty for types in the default package.
    pub fn package(&self) -> &str {
        match self.raw_name().rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Unqualified name, without generic arguments.
    pub fn simple_name(&self) -> &str {
        let raw = self.raw_name();
        match raw.rfind('.') {
            Some(idx) => &raw[idx + 1..],
            None => raw,
        }
    }

    /// Name relative to the package, generic arguments included.
    pub fn local_name(&self) -> &str {
        match self.package().len() {
            0 => &self.0,
            len => &self.0[len + 1..],
        }
    }

    /// Sibling type in the same package with `suffix` appended to the simple name.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let package = self.package();
        if package.is_empty() {
            Self(format!("{}{}", self.simple_name(), suffix))
        } else {
            Self(format!("{}.{}{}", package, self.simple_name(), suffix))
        }
    }

    fn raw_name(&self) -> &str {
        match self.0.find('<') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeIdentity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeIdentity {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ============================================================================
// Qualifiers
// ============================================================================

/// Declaration modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Synchronized,
    Native,
    Default,
    Strictfp,
    Transient,
    Volatile,
}

/// Unordered, deduplicated qualifier set. Iteration order is stable.
pub type QualifierSet = BTreeSet<Qualifier>;

impl Qualifier {
    /// Source keyword for this qualifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::Public => "public",
            Qualifier::Protected => "protected",
            Qualifier::Private => "private",
            Qualifier::Abstract => "abstract",
            Qualifier::Static => "static",
            Qualifier::Final => "final",
            Qualifier::Synchronized => "synchronized",
            Qualifier::Native => "native",
            Qualifier::Default => "default",
            Qualifier::Strictfp => "strictfp",
            Qualifier::Transient => "transient",
            Qualifier::Volatile => "volatile",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Qualifier {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Qualifier::Public),
            "protected" => Ok(Qualifier::Protected),
            "private" => Ok(Qualifier::Private),
            "abstract" => Ok(Qualifier::Abstract),
            "static" => Ok(Qualifier::Static),
            "final" => Ok(Qualifier::Final),
            "synchronized" => Ok(Qualifier::Synchronized),
            "native" => Ok(Qualifier::Native),
            "default" => Ok(Qualifier::Default),
            "strictfp" => Ok(Qualifier::Strictfp),
            "transient" => Ok(Qualifier::Transient),
            "volatile" => Ok(Qualifier::Volatile),
            other => Err(CodecError::UnknownQualifier(other.to_string())),
        }
    }
}

// ============================================================================
// Signature parts
// ============================================================================

/// Generic parameter with its upper bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeIdentity>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn with_bound(mut self, bound: impl Into<TypeIdentity>) -> Self {
        self.bounds.push(bound.into());
        self
    }
}

/// Formal parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeIdentity,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeIdentity>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Metadata tag (annotation) attached to a generated method's return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataTag {
    pub ty: TypeIdentity,
    /// `(member, value)` pairs; values are source text.
    #[serde(default)]
    pub members: Vec<(String, String)>,
}

impl MetadataTag {
    pub fn new(ty: impl Into<TypeIdentity>) -> Self {
        Self {
            ty: ty.into(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }
}

// ============================================================================
// Kinds
// ============================================================================

/// Whether generated forwarding methods are instance or static methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DelegateKind {
    InstanceDelegate,
    StaticDelegate,
}

impl DelegateKind {
    /// Wire tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            DelegateKind::InstanceDelegate => "Instance",
            DelegateKind::StaticDelegate => "Static",
        }
    }
}

impl FromStr for DelegateKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Instance" => Ok(DelegateKind::InstanceDelegate),
            "Static" => Ok(DelegateKind::StaticDelegate),
            other => Err(CodecError::InvalidDelegateKind(other.to_string())),
        }
    }
}

/// Behavior annotation on a raw member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Return the forwarded call's value.
    Return,
    /// Return the receiver for chaining.
    ReturnThis,
    /// No return value.
    VoidEffect,
    /// The owner's self-returning method.
    Designated,
}

/// Body shape of an ordinary extension method.
///
/// This is [`BehaviorKind`] without `Designated`: designated members never
/// reach the codec, so encode and decode match over these three only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Return,
    ReturnThis,
    VoidEffect,
}

impl MethodKind {
    /// Wire tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            MethodKind::Return => "Return",
            MethodKind::ReturnThis => "ReturnThis",
            MethodKind::VoidEffect => "VoidEffect",
        }
    }

    /// Kind written for a method under the given delegate kind.
    ///
    /// Static delegates have no receiver to hand back, so `ReturnThis`
    /// degrades to `VoidEffect`.
    pub fn for_delegate(self, delegate: DelegateKind) -> Self {
        match (delegate, self) {
            (DelegateKind::StaticDelegate, MethodKind::ReturnThis) => MethodKind::VoidEffect,
            (_, kind) => kind,
        }
    }
}

impl FromStr for MethodKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Return" => Ok(MethodKind::Return),
            "ReturnThis" => Ok(MethodKind::ReturnThis),
            "VoidEffect" => Ok(MethodKind::VoidEffect),
            other => Err(CodecError::InvalidMethodKind(other.to_string())),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// ============================================================================
// Merge identity
// ============================================================================

/// Identity under which method lists from different archives are concatenated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MergeKey {
    pub owner: TypeIdentity,
    pub delegate_kind: DelegateKind,
}

impl MergeKey {
    pub fn new(owner: impl Into<TypeIdentity>, delegate_kind: DelegateKind) -> Self {
        Self {
            owner: owner.into(),
            delegate_kind,
        }
    }

    /// Type generated for this key: the owner's simple name plus `suffix`,
    /// in the owner's package.
    pub fn extension_type(&self, suffix: &str) -> TypeIdentity {
        self.owner.with_suffix(suffix)
    }
}

impl fmt::Display for MergeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.owner, self.delegate_kind.as_tag())
    }
}

//! Extension class descriptors and the builder that validates them.
//!
//! A declaration provider hands over the members of one owning type, each
//! optionally annotated with a [`BehaviorKind`]. The builder partitions them
//! into the single designated (self-returning) method and the ordinary
//! extension methods, and rejects owners that violate the descriptor rules.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};
use crate::model::{
    BehaviorKind, DelegateKind, MergeKey, MetadataTag, MethodKind, Parameter, Qualifier,
    QualifierSet, TypeIdentity, TypeParameter,
};

// ============================================================================
// Raw declarations
// ============================================================================

/// A member declaration as supplied by a [`DeclarationProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    /// `None` for members that are not extension candidates.
    #[serde(default)]
    pub kind: Option<BehaviorKind>,
    #[serde(default)]
    pub qualifiers: QualifierSet,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_tags: Vec<MetadataTag>,
    /// Declared return type.
    pub returns: TypeIdentity,
}

impl MemberDeclaration {
    pub fn new(name: impl Into<String>, returns: impl Into<TypeIdentity>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            qualifiers: QualifierSet::new(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_tags: Vec::new(),
            returns: returns.into(),
        }
    }

    pub fn with_kind(mut self, kind: BehaviorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    pub fn with_type_parameter(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn with_parameter(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_return_tag(mut self, tag: MetadataTag) -> Self {
        self.return_tags.push(tag);
        self
    }
}

/// Supplies the member declarations of an owning type.
pub trait DeclarationProvider: Send + Sync {
    /// Members of `owner`, in declaration order.
    fn members(&self, owner: &TypeIdentity) -> BuildResult<Vec<MemberDeclaration>>;
}

/// In-memory declaration provider.
#[derive(Debug, Default, Clone)]
pub struct StaticDeclarations {
    types: HashMap<TypeIdentity, Vec<MemberDeclaration>>,
}

impl StaticDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the members of `owner`, replacing any previous set.
    pub fn insert(&mut self, owner: impl Into<TypeIdentity>, members: Vec<MemberDeclaration>) {
        self.types.insert(owner.into(), members);
    }
}

impl DeclarationProvider for StaticDeclarations {
    fn members(&self, owner: &TypeIdentity) -> BuildResult<Vec<MemberDeclaration>> {
        self.types
            .get(owner)
            .cloned()
            .ok_or_else(|| BuildError::Provider(format!("unknown type {}", owner)))
    }
}

// ============================================================================
// Validated descriptors
// ============================================================================

/// The owner's self-returning method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignatedMethod {
    pub name: String,
    pub returns: TypeIdentity,
}

/// An ordinary extension method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMethod {
    pub name: String,
    pub kind: MethodKind,
    pub qualifiers: QualifierSet,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_tags: Vec<MetadataTag>,
    /// Declared return type; only written to the wire for [`MethodKind::Return`].
    pub returns: TypeIdentity,
}

impl ExtensionMethod {
    fn from_declaration(decl: MemberDeclaration, kind: MethodKind) -> Self {
        Self {
            name: decl.name,
            kind,
            qualifiers: decl.qualifiers,
            type_parameters: decl.type_parameters,
            parameters: decl.parameters,
            return_tags: decl.return_tags,
            returns: decl.returns,
        }
    }

    /// Names of the formal parameters joined with `", "`.
    pub fn argument_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validated set of extension methods contributed by one owning type.
///
/// Equality and hashing consider the owner identity only, so two descriptors
/// for the same owner compare equal whatever their methods.
#[derive(Debug, Clone)]
pub struct ExtensionClass {
    delegate_kind: DelegateKind,
    owner: TypeIdentity,
    designated: DesignatedMethod,
    methods: Vec<ExtensionMethod>,
}

impl ExtensionClass {
    /// Validate `members` of `owner` into a descriptor.
    pub fn build(
        delegate_kind: DelegateKind,
        owner: impl Into<TypeIdentity>,
        members: impl IntoIterator<Item = MemberDeclaration>,
    ) -> BuildResult<Self> {
        let owner = owner.into();
        let mut designated: Option<DesignatedMethod> = None;
        let mut methods = Vec::new();

        for member in members {
            let kind = match member.kind {
                Some(kind) => kind,
                None => continue,
            };
            match kind {
                BehaviorKind::Designated => {
                    if let Some(existing) = &designated {
                        return Err(BuildError::DuplicateDesignated {
                            existing: existing.name.clone(),
                            duplicate: member.name,
                        });
                    }
                    designated = Some(DesignatedMethod {
                        name: member.name,
                        returns: member.returns,
                    });
                }
                BehaviorKind::Return => {
                    methods.push(ExtensionMethod::from_declaration(member, MethodKind::Return))
                }
                BehaviorKind::ReturnThis => methods.push(ExtensionMethod::from_declaration(
                    member,
                    MethodKind::ReturnThis,
                )),
                BehaviorKind::VoidEffect => methods.push(ExtensionMethod::from_declaration(
                    member,
                    MethodKind::VoidEffect,
                )),
            }
        }

        let designated = match designated {
            Some(designated) => designated,
            None => return Err(BuildError::MissingDesignated { owner }),
        };
        if designated.returns != owner {
            return Err(BuildError::DesignatedReturnMismatch {
                owner,
                found: designated.returns,
            });
        }
        if methods.is_empty() {
            return Err(BuildError::NoMethods { owner });
        }

        Ok(Self {
            delegate_kind,
            owner,
            designated,
            methods,
        })
    }

    /// Fetch the members of `owner` from `provider` and build.
    pub fn discover(
        provider: &dyn DeclarationProvider,
        delegate_kind: DelegateKind,
        owner: &TypeIdentity,
    ) -> BuildResult<Self> {
        let members = provider.members(owner)?;
        Self::build(delegate_kind, owner.clone(), members)
    }

    pub fn delegate_kind(&self) -> DelegateKind {
        self.delegate_kind
    }

    pub fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    pub fn designated(&self) -> &DesignatedMethod {
        &self.designated
    }

    pub fn methods(&self) -> &[ExtensionMethod] {
        &self.methods
    }

    pub fn merge_key(&self) -> MergeKey {
        MergeKey::new(self.owner.clone(), self.delegate_kind)
    }
}

impl PartialEq for ExtensionClass {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
    }
}

impl Eq for ExtensionClass {}

impl Hash for ExtensionClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
    }
}

//! Extension descriptors and their wire codec.
//!
//! Modules declare extension methods on an owning type. This crate validates
//! those declarations into [`ExtensionClass`] descriptors and serializes them
//! into an order-dependent token stream that can be packaged and later
//! decoded into [`GeneratedMethod`] declarations.
//!
//! ```rust
//! use extloom_core::prelude::*;
//!
//! let class = ExtensionClass::build(
//!     DelegateKind::InstanceDelegate,
//!     "com.example.Strings",
//!     vec![
//!         MemberDeclaration::new("get", "com.example.Strings").with_kind(BehaviorKind::Designated),
//!         MemberDeclaration::new("trim", "void").with_kind(BehaviorKind::ReturnThis),
//!     ],
//! )
//! .unwrap();
//!
//! let bytes = encode_class(&class).unwrap();
//! let decoded = ClassDecoder::new("Extensions").decode(&bytes).unwrap();
//! assert_eq!(decoded.methods.len(), 1);
//! ```

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod model;

pub use codec::{
    encode_class, write_class, ClassDecoder, DecodedClass, GeneratedMethod, Invocation, Statement,
};
pub use descriptor::{
    DeclarationProvider, DesignatedMethod, ExtensionClass, ExtensionMethod, MemberDeclaration,
    StaticDeclarations,
};
pub use error::{BuildError, BuildResult, CodecError, CodecResult};
pub use model::{
    BehaviorKind, DelegateKind, MergeKey, MetadataTag, MethodKind, Parameter, Qualifier,
    QualifierSet, TypeIdentity, TypeParameter,
};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::codec::{
        encode_class, ClassDecoder, DecodedClass, GeneratedMethod, Invocation, Statement,
    };
    pub use crate::descriptor::{
        DeclarationProvider, ExtensionClass, ExtensionMethod, MemberDeclaration,
        StaticDeclarations,
    };
    pub use crate::error::{BuildError, CodecError};
    pub use crate::model::{
        BehaviorKind, DelegateKind, MergeKey, MetadataTag, MethodKind, Parameter, Qualifier,
        TypeIdentity, TypeParameter,
    };
}

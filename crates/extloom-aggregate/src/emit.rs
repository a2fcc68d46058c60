//! Source emission.
//!
//! The aggregator turns each merge key into an [`EmissionJob`] and hands it
//! to a [`SourceEmitter`]. [`DirectoryEmitter`] writes one source file per
//! job below an output directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use extloom_core::{DelegateKind, GeneratedMethod, MergeKey, TypeIdentity};
use tracing::debug;

use crate::error::{EmitError, EmitResult};

/// One generated type: its key, its name and the merged methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionJob {
    pub key: MergeKey,
    pub extension_type: TypeIdentity,
    pub methods: Vec<GeneratedMethod>,
}

/// Renders emission jobs to some target.
#[async_trait]
pub trait SourceEmitter: Send + Sync {
    /// Produce the artifact for `job`.
    async fn emit(&self, job: &EmissionJob) -> EmitResult<()>;
}

/// Writes `<package path>/<Type>.java` files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryEmitter {
    root: PathBuf,
}

impl DirectoryEmitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that `job` is written to.
    pub fn path_for(&self, job: &EmissionJob) -> EmitResult<PathBuf> {
        let ty = &job.extension_type;
        let simple = ty.simple_name();
        if simple.is_empty() {
            return Err(EmitError::InvalidTarget(format!(
                "{} has no type name",
                job.key
            )));
        }
        let mut path = self.root.clone();
        for segment in ty.package().split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.java", simple));
        Ok(path)
    }
}

#[async_trait]
impl SourceEmitter for DirectoryEmitter {
    async fn emit(&self, job: &EmissionJob) -> EmitResult<()> {
        let path = self.path_for(job)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, render(job)).await?;
        debug!(path = %path.display(), methods = job.methods.len(), "Wrote generated source");
        Ok(())
    }
}

/// Plain source text for `job`.
pub fn render(job: &EmissionJob) -> String {
    let mut out = String::new();
    let ty = &job.extension_type;

    out.push_str("// Generated by extloom. Do not edit.\n");
    if !ty.package().is_empty() {
        let _ = writeln!(out, "package {};", ty.package());
        out.push('\n');
    }

    let modifiers = match job.key.delegate_kind {
        DelegateKind::StaticDelegate => "public final class",
        DelegateKind::InstanceDelegate => "public class",
    };
    let _ = writeln!(out, "{} {} {{", modifiers, ty.simple_name());

    for (idx, method) in job.methods.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        render_method(&mut out, method);
    }

    out.push_str("}\n");
    out
}

fn render_method(out: &mut String, method: &GeneratedMethod) {
    for tag in &method.return_tags {
        if tag.members.is_empty() {
            let _ = writeln!(out, "    @{}", tag.ty);
        } else {
            let members: Vec<String> = tag
                .members
                .iter()
                .map(|(name, value)| format!("{} = {}", name, value))
                .collect();
            let _ = writeln!(out, "    @{}({})", tag.ty, members.join(", "));
        }
    }

    out.push_str("    ");
    for qualifier in &method.qualifiers {
        let _ = write!(out, "{} ", qualifier);
    }
    if !method.type_parameters.is_empty() {
        let params: Vec<String> = method
            .type_parameters
            .iter()
            .map(|tp| {
                if tp.bounds.is_empty() {
                    tp.name.clone()
                } else {
                    let bounds: Vec<&str> = tp.bounds.iter().map(|b| b.as_str()).collect();
                    format!("{} extends {}", tp.name, bounds.join(" & "))
                }
            })
            .collect();
        let _ = write!(out, "<{}> ", params.join(", "));
    }
    let returns = method.returns.as_ref().map(|t| t.as_str()).unwrap_or("void");
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    let _ = writeln!(out, "{} {}({}) {{", returns, method.name, params.join(", "));

    for statement in &method.body {
        let _ = writeln!(out, "        {}", statement);
    }
    out.push_str("    }\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use extloom_core::{Invocation, MethodKind, Parameter, Qualifier, Statement};

    fn job(kind: DelegateKind) -> EmissionJob {
        let key = MergeKey::new("com.example.Strings", kind);
        let call = Invocation {
            template: "$T.get().pad(width)".to_string(),
            owner: TypeIdentity::new("com.example.Strings"),
        };
        EmissionJob {
            extension_type: key.extension_type("Extensions"),
            key,
            methods: vec![GeneratedMethod {
                name: "pad".to_string(),
                kind: MethodKind::ReturnThis,
                qualifiers: [Qualifier::Public].into_iter().collect(),
                type_parameters: vec![],
                parameters: vec![Parameter::new("width", "int")],
                return_tags: vec![],
                returns: Some(TypeIdentity::new("com.example.StringsExtensions")),
                body: vec![Statement::Invoke(call), Statement::ReturnSelf],
            }],
        }
    }

    #[test]
    fn test_render() {
        let text = render(&job(DelegateKind::InstanceDelegate));
        assert!(text.contains("package com.example;"));
        assert!(text.contains("public class StringsExtensions {"));
        assert!(text.contains(
            "    public com.example.StringsExtensions pad(int width) {\n"
        ));
        assert!(text.contains("        com.example.Strings.get().pad(width);\n"));
        assert!(text.contains("        return this;\n"));
    }

    #[test]
    fn test_path_for() {
        let emitter = DirectoryEmitter::new("/tmp/out");
        let path = emitter.path_for(&job(DelegateKind::StaticDelegate)).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/tmp/out/com/example/StringsExtensions.java")
        );
    }
}

//! Import resolution.
//!
//! The analyzer never touches the filesystem directly. It drives an
//! [`ImportResolver`], which the embedding (normally the CLI, or a test)
//! implements: given the importing file's directory and the quoted relative
//! path, the resolver hands back the target's canonical path and source
//! text, or an error message.
//!
//! [`ImportState`] is the per-compilation bookkeeping shared by the root
//! analyzer and every nested module analysis: a completed-module cache so
//! each file is compiled once, an in-progress map holding each module's
//! pre-registered exports so circular imports can be satisfied with the
//! partially-populated module, and the list of compiled module trees the
//! emitter turns into sibling `.py` files.

use crate::analysis::ModuleExports;
use quasar_syntax::ast::Program;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies the source text of `import "./..."` targets.
pub trait ImportResolver {
    /// Resolves `relative` against `base_dir`.
    ///
    /// On success returns the canonicalized path (used for cycle and
    /// duplicate detection) and the file contents. The error string is
    /// embedded in the `E0901` diagnostic.
    fn resolve(&self, base_dir: &Path, relative: &str) -> Result<ResolvedImport, String>;
}

/// A successfully resolved local import.
#[derive(Debug, Clone)]
pub struct ResolvedImport {
    pub canonical_path: PathBuf,
    pub source: String,
}

/// The filesystem-backed resolver used by `compile()` and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl ImportResolver for FsResolver {
    fn resolve(&self, base_dir: &Path, relative: &str) -> Result<ResolvedImport, String> {
        let joined = base_dir.join(relative);
        let canonical_path = joined
            .canonicalize()
            .map_err(|err| format!("cannot resolve `{}`: {}", joined.display(), err))?;
        let source = fs::read_to_string(&canonical_path)
            .map_err(|err| format!("cannot read `{}`: {}", canonical_path.display(), err))?;
        Ok(ResolvedImport {
            canonical_path,
            source,
        })
    }
}

/// A resolver over an in-memory file map, for tests and embedders that do
/// not want filesystem access.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    files: HashMap<PathBuf, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }
}

impl ImportResolver for MapResolver {
    fn resolve(&self, base_dir: &Path, relative: &str) -> Result<ResolvedImport, String> {
        // Normalize `./` prefixes the way the filesystem would.
        let trimmed = relative.strip_prefix("./").unwrap_or(relative);
        let canonical_path = base_dir.join(trimmed);
        match self.files.get(&canonical_path) {
            Some(source) => Ok(ResolvedImport {
                canonical_path,
                source: source.clone(),
            }),
            None => Err(format!("no such file `{}`", canonical_path.display())),
        }
    }
}

/// A local module compiled during analysis, ready for emission.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    /// Module name: the file stem, which is also the emitted `import` name.
    pub name: String,
    /// The module's analyzed tree.
    pub program: Program,
}

/// Per-compilation import bookkeeping shared across nested analyses.
#[derive(Debug, Default)]
pub struct ImportState {
    /// Modules currently on the analysis stack, keyed by canonical path.
    /// The value is the snapshot of exports taken right after declaration
    /// registration; a re-entry (circular import) is satisfied from it.
    pub in_progress: HashMap<PathBuf, ModuleExports>,
    /// Fully analyzed modules, keyed by canonical path.
    pub completed: HashMap<PathBuf, ModuleExports>,
    /// Analyzed module trees in dependency-first order (a module precedes
    /// everything that imports it), for emission.
    pub modules: Vec<CompiledModule>,
}

impl ImportState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Derives the module name from an import path: the file stem.
/// `"./lib/utils.qsr"` imports as `utils`.
pub fn module_name_of(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

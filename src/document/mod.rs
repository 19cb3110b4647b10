//! This module contains the [`Document`], a lexed Huff source file together
//! with every document that it includes.
//!
//! Includes are loaded eagerly and recursively when the document is created,
//! so the interpreter never touches the filesystem itself. The document then
//! serves as the [`MacroResolver`] for names that its own tokens leave
//! undefined.

pub mod loader;

use std::{
    collections::HashSet,
    path::{Component, Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{
    document::loader::SourceLoader,
    error::{self, container::Locatable, document},
    lexer::{index::SignatureKind, lex, TokenKind, TokenStream},
    vm::resolver::{DynResolver, ExternalMacro, MacroResolver},
};

/// A lexed Huff source file and the documents it includes.
#[derive(Clone, Debug)]
pub struct Document {
    /// The path from which the document was loaded.
    path: PathBuf,

    /// The full source text.
    text: String,

    /// The lexed source text.
    tokens: TokenStream,

    /// The documents named by `#include` directives, in the order that they
    /// appear.
    includes: Vec<Rc<Document>>,

    /// The lexing errors in this document, and the problems loading its
    /// includes.
    errors: error::Errors,
}

impl Document {
    /// Loads the document at `path` and everything it includes through
    /// `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the document at `path` itself cannot be read.
    /// Problems with its includes are recorded in [`Self::errors`] instead.
    pub fn load(path: impl AsRef<Path>, loader: &dyn SourceLoader) -> error::Result<Self> {
        let path = normalize(path.as_ref());
        let text = loader.load(&path).map_err(|e| {
            document::Error::Unreadable {
                path:    path.display().to_string(),
                message: e.to_string(),
            }
            .locate(0)
        })?;

        Ok(Self::build(path.clone(), text, loader, &mut vec![path]))
    }

    /// Creates a document from `text` that claims to live at `path`, loading
    /// its includes through `loader`.
    #[must_use]
    pub fn from_source(
        path: impl AsRef<Path>,
        text: impl Into<String>,
        loader: &dyn SourceLoader,
    ) -> Self {
        let path = normalize(path.as_ref());
        Self::build(path.clone(), text.into(), loader, &mut vec![path])
    }

    /// Wraps `self` into an [`Rc`] that can serve as the resolver for its own
    /// tokens.
    #[must_use]
    pub fn in_rc(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Gets the path of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the source text of the document.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the tokens of the document.
    #[must_use]
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Gets the documents included directly by this one.
    #[must_use]
    pub fn includes(&self) -> &[Rc<Document>] {
        &self.includes
    }

    /// Gets the problems found while lexing this document and loading its
    /// includes.
    #[must_use]
    pub fn errors(&self) -> &error::Errors {
        &self.errors
    }

    /// Lexes `text` and loads its includes. The `chain` holds the paths of the
    /// documents currently being loaded, from the root down to this one.
    fn build(
        path: PathBuf,
        text: String,
        loader: &dyn SourceLoader,
        chain: &mut Vec<PathBuf>,
    ) -> Self {
        let (tokens, lex_errors) = lex(&text);
        let mut errors: error::Errors = lex_errors.into();
        let mut includes = Vec::new();

        for token in tokens.iter().filter(|t| t.kind == TokenKind::Include) {
            let Some(include) = token.include_path() else {
                continue;
            };
            let included = resolve_include(&path, include);
            let shown = included.display().to_string();

            if chain.contains(&included) {
                warn!(line = token.line, path = %shown, "include cycle");
                errors.add_located(
                    token.line,
                    document::Error::IncludeCycle { path: shown }.into(),
                );
                continue;
            }

            let text = match loader.load(&included) {
                Ok(text) => text,
                Err(e) => {
                    warn!(line = token.line, path = %shown, error = %e, "unreadable include");
                    errors.add_located(
                        token.line,
                        document::Error::Unreadable {
                            path:    shown,
                            message: e.to_string(),
                        }
                        .into(),
                    );
                    continue;
                }
            };

            chain.push(included.clone());
            let child = Self::build(included, text, loader, chain);
            chain.pop();

            // Problems deeper in the include tree show up on the directive
            // that led to them.
            for problem in child.errors.payloads() {
                if matches!(problem.payload, error::Error::Document(_)) {
                    errors.add_located(token.line, problem.payload.clone());
                }
            }

            debug!(path = %shown, "loaded include");
            includes.push(Rc::new(child));
        }

        Self {
            path,
            text,
            tokens,
            includes,
            errors,
        }
    }

    /// Searches the include tree below this document, depth first and in
    /// include order, for the first document for which `find` returns a
    /// value.
    ///
    /// Each document is visited at most once.
    fn search<T>(&self, find: impl Fn(&Rc<Document>) -> Option<T>) -> Option<T> {
        let mut visited = HashSet::new();
        let mut pending: Vec<&Rc<Document>> = self.includes.iter().rev().collect();

        while let Some(document) = pending.pop() {
            if !visited.insert(document.path.as_path()) {
                continue;
            }
            if let Some(found) = find(document) {
                return Some(found);
            }
            pending.extend(document.includes.iter().rev());
        }

        None
    }
}

impl MacroResolver for Document {
    fn resolve_macro(&self, name: &str) -> Option<ExternalMacro> {
        self.search(|document| {
            let location = document.tokens.macro_location(name)?;
            let resolver: DynResolver = document.clone();
            Some(ExternalMacro {
                tokens: document.tokens.clone(),
                location,
                resolver,
            })
        })
    }

    fn resolve_signature(&self, kind: SignatureKind, name: &str) -> Option<String> {
        self.search(|document| document.tokens.signature(kind, name).map(ToString::to_string))
    }
}

/// Resolves the `include` path written in the document at `from`.
fn resolve_include(from: &Path, include: &str) -> PathBuf {
    let directory = from.parent().unwrap_or_else(|| Path::new(""));
    normalize(&directory.join(include))
}

/// Removes `.` components from `path` and folds `..` components into their
/// parents, without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::{
        document::{loader::MemoryLoader, normalize, Document},
        error::{document, Error},
        lexer::index::SignatureKind,
        vm::resolver::MacroResolver,
    };

    #[test]
    fn normalizes_paths_lexically() {
        assert_eq!(normalize(Path::new("./a/b/../c.huff")), Path::new("a/c.huff"));
        assert_eq!(normalize(Path::new("../c.huff")), Path::new("../c.huff"));
    }

    #[test]
    fn loads_includes_relative_to_the_including_document() -> anyhow::Result<()> {
        let loader = MemoryLoader::new()
            .with_file("src/main.huff", "#include \"./lib/utils.huff\"")
            .with_file(
                "src/lib/utils.huff",
                "#define macro UTIL() = takes(0) returns(1) {\n 0x01\n}",
            );

        let root = Document::load("src/main.huff", &loader).map_err(|e| anyhow::anyhow!("{e}"))?;
        assert!(root.errors().is_empty());
        assert_eq!(root.includes().len(), 1);
        assert_eq!(root.includes()[0].path(), Path::new("src/lib/utils.huff"));

        let found = root.resolve_macro("UTIL").expect("UTIL was not resolved");
        assert_eq!(found.location.definition, 0);
        assert!(root.resolve_macro("OTHER").is_none());

        Ok(())
    }

    #[test]
    fn records_include_cycles() {
        let loader = MemoryLoader::new()
            .with_file("a.huff", "#include \"b.huff\"")
            .with_file("b.huff", "#include \"a.huff\"");

        let root = Document::from_source("a.huff", "#include \"b.huff\"", &loader);
        assert_eq!(root.includes().len(), 1);

        let payloads = root.errors().payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].location, 1);
        assert!(matches!(
            payloads[0].payload,
            Error::Document(document::Error::IncludeCycle { .. })
        ));
    }

    #[test]
    fn records_unreadable_includes() {
        let loader = MemoryLoader::new();
        let root = Document::from_source("main.huff", "\n#include 'missing.huff'", &loader);

        assert!(root.includes().is_empty());
        assert_eq!(root.errors().payloads()[0].location, 2);
    }

    #[test]
    fn resolves_signatures_through_includes() {
        let loader = MemoryLoader::new()
            .with_file("interface.huff", "#define function owner() view returns (address)");
        let root = Document::from_source("main.huff", "#include \"interface.huff\"", &loader);

        assert_eq!(
            root.resolve_signature(SignatureKind::Function, "owner"),
            Some("owner()".to_string())
        );
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let loader = MemoryLoader::new();
        assert!(Document::load("nowhere.huff", &loader).is_err());
    }
}

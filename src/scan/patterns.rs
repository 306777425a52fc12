//! Best-effort lexical metadata extraction, keyed by file extension.
//!
//! This is pattern matching, not parsing: each language contributes three
//! regexes (comments, function headers, imports) and whatever they match is
//! taken at face value.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Comment texts in source order, trimmed, empties dropped.
    pub comments: Vec<String>,
    /// Names of defined functions in source order.
    pub functions: Vec<String>,
    /// Imported module names.
    pub imports: BTreeSet<String>,
}

/// The three patterns registered for one language.
#[derive(Debug, Clone)]
pub struct LanguagePatterns {
    /// Display name of the language.
    pub language: &'static str,
    comment: Regex,
    function: Regex,
    import: Regex,
}

impl LanguagePatterns {
    /// Builds a pattern set from raw regex sources.
    ///
    /// Each regex reports its match through capture group 1. Import
    /// captures may hold a comma-separated list (`a, b as c`); each item
    /// contributes its first word.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile.
    pub fn new(
        language: &'static str,
        comment: &str,
        function: &str,
        import: &str,
    ) -> Result<Self, String> {
        let compile = |kind: &str, src: &str| {
            Regex::new(src).map_err(|e| format!("invalid {language} {kind} pattern: {e}"))
        };
        Ok(Self {
            language,
            comment: compile("comment", comment)?,
            function: compile("function", function)?,
            import: compile("import", import)?,
        })
    }

    /// Patterns for Python sources.
    ///
    /// # Panics
    ///
    /// Panics if the built-in patterns fail to compile.
    #[must_use]
    pub fn python() -> Self {
        Self::new(
            "python",
            r"(?m)#(.*)$",
            r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(",
            r"(?m)^[ \t]*(?:from[ \t]+([A-Za-z0-9_.]+)[ \t]+import\b|import[ \t]+([^#\r\n;]+))",
        )
        .expect("built-in python patterns compile")
    }

    /// Runs all three scans over `source`.
    #[must_use]
    pub fn extract(&self, source: &str) -> Extraction {
        let comments = self
            .comment
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let functions = self
            .function
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        let mut imports = BTreeSet::new();
        for caps in self.import.captures_iter(source) {
            // Group 1: `from x import ...`; group 2: `import a, b as c`.
            if let Some(module) = caps.get(1) {
                imports.insert(module.as_str().to_string());
            } else if let Some(list) = caps.get(2) {
                imports.extend(
                    list.as_str()
                        .split(',')
                        .filter_map(|item| item.split_whitespace().next())
                        .map(|name| name.trim_matches(|c| c == '(' || c == ')'))
                        .filter(|name| !name.is_empty())
                        .map(String::from),
                );
            }
        }

        Extraction { comments, functions, imports }
    }
}

/// Maps file extensions (without the dot) to their extraction patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    by_extension: HashMap<String, LanguagePatterns>,
}

impl PatternRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registry used by the CLI: Python only.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty().with("py", LanguagePatterns::python())
    }

    /// Registers `patterns` for `extension`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, extension: &str, patterns: LanguagePatterns) -> Self {
        self.by_extension.insert(extension.to_ascii_lowercase(), patterns);
        self
    }

    /// Looks up the patterns for an extension.
    #[must_use]
    pub fn get(&self, extension: &str) -> Option<&LanguagePatterns> {
        self.by_extension.get(&extension.to_ascii_lowercase())
    }

    /// Returns `true` if `extension` has registered patterns.
    #[must_use]
    pub fn handles(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }
}

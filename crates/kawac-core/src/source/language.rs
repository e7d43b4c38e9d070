//! Source languages handled by a kawac build step.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static JAVA_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*package\s+([^\s;]+)\s*;?").expect("valid java package pattern")
});

// `(module-name com.example.Foo)` and `(module-name <com.example.Foo>)` both
// capture `com.example`.
static KAWA_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\(module-name\s+[<"']?([^\s;<>"']+)\."#)
        .expect("valid kawa module-name pattern")
});

/// A language whose sources take part in a mixed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Kawa Scheme, compiled by the external `kawa` compiler.
    Kawa,
    /// Java, compiled afterwards by `javac`.
    Java,
}

impl Language {
    /// Every language, primary first.
    pub const ALL: [Language; 2] = [Language::Kawa, Language::Java];

    /// Registered source extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Kawa => "scm",
            Self::Java => "java",
        }
    }

    /// Language of a file, by exact extension match.
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|lang| lang.extension() == ext)
    }

    /// Pattern matching a module/package qualifier line. Group 1 is the
    /// dotted qualifier.
    pub fn qualifier_pattern(self) -> &'static Regex {
        match self {
            Self::Kawa => &KAWA_QUALIFIER,
            Self::Java => &JAVA_QUALIFIER,
        }
    }

    /// Pattern matching a type definition named `name`.
    pub fn type_pattern(self, name: &str) -> Regex {
        let name = regex::escape(name);
        let pattern = match self {
            Self::Kawa => format!(
                r"^\s*\((?:define-simple-class|define-class|activity)\s+<?{name}>?(?:\s|\)|$)"
            ),
            Self::Java => format!(r"\b(?:trait|class|object)\s+{name}\b"),
        };
        // The name is escaped, so the pattern is always well formed.
        Regex::new(&pattern).expect("valid type-definition pattern")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kawa => write!(f, "Kawa"),
            Self::Java => write!(f, "Java"),
        }
    }
}

//! Build option resolution through a parent/child scope chain.
//!
//! Every module of a project owns an [`OptionScope`] whose parent is the
//! enclosing module's scope. An option is looked up independently: the first
//! scope on the chain that sets it explicitly wins, otherwise an ambient
//! default applies. Values from different scopes are never merged.

use std::sync::Arc;

use serde::Deserialize;

/// Build-wide switches supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbientSettings {
    /// Trace commands instead of running them.
    pub dry_run: bool,

    /// Verbose build; also the default for strict diagnostics.
    pub verbose: bool,

    /// Debug build; the default for debug symbols.
    pub debug: bool,
}

/// Options for the secondary (Java) compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JavacOptions {
    /// Report warnings. Defaults to the resolved diagnostics strictness.
    pub warnings: Option<bool>,

    /// Emit debug information. Defaults to the resolved debug symbols option.
    pub debug: Option<bool>,

    /// Show deprecation details.
    #[serde(default)]
    pub deprecation: bool,

    /// `-source` release.
    pub source: Option<String>,

    /// `-target` release.
    pub target: Option<String>,

    /// `-Xlint` argument; an empty string enables all lint warnings.
    pub lint: Option<String>,

    /// Additional raw arguments.
    #[serde(default, rename = "args")]
    pub extra_args: Vec<String>,
}

/// Options set explicitly on one scope. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalOptions {
    /// Treat undefined variables and unknown method invocations as errors.
    #[serde(rename = "warnings")]
    pub diagnostics_strict: Option<bool>,

    #[serde(rename = "optimise", alias = "optimize")]
    pub optimize: Option<bool>,

    #[serde(rename = "debug")]
    pub debug_symbols: Option<bool>,

    /// Skip compilation when every mapped artifact is up to date.
    pub incremental: Option<bool>,

    /// Extra arguments passed verbatim to the Kawa compiler.
    #[serde(rename = "kawac")]
    pub extra_args: Option<Vec<String>>,

    pub javac: Option<JavacOptions>,
}

/// Fully resolved options for one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub diagnostics_strict: bool,
    pub optimize: bool,
    pub debug_symbols: bool,
    pub extra_args: Vec<String>,
    pub incremental: bool,
    pub javac: JavacOptions,
}

/// An immutable node in the option scope tree.
#[derive(Debug, Default)]
pub struct OptionScope {
    name: String,
    local: LocalOptions,
    parent: Option<Arc<OptionScope>>,
}

impl OptionScope {
    /// Create a root scope.
    pub fn root(name: impl Into<String>, local: LocalOptions) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            local,
            parent: None,
        })
    }

    /// Create a child scope of `parent`.
    pub fn child(parent: &Arc<Self>, name: impl Into<String>, local: LocalOptions) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            local,
            parent: Some(Arc::clone(parent)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&OptionScope> {
        self.parent.as_deref()
    }

    /// Scopes from this one up to the root.
    pub fn ancestry(&self) -> impl Iterator<Item = &OptionScope> {
        std::iter::successors(Some(self), |scope| scope.parent())
    }

    /// First explicit value on the chain starting at this scope.
    pub fn lookup<T>(&self, pick: impl Fn(&LocalOptions) -> Option<T>) -> Option<T> {
        self.ancestry().find_map(|scope| pick(&scope.local))
    }

    /// Resolve this scope's options.
    pub fn resolve(&self, ambient: &AmbientSettings) -> BuildOptions {
        OptionsResolver::resolve(&self.local, self.parent(), ambient)
    }
}

/// Pure option lookup over a scope chain.
pub struct OptionsResolver;

impl OptionsResolver {
    /// Resolve `local` against an optional parent chain and ambient defaults.
    pub fn resolve(
        local: &LocalOptions,
        parent: Option<&OptionScope>,
        ambient: &AmbientSettings,
    ) -> BuildOptions {
        fn pick<T>(
            local: &LocalOptions,
            parent: Option<&OptionScope>,
            field: impl Fn(&LocalOptions) -> Option<T>,
        ) -> Option<T> {
            field(local).or_else(|| parent.and_then(|p| p.lookup(field)))
        }

        BuildOptions {
            diagnostics_strict: pick(local, parent, |o| o.diagnostics_strict)
                .unwrap_or(ambient.verbose),
            optimize: pick(local, parent, |o| o.optimize).unwrap_or(false),
            debug_symbols: pick(local, parent, |o| o.debug_symbols).unwrap_or(ambient.debug),
            extra_args: pick(local, parent, |o| o.extra_args.clone()).unwrap_or_default(),
            incremental: pick(local, parent, |o| o.incremental).unwrap_or(false),
            javac: pick(local, parent, |o| o.javac.clone()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(value: bool) -> LocalOptions {
        LocalOptions {
            diagnostics_strict: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_local_wins_over_parent() {
        let parent = OptionScope::root("root", strict(true));
        let resolved =
            OptionsResolver::resolve(&strict(false), Some(&parent), &AmbientSettings::default());
        assert!(!resolved.diagnostics_strict);
    }

    #[test]
    fn test_unset_inherits_parent() {
        let parent = OptionScope::root("root", strict(true));
        let resolved = OptionsResolver::resolve(
            &LocalOptions::default(),
            Some(&parent),
            &AmbientSettings::default(),
        );
        assert!(resolved.diagnostics_strict);
    }

    #[test]
    fn test_grandparent_lookup() {
        let root = OptionScope::root(
            "root",
            LocalOptions {
                debug_symbols: Some(false),
                extra_args: Some(vec!["--full-tailcalls".into()]),
                ..Default::default()
            },
        );
        let mid = OptionScope::child(&root, "mid", strict(true));
        let leaf = OptionScope::child(&mid, "leaf", LocalOptions::default());

        let ambient = AmbientSettings {
            debug: true,
            ..Default::default()
        };
        let resolved = leaf.resolve(&ambient);
        assert!(resolved.diagnostics_strict);
        assert!(!resolved.debug_symbols);
        assert_eq!(resolved.extra_args, vec!["--full-tailcalls".to_string()]);
        assert_eq!(
            leaf.ancestry().map(OptionScope::name).collect::<Vec<_>>(),
            vec!["leaf", "mid", "root"]
        );
    }

    #[test]
    fn test_ambient_defaults() {
        let ambient = AmbientSettings {
            verbose: true,
            debug: true,
            dry_run: false,
        };
        let resolved = OptionsResolver::resolve(&LocalOptions::default(), None, &ambient);
        assert!(resolved.diagnostics_strict);
        assert!(resolved.debug_symbols);
        assert!(!resolved.optimize);
        assert!(!resolved.incremental);
        assert!(resolved.extra_args.is_empty());
    }

    #[test]
    fn test_extra_args_are_not_merged() {
        let root = OptionScope::root(
            "root",
            LocalOptions {
                extra_args: Some(vec!["--a".into()]),
                ..Default::default()
            },
        );
        let child = OptionScope::child(
            &root,
            "child",
            LocalOptions {
                extra_args: Some(vec!["--b".into()]),
                ..Default::default()
            },
        );
        assert_eq!(
            child.resolve(&AmbientSettings::default()).extra_args,
            vec!["--b".to_string()]
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_option() {
        let err = toml::from_str::<LocalOptions>("warnings = true\nfrobnicate = 1\n");
        assert!(err.is_err());

        let options: LocalOptions =
            toml::from_str("warnings = true\noptimise = true\nkawac = [\"--x\"]\n").unwrap();
        assert_eq!(options.diagnostics_strict, Some(true));
        assert_eq!(options.optimize, Some(true));
        assert_eq!(options.extra_args, Some(vec!["--x".to_string()]));
    }
}

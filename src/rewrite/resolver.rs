use crate::config::RewriteConfig;
use crate::manifest::AssetManifest;

/// Resolves candidate references against the manifest and renders the final
/// replacement text.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    config: &'a RewriteConfig,
    manifest: &'a AssetManifest,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver borrowing the run configuration and manifest.
    pub fn new(config: &'a RewriteConfig, manifest: &'a AssetManifest) -> Self {
        Self { config, manifest }
    }

    /// Resolve a candidate reference to its final replacement text.
    ///
    /// Lookup falls back through: the candidate verbatim, the candidate with
    /// one leading separator removed, the candidate with its query string or
    /// fragment removed (again with and without the leading separator), and
    /// finally the candidate with the configured `base` prefix removed. A
    /// candidate matching no entry resolves to `None` and is left untouched
    /// by the substitution engines.
    pub fn resolve(&self, candidate: &str) -> Option<String> {
        let value = self.lookup(candidate)?;
        Some(self.replacement_text(value))
    }

    /// Render the final replacement text for a manifest value: the configured
    /// `strip` prefix is removed from the value and `prefix` is prepended.
    pub fn replacement_text(&self, value: &str) -> String {
        format!("{}{}", self.config.prefix, self.strip_value(value))
    }

    fn lookup(&self, candidate: &str) -> Option<&'a str> {
        if let Some(value) = self.manifest.get(candidate) {
            return Some(value);
        }
        if let Some(value) = candidate
            .strip_prefix('/')
            .and_then(|trimmed| self.manifest.get(trimmed))
        {
            return Some(value);
        }

        let bare = match candidate.find(['?', '#']) {
            Some(split) => &candidate[..split],
            None => candidate,
        };
        if bare != candidate {
            if let Some(value) = self.manifest.get(bare) {
                return Some(value);
            }
            if let Some(value) = bare
                .strip_prefix('/')
                .and_then(|trimmed| self.manifest.get(trimmed))
            {
                return Some(value);
            }
        }

        if !self.config.base.is_empty() {
            return self.manifest.get(self.debase(candidate));
        }
        None
    }

    /// Remove a leading `/{base}` or bare `{base}` prefix from a candidate.
    fn debase<'c>(&self, candidate: &'c str) -> &'c str {
        let base = self.config.base.as_str();
        if let Some(rest) = candidate
            .strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(base))
        {
            return rest;
        }
        candidate.strip_prefix(base).unwrap_or(candidate)
    }

    /// Remove a leading `/{strip}` or bare `{strip}` prefix from a value.
    fn strip_value<'v>(&self, value: &'v str) -> &'v str {
        let strip = self.config.strip.as_str();
        if strip.is_empty() {
            return value;
        }
        if let Some(rest) = value
            .strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(strip))
        {
            return rest;
        }
        value.strip_prefix(strip).unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteOptions;

    fn manifest() -> AssetManifest {
        AssetManifest::from_iter([
            ("img/logo.png", "img/logo.a1b2c3.png"),
            ("css/app.css", "dist/css/app.css"),
        ])
    }

    fn config(options: RewriteOptions) -> RewriteConfig {
        options.into_config().expect("options should compile")
    }

    #[test]
    fn resolves_exact_entries() {
        let manifest = manifest();
        let config = RewriteConfig::default();
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(
            resolver.resolve("img/logo.png").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
    }

    #[test]
    fn falls_back_to_leading_separator_stripping() {
        let manifest = manifest();
        let config = RewriteConfig::default();
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(
            resolver.resolve("/img/logo.png").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
    }

    #[test]
    fn falls_back_to_query_and_fragment_stripping() {
        let manifest = manifest();
        let config = RewriteConfig::default();
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(
            resolver.resolve("/img/logo.png?v=2").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
        assert_eq!(
            resolver.resolve("img/logo.png#section").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
    }

    #[test]
    fn falls_back_to_base_stripping() {
        let manifest = manifest();
        let config = config(RewriteOptions {
            base: "assets/".into(),
            ..Default::default()
        });
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(
            resolver.resolve("/assets/img/logo.png").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
        assert_eq!(
            resolver.resolve("assets/img/logo.png").as_deref(),
            Some("img/logo.a1b2c3.png")
        );
    }

    #[test]
    fn leaves_unknown_candidates_unresolved() {
        let manifest = manifest();
        let config = RewriteConfig::default();
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(resolver.resolve("js/missing.js"), None);
    }

    #[test]
    fn strips_configured_prefix_from_replacement_values() {
        let manifest = manifest();
        let config = config(RewriteOptions {
            strip: "dist".into(),
            ..Default::default()
        });
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(resolver.resolve("css/app.css").as_deref(), Some("/css/app.css"));
    }

    #[test]
    fn prepends_prefix_to_replacements() {
        let manifest = manifest();
        let config = config(RewriteOptions {
            prefix: "https://cdn.example.com/".into(),
            ..Default::default()
        });
        let resolver = PathResolver::new(&config, &manifest);

        assert_eq!(
            resolver.resolve("img/logo.png").as_deref(),
            Some("https://cdn.example.com/img/logo.a1b2c3.png")
        );
    }
}

//! Packaged snippet templates and the substitution expander.
//!
//! Templates use the `@(key)` / `@key` expansion syntax; `@@` produces a literal `@`.
//! Every referenced key must be present in the substitution map. Text values are
//! backslash-escaped so they stay literal inside the double-quoted `RUN` arguments the
//! snippets splice them into.

use crate::constants::{SNIPPET_TEMPLATE_SUFFIX, TEMPLATE_DIR};
use crate::error::{ExtensionError, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Value substituted into a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubstitutionValue {
    Text(String),
    Number(u64),
}

impl fmt::Display for SubstitutionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for SubstitutionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SubstitutionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u32> for SubstitutionValue {
    fn from(value: u32) -> Self {
        Self::Number(u64::from(value))
    }
}

/// Key/value data used to fill a template
pub type Substitutions = BTreeMap<String, SubstitutionValue>;

/// Templates compiled into the binary, keyed by file name
static EMBEDDED: &[(&str, &str)] = &[
    (
        "dev_helpers_snippet.Dockerfile.em",
        include_str!("../templates/dev_helpers_snippet.Dockerfile.em"),
    ),
    (
        "pulse_snippet.Dockerfile.em",
        include_str!("../templates/pulse_snippet.Dockerfile.em"),
    ),
    (
        "user_snippet.Dockerfile.em",
        include_str!("../templates/user_snippet.Dockerfile.em"),
    ),
];

static EXPANSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@@|@\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)|@([A-Za-z_][A-Za-z0-9_]*)")
        .expect("expansion pattern is valid")
});

/// Conventional resource path of an extension's snippet template
pub fn snippet_path(extension: &str) -> String {
    format!("{}/{}{}", TEMPLATE_DIR, extension, SNIPPET_TEMPLATE_SUFFIX)
}

/// Fetch a packaged template by resource path (`templates/<file>`)
pub fn load(path: &str) -> Result<&'static str> {
    let file = path
        .strip_prefix(TEMPLATE_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path);

    EMBEDDED
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, body)| *body)
        .ok_or_else(|| ExtensionError::TemplateNotFound {
            path: path.to_string(),
        })
}

/// Expand `template` against `subs`; `origin` names the template in errors
pub fn render(template: &str, subs: &Substitutions, origin: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in EXPANSION.captures_iter(template) {
        let whole = caps.get(0).expect("group 0 always matches");
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match key_of(&caps) {
            None => out.push('@'),
            Some(key) => {
                let value =
                    subs.get(key)
                        .ok_or_else(|| ExtensionError::UnresolvedSubstitution {
                            key: key.to_string(),
                            template: origin.to_string(),
                        })?;
                match value {
                    SubstitutionValue::Text(text) => out.push_str(&escape_text(text)),
                    SubstitutionValue::Number(n) => out.push_str(&n.to_string()),
                }
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Escape the characters a shell still interprets inside double quotes
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '$', '`']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

fn key_of<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Load and expand the snippet template belonging to `extension`
pub fn render_snippet(extension: &str, subs: &Substitutions) -> Result<String> {
    let path = snippet_path(extension);
    let body = load(&path)?;
    let rendered = render(body, subs, &path)?;
    tracing::debug!(extension, template = %path, bytes = rendered.len(), "Rendered snippet");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(pairs: &[(&str, SubstitutionValue)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_snippet_path_convention() {
        assert_eq!(
            snippet_path("dev_helpers"),
            "templates/dev_helpers_snippet.Dockerfile.em"
        );
    }

    #[test]
    fn test_render_parenthesized_and_bare_keys() {
        let map = subs(&[("name", "dev".into()), ("uid", 1000u32.into())]);
        let out = render("USER @(name) # @uid", &map, "inline").unwrap();
        assert_eq!(out, "USER dev # 1000");
    }

    #[test]
    fn test_text_values_are_escaped() {
        let map = subs(&[("gecos", r#"Dev "Q" $HOME `id` \n"#.into())]);
        let out = render(r#"-c "@(gecos)""#, &map, "inline").unwrap();
        assert_eq!(out, r#"-c "Dev \"Q\" \$HOME \`id\` \\n""#);
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("Dev Eloper,,,"), Cow::Borrowed(_)));
        assert!(matches!(escape_text("a$b"), Cow::Owned(ref s) if s == "a\\$b"));
    }

    #[test]
    fn test_double_at_is_literal() {
        let map = Substitutions::new();
        let out = render("mail me@@example", &map, "inline").unwrap();
        assert_eq!(out, "mail me@example");
    }

    #[test]
    fn test_unresolved_key_fails() {
        let map = subs(&[("name", "dev".into())]);
        let err = render("@(name) @(shell)", &map, "inline").unwrap_err();
        match err {
            ExtensionError::UnresolvedSubstitution { key, template } => {
                assert_eq!(key, "shell");
                assert_eq!(template, "inline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_template_names_path() {
        let err = render_snippet("nonexistent", &Substitutions::new()).unwrap_err();
        assert!(
            matches!(err, ExtensionError::TemplateNotFound { ref path } if path == "templates/nonexistent_snippet.Dockerfile.em")
        );
    }

    #[test]
    fn test_packaged_templates_load() {
        for name in ["dev_helpers", "pulse", "user"] {
            assert!(load(&snippet_path(name)).is_ok(), "{name} template missing");
        }
    }
}

/// Error types raised while activating and rendering extensions
use std::io;

/// Main error type for extension operations
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// A named group does not exist in the host group database
    #[error("group '{group}' does not exist on this host")]
    MissingGroup { group: String },

    /// The current uid has no entry in the host password database
    #[error("no password database entry for uid {uid}")]
    MissingUser { uid: u32 },

    /// A required process environment variable is unset
    #[error("environment variable {var} is not set")]
    MissingEnvironment { var: String },

    #[error("could not determine the home directory of the current user")]
    MissingHome,

    /// The OS lookup itself failed (as opposed to returning no entry)
    #[error("failed to look up {entity}: {source}")]
    Lookup {
        entity: String,
        #[source]
        source: io::Error,
    },

    #[error("template resource not found: {path}")]
    TemplateNotFound { path: String },

    #[error("template {template} references unknown substitution '{key}'")]
    UnresolvedSubstitution { key: String, template: String },

    #[error("malformed environment assignment '{token}': {reason}")]
    MalformedEnvToken { token: String, reason: String },

    #[error("an extension named '{name}' is already registered")]
    DuplicateExtension { name: String },
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

impl ExtensionError {
    /// Name of the host entity or resource the error is about, for log fields
    pub fn subject(&self) -> String {
        match self {
            Self::MissingGroup { group } => group.clone(),
            Self::MissingUser { uid } => uid.to_string(),
            Self::MissingEnvironment { var } => var.clone(),
            Self::MissingHome => "HOME".to_string(),
            Self::Lookup { entity, .. } => entity.clone(),
            Self::TemplateNotFound { path } => path.clone(),
            Self::UnresolvedSubstitution { key, .. } => key.clone(),
            Self::MalformedEnvToken { token, .. } => token.clone(),
            Self::DuplicateExtension { name } => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_group_display() {
        let err = ExtensionError::MissingGroup {
            group: "audio".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'audio'"));
        assert_eq!(err.subject(), "audio");
    }

    #[test]
    fn test_unresolved_substitution_names_key_and_template() {
        let err = ExtensionError::UnresolvedSubstitution {
            key: "shell".to_string(),
            template: "templates/user_snippet.Dockerfile.em".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'shell'"));
        assert!(msg.contains("user_snippet"));
    }

    #[test]
    fn test_lookup_error_keeps_source() {
        use std::error::Error;

        let err = ExtensionError::Lookup {
            entity: "group audio".to_string(),
            source: io::Error::from_raw_os_error(libc::EIO),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to look up group audio"));
    }
}

// Centralized constants for dockext to avoid magic strings

/// Directory (relative to the package root) holding snippet templates
pub const TEMPLATE_DIR: &str = "templates";

/// Suffix appended to an extension name to form its snippet template file name
pub const SNIPPET_TEMPLATE_SUFFIX: &str = "_snippet.Dockerfile.em";

/// Host group whose id is added to the container for sound device access
pub const AUDIO_GROUP: &str = "audio";

/// Environment variable pointing at the per-user runtime directory
pub const XDG_RUNTIME_DIR: &str = "XDG_RUNTIME_DIR";

/// Default directory the generated Dockerfile is written into
pub const DEFAULT_BUILD_DIR: &str = ".dockext";

/// Default container CLI binary
pub const DEFAULT_DOCKER_BIN: &str = "docker";

/// Prefix for generated image tags
pub const IMAGE_TAG_PREFIX: &str = "dockext-";

/// Number of hex characters of the Dockerfile digest used in image tags
pub const IMAGE_TAG_HASH_LEN: usize = 12;

/// Environment fallbacks for driver flags
pub const ENV_BUILD_DIR: &str = "DOCKEXT_BUILD_DIR";
pub const ENV_DOCKER_BIN: &str = "DOCKEXT_DOCKER";
pub const ENV_LOG_JSON: &str = "DOCKEXT_LOG_JSON";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "dockext=info";

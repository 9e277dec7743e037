//! Shared fixtures: a stub identity provider that counts OS lookups

#![allow(dead_code)]

use dockext::{ExtensionError, IdentityProvider, Result, UserEntry};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct LookupCounts {
    pub uid: AtomicUsize,
    pub username: AtomicUsize,
    pub current_user: AtomicUsize,
    pub group_id: AtomicUsize,
    pub env_var: AtomicUsize,
    pub home_dir: AtomicUsize,
}

impl LookupCounts {
    pub fn total(&self) -> usize {
        self.uid.load(Ordering::SeqCst)
            + self.username.load(Ordering::SeqCst)
            + self.current_user.load(Ordering::SeqCst)
            + self.group_id.load(Ordering::SeqCst)
            + self.env_var.load(Ordering::SeqCst)
            + self.home_dir.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct StubIdentity {
    pub user: UserEntry,
    pub username: String,
    pub groups: HashMap<String, u32>,
    pub env: HashMap<String, String>,
    pub home: Option<PathBuf>,
    pub counts: Arc<LookupCounts>,
}

impl StubIdentity {
    /// A typical desktop user: uid 1000, member of an `audio` group with gid 29
    pub fn developer() -> Self {
        let user = UserEntry {
            name: "dev".to_string(),
            uid: 1000,
            gid: 1000,
            gecos: "Dev Eloper,,,".to_string(),
            dir: "/home/dev".to_string(),
            shell: "/bin/bash".to_string(),
        };
        Self {
            username: user.name.clone(),
            home: Some(PathBuf::from(&user.dir)),
            user,
            groups: HashMap::from([("audio".to_string(), 29)]),
            env: HashMap::from([("XDG_RUNTIME_DIR".to_string(), "/run/user/1000".to_string())]),
            counts: Arc::new(LookupCounts::default()),
        }
    }

    pub fn without_group(mut self, group: &str) -> Self {
        self.groups.remove(group);
        self
    }

    pub fn without_env(mut self, var: &str) -> Self {
        self.env.remove(var);
        self
    }

    pub fn with_env(mut self, var: &str, value: &str) -> Self {
        self.env.insert(var.to_string(), value.to_string());
        self
    }

    pub fn with_home(mut self, home: Option<&str>) -> Self {
        self.home = home.map(PathBuf::from);
        self
    }

    pub fn shared(self) -> (Arc<dyn IdentityProvider>, Arc<LookupCounts>) {
        let counts = self.counts.clone();
        (Arc::new(self), counts)
    }
}

impl IdentityProvider for StubIdentity {
    fn uid(&self) -> u32 {
        self.counts.uid.fetch_add(1, Ordering::SeqCst);
        self.user.uid
    }

    fn username(&self) -> Result<String> {
        self.counts.username.fetch_add(1, Ordering::SeqCst);
        Ok(self.username.clone())
    }

    fn current_user(&self) -> Result<UserEntry> {
        self.counts.current_user.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.clone())
    }

    fn group_id(&self, group: &str) -> Result<u32> {
        self.counts.group_id.fetch_add(1, Ordering::SeqCst);
        self.groups
            .get(group)
            .copied()
            .ok_or_else(|| ExtensionError::MissingGroup {
                group: group.to_string(),
            })
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.counts.env_var.fetch_add(1, Ordering::SeqCst);
        self.env.get(name).cloned()
    }

    fn home_dir(&self) -> Result<PathBuf> {
        self.counts.home_dir.fetch_add(1, Ordering::SeqCst);
        self.home.clone().ok_or(ExtensionError::MissingHome)
    }
}

/// Parse `args` against a command carrying the registry's flags
pub fn parse(registry: &dockext::ExtensionRegistry, args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["dockext"];
    argv.extend_from_slice(args);
    registry
        .register_arguments(clap::Command::new("dockext"))
        .try_get_matches_from(argv)
        .expect("arguments should parse")
}

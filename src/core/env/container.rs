// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Copy-on-write environment variable set.
//!
//! ```text
//! Env { vars: Arc<BTreeMap<EnvKey, String>> }
//! clone shares the map; the first write through Arc::make_mut copies it
//! ```

use super::types::{EnvFlags, EnvKey};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// A set of environment variables with copy-on-write semantics.
///
/// Passed to [`ProcessBuilder::env`](crate::core::process::builder::ProcessBuilder::env),
/// it replaces the child's environment entirely.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: Arc<BTreeMap<EnvKey, String>>,
}

impl Env {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment from a map of variables.
    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self {
            vars: Arc::new(
                vars.into_iter()
                    .map(|(k, v)| (EnvKey::new(k), v))
                    .collect(),
            ),
        }
    }

    /// Sets an environment variable, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set_with_flags(key, value, EnvFlags::Replace)
    }

    /// Sets an environment variable, combining with an existing value per `flags`.
    pub fn set_with_flags(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        flags: EnvFlags,
    ) -> &mut Self {
        let key = EnvKey::new(key);
        let value = value.into();
        let vars = Arc::make_mut(&mut self.vars);

        match vars.get_mut(&key) {
            Some(existing) => match flags {
                EnvFlags::Replace => *existing = value,
                EnvFlags::Append => existing.push_str(&value),
                EnvFlags::Prepend => existing.insert_str(0, &value),
            },
            None => {
                vars.insert(key, value);
            }
        }

        self
    }

    /// Gets an environment variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&EnvKey::new(key)).map(String::as_str)
    }

    /// Removes an environment variable.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        Arc::make_mut(&mut self.vars).remove(&EnvKey::new(key));
        self
    }

    /// Prepends a directory to `PATH`.
    pub fn prepend_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let entry = path.as_ref().to_string_lossy();
        let separator = if cfg!(windows) { ";" } else { ":" };

        let value = match self.get("PATH") {
            Some(current) if !current.is_empty() => format!("{entry}{separator}{current}"),
            _ => entry.into_owned(),
        };
        self.set("PATH", value)
    }

    /// Returns an iterator over environment variables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

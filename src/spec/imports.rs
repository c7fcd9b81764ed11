//! Import alias tracking for a single extraction run.
//!
//! Every foreign module referenced by a contract gets exactly one alias. The
//! first module to claim a short name keeps it; later modules with the same
//! short name get `name_1`, `name_2`, ... in the order they are first seen.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One foreign module and the alias assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAliasEntry {
    pub module_path: String,
    pub short_name: String,
    pub alias: String,
}

#[derive(Debug, Clone)]
pub struct ImportAliasTracker {
    home_module: String,
    entries: Vec<ImportAliasEntry>,
    by_module: HashMap<String, usize>,
    claimed_names: HashSet<String>,
    taken_aliases: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl ImportAliasTracker {
    /// Create a tracker for a run compiling `home_module`.
    pub fn new(home_module: impl Into<String>) -> Self {
        Self {
            home_module: home_module.into(),
            entries: Vec::new(),
            by_module: HashMap::new(),
            claimed_names: HashSet::new(),
            taken_aliases: HashSet::new(),
            counters: HashMap::new(),
        }
    }

    /// Alias to qualify a type declared in `module_path`.
    ///
    /// Returns the empty string for the home module.
    pub fn resolve_alias(&mut self, short_name: &str, module_path: &str) -> String {
        if module_path == self.home_module {
            return String::new();
        }

        if let Some(&idx) = self.by_module.get(module_path) {
            let entry = &self.entries[idx];
            if entry.short_name != short_name {
                debug!(
                    module = module_path,
                    recorded = %entry.short_name,
                    given = short_name,
                    "module registered under a different short name; keeping first alias"
                );
            }
            return entry.alias.clone();
        }

        let alias = self.next_alias(short_name);
        debug!(module = module_path, alias = %alias, "assigned import alias");

        self.claimed_names.insert(short_name.to_string());
        self.taken_aliases.insert(alias.clone());
        self.by_module
            .insert(module_path.to_string(), self.entries.len());
        self.entries.push(ImportAliasEntry {
            module_path: module_path.to_string(),
            short_name: short_name.to_string(),
            alias: alias.clone(),
        });

        alias
    }

    fn next_alias(&mut self, short_name: &str) -> String {
        if !self.claimed_names.contains(short_name) && !self.taken_aliases.contains(short_name) {
            return short_name.to_string();
        }

        let counter = self.counters.entry(short_name.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{short_name}_{counter}");
            if !self.taken_aliases.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[ImportAliasEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ImportAliasEntry> {
        self.entries
    }
}

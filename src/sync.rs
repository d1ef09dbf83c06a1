//! Namespace-wide synchronization.
//!
//! Walks the directories a namespace maps to, analyses every PHP file found,
//! and brings the doc comments of all capability-bearing classes up to date.
//! Classes without a capability trait are left alone, as are files that fail
//! to analyse (logged, never fatal).

use std::collections::BTreeMap;
use std::path::PathBuf;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::analyser::ClassAnalyser;
use crate::config::Config;
use crate::docblock;
use crate::error::SyncError;
use crate::generate;
use crate::types::{ClassSnapshot, DiffEntry};
use crate::update;

/// What happened (or would happen) to one class, keyed by its FQN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Dry run: the line changes that an apply run would make. Empty when
    /// the class is already up to date.
    Diff(Vec<DiffEntry>),
    /// Apply run: whether the file was rewritten.
    Updated(bool),
}

/// Drives analysis, generation and patching across a namespace.
pub struct DocBlockSync {
    analyser: ClassAnalyser,
    config: Config,
    project_root: PathBuf,
}

impl DocBlockSync {
    pub fn new(project_root: PathBuf, config: Config) -> DocBlockSync {
        let analyser = ClassAnalyser::new(&project_root);
        DocBlockSync {
            analyser,
            config,
            project_root,
        }
    }

    /// Synchronize every capability class under `namespace`.
    ///
    /// Returns one entry per capability class, keyed by FQN. With `dry_run`
    /// nothing is written and each entry holds the pending diff; otherwise
    /// entries record whether the file changed.
    pub fn sync_namespace(
        &mut self,
        namespace: &str,
        dry_run: bool,
    ) -> BTreeMap<String, SyncOutcome> {
        let mut outcomes = BTreeMap::new();

        for path in self.collect_php_files(namespace) {
            let snapshots = match self.analyser.analyse_file(&path) {
                Ok(snapshots) => snapshots,
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unanalysable file");
                    continue;
                }
            };

            for snapshot in snapshots {
                let fqn = snapshot.fully_qualified_name();
                if outcomes.contains_key(&fqn) {
                    continue;
                }

                let flags = self.config.capabilities_of(&snapshot);
                if !flags.any() {
                    debug!(class = %fqn, "no capability traits, skipping");
                    continue;
                }

                if let Some(outcome) = self.sync_class(&snapshot, dry_run) {
                    outcomes.insert(fqn, outcome);
                }
            }
        }

        outcomes
    }

    /// Generate the target lines for one class and diff or apply them.
    fn sync_class(&self, snapshot: &ClassSnapshot, dry_run: bool) -> Option<SyncOutcome> {
        let flags = self.config.capabilities_of(snapshot);
        let handler = snapshot.method(&self.config.handler_method);

        if handler.is_none() {
            debug!(
                class = %snapshot.fully_qualified_name(),
                method = %self.config.handler_method,
                "handler method missing, annotations will be removed"
            );
        }

        let current_lines = snapshot
            .doc_block
            .as_deref()
            .map(docblock::extract_lines)
            .unwrap_or_default();

        let new_lines = generate::generate_doc_blocks(
            flags,
            handler,
            current_lines.clone(),
            &snapshot.includes,
        );

        if dry_run {
            return Some(SyncOutcome::Diff(update::diff(&current_lines, &new_lines)));
        }

        match update::apply(
            &snapshot.file_path,
            &snapshot.class_name,
            &current_lines,
            &new_lines,
        ) {
            Ok(changed) => Some(SyncOutcome::Updated(changed)),
            Err(error @ SyncError::ClassDeclarationNotFound { .. }) => {
                warn!(%error, "skipping class");
                None
            }
            Err(error) => {
                warn!(path = %snapshot.file_path.display(), %error, "failed to update file");
                Some(SyncOutcome::Updated(false))
            }
        }
    }

    /// PHP files under every directory the namespace maps to, sorted for
    /// deterministic output.
    fn collect_php_files(&self, namespace: &str) -> Vec<PathBuf> {
        let dirs = crate::composer::namespace_candidate_dirs(
            self.analyser.mappings(),
            &self.project_root,
            namespace,
        );

        let mut files = Vec::new();
        for dir in dirs {
            for entry in WalkBuilder::new(&dir).build() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(error) => {
                        warn!(%error, "walk error");
                        continue;
                    }
                };

                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "php") {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        files
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

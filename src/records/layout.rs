use std::path::{Path, PathBuf};

use super::model::RecordKind;

/// On-disk layout of the record store.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    pub root: PathBuf,
    pub profile_codes_dir: PathBuf,
    pub profile_emails_dir: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let profiles = root.join(RecordKind::Profile.dir_name());
        Self {
            profile_codes_dir: profiles.join("codes"),
            profile_emails_dir: profiles.join("emails"),
            root,
        }
    }

    pub fn kind_dir(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn record_path(&self, kind: RecordKind, id: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{id}.json"))
    }

    pub fn code_pointer(&self, code: &str) -> PathBuf {
        self.profile_codes_dir.join(format!("{code}.json"))
    }

    pub fn email_pointer(&self, email_hash: &str) -> PathBuf {
        self.profile_emails_dir.join(format!("{email_hash}.json"))
    }

    pub fn all_dirs(&self) -> [PathBuf; 4] {
        [
            self.kind_dir(RecordKind::Lead),
            self.kind_dir(RecordKind::Profile),
            self.profile_codes_dir.clone(),
            self.profile_emails_dir.clone(),
        ]
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Identifiers and codes become file names, so only `[A-Za-z0-9-]` is allowed.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

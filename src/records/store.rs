use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use super::layout::{is_safe_key, StoreLayout};
use super::model::{
    Choice, EnrichmentFields, EnrichmentStatus, Lead, LeadInput, LeadStatus, Profile,
    ProfileInput, Record, RecordKind,
};
use super::storage::{compute_hash, read_record, remove_record, write_record};
use super::StoreError;

const PROFILE_CODE_PREFIX: &str = "SKX";
const PROFILE_CODE_LEN: usize = 8;
const PROFILE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 8;

/// Keys a partial update may never touch.
const IMMUTABLE_KEYS: &[&str] = &["id", "profile_code", "created_at"];

#[derive(Debug, Serialize, Deserialize)]
struct ProfilePointer {
    id: String,
}

/// File-backed record store.
///
/// Every read-modify-write runs under one store-wide lock so concurrent view
/// increments on the same profile never lose a hit. Plain creates of leads
/// write a fresh file and skip the lock.
pub struct RecordStore {
    layout: StoreLayout,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root.as_ref());
        for dir in layout.all_dirs() {
            fs::create_dir_all(&dir).map_err(|err| {
                StoreError::Unavailable(format!("failed creating {}: {err}", dir.display()))
            })?;
        }
        Ok(Self {
            layout,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Runs a store operation on the blocking pool.
    pub async fn call<T, F>(self: &Arc<Self>, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&RecordStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|err| StoreError::Unavailable(format!("store task aborted: {err}")))?
    }

    pub fn create_lead(&self, input: LeadInput) -> Result<Lead, StoreError> {
        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            email_synthesized: input.email_synthesized,
            phone: input.phone,
            interest: input.interest,
            source: input.source,
            message: input.message,
            status: LeadStatus::New,
            created_at: Utc::now(),
        };
        write_record(&self.layout.record_path(RecordKind::Lead, &lead.id), &lead)?;
        debug!(lead_id = %lead.id, "lead persisted");
        Ok(lead)
    }

    /// Persists a new profile with a fresh id and public code.
    ///
    /// The record and both pointer files land together or not at all.
    pub fn create_profile(&self, input: ProfileInput) -> Result<Profile, StoreError> {
        let _guard = self.lock()?;
        let email_pointer = self.layout.email_pointer(&email_key(&input.email));
        if email_pointer.exists() {
            return Err(StoreError::DuplicateEmail);
        }
        let profile_code = self.allocate_code()?;
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            profile_code,
            input,
            enrichment: EnrichmentFields::default(),
            enrichment_status: EnrichmentStatus::Pending,
            enrichment_error: None,
            profile_views: 0,
            is_public: true,
            created_at: now,
            updated_at: now,
        };

        let record_path = self.layout.record_path(RecordKind::Profile, &profile.id);
        let code_path = self.layout.code_pointer(&profile.profile_code);
        let pointer = ProfilePointer {
            id: profile.id.clone(),
        };
        let written = write_record(&record_path, &profile)
            .and_then(|_| write_record(&code_path, &pointer))
            .and_then(|_| write_record(&email_pointer, &pointer));
        if let Err(err) = written {
            for path in [&email_pointer, &code_path, &record_path] {
                if let Err(cleanup) = remove_record(path) {
                    warn!(profile_id = %profile.id, error = %cleanup, "profile rollback incomplete");
                }
            }
            return Err(err);
        }
        debug!(profile_id = %profile.id, profile_code = %profile.profile_code, "profile persisted");
        Ok(profile)
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<R, StoreError> {
        if !is_safe_key(id) {
            return Err(StoreError::not_found(R::KIND, id));
        }
        read_record(&self.layout.record_path(R::KIND, id))?
            .ok_or_else(|| StoreError::not_found(R::KIND, id))
    }

    pub fn get_profile_by_code(&self, code: &str) -> Result<Profile, StoreError> {
        let id = self.resolve_code(code)?;
        self.get::<Profile>(&id)
    }

    /// Shallow merge: keys in `fields` overwrite, every other key is kept.
    pub fn update<R: Record>(&self, id: &str, fields: Map<String, Value>) -> Result<R, StoreError> {
        let _guard = self.lock()?;
        if !is_safe_key(id) {
            return Err(StoreError::not_found(R::KIND, id));
        }
        let path = self.layout.record_path(R::KIND, id);
        let current: Value =
            read_record(&path)?.ok_or_else(|| StoreError::not_found(R::KIND, id))?;
        let Value::Object(mut document) = current else {
            return Err(StoreError::Unavailable(format!(
                "{} `{id}` is not a JSON object",
                R::KIND
            )));
        };
        for (key, value) in fields {
            if IMMUTABLE_KEYS.contains(&key.as_str()) {
                continue;
            }
            document.insert(key, value);
        }
        let merged: R = serde_json::from_value(Value::Object(document))?;
        write_record(&path, &merged)?;
        Ok(merged)
    }

    /// Moves a lead to `status`, leaving every other field as stored.
    pub fn update_lead_status(&self, id: &str, status: LeadStatus) -> Result<Lead, StoreError> {
        let mut fields = Map::new();
        fields.insert("status".into(), Value::String(status.as_str().to_string()));
        let lead: Lead = self.update(id, fields)?;
        debug!(lead_id = %lead.id, status = status.as_str(), "lead status updated");
        Ok(lead)
    }

    /// Counts one public view and returns the profile as stored afterwards.
    ///
    /// Hidden profiles read as not found and are left untouched.
    pub fn record_profile_view(&self, code: &str) -> Result<Profile, StoreError> {
        let _guard = self.lock()?;
        let id = self.resolve_code(code)?;
        let mut profile: Profile = self.get(&id)?;
        if !profile.is_public {
            return Err(StoreError::not_found(RecordKind::Profile, code));
        }
        profile.profile_views = profile.profile_views.saturating_add(1);
        write_record(&self.layout.record_path(RecordKind::Profile, &id), &profile)?;
        Ok(profile)
    }

    /// All records of one kind, newest first.
    pub fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let dir = self.layout.kind_dir(R::KIND);
        let mut records = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                StoreError::Unavailable(format!("failed listing {}: {err}", dir.display()))
            })?;
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if !entry.file_type().is_file() || !is_json {
                continue;
            }
            if let Some(record) = read_record::<R>(path)? {
                records.push(record);
            }
        }
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    fn resolve_code(&self, code: &str) -> Result<String, StoreError> {
        if !is_safe_key(code) {
            return Err(StoreError::not_found(RecordKind::Profile, code));
        }
        let pointer: Option<ProfilePointer> = read_record(&self.layout.code_pointer(code))?;
        pointer
            .map(|pointer| pointer.id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Profile, code))
    }

    fn allocate_code(&self) -> Result<String, StoreError> {
        let mut rng = rand::thread_rng();
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_profile_code(&mut rng);
            if !self.layout.code_pointer(&code).exists() {
                return Ok(code);
            }
        }
        Err(StoreError::Unavailable(
            "could not allocate a unique profile code".into(),
        ))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".into()))
    }
}

/// Draws a public share code: `SKX` followed by 8 characters of `[A-Z0-9]`.
pub fn generate_profile_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..PROFILE_CODE_LEN)
        .map(|_| PROFILE_CODE_ALPHABET[rng.gen_range(0..PROFILE_CODE_ALPHABET.len())] as char)
        .collect();
    format!("{PROFILE_CODE_PREFIX}{suffix}")
}

pub fn is_profile_code(candidate: &str) -> bool {
    candidate
        .strip_prefix(PROFILE_CODE_PREFIX)
        .is_some_and(|rest| {
            rest.len() == PROFILE_CODE_LEN
                && rest.bytes().all(|b| PROFILE_CODE_ALPHABET.contains(&b))
        })
}

fn email_key(email: &str) -> String {
    compute_hash(email.trim().to_lowercase().as_bytes())
}

use serde::{Deserialize, Serialize};
use shared::protocol::{Notification, StagedFile};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_size_mb: u64,
    /// MIME pattern: `*`, a `type/*` wildcard, or an exact type.
    pub accept: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: 3,
            max_size_mb: 5,
            accept: "image/*".into(),
        }
    }
}

impl UploadPolicy {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        let accept = self.accept.trim();
        if accept.is_empty() || accept == "*" || accept == "*/*" {
            return true;
        }
        match accept.strip_suffix('*') {
            Some(prefix) => mime_type
                .to_ascii_lowercase()
                .starts_with(&prefix.to_ascii_lowercase()),
            None => mime_type.eq_ignore_ascii_case(accept),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UploadRejection {
    TooManyFiles { max_files: usize },
    TooLarge { name: String, max_size_mb: u64 },
    InvalidType { name: String },
}

impl UploadRejection {
    pub fn notification(&self) -> Notification {
        match self {
            UploadRejection::TooManyFiles { max_files } => Notification::destructive(
                "Too many files",
                format!("You can only upload up to {max_files} files."),
            ),
            UploadRejection::TooLarge { name, max_size_mb } => Notification::destructive(
                "File too large",
                format!("{name} exceeds the maximum size of {max_size_mb}MB."),
            ),
            UploadRejection::InvalidType { name } => Notification::destructive(
                "Invalid file type",
                format!("{name} is not an accepted file type."),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub accepted: usize,
    pub rejections: Vec<UploadRejection>,
}

impl StageOutcome {
    pub fn notifications(&self) -> Vec<Notification> {
        let mut notes: Vec<Notification> = self
            .rejections
            .iter()
            .map(UploadRejection::notification)
            .collect();
        if self.accepted > 0 {
            notes.push(Notification::info(
                "Files uploaded",
                format!("Successfully added {} file(s).", self.accepted),
            ));
        }
        notes
    }
}

/// Photos chosen for a report, kept client-side until submission.
#[derive(Debug, Clone, Default)]
pub struct FileStaging {
    policy: UploadPolicy,
    files: Vec<StagedFile>,
}

impl FileStaging {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
        }
    }

    /// A batch that would push the list past the file limit is refused whole.
    /// Otherwise each file is checked on its own and only the failures are
    /// left out.
    pub fn stage(&mut self, incoming: Vec<StagedFile>) -> StageOutcome {
        if self.files.len() + incoming.len() > self.policy.max_files {
            return StageOutcome {
                accepted: 0,
                rejections: vec![UploadRejection::TooManyFiles {
                    max_files: self.policy.max_files,
                }],
            };
        }

        let mut outcome = StageOutcome::default();
        for file in incoming {
            if file.size_bytes > self.policy.max_size_bytes() {
                outcome.rejections.push(UploadRejection::TooLarge {
                    name: file.name,
                    max_size_mb: self.policy.max_size_mb,
                });
                continue;
            }
            if !self.policy.accepts(&file.mime_type) {
                outcome
                    .rejections
                    .push(UploadRejection::InvalidType { name: file.name });
                continue;
            }
            self.files.push(file);
            outcome.accepted += 1;
        }
        outcome
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/uploads_tests.rs"]
mod tests;

//! File-based Inforequest Repository
//!
//! Stores each inforequest as one YAML document named after its id.
//! Writes go through a temporary file and a rename, and are serialized by a
//! process-wide lock so the version check and the write happen together.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, InforequestId};
use crate::domain::inforequest::Inforequest;
use crate::ports::InforequestRepository;

/// The part of a stored document needed to list open inforequests.
#[derive(Deserialize)]
struct Header {
    id: InforequestId,
    closed: bool,
}

/// File-based storage for inforequests.
#[derive(Debug, Clone)]
pub struct FileInforequestRepository {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("I/O failed: {}", e))
}

impl FileInforequestRepository {
    /// Create a repository rooted at `base_path`.
    ///
    /// ```ignore
    /// let repo = FileInforequestRepository::new("./data/inforequests");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn file_path(&self, id: &InforequestId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    async fn exists(path: &Path) -> Result<bool, DomainError> {
        fs::try_exists(path).await.map_err(io_error)
    }

    async fn read(&self, path: &Path) -> Result<Inforequest, DomainError> {
        let yaml = fs::read_to_string(path).await.map_err(io_error)?;
        let inforequest: Inforequest = serde_yaml::from_str(&yaml).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Decoding {} failed: {}", path.display(), e),
            )
        })?;
        inforequest.validate()?;
        Ok(inforequest)
    }

    async fn write(&self, inforequest: &Inforequest) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_path).await.map_err(io_error)?;
        let yaml = serde_yaml::to_string(inforequest).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Encoding failed: {}", e))
        })?;
        let path = self.file_path(&inforequest.id());
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;
        Ok(())
    }

    /// Loads every readable document. A document that fails to decode or
    /// validate is logged and skipped.
    async fn load_all(&self) -> Result<Vec<Inforequest>, DomainError> {
        let mut all = Vec::new();
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(all),
            Err(e) => return Err(io_error(e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match self.read(&path).await {
                Ok(inforequest) => all.push(inforequest),
                Err(e) => tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable inforequest document"
                ),
            }
        }
        Ok(all)
    }
}

#[async_trait]
impl InforequestRepository for FileInforequestRepository {
    async fn save(&self, inforequest: &Inforequest) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        if Self::exists(&self.file_path(&inforequest.id())).await? {
            return Err(DomainError::validation("id", "Inforequest already exists")
                .with_detail("inforequest_id", inforequest.id().to_string()));
        }
        let taken = self.load_all().await?.iter().any(|other| {
            other
                .unique_email()
                .eq_ignore_ascii_case(inforequest.unique_email())
        });
        if taken {
            return Err(DomainError::validation(
                "unique_email",
                "Reply address is already taken",
            ));
        }
        self.write(inforequest).await
    }

    async fn update(&self, inforequest: &Inforequest) -> Result<u64, DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_path(&inforequest.id());
        if !Self::exists(&path).await? {
            return Err(
                DomainError::new(ErrorCode::InforequestNotFound, "Inforequest not found")
                    .with_detail("inforequest_id", inforequest.id().to_string()),
            );
        }
        let stored = self.read(&path).await?;
        if stored.version() != inforequest.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Inforequest was modified concurrently",
            )
            .with_detail("inforequest_id", inforequest.id().to_string()));
        }
        let mut next = inforequest.clone();
        next.set_version(stored.version() + 1);
        self.write(&next).await?;
        Ok(next.version())
    }

    async fn find_by_id(&self, id: &InforequestId) -> Result<Option<Inforequest>, DomainError> {
        let path = self.file_path(id);
        if !Self::exists(&path).await? {
            return Ok(None);
        }
        self.read(&path).await.map(Some)
    }

    async fn find_open(&self) -> Result<Vec<Inforequest>, DomainError> {
        let mut open = self.load_all().await?;
        open.retain(|ir| !ir.is_closed());
        Ok(open)
    }

    async fn find_open_ids(&self) -> Result<Vec<InforequestId>, DomainError> {
        let mut ids = Vec::new();
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(io_error(e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let yaml = fs::read_to_string(&path).await.map_err(io_error)?;
            match serde_yaml::from_str::<Header>(&yaml) {
                Ok(header) if !header.closed => ids.push(header.id),
                Ok(_) => {}
                Err(e) => tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable inforequest document"
                ),
            }
        }
        Ok(ids)
    }

    async fn find_by_unique_email(
        &self,
        email: &str,
    ) -> Result<Option<Inforequest>, DomainError> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|ir| ir.unique_email().eq_ignore_ascii_case(email)))
    }

    async fn delete(&self, id: &InforequestId) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let path = self.file_path(id);
        if !Self::exists(&path).await? {
            return Err(
                DomainError::new(ErrorCode::InforequestNotFound, "Inforequest not found")
                    .with_detail("inforequest_id", id.to_string()),
            );
        }
        fs::remove_file(&path).await.map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ApplicantId, ObligeeId, Timestamp};
    use crate::domain::inforequest::{ActionDraft, ActionType, Applicant, Obligee};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn inforequest(reply: &str) -> Inforequest {
        let applicant = Applicant {
            id: ApplicantId::new(),
            name: "Eva Veľká".to_string(),
            street: "Nová 7".to_string(),
            city: "Žilina".to_string(),
            zip: "010 01".to_string(),
            email: "eva@example.org".to_string(),
        };
        let obligee = Obligee {
            id: ObligeeId::new(),
            name: "Mesto Žilina".to_string(),
            street: "Námestie obetí komunizmu 1".to_string(),
            city: "Žilina".to_string(),
            zip: "011 31".to_string(),
            emails: vec!["podatelna@zilina.sk".to_string()],
        };
        Inforequest::submit(
            &applicant,
            &obligee,
            reply,
            ActionDraft::delivered(
                ActionType::Request,
                NaiveDate::from_ymd_opt(2010, 10, 5).unwrap(),
            ),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_load_round_trips_through_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let ir = inforequest("abcd@mail.example.org");

        repo.save(&ir).await.unwrap();
        let loaded = repo.find_by_id(&ir.id()).await.unwrap().unwrap();
        assert_eq!(loaded, ir);
        assert!(temp_dir.path().join(format!("{}.yaml", ir.id())).exists());
    }

    #[tokio::test]
    async fn load_nonexistent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path().join("missing"));
        assert!(repo.find_by_id(&InforequestId::new()).await.unwrap().is_none());
        assert!(repo.find_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn versioned_update_detects_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let ir = inforequest("abcd@mail.example.org");
        repo.save(&ir).await.unwrap();

        assert_eq!(repo.update(&ir).await.unwrap(), 1);
        let err = repo.update(&ir).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn find_by_unique_email_scans_documents() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let a = inforequest("aaaa@mail.example.org");
        let b = inforequest("bbbb@mail.example.org");
        repo.save(&a).await.unwrap();
        repo.save(&b).await.unwrap();

        let found = repo
            .find_by_unique_email("BBBB@mail.example.org")
            .await
            .unwrap();
        assert_eq!(found.map(|f| f.id()), Some(b.id()));
        assert!(repo.save(&inforequest("aaaa@mail.example.org")).await.is_err());
    }

    #[tokio::test]
    async fn open_ids_skip_closed_documents() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let ir = inforequest("abcd@mail.example.org");
        repo.save(&ir).await.unwrap();

        assert_eq!(repo.find_open_ids().await.unwrap(), vec![ir.id()]);

        std::fs::write(temp_dir.path().join("garbage.yaml"), ": not yaml [").unwrap();
        assert_eq!(repo.find_open_ids().await.unwrap(), vec![ir.id()]);
    }

    #[tokio::test]
    async fn unreadable_document_does_not_block_others() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let first = inforequest("aaaa@mail.example.org");
        repo.save(&first).await.unwrap();
        std::fs::write(temp_dir.path().join("garbage.yaml"), ": not yaml [").unwrap();

        let second = inforequest("bbbb@mail.example.org");
        repo.save(&second).await.unwrap();
        let routed = repo
            .find_by_unique_email("aaaa@mail.example.org")
            .await
            .unwrap();
        assert_eq!(routed.map(|ir| ir.id()), Some(first.id()));
        assert!(repo.save(&inforequest("aaaa@mail.example.org")).await.is_err());
        assert_eq!(repo.find_open().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileInforequestRepository::new(temp_dir.path());
        let ir = inforequest("abcd@mail.example.org");
        repo.save(&ir).await.unwrap();

        repo.delete(&ir.id()).await.unwrap();
        assert!(repo.find_by_id(&ir.id()).await.unwrap().is_none());
    }
}

use crate::{
    domain::calendar::Event,
    error::{DashError, Result},
    seed::Seed,
    storage::{Snapshot, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".dashdeck";
    const EXPORTS_DIR: &'static str = "exports";
    const SEED_FILE: &'static str = "seed.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
        }
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root_path.join(Self::EXPORTS_DIR)
    }

    pub fn seed_file(&self) -> PathBuf {
        self.root_path.join(Self::SEED_FILE)
    }

    fn export_file(&self, snapshot: &Snapshot) -> PathBuf {
        self.exports_dir()
            .join(format!("{}.json", snapshot.export_id))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.exports_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Session exports\nexports/\n").await?;
        }

        Ok(())
    }

    async fn load_seed(&self) -> Result<Seed> {
        let seed_file = self.seed_file();

        if !seed_file.exists() {
            debug!("no seed file, using built-in data");
            return Ok(Seed::builtin());
        }

        let contents = fs::read_to_string(&seed_file).await?;
        let seed: Seed = serde_json::from_str(&contents)?;
        seed.validate()?;
        info!(path = %seed_file.display(), records = seed.records.len(), "loaded seed file");

        Ok(seed)
    }

    async fn export_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        self.ensure_directory_exists(&self.exports_dir()).await?;

        let json = serde_json::to_string_pretty(snapshot)?;
        let file_path = self.export_file(snapshot);
        fs::write(&file_path, json).await?;

        info!(export = %snapshot.export_id, path = %file_path.display(), "exported snapshot");
        Ok(file_path)
    }

    async fn import_events(&self, path: &Path) -> Result<Vec<Event>> {
        if !path.exists() {
            return Err(DashError::FileNotFound(path.display().to_string()));
        }

        let contents = fs::read_to_string(path).await?;
        let events: Vec<Event> = serde_json::from_str(&contents)?;
        debug!(count = events.len(), path = %path.display(), "read events for import");

        Ok(events)
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.exports_dir().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{board::LaneId, card::CardId};
    use crate::state::{Action, Session};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.exports_dir().exists());
        assert!(!storage.seed_file().exists());
    }

    #[tokio::test]
    async fn test_load_seed_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let seed = storage.load_seed().await.unwrap();

        assert_eq!(seed.records.len(), 8);
        assert_eq!(seed.lanes.len(), 4);
    }

    #[tokio::test]
    async fn test_seed_file_is_used_when_present() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.initialize().await.unwrap();
        let mut seed = Seed::builtin();
        seed.records.truncate(2);
        fs::write(storage.seed_file(), serde_json::to_string(&seed).unwrap())
            .await
            .unwrap();

        let loaded = storage.load_seed().await.unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[1].name, "Jane Smith");
    }

    #[tokio::test]
    async fn test_corrupt_seed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();
        fs::write(storage.seed_file(), "{ not json").await.unwrap();

        let err = storage.load_seed().await.unwrap_err();
        assert!(matches!(err, DashError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_seed_with_card_in_two_lanes_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut seed = Seed::builtin();
        let copy = seed.lanes[0].cards[0].clone();
        seed.lanes[3].cards.push(copy);
        fs::write(storage.seed_file(), serde_json::to_string(&seed).unwrap())
            .await
            .unwrap();

        let err = storage.load_seed().await.unwrap_err();
        assert!(matches!(err, DashError::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_seed_with_duplicate_event_ids_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut seed = Seed::builtin();
        let mut clash = seed.events[1].clone();
        clash.id = seed.events[0].id;
        seed.events.push(clash);
        fs::write(storage.seed_file(), serde_json::to_string(&seed).unwrap())
            .await
            .unwrap();

        assert!(storage.load_seed().await.is_err());
    }

    #[tokio::test]
    async fn test_imported_max_id_does_not_break_the_calendar() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let path = temp_dir.path().join("events.json");
        fs::write(
            &path,
            format!(
                r#"[{{"id": {}, "title": "Far", "date": "2024-01-29", "time": "8:00 AM"}}]"#,
                u64::MAX
            ),
        )
        .await
        .unwrap();

        let mut session = Session::new(Seed::builtin(), today()).unwrap();
        let events = storage.import_events(&path).await.unwrap();
        session.apply(Action::ImportEvents(events)).unwrap();

        let err = session
            .apply(Action::AddEvent(crate::domain::calendar::EventDraft::new(
                "Next",
                "2024-01-30",
                "10:00",
            )))
            .unwrap_err();
        assert!(matches!(err, DashError::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_export_reflects_session_edits() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut session = Session::new(Seed::builtin(), today()).unwrap();
        session.apply(Action::PickUpCard(CardId::from("1"))).unwrap();
        session.apply(Action::DropCard(LaneId::from("done"))).unwrap();

        let snapshot = Snapshot::capture(&session);
        let path = storage.export_snapshot(&snapshot).await.unwrap();

        assert!(path.starts_with(storage.exports_dir()));
        let contents = fs::read_to_string(&path).await.unwrap();
        let restored: Snapshot = serde_json::from_str(&contents).unwrap();
        assert_eq!(restored.export_id, snapshot.export_id);
        let done = restored
            .lanes
            .iter()
            .find(|l| l.id.as_str() == "done")
            .unwrap();
        assert_eq!(done.cards.last().unwrap().title, "Design System Update");
    }

    #[tokio::test]
    async fn test_import_events() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let path = temp_dir.path().join("events.json");
        fs::write(
            &path,
            r#"[{"id": 1, "title": "Offsite", "date": "2024-01-29", "time": "8:00 AM", "color": "pink"},
                {"id": 2, "title": "Retro", "date": "2024-01-30", "time": "4:00 PM"}]"#,
        )
        .await
        .unwrap();

        let events = storage.import_events(&path).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Offsite");
        assert_eq!(events[1].color, crate::domain::calendar::EventColor::Blue);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let err = storage
            .import_events(&temp_dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, DashError::FileNotFound(_)));
    }
}

//! JSON-file collection store.
//!
//! Each entity type lives in one JSON document holding the whole collection.
//! Every mutation rewrites the full document; a per-collection mutex
//! serializes read-modify-write cycles so concurrent requests cannot lose
//! updates, and writes go through a temp file plus rename so a crash
//! mid-write leaves the previous document intact.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::Error;

pub struct Collection<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: self.lock.clone(),
            _records: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("path", &self.path).finish()
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    /// Opens a collection, initializing the backing file to an empty array
    /// when it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let collection = Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
            _records: PhantomData,
        };
        if !tokio::fs::try_exists(&collection.path).await? {
            collection.write(&[]).await?;
        }
        Ok(collection)
    }

    pub async fn load(&self) -> Result<Vec<T>, Error> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn save(&self, records: &[T]) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        self.write(records).await
    }

    /// Read-modify-write under the collection lock. The mutation runs on the
    /// loaded records and the document is only rewritten when it succeeds;
    /// an `Err` leaves the file exactly as it was.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let out = f(&mut records)?;
        self.write(&records).await?;
        Ok(out)
    }

    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, Error> {
        let _guard = self.lock.lock().await;
        let records = self.read().await?;
        Ok(records.into_iter().find(|record| pred(record)))
    }

    async fn read(&self) -> Result<Vec<T>, Error> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, records: &[T]) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    fn record(id: &str, value: u32) -> Record {
        Record {
            id: id.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn open_initializes_missing_file_to_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let collection = Collection::<Record>::open(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(collection.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, r#"[{"id": "1", "value": 7}]"#).unwrap();

        let collection = Collection::<Record>::open(&path).await.unwrap();
        assert_eq!(collection.load().await.unwrap(), vec![record("1", 7)]);
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::<Record>::open(dir.path().join("records.json"))
            .await
            .unwrap();

        let records = vec![record("1", 1), record("2", 2)];
        collection.save(&records).await.unwrap();
        assert_eq!(collection.load().await.unwrap(), records);
    }

    #[tokio::test]
    async fn update_persists_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::<Record>::open(dir.path().join("records.json"))
            .await
            .unwrap();

        let id = collection
            .update(|records| {
                records.push(record("1", 1));
                Ok(records.len())
            })
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(collection.load().await.unwrap(), vec![record("1", 1)]);
    }

    #[tokio::test]
    async fn failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let collection = Collection::<Record>::open(&path).await.unwrap();
        collection.save(&[record("1", 1)]).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result: Result<(), Error> = collection
            .update(|records| {
                records.clear();
                Err(Error::UserNotFound)
            })
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn save_overwrites_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::<Record>::open(dir.path().join("records.json"))
            .await
            .unwrap();

        collection.save(&[record("1", 1), record("2", 2)]).await.unwrap();
        collection.save(&[record("3", 3)]).await.unwrap();

        // Last full write wins.
        assert_eq!(collection.load().await.unwrap(), vec![record("3", 3)]);
    }
}

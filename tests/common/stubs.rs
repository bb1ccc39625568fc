//! Scripted download sources for orchestrator and relay flow tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use relaybot::download::naming::request_tag;
use relaybot::download::{
    DownloadError, DownloadOrchestrator, DownloadResult, DownloadSource, ProgressSample, ProgressSender,
};

#[derive(Clone)]
pub enum StubBehavior {
    /// Writes a sparse file of `size` bytes and reports one completion sample
    Succeed { file_name: String, size: u64 },
    /// Fails with an extractor error carrying this text
    Fail(String),
    /// Takes one permit from `release`, then succeeds like `Succeed`
    Block {
        release: Arc<Semaphore>,
        file_name: String,
        size: u64,
    },
}

pub struct StubSource {
    name: &'static str,
    behavior: StubBehavior,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    written: Mutex<Vec<PathBuf>>,
}

impl StubSource {
    pub fn new(name: &'static str, behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding(name: &'static str, file_name: &str, size: u64) -> Arc<Self> {
        Self::new(
            name,
            StubBehavior::Succeed {
                file_name: file_name.to_string(),
                size,
            },
        )
    }

    pub fn failing(name: &'static str, cause: &str) -> Arc<Self> {
        Self::new(name, StubBehavior::Fail(cause.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Paths of every file this source produced
    pub fn written(&self) -> Vec<PathBuf> {
        self.written.lock().unwrap().clone()
    }

    fn produce(
        &self,
        storage_dir: &Path,
        file_name: &str,
        size: u64,
        progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError> {
        let file_path = storage_dir.join(format!("{}_{}", request_tag(), file_name));
        let file = std::fs::File::create(&file_path)?;
        file.set_len(size)?;
        self.written.lock().unwrap().push(file_path.clone());

        if size > 0 {
            let _ = progress_tx.send(ProgressSample::new(size, size));
        }
        Ok(DownloadResult {
            file_path,
            file_name: file_name.to_string(),
        })
    }
}

#[async_trait]
impl DownloadSource for StubSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn download(
        &self,
        url: &str,
        storage_dir: &Path,
        progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        match &self.behavior {
            StubBehavior::Succeed { file_name, size } => self.produce(storage_dir, file_name, *size, progress_tx),
            StubBehavior::Fail(cause) => Err(DownloadError::Extractor(cause.clone())),
            StubBehavior::Block {
                release,
                file_name,
                size,
            } => {
                let permit = release
                    .acquire()
                    .await
                    .map_err(|_| DownloadError::Io("release semaphore closed".to_string()))?;
                permit.forget();
                self.produce(storage_dir, file_name, *size, progress_tx)
            }
        }
    }
}

pub fn orchestrator_with(
    storage_dir: &Path,
    direct: Arc<dyn DownloadSource>,
    manifest: Arc<dyn DownloadSource>,
    extractor: Arc<dyn DownloadSource>,
) -> Arc<DownloadOrchestrator> {
    Arc::new(DownloadOrchestrator::with_sources(
        storage_dir.to_path_buf(),
        direct,
        manifest,
        extractor,
    ))
}

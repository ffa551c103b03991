//! CLI runner - executes a seeding run

use crate::cli::commands::Cli;
use crate::config::LoaderConfig;
use crate::dataset::load_dataset;
use crate::error::{Result, ResultExt};
use crate::http::HttpClient;
use crate::loader::{BulkLoader, CollectionReport, UploadSummary};
use crate::store::{DocumentStore, FirestoreStore, MemoryStore};
use crate::types::Dataset;
use std::io::{self, Write};
use tracing::info;

/// Final line printed after every collection committed
pub const COMPLETION_MESSAGE: &str = "All data uploaded";

/// CLI runner
pub struct Runner {
    config: LoaderConfig,
}

impl Runner {
    /// Create a runner from parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            config: cli.loader_config(),
        }
    }

    /// Create a runner from an explicit configuration
    pub fn from_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Configuration this runner uses
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Run, printing progress to stdout
    pub async fn run(&self) -> Result<UploadSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out).await
    }

    /// Run, printing progress to `out`
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> Result<UploadSummary> {
        self.config.validate()?;

        if self.config.dry_run {
            let dataset = load_dataset(&self.config.data_path)?;
            return self.dry_run(&dataset, out).await;
        }

        // Credentials are read before the data file; no request is sent
        // until the first commit.
        let connection = self.config.resolve_connection()?;
        let http = HttpClient::with_auth(self.config.http_config(), connection.auth)?;
        let store = FirestoreStore::new(http, connection.project_id, connection.database_id)?;

        let dataset = load_dataset(&self.config.data_path)?;
        info!(
            project = store.project_id(),
            database = store.database_id(),
            collections = dataset.collections.len(),
            documents = dataset.document_count(),
            "Starting upload"
        );

        self.upload(&store, &dataset, out).await
    }

    /// Upload `dataset` into `store`, printing one line per collection
    pub async fn upload<S, W>(&self, store: &S, dataset: &Dataset, out: &mut W) -> Result<UploadSummary>
    where
        S: DocumentStore + ?Sized,
        W: Write,
    {
        let loader = self.loader(store)?;

        // A failed progress write aborts before the next collection is sent
        let summary = loader
            .upload_all(dataset, |report: &CollectionReport| {
                writeln!(out, "Uploaded {}", report.name)
                    .and_then(|()| out.flush())
                    .context("Failed to write progress")
            })
            .await?;

        writeln!(out, "{COMPLETION_MESSAGE}").context("Failed to write progress")?;
        out.flush()?;
        Ok(summary)
    }

    /// Plan every batch against an in-memory store and describe it
    async fn dry_run<W: Write>(&self, dataset: &Dataset, out: &mut W) -> Result<UploadSummary> {
        let store = MemoryStore::new();
        let loader = self.loader(&store)?;

        let summary = loader.upload_all(dataset, |_| Ok(())).await?;

        for report in &summary.collections {
            writeln!(
                out,
                "Would upload {}: {} document(s) in {} batch(es)",
                report.name, report.documents, report.batches
            )?;
        }
        writeln!(
            out,
            "Dry run: {} collection(s), {} document(s), nothing written",
            summary.collections.len(),
            summary.documents()
        )?;
        out.flush()?;
        Ok(summary)
    }

    fn loader<'a, S: DocumentStore + ?Sized>(&self, store: &'a S) -> Result<BulkLoader<'a, S>> {
        let loader = BulkLoader::new(store);
        match self.config.batch_size {
            Some(size) => loader.with_batch_size(size),
            None => Ok(loader),
        }
    }
}

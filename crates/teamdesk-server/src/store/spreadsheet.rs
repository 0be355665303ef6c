//! Spreadsheet-file submission store.
//!
//! Pending and verified submissions are kept in two CSV files inside the
//! data directory, one flattened row per education/experience pairing with
//! the submission metadata repeated on every row.
//!
//! A single writer task owns the in-memory tables and both files. Every
//! operation is sent to it as a [`Command`] over an mpsc queue and answered
//! over a oneshot channel, so reads see a consistent state and file writes
//! never interleave. Files are replaced atomically (temp file then rename).

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot, RwLock};

use super::{sort_for_scope, AdminUser, NewSubmission, Scope, SubmissionRecord, SubmissionStore};
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::result_ext::ResultExt;
use crate::sheet::{self, csv_file, Row, COLUMN_COUNT, HEADERS};

/// Pending submissions file.
pub const PENDING_FILE: &str = "employee_data.csv";

/// Verified submissions file.
pub const VERIFIED_FILE: &str = "verified_employee_data.csv";

/// Metadata columns preceding the form columns.
pub const META_HEADERS: [&str; 5] = [
    "Submission ID",
    "Original Submission ID",
    "Created At",
    "Verified At",
    "Verified By",
];

/// Queue depth before callers wait for the writer.
const QUEUE_CAPACITY: usize = 64;

/// Requests handled by the writer task.
enum Command {
    Save {
        form_data: Value,
        reply: oneshot::Sender<AppResult<NewSubmission>>,
    },
    List {
        scope: Scope,
        reply: oneshot::Sender<Vec<SubmissionRecord>>,
    },
    Verify {
        id: i64,
        reviewer: String,
        reply: oneshot::Sender<AppResult<bool>>,
    },
    Reject {
        id: i64,
        reply: oneshot::Sender<AppResult<bool>>,
    },
}

/// Submission store backed by CSV files.
pub struct SheetStore {
    queue: mpsc::Sender<Command>,
    admin: RwLock<Option<AdminUser>>,
}

impl SheetStore {
    /// Load existing files from `dir` (created if missing) and start the writer.
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let tables = SheetTables::load(&dir).await?;
        tracing::info!(
            dir = %dir.display(),
            pending = tables.pending.len(),
            verified = tables.verified.len(),
            "Spreadsheet store loaded"
        );

        let (queue, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_writer(tables, rx));

        Ok(Self {
            queue,
            admin: RwLock::new(None),
        })
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> AppResult<T> {
        let (reply, rx) = oneshot::channel();
        self.queue
            .send(make(reply))
            .await
            .map_err(|_| AppError::Storage("spreadsheet writer stopped".to_string()))?;
        rx.await
            .map_err(|_| AppError::Storage("spreadsheet writer dropped request".to_string()))
    }
}

#[async_trait]
impl SubmissionStore for SheetStore {
    fn backend(&self) -> &'static str {
        "spreadsheet"
    }

    async fn init(&self, admin: &AdminUser) -> AppResult<()> {
        *self.admin.write().await = Some(admin.clone());
        tracing::info!(username = %admin.username, "Admin account configured");
        Ok(())
    }

    async fn health(&self) -> bool {
        !self.queue.is_closed()
    }

    async fn find_admin(&self, username: &str) -> AppResult<Option<AdminUser>> {
        Ok(self
            .admin
            .read()
            .await
            .as_ref()
            .filter(|admin| admin.username == username)
            .cloned())
    }

    async fn save(&self, form_data: Value) -> AppResult<NewSubmission> {
        self.request(|reply| Command::Save { form_data, reply }).await?
    }

    async fn list(&self, scope: Scope) -> AppResult<Vec<SubmissionRecord>> {
        self.request(|reply| Command::List { scope, reply }).await
    }

    async fn verify(&self, id: i64, reviewer: &str) -> AppResult<bool> {
        let reviewer = reviewer.to_string();
        self.request(|reply| Command::Verify { id, reviewer, reply })
            .await?
    }

    async fn reject(&self, id: i64) -> AppResult<bool> {
        self.request(|reply| Command::Reject { id, reply }).await?
    }
}

async fn run_writer(mut tables: SheetTables, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        tables.handle(command).await;
    }
    tracing::debug!("Spreadsheet writer stopped");
}

/// Millisecond-precision now, matching what the files store.
fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn file_for(scope: Scope) -> &'static str {
    match scope {
        Scope::Pending => PENDING_FILE,
        Scope::Verified => VERIFIED_FILE,
    }
}

/// State owned by the writer task.
struct SheetTables {
    dir: PathBuf,
    pending: Vec<SubmissionRecord>,
    verified: Vec<SubmissionRecord>,
    next_pending_id: i64,
    next_verified_id: i64,
}

impl SheetTables {
    async fn load(dir: &Path) -> AppResult<Self> {
        let pending = read_records(&dir.join(PENDING_FILE)).await?;
        let verified = read_records(&dir.join(VERIFIED_FILE)).await?;

        // Verified records remember their pending id, so new pending ids
        // must not reuse those either.
        let max_pending = pending
            .iter()
            .map(|r| r.id)
            .chain(verified.iter().filter_map(|r| r.original_submission_id))
            .max()
            .unwrap_or(0);
        let max_verified = verified.iter().map(|r| r.id).max().unwrap_or(0);

        Ok(Self {
            dir: dir.to_path_buf(),
            pending,
            verified,
            next_pending_id: max_pending + 1,
            next_verified_id: max_verified + 1,
        })
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Save { form_data, reply } => {
                let _ = reply.send(self.save(form_data).await);
            }
            Command::List { scope, reply } => {
                let mut records = match scope {
                    Scope::Pending => self.pending.clone(),
                    Scope::Verified => self.verified.clone(),
                };
                sort_for_scope(&mut records, scope);
                let _ = reply.send(records);
            }
            Command::Verify {
                id,
                reviewer,
                reply,
            } => {
                let _ = reply.send(self.verify(id, &reviewer).await);
            }
            Command::Reject { id, reply } => {
                let _ = reply.send(self.reject(id).await);
            }
        }
    }

    async fn save(&mut self, form_data: Value) -> AppResult<NewSubmission> {
        let id = self.next_pending_id;
        let created_at = now_millis();

        self.pending.push(SubmissionRecord {
            id,
            original_submission_id: None,
            created_at,
            verified_at: None,
            verified_by: None,
            form_data,
        });

        if let Err(e) = self.persist(Scope::Pending).await {
            self.pending.pop();
            return Err(e);
        }

        self.next_pending_id += 1;
        Ok(NewSubmission { id, created_at })
    }

    async fn verify(&mut self, id: i64, reviewer: &str) -> AppResult<bool> {
        let Some(index) = self.pending.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let record = self.pending.remove(index);
        let verified_id = self.next_verified_id;
        self.verified.push(SubmissionRecord {
            id: verified_id,
            original_submission_id: Some(record.id),
            created_at: record.created_at,
            verified_at: Some(now_millis()),
            verified_by: Some(reviewer.to_string()),
            form_data: record.form_data.clone(),
        });

        let written = match self.persist(Scope::Verified).await {
            Ok(()) => self.persist(Scope::Pending).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            self.verified.pop();
            self.pending.insert(index, record);
            // Best effort: bring the verified file back in line with memory.
            let _ = self
                .persist(Scope::Verified)
                .await
                .log("restoring verified sheet after failed verify");
            return Err(e);
        }

        self.next_verified_id += 1;
        Ok(true)
    }

    async fn reject(&mut self, id: i64) -> AppResult<bool> {
        let Some(index) = self.pending.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let record = self.pending.remove(index);
        if let Err(e) = self.persist(Scope::Pending).await {
            self.pending.insert(index, record);
            return Err(e);
        }

        Ok(true)
    }

    async fn persist(&self, scope: Scope) -> AppResult<()> {
        let records = match scope {
            Scope::Pending => &self.pending,
            Scope::Verified => &self.verified,
        };
        let bytes = encode_records(records)?;

        let path = self.dir.join(file_for(scope));
        let tmp = path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(file = %path.display(), records = records.len(), "Spreadsheet written");
        Ok(())
    }
}

/// Headers of a store file.
pub fn file_headers() -> Vec<&'static str> {
    META_HEADERS.iter().chain(HEADERS.iter()).copied().collect()
}

fn encode_records(records: &[SubmissionRecord]) -> AppResult<Vec<u8>> {
    let mut rows: Vec<Row> = Vec::new();

    for record in records {
        let meta = [
            record.id.to_string(),
            record
                .original_submission_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            format_time(&record.created_at),
            record.verified_at.as_ref().map(format_time).unwrap_or_default(),
            record.verified_by.clone().unwrap_or_default(),
        ];

        let form = FormData::from_value(&record.form_data);
        for cells in sheet::build_rows(&form) {
            let mut row = Row::with_capacity(META_HEADERS.len() + COLUMN_COUNT);
            row.extend(meta.iter().cloned());
            row.extend(cells);
            rows.push(row);
        }
    }

    csv_file::encode(file_headers().as_slice(), &rows)
}

async fn read_records(path: &Path) -> AppResult<Vec<SubmissionRecord>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => decode_records(&bytes).map_err(|e| {
            AppError::Storage(format!("{}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn decode_records(bytes: &[u8]) -> AppResult<Vec<SubmissionRecord>> {
    let (headers, rows) = csv_file::decode(bytes)?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if headers.len() < META_HEADERS.len()
        || headers.iter().zip(META_HEADERS.iter()).any(|(a, b)| a != b)
    {
        return Err(AppError::Storage("unexpected spreadsheet header".to_string()));
    }

    // Group consecutive rows that share a submission id.
    let mut groups: Vec<(Vec<String>, Vec<Row>)> = Vec::new();
    for mut row in rows {
        row.resize(META_HEADERS.len() + COLUMN_COUNT, String::new());
        let cells = row.split_off(META_HEADERS.len());
        match groups.last_mut() {
            Some((meta, group)) if meta[0] == row[0] => group.push(cells),
            _ => groups.push((row, vec![cells])),
        }
    }

    let mut records = Vec::with_capacity(groups.len());
    for (meta, rows) in groups {
        let (Ok(id), Some(created_at)) = (meta[0].parse::<i64>(), parse_time(&meta[2])) else {
            tracing::warn!(id = %meta[0], "Skipping spreadsheet rows with unreadable metadata");
            continue;
        };

        let form = sheet::form_from_rows(&rows);
        records.push(SubmissionRecord {
            id,
            original_submission_id: meta[1].parse().ok(),
            created_at,
            verified_at: parse_time(&meta[3]),
            verified_by: Some(meta[4].clone()).filter(|s| !s.is_empty()),
            form_data: serde_json::to_value(form)?,
        });
    }

    Ok(records)
}

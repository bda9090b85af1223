//! Results directory: per-call attachments, environment description and
//! run summary.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use caliper_application::ports::{ReportError, ResultsSink};
use caliper_domain::{ApiRequest, ApiResponse, RequestBody, RunConfig, RunSummary};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

/// File name of the environment description.
pub const ENVIRONMENT_FILE: &str = "environment.properties";

/// File name of the run summary.
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes run results below one directory.
#[derive(Debug)]
pub struct ResultsDir {
    root: PathBuf,
    protected: Vec<PathBuf>,
    attachments: AtomicUsize,
}

impl ResultsDir {
    /// Creates a sink writing below `root`. Nothing is touched until the
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            protected: Vec::new(),
            attachments: AtomicUsize::new(0),
        }
    }

    /// Never cleans `dir` or any directory containing it (builder pattern).
    /// The working directory is always protected.
    #[must_use]
    pub fn protect(mut self, dir: impl Into<PathBuf>) -> Self {
        self.protected.push(dir.into());
        self
    }

    /// Returns the results directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails if removing `root` (canonical) would take a protected
    /// directory with it.
    async fn check_removable(&self, root: &Path) -> Result<(), ReportError> {
        let cwd = std::env::current_dir().ok();
        for dir in self.protected.iter().chain(cwd.iter()) {
            let Ok(dir) = fs::canonicalize(dir).await else {
                continue;
            };
            if dir.starts_with(root) {
                return Err(ReportError::UnsafeClean {
                    path: self.root.clone(),
                    protected: dir,
                });
            }
        }
        Ok(())
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(&self.root))?;
        let path = self.root.join(name);
        fs::write(&path, contents).await.map_err(io_error(&path))?;
        Ok(path)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Converts a scenario name to a file-name-safe slug.
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Renders one request/response exchange as a text attachment.
///
/// The basic-auth password is never written.
#[must_use]
pub fn render_exchange(request: &ApiRequest, response: &ApiResponse) -> String {
    let headers: serde_json::Map<String, Value> = request
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let mut lines = vec![
        "Request Sent ::".to_string(),
        format!("{} Url := {}", request.method, request.url),
        format!("Headers :=\n{}", pretty(&Value::Object(headers))),
    ];
    if let Some(auth) = &request.basic_auth {
        lines.push(format!("Username := {}", auth.username));
    }
    if let Some(query) = &request.query {
        lines.push(format!("Query_Params :=\n{}", pretty(query)));
    }
    match &request.body {
        RequestBody::None => {}
        RequestBody::Json(body) => lines.push(format!("Body := {}", pretty(body))),
        RequestBody::Form(body) => lines.push(format!("Form := {}", pretty(body))),
    }

    format!(
        "{}\n\n\nResponse :\nstatus_code := {}\nelapsed_ms := {:.1}\n{}\n",
        lines.join("\n"),
        response.status.as_u16(),
        response.elapsed_ms(),
        pretty(&response.body)
    )
}

/// Renders the environment description as `key=value` lines.
#[must_use]
pub fn render_environment(config: &RunConfig) -> String {
    format!(
        "Environment={}\nProject={}\nHarness version={}\n",
        config.environment,
        config.project_dir.display(),
        env!("CARGO_PKG_VERSION")
    )
}

#[async_trait]
impl ResultsSink for ResultsDir {
    async fn clean(&self) -> Result<(), ReportError> {
        match fs::canonicalize(&self.root).await {
            Ok(root) => {
                self.check_removable(&root).await?;
                fs::remove_dir_all(&root)
                    .await
                    .map_err(io_error(&self.root))?;
                info!(path = %self.root.display(), "Previous results removed");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&self.root)(e)),
        }
        self.attachments.store(0, Ordering::SeqCst);
        fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(&self.root))
    }

    async fn record_exchange(
        &self,
        scenario: &str,
        request: &ApiRequest,
        response: &ApiResponse,
    ) -> Result<(), ReportError> {
        let index = self.attachments.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("{index:03}-{}-response.txt", slugify(scenario));
        let path = self
            .write(&name, render_exchange(request, response).as_bytes())
            .await?;
        debug!(path = %path.display(), "Exchange recorded");
        Ok(())
    }

    async fn finish(&self, config: &RunConfig, summary: &RunSummary) -> Result<(), ReportError> {
        self.write(ENVIRONMENT_FILE, render_environment(config).as_bytes())
            .await?;

        let json = serde_json::to_vec_pretty(summary)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        let path = self.write(SUMMARY_FILE, &json).await?;
        info!(path = %path.display(), "Run summary written");
        Ok(())
    }
}

//! The streaming test client.
//!
//! One probe run composes the fixed chat-completion request, POSTs it to the
//! proxy under test, and renders the streamed response line by line: every
//! `data: ` payload that parses as JSON is pretty-printed and checked for a
//! text delta, everything else is echoed verbatim. When the stream ends the
//! accumulated text is flushed as a single delimited summary section.

use std::io::Write;
use std::time::Duration;

use futures_util::StreamExt;
use http::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::{ProbeConfig, CLIENT_TYPE_HEADER};
use crate::error::ProbeError;
use crate::observability::log_stream_usage;
use crate::protocol::{classify_delta, extract_usage, StreamUsage};
use crate::stream::LineBuffer;

/// Sentinel marker denoting a data line in SSE-style streaming.
pub const DATA_PREFIX: &str = "data: ";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// What a completed probe run observed.
#[derive(Debug, Default)]
pub struct ProbeReport {
    /// Extracted text fragments, in arrival order.
    pub fragments: Vec<String>,
    /// Non-empty lines consumed from the stream.
    pub lines: usize,
    /// Usage reported by the upstream, when the final chunk carried one.
    pub usage: Option<StreamUsage>,
}

impl ProbeReport {
    /// The full response text, reconstructed in arrival order.
    #[must_use]
    pub fn concatenated(&self) -> String {
        self.fragments.concat()
    }
}

/// Terminal state of a probe run.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The stream was consumed to its end.
    Completed(ProbeReport),
    /// The proxy answered with a non-success status. The status and body are
    /// echoed and the run stops without reading the stream; this is a
    /// reported condition, not an error.
    UpstreamError { status: u16, body: String },
}

fn build_client(config: &ProbeConfig) -> Result<reqwest::Client, ProbeError> {
    let mut builder = reqwest::Client::builder()
        .tcp_nodelay(true)
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy();
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    builder
        .build()
        .map_err(|err| ProbeError::Transport(format!("Failed to build HTTP client: {err}")))
}

/// Run one probe against the configured proxy, rendering everything to `out`.
///
/// A non-2xx answer is absorbed into [`ProbeOutcome::UpstreamError`]; only
/// transport-level failures (connection refused, timeout, a broken stream)
/// and output failures surface as `Err`. Transport failures abandon the run
/// without showing any partially accumulated text.
///
/// # Errors
///
/// Returns [`ProbeError`] on an invalid target URL, a transport-level
/// failure, or a failed write to `out`.
pub async fn run_probe<W: Write>(
    config: &ProbeConfig,
    out: &mut W,
) -> Result<ProbeOutcome, ProbeError> {
    let url = url::Url::parse(&config.url)
        .map_err(|err| ProbeError::Config(format!("Invalid target URL '{}': {err}", config.url)))?;
    let payload = config.request_payload();
    let body = serde_json::to_string(&payload)?;

    writeln!(out, "Sending request to proxy server...")?;
    writeln!(out, "URL: {url}")?;
    writeln!(
        out,
        "Headers: {{\"Content-Type\": \"application/json\", \"{CLIENT_TYPE_HEADER}\": \"{}\"}}",
        config.client_type
    )?;
    writeln!(out, "Payload: {}", serde_json::to_string_pretty(&payload)?)?;
    writeln!(out, "\nStreaming response:")?;

    let client = build_client(config)?;
    let response = client
        .post(url.as_str())
        .header(CONTENT_TYPE, "application/json")
        .header(CLIENT_TYPE_HEADER, &config.client_type)
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        writeln!(out, "Error: {status} {body}")?;
        return Ok(ProbeOutcome::UpstreamError { status, body });
    }

    let mut report = ProbeReport::default();
    let mut lines = LineBuffer::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        lines.push(&chunk);
        while let Some(line) = lines.next_line() {
            if !line.is_empty() {
                render_line(&line, out, &mut report)?;
            }
        }
    }
    if let Some(line) = lines.finish() {
        if !line.is_empty() {
            render_line(&line, out, &mut report)?;
        }
    }

    if !report.fragments.is_empty() {
        let rule = "=".repeat(60);
        writeln!(out, "\n{rule}")?;
        writeln!(out, "Accumulated Complete Response:")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "{}", report.concatenated())?;
        writeln!(out, "{rule}")?;
    }

    if let Some(usage) = &report.usage {
        log_stream_usage(&config.model, usage);
    }

    Ok(ProbeOutcome::Completed(report))
}

/// Render one non-empty line and fold any recognized fragment into `report`.
fn render_line<W: Write>(
    line: &str,
    out: &mut W,
    report: &mut ProbeReport,
) -> Result<(), ProbeError> {
    report.lines += 1;

    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        // Not a data line; echo as-is.
        writeln!(out, "{line}")?;
        return Ok(());
    };

    match serde_json::from_str::<Value>(data) {
        Ok(event) => {
            writeln!(out, "data: {}", serde_json::to_string_pretty(&event)?)?;
            if let Some(delta) = classify_delta(&event) {
                let text = delta.into_text();
                if !text.is_empty() {
                    report.fragments.push(text);
                }
            }
            if let Some(usage) = extract_usage(&event) {
                report.usage = Some(usage);
            }
        }
        Err(_) => {
            // Not valid JSON (e.g. the [DONE] terminator); echo as-is.
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}

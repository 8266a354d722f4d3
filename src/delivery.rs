//! Delivers the rendered report: SMTP in normal runs, a local file in
//! preview runs, plus an optional healthcheck ping after a successful
//! send.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::response::{Category, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::{Config, SmtpConfig};
use crate::error::{ReportError, ReportResult};

/// Fixed preview artifact, overwritten on every preview run.
pub const PREVIEW_FILE: &str = "preview.html";

const PING_TIMEOUT_SECS: u64 = 10;

/// Write the rendered HTML verbatim to the preview path and return it.
pub fn write_preview(html: &str) -> ReportResult<PathBuf> {
    write_preview_in(Path::new("."), html)
}

pub fn write_preview_in(dir: &Path, html: &str) -> ReportResult<PathBuf> {
    let path = dir.join(PREVIEW_FILE);
    std::fs::write(&path, html)?;
    Ok(path)
}

/// Send the report to every configured recipient. The transport lives
/// only for this call; dropping it on any exit path closes the
/// connection.
pub async fn send_email(config: &Config, html: String, text: String) -> ReportResult<()> {
    let message = build_message(config, html, text)?;
    let mailer = build_transport(&config.smtp)?;

    match mailer.test_connection().await {
        Ok(true) => {}
        Ok(false) => {
            return Err(ReportError::SmtpConnect(
                "server refused the connection".into(),
            ))
        }
        Err(e) if is_auth_error(&e) => return Err(ReportError::SmtpAuth(e.to_string())),
        Err(e) => return Err(ReportError::SmtpConnect(e.to_string())),
    }

    info!(server = %config.smtp.server, "Sending email");
    mailer.send(message).await.map_err(|e| {
        if is_auth_error(&e) {
            ReportError::SmtpAuth(e.to_string())
        } else {
            ReportError::SmtpSend(e.to_string())
        }
    })?;
    Ok(())
}

/// Best-effort delivery-health ping. Failures are logged, never
/// escalated.
pub async fn ping_healthcheck(url: &str) {
    info!("Pinging healthcheck");
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Could not build healthcheck client");
            return;
        }
    };
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => info!("Healthcheck ping sent"),
        Ok(response) => {
            warn!(status = %response.status(), "Healthcheck ping returned non-success status");
        }
        Err(e) => warn!(error = %e, "Could not send healthcheck ping"),
    }
}

fn build_message(config: &Config, html: String, text: String) -> ReportResult<Message> {
    let from: Mailbox = config.email.from.parse().map_err(|e| {
        ReportError::Config(format!(
            "invalid sender address '{}': {}",
            config.email.from, e
        ))
    })?;

    let mut builder = Message::builder()
        .from(from)
        .subject(config.email.subject.clone());
    for recipient in &config.email.to {
        let to: Mailbox = recipient.parse().map_err(|e| {
            ReportError::Config(format!("invalid recipient address '{recipient}': {e}"))
        })?;
        builder = builder.to(to);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| ReportError::SmtpSend(format!("failed to build message: {e}")))
}

fn build_transport(smtp: &SmtpConfig) -> ReportResult<AsyncSmtpTransport<Tokio1Executor>> {
    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp.server.as_str())
            .port(smtp.port);

    if smtp.starttls {
        let tls = TlsParameters::new(smtp.server.clone())
            .map_err(|e| ReportError::SmtpConnect(e.to_string()))?;
        builder = builder.tls(Tls::Required(tls));
    }
    if smtp.authentication {
        builder = builder.credentials(Credentials::new(
            smtp.user.clone(),
            smtp.password.clone(),
        ));
    }

    Ok(builder.build())
}

/// The 53x family of permanent replies covers authentication problems.
fn is_auth_error(error: &lettre::transport::smtp::Error) -> bool {
    error.status().is_some_and(|code| {
        code.severity == Severity::PermanentNegativeCompletion
            && code.category == Category::Unspecified3
    })
}

use thiserror::Error;

/// Errors that abort a report run.
///
/// Non-fatal conditions (skipped records, a failed healthcheck ping) are
/// logged where they occur and never surface here.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot reach Firefly III instance: {0}")]
    Connection(String),

    #[error("Firefly III rejected the access token: {0}")]
    Auth(String),

    #[error("Firefly III API error: {0}")]
    Api(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("aggregation error: {0}")]
    Aggregate(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("could not connect to SMTP server: {0}")]
    SmtpConnect(String),

    #[error("could not authenticate with SMTP server: {0}")]
    SmtpAuth(String),

    #[error("failed to send email: {0}")]
    SmtpSend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Pipeline stage the error belongs to, named in the exit message.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Connection(_) | Self::Auth(_) | Self::Api(_) => "api client",
            Self::Config(_) => "configuration",
            Self::Aggregate(_) => "aggregation",
            Self::Template(_) => "renderer",
            Self::SmtpConnect(_) | Self::SmtpAuth(_) | Self::SmtpSend(_) | Self::Io(_) => {
                "delivery"
            }
        }
    }

    /// Process exit code for a fatal error. SMTP failures keep distinct
    /// codes so schedulers can tell a transport problem from a bad token.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SmtpConnect(_) => 2,
            Self::SmtpAuth(_) => 3,
            Self::SmtpSend(_) => 4,
            _ => 1,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_failures_keep_distinct_exit_codes() {
        assert_eq!(ReportError::SmtpConnect("x".into()).exit_code(), 2);
        assert_eq!(ReportError::SmtpAuth("x".into()).exit_code(), 3);
        assert_eq!(ReportError::SmtpSend("x".into()).exit_code(), 4);
    }

    #[test]
    fn test_everything_else_exits_one() {
        assert_eq!(ReportError::Connection("x".into()).exit_code(), 1);
        assert_eq!(ReportError::Config("x".into()).exit_code(), 1);
        assert_eq!(ReportError::Aggregate("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ReportError::Auth("x".into()).stage(), "api client");
        assert_eq!(ReportError::SmtpAuth("x".into()).stage(), "delivery");
        assert_eq!(ReportError::Template("x".into()).stage(), "renderer");
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Stale element: {0}")]
    StaleElement(String),

    #[error("JavaScript error: {0}")]
    JsError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Faults a scrape is expected to run into on a live page: the element is
    /// absent, went stale, could not be clicked, or a wait ran out of time.
    /// Callers turn these into a `false`/"N/A" outcome; anything else is fatal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound(_)
                | Error::Timeout(_)
                | Error::NotInteractable(_)
                | Error::StaleElement(_)
        )
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_faults_are_transient() {
        assert!(Error::ElementNotFound(".next-button".into()).is_transient());
        assert!(Error::Timeout("first product".into()).is_transient());
        assert!(Error::NotInteractable("overlay".into()).is_transient());
        assert!(Error::StaleElement("node 7".into()).is_transient());
    }

    #[test]
    fn environment_faults_are_fatal() {
        assert!(!Error::LaunchError("no chrome".into()).is_transient());
        assert!(!Error::NavigationError("dns".into()).is_transient());
        assert!(!Error::Config("empty selector".into()).is_transient());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!Error::from(io).is_transient());
    }
}

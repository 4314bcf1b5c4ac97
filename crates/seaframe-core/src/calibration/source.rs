use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::error::ParseError;

/// Upper bound on one remote calibration fetch, connect through body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a calibration file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationLocation {
    Path(PathBuf),
    Url(Url),
}

impl CalibrationLocation {
    /// Interpret `location` as a URL when it carries a scheme, otherwise as
    /// a filesystem path. Single-letter schemes are Windows drive letters.
    pub fn resolve(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if url.scheme().len() > 1 => CalibrationLocation::Url(url),
            _ => CalibrationLocation::Path(PathBuf::from(location)),
        }
    }
}

/// Read the text of a calibration file from a path, a `file://` URL or an
/// `http(s)://` URL. Remote fetches give up after [`FETCH_TIMEOUT`].
pub fn read_calibration_source(location: &str) -> Result<String, ParseError> {
    let path = match CalibrationLocation::resolve(location) {
        CalibrationLocation::Path(path) => path,
        CalibrationLocation::Url(url) if url.scheme() == "file" => {
            url.to_file_path()
                .map_err(|_| ParseError::UnsupportedSource {
                    location: location.to_string(),
                })?
        }
        CalibrationLocation::Url(url) if matches!(url.scheme(), "http" | "https") => {
            return fetch_remote(location, &url);
        }
        CalibrationLocation::Url(_) => {
            return Err(ParseError::UnsupportedSource {
                location: location.to_string(),
            });
        }
    };
    std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
        location: location.to_string(),
        source,
    })
}

fn fetch_remote(location: &str, url: &Url) -> Result<String, ParseError> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let response = agent.get(url.as_str()).call().map_err(|err| ParseError::Fetch {
        location: location.to_string(),
        message: err.to_string(),
    })?;
    response.into_string().map_err(|source| ParseError::Io {
        location: location.to_string(),
        source,
    })
}

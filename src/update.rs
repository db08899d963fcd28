//! replacing the running executable with a newer release.

use {
    hyper::{Client, StatusCode, Uri, http::uri::InvalidUri},
    log::{debug, info},
    std::{
        ffi::OsString,
        fmt::{self, Display},
        fs, io,
        path::{Path, PathBuf},
    },
};


/// something that can bring the monitor up to date.
pub trait Updater {
    fn update(&self) -> Result<UpdateOutcome, UpdateError>;
}

#[derive(Debug, Eq, PartialEq)]
pub enum UpdateOutcome {
    /// the local file already matched the remote release.
    UpToDate,
    /// the local file was overwritten, after being copied to `backup` if one was requested.
    Updated { backup: Option<PathBuf> },
}

/// fetches a release over plain http and overwrites a local file with it.
#[derive(Clone, Debug)]
pub struct HttpUpdater {
    url: Uri,
    target: PathBuf,
    backup: bool,
}

#[derive(Debug)]
pub enum UpdateError {
    Uri(InvalidUri),
    /// only `http://` urls can be fetched.
    Scheme { url: Uri },
    Http(hyper::Error),
    Status(StatusCode),
    Io(io::Error),
}

// === impl HttpUpdater ===

impl HttpUpdater {
    pub fn new(url: &str, target: impl Into<PathBuf>, backup: bool) -> Result<Self, UpdateError> {
        let url = url.parse::<Uri>()?;
        if url.scheme_str() != Some("http") {
            return Err(UpdateError::Scheme { url });
        }

        Ok(Self {
            url,
            target: target.into(),
            backup,
        })
    }

    async fn fetch(&self) -> Result<Vec<u8>, UpdateError> {
        let response = Client::new().get(self.url.clone()).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Status(status));
        }

        let body = hyper::body::to_bytes(response.into_body()).await?;
        debug!("fetched {} bytes from {}", body.len(), self.url);
        Ok(body.to_vec())
    }

    /// overwrites the target with `release`, unless they already match.
    fn apply(&self, release: &[u8]) -> Result<UpdateOutcome, UpdateError> {
        let Self { target, backup, .. } = self;

        if fs::read(target)? == release {
            return Ok(UpdateOutcome::UpToDate);
        }

        let backup = if *backup {
            let path = with_suffix(target, ".bak");
            fs::copy(target, &path)?;
            info!("backed up {} to {}", target.display(), path.display());
            Some(path)
        } else {
            None
        };

        // write beside the target and rename over it, so the target is never half written.
        let staged = with_suffix(target, ".new");
        fs::write(&staged, release)?;
        fs::set_permissions(&staged, fs::metadata(target)?.permissions())?;
        fs::rename(&staged, target)?;
        info!("updated {}", target.display());

        Ok(UpdateOutcome::Updated { backup })
    }
}

impl Updater for HttpUpdater {
    fn update(&self) -> Result<UpdateOutcome, UpdateError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let release = runtime.block_on(self.fetch())?;
        self.apply(&release)
    }
}

/// appends `suffix` to the file name of `path`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(path);
    path.push(suffix);
    PathBuf::from(path)
}

// === impl UpdateOutcome ===

impl Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => f.write_str("already up to date"),
            Self::Updated { backup: None } => f.write_str("updated"),
            Self::Updated {
                backup: Some(backup),
            } => write!(f, "updated, previous version saved to {}", backup.display()),
        }
    }
}

// === impl UpdateError ===

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Uri(error) => Some(error),
            Self::Http(error) => Some(error),
            Self::Io(error) => Some(error),
            Self::Scheme { .. } | Self::Status(_) => None,
        }
    }
}

impl Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(error) => write!(f, "invalid update url: {error}"),
            Self::Scheme { url } => write!(f, "unsupported update url {url}, expected http://"),
            Self::Http(error) => write!(f, "failed to fetch update: {error}"),
            Self::Status(status) => write!(f, "update server responded with {status}"),
            Self::Io(error) => write!(f, "failed to install update: {error}"),
        }
    }
}

impl From<InvalidUri> for UpdateError {
    fn from(error: InvalidUri) -> Self {
        Self::Uri(error)
    }
}

impl From<hyper::Error> for UpdateError {
    fn from(error: hyper::Error) -> Self {
        Self::Http(error)
    }
}

impl From<io::Error> for UpdateError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

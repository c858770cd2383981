//! Byte sources for texture locations.

use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

/// Fetches the raw bytes behind a texture location.
///
/// Implementations run on loader worker threads and must not touch scene
/// state.
pub trait TextureSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError>;
}

/// Fetches `http://` and `https://` URLs with a blocking `ureq` agent.
pub struct HttpSource {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl HttpSource {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            agent: ureq::agent(),
            max_bytes,
        }
    }
}

impl TextureSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let response = self
            .agent
            .get(location)
            .call()
            .map_err(|source| LoadError::Http {
                url: location.to_string(),
                source: Box::new(source),
            })?;

        read_limited(response.into_reader(), location, self.max_bytes)
    }
}

/// Reads local files.
pub struct FileSource {
    max_bytes: u64,
}

impl FileSource {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl TextureSource for FileSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let path = Path::new(location);
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        read_limited(file, location, self.max_bytes)
    }
}

/// Dispatches on scheme: HTTP(S) URLs go over the network, everything else
/// is treated as a file path.
pub struct UrlSource {
    http: HttpSource,
    file: FileSource,
}

impl UrlSource {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            http: HttpSource::new(max_bytes),
            file: FileSource::new(max_bytes),
        }
    }
}

impl TextureSource for UrlSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let location = location.trim();
        if is_remote(location) {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}

/// Refuses every request.
pub struct OfflineSource;

impl TextureSource for OfflineSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        Err(LoadError::Offline {
            location: location.to_string(),
        })
    }
}

fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read at most `limit` bytes; one extra byte means the payload is too big.
fn read_limited(reader: impl Read, location: &str, limit: u64) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Io {
            path: location.into(),
            source,
        })?;

    if bytes.len() as u64 > limit {
        return Err(LoadError::TooLarge {
            location: location.to_string(),
            limit,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection() {
        assert!(is_remote("https://threejs.org/a.jpg"));
        assert!(is_remote("HTTP://example.com/b.png"));
        assert!(!is_remote("assets/earth.jpg"));
        assert!(!is_remote("/tmp/httpfile.png"));
    }

    #[test]
    fn test_file_source_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tex.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let source = UrlSource::new(1024);
        let bytes = source.fetch(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_url_source_trims_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padded.bin");
        std::fs::write(&path, [7u8, 8]).unwrap();

        let source = UrlSource::new(1024);
        let padded = format!("  {}\n", path.display());
        assert_eq!(source.fetch(&padded).unwrap(), vec![7, 8]);
        assert!(!is_remote(" https://example.com/a.jpg"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");
        let err = FileSource::new(1024)
            .fetch(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_size_limit_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 17]).unwrap();

        let err = FileSource::new(16)
            .fetch(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { limit: 16, .. }));

        let ok = FileSource::new(17).fetch(path.to_str().unwrap()).unwrap();
        assert_eq!(ok.len(), 17);
    }

    #[test]
    fn test_offline_source_always_fails() {
        let err = OfflineSource.fetch("https://example.com/x.png").unwrap_err();
        assert!(err.to_string().contains("offline"));
    }
}

//! Loading the BOF index.
//!
//! Provides:
//! - `IndexSource` resolving a configured location to a URL or a file
//! - `load_index` reading the document once and normalizing its entries
//! - `fetch_json` the HTTP half, usable with a caller-built client

use crate::entry::{parse_catalog, Entry};
use crate::error::{CatalogError, CatalogResult};
use reqwest::blocking::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Shown to the user whenever the index could not be loaded
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load BOF index. Run scripts/update-site-data.sh and refresh.";

/// Where the index document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    Remote(Url),
    File(PathBuf),
}

impl IndexSource {
    /// `http(s)://` locations are fetched, `file://` URLs and anything that
    /// is not a URL at all are read from disk.
    pub fn resolve(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => IndexSource::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => IndexSource::File(path),
                Err(()) => IndexSource::File(PathBuf::from(url.path())),
            },
            _ => IndexSource::File(PathBuf::from(location)),
        }
    }
}

/// Read and normalize the index. Called once per load; nothing is cached.
pub fn load_index(source: &IndexSource) -> CatalogResult<Vec<Entry>> {
    let payload = match source {
        IndexSource::Remote(url) => {
            let client = Client::builder().user_agent("bof_search").build()?;
            fetch_json(&client, url)?
        }
        IndexSource::File(path) => {
            log::debug!("Reading index from {}", path.display());
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
    };

    let entries = parse_catalog(&payload);
    log::info!("Loaded {} entries", entries.len());
    Ok(entries)
}

/// GET `url` and parse the body as JSON. Any non-success status is an error.
pub fn fetch_json(client: &Client, url: &Url) -> CatalogResult<Value> {
    log::debug!("Fetching index from {url}");
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status.as_u16()));
    }

    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::NamedTempFile;

    /// Serve exactly one HTTP response on a local port and return its URL
    fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        Url::parse(&format!("http://{addr}/data/bof-index.json")).unwrap()
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn write_index(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn resolve_locations() {
        assert!(matches!(
            IndexSource::resolve("https://example.com/data/bof-index.json"),
            IndexSource::Remote(_)
        ));
        assert_eq!(
            IndexSource::resolve("./data/bof-index.json"),
            IndexSource::File(PathBuf::from("./data/bof-index.json"))
        );
        assert_eq!(
            IndexSource::resolve("file:///tmp/bof-index.json"),
            IndexSource::File(PathBuf::from("/tmp/bof-index.json"))
        );
    }

    #[test]
    fn loads_entries_from_file() {
        let file = write_index(r#"{"bofs": [{"name": "nanodump"}, {"description": "no name"}]}"#);
        let entries = load_index(&IndexSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "nanodump");
        assert_eq!(entries[1].name, crate::entry::UNNAMED);
    }

    #[test]
    fn file_without_bofs_is_empty_not_an_error() {
        let file = write_index(r#"{"generated": "2024-01-01"}"#);
        let entries = load_index(&IndexSource::File(file.path().to_path_buf())).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_index(&IndexSource::File(dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn bad_json_is_parse_error() {
        let file = write_index("{ not json");
        let err = load_index(&IndexSource::File(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn fetch_ok() {
        let url = serve_once("200 OK", r#"{"bofs": [{"name": "a"}, {"name": "b"}]}"#);
        let payload = fetch_json(&local_client(), &url).unwrap();
        assert_eq!(parse_catalog(&payload).len(), 2);
    }

    #[test]
    fn fetch_server_error_is_status_error() {
        let url = serve_once("500 Internal Server Error", "");
        let err = fetch_json(&local_client(), &url).unwrap_err();
        assert!(matches!(err, CatalogError::Status(500)));
    }

    #[test]
    fn fetch_refused_is_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/bof-index.json")).unwrap();
        let err = fetch_json(&local_client(), &url).unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}

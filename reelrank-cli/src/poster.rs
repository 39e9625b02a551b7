/// Poster resolution client: reference page → TMDb link → og:image.
///
/// Purely cosmetic and batch-scoped. A film's cached image is refetched
/// only while it still equals the configured placeholder by content hash;
/// once a real poster (or anything else) is in place, the file is never
/// touched again. Failures are logged and otherwise ignored — ratings
/// never depend on this path.
use std::path::{Path, PathBuf};

use regex::Regex;
use reqwest::Client;
use sha2::{Digest, Sha256};

use reelrank_core::Film;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct PosterClient {
    client: Client,
    images_dir: PathBuf,
    placeholder: Option<PathBuf>,
    placeholder_hash: Option<String>,
}

impl PosterClient {
    pub fn new(images_dir: &Path, placeholder: Option<&Path>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| crate::bail(format!("Failed to build HTTP client: {e}")));

        let placeholder_hash = placeholder.and_then(|p| match sha256_file(p) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "cannot hash placeholder image");
                None
            }
        });

        PosterClient {
            client,
            images_dir: images_dir.to_path_buf(),
            placeholder: placeholder.map(Path::to_path_buf),
            placeholder_hash,
        }
    }

    /// Cached image path for a film: `<images_dir>/<name> (<uri id>).jpg`.
    pub fn image_path(&self, film: &Film) -> PathBuf {
        let id = film.uri.rsplit('/').next().unwrap_or_default();
        self.images_dir
            .join(format!("{} ({id}).jpg", sanitize_filename(&film.name)))
    }

    /// Ensure each record in the batch has an image file, resolving and
    /// downloading a real poster where the cache still holds the
    /// placeholder.
    pub async fn fetch_missing<'a>(&self, films: impl Iterator<Item = &'a Film>) {
        for film in films {
            let path = self.image_path(film);
            if !path.exists() {
                self.seed_placeholder(&path);
            }

            let Some(ref placeholder_hash) = self.placeholder_hash else {
                continue;
            };
            match sha256_file(&path) {
                Ok(ref hash) if hash == placeholder_hash => {}
                _ => continue,
            }

            tracing::info!(name = %film.name, "fetching poster");
            match self.resolve(&film.uri).await {
                Some(url) => match self.fetch(&url, &path).await {
                    Ok(()) => tracing::info!(name = %film.name, "poster downloaded"),
                    Err(e) => {
                        tracing::warn!(name = %film.name, error = %e, "poster download failed")
                    }
                },
                None => tracing::warn!(name = %film.name, "no poster found"),
            }
        }
    }

    /// Resolve a reference URI to a poster image URL, or `None`.
    pub async fn resolve(&self, uri: &str) -> Option<String> {
        let page = self.get_text(uri).await?;
        let tmdb_url = extract_tmdb_url(&page)?;
        let tmdb_page = self.get_text(&tmdb_url).await?;
        extract_og_image(&tmdb_page)
    }

    /// Download an image URL to `dest`. Refuses non-image responses.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<(), String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("status {}", resp.status()));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("image") {
            return Err(format!("content type {content_type:?} is not an image"));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("read failed: {e}"))?;
        std::fs::write(dest, &bytes).map_err(|e| format!("write failed: {e}"))
    }

    async fn get_text(&self, url: &str) -> Option<String> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url, error = %e, "request failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(url, status = %resp.status(), "request rejected");
            return None;
        }
        resp.text().await.ok()
    }

    /// Copy the placeholder in for a film with no cached image yet, so the
    /// hash gate has something to compare against.
    fn seed_placeholder(&self, dest: &Path) {
        let Some(ref placeholder) = self.placeholder else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&self.images_dir) {
            tracing::warn!(dir = %self.images_dir.display(), error = %e, "cannot create images dir");
            return;
        }
        if let Err(e) = std::fs::copy(placeholder, dest) {
            tracing::warn!(path = %dest.display(), error = %e, "cannot seed placeholder");
        }
    }
}

/// Replace characters that are invalid in filenames on at least one
/// platform.
pub fn sanitize_filename(name: &str) -> String {
    let invalid = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    invalid.replace_all(name, "_").into_owned()
}

/// Find the TMDb link on a reference page.
fn extract_tmdb_url(html: &str) -> Option<String> {
    let anchor = Regex::new(r#"<a\b[^>]*data-track-action="TMDb"[^>]*>"#).ok()?;
    let href = Regex::new(r#"href="([^"]+)""#).ok()?;
    let tag = anchor.find(html)?.as_str();
    Some(href.captures(tag)?[1].to_string())
}

/// Find the og:image URL on a TMDb page.
fn extract_og_image(html: &str) -> Option<String> {
    let meta = Regex::new(r#"<meta\b[^>]*property="og:image"[^>]*>"#).ok()?;
    let content = Regex::new(r#"content="([^"]+)""#).ok()?;
    let tag = meta.find(html)?.as_str();
    Some(content.captures(tag)?[1].to_string())
}

fn sha256_file(path: &Path) -> Result<String, std::io::Error> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

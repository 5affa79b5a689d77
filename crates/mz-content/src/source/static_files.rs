//! Bundled static JSON content (mock mode).

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{ContentKind, ContentRequest, ContentSource, require_object};
use crate::error::ContentError;

/// Reads content envelopes from JSON files on disk.
///
/// Layout under the content directory:
///
/// ```text
/// site.json
/// navigation.json
/// de-CH/faq.json
/// de-CH/modules.json
/// fr-CH/...
/// ```
///
/// Files are consumed verbatim: each must already be an envelope such as
/// `{"site_settings": {...}}`.
pub struct StaticSource {
    content_dir: PathBuf,
}

impl StaticSource {
    /// Create a source rooted at `content_dir`.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Content directory this source reads from.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// File backing `request`.
    fn path_for(&self, request: &ContentRequest) -> PathBuf {
        match request.kind {
            ContentKind::Site => self.content_dir.join("site.json"),
            ContentKind::Navigation => self.content_dir.join("navigation.json"),
            ContentKind::Faq | ContentKind::Modules => self
                .content_dir
                .join(request.locale.as_str())
                .join(format!("{}.json", request.kind.endpoint())),
        }
    }
}

impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn serves(&self, _kind: ContentKind) -> bool {
        true
    }

    fn fetch(&self, request: &ContentRequest) -> Result<Value, ContentError> {
        let path = self.path_for(request);
        let text = std::fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded {request} from static JSON");
        require_object(value, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_config::Locale;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_reads_site_envelope_verbatim() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "site.json",
            r#"{"site_settings": {"brandName": "MZ"}}"#,
        );

        let source = StaticSource::new(temp.path());
        let envelope = source.fetch(&ContentRequest::site()).unwrap();

        assert_eq!(envelope, json!({"site_settings": {"brandName": "MZ"}}));
    }

    #[test]
    fn test_reads_locale_scoped_lists() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "fr-CH/faq.json",
            r#"{"faq": [{"question": "Quoi?"}]}"#,
        );

        let source = StaticSource::new(temp.path());
        let envelope = source.fetch(&ContentRequest::faq(Locale::FrCh)).unwrap();

        assert_eq!(envelope, json!({"faq": [{"question": "Quoi?"}]}));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let source = StaticSource::new(temp.path());

        let result = source.fetch(&ContentRequest::navigation());

        assert!(matches!(result, Err(ContentError::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "navigation.json", "{not json");

        let source = StaticSource::new(temp.path());
        let result = source.fetch(&ContentRequest::navigation());

        assert!(matches!(result, Err(ContentError::Json(_))));
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "site.json", "[1, 2]");

        let source = StaticSource::new(temp.path());
        let result = source.fetch(&ContentRequest::site());

        assert!(matches!(result, Err(ContentError::InvalidPayload(_))));
    }
}

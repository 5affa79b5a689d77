//! Image source resolution.

use mz_content::AssetRef;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::RenderContext;

/// Characters escaped in an asset id path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Resolve the image URL for `asset`.
///
/// A direct `url` always wins. Otherwise an asset `id` maps to the Directus
/// assets endpoint, except in mock mode where no CMS is available. Returns
/// `None` when nothing resolves; callers leave the image untouched then.
#[must_use]
pub fn resolve_image(asset: Option<&AssetRef>, ctx: &RenderContext) -> Option<String> {
    let asset = asset?;

    if let Some(url) = asset.url.as_deref().filter(|u| !u.is_empty()) {
        return Some(url.to_owned());
    }

    let id = asset.id.as_deref().filter(|id| !id.is_empty())?;
    if ctx.mock_mode {
        return None;
    }

    Some(format!(
        "{}/assets/{}",
        ctx.directus_url.trim_end_matches('/'),
        utf8_percent_encode(id, PATH_SEGMENT)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> RenderContext {
        RenderContext {
            mock_mode: false,
            directus_url: "https://cms.example.ch/".to_owned(),
        }
    }

    fn asset(url: Option<&str>, id: Option<&str>) -> AssetRef {
        AssetRef {
            url: url.map(str::to_owned),
            id: id.map(str::to_owned),
        }
    }

    #[test]
    fn test_url_wins_over_id() {
        let a = asset(Some("/img/logo.svg"), Some("abc"));
        assert_eq!(resolve_image(Some(&a), &live()), Some("/img/logo.svg".to_owned()));
    }

    #[test]
    fn test_id_builds_asset_url() {
        let a = asset(None, Some("3f2a-11"));
        assert_eq!(
            resolve_image(Some(&a), &live()),
            Some("https://cms.example.ch/assets/3f2a-11".to_owned())
        );
    }

    #[test]
    fn test_id_is_path_encoded() {
        let a = asset(None, Some("../x?y"));
        assert_eq!(
            resolve_image(Some(&a), &live()),
            Some("https://cms.example.ch/assets/..%2Fx%3Fy".to_owned())
        );
    }

    #[test]
    fn test_id_ignored_in_mock_mode() {
        let ctx = RenderContext {
            mock_mode: true,
            ..live()
        };
        assert_eq!(resolve_image(Some(&asset(None, Some("abc"))), &ctx), None);
    }

    #[test]
    fn test_nothing_to_resolve() {
        assert_eq!(resolve_image(None, &live()), None);
        assert_eq!(resolve_image(Some(&asset(None, None)), &live()), None);
    }
}

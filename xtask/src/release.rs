//! Version and container tag derivation for release builds.

/// Version used for builds of the default branch and when nothing better is
/// known.
pub const LATEST: &str = "latest";

const DEFAULT_BRANCH: &str = "main";
const TAG_PREFIX: &str = "refs/tags/";

/// Derives the image version from a git ref and an optional release tag.
///
/// `main` and `refs/heads/main` give `latest`. Otherwise the release tag is
/// used, or the last segment of the ref when no tag is given; one leading
/// `v` is stripped from tags, so `v1.2.3` becomes `1.2.3`.
#[must_use]
pub fn derive_version(git_ref: &str, release_tag: Option<&str>) -> String {
    let git_ref = git_ref.trim();
    let branch = git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref);
    if branch == DEFAULT_BRANCH {
        return LATEST.to_string();
    }

    let (name, is_tag) = match release_tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => (tag, true),
        None => (
            git_ref.rsplit('/').next().unwrap_or_default(),
            git_ref.starts_with(TAG_PREFIX),
        ),
    };
    let name = if is_tag {
        name.strip_prefix('v').unwrap_or(name)
    } else {
        name
    };

    if name.is_empty() || name == DEFAULT_BRANCH {
        LATEST.to_string()
    } else {
        name.to_string()
    }
}

/// Full image references to push for `version`: the version tag and
/// `latest`, without duplicates. Registries require lower-case repository
/// names, so `image` is lowercased.
#[must_use]
pub fn image_tags(image: &str, version: &str) -> Vec<String> {
    let image = image.trim().to_lowercase();
    let mut tags = vec![format!("{image}:{version}")];
    if version != LATEST {
        tags.push(format!("{image}:{LATEST}"));
    }
    tags
}

//! Request URL parsing.
//!
//! A folder is addressed as `/<folder path>.<selector>.json`, e.g.
//! `/content/dam/foo.size.json`.

use foldersize_core::FolderPath;

use crate::error::ApiError;

/// Extract the folder path from a request path.
pub fn parse_request_path(raw: &str, selector: &str) -> Result<FolderPath, ApiError> {
    let suffix = format!(".{selector}.json");
    let folder = raw
        .strip_suffix(&suffix)
        .ok_or_else(|| ApiError::UnknownRoute {
            path: raw.to_string(),
        })?;

    let folder = if folder.is_empty() { "/" } else { folder };
    FolderPath::parse(folder).map_err(ApiError::InvalidPath)
}

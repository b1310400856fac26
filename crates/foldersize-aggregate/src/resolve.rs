//! Mapping descendant paths onto buckets.

use foldersize_core::{BucketKey, FolderPath, MalformedPathError};

/// Resolve the bucket an asset belongs to.
///
/// For an asset nested at any depth below one of the target's children the
/// key is that child. An asset sitting directly in the target resolves to
/// the target itself, which never names an initialized bucket, so such
/// assets end up uncounted.
pub fn resolve_bucket(
    target: &FolderPath,
    asset: &FolderPath,
) -> Result<BucketKey, MalformedPathError> {
    let malformed = || MalformedPathError {
        target: target.clone(),
        asset: asset.clone(),
    };

    let depth_below = target
        .relative_segments(asset)
        .map(|rest| rest.len())
        .ok_or_else(malformed)?;

    match depth_below {
        0 => Err(malformed()),
        1 => Ok(target.clone()),
        _ => target.child_toward(asset).ok_or_else(malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> FolderPath {
        FolderPath::parse(s).unwrap()
    }

    #[test]
    fn test_nested_asset_resolves_to_child() {
        let target = p("/content/dam/foo");
        assert_eq!(
            resolve_bucket(&target, &p("/content/dam/foo/a/x.jpg")).unwrap(),
            p("/content/dam/foo/a")
        );
        assert_eq!(
            resolve_bucket(&target, &p("/content/dam/foo/a/b/c/d/x.jpg")).unwrap(),
            p("/content/dam/foo/a")
        );
    }

    #[test]
    fn test_direct_child_resolves_to_target() {
        let target = p("/content/dam/foo");
        assert_eq!(
            resolve_bucket(&target, &p("/content/dam/foo/x.jpg")).unwrap(),
            target
        );
    }

    #[test]
    fn test_non_descendant_is_malformed() {
        let target = p("/content/dam/foo");
        let err = resolve_bucket(&target, &p("/content/dam/bar/a/x.jpg")).unwrap_err();
        assert_eq!(err.asset, p("/content/dam/bar/a/x.jpg"));
        assert_eq!(err.target, target);

        // Shares a string prefix but not a segment prefix.
        assert!(resolve_bucket(&target, &p("/content/dam/foobar/a/x.jpg")).is_err());

        // The target itself is not a descendant.
        assert!(resolve_bucket(&target, &target).is_err());
    }

    #[test]
    fn test_root_target() {
        let root = FolderPath::root();
        assert_eq!(
            resolve_bucket(&root, &p("/content/dam/x.jpg")).unwrap(),
            p("/content")
        );
        assert_eq!(resolve_bucket(&root, &p("/x.jpg")).unwrap(), root);
    }
}

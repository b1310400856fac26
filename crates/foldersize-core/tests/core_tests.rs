use foldersize_core::{
    AggregationResult, AssetRecord, BucketStats, ChildResource, FolderPath, ResourceKind,
};
use std::str::FromStr;

#[test]
fn test_folder_path_round_trips_through_display() {
    let path: FolderPath = "/content/dam/we.retail/en".parse().unwrap();
    assert_eq!(path.to_string(), "/content/dam/we.retail/en");
    assert_eq!(path.depth(), 4);
    assert_eq!(
        path.segments().collect::<Vec<_>>(),
        vec!["content", "dam", "we.retail", "en"]
    );
}

#[test]
fn test_from_segments() {
    let path = FolderPath::from_segments(["content", "dam", "foo"]).unwrap();
    assert_eq!(path.as_str(), "/content/dam/foo");

    let root = FolderPath::from_segments(std::iter::empty()).unwrap();
    assert!(root.is_root());

    assert!(FolderPath::from_segments(["content", ".."]).is_err());
}

#[test]
fn test_resource_kind_strings() {
    assert_eq!(ResourceKind::Folder.to_string(), "folder");
    assert_eq!(ResourceKind::from_str("asset").unwrap(), ResourceKind::Asset);
    assert!(ResourceKind::from_str("page").is_err());

    let json = serde_json::to_string(&ResourceKind::Other).unwrap();
    assert_eq!(json, "\"other\"");
}

#[test]
fn test_resource_kind_discrimination() {
    assert!(ResourceKind::Folder.is_folder());
    assert!(!ResourceKind::Folder.is_asset());
    assert!(ResourceKind::Asset.is_asset());
    assert!(!ResourceKind::Other.is_folder());
    assert!(!ResourceKind::Other.is_asset());

    let child = ChildResource::new("/content/a".parse().unwrap(), ResourceKind::Folder);
    assert!(child.is_folder());
}

#[test]
fn test_asset_record_constructors() {
    let path: FolderPath = "/content/a/x.jpg".parse().unwrap();
    let sized = AssetRecord::sized(path.clone(), 42);
    assert!(sized.has_size());
    assert_eq!(sized.size_bytes, Some(42));

    let bare = AssetRecord::without_size(path);
    assert!(!bare.has_size());
}

#[test]
fn test_counted_never_exceeds_total() {
    let mut stats = BucketStats::new();
    for size in [Some(1), None, Some(3), None, None, Some(0)] {
        stats.record(size);
        assert!(stats.counted_assets <= stats.total_assets);
    }
    assert_eq!(stats.total_assets, 6);
    assert_eq!(stats.counted_assets, 3);
    assert_eq!(stats.size_bytes, 4);
}

#[test]
fn test_aggregation_result_deserializes() {
    let json = r#"{"/content/dam/foo/a":{"totalAssets":3,"countedAssets":2,"size":30}}"#;
    let result: AggregationResult = serde_json::from_str(json).unwrap();
    let key: FolderPath = "/content/dam/foo/a".parse().unwrap();
    assert_eq!(
        result.get(&key),
        Some(&BucketStats {
            total_assets: 3,
            counted_assets: 2,
            size_bytes: 30
        })
    );
    assert!(result.contains(&key));
    assert!(!result.is_empty());
}

//! Integration tests for the media catalog.

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use catalog_core::traits::ObjectStorage;

use catalog_core::ErrorKind;
use catalog_core::types::PageRequest;
use catalog_entity::media::{MediaFilter, MediaKind, MediaSort};

use helpers::{MAX_UPLOAD, TestCatalog, digest, request};

const TEN_BYTES: &[u8] = b"0123456789";

#[tokio::test]
async fn test_identical_upload_is_deduplicated() {
    let catalog = TestCatalog::new();
    let sha = digest(TEN_BYTES);

    let first = catalog.upload("audio", TEN_BYTES, "", None).await.unwrap();
    assert_eq!(first.storage_key, format!("media/audio/{sha}"));
    assert_eq!(first.bytes, 10);
    assert_eq!(first.sha256, sha);
    assert_eq!(first.kind, MediaKind::Audio);

    let second = catalog
        .upload("audio", TEN_BYTES, "", None)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.storage_key, first.storage_key);
    assert_eq!(second.sha256, first.sha256);
    assert_eq!(catalog.storage.put_count(), 1);
}

#[tokio::test]
async fn test_dedup_ignores_filename() {
    let catalog = TestCatalog::new();
    let first = catalog
        .upload("image", b"pixels", "cat.png", None)
        .await
        .unwrap();
    let second = catalog
        .upload("image", b"pixels", "renamed-cat.PNG", None)
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.original_name, "cat.png");
    assert_eq!(catalog.storage.put_count(), 1);
}

#[tokio::test]
async fn test_same_bytes_different_kind_are_distinct() {
    let catalog = TestCatalog::new();
    let image = catalog
        .upload("image", TEN_BYTES, "x.bin", None)
        .await
        .unwrap();
    let audio = catalog
        .upload("audio", TEN_BYTES, "x.bin", None)
        .await
        .unwrap();

    assert_ne!(image.id, audio.id);
    assert_ne!(image.storage_key, audio.storage_key);
    assert_eq!(image.sha256, audio.sha256);
    assert_eq!(catalog.storage.put_count(), 2);
}

#[tokio::test]
async fn test_storage_key_uses_lowercased_extension() {
    let catalog = TestCatalog::new();
    let content = b"jpeg-bytes";
    let asset = catalog
        .upload("IMAGE", content, "Holiday.JPG", None)
        .await
        .unwrap();

    assert_eq!(
        asset.storage_key,
        format!("media/image/{}.jpg", digest(content))
    );
    assert_eq!(asset.original_name, "Holiday.JPG");
    assert_eq!(asset.mime_type, "image/png");
    assert!(catalog.storage.contains(&asset.storage_key));
}

#[tokio::test]
async fn test_rejections_happen_before_storage_writes() {
    let catalog = TestCatalog::new();

    let err = catalog
        .upload("video", TEN_BYTES, "clip.mp4", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedKind);

    let err = catalog.upload("audio", b"", "a.mp3", None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyContent);

    let too_big = vec![0u8; MAX_UPLOAD as usize + 1];
    let err = catalog
        .upload("audio", &too_big, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(catalog.storage.put_count(), 0);
}

#[tokio::test]
async fn test_put_failure_leaves_no_metadata() {
    let catalog = TestCatalog::new();
    catalog.storage.fail_put.store(true, Ordering::SeqCst);

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);

    let page = catalog
        .ctx
        .media
        .list_media(&MediaFilter::default(), MediaSort::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_metadata_failure_removes_stored_object() {
    let catalog = TestCatalog::new();
    catalog.media_store.fail_create.store(true, Ordering::SeqCst);

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert!(err.rollback_error().is_none());

    assert_eq!(catalog.storage.put_count(), 1);
    assert_eq!(catalog.storage.delete_calls.load(Ordering::SeqCst), 1);
    assert!(!catalog.storage.contains(&format!("media/audio/{}.mp3", digest(TEN_BYTES))));
}

#[tokio::test]
async fn test_failed_compensation_is_reported_alongside_cause() {
    let catalog = TestCatalog::new();
    catalog.media_store.fail_create.store(true, Ordering::SeqCst);
    catalog.storage.fail_delete.store(true, Ordering::SeqCst);

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    let rollback = err.rollback_error().expect("rollback failure attached");
    assert_eq!(rollback.kind, ErrorKind::StorageUnavailable);

    assert!(catalog.storage.contains(&format!("media/audio/{}.mp3", digest(TEN_BYTES))));
}

#[tokio::test]
async fn test_lost_insert_race_returns_winner() {
    let catalog = TestCatalog::new();
    catalog.media_store.lose_race.store(true, Ordering::SeqCst);

    let asset = catalog
        .upload("image", b"raced", "r.png", None)
        .await
        .unwrap();
    let winner = catalog
        .ctx
        .media
        .get_media_by_id(asset.id)
        .await
        .unwrap();

    assert_eq!(winner, asset);
    assert_eq!(catalog.storage.delete_calls.load(Ordering::SeqCst), 0);
    assert!(catalog.storage.contains(&asset.storage_key));
}

#[tokio::test]
async fn test_lost_race_under_other_extension_removes_own_object() {
    let catalog = TestCatalog::new();
    let sha = digest(b"raced");
    let winner_key = format!("media/image/{sha}.jpg");
    let own_key = format!("media/image/{sha}.png");

    // The concurrent upload stored its object under its own extension.
    catalog
        .storage
        .inner
        .put_object(&winner_key, Bytes::from_static(b"raced"), 5, "image/jpeg")
        .await
        .unwrap();
    *catalog.media_store.lose_race_to.lock().unwrap() = Some("r.JPG".into());

    let asset = catalog
        .upload("image", b"raced", "r.png", None)
        .await
        .unwrap();

    assert_eq!(asset.storage_key, winner_key);
    assert_eq!(asset.original_name, "r.JPG");
    assert_eq!(catalog.storage.delete_calls.load(Ordering::SeqCst), 1);
    assert!(catalog.storage.contains(&winner_key));
    assert!(!catalog.storage.contains(&own_key));
}

#[tokio::test]
async fn test_conflict_without_winner_compensates() {
    let catalog = TestCatalog::new();
    catalog
        .media_store
        .phantom_conflict
        .store(true, Ordering::SeqCst);

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.rollback_error().is_none());

    assert_eq!(catalog.storage.delete_calls.load(Ordering::SeqCst), 1);
    assert!(!catalog.storage.contains(&format!("media/audio/{}.mp3", digest(TEN_BYTES))));
    assert!(
        catalog
            .ctx
            .media
            .list_media(&MediaFilter::default(), MediaSort::default(), PageRequest::default())
            .await
            .unwrap()
            .items
            .is_empty()
    );
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let catalog = TestCatalog::new();
    let asset = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap();

    catalog.ctx.media.delete_media(asset.id).await.unwrap();

    let err = catalog
        .ctx
        .media
        .get_media_by_id(asset.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(!catalog.storage.contains(&asset.storage_key));

    let err = catalog.ctx.media.delete_media(asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_object_delete_failure_keeps_metadata() {
    let catalog = TestCatalog::new();
    let asset = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap();
    catalog.storage.fail_delete.store(true, Ordering::SeqCst);

    let err = catalog.ctx.media.delete_media(asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);
    assert!(catalog.ctx.media.get_media_by_id(asset.id).await.is_ok());
}

#[tokio::test]
async fn test_metadata_delete_failure_after_object_delete_surfaces() {
    let catalog = TestCatalog::new();
    let asset = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap();
    catalog.media_store.fail_delete.store(true, Ordering::SeqCst);

    let err = catalog.ctx.media.delete_media(asset.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert!(!catalog.storage.contains(&asset.storage_key));
}

#[tokio::test]
async fn test_without_storage() {
    let catalog = TestCatalog::without_storage();

    let err = catalog
        .upload("audio", TEN_BYTES, "a.mp3", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);

    let seeded = catalog.seed_media(MediaKind::Image, &digest(b"seed")).await;

    // Known content still deduplicates without touching storage.
    let deduped = catalog.upload("image", b"seed", "s.png", None).await.unwrap();
    assert_eq!(deduped.id, seeded.id);

    let err = catalog.ctx.media.delete_media(seeded.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);
    assert!(catalog.ctx.media.get_media_by_id(seeded.id).await.is_ok());

    let err = catalog
        .ctx
        .media
        .get_presigned_url(seeded.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);
}

#[tokio::test]
async fn test_presigned_url_ttl() {
    let catalog = TestCatalog::new();
    let asset = catalog
        .upload("image", b"photo", "p.png", None)
        .await
        .unwrap();
    let media = &catalog.ctx.media;

    let url = media.get_presigned_url(asset.id, None).await.unwrap();
    assert!(url.contains(&asset.storage_key));
    assert_eq!(
        *catalog.storage.last_ttl.lock().unwrap(),
        Some(Duration::from_secs(900))
    );

    media
        .get_presigned_url(asset.id, Some(Duration::ZERO))
        .await
        .unwrap();
    assert_eq!(
        *catalog.storage.last_ttl.lock().unwrap(),
        Some(Duration::from_secs(900))
    );

    media
        .get_presigned_url(asset.id, Some(Duration::from_secs(60)))
        .await
        .unwrap();
    assert_eq!(
        *catalog.storage.last_ttl.lock().unwrap(),
        Some(Duration::from_secs(60))
    );

    catalog.storage.fail_presign.store(true, Ordering::SeqCst);
    let err = media.get_presigned_url(asset.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);

    let err = media
        .get_presigned_url(Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_get_by_ids_omits_unknown() {
    let catalog = TestCatalog::new();
    let a = catalog.upload("image", b"a", "a.png", None).await.unwrap();
    let b = catalog.upload("image", b"b", "b.png", None).await.unwrap();

    let found = catalog
        .ctx
        .media
        .get_media_by_ids(&[b.id, Uuid::new_v4(), a.id])
        .await
        .unwrap();
    let ids: Vec<_> = found.iter().map(|m| m.id).collect();
    assert_eq!(ids, [b.id, a.id]);

    assert!(
        catalog
            .ctx
            .media
            .get_media_by_ids(&[])
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_batch_reports_each_item() {
    let catalog = TestCatalog::new();
    let results = catalog
        .ctx
        .media
        .upload_media_batch(vec![
            request("image", b"one", "1.png", None),
            request("video", b"two", "2.mp4", None),
            request("audio", b"", "3.mp3", None),
            request("image", b"one", "1-again.png", None),
        ])
        .await;

    assert_eq!(results.len(), 4);
    let first = results[0].as_ref().unwrap();
    assert_eq!(
        results[1].as_ref().unwrap_err().kind,
        ErrorKind::UnsupportedKind
    );
    assert_eq!(results[2].as_ref().unwrap_err().kind, ErrorKind::EmptyContent);
    assert_eq!(results[3].as_ref().unwrap().id, first.id);
    assert_eq!(catalog.storage.put_count(), 1);
}

#[tokio::test]
async fn test_list_media_filters() {
    let catalog = TestCatalog::new();
    let folder = catalog.folder("Lessons", None).await;
    let small = catalog
        .upload("audio", b"ab", "intro.mp3", Some(folder.id))
        .await
        .unwrap();
    let large = catalog
        .upload("audio", b"abcdef", "Outro.mp3", Some(folder.id))
        .await
        .unwrap();
    catalog.upload("image", b"cover", "cover.png", None).await.unwrap();

    let in_folder = catalog
        .ctx
        .media
        .list_media(
            &MediaFilter {
                folder_id: Some(folder.id),
                ..Default::default()
            },
            MediaSort {
                field: catalog_entity::media::MediaSortField::Bytes,
                direction: catalog_core::types::SortDirection::Desc,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    let ids: Vec<_> = in_folder.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, [large.id, small.id]);

    let images = catalog
        .ctx
        .media
        .list_media(
            &MediaFilter {
                kind: Some(MediaKind::Image),
                ..Default::default()
            },
            MediaSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(images.total_items, 1);

    let by_name = catalog
        .ctx
        .media
        .list_media(
            &MediaFilter {
                original_name: Some("OUTRO".into()),
                ..Default::default()
            },
            MediaSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_name.items.len(), 1);
    assert_eq!(by_name.items[0].id, large.id);

    let by_digest = catalog
        .ctx
        .media
        .list_media(
            &MediaFilter {
                sha256: Some(small.sha256.clone()),
                ..Default::default()
            },
            MediaSort::default(),
            PageRequest::new(1, 1),
        )
        .await
        .unwrap();
    assert_eq!(by_digest.items[0].id, small.id);
    assert!(!by_digest.has_next);
}

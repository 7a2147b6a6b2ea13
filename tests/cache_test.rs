// キャッシュテスト: キー計算とメモリ内ストア

use std::sync::Arc;

use block_cropper::cache::hash::compute_cache_key;
use block_cropper::cache::store::CropCache;
use block_cropper::pipeline::PipelineParameters;
use block_cropper::pipeline::page_processor::{PageSegmentation, segment_page};
use block_cropper::segment::Page;
use image::{GrayImage, Luma};

fn sample_page() -> Page {
    let mut img = GrayImage::from_pixel(64, 64, Luma([255]));
    for y in 10..30 {
        for x in 5..50 {
            img.put_pixel(x, y, Luma([0]));
        }
    }
    Page::new(0, img)
}

fn sample_segmentation(page: &Page) -> Arc<PageSegmentation> {
    let params = PipelineParameters {
        min_region_area: 10.0,
        erosion_iterations: 0,
        ..PipelineParameters::default()
    };
    Arc::new(segment_page(page, &params))
}

#[test]
fn test_cache_key_is_deterministic_hex() {
    let page = sample_page();
    let params = PipelineParameters::default();

    let k1 = compute_cache_key(&page, &params).unwrap();
    let k2 = compute_cache_key(&page, &params).unwrap();
    assert_eq!(k1, k2);
    assert_eq!(k1.len(), 64);
    assert!(k1.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
}

#[test]
fn test_store_and_retrieve() {
    let cache = CropCache::new();
    let page = sample_page();
    let key = compute_cache_key(&page, &PipelineParameters::default()).unwrap();
    let seg = sample_segmentation(&page);

    assert!(cache.is_empty());
    assert!(cache.retrieve(&key).unwrap().is_none());

    cache.store(&key, Arc::clone(&seg)).unwrap();
    let hit = cache.retrieve(&key).unwrap().expect("should hit");
    assert_eq!(*hit, *seg);
    assert_eq!(hit.crops.len(), 1);
}

#[test]
fn test_invalid_key_is_rejected() {
    let cache = CropCache::new();
    let page = sample_page();
    assert!(cache.store("not-a-hash", sample_segmentation(&page)).is_err());
    assert!(cache.retrieve("not-a-hash").is_err());
    assert!(!cache.contains("not-a-hash"));
}

#[test]
fn test_clear_discards_entries() {
    let cache = CropCache::new();
    let page = sample_page();
    let key = compute_cache_key(&page, &PipelineParameters::default()).unwrap();
    cache.store(&key, sample_segmentation(&page)).unwrap();
    assert_eq!(cache.len(), 1);

    cache.clear().unwrap();
    assert!(cache.is_empty());
    assert!(!cache.contains(&key));
}

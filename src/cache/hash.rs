// SHA-256（ページ画素 + パイプライン設定）
//
// Computes a cache key from a page's pixels and the parameters that affect
// segmentation. The key is a SHA-256 hash encoded as a lowercase hexadecimal string.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::pipeline::PipelineParameters;
use crate::segment::Page;

/// 設定を正規化JSON形式に変換する（キーはアルファベット順で固定）。
fn params_to_canonical_json(params: &PipelineParameters) -> crate::error::Result<String> {
    let mut map = BTreeMap::new();
    map.insert(
        "binarization_threshold",
        serde_json::json!(params.binarization_threshold),
    );
    map.insert(
        "erosion_iterations",
        serde_json::json!(params.erosion_iterations),
    );
    map.insert("min_region_area", serde_json::json!(params.min_region_area));
    map.insert("vertical_gap", serde_json::json!(params.vertical_gap));
    Ok(serde_json::to_string(&map)?)
}

/// ページと設定からキャッシュキー（SHA-256ハッシュ）を計算する。
///
/// ハッシュ入力: `page_index || width || height || pixels || params_canonical_json`
/// 設定のいずれかが変われば別のキーになるため、古い結果が返ることはない。
pub fn compute_cache_key(page: &Page, params: &PipelineParameters) -> crate::error::Result<String> {
    let mut hasher = Sha256::new();
    hasher.update((page.index() as u64).to_le_bytes());
    hasher.update(page.width().to_le_bytes());
    hasher.update(page.height().to_le_bytes());
    hasher.update(page.image().as_raw());

    let params_json = params_to_canonical_json(params)?;
    hasher.update(params_json.as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

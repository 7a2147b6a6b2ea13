// メモリ内キャッシュ: hash → ページ分割結果
//
// Holds per-page segmentation results for one session, keyed by SHA-256 hash.
// Nothing is written to disk.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::BlockCropError;
use crate::pipeline::page_processor::PageSegmentation;

/// キャッシュキーが有効な SHA-256 hex 文字列であることを検証する。
///
/// 有効なキーは正確に64文字の小文字16進数([0-9a-f])である必要がある。
fn validate_cache_key(key: &str) -> crate::error::Result<()> {
    if key.len() == 64 && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        Ok(())
    } else {
        Err(BlockCropError::cache(format!(
            "invalid cache key: expected 64-character lowercase hex string, got '{}'",
            key
        )))
    }
}

/// セッション単位のクロップキャッシュ。
///
/// 異なるドキュメントの実行間で共有してはならない。rayonの並列ページ処理から
/// 同時に参照されるため内部は `Mutex` で保護する。
#[derive(Debug, Default)]
pub struct CropCache {
    entries: Mutex<HashMap<String, Arc<PageSegmentation>>>,
}

impl CropCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> crate::error::Result<std::sync::MutexGuard<'_, HashMap<String, Arc<PageSegmentation>>>>
    {
        self.entries
            .lock()
            .map_err(|_| BlockCropError::cache("cache lock poisoned"))
    }

    /// 分割結果を保存する。同じキーの既存エントリは置き換える。
    pub fn store(&self, key: &str, segmentation: Arc<PageSegmentation>) -> crate::error::Result<()> {
        validate_cache_key(key)?;
        self.lock()?.insert(key.to_string(), segmentation);
        Ok(())
    }

    /// キャッシュから分割結果を取得する。キャッシュミスの場合は None を返す。
    pub fn retrieve(&self, key: &str) -> crate::error::Result<Option<Arc<PageSegmentation>>> {
        validate_cache_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    /// キャッシュキーが存在するか確認する。
    pub fn contains(&self, key: &str) -> bool {
        validate_cache_key(key).is_ok() && self.lock().is_ok_and(|m| m.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 全エントリを破棄する（新しいドキュメントの読み込み時）。
    pub fn clear(&self) -> crate::error::Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cache_key_rejects_uppercase_hex() {
        let uppercase_key = "a".repeat(58) + "ABCDEF";
        assert_eq!(uppercase_key.len(), 64);
        assert!(validate_cache_key(&uppercase_key).is_err());
    }

    #[test]
    fn test_validate_cache_key_accepts_lowercase_hex() {
        let lowercase_key = "a".repeat(64);
        assert!(validate_cache_key(&lowercase_key).is_ok());
    }

    #[test]
    fn test_validate_cache_key_rejects_wrong_length() {
        let short_key = "a".repeat(63);
        assert!(validate_cache_key(&short_key).is_err());
    }
}

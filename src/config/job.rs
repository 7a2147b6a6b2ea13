use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    pub output: String,
    /// 処理対象ページ（1始まり）。省略時は全ページ。
    #[serde(default, deserialize_with = "deserialize_optional_range")]
    pub pages: Option<Vec<u32>>,
    /// 出力から除外するクロップ番号（1始まり、ジョブ内の全クロップ通し番号）。
    #[serde(default, deserialize_with = "deserialize_optional_range")]
    pub exclude: Option<Vec<u32>>,
    /// 注釈付きプレビューPNGの出力先ディレクトリ。
    pub preview_dir: Option<String>,
    pub dpi: Option<u32>,
    pub binarization_threshold: Option<u8>,
    pub erosion_iterations: Option<u32>,
    pub min_region_area: Option<f64>,
    pub vertical_gap: Option<f32>,
}

impl Job {
    /// 選択ページを0始まりのインデックスに変換する。`None` は全ページ。
    pub fn page_selection(&self) -> crate::error::Result<Option<Vec<usize>>> {
        self.pages.as_deref().map(to_zero_based).transpose()
    }

    /// 除外クロップを0始まりのインデックスに変換する。
    pub fn excluded_crops(&self) -> crate::error::Result<Vec<usize>> {
        match self.exclude.as_deref() {
            Some(numbers) => to_zero_based(numbers),
            None => Ok(Vec::new()),
        }
    }
}

fn to_zero_based(numbers: &[u32]) -> crate::error::Result<Vec<usize>> {
    numbers
        .iter()
        .map(|&n| {
            if n == 0 {
                Err(crate::error::BlockCropError::config(
                    "Page and crop numbers are 1-based; got 0",
                ))
            } else {
                Ok((n - 1) as usize)
            }
        })
        .collect()
}

/// ページ範囲文字列をパースしてページ番号のベクタに変換する。
///
/// 形式:
/// - 単一ページ: `"5"`
/// - 範囲: `"5-10"` (5, 6, 7, 8, 9, 10)
/// - 混合（カンマ区切り）: `"1, 3, 5-10, 15"`
///
/// 結果はソート済み・重複なし。クロップ除外リストにも同じ書式を使う。
pub fn parse_page_range(s: &str) -> crate::error::Result<Vec<u32>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(crate::error::BlockCropError::config(
            "Page range cannot be empty",
        ));
    }

    let mut pages = Vec::new();

    for part in trimmed.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let start: u32 = start_str.trim().parse().map_err(|_| {
                crate::error::BlockCropError::config(format!(
                    "Invalid page number in range: '{start_str}'"
                ))
            })?;
            let end: u32 = end_str.trim().parse().map_err(|_| {
                crate::error::BlockCropError::config(format!(
                    "Invalid page number in range: '{end_str}'"
                ))
            })?;

            if start > end {
                return Err(crate::error::BlockCropError::config(format!(
                    "Invalid page range: start ({start}) > end ({end})"
                )));
            }

            pages.extend(start..=end);
        } else {
            let page: u32 = part.parse().map_err(|_| {
                crate::error::BlockCropError::config(format!("Invalid page number: '{part}'"))
            })?;
            pages.push(page);
        }
    }

    if pages.is_empty() {
        return Err(crate::error::BlockCropError::config(
            "Page range resolved to empty set",
        ));
    }

    pages.sort();
    pages.dedup();
    Ok(pages)
}

/// serdeのdeserialize_withで使用する省略可能なページ範囲デシリアライザ。
///
/// YAMLでは `pages: 3` のような数値も受け付ける。
fn deserialize_optional_range<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RangeValue {
        Number(u32),
        Text(String),
    }

    match Option::<RangeValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RangeValue::Number(n)) => Ok(Some(vec![n])),
        Some(RangeValue::Text(s)) => parse_page_range(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

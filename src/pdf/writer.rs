// PDF assembly: OutputPage sequence -> image XObjects, content streams, page tree

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::BlockCropError;
use crate::layout::{LayoutConfig, OutputPage};
use crate::segment::CropRegion;

/// OutputPage列からPDFドキュメントを組み立てる。
///
/// ページツリーのルートは生成時に予約し、`finish` で Kids を確定する。
pub struct CropPageWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_width: f32,
    page_height: f32,
}

impl CropPageWriter {
    pub fn new(layout: &LayoutConfig) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            page_width: layout.page_width,
            page_height: layout.page_height,
        }
    }

    /// グレースケールのクロップ画像をFlateDecode XObjectとして追加する。
    ///
    /// 戻り値はXObjectのオブジェクトID。
    pub fn add_crop_xobject(&mut self, crop: &CropRegion) -> crate::error::Result<ObjectId> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(crop.pixels.as_raw())?;
        let compressed = encoder.finish()?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => crop.width() as i64,
            "Height" => crop.height() as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let stream = Stream::new(dict, compressed);
        Ok(self.doc.add_object(Object::Stream(stream)))
    }

    /// 画像1枚を描画するコンテンツストリーム断片を生成する。
    ///
    /// `q <width> 0 0 <height> <x> <y> cm /<name> Do Q`
    pub fn build_draw_command(name: &str, x: f32, y: f32, width: f32, height: f32) -> String {
        format!("q {width} 0 0 {height} {x} {y} cm /{name} Do Q\n")
    }

    /// OutputPageを1ページとして書き込む。
    ///
    /// 戻り値はページのオブジェクトID。
    pub fn write_page(&mut self, page: &OutputPage<'_>) -> crate::error::Result<ObjectId> {
        let mut xobject_dict = Dictionary::new();
        let mut content = String::new();

        for (i, placement) in page.placements.iter().enumerate() {
            let name = format!("Im{}", i + 1);
            let xobject_id = self.add_crop_xobject(placement.crop)?;
            xobject_dict.set(name.as_bytes(), Object::Reference(xobject_id));
            content.push_str(&Self::build_draw_command(
                &name,
                placement.x,
                placement.bottom(),
                placement.width,
                placement.height,
            ));
        }

        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = self.doc.add_object(Object::Stream(content_stream));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_width),
                Object::Real(self.page_height),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);

        Ok(page_id)
    }

    /// 書き込み済みページ数を返す。
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// ページツリーとCatalogを確定し、PDFをバイト列として出力する。
    pub fn finish(mut self) -> crate::error::Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(BlockCropError::pdf_write("document has no pages"));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| BlockCropError::pdf_write(e.to_string()))?;
        Ok(buf)
    }
}

/// Serialize packed pages into an in-memory PDF.
pub fn write_document(
    pages: &[OutputPage<'_>],
    layout: &LayoutConfig,
) -> crate::error::Result<Vec<u8>> {
    let mut writer = CropPageWriter::new(layout);
    for page in pages {
        writer.write_page(page)?;
    }
    writer.finish()
}

use crate::domain::model::{Comment, CommentForm};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// 儲存與查詢圖片留言的遠端服務
#[async_trait]
pub trait CommentService: Send + Sync {
    /// 依服務回傳的順序取得某張圖片的留言
    async fn fetch_comments(&self, index: u32) -> Result<Vec<Comment>>;

    /// 新增留言；回傳 Ok 代表服務已確認
    async fn post_comment(&self, form: &CommentForm) -> Result<()>;
}

/// 一段已轉為純文字的留言：標頭為 "使用者 · 時間"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub header: String,
    pub body: String,
}

/// 呈現環境。所有文字都以字面內容寫入，不會被解讀成標記或程式碼。
pub trait DocumentSurface: Send {
    type Element: Clone + Debug + Send + Sync;

    fn lookup(&self, id: &str) -> Option<Self::Element>;

    fn set_visible(&mut self, element: &Self::Element, visible: bool);
    fn is_visible(&self, element: &Self::Element) -> bool;

    fn set_image(&mut self, element: &Self::Element, src: &str, alt: &str);
    fn set_text(&mut self, element: &Self::Element, text: &str);

    fn clear_children(&mut self, element: &Self::Element);
    fn append_comment(&mut self, element: &Self::Element, view: &CommentView);
    fn append_notice(&mut self, element: &Self::Element, message: &str);

    /// 回傳切換後是否帶有該 class
    fn toggle_class(&mut self, element: &Self::Element, class: &str) -> bool;

    fn form_fields(&self, form: &Self::Element) -> Vec<(String, String)>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn image_count(&self) -> Option<u32>;
    fn max_username_length(&self) -> usize;
    fn max_body_length(&self) -> usize;
}

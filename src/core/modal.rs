use crate::core::render::comment_view;
use crate::core::{
    Comment, CommentForm, CommentService, ConfigProvider, DocumentSurface, ImageRef, ModalSession,
    ModalState,
};
use crate::utils::error::{ModalError, Result};
use crate::utils::validation::{validate_image_index, validate_max_length, validate_non_empty_string};
use tokio::sync::Mutex;

pub const DEFAULT_MAX_USERNAME_LENGTH: usize = 64;
pub const DEFAULT_MAX_BODY_LENGTH: usize = 2000;

/// 控制器綁定時要查找的元素 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub modal: String,
    pub image: String,
    pub caption: String,
    pub image_index: String,
    pub comments: String,
    pub form: Option<String>,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            modal: "modal".to_string(),
            image: "focus-image".to_string(),
            caption: "focus-image-caption".to_string(),
            image_index: "focus-image-index".to_string(),
            comments: "previous-comments".to_string(),
            form: Some("comment-form".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSettings {
    pub image_count: Option<u32>,
    pub max_username_length: usize,
    pub max_body_length: usize,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            image_count: None,
            max_username_length: DEFAULT_MAX_USERNAME_LENGTH,
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
        }
    }
}

impl ModalSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            image_count: config.image_count(),
            max_username_length: config.max_username_length(),
            max_body_length: config.max_body_length(),
        }
    }
}

/// 一次載入（開啟或重新整理）的結果
#[derive(Debug)]
pub enum LoadOutcome {
    Rendered { index: u32, count: usize },
    Failed { index: u32, error: ModalError },
    Stale { index: u32 },
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Posted {
        index: u32,
        refresh: Option<LoadOutcome>,
    },
    Rejected(ModalError),
    Failed(ModalError),
}

#[derive(Debug, Clone)]
struct ModalElements<E> {
    modal: E,
    image: E,
    caption: E,
    image_index: E,
    comments: E,
    form: Option<E>,
}

struct Inner<D: DocumentSurface> {
    surface: D,
    elements: ModalElements<D::Element>,
    state: ModalState,
    current_token: u64,
}

impl<D: DocumentSurface> Inner<D> {
    fn next_token(&mut self) -> u64 {
        self.current_token += 1;
        self.current_token
    }

    fn is_current(&self, token: u64) -> bool {
        self.current_token == token
    }

    fn render_comments(&mut self, comments: &[Comment]) {
        self.surface.clear_children(&self.elements.comments);
        for comment in comments {
            self.surface
                .append_comment(&self.elements.comments, &comment_view(comment));
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.surface.append_notice(&self.elements.comments, message);
    }
}

/// 圖片彈窗：顯示圖片與留言、送出新留言、關閉。
///
/// 所有方法都接受 `&self`，可在同一個協作式任務中交錯呼叫。每次載入都會
/// 取得新的 token，回應抵達時只有仍是最新 token 的結果會被套用。
pub struct ModalController<S: CommentService, D: DocumentSurface> {
    service: S,
    settings: ModalSettings,
    inner: Mutex<Inner<D>>,
}

impl<S: CommentService, D: DocumentSurface> ModalController<S, D> {
    /// 查找所有元素並持有其參照；缺少任何元素即失敗
    pub fn bind(service: S, surface: D, ids: &ElementIds, settings: ModalSettings) -> Result<Self> {
        let find = |id: &str| {
            surface.lookup(id).ok_or_else(|| ModalError::MissingElement {
                id: id.to_string(),
            })
        };

        let elements = ModalElements {
            modal: find(ids.modal.as_str())?,
            image: find(ids.image.as_str())?,
            caption: find(ids.caption.as_str())?,
            image_index: find(ids.image_index.as_str())?,
            comments: find(ids.comments.as_str())?,
            form: ids.form.as_deref().map(find).transpose()?,
        };

        tracing::debug!("Bound modal controller to elements {:?}", ids);

        Ok(Self {
            service,
            settings,
            inner: Mutex::new(Inner {
                surface,
                elements,
                state: ModalState::Closed,
                current_token: 0,
            }),
        })
    }

    pub async fn open_modal(&self, image: ImageRef) -> LoadOutcome {
        let index = image.index;

        let token = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            let token = inner.next_token();

            inner.surface.set_visible(&inner.elements.modal, true);
            inner
                .surface
                .set_image(&inner.elements.image, &image.src, &image.alt);
            inner.surface.set_text(&inner.elements.caption, &image.alt);
            inner
                .surface
                .set_text(&inner.elements.image_index, &index.to_string());
            inner.surface.clear_children(&inner.elements.comments);

            inner.state = ModalState::Open(ModalSession {
                image,
                comments: Vec::new(),
                load_token: token,
            });
            token
        };

        tracing::info!("🖼️ Opened modal for image {} (load {})", index, token);

        if let Err(error) = validate_image_index("index", index, self.settings.image_count) {
            tracing::warn!("⚠️ Not loading comments for image {}: {}", index, error);
            let mut guard = self.inner.lock().await;
            if guard.is_current(token) {
                guard.show_notice(&error.user_friendly_message());
            }
            return LoadOutcome::Failed { index, error };
        }

        self.load_comments(index, token).await
    }

    /// 回傳 false 代表原本就是關閉狀態，什麼都沒做
    pub async fn close_modal(&self) -> bool {
        let mut guard = self.inner.lock().await;
        if !guard.state.is_open() {
            tracing::debug!("close_modal called while already closed");
            return false;
        }

        let inner = &mut *guard;
        // 讓進行中的載入全部失效
        inner.next_token();
        inner.surface.set_visible(&inner.elements.modal, false);
        inner.state = ModalState::Closed;

        tracing::info!("Closed modal");
        true
    }

    /// 驗證、送出並等待確認；若該圖片仍開啟則重新載入留言
    pub async fn submit_comment(&self, form: CommentForm) -> SubmitOutcome {
        if let Err(error) = self.validate_form(&form) {
            tracing::warn!("⚠️ Rejected comment for image {}: {}", form.id, error);
            self.notify(form.id, &error).await;
            return SubmitOutcome::Rejected(error);
        }

        tracing::debug!("Posting comment by '{}' on image {}", form.username, form.id);
        if let Err(error) = self.service.post_comment(&form).await {
            tracing::error!(
                "❌ Posting comment on image {} failed: {} (Category: {:?})",
                form.id,
                error,
                error.category()
            );
            self.notify(form.id, &error).await;
            return SubmitOutcome::Failed(error);
        }

        tracing::info!("✅ Comment posted on image {}", form.id);

        let refresh = self.refresh_if_showing(form.id).await;
        SubmitOutcome::Posted {
            index: form.id,
            refresh,
        }
    }

    /// 讀取綁定的留言表單欄位後送出
    pub async fn submit_form(&self) -> SubmitOutcome {
        let form = {
            let guard = self.inner.lock().await;
            let Some(form_element) = guard.elements.form.as_ref() else {
                return SubmitOutcome::Rejected(ModalError::ConfigError {
                    message: "no comment form is bound to this modal".to_string(),
                });
            };
            let fields = guard.surface.form_fields(form_element);
            let open_index = guard.state.session().map(|session| session.image.index);
            CommentForm::from_fields(fields, open_index)
        };

        match form {
            Some(form) => self.submit_comment(form).await,
            // 沒有 id 代表也沒有開啟中的圖片，提示無處可放
            None => SubmitOutcome::Rejected(ModalError::validation("id", "no image is selected")),
        }
    }

    /// 重新載入目前開啟圖片的留言；關閉時回傳 None
    pub async fn refresh_comments(&self) -> Option<LoadOutcome> {
        let (index, token) = {
            let mut guard = self.inner.lock().await;
            let index = guard.state.session()?.image.index;
            let token = guard.next_token();
            if let Some(session) = guard.state.session_mut() {
                session.load_token = token;
            }
            (index, token)
        };
        Some(self.load_comments(index, token).await)
    }

    pub async fn session(&self) -> Option<ModalSession> {
        self.inner.lock().await.state.session().cloned()
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.state.is_open()
    }

    /// 檢視呈現環境目前的內容
    pub async fn inspect_surface<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard.surface)
    }

    async fn refresh_if_showing(&self, index: u32) -> Option<LoadOutcome> {
        let showing = self
            .session()
            .await
            .is_some_and(|session| session.image.index == index);
        if !showing {
            tracing::debug!("Image {} is not on screen, skipping refresh", index);
            return None;
        }
        self.refresh_comments().await
    }

    async fn load_comments(&self, index: u32, token: u64) -> LoadOutcome {
        tracing::debug!("Fetching comments for image {} (load {})", index, token);
        let fetched = self.service.fetch_comments(index).await;

        let mut guard = self.inner.lock().await;
        if !guard.is_current(token) {
            let stale = ModalError::StaleSession { index };
            tracing::debug!("{} (load {} superseded by {})", stale, token, guard.current_token);
            return LoadOutcome::Stale { index };
        }

        match fetched {
            Ok(comments) => {
                let count = comments.len();
                guard.render_comments(&comments);
                if let Some(session) = guard.state.session_mut() {
                    session.comments = comments;
                }
                tracing::info!("💬 Rendered {} comments for image {}", count, index);
                LoadOutcome::Rendered { index, count }
            }
            Err(error) => {
                tracing::warn!(
                    "⚠️ Loading comments for image {} failed: {} (Category: {:?})",
                    index,
                    error,
                    error.category()
                );
                guard.show_notice(&error.user_friendly_message());
                LoadOutcome::Failed { index, error }
            }
        }
    }

    fn validate_form(&self, form: &CommentForm) -> Result<()> {
        validate_image_index("id", form.id, self.settings.image_count)?;
        validate_non_empty_string("username", &form.username)?;
        validate_max_length("username", &form.username, self.settings.max_username_length)?;
        validate_non_empty_string("body", &form.body)?;
        validate_max_length("body", &form.body, self.settings.max_body_length)?;
        Ok(())
    }

    /// 只在畫面上正是 `index` 這張圖片時顯示提示
    async fn notify(&self, index: u32, error: &ModalError) {
        let mut guard = self.inner.lock().await;
        let showing = guard
            .state
            .session()
            .is_some_and(|session| session.image.index == index);
        if showing {
            guard.show_notice(&error.user_friendly_message());
        } else {
            tracing::debug!("Image {} is not on screen, notice not shown", index);
        }
    }
}

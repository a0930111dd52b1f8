use crate::config::{CliConfig, Command, GalleryConfig};
use crate::core::modal::{LoadOutcome, ModalController, SubmitOutcome};
use crate::core::{CommentForm, CommentService, DocumentSurface, ImageRef};
use crate::utils::error::Result;

impl CliConfig {
    /// 載入設定檔（沒有則用預設值），再套用命令列參數
    pub fn resolve(&self) -> Result<GalleryConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                GalleryConfig::from_file(path)?
            }
            None => GalleryConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.service.timeout_seconds = Some(timeout);
        }
        if self.verbose {
            config.logging.level = Some("debug".to_string());
        }

        Ok(config)
    }
}

impl Command {
    pub fn index(&self) -> u32 {
        match self {
            Command::Show { index, .. } | Command::Post { index, .. } => *index,
        }
    }

    /// 命令列沒有提供圖片來源時，以 index 推出預設值
    pub fn image_ref(&self) -> ImageRef {
        let index = self.index();
        let (src, alt) = match self {
            Command::Show { src, alt, .. } => (src.clone(), alt.clone()),
            Command::Post { .. } => (None, None),
        };
        ImageRef::new(
            index,
            src.unwrap_or_else(|| format!("images/{}.jpg", index)),
            alt.unwrap_or_else(|| format!("Image {}", index)),
        )
    }
}

/// 子命令執行完畢後的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Shown { index: u32, count: usize },
    Posted { index: u32 },
}

impl Command {
    /// 開啟圖片；`post` 在開啟失敗時仍會送出留言，只有 `show` 把載入失敗當成錯誤
    pub async fn execute<S, D>(&self, controller: &ModalController<S, D>) -> Result<CommandOutcome>
    where
        S: CommentService,
        D: DocumentSurface,
    {
        let opened = controller.open_modal(self.image_ref()).await;

        match self {
            Command::Show { index, .. } => match opened {
                LoadOutcome::Rendered { count, .. } => Ok(CommandOutcome::Shown {
                    index: *index,
                    count,
                }),
                LoadOutcome::Stale { .. } => Ok(CommandOutcome::Shown {
                    index: *index,
                    count: 0,
                }),
                LoadOutcome::Failed { error, .. } => Err(error),
            },
            Command::Post {
                index,
                username,
                body,
            } => {
                if let LoadOutcome::Failed { error, .. } = &opened {
                    tracing::warn!(
                        "⚠️ Existing comments for image {} unavailable, posting anyway: {}",
                        index,
                        error
                    );
                }
                let form = CommentForm::new(*index, username.clone(), body.clone());
                match controller.submit_comment(form).await {
                    SubmitOutcome::Posted { index, .. } => Ok(CommandOutcome::Posted { index }),
                    SubmitOutcome::Rejected(error) | SubmitOutcome::Failed(error) => Err(error),
                }
            }
        }
    }
}

use crate::core::{Comment, CommentForm, CommentService, ConfigProvider};
use crate::utils::error::{ModalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const COMMENTS_PATH: &str = "data";

/// 以 HTTP 存取留言服務：`GET /data?id=<index>` 與 `POST /data`
#[derive(Debug, Clone)]
pub struct HttpCommentService {
    client: Client,
    comments_url: Url,
}

impl HttpCommentService {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(endpoint).map_err(|e| ModalError::InvalidConfigValueError {
            field: "endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let comments_url = comments_url(&base)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            comments_url,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.endpoint(), config.request_timeout())
    }

    pub fn comments_url(&self) -> &Url {
        &self.comments_url
    }
}

// 確保 base 以 "/" 結尾，join 才不會吃掉最後一段路徑
fn comments_url(base: &Url) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(COMMENTS_PATH)
        .map_err(|e| ModalError::ConfigError {
            message: format!("Cannot build comments URL from {}: {}", base, e),
        })
}

// 連線失敗與逾時歸類為網路錯誤，其餘保留原本的 reqwest 錯誤
fn send_error(error: reqwest::Error) -> ModalError {
    if error.is_connect() || error.is_timeout() {
        ModalError::NetworkError {
            message: error.to_string(),
        }
    } else {
        ModalError::HttpError(error)
    }
}

/// 只做結構化解析，任何非留言陣列的內容都視為格式錯誤
pub fn parse_comments(payload: &str) -> Result<Vec<Comment>> {
    let comments: Vec<Comment> = serde_json::from_str(payload)?;
    Ok(comments)
}

#[async_trait]
impl CommentService for HttpCommentService {
    async fn fetch_comments(&self, index: u32) -> Result<Vec<Comment>> {
        tracing::debug!("Making API request to: {}?id={}", self.comments_url, index);
        let response = self
            .client
            .get(self.comments_url.clone())
            .query(&[("id", index)])
            .send()
            .await
            .map_err(send_error)?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ModalError::ServiceStatusError {
                status: response.status().as_u16(),
            });
        }

        let payload = response.text().await?;
        parse_comments(&payload)
    }

    async fn post_comment(&self, form: &CommentForm) -> Result<()> {
        tracing::debug!("Posting comment to: {}", self.comments_url);
        let response = self
            .client
            .post(self.comments_url.clone())
            .form(form)
            .send()
            .await
            .map_err(send_error)?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ModalError::ServiceStatusError {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

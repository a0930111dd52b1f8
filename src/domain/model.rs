use chrono::DateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// 畫廊中的一張圖片；index 從 1 開始
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub index: u32,
    pub src: String,
    pub alt: String,
}

impl ImageRef {
    pub fn new(index: u32, src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            index,
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// 留言時間：服務端可能回傳格式化字串或 epoch 毫秒
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    EpochMillis(i64),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTimestamp {
            Text(String),
            Number(serde_json::Number),
        }

        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => Ok(Timestamp::Text(text)),
            // 帶小數的毫秒（例如 1591265700000.0）四捨五入到整數毫秒
            RawTimestamp::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|millis| millis.round() as i64))
                .map(Timestamp::EpochMillis)
                .ok_or_else(|| de::Error::custom(format!("unsupported timestamp {}", number))),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Text(text) => f.write_str(text),
            Timestamp::EpochMillis(millis) => match DateTime::from_timestamp_millis(*millis) {
                Some(instant) => write!(f, "{}", instant.format("%d/%m/%Y %H:%M")),
                None => write!(f, "{}", millis),
            },
        }
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawComment")]
pub struct Comment {
    pub username: String,
    pub body: String,
    pub timestamp: Timestamp,
}

// 舊服務把時間欄位叫做 "zorblax"，只接受不輸出；兩者都有時以 timestamp 為準
#[derive(Deserialize)]
struct RawComment {
    username: String,
    body: String,
    timestamp: Option<Timestamp>,
    zorblax: Option<Timestamp>,
}

impl TryFrom<RawComment> for Comment {
    type Error = String;

    fn try_from(raw: RawComment) -> Result<Self, Self::Error> {
        let timestamp = raw
            .timestamp
            .or(raw.zorblax)
            .ok_or_else(|| "missing field `timestamp`".to_string())?;
        Ok(Self {
            username: raw.username,
            body: raw.body,
            timestamp,
        })
    }
}

impl Comment {
    pub fn new(
        username: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<Timestamp>,
    ) -> Self {
        Self {
            username: username.into(),
            body: body.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// 送往留言服務的表單內容，序列化為 url-encoded 的 id/username/body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentForm {
    pub id: u32,
    pub username: String,
    pub body: String,
}

impl CommentForm {
    pub fn new(id: u32, username: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            body: body.into(),
        }
    }

    /// 從原生表單欄位建立。缺少 id 時使用 `fallback_id`（目前開啟的圖片）。
    ///
    /// 也接受舊頁面的欄位名稱 `image-id` 與 `comment`。
    pub fn from_fields<I, K, V>(fields: I, fallback_id: Option<u32>) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut id = None;
        let mut username = String::new();
        let mut body = String::new();

        for (key, value) in fields {
            match key.as_ref() {
                "id" | "image-id" => id = value.into().trim().parse::<u32>().ok(),
                "username" => username = value.into(),
                "body" | "comment" => body = value.into(),
                _ => {}
            }
        }

        Some(Self {
            id: id.or(fallback_id)?,
            username,
            body,
        })
    }
}

/// 一次開啟期間的暫存狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    pub image: ImageRef,
    pub comments: Vec<Comment>,
    pub load_token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ModalSession),
}

impl ModalState {
    pub fn session(&self) -> Option<&ModalSession> {
        match self {
            ModalState::Open(session) => Some(session),
            ModalState::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut ModalSession> {
        match self {
            ModalState::Open(session) => Some(session),
            ModalState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_accepts_legacy_timestamp_field() {
        let payload = r#"{"username": "a", "body": "hi", "zorblax": "04/06/2020 10:15"}"#;
        let comment: Comment = serde_json::from_str(payload).unwrap();

        assert_eq!(comment.timestamp, Timestamp::from("04/06/2020 10:15"));

        let encoded = serde_json::to_value(&comment).unwrap();
        assert!(encoded.get("zorblax").is_none());
        assert_eq!(encoded["timestamp"], "04/06/2020 10:15");
    }

    #[test]
    fn test_numeric_timestamp_is_formatted() {
        let payload = r#"{"username": "a", "body": "hi", "timestamp": 1591265700000}"#;
        let comment: Comment = serde_json::from_str(payload).unwrap();

        assert_eq!(comment.timestamp, Timestamp::EpochMillis(1_591_265_700_000));
        assert_eq!(comment.timestamp.to_string(), "04/06/2020 10:15");
    }

    #[test]
    fn test_fractional_epoch_timestamp_is_accepted() {
        let payload = r#"[{"username": "a", "body": "hi", "timestamp": 1591265700000.0},
                          {"username": "b", "body": "yo", "timestamp": 1591265700000.4}]"#;
        let comments: Vec<Comment> = serde_json::from_str(payload).unwrap();

        assert_eq!(comments[0].timestamp, Timestamp::EpochMillis(1_591_265_700_000));
        assert_eq!(comments[1].timestamp, Timestamp::EpochMillis(1_591_265_700_000));
        assert_eq!(comments[0].timestamp.to_string(), "04/06/2020 10:15");
    }

    #[test]
    fn test_timestamp_wins_over_legacy_field() {
        let payload = r#"{"username": "a", "body": "hi", "zorblax": "old", "timestamp": "new"}"#;
        let comment: Comment = serde_json::from_str(payload).unwrap();
        assert_eq!(comment.timestamp, Timestamp::from("new"));

        let missing = serde_json::from_str::<Comment>(r#"{"username": "a", "body": "hi"}"#);
        assert!(missing.unwrap_err().to_string().contains("timestamp"));
    }

    #[test]
    fn test_form_from_fields_with_legacy_names() {
        let fields = vec![
            ("image-id", "4"),
            ("username", "ada"),
            ("comment", "lovely light"),
        ];
        let form = CommentForm::from_fields(fields, None).unwrap();

        assert_eq!(form, CommentForm::new(4, "ada", "lovely light"));
    }

    #[test]
    fn test_form_falls_back_to_open_image() {
        let fields = vec![("username", "ada"), ("body", "hi")];

        assert_eq!(CommentForm::from_fields(fields.clone(), Some(9)).unwrap().id, 9);
        assert!(CommentForm::from_fields(fields, None).is_none());
    }

    #[test]
    fn test_modal_state_defaults_to_closed() {
        let state = ModalState::default();
        assert!(!state.is_open());
        assert!(state.session().is_none());
    }
}

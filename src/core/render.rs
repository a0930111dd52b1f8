use crate::core::{Comment, CommentView};

pub fn comment_view(comment: &Comment) -> CommentView {
    CommentView {
        header: format!("{} · {}", comment.username, comment.timestamp),
        body: comment.body.clone(),
    }
}

/// 輸出 HTML 時使用，讓留言內容只會顯示成文字
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

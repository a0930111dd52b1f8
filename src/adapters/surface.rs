use crate::core::render::escape_html;
use crate::core::{CommentView, DocumentSurface};
use std::collections::{BTreeSet, HashMap};

/// 原始作品集頁面上的元素 id
pub const PORTFOLIO_ELEMENT_IDS: [&str; 7] = [
    "modal",
    "focus-image",
    "focus-image-caption",
    "focus-image-index",
    "previous-comments",
    "comment-form",
    "navmenu",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    Comment(CommentView),
    Notice(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceElement {
    pub visible: bool,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub text: String,
    pub children: Vec<SurfaceNode>,
    pub classes: BTreeSet<String>,
    pub fields: Vec<(String, String)>,
}

/// 不需要瀏覽器的呈現環境，供 CLI 與測試使用
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<String, SurfaceElement>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 預先放好頁面元素；彈窗一開始是隱藏的
    pub fn portfolio() -> Self {
        let mut surface = Self::new();
        for id in PORTFOLIO_ELEMENT_IDS {
            surface.insert(id, id != "modal");
        }
        surface
    }

    pub fn insert(&mut self, id: &str, visible: bool) {
        self.elements.insert(
            id.to_string(),
            SurfaceElement {
                visible,
                ..SurfaceElement::default()
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> Option<SurfaceElement> {
        self.elements.remove(id)
    }

    pub fn element(&self, id: &str) -> Option<&SurfaceElement> {
        self.elements.get(id)
    }

    /// 模擬使用者填寫表單
    pub fn fill_form<K, V>(&mut self, id: &str, fields: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        if let Some(element) = self.elements.get_mut(id) {
            element.fields = fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect();
        }
    }

    pub fn comments(&self, id: &str) -> Vec<&CommentView> {
        self.children(id)
            .filter_map(|node| match node {
                SurfaceNode::Comment(view) => Some(view),
                SurfaceNode::Notice(_) => None,
            })
            .collect()
    }

    pub fn notices(&self, id: &str) -> Vec<&str> {
        self.children(id)
            .filter_map(|node| match node {
                SurfaceNode::Notice(message) => Some(message.as_str()),
                SurfaceNode::Comment(_) => None,
            })
            .collect()
    }

    pub fn render_text(&self, id: &str) -> String {
        let Some(element) = self.elements.get(id) else {
            return String::new();
        };

        let mut lines = Vec::new();
        if let Some(src) = &element.src {
            lines.push(format!("[{}] {}", src, element.alt.as_deref().unwrap_or("")));
        }
        if !element.text.is_empty() {
            lines.push(element.text.clone());
        }
        for node in &element.children {
            match node {
                SurfaceNode::Comment(view) => {
                    lines.push(view.header.clone());
                    lines.push(format!("  {}", view.body));
                }
                SurfaceNode::Notice(message) => lines.push(format!("! {}", message)),
            }
        }
        lines.join("\n")
    }

    /// 所有文字與屬性都經過跳脫
    pub fn render_html(&self, id: &str) -> String {
        let Some(element) = self.elements.get(id) else {
            return String::new();
        };

        let mut html = format!("<div id=\"{}\"", escape_html(id));
        if !element.classes.is_empty() {
            let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
            html.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
        }
        if !element.visible {
            html.push_str(" style=\"display: none\"");
        }
        html.push('>');

        if let Some(src) = &element.src {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(element.alt.as_deref().unwrap_or(""))
            ));
        }
        html.push_str(&escape_html(&element.text));
        for node in &element.children {
            match node {
                SurfaceNode::Comment(view) => html.push_str(&format!(
                    "<div class=\"comment\"><p class=\"comment-header\">{}</p><p class=\"comment-body\">{}</p></div>",
                    escape_html(&view.header),
                    escape_html(&view.body)
                )),
                SurfaceNode::Notice(message) => html.push_str(&format!(
                    "<p class=\"notice\">{}</p>",
                    escape_html(message)
                )),
            }
        }
        html.push_str("</div>");
        html
    }

    fn children(&self, id: &str) -> impl Iterator<Item = &SurfaceNode> {
        self.elements
            .get(id)
            .into_iter()
            .flat_map(|element| element.children.iter())
    }

    fn with_element(&mut self, handle: &ElementHandle, f: impl FnOnce(&mut SurfaceElement)) {
        match self.elements.get_mut(handle.id()) {
            Some(element) => f(element),
            None => tracing::warn!("⚠️ Element '{}' was removed from the surface", handle.id()),
        }
    }
}

impl DocumentSurface for MemorySurface {
    type Element = ElementHandle;

    fn lookup(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .contains_key(id)
            .then(|| ElementHandle(id.to_string()))
    }

    fn set_visible(&mut self, element: &ElementHandle, visible: bool) {
        self.with_element(element, |el| el.visible = visible);
    }

    fn is_visible(&self, element: &ElementHandle) -> bool {
        self.elements
            .get(element.id())
            .is_some_and(|el| el.visible)
    }

    fn set_image(&mut self, element: &ElementHandle, src: &str, alt: &str) {
        self.with_element(element, |el| {
            el.src = Some(src.to_string());
            el.alt = Some(alt.to_string());
        });
    }

    fn set_text(&mut self, element: &ElementHandle, text: &str) {
        self.with_element(element, |el| el.text = text.to_string());
    }

    fn clear_children(&mut self, element: &ElementHandle) {
        self.with_element(element, |el| el.children.clear());
    }

    fn append_comment(&mut self, element: &ElementHandle, view: &CommentView) {
        self.with_element(element, |el| el.children.push(SurfaceNode::Comment(view.clone())));
    }

    fn append_notice(&mut self, element: &ElementHandle, message: &str) {
        self.with_element(element, |el| {
            el.children.push(SurfaceNode::Notice(message.to_string()))
        });
    }

    fn toggle_class(&mut self, element: &ElementHandle, class: &str) -> bool {
        let mut present = false;
        self.with_element(element, |el| {
            present = if el.classes.remove(class) {
                false
            } else {
                el.classes.insert(class.to_string())
            };
        });
        present
    }

    fn form_fields(&self, form: &ElementHandle) -> Vec<(String, String)> {
        self.elements
            .get(form.id())
            .map(|el| el.fields.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_surface_starts_with_hidden_modal() {
        let surface = MemorySurface::portfolio();
        let modal = surface.lookup("modal").unwrap();
        let menu = surface.lookup("navmenu").unwrap();

        assert!(!surface.is_visible(&modal));
        assert!(surface.is_visible(&menu));
        assert!(surface.lookup("missing").is_none());
    }

    #[test]
    fn test_toggle_class() {
        let mut surface = MemorySurface::portfolio();
        let menu = surface.lookup("navmenu").unwrap();

        assert!(surface.toggle_class(&menu, "visible"));
        assert!(surface.element("navmenu").unwrap().classes.contains("visible"));
        assert!(!surface.toggle_class(&menu, "visible"));
        assert!(surface.element("navmenu").unwrap().classes.is_empty());
    }

    #[test]
    fn test_render_html_escapes_everything() {
        let mut surface = MemorySurface::portfolio();
        let comments = surface.lookup("previous-comments").unwrap();
        surface.append_comment(
            &comments,
            &CommentView {
                header: "<b>eve</b> · now".to_string(),
                body: "<img src=x onerror=alert(1)>".to_string(),
            },
        );

        let html = surface.render_html("previous-comments");
        assert!(html.contains("&lt;b&gt;eve&lt;/b&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_text_lists_comments_and_notices() {
        let mut surface = MemorySurface::portfolio();
        let comments = surface.lookup("previous-comments").unwrap();
        surface.append_comment(
            &comments,
            &CommentView {
                header: "a · t1".to_string(),
                body: "hi".to_string(),
            },
        );
        surface.append_notice(&comments, "offline");

        assert_eq!(surface.render_text("previous-comments"), "a · t1\n  hi\n! offline");
        assert_eq!(surface.notices("previous-comments"), vec!["offline"]);
        assert_eq!(surface.comments("previous-comments").len(), 1);
    }

    #[test]
    fn test_form_fields_round_through_fill_form() {
        let mut surface = MemorySurface::portfolio();
        surface.fill_form("comment-form", [("username", "ada"), ("body", "hi")]);
        let form = surface.lookup("comment-form").unwrap();

        assert_eq!(
            surface.form_fields(&form),
            vec![
                ("username".to_string(), "ada".to_string()),
                ("body".to_string(), "hi".to_string())
            ]
        );
    }
}

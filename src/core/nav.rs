use crate::core::DocumentSurface;
use crate::utils::error::{ModalError, Result};

pub const VISIBLE_CLASS: &str = "visible";

/// 導覽選單的開關，選單元素在綁定時查找一次
#[derive(Debug, Clone)]
pub struct NavToggle<E> {
    menu: E,
}

impl<E: Clone> NavToggle<E> {
    pub fn bind<D>(surface: &D, menu_id: &str) -> Result<Self>
    where
        D: DocumentSurface<Element = E>,
    {
        let menu = surface
            .lookup(menu_id)
            .ok_or_else(|| ModalError::MissingElement {
                id: menu_id.to_string(),
            })?;
        Ok(Self { menu })
    }

    /// 回傳切換後選單是否可見
    pub fn toggle<D>(&self, surface: &mut D) -> bool
    where
        D: DocumentSurface<Element = E>,
    {
        let visible = surface.toggle_class(&self.menu, VISIBLE_CLASS);
        tracing::debug!("Navigation menu visible: {}", visible);
        visible
    }
}

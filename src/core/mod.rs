pub mod modal;
pub mod nav;
pub mod render;

pub use crate::domain::model::{Comment, CommentForm, ImageRef, ModalSession, ModalState, Timestamp};
pub use crate::domain::ports::{CommentService, CommentView, ConfigProvider, DocumentSurface};
pub use crate::utils::error::Result;

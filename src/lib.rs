pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command, CommandOutcome};

pub use crate::adapters::{HttpCommentService, MemorySurface};
pub use crate::config::GalleryConfig;
pub use crate::core::modal::{ElementIds, LoadOutcome, ModalController, ModalSettings, SubmitOutcome};
pub use crate::core::nav::NavToggle;
pub use crate::domain::model::{Comment, CommentForm, ImageRef, ModalSession, ModalState, Timestamp};
pub use crate::domain::ports::{CommentService, CommentView, ConfigProvider, DocumentSurface};
pub use crate::utils::error::{ModalError, Result};

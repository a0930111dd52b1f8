// Adapters layer: concrete collaborators for the modal controller (comment service over HTTP,
// headless document surface).

pub mod http;
pub mod surface;

pub use http::HttpCommentService;
pub use surface::{ElementHandle, MemorySurface, SurfaceElement, SurfaceNode};

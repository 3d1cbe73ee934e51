//! View transforms: layout and summary data in, [`RenderCommand`] lists out.
//!
//! [`RenderCommand`]: daylens_protocol::RenderCommand

pub mod summary;
pub mod time_axis;
pub mod timeline;

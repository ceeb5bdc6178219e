//! Display surface contract consumed by the breadcrumb renderer.
//!
//! The core never paints pixels itself. It hands a finished string to a
//! [`TextSurface`], which is owned by the host (an LCD panel, a terminal,
//! or an in-memory buffer in tests). Only two capabilities are required:
//! switching the content mode and replacing or appending text.

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Shared handle to a host-owned surface.
///
/// The renderer keeps only a weak reference to the default surface, so the
/// host stays the sole owner and may drop the surface at any time.
pub type SurfaceHandle = Rc<RefCell<dyn TextSurface>>;

/// What kind of content a surface is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    None,
    /// Plain text, optionally with a background image.
    TextAndImage,
}

/// Failures reported by a surface while accepting a write.
///
/// The renderer passes these through untouched; retrying or recovering is
/// the host's business.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface is unavailable")]
    Unavailable,
    #[error("surface rejected the write: {0}")]
    Rejected(String),
}

/// Narrow text-output interface of a display surface.
pub trait TextSurface {
    /// Switches what the surface displays.
    fn set_content_type(&mut self, content_type: ContentType);

    /// Writes `text` to the surface, replacing the current contents unless
    /// `append` is set.
    fn write_text(&mut self, text: &str, append: bool) -> Result<(), SurfaceError>;
}

/// In-memory surface that keeps whatever was last written to it.
///
/// The text buffer is reused across writes, so a long-lived `TextBuffer`
/// stops allocating once it has seen its longest write.
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    content_type: ContentType,
    text: String,
    writes: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with `capacity` bytes reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        TextBuffer {
            content_type: ContentType::None,
            text: String::with_capacity(capacity),
            writes: 0,
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of successful `write_text` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TextSurface for TextBuffer {
    fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    fn write_text(&mut self, text: &str, append: bool) -> Result<(), SurfaceError> {
        if !append {
            self.text.clear();
        }
        self.text.push_str(text);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_unless_appending() {
        let mut buffer = TextBuffer::new();

        buffer.write_text("Root", false).unwrap();
        buffer.write_text(" › A", true).unwrap();
        assert_eq!(buffer.text(), "Root › A");

        buffer.write_text("Root", false).unwrap();
        assert_eq!(buffer.text(), "Root");
        assert_eq!(buffer.writes(), 3);
    }

    #[test]
    fn test_content_type_defaults_to_none() {
        let mut buffer = TextBuffer::with_capacity(16);
        assert_eq!(buffer.content_type(), ContentType::None);

        buffer.set_content_type(ContentType::TextAndImage);
        assert_eq!(buffer.content_type(), ContentType::TextAndImage);
    }
}

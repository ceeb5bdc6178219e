use super::stack::{NavigationStack, ROOT_TITLE};
use crate::settings::{
    BreadcrumbSettings, DEFAULT_BREADCRUMB_BUFFER_CAPACITY, DEFAULT_BREADCRUMB_MAX_CHARS,
};
use crate::surface::{ContentType, SurfaceError, SurfaceHandle, TextSurface};
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::{Rc, Weak};

pub const BREADCRUMB_SEPARATOR: char = '›';

const SEGMENT_SEPARATOR: &str = " › ";

/// Whether a render call reached a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Written,
    /// Neither an explicit nor a live default target was available.
    NoTarget,
}

/// Turns a [`NavigationStack`] into a single `Root › A › B` line.
///
/// The renderer owns one string buffer, reserved up front and rebuilt in
/// place on every call, so rendering each tick does not allocate once the
/// buffer has reached its working size.
///
/// # Truncation
///
/// Segments are appended whole. After each one the length is compared with
/// `max_chars` and iteration stops as soon as it is exceeded, so the result
/// can overshoot the limit by at most one segment. No ellipsis is added.
///
/// # Targets
///
/// A default surface can be attached with [`set_default_target`]. It is
/// held weakly: once the host drops the surface, renders without an explicit
/// target become no-ops.
///
/// [`set_default_target`]: BreadcrumbRenderer::set_default_target
#[derive(Debug)]
pub struct BreadcrumbRenderer {
    buffer: String,
    max_chars: usize,
    default_target: Option<Weak<RefCell<dyn TextSurface>>>,
}

impl BreadcrumbRenderer {
    pub fn new(max_chars: usize) -> Self {
        Self::with_buffer_capacity(max_chars, DEFAULT_BREADCRUMB_BUFFER_CAPACITY)
    }

    pub fn with_buffer_capacity(max_chars: usize, buffer_capacity: usize) -> Self {
        BreadcrumbRenderer {
            buffer: String::with_capacity(buffer_capacity),
            max_chars,
            default_target: None,
        }
    }

    pub fn from_settings(settings: &BreadcrumbSettings) -> Self {
        Self::with_buffer_capacity(settings.max_chars, settings.buffer_capacity)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Replaces the default surface. `None` detaches it.
    pub fn set_default_target(&mut self, target: Option<&SurfaceHandle>) {
        self.default_target = target.map(Rc::downgrade);
    }

    /// Returns `true` if a default surface is attached and still alive.
    pub fn has_default_target(&self) -> bool {
        self.default_target
            .as_ref()
            .is_some_and(|target| target.strong_count() > 0)
    }

    /// The breadcrumb produced by the last successful build.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Rebuilds the breadcrumb for `stack` and returns it.
    pub fn build(&mut self, stack: &NavigationStack) -> &str {
        self.buffer.clear();
        self.buffer.push_str(ROOT_TITLE);

        let mut chars = ROOT_TITLE.chars().count();
        for entry in stack.entries() {
            let start = self.buffer.len();
            self.buffer.push_str(SEGMENT_SEPARATOR);
            match entry.title() {
                Some(title) if !title.is_empty() => self.buffer.push_str(title),
                _ => {
                    let _ = write!(self.buffer, "#{}", entry.id());
                }
            }

            chars += self.buffer[start..].chars().count();
            if chars > self.max_chars {
                tracing::trace!(chars, max_chars = self.max_chars, "breadcrumb truncated");
                break;
            }
        }

        &self.buffer
    }

    /// Renders the breadcrumb for `stack` onto `target`, or onto the default
    /// surface when `target` is `None`.
    ///
    /// Without any usable surface nothing is built or written. Errors from
    /// the surface itself are returned as is.
    pub fn render(
        &mut self,
        stack: &NavigationStack,
        target: Option<&mut dyn TextSurface>,
    ) -> Result<RenderOutcome, SurfaceError> {
        if let Some(surface) = target {
            return self.paint(stack, surface);
        }

        let Some(handle) = self.default_target.as_ref().and_then(Weak::upgrade) else {
            tracing::trace!("no breadcrumb target, render skipped");
            return Ok(RenderOutcome::NoTarget);
        };

        let Ok(mut surface) = handle.try_borrow_mut() else {
            tracing::warn!("default breadcrumb target is already borrowed, render skipped");
            return Ok(RenderOutcome::NoTarget);
        };

        self.paint(stack, &mut *surface)
    }

    fn paint(
        &mut self,
        stack: &NavigationStack,
        surface: &mut dyn TextSurface,
    ) -> Result<RenderOutcome, SurfaceError> {
        let text = self.build(stack);
        surface.set_content_type(ContentType::TextAndImage);
        surface.write_text(text, false)?;

        Ok(RenderOutcome::Written)
    }
}

impl Default for BreadcrumbRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BREADCRUMB_MAX_CHARS)
    }
}

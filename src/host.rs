//! The automation surface of the host presentation application.
//!
//! Only the handful of calls the build needs are modelled. Implementations talk to the real
//! application (e.g. through COM on Windows); the build itself only ever sees these traits.

use std::fmt::Display;
use std::path::Path;

/// A failure reported by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The host application reported an error: {}", self.0)
    }
}

pub type HostResult<T> = Result<T, HostError>;

pub trait HostApplication {
    type Presentation: Presentation;

    /// Version string as the host reports it, e.g. `16.0`
    fn version(&self) -> HostResult<String>;

    /// A new, blank presentation that is not shown in a window
    fn create_presentation(&mut self) -> HostResult<Self::Presentation>;

    fn quit(&mut self) -> HostResult<()>;
}

pub trait Presentation {
    /// Add a slide at `index` (1 based) using the custom layout at `layout` (1 based)
    fn add_slide(&mut self, index: u32, layout: u32) -> HostResult<()>;

    /// Import a module file into the VBA project
    fn import_component(&mut self, path: &Path) -> HostResult<()>;

    /// Add a reference to a type library by file path
    fn add_reference(&mut self, path: &str) -> HostResult<()>;

    /// Save as a macro-enabled presentation
    fn save_as(&mut self, path: &Path) -> HostResult<()>;

    fn close(&mut self) -> HostResult<()>;
}

/// One live host application with the presentation being built.
///
/// Owns the application for the duration of a build. The presentation is closed and the
/// application quit when the session ends, whether through [`BuildSession::finish`] or by
/// being dropped part way through a failed build.
pub struct BuildSession<H: HostApplication> {
    host: H,
    presentation: Option<H::Presentation>,
}

impl<H: HostApplication> BuildSession<H> {
    /// Create a blank presentation holding a single slide. PowerPoint refuses to save a
    /// presentation without any slides.
    pub fn open(mut host: H) -> HostResult<Self> {
        let presentation = match host.create_presentation() {
            Ok(p) => p,
            Err(e) => {
                if let Err(quit) = host.quit() {
                    tracing::warn!("{quit}");
                }
                return Err(e);
            }
        };
        let mut session = Self {
            host,
            presentation: Some(presentation),
        };
        session.presentation()?.add_slide(1, 1)?;
        Ok(session)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn presentation(&mut self) -> HostResult<&mut H::Presentation> {
        self.presentation
            .as_mut()
            .ok_or_else(|| HostError::new("the presentation has already been closed"))
    }

    /// Save the presentation, then close it and quit the host
    pub fn finish(mut self, output: &Path) -> HostResult<()> {
        self.presentation()?.save_as(output)?;
        let closed = match self.presentation.take() {
            Some(mut p) => p.close(),
            None => Ok(()),
        };
        let quit = self.host.quit();
        closed.and(quit)
    }
}

impl<H: HostApplication> Drop for BuildSession<H> {
    fn drop(&mut self) {
        if let Some(mut p) = self.presentation.take() {
            if let Err(e) = p.close() {
                tracing::warn!("{e}");
            }
            if let Err(e) = self.host.quit() {
                tracing::warn!("{e}");
            }
        }
    }
}

use std::fmt;

/// Name of one drawable object on a canvas.
///
/// Handles are unique for the lifetime of the process: the workspace never
/// hands out the same generated name twice, even after the object is destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableHandle(String);

impl DrawableHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrawableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrawableHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of one window (drawing context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

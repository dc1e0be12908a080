//! View lifetime.
//!
//! Requests are never cancelled. A view that closes while a request is in
//! flight flips its lifetime token instead, and the controller drops the
//! response once it arrives.

use tokio_util::sync::CancellationToken;

/// Whether the view that started a request is still on screen.
#[derive(Debug, Clone, Default)]
pub struct ViewLifetime {
    token: CancellationToken,
}

impl ViewLifetime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The view left the screen.
    pub fn close(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Pass `value` through only while the view is open.
    pub fn keep<T>(&self, value: T) -> Option<T> {
        if self.is_open() {
            return Some(value);
        }

        tracing::debug!("view closed, dropping late response");

        None
    }

    /// Lifetime of a child view that closes with its parent.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_responses_are_dropped_after_close() {
        let lifetime = ViewLifetime::new();

        assert_eq!(lifetime.keep(1), Some(1));

        lifetime.close();

        assert!(!lifetime.is_open());
        assert_eq!(lifetime.keep(2), None);
    }

    #[test]
    fn closing_a_parent_closes_its_children() {
        let parent = ViewLifetime::new();
        let child = parent.child();

        child.close();
        assert!(parent.is_open());

        parent.child().close();
        parent.close();
        assert!(!parent.child().is_open());
    }
}

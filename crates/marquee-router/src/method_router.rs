//! Per-path method routing.

use http::Method;

/// Maps HTTP methods to operation ids for a single route path.
///
/// # Example
///
/// ```rust
/// use marquee_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new().get("listComments").post("upsertComment");
/// assert_eq!(methods.route(&Method::GET), Some("listComments"));
/// assert_eq!(methods.route(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodRouter {
    get: Option<String>,
    post: Option<String>,
    patch: Option<String>,
    delete: Option<String>,
}

impl MethodRouter {
    /// Creates an empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET operation.
    #[must_use]
    pub fn get(mut self, operation_id: impl Into<String>) -> Self {
        self.get = Some(operation_id.into());
        self
    }

    /// Registers a POST operation.
    #[must_use]
    pub fn post(mut self, operation_id: impl Into<String>) -> Self {
        self.post = Some(operation_id.into());
        self
    }

    /// Registers a PATCH operation.
    #[must_use]
    pub fn patch(mut self, operation_id: impl Into<String>) -> Self {
        self.patch = Some(operation_id.into());
        self
    }

    /// Registers a DELETE operation.
    #[must_use]
    pub fn delete(mut self, operation_id: impl Into<String>) -> Self {
        self.delete = Some(operation_id.into());
        self
    }

    /// Returns the operation id registered for a method, if any.
    #[must_use]
    pub fn route(&self, method: &Method) -> Option<&str> {
        let slot = match *method {
            Method::GET => &self.get,
            Method::POST => &self.post,
            Method::PATCH => &self.patch,
            Method::DELETE => &self.delete,
            _ => return None,
        };
        slot.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_methods() {
        let router = MethodRouter::new()
            .get("g")
            .post("p")
            .patch("u")
            .delete("d");

        assert_eq!(router.route(&Method::GET), Some("g"));
        assert_eq!(router.route(&Method::POST), Some("p"));
        assert_eq!(router.route(&Method::PATCH), Some("u"));
        assert_eq!(router.route(&Method::DELETE), Some("d"));
    }

    #[test]
    fn test_unregistered_method() {
        let router = MethodRouter::new().get("g");
        assert_eq!(router.route(&Method::POST), None);
        assert_eq!(router.route(&Method::HEAD), None);
    }
}

//! Compatibility shim for the legacy documentation API.
//!
//! The legacy API exposed documentation as a bare `Comment` value per
//! element. These accessors keep that surface alive on top of the
//! registry; like everything here they never fail.

use crate::{DocRegistry, MethodRef};
use kdoc_model::Comment;

impl DocRegistry {
    /// Class-level comment in the legacy API's shape.
    pub fn comment_of(&self, qualified_name: &str) -> Comment {
        self.class_doc(qualified_name).comment.clone()
    }

    /// Method-level comment in the legacy API's shape. The legacy API
    /// carried only the free text; tag sections are not folded in.
    pub fn method_comment_of(&self, method: &MethodRef) -> Comment {
        Comment::from_text(self.method_doc(method).comment)
    }
}

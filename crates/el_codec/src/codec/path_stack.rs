use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::{Debug, Formatter};

use crate::error::CodecError;

std::thread_local! {
    static NODE_PATH: RefCell<NodePath> = const { RefCell::new(NodePath::new()) };
}

/// Names of the nodes currently being saved or loaded, outermost first.
///
/// When a call fails, the path at the point of failure is kept until the
/// outermost call returns and logs it.
struct NodePath {
    stack: Vec<String>,
    failed_at: Option<String>,
}

impl NodePath {
    const fn new() -> Self {
        Self {
            stack: Vec::new(),
            failed_at: None,
        }
    }

    fn render(&self) -> String {
        self.stack.join("/")
    }
}

impl Debug for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Runs `f` with `segment` pushed onto the node path.
pub(super) fn scoped<R>(segment: &str, f: impl FnOnce() -> Result<R, CodecError>) -> Result<R, CodecError> {
    NODE_PATH.with_borrow_mut(|path| path.stack.push(segment.into()));
    let result = f();
    NODE_PATH.with_borrow_mut(|path| {
        if result.is_err() && path.failed_at.is_none() {
            path.failed_at = Some(path.render());
        }
        path.stack.pop();
        if path.stack.is_empty()
            && let Some(failed_at) = path.failed_at.take()
            && let Err(err) = &result
        {
            log::debug!("{err} (node path: {failed_at})");
        }
    });
    result
}

#[cfg(test)]
mod tests {
    use super::{NODE_PATH, scoped};
    use crate::error::CodecError;

    #[test]
    fn failure_path_is_kept_until_the_outermost_call() {
        let result: Result<(), CodecError> = scoped("Root", || {
            let inner: Result<(), CodecError> = scoped("Child", || Err(CodecError::custom("broken")));
            NODE_PATH.with_borrow(|path| {
                assert_eq!(path.failed_at.as_deref(), Some("Root/Child"));
            });
            inner
        });
        assert!(result.is_err());
        NODE_PATH.with_borrow(|path| {
            assert!(path.stack.is_empty());
            assert!(path.failed_at.is_none());
        });
    }
}

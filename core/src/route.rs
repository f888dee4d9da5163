//! Path resolution over a command tree.
//!
//! Routing is greedy longest-prefix matching on exact child names: walk the
//! tokens from the start, descend while a child with that name exists, stop
//! at the first miss. It never backtracks.

use std::sync::Arc;

use crate::command::Command;

/// Raw process tokens split at the first flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitArgs<'a> {
    /// Tokens before the first flag; candidates for routing.
    pub router: &'a [String],
    /// Everything from the first flag on.
    pub rest: &'a [String],
}

/// Splits `args` before the first token that starts with `-`.
///
/// # Examples
///
/// ```
/// use command_tree_core::split_args;
///
/// let args: Vec<String> = ["hello", "world", "-a", "--xyz=1"].map(String::from).to_vec();
/// let split = split_args(&args);
/// assert_eq!(split.router, ["hello", "world"]);
/// assert_eq!(split.rest, ["-a", "--xyz=1"]);
/// ```
pub fn split_args(args: &[String]) -> SplitArgs<'_> {
    let end = args
        .iter()
        .position(|arg| is_flag(arg))
        .unwrap_or(args.len());
    let (router, rest) = args.split_at(end);
    SplitArgs { router, rest }
}

fn is_flag(arg: &str) -> bool {
    arg.starts_with('-')
}

impl Command {
    /// Finds the deepest command matching a prefix of `router`.
    ///
    /// Returns the command and the number of tokens consumed. The walk starts
    /// at `self`, which is returned with `0` when the first token misses.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Command;
    ///
    /// let root = Command::builder("app").build();
    /// let a = root.register(Command::builder("a").build()).unwrap();
    /// a.register(Command::builder("b").build()).unwrap();
    ///
    /// let (node, consumed) = root.sub_route(&["a", "b", "c"]);
    /// assert_eq!(node.name(), "b");
    /// assert_eq!(consumed, 2);
    /// ```
    pub fn sub_route<S: AsRef<str>>(self: &Arc<Self>, router: &[S]) -> (Arc<Command>, usize) {
        let mut current = Arc::clone(self);
        for (i, name) in router.iter().enumerate() {
            match current.find_child(name.as_ref()) {
                Some(child) => current = child,
                None => return (current, i),
            }
        }
        (current, router.len())
    }

    /// Finds the command matching all of `router`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Command;
    ///
    /// let root = Command::builder("app").build();
    /// let a = root.register(Command::builder("a").build()).unwrap();
    /// a.register(Command::builder("b").build()).unwrap();
    ///
    /// assert!(root.route(&["a", "b"]).is_some());
    /// assert!(root.route(&["a", "b", "c"]).is_none());
    /// ```
    pub fn route<S: AsRef<str>>(self: &Arc<Self>, router: &[S]) -> Option<Arc<Command>> {
        let (command, consumed) = self.sub_route(router);
        (consumed == router.len()).then_some(command)
    }

    /// Returns `true` if `method` passes this command's method gate.
    ///
    /// Commands without allowed methods accept every method.
    pub fn allows_method(&self, method: &str) -> bool {
        self.methods().is_empty() || self.methods().iter().any(|m| m == method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Arc<Command> {
        let root = Command::builder("app").build();
        let a = root.register(Command::builder("a").build()).unwrap();
        a.register(Command::builder("b").build()).unwrap();
        root.register(Command::builder("c").build()).unwrap();
        root
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sub_route_stops_at_first_miss() {
        let root = sample();
        let (node, consumed) = root.sub_route(&["a", "b", "c"]);
        assert_eq!(node.name(), "b");
        assert_eq!(consumed, 2);

        let (node, consumed) = root.sub_route(&["a", "c"]);
        assert_eq!(node.name(), "a");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_sub_route_miss_at_root() {
        let root = sample();
        let (node, consumed) = root.sub_route(&["zzz", "a"]);
        assert!(Arc::ptr_eq(&node, &root));
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_sub_route_empty_router() {
        let root = sample();
        let (node, consumed) = root.sub_route::<&str>(&[]);
        assert!(Arc::ptr_eq(&node, &root));
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_route_requires_full_match() {
        let root = sample();
        assert_eq!(root.route(&["a", "b"]).unwrap().name(), "b");
        assert!(root.route(&["a", "b", "c"]).is_none());
        assert!(root.route(&["b"]).is_none());
    }

    #[test]
    fn test_route_matches_exact_names_only() {
        let root = sample();
        assert!(root.route(&["A"]).is_none());
        assert!(root.route(&["a "]).is_none());
    }

    #[test]
    fn test_split_args_at_first_flag() {
        let args = strings(&["hello", "world", "-a", "--xyz=1", "tail"]);
        let split = split_args(&args);
        assert_eq!(split.router, strings(&["hello", "world"]).as_slice());
        assert_eq!(split.rest, strings(&["-a", "--xyz=1", "tail"]).as_slice());
    }

    #[test]
    fn test_split_args_without_flags() {
        let args = strings(&["hello", "world"]);
        let split = split_args(&args);
        assert_eq!(split.router.len(), 2);
        assert!(split.rest.is_empty());

        let args = strings(&["--help"]);
        let split = split_args(&args);
        assert!(split.router.is_empty());
        assert_eq!(split.rest.len(), 1);
    }

    #[test]
    fn test_allows_method() {
        let open = Command::builder("open").build();
        assert!(open.allows_method("DELETE"));

        let gated = Command::builder("gated").methods(["GET", "POST"]).build();
        assert!(gated.allows_method("GET"));
        assert!(!gated.allows_method("DELETE"));
        assert!(!gated.allows_method("get"));
    }
}

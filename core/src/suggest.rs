//! Near-miss suggestions for paths that failed to route.
//!
//! Every command path of the tree is scored against the requested path with
//! an optimal-string-alignment edit distance (insertion, deletion,
//! substitution and adjacent transposition each cost 1). Candidates within
//! half of the longer string's length are kept, closest first; ties keep the
//! breadth-first order in which the paths were discovered.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::command::Command;
use crate::style::Style;

/// Edit distance between `a` and `b`, counted in characters.
///
/// # Examples
///
/// ```
/// use command_tree_core::edit_distance;
///
/// assert_eq!(edit_distance("status", "status"), 0);
/// assert_eq!(edit_distance("stauts", "status"), 1);
/// assert_eq!(edit_distance("", "add"), 3);
/// ```
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let n = b.len();

    if a.is_empty() {
        return n;
    }
    if n == 0 {
        return a.len();
    }

    // Three rolling rows: two back (for transpositions), previous, current.
    let mut before: Vec<usize> = vec![0; n + 1];
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for i in 0..a.len() {
        curr[0] = i + 1;
        for j in 0..n {
            let cost = usize::from(a[i] != b[j]);
            let mut best = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
            if i > 0 && j > 0 && a[i] == b[j - 1] && a[i - 1] == b[j] {
                best = best.min(before[j - 1] + 1);
            }
            curr[j + 1] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Scores `candidate` against `target`; `None` when they are too far apart.
///
/// A candidate is accepted when twice its distance does not exceed the longer
/// of the two lengths, so a distance of exactly half is still accepted (a
/// one-letter typo in a two-letter name is suggested). An empty target never
/// matches.
pub fn score(target: &str, candidate: &str) -> Option<usize> {
    let longest = target.chars().count().max(candidate.chars().count());
    if target.is_empty() || longest == 0 {
        return None;
    }
    let distance = edit_distance(target, candidate);
    (distance * 2 <= longest).then_some(distance)
}

/// Ranks `candidates` against `target`, closest first.
///
/// Rejected candidates are dropped. Equal distances keep their input order.
///
/// # Examples
///
/// ```
/// use command_tree_core::rank;
///
/// let ranked = rank("stauts", ["commit", "stautsabcd", "status"]);
/// assert_eq!(ranked, vec!["status", "stautsabcd"]);
/// ```
pub fn rank<I, S>(target: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut scored: Vec<(usize, String)> = candidates
        .into_iter()
        .map(Into::into)
        .filter_map(|candidate| score(target, &candidate).map(|d| (d, candidate)))
        .collect();
    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Renders suggestions for an error message.
///
/// One suggestion reads `Did you mean X?`; several are listed one per line;
/// none renders as the empty string.
pub fn render_suggestions(suggestions: &[String], style: Style) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!("\nDid you mean {}?", style.bold(only)),
        many => {
            let mut out = String::from("\n\nDid you mean one of these?\n");
            for suggestion in many {
                out.push_str("    - ");
                out.push_str(suggestion);
                out.push('\n');
            }
            out
        }
    }
}

impl Command {
    /// Paths of every command below the root, breadth-first, root's direct
    /// children first.
    pub fn all_paths(self: &Arc<Self>) -> Vec<String> {
        let mut paths = Vec::new();
        let mut queue: VecDeque<Arc<Command>> = VecDeque::from([self.root()]);
        while let Some(node) = queue.pop_front() {
            for child in node.children() {
                paths.push(child.path());
                queue.push_back(child);
            }
        }
        paths
    }

    /// Commands of this tree whose path is close to `path`, closest first.
    ///
    /// Always searches from the root, whatever node it is called on.
    pub fn suggestions(self: &Arc<Self>, path: &str) -> Vec<String> {
        rank(path, self.all_paths())
    }
}

use std::collections::HashMap;

/// Topic trie for action-type pattern matching.
///
/// Levels are separated by `/`. Two wildcards are understood:
/// - `+` matches exactly one level
/// - `#` matches every remaining level, including none (last segment only)
///
/// The trie holds no lock of its own; the owner decides how it is shared.
///
/// ```ignore
/// let mut trie = Trie::new();
/// trie.insert("conversations/addMessage", 1);
/// trie.insert("conversations/+/rejected", 2);
/// trie.insert("conversations/#", 3);
///
/// trie.matches("conversations/fetchConversation/rejected"); // [&2, &3]
/// ```
pub struct Trie<T> {
    root: Node<T>,
}

struct Node<T> {
    children: HashMap<String, Node<T>>,
    one: Option<Box<Node<T>>>,
    rest: Vec<T>,
    here: Vec<T>,
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            children: HashMap::new(),
            one: None,
            rest: Vec::new(),
            here: Vec::new(),
        }
    }

    fn walk<'a>(&'a self, levels: &[&str], out: &mut Vec<&'a T>) {
        match levels.split_first() {
            None => out.extend(self.here.iter()),
            Some((level, tail)) => {
                if let Some(child) = self.children.get(*level) {
                    child.walk(tail, out);
                }
                if let Some(one) = &self.one {
                    one.walk(tail, out);
                }
            }
        }
        out.extend(self.rest.iter());
    }

    fn slot_mut(&mut self, levels: &[&str]) -> Option<&mut Vec<T>> {
        match levels.split_first() {
            None => Some(&mut self.here),
            Some((&"#", _)) => Some(&mut self.rest),
            Some((&"+", tail)) => self.one.as_deref_mut()?.slot_mut(tail),
            Some((level, tail)) => self.children.get_mut(*level)?.slot_mut(tail),
        }
    }

    fn slot(&self, levels: &[&str]) -> Option<&Vec<T>> {
        match levels.split_first() {
            None => Some(&self.here),
            Some((&"#", _)) => Some(&self.rest),
            Some((&"+", tail)) => self.one.as_deref()?.slot(tail),
            Some((level, tail)) => self.children.get(*level)?.slot(tail),
        }
    }

    fn count(&self) -> usize {
        self.here.len()
            + self.rest.len()
            + self.one.as_ref().map_or(0, |n| n.count())
            + self.children.values().map(Node::count).sum::<usize>()
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self { root: Node::empty() }
    }

    /// Store `value` under `pattern`. Segments after a `#` are ignored.
    pub fn insert(&mut self, pattern: &str, value: T) {
        let mut node = &mut self.root;
        for level in levels(pattern) {
            match level {
                "#" => {
                    node.rest.push(value);
                    return;
                }
                "+" => node = &mut **node.one.get_or_insert_with(|| Box::new(Node::empty())),
                exact => {
                    node = node
                        .children
                        .entry(exact.to_string())
                        .or_insert_with(Node::empty)
                }
            }
        }
        node.here.push(value);
    }

    /// All values whose pattern matches the concrete `topic`.
    ///
    /// The walk is depth-first. At each level the exact child subtree is
    /// visited before the `+` subtree, and values under `#` at that level
    /// come last. So `a/#` is returned before `+/b` for topic `a/b`.
    pub fn matches(&self, topic: &str) -> Vec<&T> {
        let levels: Vec<&str> = levels(topic).collect();
        let mut out = Vec::new();
        self.root.walk(&levels, &mut out);
        out
    }

    /// Drop the values stored under exactly `pattern` that satisfy `predicate`.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove<F>(&mut self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let levels: Vec<&str> = levels(pattern).collect();
        match self.root.slot_mut(&levels) {
            Some(values) => {
                let before = values.len();
                values.retain(|v| !predicate(v));
                values.len() < before
            }
            None => false,
        }
    }

    /// Whether any value is stored under exactly `pattern` (no matching).
    pub fn has_pattern(&self, pattern: &str) -> bool {
        let levels: Vec<&str> = levels(pattern).collect();
        self.root.slot(&levels).is_some_and(|v| !v.is_empty())
    }

    /// Total number of stored values.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn levels(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|level| !level.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(trie: &Trie<u32>, topic: &str) -> Vec<u32> {
        trie.matches(topic).into_iter().copied().collect()
    }

    // ========================================================================
    // Exact
    // ========================================================================

    #[test]
    fn exact_pattern_matches_only_itself() {
        let mut trie = Trie::new();
        trie.insert("conversations/addMessage", 1);
        trie.insert("conversations/addConversation", 2);

        assert_eq!(matched(&trie, "conversations/addMessage"), vec![1]);
        assert_eq!(matched(&trie, "conversations/addConversation"), vec![2]);
        assert!(matched(&trie, "conversations").is_empty());
        assert!(matched(&trie, "conversations/addMessage/extra").is_empty());
    }

    #[test]
    fn several_values_under_one_pattern_keep_insert_order() {
        let mut trie = Trie::new();
        trie.insert("conversations/clearConversation", 1);
        trie.insert("conversations/clearConversation", 2);

        assert_eq!(matched(&trie, "conversations/clearConversation"), vec![1, 2]);
    }

    // ========================================================================
    // Wildcards
    // ========================================================================

    #[test]
    fn single_level_wildcard() {
        let mut trie = Trie::new();
        trie.insert("conversations/+/rejected", 1);

        assert_eq!(matched(&trie, "conversations/fetchConversations/rejected"), vec![1]);
        assert_eq!(matched(&trie, "conversations/togglePriority/rejected"), vec![1]);
        assert!(matched(&trie, "conversations/togglePriority/fulfilled").is_empty());
        assert!(matched(&trie, "conversations/rejected").is_empty());
    }

    #[test]
    fn multi_level_wildcard_matches_zero_or_more_levels() {
        let mut trie = Trie::new();
        trie.insert("conversations/#", 1);

        assert_eq!(matched(&trie, "conversations"), vec![1]);
        assert_eq!(matched(&trie, "conversations/addMessage"), vec![1]);
        assert_eq!(matched(&trie, "conversations/fetchConversation/pending"), vec![1]);
        assert!(matched(&trie, "contacts/presence").is_empty());
    }

    #[test]
    fn root_wildcard_matches_everything() {
        let mut trie = Trie::new();
        trie.insert("#", 9);

        assert_eq!(matched(&trie, "a"), vec![9]);
        assert_eq!(matched(&trie, "a/b/c"), vec![9]);
    }

    #[test]
    fn specific_patterns_come_first() {
        let mut trie = Trie::new();
        trie.insert("#", 4);
        trie.insert("conversations/#", 3);
        trie.insert("conversations/+", 2);
        trie.insert("conversations/setSortFilter", 1);

        assert_eq!(matched(&trie, "conversations/setSortFilter"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn exact_subtree_is_walked_before_wildcard_level() {
        let mut trie = Trie::new();
        trie.insert("+/b", 2);
        trie.insert("a/#", 1);

        assert_eq!(matched(&trie, "a/b"), vec![1, 2]);
    }

    #[test]
    fn segments_after_hash_are_ignored() {
        let mut trie = Trie::new();
        trie.insert("conversations/#/ignored", 1);

        assert_eq!(matched(&trie, "conversations/anything/else"), vec![1]);
    }

    // ========================================================================
    // Remove / has_pattern
    // ========================================================================

    #[test]
    fn remove_by_predicate() {
        let mut trie = Trie::new();
        trie.insert("conversations/+", 1);
        trie.insert("conversations/+", 2);

        assert!(trie.remove("conversations/+", |v| *v == 1));
        assert_eq!(matched(&trie, "conversations/x"), vec![2]);
        assert!(!trie.remove("conversations/+", |v| *v == 1));
    }

    #[test]
    fn remove_unknown_pattern_is_false() {
        let mut trie: Trie<u32> = Trie::new();
        assert!(!trie.remove("no/such/pattern", |_| true));
        assert!(!trie.remove("#", |_| true));
    }

    #[test]
    fn remove_hash_pattern() {
        let mut trie = Trie::new();
        trie.insert("conversations/#", 1);
        assert!(trie.remove("conversations/#", |_| true));
        assert!(trie.is_empty());
    }

    #[test]
    fn has_pattern_is_exact() {
        let mut trie = Trie::new();
        trie.insert("conversations/+", 1);
        trie.insert("#", 2);

        assert!(trie.has_pattern("conversations/+"));
        assert!(trie.has_pattern("#"));
        assert!(!trie.has_pattern("conversations/addMessage"));
        assert!(!trie.has_pattern("conversations"));
    }

    #[test]
    fn len_counts_every_value() {
        let mut trie = Trie::new();
        assert!(trie.is_empty());
        trie.insert("a", 1);
        trie.insert("a/+", 2);
        trie.insert("a/#", 3);
        trie.insert("b/c", 4);
        assert_eq!(trie.len(), 4);
    }
}

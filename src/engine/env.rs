use std::collections::BTreeMap;

/// Key under which the status of the last completed pipeline is kept.
pub const LAST_STATUS_KEY: &str = "?";

/// Shell variables, including the last exit status.
///
/// Keys are kept sorted so that listings and the environment handed to
/// children come out in a stable order.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// An empty store holding only `? = 0`.
    pub fn new() -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(LAST_STATUS_KEY.to_string(), "0".to_string());
        Environment { vars }
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    /// Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.vars.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn set_last_status(&mut self, status: i32) {
        self.insert(LAST_STATUS_KEY, &status.to_string());
    }

    /// `KEY=VALUE` pairs for a child's environment: every variable except
    /// the reserved status key, plus the inherited `PATH` when the store
    /// does not define one.
    pub fn child_environment(&self) -> Vec<String> {
        let mut pairs: Vec<String> = self
            .vars
            .iter()
            .filter(|(k, _)| k.as_str() != LAST_STATUS_KEY)
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        if !self.vars.contains_key("PATH") {
            if let Ok(path) = std::env::var("PATH") {
                pairs.push(format!("PATH={}", path));
            }
        }
        pairs
    }

    /// The search path: the store's `PATH`, else the process environment's.
    pub fn search_path(&self) -> Option<String> {
        self.lookup("PATH").map(str::to_string).or_else(|| std::env::var("PATH").ok())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_status_zero() {
        let env = Environment::new();
        assert_eq!(env.lookup(LAST_STATUS_KEY), Some("0"));
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut env = Environment::new();
        env.insert("K", "V");
        assert_eq!(env.lookup("K"), Some("V"));
        assert!(env.remove("K"));
        assert_eq!(env.lookup("K"), None);
        assert!(!env.remove("K"));
    }

    #[test]
    fn test_keys_sorted() {
        let mut env = Environment::new();
        env.insert("B", "2");
        env.insert("A", "1");
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["?", "A", "B"]);
    }

    #[test]
    fn test_child_environment_skips_status() {
        let mut env = Environment::new();
        env.insert("PATH", "/a:/b");
        env.insert("FOO", "bar");
        env.set_last_status(3);
        assert_eq!(env.child_environment(), vec!["FOO=bar".to_string(), "PATH=/a:/b".to_string()]);
    }

    #[test]
    fn test_inherited_path_without_store_entry() {
        let env = Environment::new();
        let inherited = std::env::var("PATH").ok();
        assert_eq!(env.search_path(), inherited);

        let pairs = env.child_environment();
        match inherited {
            Some(path) => assert_eq!(pairs, vec![format!("PATH={}", path)]),
            None => assert!(pairs.is_empty()),
        }
    }

    #[test]
    fn test_search_path_prefers_store() {
        let mut env = Environment::new();
        env.insert("PATH", "/only/here");
        assert_eq!(env.search_path().as_deref(), Some("/only/here"));
    }
}

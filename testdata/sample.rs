use std::collections::HashMap;
use std::fmt;

/// Key-value store.
pub struct Store {
    entries: HashMap<String, String>,
}

pub enum Mode {
    Read,
    Write,
}

pub trait Backend {
    fn flush(&mut self);
}

impl Store {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.entries.get(key)
    }
}

mod util {
    pub fn helper(x: i32) -> i32 {
        if x > 0 {
            x
        } else {
            0
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} entries", self.entries.len())
    }
}

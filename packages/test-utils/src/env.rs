//! Serialized access to process environment variables in tests

use std::env;
use std::sync::{Mutex, MutexGuard};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Sets and removes variables for one test, restoring them on drop
///
/// Holds a process-wide lock for its lifetime, so create one guard per test
/// covering every variable it touches.
pub struct EnvGuard {
    vars: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    pub fn new(set: &[(&str, &str)], remove: &[&str]) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut vars = Vec::new();
        for (k, v) in set {
            vars.push((k.to_string(), env::var(k).ok()));
            env::set_var(k, v);
        }
        for k in remove {
            vars.push((k.to_string(), env::var(k).ok()));
            env::remove_var(k);
        }
        Self { vars, _lock: lock }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (k, v) in self.vars.iter().rev() {
            match v {
                Some(val) => env::set_var(k, val),
                None => env::remove_var(k),
            }
        }
    }
}

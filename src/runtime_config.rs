//! # Runtime Configuration
//!
//! Process-level settings read from the environment at startup.
//!
//! ## `PYRIN_STACK_SIZE`
//!
//! Stack size of the coroutines serving documentation requests, in decimal
//! (`32768`) or hex (`0x8000`). Default `0x8000` (32 KB); building a large
//! document recurses through nested schemas, so avoid going much lower.
//!
//! ## `PYRIN_DEBUG` / `PYRIN_LIVE_RELOAD`
//!
//! Either one set to a true value (`1`, `true`, `yes`, `on`) forces live-reload
//! mode: documents are rebuilt on every request instead of being cached.
//!
//! ```rust
//! use pyrin_swagger::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes.
    pub stack_size: usize,
    /// Forces live-reload mode regardless of the swagger configuration.
    pub live_reload: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            live_reload: false,
        }
    }
}

fn parse_stack_size(val: &str) -> usize {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
    } else {
        val.parse().unwrap_or(DEFAULT_STACK_SIZE)
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let stack_size = lookup("PYRIN_STACK_SIZE")
            .map(|v| parse_stack_size(&v))
            .unwrap_or(DEFAULT_STACK_SIZE);
        let live_reload = ["PYRIN_DEBUG", "PYRIN_LIVE_RELOAD"]
            .iter()
            .any(|name| lookup(name).is_some_and(|v| is_truthy(&v)));
        RuntimeConfig {
            stack_size,
            live_reload,
        }
    }
}

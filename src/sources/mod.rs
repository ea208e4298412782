//! Process-level configuration sources: command-line arguments and environment variables.
//!
//! Both are read through a [`ProcessContext`] captured once and handed to the resolver,
//! so lookups never touch ambient process state and tests can substitute their own.

pub mod cli_args;
pub mod envvars;

use std::collections::BTreeMap;

/// Snapshot of the invocation arguments and environment.
#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
    args: Vec<String>,
    vars: BTreeMap<String, String>,
}

impl ProcessContext {
    /// An empty context: no arguments, no environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process' arguments (without the program name) and its
    /// environment. Variables whose name or value is not valid unicode are skipped.
    pub fn from_env() -> Self {
        let args = std::env::args_os()
            .skip(1)
            .filter_map(|a| a.into_string().ok())
            .collect();
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { args, vars }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

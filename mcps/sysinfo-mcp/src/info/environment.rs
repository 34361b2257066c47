//! Environment information collection
//!
//! Only a fixed set of well-known variables is reported; everything else is
//! counted but never exposed, since it may carry secrets.

use mcp_common::ToolResult;

use super::lossy;
use crate::types::EnvironmentInfo;

pub fn get_environment_info() -> ToolResult<EnvironmentInfo> {
    let vars: Vec<(String, String)> = std::env::vars_os()
        .map(|(k, v)| (lossy(k), lossy(v)))
        .collect();
    Ok(environment_info(&vars))
}

pub fn environment_info(vars: &[(String, String)]) -> EnvironmentInfo {
    let path: Vec<String> = lookup(vars, &["PATH", "Path"])
        .map(|raw| {
            std::env::split_paths(&raw)
                .map(|p| p.display().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    EnvironmentInfo {
        shell: lookup(vars, &["SHELL", "ComSpec"]),
        home: lookup(vars, &["HOME", "USERPROFILE"]),
        user: lookup(vars, &["USER", "USERNAME", "LOGNAME"]),
        lang: lookup(vars, &["LANG", "LC_ALL"]),
        term: lookup(vars, &["TERM", "TERM_PROGRAM"]),
        path,
        variable_count: vars.len(),
    }
}

/// First non-empty value among `keys`
fn lookup(vars: &[(String, String)], keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        vars.iter()
            .find(|(name, value)| name == key && !value.is_empty())
            .map(|(_, value)| value.clone())
    })
}

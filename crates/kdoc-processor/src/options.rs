//! Processor configuration — the four recognized `kdoc.*` options,
//! parsed once from the host's string-keyed option map.

use std::collections::HashMap;

pub const OPT_PACKAGES: &str = "kdoc.packages";
pub const OPT_DISABLE_CACHE: &str = "kdoc.disable-cache";
pub const OPT_FORCE_REGENERATE: &str = "kdoc.force-regenerate";
pub const OPT_DEBUG: &str = "kdoc.debug";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Package-name prefix allow-list; `None` allows every package.
    pub packages: Option<Vec<String>>,
    /// Ignore the cache every run (the cache is still updated).
    pub disable_cache: bool,
    /// Same effective behavior as `disable_cache`.
    pub force_regenerate: bool,
    /// Verbosity only — no behavioral effect.
    pub debug: bool,
}

impl ProcessorOptions {
    /// Build from the host's option map. Unknown keys are ignored;
    /// unparseable values fall back to the defaults.
    pub fn from_map(options: &HashMap<String, String>) -> Self {
        ProcessorOptions {
            packages: options.get(OPT_PACKAGES).map(parse_list).filter(|p| !p.is_empty()),
            disable_cache: parse_bool(options.get(OPT_DISABLE_CACHE)),
            force_regenerate: parse_bool(options.get(OPT_FORCE_REGENERATE)),
            debug: parse_bool(options.get(OPT_DEBUG)),
        }
    }

    /// Either override flag forces regeneration of every class and
    /// clears the cache at invocation start.
    pub fn cache_override(&self) -> bool {
        self.disable_cache || self.force_regenerate
    }

    /// True when `package` survives the prefix allow-list.
    pub fn allows_package(&self, package: &str) -> bool {
        match &self.packages {
            None => true,
            Some(prefixes) => prefixes.iter().any(|p| package.starts_with(p.as_str())),
        }
    }
}

fn parse_list(raw: &String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(value: Option<&String>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

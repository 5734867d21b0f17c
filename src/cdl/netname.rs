// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Net name normalizer
//!
//! Canonicalizes net name syntax and classifies nets:
//! - `base<k>` bus notation rewrites to `base[k]`
//! - trailing `!`/`?` markers are stripped from the normalized name
//! - names matching the configured power/ground sets (case-insensitive)
//!   are classified as POWER/GROUND, everything else as SIGNAL
//!
//! Results are memoized by the exact input string; repeated calls return
//! the identical [`NetInfo`] instance (observable via `Arc::ptr_eq`), so
//! callers may use the cache for deduplication during net collection.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{NetInfo, NetType};

const DEFAULT_POWER_NAMES: &[&str] = &["VDD", "VCC", "VPWR", "VDDA"];
const DEFAULT_GROUND_NAMES: &[&str] = &["VSS", "GND", "VGND", "VSSA"];

/// Memoizing net name normalizer.
#[derive(Debug)]
pub struct NetNormalizer {
    cache: HashMap<String, Arc<NetInfo>>,
    power_names: HashSet<String>,
    ground_names: HashSet<String>,
}

impl Default for NetNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NetNormalizer {
    pub fn new() -> Self {
        Self::with_names(
            DEFAULT_POWER_NAMES.iter().map(|s| s.to_string()),
            DEFAULT_GROUND_NAMES.iter().map(|s| s.to_string()),
        )
    }

    /// Build a normalizer with custom power/ground name sets.
    ///
    /// Matching is case-insensitive.
    pub fn with_names(
        power: impl IntoIterator<Item = String>,
        ground: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            cache: HashMap::new(),
            power_names: power.into_iter().map(|s| s.to_ascii_uppercase()).collect(),
            ground_names: ground.into_iter().map(|s| s.to_ascii_uppercase()).collect(),
        }
    }

    /// Normalize `name`, returning the cached instance when the exact
    /// same string has been seen before.
    pub fn normalize(&mut self, name: &str) -> Arc<NetInfo> {
        if let Some(info) = self.cache.get(name) {
            return Arc::clone(info);
        }

        let stripped = name.trim_end_matches(['!', '?']);
        let (normalized, is_bus, bus_index) = match bus_suffix(stripped) {
            Some((base, index)) => (format!("{base}[{index}]"), true, Some(index)),
            None => (stripped.to_string(), false, None),
        };

        let upper = stripped.to_ascii_uppercase();
        let net_type = if self.power_names.contains(&upper) {
            NetType::Power
        } else if self.ground_names.contains(&upper) {
            NetType::Ground
        } else {
            NetType::Signal
        };

        let info = Arc::new(NetInfo {
            original_name: name.to_string(),
            normalized_name: normalized,
            net_type,
            is_bus,
            bus_index,
        });
        self.cache.insert(name.to_string(), Arc::clone(&info));
        info
    }

    /// Number of distinct names normalized so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Split a trailing `<integer>` bus suffix off `name`.
///
/// The base must be non-empty: a name that is only `<integer>` is
/// treated as a literal, non-bus name.
fn bus_suffix(name: &str) -> Option<(&str, u32)> {
    let rest = name.strip_suffix('>')?;
    let open = rest.rfind('<')?;
    let (base, digits) = rest.split_at(open);
    let digits = &digits[1..];
    if base.is_empty() || digits.is_empty() {
        return None;
    }
    let index = digits.parse::<u32>().ok()?;
    Some((base, index))
}

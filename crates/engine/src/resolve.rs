// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target resolution: which build units a request expands to.

use pl_adapters::{DiscoveryError, UnitDiscovery};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionMode {
    /// One unit: the requested path itself.
    #[default]
    Direct,
    /// Every unit at or below the requested path, built one at a time.
    Isolated,
}

/// Number of path components; the lake root (".") has depth 0.
pub fn depth(unit: &str) -> usize {
    if unit == "." || unit.is_empty() {
        0
    } else {
        unit.split('/').filter(|c| !c.is_empty()).count()
    }
}

/// Order units so nested ones build before the units that contain them.
///
/// Ties are broken by path so the order does not depend on discovery.
pub fn sort_deepest_first(units: &mut [String]) {
    units.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
}

/// Expand `target` (lake-relative) into the ordered units to build.
pub async fn resolve_units<D: UnitDiscovery>(
    mode: ResolutionMode,
    discovery: &D,
    lake_root: &Path,
    target: &str,
) -> Result<Vec<String>, DiscoveryError> {
    match mode {
        ResolutionMode::Direct => Ok(vec![target.to_string()]),
        ResolutionMode::Isolated => {
            let mut units = discovery.discover(lake_root, target).await?;
            sort_deepest_first(&mut units);
            Ok(units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_adapters::FakeDiscovery;

    #[yare::parameterized(
        root = { ".", 0 },
        one = { "a", 1 },
        three = { "com/acme/user", 3 },
        trailing = { "a/b/", 2 },
    )]
    fn depth_counts_components(unit: &str, expected: usize) {
        assert_eq!(depth(unit), expected);
    }

    #[tokio::test]
    async fn isolated_orders_deepest_first_regardless_of_discovery_order() {
        let discovery = FakeDiscovery::with_units(&["a", "a/b/c", "z", "a/b"]);
        let units = resolve_units(ResolutionMode::Isolated, &discovery, Path::new("/lake"), ".")
            .await
            .unwrap();
        assert_eq!(units, vec!["a/b/c", "a/b", "a", "z"]);
    }

    #[tokio::test]
    async fn direct_is_the_target_itself() {
        let discovery = FakeDiscovery::with_units(&["a/b"]);
        let units = resolve_units(ResolutionMode::Direct, &discovery, Path::new("/lake"), "a")
            .await
            .unwrap();
        assert_eq!(units, vec!["a"]);
    }
}

//! Wheel filename conventions
//!
//! Extension artifacts are Python wheels. The wheel filename encodes the
//! distribution name and version per PEP 427:
//!
//! ```text
//! {name}-{version}(-{build})?-{python tag}-{abi tag}-{platform tag}.whl
//! ```
//!
//! Extension names can contain `-` but the wheel format changes it to `_`
//! (PEP 427 escaping); parsing reverses that to recover the canonical
//! hyphenated name.

use regex::Regex;
use std::sync::LazyLock;

/// PEP 427 wheel filename grammar
static WHEEL_INFO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<namever>(?P<name>.+?)-(?P<ver>\d.*?))(-(?P<build>\d.*?))?-(?P<pyver>[a-z].+?)-(?P<abi>.+?)-(?P<plat>.+?)\.whl$",
    )
    .expect("wheel filename regex is valid")
});

/// Name of the compatibility metadata file packaged inside extension wheels
pub const METADATA_FILE_NAME: &str = "hearthext_metadata.json";

/// Name and version parsed from a wheel filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelInfo {
    /// Canonical extension name (hyphenated)
    pub name: String,
    /// Version string as encoded in the filename
    pub version: String,
}

/// Parse a wheel filename into its name and version
///
/// Returns `None` if the filename does not match the wheel grammar.
pub fn parse_wheel_filename(filename: &str) -> Option<WheelInfo> {
    let caps = WHEEL_INFO_RE.captures(filename)?;
    let name = caps.name("name")?.as_str().replace('_', "-");
    let version = caps.name("ver")?.as_str().to_string();
    Some(WheelInfo { name, version })
}

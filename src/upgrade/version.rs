//! Version comparison for upgrade decisions.
//!
//! Release feeds rarely publish strictly valid semantic versions: tags carry a
//! `v` prefix, some drop the patch component, others zero-pad. The functions
//! here normalize such strings before handing them to [`semver`], so that two
//! versions can always be ordered once both have parsed.

use semver::Version;
use tracing::debug;

use crate::core::UpgradeError;

/// Parse a version string, tolerating common deviations from semver.
///
/// Accepted deviations:
/// - surrounding whitespace
/// - any non-numeric prefix (`v1.2.3`, `V1.2.3`, `release-1.2.3`)
/// - missing minor or patch components (`1.2` is read as `1.2.0`)
/// - leading zeros in numeric components (`01.02.03`)
///
/// Pre-release and build metadata are kept as-is and follow semver rules.
///
/// # Errors
///
/// Returns [`UpgradeError::Parse`] when the normalized string is still not a
/// valid semantic version, e.g. `"not-a-version"` or `"1.x.0"`.
///
/// # Examples
///
/// ```rust
/// use uplift_cli::upgrade::version::parse_tolerant;
///
/// let version = parse_tolerant("v1.31").unwrap();
/// assert_eq!(version.to_string(), "1.31.0");
/// ```
pub fn parse_tolerant(input: &str) -> Result<Version, UpgradeError> {
    let normalized = normalize(input);
    Version::parse(&normalized).map_err(|source| UpgradeError::Parse {
        input: input.to_string(),
        source,
    })
}

/// Decide whether `current` should be upgraded to `latest`.
///
/// Returns `true` iff `current` is strictly lower than `latest` under
/// semantic-version precedence. Equal or newer versions are a normal
/// "already up to date" result.
///
/// # Errors
///
/// Returns [`UpgradeError::Parse`] if either side cannot be parsed.
///
/// # Examples
///
/// ```rust
/// use uplift_cli::upgrade::version::needs_upgrade;
///
/// assert!(needs_upgrade("1.30.0", "v1.31.0").unwrap());
/// assert!(!needs_upgrade("1.31.0", "1.31.0").unwrap());
/// ```
pub fn needs_upgrade(current: &str, latest: &str) -> Result<bool, UpgradeError> {
    let current_version = parse_tolerant(current)?;
    let latest_version = parse_tolerant(latest)?;

    debug!("Comparing current {} with latest {}", current_version, latest_version);
    Ok(current_version < latest_version)
}

fn normalize(input: &str) -> String {
    let trimmed = input.trim().trim_start_matches(|c: char| !c.is_ascii_digit());

    // Only the numeric core is rewritten; pre-release and build metadata stay verbatim.
    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);

    let mut parts: Vec<String> = core.split('.').map(strip_leading_zeros).collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }

    format!("{}{}", parts.join("."), suffix)
}

fn strip_leading_zeros(part: &str) -> String {
    if part.len() > 1 && part.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = part.trim_start_matches('0');
        if stripped.is_empty() { "0".to_string() } else { stripped.to_string() }
    } else {
        part.to_string()
    }
}

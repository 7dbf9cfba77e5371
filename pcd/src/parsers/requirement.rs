//! Single requirement specifiers: `name[extra1,extra2]>=1.0; marker`.

/// Characters that may appear inside a project name
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Characters that may start whatever follows the name and extras
const TAIL_START: &[char] = &['=', '<', '>', '~', '!', '(', '@', ';'];

/// Canonical form of a project name.
///
/// Every run of characters other than ASCII letters, digits and `.` becomes a
/// single `-`, then the whole name is lowercased, so `Typing_Extensions` and
/// `typing-extensions` compare equal.
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            canonical.push(c.to_ascii_lowercase());
            in_separator_run = false;
        } else if !in_separator_run {
            canonical.push('-');
            in_separator_run = true;
        }
    }
    canonical
}

/// Parse one requirement specifier and return its canonical name.
///
/// Returns `None` when the text is not a valid specifier. Comments and
/// requirements-file directives must already be stripped by the caller.
pub fn parse_requirement(spec: &str) -> Option<String> {
    let spec = spec.trim();
    let name_end = spec.find(|c: char| !is_name_char(c)).unwrap_or(spec.len());
    let name = &spec[..name_end];

    // Names start and end with a letter or digit
    let first = name.chars().next()?;
    let last = name.chars().next_back()?;
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return None;
    }

    let mut rest = spec[name_end..].trim_start();
    if let Some(extras) = rest.strip_prefix('[') {
        let close = extras.find(']')?;
        if !valid_extras(&extras[..close]) {
            return None;
        }
        rest = extras[close + 1..].trim_start();
    }

    // `--hash` and other per-requirement options may follow the name directly
    if rest.is_empty() || rest.starts_with(TAIL_START) || rest.starts_with("--") {
        Some(canonical_name(name))
    } else {
        None
    }
}

fn valid_extras(extras: &str) -> bool {
    extras
        .split(',')
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
        .all(|extra| extra.chars().all(is_name_char))
}

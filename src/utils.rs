use url::Url;

/// Read an env var as bool (“1” or “true” = true).
pub fn get_env_bool(name: &str) -> bool {
    std::env::var(name).map(|v| is_truthy(&v)).unwrap_or(false)
}

/// Read an env var or return `default`.
pub fn get_env_with_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

pub fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Short form of a repository URL: its path without the leading slash
/// (`owner/repo` for GitHub). Falls back to the raw string.
pub fn repo_slug(url_str: &str) -> String {
    Url::parse(url_str)
        .ok()
        .map(|u| {
            let path = u.path();
            path.strip_prefix('/').unwrap_or(path).to_string()
        })
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| url_str.to_string())
}

/// Star count with thousands separators, e.g. `12,345`.
pub fn format_stars(stars: u64) -> String {
    let digits = stars.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_date(date: &str) -> &str {
    if date.is_empty() {
        "n/a"
    } else {
        date
    }
}

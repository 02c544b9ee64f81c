//! String helpers available inside every template.
//!
//! All helpers are pure string functions. They are registered both as
//! functions (`{{ pascalCase(entityName) }}`) and, for the case converters, as
//! filters (`{{ entityName | pascal_case }}`).

use chrono::{DateTime, Local, NaiveDate};
use minijinja::{Environment, Error, ErrorKind};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Length of tokens produced by `randomToken()` without an argument.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Split an identifier into words on separators and case boundaries.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // fooBar | HTTPServer
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// `user_profile` → `userProfile`
pub fn camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize_word(word));
        }
    }
    out
}

/// `user-profile` → `UserProfile`
pub fn pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize_word(w)).collect()
}

/// `UserProfile` → `user_profile`
pub fn snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `UserProfile` → `user-profile`
pub fn kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase the first character, leave the rest alone.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// ISO-8601 calendar date (`2024-03-01`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Alphanumeric token drawn from the operating system's secure RNG.
pub fn random_token(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

fn format_date_helper(value: Option<String>) -> Result<String, Error> {
    match value {
        None => Ok(format_date(Local::now().date_naive())),
        Some(value) => parse_date(&value).map(format_date).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("formatDate expects an ISO date, got '{}'", value),
            )
        }),
    }
}

/// Register the helper surface on an environment.
pub(crate) fn register(env: &mut Environment<'static>) {
    env.add_function("camelCase", |s: &str| camel_case(s));
    env.add_function("pascalCase", |s: &str| pascal_case(s));
    env.add_function("snakeCase", |s: &str| snake_case(s));
    env.add_function("kebabCase", |s: &str| kebab_case(s));
    env.add_function("capitalize", |s: &str| capitalize(s));
    env.add_function("escapeHtml", |s: &str| escape_html(s));
    env.add_function("formatDate", format_date_helper);
    env.add_function("randomToken", |length: Option<usize>| {
        random_token(length.unwrap_or(DEFAULT_TOKEN_LENGTH))
    });

    env.add_filter("camel_case", |s: &str| camel_case(s));
    env.add_filter("pascal_case", |s: &str| pascal_case(s));
    env.add_filter("snake_case", |s: &str| snake_case(s));
    env.add_filter("kebab_case", |s: &str| kebab_case(s));
    env.add_filter("escape_html", |s: &str| escape_html(s));
}

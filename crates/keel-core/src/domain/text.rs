//! Pure string helpers exposed to templates.
//!
//! Every function here is side-effect free and total: bad input produces a
//! best-effort string, never a panic. The engine adapter registers each one
//! as both a filter (`{{ name | pascal }}`) and a function (`{{ pascal(name) }}`).

/// Lowercase the whole string.
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

/// Uppercase the whole string.
pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

/// Replace every `-` with `_` (`orders-db` → `orders_db`).
pub fn dash_to_underscore(s: &str) -> String {
    s.replace('-', "_")
}

/// Capitalize the first letter of each word, keeping separators.
///
/// | Input | Output |
/// |-------|--------|
/// | "hello world" | "Hello World" |
/// | "getting-started" | "Getting-Started" |
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Join words in PascalCase, splitting on delimiters and case changes.
///
/// | Input | Output |
/// |-------|--------|
/// | "orders-db" | "OrdersDb" |
/// | "payment_gateway.v2" | "PaymentGatewayV2" |
/// | "HTTPServer" | "HttpServer" |
pub fn pascal(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Integer addition, saturating instead of overflowing.
pub fn add(a: i64, b: i64) -> i64 {
    a.saturating_add(b)
}

/// Escape a string for embedding between JSON double quotes.
pub fn json_escape(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_owned()
}

/// Derive a short name from a fully-qualified resource identifier.
///
/// Takes the last non-empty segment split on `/` and `:`, drops a trailing
/// `.git`, and skips a trailing major-version segment such as `v2`.
///
/// | Input | Output |
/// |-------|--------|
/// | "github.com/acme/payments" | "payments" |
/// | "github.com/acme/payments/v2" | "payments" |
/// | "projects/acme/topics/orders" | "orders" |
/// | "git@github.com:acme/shop.git" | "shop" |
pub fn short_name(s: &str) -> String {
    let segments: Vec<&str> = s
        .split(['/', ':'])
        .filter(|seg| !seg.is_empty())
        .collect();

    let is_version = |seg: &&str| {
        seg.len() > 1
            && seg.starts_with('v')
            && seg[1..].chars().all(|c| c.is_ascii_digit())
    };

    let last = match segments.as_slice() {
        [] => return String::new(),
        [.., prev, last] if is_version(last) => *prev,
        [.., last] => *last,
    };

    last.strip_suffix(".git").unwrap_or(last).to_owned()
}

/// Split a string into lowercase words based on casing and separators.
///
/// 1. **Explicit separators:** `_`, `-`, `.`, `/`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
pub(crate) fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if matches!(c, '_' | '-' | '.' | '/') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_handles_mixed_delimiters() {
        assert_eq!(pascal("orders-db"), "OrdersDb");
        assert_eq!(pascal("payment_gateway.v2"), "PaymentGatewayV2");
        assert_eq!(pascal("HTTPServer"), "HttpServer");
        assert_eq!(pascal("myApp"), "MyApp");
        assert_eq!(pascal(""), "");
    }

    #[test]
    fn capitalize_words_keeps_separators() {
        assert_eq!(capitalize_words("hello world"), "Hello World");
        assert_eq!(capitalize_words("getting-started"), "Getting-Started");
    }

    #[test]
    fn dash_to_underscore_only_touches_dashes() {
        assert_eq!(dash_to_underscore("orders-db-v2"), "orders_db_v2");
        assert_eq!(dash_to_underscore("Mixed_Case"), "Mixed_Case");
    }

    #[test]
    fn json_escape_strips_outer_quotes() {
        assert_eq!(json_escape(r#"say "hi"\n"#), r#"say \"hi\"\\n"#);
        assert_eq!(json_escape("tab\there"), "tab\\there");
    }

    #[test]
    fn short_name_from_resource_identifiers() {
        assert_eq!(short_name("github.com/acme/payments"), "payments");
        assert_eq!(short_name("github.com/acme/payments/v2"), "payments");
        assert_eq!(short_name("projects/acme/topics/orders"), "orders");
        assert_eq!(short_name("git@github.com:acme/shop.git"), "shop");
        assert_eq!(short_name("plain"), "plain");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn add_saturates() {
        assert_eq!(add(8080, 1), 8081);
        assert_eq!(add(i64::MAX, 1), i64::MAX);
    }
}

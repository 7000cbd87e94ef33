//! Identifier transforms used to derive file, route and column names from
//! PascalCase model and field names.

/// Convert a PascalCase identifier to snake_case.
///
/// An uppercase letter starts a new word after a lowercase letter or digit,
/// or when it ends a run of capitals that a lowercase letter follows.
///
/// | Input | Output |
/// |-------|--------|
/// | "CreatedAt" | "created_at" |
/// | "Title" | "title" |
/// | "UserID" | "user_id" |
/// | "HTTPServer" | "http_server" |
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowercase only the first character: `BlogPost` becomes `blogPost`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Naive English plural.
///
/// ## Rules
///
/// 1. ends in `s`, `x`, `ch` or `sh` → append `es`
/// 2. consonant + `y` → replace `y` with `ies`
/// 3. otherwise append `s`
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let lower = s.to_lowercase();
    if ["s", "x", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{s}es");
    }

    if let Some(stem) = s.strip_suffix(['y', 'Y']) {
        let before_y = stem.chars().last();
        if before_y.is_some_and(|c| !"aeiouAEIOU".contains(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{s}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_on_uppercase() {
        assert_eq!(to_snake_case("CreatedAt"), "created_at");
        assert_eq!(to_snake_case("Title"), "title");
        assert_eq!(to_snake_case("price"), "price");
        assert_eq!(to_snake_case("Line2Total"), "line2_total");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn snake_case_keeps_acronyms_together() {
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("UserID"), "user_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("APIKeyHash"), "api_key_hash");
    }

    #[test]
    fn lower_first_only_touches_first_char() {
        assert_eq!(lower_first("BlogPost"), "blogPost");
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn plural_rules() {
        assert_eq!(pluralize("Post"), "Posts");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Match"), "Matches");
        assert_eq!(pluralize("Dish"), "Dishes");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Y"), "Ys");
        assert_eq!(pluralize(""), "");
    }
}

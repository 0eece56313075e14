//! Identifier helpers for generated TypeScript.

/// Words that cannot name a type.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "any", "boolean", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "never", "new", "null", "number", "object",
    "return", "string", "super", "switch", "symbol", "this", "throw", "true", "try", "typeof",
    "undefined", "unknown", "var", "void", "while", "with",
];

/// True if `name` is syntactically an identifier (ASCII only).
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// True if `name` can be used as the name of a declared type.
pub fn is_valid_type_name(name: &str) -> bool {
    is_identifier_name(name) && !RESERVED_TYPE_NAMES.contains(&name)
}

/// Property key as written in an object type: bare when possible, quoted otherwise.
pub fn quote_if_needed(name: &str) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
    }
}

/// Convert free text (typically an endpoint path) to PascalCase.
///
/// Words are split on any non-alphanumeric character and on case
/// boundaries (`getInfo` -> `get`, `info`; `XMLHttp` -> `xml`, `http`); each
/// word is capitalized and the words are joined without delimiter.
///
/// ```
/// use yapi_typegen::to_pascal_case;
///
/// assert_eq!(to_pascal_case("/api/user/get_info"), "ApiUserGetInfo");
/// ```
pub fn to_pascal_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|word| capitalize(word))
        .collect()
}

fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let lower_to_upper = c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
        let acronym_end = c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_uppercase())
            && next.is_some_and(|n| n.is_ascii_lowercase());

        if (lower_to_upper || acronym_end) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_from_paths() {
        assert_eq!(to_pascal_case("/api/user/get_info"), "ApiUserGetInfo");
        assert_eq!(to_pascal_case("/api/v2/order-list"), "ApiV2OrderList");
        assert_eq!(to_pascal_case("/api/{id}/detail"), "ApiIdDetail");
    }

    #[test]
    fn pascal_case_splits_case_boundaries() {
        assert_eq!(to_pascal_case("getUserInfo"), "GetUserInfo");
        assert_eq!(to_pascal_case("XMLHttpRequest"), "XmlHttpRequest");
        assert_eq!(to_pascal_case("SHOUTING"), "Shouting");
    }

    #[test]
    fn pascal_case_drops_non_ascii() {
        assert_eq!(to_pascal_case("/api/用户/list"), "ApiList");
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(to_pascal_case("///"), "");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier_name("foo_bar$1"));
        assert!(is_identifier_name("_x"));
        assert!(!is_identifier_name("1x"));
        assert!(!is_identifier_name("a-b"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn reserved_words_are_not_type_names() {
        assert!(is_valid_type_name("Widget"));
        assert!(!is_valid_type_name("string"));
        assert!(!is_valid_type_name("class"));
        assert!(is_identifier_name("class"));
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_if_needed("name"), "name");
        assert_eq!(quote_if_needed("user-id"), "\"user-id\"");
        assert_eq!(quote_if_needed("0"), "\"0\"");
    }
}

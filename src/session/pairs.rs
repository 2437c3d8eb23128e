/// Ordered pairs parsed from a delimited string, plus one warning per
/// discarded entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPairs {
    pub pairs: Vec<(String, String)>,
    pub warnings: Vec<String>,
}

/// Parses `Name: value` or `Name=value` entries separated by commas.
pub fn parse_headers(input: &str) -> ParsedPairs {
    let mut parsed = ParsedPairs::default();

    for entry in input.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let separator = entry.find([':', '=']);
        let Some(index) = separator else {
            parsed
                .warnings
                .push(format!("Ignoring header '{entry}': expected 'Name: value'"));
            continue;
        };

        let name = entry[..index].trim();
        let value = entry[index + 1..].trim();
        if !is_header_token(name) {
            parsed
                .warnings
                .push(format!("Ignoring header '{entry}': invalid header name"));
            continue;
        }

        parsed.pairs.push((name.to_string(), value.to_string()));
    }

    parsed
}

/// Parses `name=value` entries separated by commas or semicolons.
pub fn parse_cookies(input: &str) -> ParsedPairs {
    let mut parsed = ParsedPairs::default();

    for entry in input.split([',', ';']) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let Some((name, value)) = entry.split_once('=') else {
            parsed
                .warnings
                .push(format!("Ignoring cookie '{entry}': expected 'name=value'"));
            continue;
        };

        let name = name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            parsed
                .warnings
                .push(format!("Ignoring cookie '{entry}': invalid cookie name"));
            continue;
        }

        parsed.pairs.push((name.to_string(), value.trim().to_string()));
    }

    parsed
}

fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|ch| {
            ch.is_ascii_alphanumeric()
                || matches!(
                    ch,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`'
                        | '|' | '~'
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn headers_accept_colon_and_equals_forms() {
        let parsed = parse_headers("Accept: application/json, X-Api-Key=abc123");
        assert_eq!(
            parsed.pairs,
            vec![pair("Accept", "application/json"), pair("X-Api-Key", "abc123")]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn header_value_keeps_later_separators() {
        let parsed = parse_headers("Authorization: Basic dXNlcjpwYXNz==");
        assert_eq!(parsed.pairs, vec![pair("Authorization", "Basic dXNlcjpwYXNz==")]);
    }

    #[test]
    fn malformed_headers_are_discarded_with_warnings() {
        let parsed = parse_headers("Accept: */*, garbage, Bad Name: x,, X-Ok: 1");
        assert_eq!(parsed.pairs, vec![pair("Accept", "*/*"), pair("X-Ok", "1")]);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].contains("garbage"));
        assert!(parsed.warnings[1].contains("Bad Name"));
    }

    #[test]
    fn cookies_split_on_commas_and_semicolons() {
        let parsed = parse_cookies("session=abc; theme=dark, lang=en");
        assert_eq!(
            parsed.pairs,
            vec![pair("session", "abc"), pair("theme", "dark"), pair("lang", "en")]
        );
    }

    #[test]
    fn cookie_without_equals_is_rejected() {
        let parsed = parse_cookies("session, id=1");
        assert_eq!(parsed.pairs, vec![pair("id", "1")]);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = "A: 1, broken, B=2";
        assert_eq!(parse_headers(input), parse_headers(input));
        let cookies = "x=1; ;y=2; z";
        assert_eq!(parse_cookies(cookies), parse_cookies(cookies));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(parse_headers("  "), ParsedPairs::default());
        assert_eq!(parse_cookies(""), ParsedPairs::default());
    }
}

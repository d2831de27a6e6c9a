//! Value tokenizer for a single parenthesized row.
//!
//! A single left-to-right scan with one quote-depth flag. SQL-style doubled
//! quotes (`''` inside a single-quoted run) unescape to one literal quote.

use crate::value::SqlValue;

/// Split the interior text of one parenthesized row into classified literals,
/// one per top-level comma-separated field.
///
/// Empty unquoted fields between consecutive commas are dropped rather than
/// emitted as empty strings; quoted fields are always emitted, even empty.
pub fn tokenize_row(row_text: &str) -> Vec<SqlValue> {
    let chars: Vec<char> = row_text.chars().collect();
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '\0';

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if !in_quotes && (c == '\'' || c == '"') {
            in_quotes = true;
            quote_char = c;
            i += 1;
            continue;
        }

        if in_quotes && c == quote_char {
            if next == Some(quote_char) {
                // Doubled quote is an escaped literal quote.
                current.push(c);
                i += 2;
                continue;
            }
            // Closing quote: the buffer is a completed string literal.
            in_quotes = false;
            quote_char = '\0';
            values.push(SqlValue::String(std::mem::take(&mut current)));
            i += 1;
            if next == Some(',') {
                i += 1;
            }
            continue;
        }

        if !in_quotes && c == ',' {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                values.push(classify_value(trimmed));
            }
            current.clear();
            i += 1;
            continue;
        }

        current.push(c);
        i += 1;
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        values.push(classify_value(trimmed));
    }

    values
}

/// Classify one bare trimmed token into a literal.
///
/// The quote-stripping branch is a defensive fallback for values that
/// re-enter unparsed; the scan in [`tokenize_row`] normally flushes quoted
/// runs before they reach the classifier.
pub fn classify_value(token: &str) -> SqlValue {
    let token = token.trim();

    if token == "NULL" || token == "null" {
        return SqlValue::Null;
    }

    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            let inner = &token[1..token.len() - 1];
            let doubled: String = [quote, quote].iter().collect();
            return SqlValue::String(inner.replace(&doubled, &quote.to_string()));
        }
    }

    if let Some(number) = parse_numeric(token) {
        return number;
    }

    SqlValue::Bareword(token.to_string())
}

/// Numeric grammar: optional leading minus, digits, optional decimal point
/// with optional fractional digits.
fn parse_numeric(token: &str) -> Option<SqlValue> {
    let body = token.strip_prefix('-').unwrap_or(token);
    if body.is_empty() {
        return None;
    }

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    match frac_part {
        // No fractional digits: keep integer identity, overflow falls back
        // to a float parse.
        None | Some("") => {
            let digits = int_part;
            let negative = token.starts_with('-');
            match digits.parse::<i64>() {
                Ok(n) => Some(SqlValue::Int(if negative { -n } else { n })),
                Err(_) => token
                    .trim_end_matches('.')
                    .parse::<f64>()
                    .ok()
                    .map(SqlValue::Float),
            }
        }
        Some(_) => token.parse::<f64>().ok().map(SqlValue::Float),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_movie_row() {
        let row = "101, 'The Last Stand', 2023, 'Action', 125, \
                   'A retired agent''s mission', 4.30, 'http://x.com/a.jpg'";
        let values = tokenize_row(row);
        assert_eq!(
            values,
            vec![
                SqlValue::Int(101),
                SqlValue::String("The Last Stand".to_string()),
                SqlValue::Int(2023),
                SqlValue::String("Action".to_string()),
                SqlValue::Int(125),
                SqlValue::String("A retired agent's mission".to_string()),
                SqlValue::Float(4.3),
                SqlValue::String("http://x.com/a.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_null_and_numbers() {
        assert_eq!(
            tokenize_row("5, NULL, 3.5"),
            vec![SqlValue::Int(5), SqlValue::Null, SqlValue::Float(3.5)]
        );
    }

    #[test]
    fn test_null_is_never_a_string() {
        assert_eq!(classify_value("NULL"), SqlValue::Null);
        assert_eq!(classify_value("null"), SqlValue::Null);
        // A quoted NULL stays a string.
        assert_eq!(
            classify_value("'NULL'"),
            SqlValue::String("NULL".to_string())
        );
    }

    #[test]
    fn test_doubled_quote_roundtrip() {
        let values = tokenize_row("'it''s a ''quoted'' word'");
        assert_eq!(
            values,
            vec![SqlValue::String("it's a 'quoted' word".to_string())]
        );
    }

    #[test]
    fn test_comma_inside_quotes_is_not_a_separator() {
        let values = tokenize_row("1, 'Hello, world', 2");
        assert_eq!(
            values,
            vec![
                SqlValue::Int(1),
                SqlValue::String("Hello, world".to_string()),
                SqlValue::Int(2),
            ]
        );
    }

    #[test]
    fn test_empty_unquoted_fields_are_dropped() {
        assert_eq!(
            tokenize_row("1,, 2"),
            vec![SqlValue::Int(1), SqlValue::Int(2)]
        );
    }

    #[test]
    fn test_empty_quoted_field_is_kept() {
        assert_eq!(
            tokenize_row("1, '', 2"),
            vec![
                SqlValue::Int(1),
                SqlValue::String(String::new()),
                SqlValue::Int(2),
            ]
        );
    }

    #[test]
    fn test_numeric_grammar() {
        assert_eq!(classify_value("42"), SqlValue::Int(42));
        assert_eq!(classify_value("-7"), SqlValue::Int(-7));
        assert_eq!(classify_value("4.30"), SqlValue::Float(4.3));
        assert_eq!(classify_value("-0.5"), SqlValue::Float(-0.5));
        assert_eq!(classify_value("12."), SqlValue::Int(12));
        // Not numeric: classified as barewords.
        assert_eq!(
            classify_value("4.3.1"),
            SqlValue::Bareword("4.3.1".to_string())
        );
        assert_eq!(
            classify_value("1e5"),
            SqlValue::Bareword("1e5".to_string())
        );
        assert_eq!(classify_value("-"), SqlValue::Bareword("-".to_string()));
    }

    #[test]
    fn test_bareword_passthrough() {
        assert_eq!(
            classify_value("CURRENT_TIMESTAMP"),
            SqlValue::Bareword("CURRENT_TIMESTAMP".to_string())
        );
    }

    #[test]
    fn test_classifier_fallback_strips_quote_pair() {
        assert_eq!(
            classify_value("'don''t'"),
            SqlValue::String("don't".to_string())
        );
        assert_eq!(
            classify_value("\"say \"\"hi\"\"\""),
            SqlValue::String("say \"hi\"".to_string())
        );
    }

    #[test]
    fn test_whitespace_around_fields_is_trimmed() {
        assert_eq!(
            tokenize_row("  1 ,   foo bar  "),
            vec![SqlValue::Int(1), SqlValue::Bareword("foo bar".to_string())]
        );
    }
}

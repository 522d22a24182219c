//! Splitting list-valued properties.

/// Splits a property value into items.
///
/// Items are separated by runs of whitespace or commas. When
/// `escape_in_quotes` is set, text between matching `"` or `'` quotes is
/// taken literally (separators included) and `\` inside quotes escapes the
/// next character. Without it, quote characters are ordinary text.
///
/// Returns a description of the problem if a quote is left open.
pub fn parse_property_list(value: &str, escape_in_quotes: bool) -> Result<Vec<String>, String> {
    if !escape_in_quotes {
        return Ok(value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    // A quoted empty string still counts as an item.
    let mut in_item = false;
    let mut quote: Option<char> = None;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) if c == '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_item = true;
            }
            None if c.is_whitespace() || c == ',' => {
                if in_item {
                    items.push(std::mem::take(&mut current));
                    in_item = false;
                }
            }
            None => {
                current.push(c);
                in_item = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_item {
        items.push(current);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_whitespace_and_commas() {
        assert_eq!(
            parse_property_list("libA,libB  libC\tlibD", false).unwrap(),
            vec!["libA", "libB", "libC", "libD"]
        );
    }

    #[test]
    fn plain_mode_keeps_quotes() {
        assert_eq!(
            parse_property_list(r#""a b""#, false).unwrap(),
            vec!["\"a", "b\""]
        );
    }

    #[test]
    fn empty_value() {
        assert!(parse_property_list("", true).unwrap().is_empty());
        assert!(parse_property_list(" , ,", false).unwrap().is_empty());
    }

    #[test]
    fn quoted_segment_keeps_delimiters() {
        assert_eq!(
            parse_property_list(r#"-lfoo,"-l bar""#, true).unwrap(),
            vec!["-lfoo", "-l bar"]
        );
    }

    #[test]
    fn single_quotes_and_commas_inside() {
        assert_eq!(
            parse_property_list("'-Wl,-rpath,/opt/lib' -lz", true).unwrap(),
            vec!["-Wl,-rpath,/opt/lib", "-lz"]
        );
    }

    #[test]
    fn quote_joins_with_adjacent_text() {
        assert_eq!(
            parse_property_list(r#"-I"/path with space/include""#, true).unwrap(),
            vec!["-I/path with space/include"]
        );
    }

    #[test]
    fn backslash_escapes_inside_quotes() {
        assert_eq!(
            parse_property_list(r#""say \"hi\"""#, true).unwrap(),
            vec![r#"say "hi""#]
        );
    }

    #[test]
    fn empty_quoted_item_is_kept() {
        assert_eq!(parse_property_list(r#"a "" b"#, true).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn unterminated_quote_errors() {
        let err = parse_property_list(r#"-lfoo "-l bar"#, true).unwrap_err();
        assert!(err.contains("unterminated"));
    }
}

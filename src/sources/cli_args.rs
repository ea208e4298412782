//! `--flag value` command-line arguments.
//!
//! A flag is any token starting with `--`. Its value is the next token unless that
//! token is itself a flag or there is none, in which case the value is empty.

fn flag_name(token: &str) -> Option<&str> {
    token.strip_prefix("--").filter(|name| !name.is_empty())
}

fn value_after(args: &[String], index: usize) -> String {
    match args.get(index + 1) {
        Some(next) if flag_name(next).is_none() => next.clone(),
        _ => String::new(),
    }
}

/// The value of the first `--name` flag, if any.
pub fn read_arg(args: &[String], name: &str) -> Option<String> {
    let index = args.iter().position(|a| flag_name(a) == Some(name))?;
    Some(value_after(args, index))
}

/// Every `--flag value` pair in encounter order; later duplicates overwrite earlier.
pub fn read_all_args(args: &[String]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (index, token) in args.iter().enumerate() {
        let Some(name) = flag_name(token) else {
            continue;
        };
        let value = value_after(args, index);
        match pairs.iter_mut().find(|(k, _)| k == name) {
            Some(existing) => existing.1 = value,
            None => pairs.push((name.to_string(), value)),
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_arg() {
        let argv = args(&["serve", "--port", "8080", "--host", "kafka:8082"]);
        assert_eq!(read_arg(&argv, "port").as_deref(), Some("8080"));
        assert_eq!(read_arg(&argv, "host").as_deref(), Some("kafka:8082"));
        assert_eq!(read_arg(&argv, "empty_variable"), None);
        assert_eq!(read_arg(&argv, "serve"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let argv = args(&["--port", "1", "--port", "2"]);
        assert_eq!(read_arg(&argv, "port").as_deref(), Some("1"));
    }

    #[test]
    fn test_flag_without_value() {
        let argv = args(&["--verbose", "--port", "80", "--dry-run"]);
        assert_eq!(read_arg(&argv, "verbose").as_deref(), Some(""));
        assert_eq!(read_arg(&argv, "dry-run").as_deref(), Some(""));
    }

    #[test]
    fn test_negative_number_is_a_value() {
        let argv = args(&["--offset", "-5"]);
        assert_eq!(read_arg(&argv, "offset").as_deref(), Some("-5"));
    }

    #[test]
    fn test_read_all_args_later_wins() {
        let argv = args(&["pos", "--a", "1", "--b", "x", "--a", "2", "--flag"]);
        let pairs = read_all_args(&argv);
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "x".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }
}

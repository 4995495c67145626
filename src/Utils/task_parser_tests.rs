/////////////////////////////TESTS////////////////////////////////////////////////////
/*
document level tests:
full document with comments
syntax errors
empty documents
decimal comma, lists and rows
key checks
file based parsing
*/

#[cfg(test)]
mod tests {
    use crate::Utils::task_parser::{
        Entry, Section, TaskError, parse_document, parse_real_list, parse_rows, parse_task_file,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = "\
// root of a cubic
bisection
function: x^3 - 9x + 4
interval: 0; 1
# a linear system
linear
  matrix : 2; 1 | 1; 3
  rhs: 3; 5

% the end
";

    fn section(title: &str, entries: &[(&str, &str)]) -> Section {
        Section {
            title: title.to_string(),
            entries: entries
                .iter()
                .map(|(key, value)| Entry {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_full_document() {
        let sections = parse_document(DOCUMENT).unwrap();
        assert_eq!(
            sections,
            vec![
                section(
                    "bisection",
                    &[("function", "x^3 - 9x + 4"), ("interval", "0; 1")]
                ),
                section("linear", &[("matrix", "2; 1 | 1; 3"), ("rhs", "3; 5")]),
            ]
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let sections = parse_document("evaluate\r\nfunction: x\r\npoints: 1; 2\r\n").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].get("points"), Some("1; 2"));
    }

    #[test]
    fn test_syntax_error() {
        // a title without entries
        assert_eq!(
            parse_document("evaluate\nscan\nfunction: x"),
            Err(TaskError::Syntax {
                line: "evaluate".to_string()
            })
        );
        // an entry before any title
        assert!(matches!(
            parse_document("function: x\nevaluate\npoints: 1"),
            Err(TaskError::Syntax { .. })
        ));
        // a line that is neither a title nor an entry
        assert!(matches!(
            parse_document("evaluate\nfunction: x\n1 + 2 = 3"),
            Err(TaskError::Syntax { line }) if line == "1 + 2 = 3"
        ));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_document(""), Err(TaskError::Empty));
        assert_eq!(parse_document("// only\n# comments\n\n"), Err(TaskError::Empty));
    }

    #[test]
    fn test_numeric_values() {
        let (_, list) = parse_real_list("1; 2,5; -3e2").unwrap();
        assert_eq!(list, vec![1.0, 2.5, -300.0]);
        let (_, rows) = parse_rows("2; 1 | 1,5; 3").unwrap();
        assert_eq!(rows, vec![vec![2.0, 1.0], vec![1.5, 3.0]]);

        let s = section(
            "scan",
            &[
                ("interval", "-1,5; 2.5"),
                ("tolerance", "1e-8"),
                ("steps", "1; 0,1;"),
                ("matrix", "1; 2 | 3; 4"),
                ("max_iterations", "50"),
            ],
        );
        assert_eq!(s.reals("interval"), Ok(Some(vec![-1.5, 2.5])));
        assert_eq!(s.real("tolerance"), Ok(Some(1e-8)));
        assert_eq!(s.rows("matrix"), Ok(Some(vec![vec![1.0, 2.0], vec![3.0, 4.0]])));
        assert_eq!(s.count("max_iterations"), Ok(Some(50)));
        assert_eq!(s.real("absent"), Ok(None));
        // a trailing separator leaves an empty number
        assert!(matches!(
            s.reals("steps"),
            Err(TaskError::InvalidValue { key, .. }) if key == "steps"
        ));
        // a list is not a single number
        assert!(s.real("interval").is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        let s = section(
            "bisection",
            &[
                ("interval", "0; abc"),
                ("tolerance", "1,5.2"),
                ("max_iterations", "2.5"),
            ],
        );
        assert!(s.reals("interval").is_err());
        assert!(s.real("tolerance").is_err());
        assert_eq!(
            s.count("max_iterations"),
            Err(TaskError::InvalidValue {
                section: "bisection".to_string(),
                key: "max_iterations".to_string(),
                value: "2.5".to_string(),
                expected: "a non-negative integer".to_string(),
            })
        );
    }

    #[test]
    fn test_key_checks() {
        let s = section("evaluate", &[("function", "x"), ("points", "1")]);
        assert!(s.check_keys(&["function", "points"]).is_ok());
        assert_eq!(s.require("function"), Ok("x"));
        assert_eq!(
            s.require("interval"),
            Err(TaskError::MissingKey {
                section: "evaluate".to_string(),
                key: "interval".to_string()
            })
        );
        assert_eq!(
            s.check_keys(&["function"]),
            Err(TaskError::UnknownKey {
                section: "evaluate".to_string(),
                key: "points".to_string()
            })
        );
        let twice = section("evaluate", &[("function", "x"), ("function", "2x")]);
        assert_eq!(
            twice.check_keys(&["function", "points"]),
            Err(TaskError::DuplicateKey {
                section: "evaluate".to_string(),
                key: "function".to_string()
            })
        );
    }

    #[test]
    fn test_parse_task_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", DOCUMENT).unwrap();
        let sections = parse_task_file(file.path()).unwrap();
        assert_eq!(sections, parse_document(DOCUMENT).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(matches!(parse_task_file(&missing), Err(TaskError::Io(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = TaskError::MissingKey {
            section: "linear".to_string(),
            key: "rhs".to_string(),
        };
        assert_eq!(err.to_string(), "Section 'linear' needs the key 'rhs'");
        assert!(
            TaskError::UnknownSection("solve".to_string())
                .to_string()
                .contains("'solve'")
        );
    }
}

/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using a custom lookup function.
///
/// This is the implementation behind [`substitute_env`]; injecting the lookup
/// keeps it testable without mutating the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find('}') {
            Some(end) if end > 0 => {
                let var_name = &after_open[..end];
                match lookup(var_name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        // Leave unresolved placeholder as-is.
                        result.push_str("${");
                        result.push_str(var_name);
                        result.push('}');
                    },
                }
                rest = &after_open[end + 1..];
            },
            _ => {
                // Malformed (`${}` or unclosed) — emit literally and move on.
                result.push_str("${");
                rest = after_open;
            },
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "REPRISE_TEST_VAR" => Some("hello".to_string()),
            "REPRISE_FACTOR" => Some("1.4".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("key=${REPRISE_TEST_VAR}", lookup),
            "key=hello"
        );
    }

    #[test]
    fn substitutes_multiple_vars() {
        assert_eq!(
            substitute_env_with(
                "escalation_factor = ${REPRISE_FACTOR} # ${REPRISE_TEST_VAR}",
                lookup
            ),
            "escalation_factor = 1.4 # hello"
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${REPRISE_NONEXISTENT_XYZ}", lookup),
            "${REPRISE_NONEXISTENT_XYZ}"
        );
    }

    #[test]
    fn leaves_malformed_placeholders() {
        assert_eq!(substitute_env_with("${}", lookup), "${}");
        assert_eq!(substitute_env_with("tail ${unclosed", lookup), "tail ${unclosed");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}

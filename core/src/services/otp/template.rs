//! Placeholder substitution for notification templates.
//!
//! Deliberately minimal: literal `{{name}}` replacement, no escaping, no
//! loops, no partials. Placeholders without a supplied value are left
//! verbatim.

/// `{{password}}` - the pin, used by SMS and plain email
pub const PASSWORD: &str = "password";
/// `{{token}}` - the link token, used by email links
pub const TOKEN: &str = "token";
/// `{{userid}}` - the recipient id, used by email links
pub const USERID: &str = "userid";

/// Substitute named placeholders into a template
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_placeholder() {
        let body = render("Your one-time pin is {{password}}", &[(PASSWORD, "123456")]);
        assert_eq!(body, "Your one-time pin is 123456");
    }

    #[test]
    fn test_multiple_placeholders_and_repeats() {
        let body = render(
            "{{token}} for {{userid}} ({{token}})",
            &[(TOKEN, "abc"), (USERID, "42")],
        );
        assert_eq!(body, "abc for 42 (abc)");
    }

    #[test]
    fn test_missing_placeholder_left_verbatim() {
        let body = render("Hello {{name}}, pin {{password}}", &[(PASSWORD, "9")]);
        assert_eq!(body, "Hello {{name}}, pin 9");
    }

    #[test]
    fn test_no_escaping() {
        let body = render("<b>{{password}}</b>", &[(PASSWORD, "<i>1</i>")]);
        assert_eq!(body, "<b><i>1</i></b>");
    }
}

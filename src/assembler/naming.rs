/// Turn a document title into a test name: every word capitalized, then
/// every character outside `[A-Za-z0-9]` replaced with `_`
pub fn normalize_title(title: &str) -> String {
    let mut at_word_start = true;
    title
        .chars()
        .map(|c| {
            let c = if at_word_start { c.to_ascii_uppercase() } else { c };
            at_word_start = matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c');
            if c.is_ascii_alphanumeric() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Class and method identifiers derived from a test name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNames {
    pub class_name: String,
    pub method_name: String,
}

impl TestNames {
    pub fn new(class_prefix: &str, test_name: &str) -> Self {
        Self {
            class_name: format!("{}{}Test", class_prefix, test_name),
            method_name: format!("test{}", test_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Login"), "Login");
        assert_eq!(normalize_title("add item to cart"), "Add_Item_To_Cart");
        assert_eq!(normalize_title("smoke-test #2"), "Smoke_test__2");
    }

    #[test]
    fn test_normalize_keeps_inner_case() {
        assert_eq!(normalize_title("openID signIn"), "OpenID_SignIn");
    }

    #[test]
    fn test_names() {
        let names = TestNames::new("Acme_", "Login");
        assert_eq!(names.class_name, "Acme_LoginTest");
        assert_eq!(names.method_name, "testLogin");
    }
}

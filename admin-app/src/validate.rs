//! Field-local form validators. Each returns `None` when the value is
//! acceptable and `Some(message)` otherwise; nothing here touches the
//! network.

pub fn required(value: &str, field_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field_name} is required"));
    }
    None
}

pub fn email(value: &str) -> Option<String> {
    let invalid = Some("Please enter a valid email address".to_string());
    if value.chars().any(char::is_whitespace) {
        return invalid;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return invalid;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return invalid;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => None,
        _ => invalid,
    }
}

pub fn min_length(value: &str, min: usize, field_name: &str) -> Option<String> {
    if value.chars().count() < min {
        return Some(format!(
            "{field_name} must be at least {min} characters long"
        ));
    }
    None
}

pub fn max_length(value: &str, max: usize, field_name: &str) -> Option<String> {
    if value.chars().count() > max {
        return Some(format!("{field_name} must not exceed {max} characters"));
    }
    None
}

pub fn numeric(value: &str, field_name: &str) -> Option<String> {
    if value.trim().parse::<f64>().is_err() {
        return Some(format!("{field_name} must be a valid number"));
    }
    None
}

pub fn positive_number(value: &str, field_name: &str) -> Option<String> {
    if let Some(message) = numeric(value, field_name) {
        return Some(message);
    }
    if value.trim().parse::<f64>().is_ok_and(|n| n < 0.0) {
        return Some(format!("{field_name} must be a positive number"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(required("", "Name").is_some());
        assert!(required("   ", "Name").is_some());
        assert!(required("Pizza", "Name").is_none());
    }

    #[test]
    fn email_shape() {
        assert!(email("kitchen@example.com").is_none());
        assert!(email("not-an-email").is_some());
        assert!(email("a@b").is_some());
        assert!(email("has space@example.com").is_some());
    }

    #[test]
    fn length_bounds() {
        assert!(min_length("a", 2, "Name").is_some());
        assert!(min_length("ab", 2, "Name").is_none());
        assert!(max_length("abcdef", 5, "Name").is_some());
    }

    #[test]
    fn numbers() {
        assert!(numeric("12.5", "Quantity").is_none());
        assert!(numeric("twelve", "Quantity").is_some());
        assert!(positive_number("-3", "Quantity").is_some());
        assert!(positive_number("0", "Quantity").is_none());
        assert!(positive_number("17", "Quantity").is_none());
    }
}

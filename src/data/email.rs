/// Whether `email` is an acceptable contact address.
///
/// All of the following must hold:
/// * exactly one `@`, and the character right after it is not `.`
/// * at least one `.`
/// * neither starts nor ends with `.` or `@`
/// * ASCII only
pub fn is_valid_email(email: &str) -> bool {
    if !email.is_ascii() {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    email.contains('.')
        && !local.is_empty()
        && !local.starts_with('.')
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

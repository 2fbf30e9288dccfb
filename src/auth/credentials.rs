//! Rules for usernames and new passwords.

pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;

/// Lowercased username, or why it is unusable.
pub fn normalize_username(raw: &str) -> Result<String, &'static str> {
    let username = raw.trim().to_lowercase();

    if username.is_empty() {
        return Err("Username is required.");
    }
    if username.chars().count() > USERNAME_MAX {
        return Err("Username must be 150 characters or fewer.");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err("Username may only contain letters, digits and @/./+/-/_ characters.");
    }

    Ok(username)
}

pub fn check_new_password(password1: &str, password2: &str) -> Result<(), &'static str> {
    if password1 != password2 {
        return Err("The two password fields didn't match.");
    }
    if password1.chars().count() < PASSWORD_MIN {
        return Err("This password is too short. It must contain at least 8 characters.");
    }
    if password1.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.");
    }
    Ok(())
}

//! Common validation utilities for StudyBuddy domain values.

use validator::ValidationError;

/// Weekday keys accepted in availability windows.
const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Validates a username: 3-30 characters, letters, digits, underscore.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let ok_len = (3..=30).contains(&username.len());
    let ok_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if ok_len && ok_chars {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message = Some("Username must be 3-30 characters of letters, digits or underscore".into());
        Err(err)
    }
}

/// Validates a course code such as `COMP302` or `MATH240`:
/// 3-4 uppercase letters followed by 3 digits.
pub fn validate_course_code(code: &str) -> Result<(), ValidationError> {
    let letters = code.chars().take_while(|c| c.is_ascii_uppercase()).count();
    let digits = code.chars().skip(letters).collect::<Vec<_>>();

    let ok = (3..=4).contains(&letters)
        && digits.len() == 3
        && digits.iter().all(|c| c.is_ascii_digit());

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("course_code_format");
        err.message = Some("Course code must be 3-4 uppercase letters followed by 3 digits".into());
        Err(err)
    }
}

/// Validates a weekday key (`mon` .. `sun`).
pub fn validate_weekday(day: &str) -> Result<(), ValidationError> {
    if WEEKDAYS.contains(&day) {
        Ok(())
    } else {
        let mut err = ValidationError::new("weekday");
        err.message = Some("Day must be one of mon, tue, wed, thu, fri, sat, sun".into());
        Err(err)
    }
}

/// Validates a time of day in `HH:MM` 24-hour format.
pub fn validate_time_of_day(time: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = time.split(':').collect();

    let ok = parts.len() == 2
        && parts[0].len() == 2
        && parts[1].len() == 2
        && matches!(parts[0].parse::<u32>(), Ok(h) if h < 24)
        && matches!(parts[1].parse::<u32>(), Ok(m) if m < 60);

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_of_day");
        err.message = Some("Time must be HH:MM in 24-hour format".into());
        Err(err)
    }
}

/// Validates that an availability window starts before it ends.
/// Both inputs must already be valid `HH:MM` strings.
pub fn validate_time_window(start: &str, end: &str) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_window");
        err.message = Some("Window start must be before its end".into());
        Err(err)
    }
}

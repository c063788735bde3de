//! Input validation for posts, comments and categories

use uuid::Uuid;

/// Validate post title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    let length = title.chars().count();
    if !(3..=200).contains(&length) {
        return Err("Title must be between 3 and 200 characters".to_string());
    }

    Ok(())
}

/// Validate post content
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }

    if content.chars().count() < 10 {
        return Err("Content must be at least 10 characters long".to_string());
    }

    Ok(())
}

/// Parse the category identifier supplied with a post
pub fn parse_category_id(category: &str) -> Result<Uuid, String> {
    let category = category.trim();
    if category.is_empty() {
        return Err("Category ID is required".to_string());
    }

    Uuid::parse_str(category).map_err(|_| "Category ID must be a valid identifier".to_string())
}

/// Validate comment body
pub fn validate_comment(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Comment content cannot be empty".to_string());
    }

    Ok(())
}

/// Validate category name
pub fn validate_category_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name is required".to_string());
    }

    if name.trim().chars().count() > 50 {
        return Err("Category name must be at most 50 characters long".to_string());
    }

    Ok(())
}

//! Pure formatting functions for UI output.
//!
//! Everything here only prints; prompting lives in the parent module.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::ChangeCategory;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Numbered list of the categories offered for a pending change
pub fn category_menu() -> String {
    let mut menu = String::new();
    for (i, category) in ChangeCategory::SELECTABLE.iter().enumerate() {
        menu.push_str(&format!(
            "  {:>2}. {:<9} {}\n",
            i + 1,
            category.token(),
            category.summary()
        ));
    }
    menu
}

/// Display the proposed tag change (or initial tag).
///
/// # Arguments
/// * `old_tag` - Previous tag (None if this is the initial tag)
/// * `new_tag` - The new tag being created
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Proposed Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Closing summary after a successful run
pub fn display_published(tag: &str, branch: &str) {
    println!(
        "\n{} Successfully published tag {} for branch {}\n",
        style("✓").green(),
        style(tag).bold(),
        branch
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_menu_lists_every_selectable_category() {
        let menu = category_menu();
        assert_eq!(menu.lines().count(), ChangeCategory::SELECTABLE.len());
        assert!(menu.lines().next().unwrap().contains("1. feat"));
        assert!(menu.contains("10. ci"));
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_proposed_tag(Some("v1.0.0"), "v1.1.0");
        display_proposed_tag(None, "v0.1.0");
    }
}

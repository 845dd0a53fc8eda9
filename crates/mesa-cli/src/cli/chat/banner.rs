//! Welcome banner shown when a chat starts.

use console::style;

/// What the banner shows about the current chat.
pub struct BannerInfo<'a> {
    pub restaurant: Option<&'a str>,
    pub restaurant_id: Option<&'a str>,
    pub base_url: &'a str,
    /// JWT subject of the signed-in user, when known.
    pub signed_in_as: Option<&'a str>,
    pub require_auth: bool,
    pub streaming: bool,
}

pub fn print_welcome_banner(info: &BannerInfo<'_>) {
    let restaurant = match (info.restaurant, info.restaurant_id) {
        (Some(name), Some(id)) => format!("{name} ({id})"),
        (None, Some(id)) => id.to_string(),
        _ => "no restaurant selected".to_string(),
    };
    let user = match (info.signed_in_as, info.require_auth) {
        (Some(sub), _) => sub.to_string(),
        (None, true) => "not signed in".to_string(),
        (None, false) => "auth disabled".to_string(),
    };

    println!();
    println!("  {} {}", style("*").cyan(), style(&restaurant).cyan().bold());
    println!();
    println!("  {}  {}", style("Backend:").bold(), style(info.base_url).dim());
    println!("  {}     {}", style("User:").bold(), style(&user).dim());
    println!(
        "  {}  {}",
        style("Replies:").bold(),
        style(if info.streaming { "streamed" } else { "instant" }).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

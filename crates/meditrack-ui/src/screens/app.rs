//! App shell: current destination above the bottom bar.

use super::navigation::Navigator;
use crate::view::{Node, View};

/// Placeholder body for destinations without a screen yet.
pub fn placeholder(title: &str) -> View {
    View::new(Node::column(vec![Node::text(format!("{title} Screen"))]))
}

pub fn render(navigator: &Navigator, content: View) -> View {
    View::new(Node::column(vec![
        content.root.tagged(navigator.current().path()),
        navigator.bottom_bar(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::screens::navigation::Route;

    #[test]
    fn test_shell_wraps_content() {
        let mut navigator = Navigator::new();
        navigator.navigate(Route::Appointments);
        let view = render(&navigator, placeholder(Route::Appointments.title()));

        assert!(view.find_by_tag("appointments").is_some());
        assert!(view.contains_text("Appointments Screen"));
        assert_eq!(view.click("nav_dashboard"), Some(Intent::Navigate(Route::Dashboard)));
    }
}

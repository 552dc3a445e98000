use console::style;

/// Palette for report and progress rendering.
///
/// Outcome coloring is the one domain rule here: success is green, failure
/// is red, anything pending or noteworthy is yellow.
pub fn outcome(text: impl std::fmt::Display, success: bool) -> console::StyledObject<String> {
    if success {
        style(text.to_string()).bright().green()
    } else {
        style(text.to_string()).bright().red()
    }
}

pub fn highlight(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn link(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn heading(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn banner(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_keeps_the_rendered_text() {
        assert!(outcome("success", true).to_string().contains("success"));
        assert!(outcome("failure", false).to_string().contains("failure"));
    }
}

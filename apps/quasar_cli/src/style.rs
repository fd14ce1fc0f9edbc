//! ANSI terminal styling for diagnostic output.
//!
//! Thin escape-code wrappers; every helper resets at the end. Callers
//! decide whether color is appropriate (see [`crate::report`]).

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const GREEN: &'static str = "\x1b[32m";

    pub fn bold(s: &str) -> String {
        format!("{}{}{}", Self::BOLD, s, Self::RESET)
    }

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }

    pub fn bold_yellow(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::YELLOW, s, Self::RESET)
    }

    pub fn blue(s: &str) -> String {
        format!("{}{}{}", Self::BLUE, s, Self::RESET)
    }

    pub fn green(s: &str) -> String {
        format!("{}{}{}", Self::GREEN, s, Self::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_red_wraps_and_resets() {
        let styled = Style::bold_red("error");
        assert!(styled.starts_with("\x1b[1m\x1b[31m"));
        assert!(styled.ends_with("\x1b[0m"));
        assert!(styled.contains("error"));
    }

    #[test]
    fn green_wraps_and_resets() {
        let styled = Style::green("ok");
        assert!(styled.contains("\x1b[32m"));
        assert!(styled.ends_with("\x1b[0m"));
    }
}

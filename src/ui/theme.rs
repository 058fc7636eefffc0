use ratatui::style::{Color, Modifier, Style};

/// Colors for the terminal front end. The accent follows the active zone.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,
    pub accent: Color,

    // Zone rail
    pub rail_style: Style,
    pub rail_active_style: Style,
    pub rail_pending_style: Style,

    // Header
    pub zone_number_style: Style,
    pub metaphor_style: Style,
    pub tagline_style: Style,
    pub description_style: Style,
    pub insight_label_style: Style,
    pub insight_value_style: Style,

    // Conversation
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_label_style: Style,
    pub assistant_text_style: Style,
    pub system_text_style: Style,

    // Input area
    pub suggestion_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
}

impl Theme {
    /// Dark palette with `accent` used for highlights and borders.
    pub fn with_accent(accent: Color) -> Self {
        Theme {
            background_color: Color::Black,
            accent,

            rail_style: Style::default().fg(Color::Gray),
            rail_active_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            rail_pending_style: Style::default().fg(accent).add_modifier(Modifier::ITALIC),

            zone_number_style: Style::default().fg(Color::DarkGray),
            metaphor_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            tagline_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::ITALIC),
            description_style: Style::default().fg(Color::Gray),
            insight_label_style: Style::default().fg(Color::DarkGray),
            insight_value_style: Style::default().fg(accent),

            user_prefix_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_label_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),

            suggestion_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(accent),
            input_title_style: Style::default().fg(Color::Gray),
        }
    }

    /// Theme for a zone's `accent_color`; unparsable values fall back to cyan.
    pub fn for_accent_hex(hex: &str) -> Self {
        Self::with_accent(parse_hex_color(hex).unwrap_or(Color::Cyan))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_accent(Color::Cyan)
    }
}

/// Parses `#rgb` or `#rrggbb`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zones::ZoneRegistry;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(
            parse_hex_color("#f59e0b"),
            Some(Color::Rgb(0xf5, 0x9e, 0x0b))
        );
        assert_eq!(parse_hex_color(" #fff "), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("f59e0b"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn every_builtin_zone_has_a_usable_accent() {
        let registry = ZoneRegistry::builtin().unwrap();
        for persona in registry.iter() {
            assert!(
                matches!(parse_hex_color(&persona.accent_color), Some(Color::Rgb(..))),
                "{} has accent {:?}",
                persona.id,
                persona.accent_color
            );
        }
    }

    #[test]
    fn bad_accent_falls_back_to_cyan() {
        assert_eq!(Theme::for_accent_hex("orange").accent, Color::Cyan);
    }
}

use std::fs;

use quizdeck::chart::{ChartPalette, Rgb};
use quizdeck::config::Config;
use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub correct: String,
    pub incorrect: String,
    pub selected_bg: String,
    pub mastery_low: String,
    pub mastery_high: String,
    pub chart_stroke: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes override bundled ones of the same name
        let user_theme_path = Config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path)
            && let Ok(theme) = toml::from_str::<Theme>(&content)
        {
            return Some(theme);
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("terminal-default").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_dim: "#585b70".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            correct: "#a6e3a1".to_string(),
            incorrect: "#f38ba8".to_string(),
            selected_bg: "#313244".to_string(),
            mastery_low: "#f38ba8".to_string(),
            mastery_high: "#a6e3a1".to_string(),
            chart_stroke: "#11111b".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_rgb(hex: &str) -> Rgb {
        Rgb::from_hex(hex).unwrap_or(Rgb(255, 255, 255))
    }

    pub fn parse_color(hex: &str) -> Color {
        let Rgb(r, g, b) = Self::parse_rgb(hex);
        Color::Rgb(r, g, b)
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn incorrect(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn selected_bg(&self) -> Color { Self::parse_color(&self.selected_bg) }

    pub fn chart_palette(&self) -> ChartPalette {
        ChartPalette {
            low: Self::parse_rgb(&self.mastery_low),
            high: Self::parse_rgb(&self.mastery_high),
            stroke: Self::parse_rgb(&self.chart_stroke),
            text: Self::parse_rgb(&self.fg),
        }
    }
}

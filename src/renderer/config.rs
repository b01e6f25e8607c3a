//! Output options for the SVG backend

use crate::stylesheet::Rgba;

/// How a scene is serialised to SVG
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Emit the `<?xml ...?>` declaration
    pub standalone: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Prepended to every class and to the shadow filter id
    pub class_prefix: Option<String>,

    /// Solid colour painted under everything; `None` leaves the canvas transparent
    pub backdrop: Option<Rgba>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("vd-".to_string()),
            backdrop: None,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Bare class names, for hosts with their own stylesheet
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_backdrop(mut self, color: Rgba) -> Self {
        self.backdrop = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert!(config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("vd-".to_string()));
        assert_eq!(config.backdrop, None);
    }

    #[test]
    fn test_embedded_config() {
        let config = SvgConfig::new()
            .with_standalone(false)
            .with_pretty_print(false)
            .with_class_prefix("my-")
            .with_backdrop(Rgba::new(10, 10, 20, 255));

        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("my-".to_string()));
        assert_eq!(config.backdrop, Some(Rgba::new(10, 10, 20, 255)));
    }
}

use crate::lessons;

/// Page configuration, read from the URL query string, e.g.
/// `?lesson=solar_system&clear=%23202030&paused=true`.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub lesson: String,

    // Id of the canvas element to draw to. Created if missing.
    pub canvas: String,
    pub clear: [f32; 4],
    pub paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lesson: lessons::DEFAULT.to_string(),
            canvas: String::from("canvas"),
            clear: [0.0, 0.0, 0.0, 1.0],
            paused: false,
        }
    }
}

impl Config {
    /// Build a config from (key, value) pairs. Bad values keep the default
    /// and produce a warning; unknown keys are ignored.
    pub fn from_params<I, K, V>(params: I) -> (Config, Vec<String>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        for (key, value) in params {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "lesson" => {
                    if lessons::is_known(value) {
                        config.lesson = value.to_string();
                    } else {
                        warnings.push(format!(
                            "Unknown lesson \"{value}\", using {}.",
                            lessons::DEFAULT
                        ));
                    }
                }
                "canvas" if !value.is_empty() => config.canvas = value.to_string(),
                "clear" => match parse_colour(value) {
                    Some(colour) => config.clear = colour,
                    None => warnings.push(format!("Invalid clear colour \"{value}\".")),
                },
                "paused" => match parse_bool(value) {
                    Some(paused) => config.paused = paused,
                    None => warnings.push(format!("Invalid value for paused: \"{value}\".")),
                },
                _ => {}
            }
        }

        (config, warnings)
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`, the `#` being optional.
pub fn parse_colour(hex: &str) -> Option<[f32; 4]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }

    let mut colour = [1.0; 4];
    for (i, channel) in colour.iter_mut().enumerate().take(hex.len() / 2) {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        *channel = byte as f32 / 255.0;
    }
    Some(colour)
}

/// An empty value counts as true, so `?paused` works.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let (config, warnings) = Config::from_params(Vec::<(String, String)>::new());
        assert_eq!(config, Config::default());
        assert_eq!(config.lesson, "triangle");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_from_params() {
        let (config, warnings) = Config::from_params([
            ("lesson", "solar_system"),
            ("canvas", "gl"),
            ("clear", "#ff0000"),
            ("paused", ""),
            ("volume", "11"),
        ]);
        assert!(warnings.is_empty());
        assert_eq!(config.lesson, "solar_system");
        assert_eq!(config.canvas, "gl");
        assert_eq!(config.clear, [1.0, 0.0, 0.0, 1.0]);
        assert!(config.paused);
    }

    #[test]
    fn test_bad_params() {
        let (config, warnings) = Config::from_params([
            ("lesson", "teapot"),
            ("clear", "red"),
            ("paused", "maybe"),
            ("canvas", ""),
        ]);
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("teapot"));
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(parse_colour("00ff00"), Some([0.0, 1.0, 0.0, 1.0]));
        assert_eq!(parse_colour("#00000000"), Some([0.0; 4]));
        assert_eq!(parse_colour("#fff"), None);
        assert_eq!(parse_colour("#gg0000"), None);
        assert_eq!(parse_colour("#ffé00"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("2"), None);
    }
}

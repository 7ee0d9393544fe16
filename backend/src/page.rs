//! Home page rendering: one input per model feature.

/// Pollutant labels in the order they are tried. First match wins.
pub const POLLUTANT_LABELS: [&str; 12] = [
    "PM2.5", "PM10", "NO", "NO2", "NOx", "NH3", "CO", "SO2", "O3", "Benzene", "Toluene", "Xylene",
];

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const FIELDS_SLOT: &str = "{{ fields }}";

/// Simplified pollutant label for a feature column, or the column itself.
///
/// An occurrence that is the start of a longer label does not count, so "NO"
/// does not capture "NO2" or "NOx" even though it is tried first.
pub fn display_name(feature: &str) -> &str {
    POLLUTANT_LABELS
        .iter()
        .copied()
        .find(|label| contains_code(feature, label))
        .unwrap_or(feature)
}

fn contains_code(haystack: &str, code: &str) -> bool {
    haystack.match_indices(code).any(|(start, _)| {
        let rest = &haystack[start..];
        !POLLUTANT_LABELS.iter().any(|longer| {
            longer.len() > code.len() && longer.starts_with(code) && rest.starts_with(longer)
        })
    })
}

/// Feature names paired with their display labels, in feature order.
pub fn display_names(features: &[String]) -> Vec<(&str, &str)> {
    features
        .iter()
        .map(|feature| (feature.as_str(), display_name(feature)))
        .collect()
}

pub fn render_index(features: &[String]) -> String {
    let fields: String = display_names(features)
        .into_iter()
        .map(|(name, label)| {
            let name = escape_html(name);
            format!(
                concat!(
                    "      <div class=\"field\">\n",
                    "        <label for=\"{name}\">{label}</label>\n",
                    "        <input type=\"number\" step=\"any\" id=\"{name}\" name=\"{name}\" required>\n",
                    "      </div>\n",
                ),
                name = name,
                label = escape_html(label),
            )
        })
        .collect();

    INDEX_TEMPLATE.replace(FIELDS_SLOT, fields.trim_end())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_stripped_from_labels() {
        assert_eq!(display_name("PM2.5 (µg/m³)"), "PM2.5");
        assert_eq!(display_name("PM10 (µg/m³)"), "PM10");
        assert_eq!(display_name("CO (mg/m³)"), "CO");
        assert_eq!(display_name("Benzene_ppb"), "Benzene");
    }

    #[test]
    fn nitrogen_codes_do_not_collide() {
        assert_eq!(display_name("NO"), "NO");
        assert_eq!(display_name("NO2"), "NO2");
        assert_eq!(display_name("NOx"), "NOx");
        assert_eq!(display_name("NO (µg/m³)"), "NO");
        assert_eq!(display_name("NO2 (µg/m³)"), "NO2");
        assert_eq!(display_name("NOx (ppb)"), "NOx");
    }

    #[test]
    fn first_label_in_order_wins() {
        // both PM2.5 and PM10 appear, PM2.5 is tried first
        assert_eq!(display_name("PM10/PM2.5 ratio"), "PM2.5");
        assert_eq!(display_name("SO2 and O3"), "SO2");
    }

    #[test]
    fn unknown_features_keep_their_name() {
        assert_eq!(display_name("Temperature"), "Temperature");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn codes_that_are_not_labels_still_match_substrings() {
        assert_eq!(display_name("CO2"), "CO");
        assert_eq!(display_name("NO3"), "NO");
        assert_eq!(display_name("NO and NOx"), "NO");
    }

    #[test]
    fn display_names_keep_feature_order() {
        let features = vec!["Xylene".to_string(), "PM2.5".to_string(), "Humidity".to_string()];
        assert_eq!(
            display_names(&features),
            vec![("Xylene", "Xylene"), ("PM2.5", "PM2.5"), ("Humidity", "Humidity")]
        );
    }

    #[test]
    fn index_has_one_input_per_feature() {
        let features = vec!["PM2.5 (µg/m³)".to_string(), "NOx".to_string(), "O3".to_string()];
        let html = render_index(&features);

        assert_eq!(html.matches("<input type=\"number\"").count(), 3);
        assert!(html.contains("name=\"PM2.5 (µg/m³)\""));
        assert!(html.contains(">PM2.5</label>"));
        assert!(html.contains(">NOx</label>"));
        assert!(!html.contains(FIELDS_SLOT));
    }

    #[test]
    fn feature_names_are_escaped() {
        let features = vec!["a\"><script>".to_string()];
        let html = render_index(&features);
        assert!(html.contains("name=\"a&quot;&gt;&lt;script&gt;\""));
        assert!(!html.contains("a\"><script>"));
    }
}

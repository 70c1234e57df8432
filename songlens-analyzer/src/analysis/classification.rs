//! Label rules for the aggregate reports
//!
//! Every threshold is a strict comparison evaluated top to bottom; the first
//! matching rule wins. Boundary values therefore fall into the *lower* label
//! (e.g. an artist diversity of exactly 0.7 is "Medium", not "High") except
//! for the explicitness rating, whose bands are half-open from below.

/// Ordered (patterns, label) rule for naming a collection's dominant style
#[derive(Debug, Clone, Copy)]
pub struct StyleRule {
    /// Substrings matched against the lowercase genre
    pub patterns: &'static [&'static str],
    pub label: &'static str,
}

/// Precedence matters: "pop rock" is Pop-oriented, "art rock" Rock-focused
pub const DOMINANT_STYLE_RULES: &[StyleRule] = &[
    StyleRule { patterns: &["pop"], label: "Pop-oriented" },
    StyleRule { patterns: &["rock"], label: "Rock-focused" },
    StyleRule { patterns: &["hip hop", "rap"], label: "Hip-Hop/Rap" },
    StyleRule { patterns: &["electronic", "edm"], label: "Electronic" },
    StyleRule { patterns: &["indie", "alternative"], label: "Indie/Alternative" },
    StyleRule { patterns: &["r&b", "soul"], label: "R&B/Soul" },
    StyleRule { patterns: &["country"], label: "Country" },
    StyleRule { patterns: &["jazz"], label: "Jazz" },
    StyleRule { patterns: &["classical"], label: "Classical" },
];

/// Classify the most frequent genre; title-cased genre when no rule matches
pub fn dominant_style(top_genre: Option<&str>) -> String {
    dominant_style_with(DOMINANT_STYLE_RULES, top_genre)
}

pub fn dominant_style_with(rules: &[StyleRule], top_genre: Option<&str>) -> String {
    let genre = match top_genre {
        Some(g) if !g.is_empty() => g,
        _ => return "Unknown".to_string(),
    };

    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| genre.contains(p)))
        .map(|rule| rule.label.to_string())
        .unwrap_or_else(|| title_case(genre))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
///
/// `"lo-fi beats"` → `"Lo-Fi Beats"`, `"80s synth"` → `"80S Synth"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Explicitness rating over the unrounded percentage
pub fn explicitness_rating(explicit_percentage: f64) -> &'static str {
    if explicit_percentage == 0.0 {
        "Family-Friendly"
    } else if explicit_percentage < 25.0 {
        "Mostly Clean"
    } else if explicit_percentage < 50.0 {
        "Mixed Content"
    } else if explicit_percentage < 75.0 {
        "Mostly Explicit"
    } else {
        "Explicit"
    }
}

pub fn diversity_level(artist_diversity: f64, unique_genres: usize) -> &'static str {
    if artist_diversity > 0.8 && unique_genres > 10 {
        "Very Diverse"
    } else if artist_diversity > 0.6 && unique_genres > 5 {
        "Diverse"
    } else if artist_diversity > 0.4 {
        "Moderately Diverse"
    } else {
        "Low Diversity"
    }
}

pub fn artist_diversity_label(artist_diversity: f64) -> &'static str {
    if artist_diversity > 0.7 {
        "High"
    } else if artist_diversity > 0.4 {
        "Medium"
    } else {
        "Low"
    }
}

/// Genre-count label used by the diversity report
pub fn genre_variety_label(unique_genres: usize) -> &'static str {
    if unique_genres > 10 {
        "Very Diverse"
    } else if unique_genres > 5 {
        "Diverse"
    } else if unique_genres > 2 {
        "Limited"
    } else {
        "Very Limited"
    }
}

/// Genre-count label used by the genre report
pub fn genre_spread_label(unique_genres: usize) -> &'static str {
    if unique_genres > 20 {
        "Very Diverse"
    } else if unique_genres > 10 {
        "Diverse"
    } else if unique_genres > 5 {
        "Moderately Diverse"
    } else {
        "Limited"
    }
}

pub fn popularity_label(average_popularity: f64) -> &'static str {
    if average_popularity > 70.0 {
        "Mainstream"
    } else if average_popularity > 50.0 {
        "Popular"
    } else if average_popularity > 30.0 {
        "Mixed"
    } else {
        "Underground/Niche"
    }
}

/// Era label; with no known years the collection is "Recent-focused"
pub fn era_label(year_range: i32, earliest: Option<i32>) -> &'static str {
    if year_range > 20 {
        "Multi-era"
    } else if earliest.map_or(false, |year| year > 2010) {
        "Modern"
    } else {
        "Recent-focused"
    }
}

pub fn alignment_label(match_percentage: f64) -> &'static str {
    if match_percentage > 50.0 {
        "Strong Match - This collection aligns well with your taste!"
    } else if match_percentage > 25.0 {
        "Moderate Match - Some overlap with your preferences"
    } else {
        "Low Match - This collection explores different territory"
    }
}

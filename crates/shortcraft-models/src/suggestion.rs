//! Publishing suggestions: titles, hashtags, sounds, and retention claims.
//!
//! The tables here are curated per content category. Picking an entry is the
//! caller's job (the engine draws with its seeded RNG); this module only owns
//! the data and the score-based decoration rules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::content::ContentLabel;

/// Baseline predicted viewer retention percentage.
pub const RETENTION_BASE: u8 = 75;
/// Random spread added on top of the baseline (exclusive upper bound).
pub const RETENTION_SPREAD: u8 = 20;
/// Retention reported for the short-source fallback clip.
pub const RETENTION_FALLBACK: u8 = 70;
/// Engagement boost percentage quoted in marketing copy.
pub const RETENTION_BOOST_CLAIM_PERCENT: u32 = 800;

/// Score above which a title gets the fire prefix.
pub const TITLE_FIRE_THRESHOLD: u8 = 90;
/// Score above which a title gets the lightning prefix.
pub const TITLE_BOLT_THRESHOLD: u8 = 80;

/// Candidate clip titles for a content category.
pub fn titles_for(label: ContentLabel) -> &'static [&'static str] {
    match label {
        ContentLabel::Educational => &[
            "This Will Blow Your Mind 🤯",
            "Nobody Talks About This",
            "The Secret They Don't Want You to Know",
            "I Wish I Knew This Sooner",
            "This Changes Everything",
            "Mind = Blown 🧠",
            "You've Been Doing This Wrong",
            "The Truth About This",
            "This Is Revolutionary",
        ],
        ContentLabel::Entertainment => &[
            "You Won't Believe What Happened",
            "Wait For It... 😱",
            "This Plot Twist Though",
            "I Can't Even... 💀",
            "This Is Pure Chaos",
            "Absolutely Unhinged",
            "Main Character Energy",
            "This Hit Different",
            "Not Me Crying 😭",
        ],
        ContentLabel::Tutorial => &[
            "This Hack Changed My Life",
            "Why Didn't I Know This Before?",
            "Game Changer Alert 🚨",
            "This Makes It So Easy",
            "Life Hack That Actually Works",
            "Stop Doing It The Hard Way",
            "This Will Save You Hours",
            "Genius Method Revealed",
        ],
        ContentLabel::Comedy => &[
            "I'm Deceased 💀",
            "This Sent Me",
            "Comedy Gold Right Here",
            "Can't Stop Laughing",
            "This Is Too Much 😂",
            "Peak Comedy Content",
            "Humor That Hits Different",
            "Absolutely Unserious",
        ],
        ContentLabel::Story => &[
            "Storytime: You're Not Ready",
            "The Ending Got Me 😳",
            "No One Believed Me Until Now",
            "This Story Lives Rent Free",
            "Wait Till The End",
            "POV: It Actually Happened",
            "Still Thinking About This",
        ],
        ContentLabel::Music => &[
            "This Sound Is Everything",
            "On Repeat All Day 🎧",
            "The Drop Goes Crazy",
            "Vocals That Hit Different",
            "Instant Playlist Add",
            "Turn It All The Way Up",
            "Certified Earworm",
        ],
    }
}

/// Suggested hashtag line for a content category.
pub fn hashtags_for(label: ContentLabel) -> &'static str {
    match label {
        ContentLabel::Educational => {
            "#LearnOnTikTok #Educational #DidYouKnow #MindBlown #Knowledge #Facts #Viral #ForYou #Learning #Science"
        }
        ContentLabel::Entertainment => {
            "#Viral #Entertainment #Funny #Amazing #Trending #ForYou #Fyp #Wow #Unbelievable #MustWatch"
        }
        ContentLabel::Tutorial => {
            "#LifeHack #Tutorial #Tips #HowTo #Helpful #DIY #Learn #Hack #Easy #Quick"
        }
        ContentLabel::Comedy => {
            "#Funny #Comedy #Laugh #Humor #Memes #LOL #Hilarious #DeadAss #Unhinged #Peak"
        }
        ContentLabel::Story => {
            "#Storytime #POV #TrueStory #Relatable #ForYou #Fyp #Emotional #PlotTwist #Drama #MustWatch"
        }
        ContentLabel::Music => {
            "#Music #NewMusic #Vibes #OnRepeat #Trending #Fyp #Audio #Playlist #Banger #Sound"
        }
    }
}

/// Prefix a title with an emoji when the clip scored high enough.
pub fn decorate_title(title: &str, total_score: u8) -> String {
    if total_score > TITLE_FIRE_THRESHOLD {
        format!("🔥 {title}")
    } else if total_score > TITLE_BOLT_THRESHOLD {
        format!("⚡ {title}")
    } else {
        title.to_string()
    }
}

/// A trending sound recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecommendedSound {
    /// Sound name as shown to the user
    pub name: String,
    /// One-line pitch for why to use it
    pub reason: String,
}

impl RecommendedSound {
    fn new(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// The current trending sound list, best match first.
pub fn recommended_sounds() -> Vec<RecommendedSound> {
    vec![
        RecommendedSound::new("Viral Beat 2025", "Perfect for your content type"),
        RecommendedSound::new("Trending Audio", "High engagement rate"),
        RecommendedSound::new("Algorithm Favorite", "Boosts reach"),
        RecommendedSound::new("Background Loop", "Enhances retention"),
        RecommendedSound::new("Popular Sound", "2.1M uses this week"),
    ]
}

/// Title, hashtags, and sound picks assembled for a finished clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClipSuggestion {
    /// Decorated title ready for publishing
    pub title: String,
    /// Space-separated hashtag line
    pub hashtags: String,
    /// Trending sounds, best match first
    pub sounds: Vec<RecommendedSound>,
}

impl ClipSuggestion {
    /// Assemble a suggestion from a category and score, with the title
    /// chosen by index into the category table.
    pub fn assemble(label: ContentLabel, title_index: usize, total_score: u8) -> Self {
        let titles = titles_for(label);
        let title = titles[title_index % titles.len()];
        Self {
            title: decorate_title(title, total_score),
            hashtags: hashtags_for(label).to_string(),
            sounds: recommended_sounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_has_titles_and_hashtags() {
        for label in ContentLabel::ALL {
            assert!(!titles_for(label).is_empty());
            assert!(hashtags_for(label).starts_with('#'));
        }
    }

    #[test]
    fn test_decorate_title_thresholds() {
        assert_eq!(decorate_title("Wow", 95), "🔥 Wow");
        assert_eq!(decorate_title("Wow", 85), "⚡ Wow");
        assert_eq!(decorate_title("Wow", 80), "Wow");
        assert_eq!(decorate_title("Wow", 42), "Wow");
    }

    #[test]
    fn test_assemble_wraps_index() {
        let count = titles_for(ContentLabel::Comedy).len();
        let a = ClipSuggestion::assemble(ContentLabel::Comedy, 0, 50);
        let b = ClipSuggestion::assemble(ContentLabel::Comedy, count, 50);
        assert_eq!(a.title, b.title);
        assert_eq!(a.sounds.len(), 5);
    }

    #[test]
    fn test_retention_constants() {
        assert!(RETENTION_BASE as u32 + RETENTION_SPREAD as u32 <= 100);
        assert!(RETENTION_FALLBACK < RETENTION_BASE);
    }
}

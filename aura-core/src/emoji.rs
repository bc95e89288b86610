//! Built-in emoji catalogue and its search filter.

/// One catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiEntry {
    /// The glyph itself.
    pub emoji: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Search keywords.
    pub keywords: &'static [&'static str],
}

macro_rules! emoji {
    ($glyph:expr, $name:expr, [$($kw:expr),* $(,)?]) => {
        EmojiEntry { emoji: $glyph, name: $name, keywords: &[$($kw),*] }
    };
}

/// Every emoji offered by the picker.
pub const EMOJI_CATALOG: &[EmojiEntry] = &[
    emoji!("😀", "Grinning Face", ["smile", "happy", "joy"]),
    emoji!("😂", "Face with Tears of Joy", ["laugh", "lol", "funny"]),
    emoji!("😍", "Smiling Face with Heart-Eyes", ["love", "crush", "adore"]),
    emoji!("😎", "Smiling Face with Sunglasses", ["cool", "sun", "confident"]),
    emoji!("🤔", "Thinking Face", ["hmm", "think", "consider"]),
    emoji!("😮", "Face with Open Mouth", ["wow", "surprise", "shock"]),
    emoji!("😢", "Crying Face", ["sad", "tear", "cry"]),
    emoji!("😡", "Pouting Face", ["angry", "mad", "rage"]),
    emoji!("🥳", "Partying Face", ["party", "celebrate", "birthday"]),
    emoji!("🤯", "Exploding Head", ["mind blown", "shock", "wow"]),
    emoji!("👍", "Thumbs Up", ["like", "approve", "yes", "ok"]),
    emoji!("👎", "Thumbs Down", ["dislike", "no", "disapprove"]),
    emoji!("👏", "Clapping Hands", ["applause", "bravo", "congrats"]),
    emoji!("🙌", "Raising Hands", ["hooray", "celebrate", "praise"]),
    emoji!("👀", "Eyes", ["look", "see", "watch"]),
    emoji!("👉", "Backhand Index Pointing Right", ["point", "right", "direction"]),
    emoji!("❤️", "Red Heart", ["love", "like", "heart"]),
    emoji!("🔥", "Fire", ["hot", "lit", "flame", "trending"]),
    emoji!("✨", "Sparkles", ["shiny", "magic", "new", "clean"]),
    emoji!("⭐", "Star", ["favorite", "rating", "night"]),
    emoji!("💯", "Hundred Points", ["perfect", "score", "100"]),
    emoji!("✅", "Check Mark Button", ["done", "yes", "complete", "ok"]),
    emoji!("❌", "Cross Mark", ["no", "wrong", "delete", "error"]),
    emoji!("⚠️", "Warning", ["caution", "alert", "danger"]),
    emoji!("💡", "Light Bulb", ["idea", "tip", "bright"]),
    emoji!("🚀", "Rocket", ["launch", "ship", "fast", "space"]),
    emoji!("🎉", "Party Popper", ["celebrate", "party", "tada"]),
    emoji!("🎯", "Direct Hit", ["target", "goal", "focus"]),
    emoji!("📌", "Pushpin", ["pin", "location", "important"]),
    emoji!("📈", "Chart Increasing", ["growth", "trend", "up", "stats"]),
    emoji!("💻", "Laptop", ["computer", "code", "work"]),
    emoji!("📱", "Mobile Phone", ["phone", "app", "device"]),
    emoji!("🐛", "Bug", ["insect", "error", "debug"]),
    emoji!("🔒", "Locked", ["security", "private", "lock"]),
    emoji!("☕", "Hot Beverage", ["coffee", "tea", "break"]),
    emoji!("🌈", "Rainbow", ["colors", "pride", "weather"]),
    emoji!("🦄", "Unicorn", ["magic", "fantasy", "rare"]),
    emoji!("🐱", "Cat Face", ["cat", "kitten", "pet"]),
    emoji!("🐶", "Dog Face", ["dog", "puppy", "pet"]),
    emoji!("🍕", "Pizza", ["food", "slice", "lunch"]),
];

/// Filter the catalogue.
///
/// An empty query returns everything. Otherwise an entry matches when its
/// glyph contains the query, or its name or any keyword contains the
/// query case-insensitively.
#[must_use]
pub fn search_emoji(query: &str) -> Vec<&'static EmojiEntry> {
    let query = query.trim().to_lowercase();
    EMOJI_CATALOG
        .iter()
        .filter(|entry| {
            query.is_empty()
                || entry.emoji.contains(query.as_str())
                || entry.name.to_lowercase().contains(query.as_str())
                || entry
                    .keywords
                    .iter()
                    .any(|kw| kw.to_lowercase().contains(query.as_str()))
        })
        .collect()
}

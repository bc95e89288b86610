//! Property tests for the document transition function.
//!
//! Covers reset idempotence, id uniqueness, no-op safety for stale ids and
//! stable paint order under arbitrary action sequences.

use std::collections::HashSet;

use aura_core::{
    reduce, Action, Background, Document, Gradient, ImageDimensions, OverlayId, User,
};
use proptest::prelude::*;

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::AddTextOverlay),
        "[a-z]{1,4}".prop_map(Action::AddEmojiOverlay),
        "https://media\\.example/[a-z]{1,6}\\.gif".prop_map(Action::AddGifOverlay),
        (-50i64..300).prop_map(Action::SetPadding),
        (-50i64..150).prop_map(Action::SetCornerRadius),
        (1u64..40).prop_map(|id| Action::RemoveTextOverlay(OverlayId(id))),
        (1u64..40).prop_map(|id| Action::RemoveEmojiOverlay(OverlayId(id))),
        (1u64..40).prop_map(|id| Action::RemoveGifOverlay(OverlayId(id))),
        "#[0-9a-f]{6}".prop_map(|c| Action::SetBackground(Background::Color(c))),
        (0f32..360.0).prop_map(|angle| {
            Action::SetBackground(Background::Gradient(Gradient::new("#000", "#fff", angle)))
        }),
        "data:image/png;base64,[A-Za-z0-9]{4,12}".prop_map(Action::SetScreenshot),
        (1u32..4000, 1u32..4000)
            .prop_map(|(w, h)| Action::SetImageDimensions(ImageDimensions::new(w, h))),
        "[A-Z][a-z]{2,8}".prop_map(|name| Action::Login(User {
            name,
            email: "user@example.com".to_string(),
            picture: String::new(),
        })),
        Just(Action::Logout),
        Just(Action::ResetState),
        Just(Action::Unrecognized),
    ]
}

fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::vec(arb_action(), 0..24).prop_map(|actions| {
        actions
            .iter()
            .fold(Document::default(), |doc, action| reduce(&doc, action))
    })
}

proptest! {
    #[test]
    fn prop_reset_is_idempotent_and_preserving(doc in arb_document()) {
        let once = reduce(&doc, &Action::ResetState);
        let twice = reduce(&once, &Action::ResetState);

        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(&once.screenshot, &doc.screenshot);
        prop_assert_eq!(once.image_dimensions, doc.image_dimensions);
        prop_assert_eq!(&once.user, &doc.user);
        prop_assert!(!once.has_overlays());
    }

    #[test]
    fn prop_added_ids_are_distinct(
        doc in arb_document(),
        adds in prop::collection::vec(0u8..3, 1..30)
    ) {
        let before = doc.text_overlays.len() + doc.emoji_overlays.len() + doc.gif_overlays.len();
        let after = adds.iter().fold(doc, |d, kind| {
            let action = match kind {
                0 => Action::AddTextOverlay,
                1 => Action::AddEmojiOverlay("⭐".to_string()),
                _ => Action::AddGifOverlay("https://media.example/x.gif".to_string()),
            };
            reduce(&d, &action)
        });

        for ids in [
            after.text_overlays.iter().map(|t| t.id).collect::<Vec<_>>(),
            after.emoji_overlays.iter().map(|e| e.id).collect::<Vec<_>>(),
            after.gif_overlays.iter().map(|g| g.id).collect::<Vec<_>>(),
        ] {
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
        let total = after.text_overlays.len() + after.emoji_overlays.len() + after.gif_overlays.len();
        prop_assert_eq!(total, before + adds.len());
    }

    #[test]
    fn prop_absent_ids_are_noops(doc in arb_document()) {
        let ghost = OverlayId(u64::MAX);
        prop_assert_eq!(&reduce(&doc, &Action::RemoveTextOverlay(ghost)), &doc);
        prop_assert_eq!(&reduce(&doc, &Action::RemoveEmojiOverlay(ghost)), &doc);
        prop_assert_eq!(&reduce(&doc, &Action::RemoveGifOverlay(ghost)), &doc);

        let mut text = aura_core::TextOverlay::new(ghost);
        text.text = "ghost".to_string();
        prop_assert_eq!(&reduce(&doc, &Action::UpdateTextOverlay(text)), &doc);
        prop_assert_eq!(
            &reduce(&doc, &Action::UpdateEmojiOverlay(aura_core::EmojiOverlay::new(ghost, "👻"))),
            &doc
        );
        prop_assert_eq!(
            &reduce(&doc, &Action::UpdateGifOverlay(aura_core::GifOverlay::new(ghost, "g.gif"))),
            &doc
        );
    }

    #[test]
    fn prop_padding_and_radius_stay_in_range(doc in arb_document()) {
        prop_assert!(doc.padding <= 200);
        prop_assert!(doc.corner_radius <= 100);
    }

    #[test]
    fn prop_appends_keep_insertion_order(
        doc in arb_document(),
        glyphs in prop::collection::vec("[a-z]{1,3}", 1..10)
    ) {
        let existing: Vec<_> = doc.emoji_overlays.iter().map(|e| e.id).collect();
        let after = glyphs
            .iter()
            .fold(doc, |d, g| reduce(&d, &Action::AddEmojiOverlay(g.clone())));

        let ids: Vec<_> = after.emoji_overlays.iter().map(|e| e.id).collect();
        prop_assert_eq!(&ids[..existing.len()], &existing[..]);
        let appended: Vec<_> = after.emoji_overlays[existing.len()..]
            .iter()
            .map(|e| e.emoji.clone())
            .collect();
        prop_assert_eq!(appended, glyphs);
    }
}

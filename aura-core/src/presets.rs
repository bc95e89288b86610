//! Fixed preset catalogues: drop shadows, text shadows, gradients and
//! browser frames.

use serde::{Deserialize, Serialize};

use crate::background::Gradient;
use crate::error::{EditorError, EditorResult};

/// Shadow token meaning "no shadow".
pub const NO_SHADOW: &str = "none";

/// A named preset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedPreset {
    /// Display name.
    pub name: &'static str,
    /// CSS value.
    pub value: &'static str,
}

/// Drop-shadow filters applied around the composition.
pub const SHADOW_PRESETS: [NamedPreset; 5] = [
    NamedPreset {
        name: "None",
        value: NO_SHADOW,
    },
    NamedPreset {
        name: "Small",
        value: "drop-shadow(0 4px 6px rgba(0,0,0,0.25))",
    },
    NamedPreset {
        name: "Medium",
        value: "drop-shadow(0 10px 15px rgba(0,0,0,0.3))",
    },
    NamedPreset {
        name: "Large",
        value: "drop-shadow(0 20px 25px rgba(0,0,0,0.35))",
    },
    NamedPreset {
        name: "Glow",
        value: "drop-shadow(0 0 20px rgba(129,140,248,0.6))",
    },
];

/// Text-shadow presets offered by the text toolbar.
pub const TEXT_SHADOW_PRESETS: [NamedPreset; 4] = [
    NamedPreset {
        name: "None",
        value: NO_SHADOW,
    },
    NamedPreset {
        name: "Soft",
        value: "0 2px 4px rgba(0,0,0,0.5)",
    },
    NamedPreset {
        name: "Hard",
        value: "2px 2px 0px rgba(0,0,0,0.75)",
    },
    NamedPreset {
        name: "Glow",
        value: "0 0 10px rgba(255,255,255,0.5)",
    },
];

/// A named gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientPreset {
    /// Display name.
    pub name: &'static str,
    /// Start colour.
    pub start: &'static str,
    /// End colour.
    pub end: &'static str,
    /// Angle in degrees.
    pub angle: f32,
}

impl GradientPreset {
    /// Owned gradient value.
    #[must_use]
    pub fn gradient(&self) -> Gradient {
        Gradient::new(self.start, self.end, self.angle)
    }
}

/// Built-in gradients. The first one is the session default.
pub const GRADIENT_PRESETS: [GradientPreset; 6] = [
    GradientPreset {
        name: "Indigo Dusk",
        start: "#4F46E5",
        end: "#EC4899",
        angle: 135.0,
    },
    GradientPreset {
        name: "Ocean",
        start: "#06B6D4",
        end: "#3B82F6",
        angle: 135.0,
    },
    GradientPreset {
        name: "Sunset",
        start: "#F97316",
        end: "#DB2777",
        angle: 45.0,
    },
    GradientPreset {
        name: "Forest",
        start: "#10B981",
        end: "#065F46",
        angle: 160.0,
    },
    GradientPreset {
        name: "Midnight",
        start: "#0F172A",
        end: "#334155",
        angle: 180.0,
    },
    GradientPreset {
        name: "Peach",
        start: "#FDBA74",
        end: "#F472B6",
        angle: 90.0,
    },
];

/// Browser chrome drawn around the composition.
///
/// Purely presentational. The `none` frame draws nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserFrame {
    /// Stable identifier, e.g. `macos-dark`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Fill of the title bar.
    pub header_color: String,
    /// Fill behind the content area.
    pub body_color: String,
}

impl BrowserFrame {
    /// The frame that draws no chrome.
    #[must_use]
    pub fn none() -> Self {
        Self::from_def(&FRAME_DEFS[0])
    }

    /// Whether this frame draws chrome.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind != "none"
    }

    fn from_def(def: &FrameDef) -> Self {
        Self {
            kind: def.kind.to_string(),
            name: def.name.to_string(),
            header_color: def.header.to_string(),
            body_color: def.body.to_string(),
        }
    }
}

impl Default for BrowserFrame {
    fn default() -> Self {
        Self::none()
    }
}

struct FrameDef {
    kind: &'static str,
    name: &'static str,
    header: &'static str,
    body: &'static str,
}

const FRAME_DEFS: [FrameDef; 5] = [
    FrameDef {
        kind: "none",
        name: "None",
        header: "transparent",
        body: "transparent",
    },
    FrameDef {
        kind: "macos-light",
        name: "macOS Light",
        header: "#E5E7EB",
        body: "#FFFFFF",
    },
    FrameDef {
        kind: "macos-dark",
        name: "macOS Dark",
        header: "#1F2937",
        body: "#111827",
    },
    FrameDef {
        kind: "windows",
        name: "Windows",
        header: "#F3F4F6",
        body: "#F9FAFB",
    },
    FrameDef {
        kind: "minimal",
        name: "Minimal",
        header: "#374151",
        body: "transparent",
    },
];

/// Height of the frame title bar in pixels.
pub const FRAME_HEADER_HEIGHT: f32 = 32.0;

/// All browser frames, `none` first.
#[must_use]
pub fn browser_frames() -> Vec<BrowserFrame> {
    FRAME_DEFS.iter().map(BrowserFrame::from_def).collect()
}

/// Look up a browser frame by its identifier.
///
/// # Errors
///
/// Returns [`EditorError::UnknownPreset`] if no frame has that identifier.
pub fn frame_by_kind(kind: &str) -> EditorResult<BrowserFrame> {
    FRAME_DEFS
        .iter()
        .find(|def| def.kind == kind)
        .map(BrowserFrame::from_def)
        .ok_or_else(|| EditorError::UnknownPreset {
            kind: "frame",
            name: kind.to_string(),
        })
}

/// Look up a drop-shadow preset value by name (case-insensitive).
///
/// # Errors
///
/// Returns [`EditorError::UnknownPreset`] if no preset has that name.
pub fn shadow_by_name(name: &str) -> EditorResult<&'static str> {
    find_named(&SHADOW_PRESETS, name).ok_or_else(|| EditorError::UnknownPreset {
        kind: "shadow",
        name: name.to_string(),
    })
}

/// Look up a text-shadow preset value by name (case-insensitive).
///
/// # Errors
///
/// Returns [`EditorError::UnknownPreset`] if no preset has that name.
pub fn text_shadow_by_name(name: &str) -> EditorResult<&'static str> {
    find_named(&TEXT_SHADOW_PRESETS, name).ok_or_else(|| EditorError::UnknownPreset {
        kind: "text shadow",
        name: name.to_string(),
    })
}

/// Look up a gradient preset by name (case-insensitive).
///
/// # Errors
///
/// Returns [`EditorError::UnknownPreset`] if no gradient has that name.
pub fn gradient_by_name(name: &str) -> EditorResult<Gradient> {
    GRADIENT_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
        .map(GradientPreset::gradient)
        .ok_or_else(|| EditorError::UnknownPreset {
            kind: "gradient",
            name: name.to_string(),
        })
}

fn find_named(presets: &[NamedPreset], name: &str) -> Option<&'static str> {
    presets
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
        .map(|preset| preset.value)
}

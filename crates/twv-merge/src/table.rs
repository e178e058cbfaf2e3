//! Conflict groups for utility classes.
//!
//! Two classes conflict when they resolve to the same group under the same
//! modifiers. A group may also name other groups it overrides, so `p-4`
//! replaces an earlier `px-2` but not the other way round.

use indexmap::IndexMap;

const PALETTE: &[&str] = &[
    "slate", "gray", "zinc", "neutral", "stone", "red", "orange", "amber", "yellow", "lime",
    "green", "emerald", "teal", "cyan", "sky", "blue", "indigo", "violet", "purple", "fuchsia",
    "pink", "rose",
];

const SHADES: &[&str] = &[
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

const COLOR_KEYWORDS: &[&str] = &["black", "white", "transparent", "current", "inherit"];

const LENGTH_KEYWORDS: &[&str] = &[
    "px", "full", "auto", "screen", "min", "max", "fit", "none", "svh", "lvh", "dvh", "svw",
    "lvw", "dvw",
];

const FONT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const FONT_WEIGHTS: &[&str] = &[
    "thin", "extralight", "light", "normal", "medium", "semibold", "bold", "extrabold", "black",
];

const RADII: &[&str] = &["none", "sm", "md", "lg", "xl", "2xl", "3xl", "full"];

const SHADOWS: &[&str] = &["sm", "md", "lg", "xl", "2xl", "inner", "none"];

/// The kind of value a prefixed utility accepts after `prefix-`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Any,
    Length,
    Number,
    Color,
    FontSize,
    FontWeight,
    Radius,
    Shadow,
    Keywords(Vec<String>),
}

impl ValueKind {
    pub fn keywords(words: &[&str]) -> Self {
        ValueKind::Keywords(words.iter().map(|w| w.to_string()).collect())
    }

    /// Check whether `value` belongs to this kind.
    pub fn accepts(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match self {
            ValueKind::Any => true,
            ValueKind::Length => {
                is_number(value)
                    || is_fraction(value)
                    || LENGTH_KEYWORDS.contains(&value)
                    || arbitrary(value).is_some_and(|inner| !is_arbitrary_color(inner))
            }
            ValueKind::Number => {
                is_number(value) || arbitrary(value).is_some_and(|inner| !is_arbitrary_color(inner))
            }
            ValueKind::Color => is_color(value),
            ValueKind::FontSize => {
                let size = value.split_once('/').map_or(value, |(size, _)| size);
                FONT_SIZES.contains(&size)
                    || arbitrary(size).is_some_and(|inner| !is_arbitrary_color(inner))
            }
            ValueKind::FontWeight => FONT_WEIGHTS.contains(&value) || arbitrary(value).is_some(),
            ValueKind::Radius => RADII.contains(&value) || arbitrary(value).is_some(),
            ValueKind::Shadow => SHADOWS.contains(&value) || arbitrary(value).is_some(),
            ValueKind::Keywords(words) => words.iter().any(|w| w == value),
        }
    }
}

fn is_number(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.chars().any(|c| c.is_ascii_digit())
}

fn is_fraction(value: &str) -> bool {
    value
        .split_once('/')
        .is_some_and(|(num, den)| is_number(num) && is_number(den))
}

fn arbitrary(value: &str) -> Option<&str> {
    value.strip_prefix('[')?.strip_suffix(']')
}

fn is_arbitrary_color(inner: &str) -> bool {
    inner.starts_with('#')
        || inner.starts_with("color:")
        || ["rgb(", "rgba(", "hsl(", "hsla(", "oklch(", "oklab("]
            .iter()
            .any(|f| inner.starts_with(f))
}

fn is_color(value: &str) -> bool {
    if let Some(inner) = arbitrary(value) {
        return is_arbitrary_color(inner);
    }
    // Opacity modifier: `red-500/50`.
    let color = value.split_once('/').map_or(value, |(color, _)| color);
    if COLOR_KEYWORDS.contains(&color) {
        return true;
    }
    match color.rsplit_once('-') {
        Some((name, shade)) => PALETTE.contains(&name) && SHADES.contains(&shade),
        None => false,
    }
}

/// A set of mutually conflicting utilities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassGroup {
    /// Group identifier, referenced by `conflicts`.
    pub id: String,
    /// Utilities matched by full name.
    pub exact: Vec<String>,
    /// Utilities matched as `prefix-value`.
    pub prefix: Option<String>,
    pub value: ValueKind,
    /// Groups whose earlier classes this group overrides.
    pub conflicts: Vec<String>,
}

impl ClassGroup {
    /// A group of utilities matched by full name.
    pub fn exact(id: &str, names: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            exact: names.iter().map(|n| n.to_string()).collect(),
            prefix: None,
            value: ValueKind::Any,
            conflicts: Vec::new(),
        }
    }

    /// A group of utilities matched as `prefix-value`.
    pub fn prefixed(id: &str, prefix: &str, value: ValueKind) -> Self {
        Self {
            id: id.to_string(),
            exact: Vec::new(),
            prefix: Some(prefix.to_string()),
            value,
            conflicts: Vec::new(),
        }
    }

    /// Also match these full names.
    pub fn with_exact(mut self, names: &[&str]) -> Self {
        self.exact.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Override earlier classes of these groups.
    pub fn conflicts(mut self, groups: &[&str]) -> Self {
        self.conflicts.extend(groups.iter().map(|g| g.to_string()));
        self
    }

    /// Check whether a utility (modifiers, important and sign removed)
    /// belongs to this group.
    pub fn matches(&self, utility: &str) -> bool {
        if self.exact.iter().any(|name| name == utility) {
            return true;
        }
        self.prefix.as_deref().is_some_and(|prefix| {
            utility
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|value| self.value.accepts(value))
        })
    }
}

/// An ordered table of class groups. The first matching group wins.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConflictTable {
    groups: IndexMap<String, ClassGroup>,
}

impl ConflictTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    /// Register a group, replacing any group with the same id in place.
    pub fn push(&mut self, group: ClassGroup) {
        self.groups.insert(group.id.clone(), group);
    }

    /// Builder-style `push`.
    pub fn with(mut self, group: ClassGroup) -> Self {
        self.push(group);
        self
    }

    /// Get a group by id.
    pub fn get(&self, id: &str) -> Option<&ClassGroup> {
        self.groups.get(id)
    }

    /// Find the group of a utility.
    pub fn classify(&self, utility: &str) -> Option<&ClassGroup> {
        self.groups.values().find(|group| group.matches(utility))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The built-in table covering common layout, spacing, sizing,
    /// typography, color and effect utilities.
    pub fn tailwind() -> Self {
        use ValueKind::{Any, Color, FontSize, FontWeight, Length, Number, Radius, Shadow};

        let mut table = ConflictTable::empty();
        let groups = [
            ClassGroup::exact(
                "display",
                &[
                    "block", "inline-block", "inline", "flex", "inline-flex", "grid",
                    "inline-grid", "hidden", "contents", "table", "flow-root",
                ],
            ),
            ClassGroup::exact("position", &["static", "fixed", "absolute", "relative", "sticky"]),
            ClassGroup::exact("visibility", &["visible", "invisible", "collapse"]),
            // Spacing
            ClassGroup::prefixed("p", "p", Length)
                .conflicts(&["px", "py", "ps", "pe", "pt", "pr", "pb", "pl"]),
            ClassGroup::prefixed("px", "px", Length).conflicts(&["pr", "pl", "ps", "pe"]),
            ClassGroup::prefixed("py", "py", Length).conflicts(&["pt", "pb"]),
            ClassGroup::prefixed("ps", "ps", Length),
            ClassGroup::prefixed("pe", "pe", Length),
            ClassGroup::prefixed("pt", "pt", Length),
            ClassGroup::prefixed("pr", "pr", Length),
            ClassGroup::prefixed("pb", "pb", Length),
            ClassGroup::prefixed("pl", "pl", Length),
            ClassGroup::prefixed("m", "m", Length)
                .conflicts(&["mx", "my", "ms", "me", "mt", "mr", "mb", "ml"]),
            ClassGroup::prefixed("mx", "mx", Length).conflicts(&["mr", "ml", "ms", "me"]),
            ClassGroup::prefixed("my", "my", Length).conflicts(&["mt", "mb"]),
            ClassGroup::prefixed("ms", "ms", Length),
            ClassGroup::prefixed("me", "me", Length),
            ClassGroup::prefixed("mt", "mt", Length),
            ClassGroup::prefixed("mr", "mr", Length),
            ClassGroup::prefixed("mb", "mb", Length),
            ClassGroup::prefixed("ml", "ml", Length),
            ClassGroup::prefixed("gap", "gap", Length).conflicts(&["gap-x", "gap-y"]),
            ClassGroup::prefixed("gap-x", "gap-x", Length),
            ClassGroup::prefixed("gap-y", "gap-y", Length),
            // Sizing
            ClassGroup::prefixed("size", "size", Length).conflicts(&["w", "h"]),
            ClassGroup::prefixed("w", "w", Length),
            ClassGroup::prefixed("h", "h", Length),
            ClassGroup::prefixed("min-w", "min-w", Length),
            ClassGroup::prefixed("min-h", "min-h", Length),
            ClassGroup::prefixed("max-w", "max-w", Any),
            ClassGroup::prefixed("max-h", "max-h", Length),
            // Placement
            ClassGroup::prefixed("inset", "inset", Length)
                .conflicts(&["inset-x", "inset-y", "top", "right", "bottom", "left"]),
            ClassGroup::prefixed("inset-x", "inset-x", Length).conflicts(&["right", "left"]),
            ClassGroup::prefixed("inset-y", "inset-y", Length).conflicts(&["top", "bottom"]),
            ClassGroup::prefixed("top", "top", Length),
            ClassGroup::prefixed("right", "right", Length),
            ClassGroup::prefixed("bottom", "bottom", Length),
            ClassGroup::prefixed("left", "left", Length),
            ClassGroup::prefixed("z", "z", Any),
            // Flexbox
            ClassGroup::exact(
                "flex-direction",
                &["flex-row", "flex-row-reverse", "flex-col", "flex-col-reverse"],
            ),
            ClassGroup::exact("flex-wrap", &["flex-wrap", "flex-wrap-reverse", "flex-nowrap"]),
            ClassGroup::exact("flex", &["flex-1", "flex-auto", "flex-initial", "flex-none"]),
            ClassGroup::prefixed("grow", "grow", Number).with_exact(&["grow"]),
            ClassGroup::prefixed("shrink", "shrink", Number).with_exact(&["shrink"]),
            ClassGroup::prefixed(
                "items",
                "items",
                ValueKind::keywords(&["start", "end", "center", "baseline", "stretch"]),
            ),
            ClassGroup::prefixed(
                "justify",
                "justify",
                ValueKind::keywords(&[
                    "normal", "start", "end", "center", "between", "around", "evenly", "stretch",
                ]),
            ),
            ClassGroup::prefixed(
                "self",
                "self",
                ValueKind::keywords(&["auto", "start", "end", "center", "stretch", "baseline"]),
            ),
            // Typography
            ClassGroup::exact(
                "text-align",
                &[
                    "text-left", "text-center", "text-right", "text-justify", "text-start",
                    "text-end",
                ],
            ),
            ClassGroup::prefixed("text-color", "text", Color),
            ClassGroup::prefixed("font-size", "text", FontSize),
            ClassGroup::prefixed("font-weight", "font", FontWeight),
            ClassGroup::exact("font-family", &["font-sans", "font-serif", "font-mono"]),
            ClassGroup::prefixed("leading", "leading", Any),
            ClassGroup::prefixed("tracking", "tracking", Any),
            ClassGroup::prefixed("whitespace", "whitespace", Any),
            ClassGroup::exact("text-overflow", &["truncate", "text-ellipsis", "text-clip"]),
            ClassGroup::exact(
                "text-decoration",
                &["underline", "overline", "line-through", "no-underline"],
            ),
            // Backgrounds and borders
            ClassGroup::prefixed("bg-color", "bg", Color),
            ClassGroup::prefixed("border-color", "border", Color),
            ClassGroup::exact(
                "border-style",
                &["border-solid", "border-dashed", "border-dotted", "border-double", "border-none"],
            ),
            ClassGroup::prefixed("border-w", "border", Number).with_exact(&["border"]),
            ClassGroup::prefixed("rounded", "rounded", Radius).with_exact(&["rounded"]),
            // Effects
            ClassGroup::prefixed("shadow", "shadow", Shadow).with_exact(&["shadow"]),
            ClassGroup::prefixed("ring-color", "ring", Color),
            ClassGroup::prefixed("ring-w", "ring", Number).with_exact(&["ring"]),
            ClassGroup::prefixed("opacity", "opacity", Number),
            // Interactivity
            ClassGroup::prefixed("cursor", "cursor", Any),
            ClassGroup::prefixed(
                "pointer-events",
                "pointer-events",
                ValueKind::keywords(&["none", "auto"]),
            ),
            ClassGroup::prefixed(
                "select",
                "select",
                ValueKind::keywords(&["none", "text", "all", "auto"]),
            ),
            ClassGroup::prefixed(
                "overflow",
                "overflow",
                ValueKind::keywords(&["auto", "hidden", "clip", "visible", "scroll"]),
            )
            .conflicts(&["overflow-x", "overflow-y"]),
            ClassGroup::prefixed(
                "overflow-x",
                "overflow-x",
                ValueKind::keywords(&["auto", "hidden", "clip", "visible", "scroll"]),
            ),
            ClassGroup::prefixed(
                "overflow-y",
                "overflow-y",
                ValueKind::keywords(&["auto", "hidden", "clip", "visible", "scroll"]),
            ),
            // Transitions
            ClassGroup::prefixed(
                "transition",
                "transition",
                ValueKind::keywords(&["none", "all", "colors", "opacity", "shadow", "transform"]),
            )
            .with_exact(&["transition"]),
            ClassGroup::prefixed("duration", "duration", Number),
            ClassGroup::prefixed("ease", "ease", Any),
        ];
        for group in groups {
            table.push(group);
        }
        table
    }
}

impl Default for ConflictTable {
    fn default() -> Self {
        Self::tailwind()
    }
}

//! Resource declarations and their kind-specific payloads.

use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::locale::canonical_tag;
use crate::metadata::GeneratorType;

/// Category of resource, each with its own payload shape and emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Localised text.
    String,
    /// Localised quantity strings.
    Plural,
    /// Raw files shipped verbatim.
    Asset,
    /// Font files.
    Font,
    /// Colours with optional dark variants.
    Color,
    /// Raster images at several densities.
    Image,
}

impl ResourceKind {
    /// Every kind, in generation order.
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Plural,
        Self::Asset,
        Self::Font,
        Self::Color,
        Self::Image,
    ];

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Plural => "plural",
            Self::Asset => "asset",
            Self::Font => "font",
            Self::Color => "color",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plural quantity categories in CLDR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PluralQuantity {
    /// `zero`
    Zero,
    /// `one`
    One,
    /// `two`
    Two,
    /// `few`
    Few,
    /// `many`
    Many,
    /// `other`
    Other,
}

impl PluralQuantity {
    /// CLDR keyword for the quantity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

/// Quantity variants of one plural string in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralForms {
    /// Text for `zero`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    /// Text for `one`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one: Option<String>,
    /// Text for `two`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two: Option<String>,
    /// Text for `few`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub few: Option<String>,
    /// Text for `many`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many: Option<String>,
    /// Text for `other`, which every locale must provide.
    pub other: String,
}

impl PluralForms {
    /// Creates forms that only define `other`.
    #[must_use]
    pub fn other(text: impl Into<String>) -> Self {
        Self {
            zero: None,
            one: None,
            two: None,
            few: None,
            many: None,
            other: text.into(),
        }
    }

    /// Iterates the defined quantities in CLDR order.
    pub fn iter(&self) -> impl Iterator<Item = (PluralQuantity, &str)> {
        [
            (PluralQuantity::Zero, self.zero.as_deref()),
            (PluralQuantity::One, self.one.as_deref()),
            (PluralQuantity::Two, self.two.as_deref()),
            (PluralQuantity::Few, self.few.as_deref()),
            (PluralQuantity::Many, self.many.as_deref()),
            (PluralQuantity::Other, Some(self.other.as_str())),
        ]
        .into_iter()
        .filter_map(|(quantity, text)| text.map(|value| (quantity, value)))
    }
}

/// RGBA colour packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba(pub u32);

impl Rgba {
    /// Parses `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use resbind::metadata::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#FF000080"), Some(Rgba(0xFF00_0080)));
    /// assert_eq!(Rgba::parse("00FF00"), Some(Rgba(0x00FF_00FF)));
    /// assert_eq!(Rgba::parse("#123"), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let raw = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self((raw << 8) | 0xFF)),
            8 => Some(Self(raw)),
            _ => None,
        }
    }

    /// Red channel.
    #[must_use]
    pub const fn red(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Green channel.
    #[must_use]
    pub const fn green(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// Formats as Android's `#AARRGGBB`.
    #[must_use]
    pub fn to_argb_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.alpha(),
            self.red(),
            self.green(),
            self.blue()
        )
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid colour '{value}'"))
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        format!("#{:08X}", value.0)
    }
}

/// Screen density bucket of an image variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// 1x
    Mdpi,
    /// 1.5x
    Hdpi,
    /// 2x
    Xhdpi,
    /// 3x
    Xxhdpi,
    /// 4x
    Xxxhdpi,
}

impl Density {
    /// Android drawable qualifier.
    #[must_use]
    pub const fn android_qualifier(self) -> &'static str {
        match self {
            Self::Mdpi => "mdpi",
            Self::Hdpi => "hdpi",
            Self::Xhdpi => "xhdpi",
            Self::Xxhdpi => "xxhdpi",
            Self::Xxxhdpi => "xxxhdpi",
        }
    }

    /// Scale label used in file names (`1x`, `1.5x`, ...).
    #[must_use]
    pub const fn scale_label(self) -> &'static str {
        match self {
            Self::Mdpi => "1x",
            Self::Hdpi => "1.5x",
            Self::Xhdpi => "2x",
            Self::Xxhdpi => "3x",
            Self::Xxxhdpi => "4x",
        }
    }

    /// Scale accepted by Apple asset catalogs, if any.
    #[must_use]
    pub const fn apple_scale(self) -> Option<&'static str> {
        match self {
            Self::Mdpi => Some("1x"),
            Self::Xhdpi => Some("2x"),
            Self::Xxhdpi => Some("3x"),
            Self::Hdpi | Self::Xxxhdpi => None,
        }
    }
}

/// One density variant of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Density bucket.
    pub density: Density,
    /// Source file to copy.
    pub source: Utf8PathBuf,
}

/// Kind-specific payload of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceData {
    /// Localised text keyed by locale tag (`base`, `ru`, `en-GB`).
    String {
        /// Values per locale tag.
        values: BTreeMap<String, String>,
    },
    /// Localised quantity strings keyed by locale tag.
    Plural {
        /// Forms per locale tag.
        values: BTreeMap<String, PluralForms>,
    },
    /// Raw file published under a relative path.
    Asset {
        /// Path of the asset relative to the assets root.
        path: Utf8PathBuf,
        /// Source file to copy.
        source: Utf8PathBuf,
    },
    /// Font file.
    Font {
        /// Source font file.
        source: Utf8PathBuf,
    },
    /// Colour with an optional dark-theme variant.
    Color {
        /// Light (or only) colour.
        light: Rgba,
        /// Dark-theme colour.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dark: Option<Rgba>,
    },
    /// Raster image variants.
    Image {
        /// Variants ordered by density.
        variants: Vec<ImageVariant>,
    },
}

impl ResourceData {
    /// Kind of the payload.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::String { .. } => ResourceKind::String,
            Self::Plural { .. } => ResourceKind::Plural,
            Self::Asset { .. } => ResourceKind::Asset,
            Self::Font { .. } => ResourceKind::Font,
            Self::Color { .. } => ResourceKind::Color,
            Self::Image { .. } => ResourceKind::Image,
        }
    }
}

/// One named resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Stable key, unique per container and kind.
    pub key: String,
    /// Kind-specific payload.
    pub data: ResourceData,
}

impl ResourceEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(key: impl Into<String>, data: ResourceData) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// Kind of the entry.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.data.kind()
    }

    /// Name of the generated accessor (`.` and `-` become `_`).
    ///
    /// # Examples
    ///
    /// ```
    /// use resbind::metadata::{ResourceData, ResourceEntry};
    ///
    /// let entry = ResourceEntry::new(
    ///     "screen.main-title",
    ///     ResourceData::String { values: Default::default() },
    /// );
    /// assert_eq!(entry.property_name(), "screen_main_title");
    /// ```
    #[must_use]
    pub fn property_name(&self) -> String {
        self.key.replace(['.', '-'], "_")
    }

    /// Whether two declarations of the same member refer to the same resource.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.key == other.key && self.kind() == other.kind()
    }

    /// Layers `self` over a declaration inherited from an ancestor.
    ///
    /// Localised kinds keep ancestor locales that `self` does not define;
    /// other kinds replace the inherited payload.
    #[must_use]
    pub fn layered_over(self, inherited: &Self) -> Self {
        let data = match (self.data, &inherited.data) {
            (ResourceData::String { values }, ResourceData::String { values: lower }) => {
                ResourceData::String {
                    values: layer_locales(values, lower),
                }
            }
            (ResourceData::Plural { values }, ResourceData::Plural { values: lower }) => {
                ResourceData::Plural {
                    values: layer_locales(values, lower),
                }
            }
            (own, _) => own,
        };
        Self {
            key: self.key,
            data,
        }
    }
}

fn layer_locales<T: Clone>(
    own: BTreeMap<String, T>,
    lower: &BTreeMap<String, T>,
) -> BTreeMap<String, T> {
    let mut layered: BTreeMap<String, T> = own
        .into_iter()
        .map(|(tag, value)| (canonical_tag(&tag), value))
        .collect();
    for (tag, value) in lower {
        layered.entry(canonical_tag(tag)).or_insert_with(|| value.clone());
    }
    layered
}

/// Resources declared by one source set, in declaration order.
///
/// Deserialising goes through [`ResourceSet::from_entries`], so duplicate
/// accessor names are rejected there too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ResourceEntry>", into = "Vec<ResourceEntry>")]
pub struct ResourceSet {
    entries: Vec<ResourceEntry>,
}

impl ResourceSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a set, rejecting two entries of one kind with the same accessor name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateKey`] naming the source set and key.
    pub fn from_entries(
        source_set: &str,
        entries: impl IntoIterator<Item = ResourceEntry>,
    ) -> Result<Self, ResolveError> {
        let mut set = Self::new();
        for entry in entries {
            set.push(source_set, entry)?;
        }
        Ok(set)
    }

    /// Appends an entry, rejecting duplicates within its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateKey`] naming the source set and key.
    pub fn push(&mut self, source_set: &str, entry: ResourceEntry) -> Result<(), ResolveError> {
        let name = entry.property_name();
        let duplicate = self
            .of_kind(entry.kind())
            .any(|existing| existing.property_name() == name);
        if duplicate {
            return Err(ResolveError::DuplicateKey {
                source_set: source_set.to_owned(),
                generator: GeneratorType::for_kind(entry.kind()),
                key: entry.key,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entries of one kind, in declaration order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }

}

/// Source set label used when a set is deserialised without one.
const UNNAMED_SOURCE_SET: &str = "<unnamed>";

impl TryFrom<Vec<ResourceEntry>> for ResourceSet {
    type Error = ResolveError;

    fn try_from(entries: Vec<ResourceEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(UNNAMED_SOURCE_SET, entries)
    }
}

impl From<ResourceSet> for Vec<ResourceEntry> {
    fn from(set: ResourceSet) -> Self {
        set.entries
    }
}

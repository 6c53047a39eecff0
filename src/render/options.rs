//! Rendering options and configuration.

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierConfig, Level};
use crate::error::{Error, Result};

/// Placeholders expanded in the begin preamble.
pub const PREAMBLE_PLACEHOLDERS: [&str; 2] = ["fileName", "dateTime"];

/// Overall shape of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Note document: condensed and detailed sections with legend and preambles
    #[default]
    Notes,
    /// Mindmap note: condensed bullets under document headers
    Mindmap,
    /// Outline for external mindmap tools: tab indentation, no markup
    ExternalMindmap,
}

/// Prefix, icon and inline format of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelStyle {
    /// Line prefix in condensed output (the title marker for level 1)
    pub prefix: String,

    /// Icon placed before the text
    pub icon: String,

    /// Icon used in the external mindmap layout
    pub external_icon: String,

    /// Inline marker wrapped around the text (e.g. `**`)
    pub format: String,
}

impl LevelStyle {
    /// Create a style.
    pub fn new(
        prefix: impl Into<String>,
        icon: impl Into<String>,
        external_icon: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            icon: icon.into(),
            external_icon: external_icon.into(),
            format: format.into(),
        }
    }

    /// Prefix for the external mindmap layout: a tab followed by the
    /// indentation part of the regular prefix.
    pub fn external_prefix(&self) -> String {
        let indent = self.prefix.strip_suffix("- ").unwrap_or(&self.prefix);
        format!("\t{}", indent)
    }
}

impl Default for LevelStyle {
    fn default() -> Self {
        Self::new("- ", "", "", "")
    }
}

/// Styles for every level.
///
/// When deserialized, fields missing from a level keep that level's default,
/// so `{"level1": {"icon": "X"}}` only replaces the level 1 icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LevelStylesRepr")]
pub struct LevelStyles {
    pub level1: LevelStyle,
    pub level2: LevelStyle,
    pub level3: LevelStyle,
    pub summary: LevelStyle,
    pub important: LevelStyle,
    pub unknown: LevelStyle,
}

impl LevelStyles {
    /// Style of a level.
    pub fn get(&self, level: Level) -> &LevelStyle {
        match level {
            Level::Level1 => &self.level1,
            Level::Level2 => &self.level2,
            Level::Level3 => &self.level3,
            Level::Summary => &self.summary,
            Level::Important => &self.important,
            Level::Unknown => &self.unknown,
        }
    }
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self {
            level1: LevelStyle::new("##### ", "🟠", "📌", ""),
            level2: LevelStyle::new("- ", "🟡", "", ""),
            level3: LevelStyle::new("\t- ", "🔵", "🔷", ""),
            summary: LevelStyle::new("- ", "🟢", "📝", "**"),
            important: LevelStyle::new("- ", "🔴", "⚠️", "=="),
            unknown: LevelStyle::new("- ", "❔", "❔", ""),
        }
    }
}

/// Partial style as written in a configuration file.
#[derive(Default, Deserialize)]
struct LevelStyleOverride {
    prefix: Option<String>,
    icon: Option<String>,
    external_icon: Option<String>,
    format: Option<String>,
}

impl LevelStyleOverride {
    fn apply(self, mut style: LevelStyle) -> LevelStyle {
        if let Some(prefix) = self.prefix {
            style.prefix = prefix;
        }
        if let Some(icon) = self.icon {
            style.icon = icon;
        }
        if let Some(external_icon) = self.external_icon {
            style.external_icon = external_icon;
        }
        if let Some(format) = self.format {
            style.format = format;
        }
        style
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LevelStylesRepr {
    level1: LevelStyleOverride,
    level2: LevelStyleOverride,
    level3: LevelStyleOverride,
    summary: LevelStyleOverride,
    important: LevelStyleOverride,
    unknown: LevelStyleOverride,
}

impl From<LevelStylesRepr> for LevelStyles {
    fn from(repr: LevelStylesRepr) -> Self {
        let defaults = LevelStyles::default();
        Self {
            level1: repr.level1.apply(defaults.level1),
            level2: repr.level2.apply(defaults.level2),
            level3: repr.level3.apply(defaults.level3),
            summary: repr.summary.apply(defaults.summary),
            important: repr.important.apply(defaults.important),
            unknown: repr.unknown.apply(defaults.unknown),
        }
    }
}

/// Fixed text blocks placed around the annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preambles {
    /// Start of the document; `{fileName}` and `{dateTime}` are substituted
    pub begin: String,

    /// Heading of the empty personal-synthesis section
    pub personal: String,

    /// Heading of the condensed section
    pub condensed: String,

    /// Heading of the detailed section
    pub detailed: String,

    /// Whole output when there are no annotations
    pub no_annotations: String,
}

impl Default for Preambles {
    fn default() -> Self {
        Self {
            begin: concat!(
                "---\n",
                "MOC: []\n",
                "Source: \"[[{fileName}]]\"\n",
                "Projects:\n",
                "Related notes:\n",
                "Date: \" {dateTime}\"\n",
                "tags:\n",
                "    - \"#Type/Note/Info\"\n",
                "---"
            )
            .to_string(),
            personal: "### Personal synthesis".to_string(),
            condensed: "### Condensed format".to_string(),
            detailed: "### Detailed format".to_string(),
            no_annotations: "- **No annotations**".to_string(),
        }
    }
}

/// Options for rendering collected annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Document layout
    pub layout: Layout,

    /// Include normal-priority (level 2) entries
    pub include_normal: bool,

    /// Include low-priority (level 3) entries
    pub include_low: bool,

    /// Emit topic and document headers
    pub structuring_headlines: bool,

    /// Use the first body line as a topic and group by it
    pub group_by_topic: bool,

    /// Group documents by folder instead of file name
    pub group_by_folder: bool,

    /// Per-level prefix, icon and format
    pub styles: LevelStyles,

    /// Inline marker wrapped around note text
    pub note_format: String,

    /// Label placed before note text
    pub note_preamble: String,

    /// Add a `#### _` line under each mindmap document header
    pub mindmap_preamble: bool,

    /// Fixed text blocks
    pub preambles: Preambles,

    /// Reference colors and tolerances
    pub classifier: ClassifierConfig,

    /// Timestamp for `{dateTime}`; the local time when unset
    #[serde(skip)]
    pub date_time: Option<NaiveDateTime>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Choose which optional levels are included.
    pub fn with_levels(mut self, include_normal: bool, include_low: bool) -> Self {
        self.include_normal = include_normal;
        self.include_low = include_low;
        self
    }

    /// Keep only level 1, summary and important entries.
    pub fn essentials(self) -> Self {
        self.with_levels(false, false)
    }

    /// Enable or disable topic and document headers.
    pub fn with_headlines(mut self, enabled: bool) -> Self {
        self.structuring_headlines = enabled;
        self
    }

    /// Enable or disable topic grouping.
    pub fn with_topics(mut self, enabled: bool) -> Self {
        self.group_by_topic = enabled;
        self
    }

    /// Group by folder instead of file name.
    pub fn with_folder_grouping(mut self, enabled: bool) -> Self {
        self.group_by_folder = enabled;
        self
    }

    /// Set the level styles.
    pub fn with_styles(mut self, styles: LevelStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Set the preambles.
    pub fn with_preambles(mut self, preambles: Preambles) -> Self {
        self.preambles = preambles;
        self
    }

    /// Set the "no annotations" placeholder.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.preambles.no_annotations = text.into();
        self
    }

    /// Set the classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Fix the timestamp used in the begin preamble.
    pub fn with_date_time(mut self, date_time: NaiveDateTime) -> Self {
        self.date_time = Some(date_time);
        self
    }

    /// Whether topics take part in sorting and headers.
    pub fn topics_enabled(&self) -> bool {
        self.structuring_headlines && self.group_by_topic
    }

    /// Whether entries of a level are rendered.
    pub fn reports(&self, level: Level) -> bool {
        match level {
            Level::Level1 | Level::Summary | Level::Important => true,
            Level::Level2 => self.include_normal,
            Level::Level3 => self.include_low,
            Level::Unknown => self.include_normal && self.include_low,
        }
    }

    /// Check nested configuration and the begin preamble placeholders.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;

        let re = Regex::new(r"\{(\w+)\}").map_err(|e| Error::Config(e.to_string()))?;
        if let Some(unknown) = re
            .captures_iter(&self.preambles.begin)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|name| !PREAMBLE_PLACEHOLDERS.contains(name))
        {
            return Err(Error::Config(format!(
                "unknown placeholder {{{}}} in begin preamble",
                unknown
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Notes,
            include_normal: true,
            include_low: true,
            structuring_headlines: true,
            group_by_topic: false,
            group_by_folder: false,
            styles: LevelStyles::default(),
            note_format: "*".to_string(),
            note_preamble: "Note:".to_string(),
            mindmap_preamble: true,
            preambles: Preambles::default(),
            classifier: ClassifierConfig::default(),
            date_time: None,
        }
    }
}

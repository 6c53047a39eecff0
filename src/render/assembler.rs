//! Assemble sorted annotations into a Markdown notes document.
//!
//! Rendering is one pass over the sorted list. [`DocumentGroupState`] tracks
//! the current topic, document group and page; entries accumulate into a
//! condensed and a detailed buffer that are written out whenever a group ends.

use chrono::Local;

use super::options::{Layout, LevelStyle, RenderOptions};
use super::result::RenderResult;
use super::sort;
use super::text::{flatten_breaks, normalize_breaks, trim_details};
use crate::classify::{ColorClassifier, Level, Rgb};
use crate::model::Annotation;

const MINDMAP_FRONT_MATTER: &str = "---\n\nmindmap-plugin: basic\n\n---\n";
const LOW_IMPORTANCE_FILLER: &str = "_{Low importance} :_\n";
const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Running state while rendering.
#[derive(Debug, Clone, Default)]
pub struct DocumentGroupState {
    /// Topic of the current section, empty before the first topic header
    pub topic: String,

    /// Folder or file name of the current group
    pub group: Option<String>,

    /// File name of the first document in the current group
    pub document: String,

    /// Page of the last page marker in this group
    pub page: u32,

    /// Whether a bullet was emitted since the last level 1 title
    pub previous_bullet: bool,

    after_page_marker: bool,
    condensed: String,
    detailed: String,
}

impl DocumentGroupState {
    fn enter_group(&mut self, name: &str, document: &str) {
        self.group = Some(name.to_string());
        self.document = document.to_string();
        self.page = 0;
        self.previous_bullet = false;
        self.after_page_marker = false;
    }
}

/// Turns annotations into the final document.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    options: RenderOptions,
    classifier: ColorClassifier,
}

impl DocumentAssembler {
    /// Create an assembler for the given options.
    pub fn new(options: RenderOptions) -> Self {
        let classifier = ColorClassifier::new(&options.classifier);
        Self {
            options,
            classifier,
        }
    }

    /// The options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Level of an annotation's color.
    pub fn level_of(&self, annotation: &Annotation) -> Level {
        self.classifier.classify(annotation.color)
    }

    /// Split topics if enabled and sort into rendering order.
    pub fn sort(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        sort::prepare(annotations, &self.options)
    }

    /// Sort, then render.
    pub fn assemble(&self, annotations: Vec<Annotation>) -> RenderResult {
        let sorted = self.sort(annotations);
        self.render(&sorted)
    }

    /// Render annotations that are already in order.
    ///
    /// An empty list yields the "no annotations" placeholder and nothing else.
    pub fn render(&self, annotations: &[Annotation]) -> RenderResult {
        let Some(first) = annotations.first() else {
            return RenderResult::content_only(self.options.preambles.no_annotations.clone());
        };

        let mut out = self.begin(first);
        let mut state = DocumentGroupState::default();
        let mut result = RenderResult::default();
        let headlines = self.options.structuring_headlines;

        for annotation in annotations {
            let topic = annotation.topic.as_deref().unwrap_or_default();
            if headlines && self.options.topics_enabled() && state.topic != topic {
                self.flush_group(&mut out, &mut state, &mut result);
                out.push_str(&format!("\n# {}\n", topic));
                state.topic = topic.to_string();
                result.stats.topics += 1;
            }

            let key = annotation.group_key(self.options.group_by_folder);
            if state.group.as_deref() != Some(key) && (headlines || state.group.is_none()) {
                self.flush_group(&mut out, &mut state, &mut result);
                if headlines {
                    out.push_str(&self.group_header(key));
                }
                state.enter_group(key, &annotation.source.document);
                result.stats.groups += 1;
            }

            if self.options.layout == Layout::Notes && state.page != annotation.page_number {
                state
                    .detailed
                    .push_str(&format!("\n#### Page {}\n", annotation.page_number));
                state.page = annotation.page_number;
                state.after_page_marker = true;
                result.stats.pages += 1;
            }

            let level = self.level_of(annotation);
            if !self.options.reports(level) {
                result.stats.skipped += 1;
                continue;
            }
            self.push_entry(&mut state, annotation, level);
            result.stats.add_entry(level);
        }

        self.flush_group(&mut out, &mut state, &mut result);

        log::debug!(
            "Rendered {} of {} annotation(s) in {} group(s)",
            result.stats.total_entries(),
            annotations.len(),
            result.stats.groups
        );

        result.content = out;
        result
    }

    fn begin(&self, first: &Annotation) -> String {
        match self.options.layout {
            Layout::Mindmap => MINDMAP_FRONT_MATTER.to_string(),
            Layout::Notes | Layout::ExternalMindmap => {
                let date_time = self
                    .options
                    .date_time
                    .unwrap_or_else(|| Local::now().naive_local())
                    .format(DATE_TIME_FORMAT)
                    .to_string();
                let begin = self
                    .options
                    .preambles
                    .begin
                    .replace("{fileName}", &first.source.document)
                    .replace("{dateTime}", &date_time);
                format!("{}\n", begin)
            }
        }
    }

    fn group_header(&self, name: &str) -> String {
        match self.options.layout {
            Layout::Notes => String::new(),
            Layout::Mindmap => {
                let mut header = format!("### [[{}]]\n", name);
                if self.options.mindmap_preamble {
                    header.push_str("#### _\n");
                }
                header
            }
            Layout::ExternalMindmap => {
                let mut header = format!("\n**Reference :** [[{}]]\n\n\n", name);
                if self.options.group_by_folder {
                    header.push_str("---\n");
                }
                header
            }
        }
    }

    fn flush_group(
        &self,
        out: &mut String,
        state: &mut DocumentGroupState,
        result: &mut RenderResult,
    ) {
        if state.group.take().is_none() {
            return;
        }
        let name = std::mem::take(&mut state.document);
        let condensed = std::mem::take(&mut state.condensed);
        let detailed = std::mem::take(&mut state.detailed);
        let preambles = &self.options.preambles;

        match self.options.layout {
            Layout::Notes => {
                out.push_str(&format!("### [[{}]]\n", name));
                out.push_str(&self.legend());
                out.push_str("\n\n---\n## Annotations\n");
                out.push_str(&format!("{}\n[[{}]]\n- \n\n\n---\n", preambles.personal, name));
                out.push_str(&format!("{}\n[[{}]]\n", preambles.condensed, name));
                out.push_str("#### PDF annotations\n");
                out.push_str(&condensed);
                out.push_str(&format!("\n\n\n---\n{}\n[[{}]]\n", preambles.detailed, name));
                out.push_str(&detailed);
            }
            Layout::Mindmap => out.push_str(&condensed),
            Layout::ExternalMindmap => {
                out.push_str(&self.legend());
                out.push_str("\n\n---\n## Notes\n");
                out.push_str(&condensed);
            }
        }

        result.condensed.push_str(&condensed);
        result.detailed.push_str(&detailed);
    }

    /// The `## Format` block explaining icons, formats and colors.
    fn legend(&self) -> String {
        let styles = &self.options.styles;
        let colors = &self.options.classifier.colors;
        let external = self.options.layout == Layout::ExternalMindmap;

        let mut legend = String::from("## Format\n");
        for level in Level::RANKED {
            let style = styles.get(level);
            let color_name = colors.get(level).map(Rgb::name).unwrap_or("Unknown");
            let label = match level {
                Level::Summary | Level::Important => level.label().to_string(),
                _ => format!(" {}", level.label()),
            };
            let prefix = self.prefix_for(level, style, false);
            if external {
                legend.push_str(&format!(
                    "{}{} {} ({})\n",
                    prefix, style.external_icon, label, color_name
                ));
            } else {
                legend.push_str(&format!(
                    "{}{} {}{} ({}){}\n",
                    prefix, style.icon, style.format, label, color_name, style.format
                ));
            }
        }
        if !external {
            legend.push_str(&format!(
                "{} {}Note content{}\n",
                self.options.note_preamble, self.options.note_format, self.options.note_format
            ));
        }
        legend
    }

    /// Condensed-output prefix of a level.
    ///
    /// Level 1 is a title on its own line; `after_marker` drops the blank line
    /// right after a page marker.
    fn prefix_for(&self, level: Level, style: &LevelStyle, after_marker: bool) -> String {
        let external = self.options.layout == Layout::ExternalMindmap;
        match (level, external) {
            (Level::Level1, true) => "\n".to_string(),
            (Level::Level1, false) if after_marker => style.prefix.clone(),
            (Level::Level1, false) => format!("\n{}", style.prefix),
            (_, true) => style.external_prefix(),
            (_, false) => style.prefix.clone(),
        }
    }

    fn push_entry(&self, state: &mut DocumentGroupState, annotation: &Annotation, level: Level) {
        let layout = self.options.layout;
        let external = layout == Layout::ExternalMindmap;
        let styles = &self.options.styles;
        let style = styles.get(level);
        let is_note = annotation.subtype.is_note();

        let raw = trim_details(annotation.display_text());
        let details = if external {
            flatten_breaks(raw)
        } else {
            normalize_breaks(raw)
        };
        let icon = if external {
            format!("{} ", style.external_icon)
        } else {
            format!("{} ", style.icon)
        };

        match level {
            Level::Level1 => state.previous_bullet = false,
            Level::Level3 => {
                if !state.previous_bullet {
                    let filler_prefix = self.prefix_for(Level::Level2, &styles.level2, false);
                    state.condensed.push_str(&filler_prefix);
                    state.condensed.push_str(LOW_IMPORTANCE_FILLER);
                }
                state.previous_bullet = true;
            }
            _ => state.previous_bullet = true,
        }

        let mut format = style.format.as_str();
        let mut suffix = String::new();
        if level == Level::Level1 {
            if !is_note {
                format = "";
            }
            if external {
                suffix = format!(" (p.{})", annotation.page_number);
            }
            if layout == Layout::Notes {
                let title = self.prefix_for(level, style, state.after_page_marker);
                state.detailed.push_str(&title);
            }
            state.condensed.push_str(&self.prefix_for(level, style, false));
        } else {
            if layout == Layout::Notes {
                state.detailed.push_str("> ");
            }
            state.condensed.push_str(&self.prefix_for(level, style, false));
        }

        let line = if external {
            if is_note {
                format!("{} {}{}{}\n", self.options.note_preamble, icon, details, suffix)
            } else {
                format!("{}{}{}\n", icon, details, suffix)
            }
        } else if is_note {
            let note_format = &self.options.note_format;
            format!(
                "{fmt}{preamble} {nf}{icon}{details}{nf}{fmt}{suffix}\n",
                fmt = format,
                preamble = self.options.note_preamble,
                nf = note_format,
                icon = icon,
                details = details,
                suffix = suffix
            )
        } else {
            format!("{icon}{fmt}{details}{fmt}{suffix}\n", fmt = format)
        };

        if layout == Layout::Notes {
            state.detailed.push_str(&line);
        }
        state.condensed.push_str(&line);
        state.after_page_marker = false;
    }
}

/// Sort and render annotations with the given options.
pub fn render(annotations: Vec<Annotation>, options: &RenderOptions) -> RenderResult {
    DocumentAssembler::new(options.clone()).assemble(annotations)
}

/// Sort and render annotations, returning only the document text.
pub fn to_markdown(annotations: Vec<Annotation>, options: &RenderOptions) -> String {
    render(annotations, options).content
}

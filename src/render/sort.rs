//! Final ordering of collected annotations.

use std::cmp::Ordering;

use super::options::RenderOptions;
use crate::model::Annotation;

/// Split topics off when enabled, then sort.
pub fn prepare(annotations: Vec<Annotation>, options: &RenderOptions) -> Vec<Annotation> {
    let mut annotations: Vec<Annotation> = if options.topics_enabled() {
        annotations
            .into_iter()
            .map(Annotation::with_topic_split)
            .collect()
    } else {
        annotations
    };
    sort_annotations(
        &mut annotations,
        options.topics_enabled(),
        options.group_by_folder,
    );
    annotations
}

/// Sort by topic, folder, document, page, then top of page first.
///
/// Topic and folder only take part when requested. Remaining ties fall back
/// to the left edge, the id and the text so the order does not depend on the
/// input order.
pub fn sort_annotations(annotations: &mut [Annotation], by_topic: bool, by_folder: bool) {
    annotations.sort_by(|a, b| compare(a, b, by_topic, by_folder));
}

fn compare(a: &Annotation, b: &Annotation, by_topic: bool, by_folder: bool) -> Ordering {
    let topic = if by_topic {
        a.topic.cmp(&b.topic)
    } else {
        Ordering::Equal
    };
    let folder = if by_folder {
        a.source.folder.cmp(&b.source.folder)
    } else {
        Ordering::Equal
    };

    topic
        .then(folder)
        .then_with(|| a.source.document.cmp(&b.source.document))
        .then_with(|| a.page_number.cmp(&b.page_number))
        .then_with(|| b.vertical_position().total_cmp(&a.vertical_position()))
        .then_with(|| a.rect[0].total_cmp(&b.rect[0]))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.display_text().cmp(b.display_text()))
}

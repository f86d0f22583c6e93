use eframe::egui;
use egui_commonmark::CommonMarkCache;

use crate::content::{Block, CHAPTERS, FOOTER};
use crate::navigation::Anchors;
use crate::widgets;

const CHAPTER_TITLE_SIZE: f32 = 30.0;
const PART_TITLE_SIZE: f32 = 24.0;
const STEP_TITLE_SIZE: f32 = 18.0;

/// Lay out the whole guide, recording every chapter and part anchor.
///
/// `origin` is the screen-space top of the scrolled content; anchors are stored
/// relative to it so they compare directly against the scroll offset.
pub fn show(ui: &mut egui::Ui, cache: &mut CommonMarkCache, anchors: &mut Anchors, origin: f32) {
    anchors.clear();

    egui::Frame::new()
        .inner_margin(egui::Margin::symmetric(32, 24))
        .show(ui, |ui| {
            ui.set_max_width(880.0);

            for chapter in CHAPTERS {
                anchors.record(chapter.id, ui.cursor().top() - origin);
                widgets::heading(ui, chapter.title, CHAPTER_TITLE_SIZE);
                ui.add_space(12.0);
                blocks(ui, cache, chapter.id, chapter.blocks);

                for part in chapter.parts {
                    ui.add_space(40.0);
                    anchors.record(part.id, ui.cursor().top() - origin);
                    widgets::heading(ui, part.title, PART_TITLE_SIZE);
                    ui.add_space(12.0);
                    blocks(ui, cache, part.id, part.blocks);
                }

                ui.add_space(64.0);
            }

            ui.separator();
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(FOOTER)
                        .small()
                        .color(ui.visuals().weak_text_color()),
                );
            });
            ui.add_space(24.0);
        });
}

fn blocks(ui: &mut egui::Ui, cache: &mut CommonMarkCache, anchor: &str, blocks: &[Block]) {
    for (index, block) in blocks.iter().enumerate() {
        ui.push_id((anchor, index), |ui| match block {
            Block::Prose(text) => widgets::prose(ui, cache, text),
            Block::Heading(text) => {
                ui.add_space(16.0);
                widgets::heading(ui, text, STEP_TITLE_SIZE);
            }
            Block::Tag(text) => widgets::tag(ui, text),
            Block::Code { language, code } => {
                widgets::code_block(ui, language, code);
            }
            Block::Callout { kind, title, body } => {
                widgets::callout(ui, cache, *kind, title, body);
            }
            Block::Bullets(items) => {
                let list = items
                    .iter()
                    .map(|item| format!("- {item}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                widgets::prose(ui, cache, &list);
            }
        });
        ui.add_space(8.0);
    }
}

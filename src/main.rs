#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod content;
mod document;
mod navigation;
mod registry;
mod widgets;

use clap::Parser;
use eframe::egui;

use crate::app::GuideApp;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "monorepo-guide")]
#[command(about = "Next.js + Express + tRPC monorepo setup guide", long_about = None)]
struct Args {
    /// Section to open at, e.g. "server" or "redis-tips"
    #[arg(short, long, value_name = "ID")]
    section: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title(content::GUIDE_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "monorepo-guide",
        options,
        Box::new(move |cc| Ok(Box::new(GuideApp::new(cc, args.section)?))),
    )
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspotter - Image Hotspot Editor
//!
//! A cross-platform desktop application for drawing named polygon hotspots
//! over an image and exporting them as embeddable HTML. The same binary
//! can run the small file library server that stores exported pages.

mod app;
mod config;
mod editor;
mod export;
mod io;
mod models;
mod render;
mod server;
mod ui;
mod util;

use anyhow::Result;
use app::HotspotApp;
use clap::Parser;
use config::Settings;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Image hotspot editor and embed library server")]
struct Args {
    /// Run the library server instead of the editor
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Settings file (defaults to ./hotspotter.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the server bind address
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Override the directory saved pages are written to
    #[arg(long)]
    library_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.server.bind = bind;
    }
    if let Some(dir) = args.library_dir {
        settings.server.library_dir = dir;
    }

    if args.serve {
        return server::routes::serve(&settings.server);
    }

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Hotspotter - Image Hotspot Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Hotspotter",
        options,
        Box::new(move |_cc| Ok(Box::new(HotspotApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

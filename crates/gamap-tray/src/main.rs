use anyhow::Result;
use clap::Parser;
use ksni::menu::{MenuItem, StandardItem, SubMenu};
use ksni::ToolTip;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use which::which;

use gamap_core::model::OutputInfo;
use gamap_core::{preset_label, GAMMA_PRESETS};
use gamap_xrandr::{current_gamma, set_gamma, set_gamma_for_all};

#[derive(Parser, Debug)]
#[command(name = "gamap", about = "Adjust gamma via systray icon")]
struct Args {
    /// Print lots of debugging output
    #[arg(short, long)]
    debug: bool,
}

struct GamapTray {
    outputs: Vec<OutputInfo>,
}

impl ksni::Tray for GamapTray {
    fn id(&self) -> String {
        "gamap".into()
    }
    fn title(&self) -> String {
        "Gamap".into()
    }
    fn icon_name(&self) -> String {
        "video-display".into()
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: "Set Gamma".into(),
            ..Default::default()
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        build_menu(&self.outputs)
    }

    // Menu placement is up to the status-notifier host; a plain click
    // just gets logged.
    fn activate(&mut self, x: i32, y: i32) {
        debug!("tray activated at {},{}", x, y);
    }
}

/// Build the full tray menu from the outputs enumerated at startup. Every
/// entry captures its (output, gamma) pair by value.
fn build_menu(outputs: &[OutputInfo]) -> Vec<MenuItem<GamapTray>> {
    let names: Vec<String> = outputs.iter().map(|o| o.name.clone()).collect();

    let mut items: Vec<MenuItem<GamapTray>> = Vec::new();

    items.push(MenuItem::SubMenu(SubMenu {
        label: "All Outputs".into(),
        submenu: GAMMA_PRESETS
            .iter()
            .map(|&gamma| {
                let names = names.clone();
                MenuItem::Standard(StandardItem {
                    label: preset_label(gamma),
                    activate: Box::new(move |_this: &mut GamapTray| {
                        set_gamma_for_all(&names, gamma)
                    }),
                    ..Default::default()
                })
            })
            .collect(),
        ..Default::default()
    }));

    for output in outputs {
        items.push(MenuItem::SubMenu(SubMenu {
            label: output.name.clone(),
            submenu: GAMMA_PRESETS
                .iter()
                .map(|&gamma| {
                    let name = output.name.clone();
                    MenuItem::Standard(StandardItem {
                        label: preset_label(gamma),
                        activate: Box::new(move |_this: &mut GamapTray| {
                            if let Err(e) = set_gamma(&name, gamma) {
                                warn!("set_gamma {} failed: {:#}", name, e);
                            }
                        }),
                        ..Default::default()
                    })
                })
                .collect(),
            ..Default::default()
        }));
    }

    items.push(MenuItem::Standard(StandardItem {
        label: "Reset".into(),
        activate: Box::new(move |_this: &mut GamapTray| set_gamma_for_all(&names, 1.0)),
        ..Default::default()
    }));
    items.push(MenuItem::Separator);
    items.push(MenuItem::Standard(StandardItem {
        label: "Quit".into(),
        activate: Box::new(|_this: &mut GamapTray| std::process::exit(0)),
        ..Default::default()
    }));

    items
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if which("xrandr").is_err() {
        warn!("xrandr not found in PATH, gamma changes will have no effect");
    }

    let outputs = gamap_x11::list_outputs()?;
    for output in &outputs {
        match current_gamma(&output.name) {
            Ok((r, g, b)) => debug!("output {} gamma {}:{}:{}", output.name, r, g, b),
            Err(e) => debug!("output {} gamma unknown: {:#}", output.name, e),
        }
    }

    let service = ksni::TrayService::new(GamapTray { outputs });
    let _handle = service.spawn();
    // Block forever; Quit exits the process from its menu handler.
    loop {
        std::thread::park();
    }
}

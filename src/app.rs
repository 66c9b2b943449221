//! GUI module - Application state and UI rendering
//!
//! This module contains the review window, its menus and dialogs.
//! All filing decisions are delegated to [`ReviewSession`].

use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui;
use log::{info, warn};
use rfd::FileDialog;

use crate::collector::{collect, format_size, ImageSet};
use crate::config::{AppConfig, ReviewWidth};
use crate::error::SifterError;
use crate::session::{Decision, ReviewSession, SessionState};

const LOAD_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
const KEEP_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::K);
const DISCARD_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::D);
const WIDTH_SHORTCUTS: [egui::KeyboardShortcut; 5] = [
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num1),
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num2),
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num3),
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num4),
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Num5),
];

/// Something the user asked for from a menu, shortcut or button
#[derive(Clone, Copy)]
enum Command {
    LoadImages,
    Decide(Decision),
    SetWidth(ReviewWidth),
}

/// Modal message shown over the window
enum Notice {
    ChooseSource,
    NoImagesFound(String),
    ChooseDestination {
        source_dir: PathBuf,
        images: ImageSet,
    },
    AlreadyOrganized {
        source_dir: PathBuf,
        images: ImageSet,
        message: String,
    },
    Failed {
        title: &'static str,
        message: String,
    },
    EndOfImages {
        kept: usize,
        discarded: usize,
        destination: PathBuf,
    },
}

impl Notice {
    fn title(&self) -> &'static str {
        match self {
            Notice::ChooseSource => "Choose Photos",
            Notice::NoImagesFound(_) => "No Images Found",
            Notice::ChooseDestination { .. } => "Choose Destination",
            Notice::AlreadyOrganized { .. } => "Save Location Already Exists",
            Notice::Failed { title, .. } => *title,
            Notice::EndOfImages { .. } => "End of Images",
        }
    }

    fn message(&self) -> String {
        match self {
            Notice::ChooseSource => {
                "In the next window, please choose the folder with the photos you wish to sort."
                    .to_string()
            }
            Notice::NoImagesFound(message) => message.clone(),
            Notice::ChooseDestination { images, .. } => format!(
                "Found {} image(s). In the next window, please choose where to save the sorted photos.",
                images.len()
            ),
            Notice::AlreadyOrganized { message, .. } => format!(
                "{}.\nPlease delete the 'Keep' and 'Discard' directories or pick another folder.",
                message
            ),
            Notice::Failed { message, .. } => message.clone(),
            Notice::EndOfImages {
                kept, discarded, ..
            } => format!("End of images: {} kept, {} discarded.", kept, discarded),
        }
    }

    /// Label of the button that carries the flow forward, if any
    fn continue_label(&self) -> Option<&'static str> {
        match self {
            Notice::ChooseSource | Notice::ChooseDestination { .. } => Some("OK"),
            Notice::NoImagesFound(_) => Some("Choose Another Folder"),
            Notice::AlreadyOrganized { .. } => Some("Choose Another Destination"),
            Notice::EndOfImages { .. } => Some("Open Folder"),
            Notice::Failed { .. } => None,
        }
    }
}

#[derive(Clone, Copy)]
enum NoticeAction {
    Continue,
    Dismiss,
}

#[derive(Clone)]
enum MessageType {
    Info,
    Success,
    Error,
}

/// The current image, decoded at the selected width
struct LoadedImage {
    path: PathBuf,
    name: String,
    size: Option<u64>,
    width: ReviewWidth,
    texture: Option<egui::TextureHandle>,
}

/// Application state
pub struct PhotoSifterApp {
    config: AppConfig,
    session: Option<ReviewSession>,
    loaded_image: Option<LoadedImage>,
    notice: Option<Notice>,
    status_message: Option<(String, MessageType)>,
}

impl PhotoSifterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            config,
            session: None,
            loaded_image: None,
            notice: None,
            status_message: None,
        }
    }

    fn folder_dialog(title: &str) -> FileDialog {
        let dialog = FileDialog::new().set_title(title);
        match dirs::picture_dir() {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn run_command(&mut self, ctx: &egui::Context, command: Command) {
        match command {
            Command::LoadImages => self.notice = Some(Notice::ChooseSource),
            Command::Decide(decision) => self.decide(ctx, decision),
            Command::SetWidth(width) => {
                self.config.review_width = width;
                self.load_current_image(ctx);
            }
        }
    }

    fn choose_source(&mut self) {
        let Some(folder) = Self::folder_dialog("Open Images Folder").pick_folder() else {
            info!("Image folder selection cancelled");
            return;
        };

        let images = collect(&folder);
        if images.is_empty() {
            let err = SifterError::NoImagesFound { folder };
            self.notice = Some(Notice::NoImagesFound(err.to_string()));
        } else {
            self.notice = Some(Notice::ChooseDestination {
                source_dir: folder,
                images,
            });
        }
    }

    fn choose_destination(&mut self, ctx: &egui::Context, source_dir: PathBuf, images: ImageSet) {
        let Some(root) = Self::folder_dialog("Open Destination Folder").pick_folder() else {
            info!("Destination selection cancelled");
            return;
        };

        match ReviewSession::start(images.clone(), &source_dir, &root) {
            Ok(session) => {
                self.status_message = Some((
                    format!(
                        "Sorting {} image(s) into {}",
                        session.len(),
                        root.display()
                    ),
                    MessageType::Info,
                ));
                self.session = Some(session);
                self.load_current_image(ctx);
            }
            Err(err @ SifterError::DestinationAlreadyOrganized { .. }) => {
                self.notice = Some(Notice::AlreadyOrganized {
                    source_dir,
                    images,
                    message: err.to_string(),
                });
            }
            Err(err) => {
                warn!("Could not start review: {}", err);
                self.notice = Some(Notice::Failed {
                    title: "Cannot Use Destination",
                    message: err.to_string(),
                });
            }
        }
    }

    fn decide(&mut self, ctx: &egui::Context, decision: Decision) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let name = self
            .loaded_image
            .as_ref()
            .map(|img| img.name.clone())
            .unwrap_or_default();

        let result = match decision {
            Decision::Keep => session.keep(),
            Decision::Discard => session.discard(),
        };

        match result {
            Ok(SessionState::Active) => {
                self.status_message = Some((
                    format!("{}: {}", decision.label(), name),
                    MessageType::Success,
                ));
                self.load_current_image(ctx);
            }
            Ok(SessionState::Complete) => self.finish_review(ctx),
            Err(err) if err.is_user_facing() => {
                self.status_message = Some((format!("Failed: {}", name), MessageType::Error));
                self.notice = Some(Notice::Failed {
                    title: "Copy Failed",
                    message: format!(
                        "{}\n\nThe image was not filed. Choose Keep or Discard again to retry.",
                        err
                    ),
                });
            }
            Err(err) => warn!("Ignoring {} request: {}", decision.label(), err),
        }
    }

    fn finish_review(&mut self, ctx: &egui::Context) {
        if let Some(session) = self.session.take() {
            self.notice = Some(Notice::EndOfImages {
                kept: session.kept(),
                discarded: session.discarded(),
                destination: session.destination().root().to_path_buf(),
            });
        }
        self.loaded_image = None;
        self.status_message = None;
        self.resize_window(ctx, self.config.idle_window_size);
    }

    /// Decode the current image at the selected width and fit the window to it
    fn load_current_image(&mut self, ctx: &egui::Context) {
        let Some(path) = self
            .session
            .as_ref()
            .and_then(|s| s.current().ok())
            .map(Path::to_path_buf)
        else {
            return;
        };
        let width = self.config.review_width;
        let max_side = ctx.input(|i| i.max_texture_side) as u32;

        let texture = match decode_to_width(&path, width.pixels(), max_side) {
            Ok(color_image) => Some(ctx.load_texture(
                path.to_string_lossy(),
                color_image,
                egui::TextureOptions::LINEAR,
            )),
            Err(e) => {
                warn!("Failed to decode {}: {}", path.display(), e);
                None
            }
        };

        let image_size = texture
            .as_ref()
            .map(|t| [t.size_vec2().x, t.size_vec2().y])
            .unwrap_or([width.pixels() as f32, self.config.idle_window_size[1]]);

        self.loaded_image = Some(LoadedImage {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: fs::metadata(&path).map(|m| m.len()).ok(),
            path,
            width,
            texture,
        });
        self.resize_window(ctx, self.config.review_window_size(image_size));
    }

    fn resize_window(&self, ctx: &egui::Context, size: [f32; 2]) {
        let size = egui::vec2(size[0], size[1]);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));

        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            let top_left = ((monitor - size) * 0.5).max(egui::Vec2::ZERO);
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(top_left.to_pos2()));
        }
    }

    fn read_shortcuts(&self, ctx: &egui::Context) -> Option<Command> {
        if self.notice.is_some() {
            return None;
        }
        let reviewing = self.session.is_some();

        ctx.input_mut(|i| {
            if i.consume_shortcut(&LOAD_SHORTCUT) {
                return Some(Command::LoadImages);
            }
            if !reviewing {
                return None;
            }
            if i.consume_shortcut(&KEEP_SHORTCUT) {
                return Some(Command::Decide(Decision::Keep));
            }
            if i.consume_shortcut(&DISCARD_SHORTCUT) {
                return Some(Command::Decide(Decision::Discard));
            }
            ReviewWidth::ALL
                .into_iter()
                .find(|w| i.consume_shortcut(&WIDTH_SHORTCUTS[w.index()]))
                .map(Command::SetWidth)
        })
    }

    fn render_menu_bar(&self, ui: &mut egui::Ui, ctx: &egui::Context) -> Option<Command> {
        let reviewing = self.session.is_some() && self.notice.is_none();
        let mut command = None;

        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let button = egui::Button::new("Load Images")
                    .shortcut_text(ctx.format_shortcut(&LOAD_SHORTCUT));
                if ui.add_enabled(self.notice.is_none(), button).clicked() {
                    command = Some(Command::LoadImages);
                    ui.close_menu();
                }
            });

            ui.menu_button("Action", |ui| {
                for (decision, shortcut) in [
                    (Decision::Keep, &KEEP_SHORTCUT),
                    (Decision::Discard, &DISCARD_SHORTCUT),
                ] {
                    let button = egui::Button::new(format!("{} Image", decision.label()))
                        .shortcut_text(ctx.format_shortcut(shortcut));
                    if ui.add_enabled(reviewing, button).clicked() {
                        command = Some(Command::Decide(decision));
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Image", |ui| {
                for width in ReviewWidth::ALL {
                    let selected = width == self.config.review_width;
                    let button = egui::Button::new(width.label())
                        .selected(selected)
                        .shortcut_text(ctx.format_shortcut(&WIDTH_SHORTCUTS[width.index()]));
                    if ui.add_enabled(reviewing, button).clicked() {
                        command = Some(Command::SetWidth(width));
                        ui.close_menu();
                    }
                }
            });
        });

        command
    }

    fn render_review(&self, ui: &mut egui::Ui) {
        match &self.loaded_image {
            Some(LoadedImage {
                texture: Some(texture),
                ..
            }) => {
                ui.centered_and_justified(|ui| {
                    ui.image(egui::load::SizedTexture::new(
                        texture.id(),
                        texture.size_vec2(),
                    ));
                });
            }
            Some(loaded) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(egui::RichText::new("🖼").size(48.0));
                    ui.label(format!("Cannot display {}", loaded.name));
                    ui.label(
                        egui::RichText::new("It can still be kept or discarded.")
                            .small()
                            .italics(),
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Please Open An Image Folder");
                });
            }
        }
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) -> Option<Command> {
        let mut command = None;

        ui.horizontal(|ui| {
            if let (Some(session), Some(loaded)) = (&self.session, &self.loaded_image) {
                ui.label(format!("{}/{}", session.cursor() + 1, session.len()));
                ui.separator();
                ui.label(&loaded.name)
                    .on_hover_text(loaded.path.display().to_string());
                ui.label(
                    egui::RichText::new(format!(
                        "{} | {}px",
                        format_size(loaded.size),
                        loaded.width.pixels()
                    ))
                    .small(),
                );
            }

            if let Some((msg, msg_type)) = &self.status_message {
                let color = match msg_type {
                    MessageType::Info => egui::Color32::GRAY,
                    MessageType::Success => egui::Color32::from_rgb(100, 255, 100),
                    MessageType::Error => egui::Color32::RED,
                };
                ui.separator();
                ui.label(egui::RichText::new(msg).color(color).small());
            }

            if let Some(session) = &self.session {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let enabled = self.notice.is_none();
                    if ui.add_enabled(enabled, egui::Button::new("Discard")).clicked() {
                        command = Some(Command::Decide(Decision::Discard));
                    }
                    if ui.add_enabled(enabled, egui::Button::new("Keep")).clicked() {
                        command = Some(Command::Decide(Decision::Keep));
                    }
                    ui.separator();
                    ui.label(format!(
                        "Kept: {} | Discarded: {}",
                        session.kept(),
                        session.discarded()
                    ));
                });
            }
        });

        command
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut action = None;

        egui::Window::new(notice.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message());
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if let Some(label) = notice.continue_label() {
                        if ui.button(label).clicked() {
                            action = Some(NoticeAction::Continue);
                        }
                    }
                    let dismiss = match notice {
                        Notice::ChooseSource
                        | Notice::ChooseDestination { .. }
                        | Notice::NoImagesFound(_)
                        | Notice::AlreadyOrganized { .. } => "Cancel",
                        Notice::Failed { .. } | Notice::EndOfImages { .. } => "Close",
                    };
                    if ui.button(dismiss).clicked() {
                        action = Some(NoticeAction::Dismiss);
                    }
                });
            });

        if let Some(action) = action {
            self.apply_notice_action(ctx, action);
        }
    }

    fn apply_notice_action(&mut self, ctx: &egui::Context, action: NoticeAction) {
        let Some(notice) = self.notice.take() else {
            return;
        };
        if let NoticeAction::Dismiss = action {
            return;
        }

        match notice {
            Notice::ChooseSource | Notice::NoImagesFound(_) => self.choose_source(),
            Notice::ChooseDestination { source_dir, images }
            | Notice::AlreadyOrganized {
                source_dir, images, ..
            } => self.choose_destination(ctx, source_dir, images),
            Notice::EndOfImages { destination, .. } => {
                if let Err(e) = open::that(&destination) {
                    warn!("Failed to open {}: {}", destination.display(), e);
                }
            }
            Notice::Failed { .. } => {}
        }
    }
}

/// Decode `path` and scale it to `width` pixels wide, keeping its aspect ratio.
///
/// Images whose scaled size would exceed `max_side` (the GPU texture limit)
/// are shrunk further until both sides fit.
fn decode_to_width(
    path: &Path,
    width: u32,
    max_side: u32,
) -> image::ImageResult<egui::ColorImage> {
    let img = image::open(path)?;
    let (width, height) = scaled_size(img.width(), img.height(), width, max_side);
    let img = img
        .resize_exact(width, height, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    let height = src_height as f64 * width as f64 / src_width.max(1) as f64;
    (height.round() as u32).max(1)
}

/// Target size for a `width`-wide rendering, clamped to `max_side` on both axes
fn scaled_size(src_width: u32, src_height: u32, width: u32, max_side: u32) -> (u32, u32) {
    let height = scaled_height(src_width, src_height, width);
    let max_side = max_side.max(1);
    if width <= max_side && height <= max_side {
        return (width, height);
    }

    let scale = f64::min(
        max_side as f64 / width as f64,
        max_side as f64 / height as f64,
    );
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (fit(width), fit(height))
}

impl eframe::App for PhotoSifterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut command = self.read_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            if let Some(c) = self.render_menu_bar(ui, ctx) {
                command = Some(c);
            }
        });

        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                if let Some(c) = self.render_status_bar(ui) {
                    command = Some(c);
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.render_review(ui);
            });

        self.render_notice(ctx);

        if let Some(command) = command {
            self.run_command(ctx, command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    #[test]
    fn test_scaled_height_keeps_aspect_ratio() {
        assert_eq!(scaled_height(800, 600, 400), 300);
        assert_eq!(scaled_height(1000, 333, 600), 200);
        assert_eq!(scaled_height(4000, 1, 400), 1);
        assert_eq!(scaled_height(0, 10, 400), 4000);
    }

    #[test]
    fn test_decode_to_width() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("shot.png");
        let img = ImageBuffer::from_fn(200, 100, |_x, _y| Rgb([10_u8, 20_u8, 30_u8]));
        img.save(&src).unwrap();

        let color_image = decode_to_width(&src, 600, 16384).unwrap();
        assert_eq!(color_image.size, [600, 300]);
    }

    #[test]
    fn test_scaled_size_respects_texture_limit() {
        assert_eq!(scaled_size(800, 600, 400, 16384), (400, 300));
        assert_eq!(scaled_size(1000, 15000, 1200, 16384), (1092, 16384));
        assert_eq!(scaled_size(100, 10, 1200, 600), (600, 60));
        assert_eq!(scaled_size(10, 100_000, 400, 2048), (1, 2048));
    }

    #[test]
    fn test_decode_tall_image_fits_texture_limit() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("scroll.png");
        let img = ImageBuffer::from_fn(20, 300, |_x, _y| Rgb([200_u8, 200_u8, 200_u8]));
        img.save(&src).unwrap();

        let color_image = decode_to_width(&src, 400, 2048).unwrap();
        assert_eq!(color_image.size, [137, 2048]);
    }

    #[test]
    fn test_decode_to_width_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("fake.jpg");
        fs::write(&src, b"not a jpeg").unwrap();

        assert!(decode_to_width(&src, 400, 16384).is_err());
    }

    #[test]
    fn test_notice_labels() {
        let notice = Notice::EndOfImages {
            kept: 3,
            discarded: 1,
            destination: PathBuf::from("/out"),
        };
        assert_eq!(notice.title(), "End of Images");
        assert_eq!(notice.message(), "End of images: 3 kept, 1 discarded.");
        assert_eq!(notice.continue_label(), Some("Open Folder"));

        let failed = Notice::Failed {
            title: "Copy Failed",
            message: "disk full".to_string(),
        };
        assert_eq!(failed.title(), "Copy Failed");
        assert_eq!(failed.continue_label(), None);
    }
}

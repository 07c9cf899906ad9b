use eframe::egui::{self, Color32, Key, RichText};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::playlist::Playlist;

/// 読み込み失敗時に次の画像へスキップするまでの待ち時間
const RETRY_DELAY: Duration = Duration::from_secs(2);

pub struct ViewerApp {
    config: Config,
    playlist: Playlist,

    /// 現在表示中の画像パス
    current_path: Option<PathBuf>,
    /// 現在表示中のテクスチャ（spinner を出さないため同期で読み込む）
    current_texture: Option<egui::TextureHandle>,

    /// 最後に画像を切り替えた時刻
    last_switch: Instant,
    /// 読み込み失敗後、次の画像へ進む予定時刻
    retry_at: Option<Instant>,
    /// タイマー停止中か
    paused: bool,

    /// ステータスメッセージ
    status_message: String,

    /// 起動時の画面サイズ調整を済ませたか
    window_sized: bool,
}

/// 画像ファイルをデコードしてeguiのカラーイメージに変換する
fn load_color_image(path: &Path) -> Result<egui::ColorImage, image::ImageError> {
    let img = image::open(path)?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        &img.into_raw(),
    ))
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_folder: Option<PathBuf>) -> Self {
        // ダークテーマを設定
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let config = Config::load();

        // 引数 > 設定ファイル > OSのピクチャフォルダ
        let folder = initial_folder
            .or_else(|| config.image_folder.clone())
            .or_else(dirs::picture_dir);

        let mut app = Self {
            config,
            playlist: Playlist::default(),
            current_path: None,
            current_texture: None,
            last_switch: Instant::now(),
            retry_at: None,
            paused: false,
            status_message: String::new(),
            window_sized: false,
        };

        if let Some(folder) = folder {
            app.open_folder(&cc.egui_ctx, &folder);
        }

        app
    }

    fn open_folder(&mut self, ctx: &egui::Context, folder: &Path) {
        self.playlist.load(folder);
        self.current_path = None;
        self.current_texture = None;
        self.retry_at = None;

        if self.playlist.is_empty() {
            log::info!("no images found in {}", folder.display());
            self.status_message = format!("No images found: {}", folder.display());
        } else {
            self.status_message = format!(
                "Opened: {} ({} files)",
                folder.display(),
                self.playlist.len()
            );
            self.show_next(ctx);
        }
    }

    /// 画像を読み込んで表示する。失敗したらログを出して再試行を予約する
    fn display(&mut self, ctx: &egui::Context, path: PathBuf) {
        match load_color_image(&path) {
            Ok(color_image) => {
                // Texture 名にパスを使う（ユニーク）
                let tex = ctx.load_texture(
                    path.display().to_string(),
                    color_image,
                    egui::TextureOptions::default(),
                );
                self.current_texture = Some(tex);
                self.current_path = Some(path);
                self.retry_at = None;
            }
            Err(e) => {
                log::warn!("failed to load image {}: {}", path.display(), e);
                self.current_texture = None;
                self.current_path = Some(path);
                self.retry_at = Some(Instant::now() + RETRY_DELAY);
            }
        }
    }

    fn show_next(&mut self, ctx: &egui::Context) {
        if let Some(path) = self.playlist.advance() {
            self.display(ctx, path);
        }
        self.last_switch = Instant::now();
    }

    fn show_previous(&mut self, ctx: &egui::Context) {
        if let Some(path) = self.playlist.previous() {
            self.display(ctx, path);
        }
        self.last_switch = Instant::now();
    }

    fn toggle_paused(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            // 再開時はタイマーを仕切り直す
            self.last_switch = Instant::now();
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (prev, next, pause) = ctx.input(|i| {
            (
                i.key_pressed(Key::ArrowLeft),
                i.key_pressed(Key::ArrowRight),
                i.key_pressed(Key::Space),
            )
        });

        if prev {
            self.show_previous(ctx);
        }
        if next {
            self.show_next(ctx);
        }
        if pause {
            self.toggle_paused();
        }
    }

    /// 初回フレームでウィンドウを画面の80%にリサイズする
    fn resize_to_screen(&mut self, ctx: &egui::Context) {
        if self.window_sized {
            return;
        }
        self.window_sized = true;

        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            if monitor.x > 0.0 && monitor.y > 0.0 {
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(monitor * 0.8));
            }
        }
    }

    fn show_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Folder...").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_folder() {
                        self.config.image_folder = Some(path.clone());
                        self.config.save();
                        let ctx = ui.ctx().clone();
                        self.open_folder(&ctx, &path);
                    }
                    ui.close_menu();
                }
            });

            ui.menu_button("Slideshow", |ui| {
                let label = if self.paused {
                    "Resume (Space)"
                } else {
                    "Pause (Space)"
                };
                if ui.button(label).clicked() {
                    self.toggle_paused();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Next (→)").clicked() {
                    let ctx = ui.ctx().clone();
                    self.show_next(&ctx);
                    ui.close_menu();
                }
                if ui.button("Previous (←)").clicked() {
                    let ctx = ui.ctx().clone();
                    self.show_previous(&ctx);
                    ui.close_menu();
                }
            });

            ui.menu_button("Settings", |ui| {
                ui.horizontal(|ui| {
                    ui.label("Slideshow interval (sec):");
                    if ui
                        .add(
                            egui::DragValue::new(&mut self.config.slideshow_interval)
                                .range(1.0..=3600.0),
                        )
                        .changed()
                    {
                        self.config.save();
                    }
                });
            });
        });
    }

    fn show_center_panel(&mut self, ui: &mut egui::Ui) {
        if self.playlist.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.heading("No images found in the specified folder.");
            });
            return;
        }

        if let Some(tex) = &self.current_texture {
            // ウィンドウの95%に収まるよう等比でスケールして中央に表示
            let max_size = ui.available_size() * 0.95;
            let image = egui::Image::new(tex).fit_to_exact_size(max_size);
            ui.centered_and_justified(|ui| {
                ui.add(image);
            });
        } else {
            ui.centered_and_justified(|ui| {
                ui.heading("🖼 Failed to load image");
            });
        }
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(path) = &self.current_path {
                let position = self.playlist.position(path).map(|i| i + 1).unwrap_or(0);
                ui.label(format!(
                    "{} ({}/{})",
                    path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
                    position,
                    self.playlist.len()
                ));
            }

            ui.separator();

            if self.paused {
                ui.label(RichText::new("⏸ Paused").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("▶ Slideshow").color(Color32::GREEN));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(&self.status_message);
            });
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.resize_to_screen(ctx);

        // キーボード処理
        self.handle_keyboard(ctx);

        // 読み込み失敗後の再試行（遅延付きで次の画像へスキップ）
        if let Some(at) = self.retry_at {
            if Instant::now() >= at {
                self.retry_at = None;
                self.show_next(ctx);
            }
        }

        // タイマーによる自動送り
        if !self.paused
            && !self.playlist.is_empty()
            && self.last_switch.elapsed().as_secs_f32() >= self.config.slideshow_interval
        {
            self.show_next(ctx);
        }

        // メニューバー
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.show_menu_bar(ui);
        });

        // ステータスバー
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        // 中央パネル（画像表示）
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_center_panel(ui);
        });

        // タイマーと再試行を進めるため定期的に再描画する
        if !self.paused || self.retry_at.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.config.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn viewer_app() -> ViewerApp {
        ViewerApp {
            config: Config::default(),
            playlist: Playlist::default(),
            current_path: None,
            current_texture: None,
            last_switch: Instant::now(),
            retry_at: None,
            paused: false,
            status_message: String::new(),
            window_sized: true,
        }
    }

    #[test]
    fn load_failure_schedules_a_delayed_retry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not an image").expect("write");

        let ctx = egui::Context::default();
        let mut app = viewer_app();
        app.display(&ctx, path.clone());

        assert!(app.current_texture.is_none());
        assert_eq!(app.current_path, Some(path));
        let retry_at = app.retry_at.expect("retry scheduled");
        assert!(retry_at > Instant::now());
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not an image").expect("write");

        assert!(load_color_image(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_color_image(&dir.path().join("gone.png")).is_err());
    }
}

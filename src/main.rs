use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::audio::Audio;
use crate::config::Config;
use crate::frame::Frame;
use crate::menu::{Menu, MenuChoice};
use crate::renderer::Raycaster;
use crate::scaler::Presenter;
use crate::texture::{Color, TextureStore};
use crate::world::Level;

mod audio;
mod caster;
mod config;
mod error;
mod frame;
mod menu;
mod minimap;
mod player;
mod renderer;
mod scaler;
mod sprite;
mod text;
mod texture;
mod world;

/// How long the win screen stays up before the game closes.
const WIN_SCREEN: Duration = Duration::from_secs(3);
const WIN_MESSAGE: &str = "You escaped the maze";

enum Screen {
    Menu(Menu),
    Playing(Box<Raycaster>),
    Won { until: Instant },
}

struct App {
    config: Config,
    textures: TextureStore,
    audio: Audio,

    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    screen: Screen,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
    fps_text: String,

    // Internal fixed-size buffer, stretched to the window
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,
    presenter: Presenter,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,

    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, textures: TextureStore, audio: Audio) -> Self {
        let (fb_w, fb_h) = (config.width, config.height);
        Self {
            screen: Screen::Menu(Menu::new(config.levels.clone())),
            config,
            textures,
            audio,

            window: None,
            surface: None,

            frame_counter: 0,
            last_fps_print: Instant::now(),
            fps_text: String::new(),

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,
            presenter: Presenter::new(fb_w, fb_h),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),

            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn start_level(&mut self, map: PathBuf) -> anyhow::Result<()> {
        let level = Level::load(&map, &self.textures)
            .with_context(|| format!("starting level {}", map.display()))?;
        self.screen = Screen::Playing(Box::new(Raycaster::new(level, &self.config)));
        self.audio.start_music();
        self.last_tick = Instant::now();
        Ok(())
    }

    /// Key presses that act once rather than while held.
    fn on_key_pressed(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        if code == KeyCode::Escape {
            log::info!("Escape pressed; stopping");
            event_loop.exit();
            return;
        }
        let Screen::Menu(menu) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::ArrowUp | KeyCode::KeyW => menu.up(),
            KeyCode::ArrowDown | KeyCode::KeyS => menu.down(),
            KeyCode::Enter | KeyCode::Space => {
                log::info!("Menu: {:?} selected", menu.label(menu.selected()));
                match menu.choose() {
                    MenuChoice::Play(map) => {
                        if let Err(err) = self.start_level(map) {
                            self.fail(event_loop, err);
                        }
                    }
                    MenuChoice::Quit => event_loop.exit(),
                }
            }
            _ => {}
        }
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let mut dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        if dt > Duration::from_millis(100) {
            dt = Duration::from_millis(100);
        }
        let dt_s = dt.as_secs_f32();

        let Screen::Playing(raycaster) = &mut self.screen else {
            return;
        };
        let held = |codes: [KeyCode; 2]| codes.iter().any(|c| self.keys_down.contains(c));

        let mut fwd = 0.0;
        if held([KeyCode::ArrowUp, KeyCode::KeyW]) {
            fwd += 1.0;
        }
        if held([KeyCode::ArrowDown, KeyCode::KeyS]) {
            fwd -= 1.0;
        }

        // Left of the screen is the larger angle
        let mut turn = 0.0;
        if held([KeyCode::ArrowLeft, KeyCode::KeyA]) {
            turn += 1.0;
        }
        if held([KeyCode::ArrowRight, KeyCode::KeyD]) {
            turn -= 1.0;
        }

        self.audio.set_walking(fwd != 0.0);

        let player = &mut raycaster.player;
        player.turn(turn * self.config.turn_speed * dt_s);
        player.advance(fwd * self.config.move_speed * dt_s);
    }

    /// Draw the current screen into the internal framebuffer.
    fn draw(&mut self) {
        let mut frame = Frame::new(&mut self.fb, self.fb_w, self.fb_h);
        match &mut self.screen {
            Screen::Menu(menu) => menu.draw(&mut frame, &self.textures),
            Screen::Playing(raycaster) => {
                raycaster.render(&mut frame, &self.textures);
                text::draw_text(&mut frame, 4, 4, 2, &self.fps_text, Color::WHITE);
                if raycaster.player.won {
                    log::info!("{}", WIN_MESSAGE);
                    self.audio.play_win();
                    self.screen = Screen::Won {
                        until: Instant::now() + WIN_SCREEN,
                    };
                }
            }
            Screen::Won { .. } => {
                frame.clear(Color::BLACK);
                frame.render_fullscreen(&self.textures, "win");
                let scale = (frame.height as i32 / 128).max(1);
                let centre_y = frame.height as i32 / 2;
                text::draw_text_centred(&mut frame, centre_y, scale, WIN_MESSAGE, Color::WHITE);
            }
        }
    }

    fn present(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        let (Some(nz_w), Some(nz_h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        surface
            .resize(nz_w, nz_h)
            .map_err(|e| anyhow!("resizing surface: {e}"))?;
        self.presenter.resize(width as usize, height as usize);

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("mapping surface buffer: {e}"))?;
        self.presenter.blit(&mut buf, &self.fb);
        buf.present()
            .map_err(|e| anyhow!("presenting frame: {e}"))?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => return self.fail(event_loop, anyhow!("creating window: {e}")),
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => return self.fail(event_loop, anyhow!("creating softbuffer surface: {e}")),
        }

        self.last_tick = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                    if !repeat {
                        self.on_key_pressed(event_loop, code);
                    }
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                let size = match &self.window {
                    Some(w) if w.id() == id => w.inner_size(),
                    _ => return,
                };

                self.tick();
                self.draw();
                if let Err(err) = self.present(size.width, size.height) {
                    return self.fail(event_loop, err);
                }

                if let Screen::Won { until } = self.screen {
                    if Instant::now() >= until {
                        event_loop.exit();
                        return;
                    }
                }

                // Report FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    self.fps_text = format!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
                    log::info!("{}", self.fps_text);
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_textures(config: &Config) -> anyhow::Result<TextureStore> {
    let mut textures = TextureStore::new();
    for (name, path) in &config.textures {
        textures.load(name, path)?;
    }
    log::info!("Loaded {} textures", textures.len());
    Ok(textures)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting maze-raycaster v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::discover(config_path.as_deref()).context("loading configuration")?;
    let textures = load_textures(&config).context("loading textures")?;

    let event_loop = EventLoop::new().map_err(|e| anyhow!("creating event loop: {e}"))?;
    // Poll keeps frames coming even when no input arrives
    event_loop.set_control_flow(ControlFlow::Poll);

    let audio = Audio::new(&config.sounds);
    let mut app = App::new(config, textures, audio);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    if let Some(err) = app.failure.take() {
        return Err(err);
    }
    log::info!("Shut down cleanly");
    Ok(())
}

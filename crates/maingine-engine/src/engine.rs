use anyhow::Result;

use crate::core::{Mode, ModeArena, ModeId, ModeRegistry};
use crate::device::GpuInit;
use crate::error::EngineError;
use crate::logging::{init_logging, LoggingConfig};
use crate::settings::EngineSettings;
use crate::surface::Surface;
use crate::time::{LoopEngine, LoopHandle};
use crate::window::{WindowSettings, WindowSurface};

/// Engine version, as reported in the start-up banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level engine object.
///
/// Lifecycle: [`Maingine::new`] (settings, logging) → register modes →
/// [`Maingine::init`] (surface) → [`Maingine::run`] (blocks until stopped,
/// then cleans up). A failed `init` leaves the engine unable to run.
///
/// ```rust,ignore
/// let mut engine = Maingine::new(
///     EngineSettings::new().tick_rate(120.0).frame_rate(60.0),
///     WindowSettings::new().title("demo").size(720, 480),
/// )?;
/// engine.add_mode("game", Game::new(engine.handle()));
/// engine.set_main_mode("game");
/// engine.init()?;
/// engine.run()?;
/// ```
pub struct Maingine {
    settings: EngineSettings,
    window_settings: WindowSettings,
    gpu_init: GpuInit,

    modes: ModeRegistry,
    arena: ModeArena,
    engine: LoopEngine,

    surface: Option<Box<dyn Surface>>,
    main_mode: Option<String>,
}

impl Maingine {
    /// Validates `settings`, installs the logger and prepares the loop.
    pub fn new(
        settings: EngineSettings,
        window_settings: WindowSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;

        init_logging(if settings.debug {
            LoggingConfig::debug()
        } else {
            LoggingConfig::default()
        });
        log_system_info(&settings);

        let engine = LoopEngine::new(&settings);

        Ok(Self {
            settings,
            window_settings,
            gpu_init: GpuInit::default(),
            modes: ModeRegistry::new(),
            arena: ModeArena::new(),
            engine,
            surface: None,
            main_mode: None,
        })
    }

    /// Overrides the GPU parameters used by [`Maingine::init`].
    pub fn gpu_init(mut self, gpu_init: GpuInit) -> Self {
        self.gpu_init = gpu_init;
        self
    }

    /// Opens the window surface.
    ///
    /// Window or GPU failures are returned and leave the engine uninitialized.
    pub fn init(&mut self) -> Result<()> {
        if self.surface.is_some() {
            return Err(EngineError::AlreadyInitialized.into());
        }

        log::info!("initializing maingine");
        let surface = WindowSurface::open(self.window_settings.clone(), self.gpu_init.clone())?;
        self.surface = Some(Box::new(surface));
        log::info!("maingine has been initialized");
        Ok(())
    }

    /// Attaches a caller-provided surface instead of opening a window.
    pub fn init_with<S: Surface + 'static>(&mut self, surface: S) -> Result<(), EngineError> {
        if self.surface.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        self.surface = Some(Box::new(surface));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Stores `mode` in the arena and registers it under `name`.
    ///
    /// Returns `None` (and drops `mode`) if the name is empty or taken.
    pub fn add_mode<M: Mode + 'static>(&mut self, name: &str, mode: M) -> Option<ModeId> {
        let id = self.arena.insert(mode);
        if self.modes.add(name, id) {
            Some(id)
        } else {
            self.arena.take(id);
            None
        }
    }

    /// Mode selected when [`Maingine::run`] starts.
    pub fn set_main_mode(&mut self, name: impl Into<String>) {
        self.main_mode = Some(name.into());
    }

    pub fn main_mode(&self) -> Option<&str> {
        self.main_mode.as_deref()
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn arena(&self) -> &ModeArena {
        &self.arena
    }

    /// Registry and arena together, for calls that need both.
    pub fn modes_mut(&mut self) -> (&mut ModeRegistry, &mut ModeArena) {
        (&mut self.modes, &mut self.arena)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn engine(&self) -> &LoopEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LoopEngine {
        &mut self.engine
    }

    /// Handle for stopping the loop and reading statistics from modes.
    pub fn handle(&self) -> LoopHandle {
        self.engine.handle()
    }

    /// Selects the main mode and runs the loop until it stops.
    ///
    /// Afterwards the active mode is exited and the surface is dropped, so a
    /// further run needs a new `init`.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let Some(surface) = self.surface.as_mut() else {
            log::error!("maingine must be initialized before starting");
            return Err(EngineError::NotInitialized);
        };

        if let Some(name) = self.main_mode.as_deref() {
            if !self.modes.select(&mut self.arena, Some(name)) {
                return Err(EngineError::UnknownMode(name.to_string()));
            }
        }

        self.engine.run(&mut **surface, &mut self.modes, &mut self.arena);
        self.cleanup();
        Ok(())
    }

    /// Requests the loop to stop at the next tick boundary.
    pub fn stop(&self) {
        self.engine.stop();
    }

    fn cleanup(&mut self) {
        self.modes.select(&mut self.arena, None);
        self.surface = None;
        log::info!("maingine has been stopped");
    }
}

fn log_system_info(settings: &EngineSettings) {
    log::info!("maingine version: {VERSION}");
    log::info!("maingine debug mode: {}", settings.debug);
    log::info!(
        "os: {} ({}), arch: {}",
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH
    );
}
